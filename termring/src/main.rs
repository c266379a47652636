#[macro_use]
extern crate log;

use ring_core::helpers;
use ring_core::{Intent, RenderFrame, SpectrumSource};
use std::fmt::Write;

/// Base circle the bars stand on, in world units.
const CIRCLE_RADIUS: f32 = 140.0;

/// Knob disc radius, matching the interaction geometry of the core.
const KNOB_RADIUS: f32 = 60.0;

/// Half-extent of the world that has to fit on screen.  Bars reach
/// out to the base circle plus their maximum length plus the kick
/// stretch.
const WORLD: f32 = 290.0;

fn hsv(h: f32, s: f32, v: f32) -> (u8, u8, u8) {
    let h = h.rem_euclid(360.0) / 60.0;
    let c = v * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    (
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    )
}

/// Shorter way around the circle between two angles.
fn ang_dist(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(std::f32::consts::TAU);
    d.min(std::f32::consts::TAU - d)
}

/// Color of one cell at world position `(x, y)`, y pointing down.
///
/// Paints the same scene the knob geometry assumes: bars on the base
/// circle with inner reflections, the knob with indicator and volume
/// arc, band dots, and rings on a kick.  `cell` is the world size of
/// one terminal cell and doubles as the line half-width.
fn cell_color(x: f32, y: f32, view: &RenderFrame, cell: f32) -> (u8, u8, u8) {
    use std::f32::consts::{PI, TAU};

    let r = x.hypot(y);
    let theta = y.atan2(x);

    let shade = (5.0 + view.energy_flash * 0.5) as u8;
    let background = (shade, shade, shade);

    if !view.active {
        // Idle mode, a pulsing circle with a rotating spoke
        let radius = 50.0 + (view.clock * 2.0).sin() * 10.0;
        let on_ring = (r - radius).abs() < cell;
        let on_spoke = r < radius && ang_dist(theta, view.clock) < 0.2;
        if on_ring || on_spoke {
            return (0, 255, 255);
        }
        return background;
    }

    let volume_angle = view.volume.current * TAU - PI;

    // Center dot
    if r < cell * 1.5 {
        return (255, 255, 100);
    }

    // Volume indicator inside the knob
    if r <= KNOB_RADIUS * 0.7 && ang_dist(theta, volume_angle) < 0.25 {
        return (255, 100, 255);
    }

    // Knob rim
    if (r - KNOB_RADIUS).abs() < cell {
        return hsv(view.knob_hue(), 0.8, 0.9);
    }

    // Volume arc, sweeping clockwise from the west seam
    if (r - KNOB_RADIUS * 1.1).abs() < cell && theta <= volume_angle {
        return hsv(view.knob_hue(), 1.0, 0.8);
    }

    // Faint ring once the volume is up
    if view.volume.current > 0.1
        && (r - (KNOB_RADIUS * 1.4 + view.energy_flash * 0.05)).abs() < cell
    {
        return hsv(view.knob_hue(), 0.5, 0.7);
    }

    // Extra ring on a kick
    if view.kick.detected && (r - KNOB_RADIUS * 1.75).abs() < cell {
        return (0, 255, 255);
    }

    // Bars and their inner reflections
    let count = view.bars.len();
    if count > 0 {
        let norm = theta.rem_euclid(TAU);
        let index = ((norm / TAU * count as f32).round() as usize) % count;
        let bar = &view.bars[index];

        if ang_dist(norm, bar.angle) < TAU / count as f32 * 0.4 {
            let saturation =
                helpers::map_range(bar.length, 15.0, 120.0, 60.0, 100.0) / 100.0;
            let brightness =
                helpers::map_range(bar.length, 15.0, 120.0, 40.0, 90.0) / 100.0;

            let outer = CIRCLE_RADIUS + bar.length + view.kick.flash * 0.1;
            if r >= CIRCLE_RADIUS && r <= outer {
                return hsv(view.bar_hue(index), saturation, brightness);
            }

            let reflection = bar.length * 0.4;
            if r < CIRCLE_RADIUS && r >= CIRCLE_RADIUS - reflection {
                return hsv(
                    view.bar_hue(index) + 180.0,
                    saturation * 0.7,
                    brightness * 0.6,
                );
            }
        }
    }

    // Band dots: bass at the bottom, mid top right, high top left
    let bands = view.bands;
    let bass_size = helpers::map_range(bands.bass, 0.0, 255.0, 10.0, 30.0) + view.kick.flash * 0.1;
    if (y - (CIRCLE_RADIUS + 100.0)).hypot(x) < bass_size / 2.0 {
        return (255, 0, 128);
    }
    let mid_size = helpers::map_range(bands.mid, 0.0, 255.0, 8.0, 20.0);
    if (x - CIRCLE_RADIUS * 0.7).hypot(y + CIRCLE_RADIUS * 0.7) < mid_size / 2.0 {
        return (0, 255, 128);
    }
    let high_size = helpers::map_range(bands.high, 0.0, 255.0, 6.0, 16.0);
    if (x + CIRCLE_RADIUS * 0.7).hypot(y + CIRCLE_RADIUS * 0.7) < high_size / 2.0 {
        return (128, 128, 255);
    }

    background
}

fn main() {
    ring_core::default_config();
    ring_core::default_log();

    // Frames {{{
    let mut frames = {
        let deck = ring_core::AudioDeck::builder().build();
        let visualizer = ring_core::RingVisualizer::builder().build();

        ring_core::Frames::new(deck, visualizer, (0.0, 0.0))
    };
    // }}}

    // Config {{{
    let size: usize = ring_core::CONFIG.get_or("term.size", 36);
    let volume: f32 = ring_core::CONFIG.get_or("term.volume", 0.5);

    let frame_time =
        std::time::Duration::from_micros(1000000 / ring_core::CONFIG.get_or("term.fps", 30));
    // }}}

    // World units per cell; cells are two characters wide to come out
    // roughly square
    let scale = 2.0 * WORLD / size as f32;

    match std::env::args().nth(1) {
        Some(path) => {
            if let Err(err) = frames.source_mut().switch_to_file(&path) {
                error!("Cannot open {}: {}", path, err);
                return;
            }
            info!("Playing {}", path);
            frames.apply(Intent::Play);
        }
        None => {
            info!("No file given, starting live capture");
            frames.apply(Intent::ToggleLive);
        }
    }
    frames.apply(Intent::SetVolume(volume));

    print!("\x1B[2J");

    let mut out = String::new();
    loop {
        let start = std::time::Instant::now();

        let frame = frames.next_frame();
        let view = &frame.view;

        out.clear();
        out.push_str("\x1B[H");
        for row in 0..size {
            for col in 0..size {
                let x = (col as f32 - size as f32 / 2.0 + 0.5) * scale;
                let y = (row as f32 - size as f32 / 2.0 + 0.5) * scale;

                let (r, g, b) = cell_color(x, y, view, scale);
                let _ = write!(out, "\x1B[48;2;{};{};{}m  ", r, g, b);
            }
            out.push_str("\x1B[0m\n");
        }

        let mode = if frames.source().is_live() {
            "live"
        } else if view.active {
            "playing"
        } else {
            "idle"
        };
        let _ = write!(
            out,
            "\x1B[K[{:7}] bass {:5.1}  mid {:5.1}  high {:5.1}  vol {:3.0}%{}\n",
            mode,
            view.bands.bass,
            view.bands.mid,
            view.bands.high,
            view.volume.current * 100.0,
            if view.kick.detected { "  KICK" } else { "" },
        );
        print!("{}", out);

        let dur = start.elapsed();
        if dur < frame_time {
            std::thread::sleep(frame_time - dur);
        }
    }
}
