fn main() {
    ring_core::default_log();
    ring_core::default_config();

    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("Usage: levels <file.wav>");
            return;
        }
    };

    let mut deck = ring_core::AudioDeck::builder().build();
    if let Err(err) = deck.switch_to_file(&path) {
        eprintln!("Cannot open {}: {}", path, err);
        return;
    }

    let visualizer = ring_core::RingVisualizer::builder().build();
    let mut frames = ring_core::Frames::new(deck, visualizer, (0.0, 0.0));

    frames.apply(ring_core::Intent::Play);

    for frame in frames.iter() {
        if !frame.view.active {
            break;
        }

        let bands = frame.view.bands;
        let meter: String = std::iter::repeat('#')
            .take((bands.bass / 4.0) as usize)
            .collect();
        let kick = if frame.view.kick.detected { " KICK" } else { "" };

        println!(
            "[{:6.1}s] {:64}{} (mid {:5.1}, high {:5.1})",
            frame.time, meter, kick, bands.mid, bands.high,
        );

        std::thread::sleep(std::time::Duration::from_millis(30));
    }
}
