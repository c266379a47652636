//! Small helpers shared across the crate
use std::time;

/// Calculate a timestamp from a fixed start time.
///
/// Timestamps are in seconds.
///
/// # Example
/// ```
/// let start = std::time::Instant::now();
///
/// // Get the current time
/// let now = ring_core::helpers::time(start);
/// ```
pub fn time(start: time::Instant) -> f32 {
    start.elapsed().as_secs_f32()
}

/// Move `from` towards `to` by the given factor.
///
/// A factor of `0.0` stays at `from`, a factor of `1.0` jumps straight
/// to `to`.  All smoothing in this crate is built on this.
pub fn lerp(from: f32, to: f32, factor: f32) -> f32 {
    from + (to - from) * factor
}

/// Linearly map `value` from one range to another.
///
/// The result is *not* clamped; callers that need hard limits clamp
/// themselves.
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    out_min + (value - in_min) / (in_max - in_min) * (out_max - out_min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(2.0, 10.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(2.0, 10.0, 0.5), 6.0);
    }

    #[test]
    fn map_range_basic() {
        assert_eq!(map_range(0.5, 0.0, 1.0, 0.0, 100.0), 50.0);
        assert_eq!(map_range(127.5, 0.0, 255.0, 15.0, 120.0), 67.5);
    }

    #[test]
    fn map_range_does_not_clamp() {
        assert_eq!(map_range(2.0, 0.0, 1.0, 0.0, 10.0), 20.0);
        assert_eq!(map_range(-1.0, 0.0, 1.0, 0.0, 10.0), -10.0);
    }
}
