//! Chirp segment synthesis
//!
//! Each byte becomes one segment whose frequency rises linearly from
//! `start_frequency(b)` to `end_frequency(b)`. The phase is evaluated as
//! `2π * f(t) * t` with `t` restarting at zero for every segment, so there is
//! no phase continuity between characters and a click at each boundary is
//! expected.

use crate::config::ChirpConfig;
use std::f64::consts::PI;

/// Fill `out` with the sweep for `byte`, starting at local time zero.
pub fn synthesize_segment(config: &ChirpConfig, byte: u8, out: &mut [f32]) {
    let sample_rate = config.sample_rate as f64;

    for (j, sample) in out.iter_mut().enumerate() {
        let t = j as f64 / sample_rate;
        let angle = 2.0 * PI * config.instantaneous_frequency(byte, t) * t;
        *sample = angle.sin() as f32 * config.amplitude;
    }
}

/// Allocate and synthesize one full character segment for `byte`.
pub fn chirp_segment(config: &ChirpConfig, byte: u8) -> Vec<f32> {
    let mut segment = vec![0.0f32; config.samples_per_char()];
    synthesize_segment(config, byte, &mut segment);
    segment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_length() {
        let config = ChirpConfig::default();
        assert_eq!(chirp_segment(&config, 65).len(), 8820);
    }

    #[test]
    fn test_segment_amplitude() {
        let config = ChirpConfig::default();
        let segment = chirp_segment(&config, 200);
        let peak = segment.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(peak <= 0.5 + 1e-6, "peak {} exceeds amplitude", peak);
        assert!(peak > 0.49, "peak {} far below amplitude", peak);
    }

    #[test]
    fn test_segment_starts_at_zero_phase() {
        let config = ChirpConfig::default();
        let segment = chirp_segment(&config, 0);
        assert_eq!(segment[0], 0.0);
        assert!(segment[1] > 0.0);
    }

    #[test]
    fn test_distinct_bytes_give_distinct_segments() {
        let config = ChirpConfig::default();
        let a = chirp_segment(&config, 65);
        let b = chirp_segment(&config, 66);
        assert_ne!(a, b);
    }

    #[test]
    fn test_synthesize_is_deterministic() {
        let config = ChirpConfig::default();
        let mut first = vec![0.0f32; 256];
        let mut second = vec![1.0f32; 256];
        synthesize_segment(&config, 99, &mut first);
        synthesize_segment(&config, 99, &mut second);
        assert_eq!(first, second);
    }
}
