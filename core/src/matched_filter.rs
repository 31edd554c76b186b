//! Segment-aligned matched-filter decoder
//!
//! Correlates each full character segment against one template per byte
//! value. Unlike the single-frame spectral detector, this recovers every byte
//! exactly when the input is aligned to segment boundaries and was produced
//! with the same `ChirpConfig`.

use crate::chirp::chirp_segment;
use crate::config::ChirpConfig;
use crate::error::{DecodeError, DecodeResult};
use crate::spectrum::peak_bin;

pub struct MatchedFilterDecoder {
    config: ChirpConfig,
    /// One unit-norm template per byte value, indexed by byte
    templates: Vec<Vec<f32>>,
}

impl MatchedFilterDecoder {
    pub fn new() -> Self {
        Self::build(ChirpConfig::default())
    }

    pub fn with_config(config: ChirpConfig) -> DecodeResult<Self> {
        config.validate().map_err(DecodeError::InvalidConfig)?;
        Ok(Self::build(config))
    }

    fn build(config: ChirpConfig) -> Self {
        let templates = (0..=u8::MAX)
            .map(|byte| {
                let mut template = chirp_segment(&config, byte);
                normalize(&mut template);
                template
            })
            .collect();
        log::debug!(
            "matched filter decoder: 256 templates of {} samples",
            config.samples_per_char()
        );
        Self { config, templates }
    }

    pub fn config(&self) -> &ChirpConfig {
        &self.config
    }

    pub fn segment_len(&self) -> usize {
        self.config.samples_per_char()
    }

    /// Best-matching byte for one segment. Extra trailing samples are ignored.
    ///
    /// A segment with no energy yields `NoDetection`.
    pub fn detect_segment(&self, segment: &[f32]) -> DecodeResult<u8> {
        let len = self.segment_len();
        if segment.len() < len {
            return Err(DecodeError::NoInputData {
                expected: len,
                actual: segment.len(),
            });
        }

        let mut chunk = segment[..len].to_vec();
        if !normalize(&mut chunk) {
            return Err(DecodeError::NoDetection { frequency: 0.0 });
        }

        let correlations: Vec<f32> = self
            .templates
            .iter()
            .map(|template| dot(template, &chunk))
            .collect();

        let best = peak_bin(&correlations).unwrap_or(0);
        log::trace!("segment matched byte {} (corr {:.3})", best, correlations[best]);
        Ok(best as u8)
    }

    /// Decode every full segment of `samples` into bytes. Silent segments
    /// and a trailing partial segment produce nothing.
    pub fn decode_bytes(&self, samples: &[f32]) -> Vec<u8> {
        samples
            .chunks_exact(self.segment_len())
            .filter_map(|segment| self.detect_segment(segment).ok())
            .collect()
    }

    /// Decode every full segment, each byte becoming one character.
    pub fn decode(&self, samples: &[f32]) -> String {
        self.decode_bytes(samples)
            .into_iter()
            .map(char::from)
            .collect()
    }
}

impl Default for MatchedFilterDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Scale to unit L2 norm. Returns false, leaving `samples` untouched, when
/// the norm is zero.
fn normalize(samples: &mut [f32]) -> bool {
    let norm = samples
        .iter()
        .map(|&s| (s as f64) * (s as f64))
        .sum::<f64>()
        .sqrt();
    if norm == 0.0 || !norm.is_finite() {
        return false;
    }
    let scale = (1.0 / norm) as f32;
    samples.iter_mut().for_each(|s| *s *= scale);
    true
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        let mut v = vec![3.0, 4.0];
        assert!(normalize(&mut v));
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);

        let mut zeros = vec![0.0; 4];
        assert!(!normalize(&mut zeros));
        assert_eq!(zeros, vec![0.0; 4]);
    }

    #[test]
    fn test_every_byte_matches_its_template() {
        let decoder = MatchedFilterDecoder::new();
        let config = ChirpConfig::default();
        for byte in (0..=255u8).step_by(17) {
            let segment = chirp_segment(&config, byte);
            assert_eq!(decoder.detect_segment(&segment), Ok(byte));
        }
    }

    #[test]
    fn test_neighbouring_bytes_are_separated() {
        let decoder = MatchedFilterDecoder::new();
        let config = ChirpConfig::default();
        for byte in [64u8, 65, 66] {
            let segment = chirp_segment(&config, byte);
            assert_eq!(decoder.detect_segment(&segment), Ok(byte));
        }
    }

    #[test]
    fn test_amplitude_does_not_matter() {
        let decoder = MatchedFilterDecoder::new();
        let config = ChirpConfig::default();
        let segment: Vec<f32> = chirp_segment(&config, b'q').iter().map(|s| s * 0.01).collect();
        assert_eq!(decoder.detect_segment(&segment), Ok(b'q'));
    }

    #[test]
    fn test_silent_segment() {
        let decoder = MatchedFilterDecoder::new();
        assert!(matches!(
            decoder.detect_segment(&vec![0.0; 8820]),
            Err(DecodeError::NoDetection { .. })
        ));
        assert!(decoder.decode(&vec![0.0; 8820 * 2]).is_empty());
    }

    #[test]
    fn test_short_segment() {
        let decoder = MatchedFilterDecoder::new();
        assert_eq!(
            decoder.detect_segment(&[0.5; 10]),
            Err(DecodeError::NoInputData { expected: 8820, actual: 10 })
        );
    }

    #[test]
    fn test_trailing_partial_segment_ignored() {
        let decoder = MatchedFilterDecoder::new();
        let config = ChirpConfig::default();
        let mut samples = chirp_segment(&config, b'x');
        samples.extend_from_slice(&chirp_segment(&config, b'y')[..4000]);
        assert_eq!(decoder.decode(&samples), "x");
    }
}
