use crate::chirp::synthesize_segment;
use crate::config::ChirpConfig;
use crate::error::{EncodeError, EncodeResult};

/// Text to PCM chirp encoder
///
/// Stateless between calls: every `encode` produces a fresh buffer.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    config: ChirpConfig,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ChirpConfig) -> EncodeResult<Self> {
        config.validate().map_err(EncodeError::InvalidConfig)?;
        log::debug!(
            "chirp encoder: {} Hz, {} samples/char, f_start={} Hz, step={} Hz, range={} Hz",
            config.sample_rate,
            config.samples_per_char(),
            config.f_start,
            config.f_step,
            config.chirp_range
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChirpConfig {
        &self.config
    }

    /// Encode the UTF-8 bytes of `text`, one chirp segment per byte.
    pub fn encode(&self, text: &str) -> EncodeResult<Vec<f32>> {
        self.encode_bytes(text.as_bytes())
    }

    /// Encode raw byte values. Returns a mono buffer of
    /// `bytes.len() * samples_per_char` samples.
    pub fn encode_bytes(&self, bytes: &[u8]) -> EncodeResult<Vec<f32>> {
        let char_samples = self.config.samples_per_char();
        let total_samples = char_samples
            .checked_mul(bytes.len())
            .ok_or(EncodeError::BufferAllocationFailed { samples: usize::MAX })?;

        let mut samples: Vec<f32> = Vec::new();
        samples
            .try_reserve_exact(total_samples)
            .map_err(|_| EncodeError::BufferAllocationFailed { samples: total_samples })?;
        samples.resize(total_samples, 0.0);

        for (segment, &byte) in samples.chunks_exact_mut(char_samples).zip(bytes) {
            synthesize_segment(&self.config, byte, segment);
        }

        log::trace!("encoded {} bytes into {} samples", bytes.len(), total_samples);
        Ok(samples)
    }
}
