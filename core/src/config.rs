use crate::{
    AMPLITUDE, CHIRP_RANGE_HZ, DURATION_PER_CHAR_SECS, FFT_SIZE, FREQ_START_HZ, FREQ_STEP_HZ,
    SAMPLE_RATE,
};

/// Parameters shared by the encoder and the segment decoder.
///
/// Byte `b` is sent as a linear sweep from `f_start + b * f_step` up by
/// `chirp_range` Hz, lasting `duration_per_char` seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct ChirpConfig {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Length of one character segment in seconds
    pub duration_per_char: f64,
    /// Start frequency of byte 0 in Hz
    pub f_start: f64,
    /// Start frequency increment per byte value in Hz
    pub f_step: f64,
    /// Sweep width of each segment in Hz
    pub chirp_range: f64,
    /// Peak amplitude of the synthesized sweep
    pub amplitude: f32,
}

impl Default for ChirpConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            duration_per_char: DURATION_PER_CHAR_SECS,
            f_start: FREQ_START_HZ,
            f_step: FREQ_STEP_HZ,
            chirp_range: CHIRP_RANGE_HZ,
            amplitude: AMPLITUDE,
        }
    }
}

impl ChirpConfig {
    /// Check that the parameters describe a synthesizable signal.
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 {
            return Err("sample rate must be positive".to_string());
        }
        if !self.duration_per_char.is_finite() || self.duration_per_char <= 0.0 {
            return Err(format!(
                "duration per character must be positive, got {}",
                self.duration_per_char
            ));
        }
        if !self.f_start.is_finite() || !self.chirp_range.is_finite() {
            return Err("frequencies must be finite".to_string());
        }
        if !self.f_step.is_finite() || self.f_step <= 0.0 {
            return Err(format!("frequency step must be positive, got {}", self.f_step));
        }
        if !(self.amplitude > 0.0 && self.amplitude <= 1.0) {
            return Err(format!("amplitude must be in (0, 1], got {}", self.amplitude));
        }
        if self.samples_per_char() == 0 {
            return Err("character segment is shorter than one sample".to_string());
        }
        Ok(())
    }

    /// Samples in one character segment: round(sample_rate * duration_per_char)
    pub fn samples_per_char(&self) -> usize {
        (self.sample_rate as f64 * self.duration_per_char).round() as usize
    }

    pub fn start_frequency(&self, byte: u8) -> f64 {
        self.f_start + byte as f64 * self.f_step
    }

    pub fn end_frequency(&self, byte: u8) -> f64 {
        self.start_frequency(byte) + self.chirp_range
    }

    /// Frequency of the linear sweep for `byte` at `t` seconds into its segment.
    pub fn instantaneous_frequency(&self, byte: u8, t: f64) -> f64 {
        let f0 = self.start_frequency(byte);
        let f1 = self.end_frequency(byte);
        f0 + (f1 - f0) * t / self.duration_per_char
    }
}

/// Which sample rate the spectral decoder uses to turn a bin index into Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrequencyReference {
    /// Always use `DecoderConfig::reference_rate`, whatever rate the frame
    /// was captured at.
    #[default]
    Fixed,
    /// Use the rate passed alongside each frame.
    Capture,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecoderConfig {
    /// Analysis window and FFT length
    pub fft_size: usize,
    /// Rate used for bin-to-frequency conversion under `FrequencyReference::Fixed`
    pub reference_rate: f64,
    /// Frequency that maps to byte 0
    pub f_start: f64,
    /// Hz per byte value
    pub f_step: f64,
    pub frequency_reference: FrequencyReference,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            fft_size: FFT_SIZE,
            reference_rate: SAMPLE_RATE as f64,
            f_start: FREQ_START_HZ,
            f_step: FREQ_STEP_HZ,
            frequency_reference: FrequencyReference::Fixed,
        }
    }
}

impl DecoderConfig {
    /// Decoder settings matching the byte mapping of an encoder configuration.
    pub fn from_chirp(chirp: &ChirpConfig) -> Self {
        Self {
            reference_rate: chirp.sample_rate as f64,
            f_start: chirp.f_start,
            f_step: chirp.f_step,
            ..Self::default()
        }
    }

    pub fn with_frequency_reference(mut self, reference: FrequencyReference) -> Self {
        self.frequency_reference = reference;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.fft_size < 2 || !self.fft_size.is_power_of_two() {
            return Err(format!("FFT size must be a power of two, got {}", self.fft_size));
        }
        if !self.reference_rate.is_finite() || self.reference_rate <= 0.0 {
            return Err(format!(
                "reference rate must be positive, got {}",
                self.reference_rate
            ));
        }
        if !self.f_start.is_finite() {
            return Err("start frequency must be finite".to_string());
        }
        if !self.f_step.is_finite() || self.f_step <= 0.0 {
            return Err(format!("frequency step must be positive, got {}", self.f_step));
        }
        Ok(())
    }

    /// Number of non-redundant bins searched for the peak.
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chirp_config() {
        let config = ChirpConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.samples_per_char(), 8820);
    }

    #[test]
    fn test_byte_frequency_mapping() {
        let config = ChirpConfig::default();
        for byte in [0u8, 1, 65, 128, 255] {
            assert_eq!(config.start_frequency(byte), 1000.0 + byte as f64);
            assert_eq!(config.end_frequency(byte), config.start_frequency(byte) + 500.0);
        }
    }

    #[test]
    fn test_sweep_endpoints() {
        let config = ChirpConfig::default();
        for byte in [0u8, 42, 200, 255] {
            let start = config.instantaneous_frequency(byte, 0.0);
            let end = config.instantaneous_frequency(byte, config.duration_per_char);
            assert!((start - config.start_frequency(byte)).abs() < 1e-9);
            assert!((end - config.end_frequency(byte)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_sweep_is_linear() {
        let config = ChirpConfig::default();
        let quarter = config.instantaneous_frequency(10, 0.05);
        let half = config.instantaneous_frequency(10, 0.1);
        assert!((quarter - 1135.0).abs() < 1e-9);
        assert!((half - 1260.0).abs() < 1e-9);
    }

    #[test]
    fn test_chirp_config_rejects_bad_values() {
        let bad = [
            ChirpConfig { sample_rate: 0, ..Default::default() },
            ChirpConfig { duration_per_char: 0.0, ..Default::default() },
            ChirpConfig { duration_per_char: f64::NAN, ..Default::default() },
            ChirpConfig { f_step: 0.0, ..Default::default() },
            ChirpConfig { amplitude: 1.5, ..Default::default() },
            ChirpConfig { amplitude: 0.0, ..Default::default() },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "accepted {:?}", config);
        }
    }

    #[test]
    fn test_decoder_config_from_chirp() {
        let chirp = ChirpConfig {
            sample_rate: 48000,
            f_step: 2.0,
            ..Default::default()
        };
        let config = DecoderConfig::from_chirp(&chirp);
        assert_eq!(config.reference_rate, 48000.0);
        assert_eq!(config.f_step, 2.0);
        assert_eq!(config.fft_size, 1024);
        assert_eq!(config.num_bins(), 512);
        assert_eq!(config.frequency_reference, FrequencyReference::Fixed);
    }

    #[test]
    fn test_decoder_config_rejects_non_power_of_two() {
        let config = DecoderConfig { fft_size: 1000, ..Default::default() };
        assert!(config.validate().is_err());
    }
}
