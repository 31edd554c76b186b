use crate::config::{DecoderConfig, FrequencyReference};
use crate::error::{DecodeError, DecodeResult};
use crate::spectrum::{bin_to_freq, hann_window, peak_bin, power_spectrum};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Single-frame spectral symbol detector
///
/// Holds a forward FFT plan and a Hann window, both built once in the
/// constructor and never modified afterwards. `process` takes `&self` and
/// keeps no state between calls, so one decoder can be shared between
/// threads; both resources are released when the decoder is dropped.
pub struct Decoder {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    config: DecoderConfig,
}

impl Decoder {
    pub fn new() -> Self {
        Self::build(DecoderConfig::default())
    }

    pub fn with_config(config: DecoderConfig) -> DecodeResult<Self> {
        config.validate().map_err(DecodeError::InvalidConfig)?;
        Ok(Self::build(config))
    }

    fn build(config: DecoderConfig) -> Self {
        let fft = FftPlanner::<f32>::new().plan_fft_forward(config.fft_size);
        let window = hann_window(config.fft_size);
        log::debug!(
            "spectral decoder: fft_size={}, reference_rate={} Hz, reference={:?}",
            config.fft_size,
            config.reference_rate,
            config.frequency_reference
        );
        Self { fft, window, config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Samples consumed per call.
    pub fn frame_size(&self) -> usize {
        self.config.fft_size
    }

    /// Frequency of the strongest bin in the first `fft_size` samples of `frame`.
    ///
    /// Ties resolve to the lowest bin, so a silent frame reports 0 Hz.
    pub fn peak_frequency(&self, frame: &[f32], sample_rate: f64) -> DecodeResult<f64> {
        let fft_size = self.config.fft_size;
        if frame.len() < fft_size {
            return Err(DecodeError::NoInputData {
                expected: fft_size,
                actual: frame.len(),
            });
        }

        let rate = match self.config.frequency_reference {
            FrequencyReference::Fixed => self.config.reference_rate,
            FrequencyReference::Capture => {
                if !sample_rate.is_finite() || sample_rate <= 0.0 {
                    return Err(DecodeError::InvalidConfig(format!(
                        "capture sample rate must be positive, got {}",
                        sample_rate
                    )));
                }
                sample_rate
            }
        };

        let mut buffer: Vec<Complex<f32>> = frame[..fft_size]
            .iter()
            .zip(&self.window)
            .map(|(&s, &w)| Complex::new(s * w, 0.0))
            .collect();
        self.fft.process(&mut buffer);

        let magnitudes = power_spectrum(&buffer, self.config.num_bins());
        let max_index = peak_bin(&magnitudes).unwrap_or(0);

        Ok(bin_to_freq(max_index, rate, fft_size))
    }

    /// Detect the byte carried by one frame.
    pub fn try_process(&self, frame: &[f32], sample_rate: f64) -> DecodeResult<u8> {
        let frequency = self.peak_frequency(frame, sample_rate)?;
        let code = ((frequency - self.config.f_start) / self.config.f_step).round();

        if (0.0..256.0).contains(&code) {
            Ok(code as u8)
        } else {
            Err(DecodeError::NoDetection { frequency })
        }
    }

    /// Detect one character from a frame, or `None` when nothing is present.
    ///
    /// The byte is taken as a complete Unicode scalar (U+0000..=U+00FF), so
    /// multi-byte UTF-8 text does not survive the trip.
    pub fn process(&self, frame: &[f32], sample_rate: f64) -> Option<char> {
        match self.try_process(frame, sample_rate) {
            Ok(byte) => {
                log::trace!("detected byte {} ({:?})", byte, char::from(byte));
                Some(char::from(byte))
            }
            Err(DecodeError::NoDetection { frequency }) => {
                log::trace!("no symbol, peak at {:.1} Hz", frequency);
                None
            }
            Err(e) => {
                log::debug!("frame skipped: {}", e);
                None
            }
        }
    }

    /// Run `process` over consecutive non-overlapping frames of `samples` and
    /// collect every detected character. A trailing partial frame is ignored.
    pub fn scan(&self, samples: &[f32], sample_rate: f64) -> String {
        samples
            .chunks_exact(self.config.fft_size)
            .filter_map(|frame| self.process(frame, sample_rate))
            .collect()
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}
