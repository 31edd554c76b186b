//! Acoustic chirp modem
//!
//! Each byte of a text is sent as a 200 ms linear frequency sweep starting at
//! 1000 Hz + byte value. Reception works on 1024-sample frames: Hann window,
//! FFT, strongest bin, bin frequency back to a byte.

pub mod error;
pub mod config;
pub mod chirp;
pub mod spectrum;
pub mod encoder;
pub mod decoder;
pub mod matched_filter;

pub use config::{ChirpConfig, DecoderConfig, FrequencyReference};
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{DecodeError, DecodeResult, EncodeError, EncodeResult};
pub use matched_filter::MatchedFilterDecoder;

// Transmit configuration
pub const SAMPLE_RATE: u32 = 44100;
pub const DURATION_PER_CHAR_SECS: f64 = 0.2;
pub const SAMPLES_PER_CHAR: usize = 8820; // SAMPLE_RATE * DURATION_PER_CHAR_SECS
pub const AMPLITUDE: f32 = 0.5;

// Byte to frequency mapping
pub const FREQ_START_HZ: f64 = 1000.0;
pub const FREQ_STEP_HZ: f64 = 1.0; // Hz per byte value
pub const CHIRP_RANGE_HZ: f64 = 500.0;

// Receive configuration
pub const FFT_SIZE: usize = 1024;
pub const NUM_BINS: usize = FFT_SIZE / 2; // 512
