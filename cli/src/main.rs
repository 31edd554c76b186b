use chirpwave_core::{
    ChirpConfig, Decoder, DecoderConfig, Encoder, FrequencyReference, MatchedFilterDecoder,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use hound::WavSpec;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Parser)]
#[command(name = "chirpwave")]
#[command(about = "Send text as audible frequency sweeps and read it back")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode text to a WAV audio file
    Encode {
        /// Text to encode
        text: String,

        /// Output WAV file
        #[arg(short, long, value_name = "OUTPUT.WAV", default_value = "chirp_output.wav")]
        output: PathBuf,

        #[command(flatten)]
        chirp: ChirpArgs,
    },

    /// Decode a WAV audio file back to text
    Decode {
        /// Input WAV file
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,

        /// Detection method
        #[arg(short, long, value_enum, default_value_t = Method::Matched)]
        method: Method,

        /// Spectral method: convert bins to Hz with the file's sample rate
        /// instead of the configured rate
        #[arg(long)]
        capture_rate: bool,

        #[command(flatten)]
        chirp: ChirpArgs,
    },
}

#[derive(Args)]
struct ChirpArgs {
    /// Duration per character (s)
    #[arg(short, long, default_value_t = chirpwave_core::DURATION_PER_CHAR_SECS)]
    duration: f64,

    /// Starting frequency (Hz)
    #[arg(long, default_value_t = chirpwave_core::FREQ_START_HZ)]
    fstart: f64,

    /// Frequency step per byte value (Hz)
    #[arg(long, default_value_t = chirpwave_core::FREQ_STEP_HZ)]
    fstep: f64,

    /// Chirp range (Hz)
    #[arg(long, default_value_t = chirpwave_core::CHIRP_RANGE_HZ)]
    range: f64,

    /// Sample rate for generated audio (Hz)
    #[arg(long, default_value_t = chirpwave_core::SAMPLE_RATE)]
    sample_rate: u32,
}

impl ChirpArgs {
    fn to_config(&self) -> ChirpConfig {
        ChirpConfig {
            sample_rate: self.sample_rate,
            duration_per_char: self.duration,
            f_start: self.fstart,
            f_step: self.fstep,
            chirp_range: self.range,
            ..ChirpConfig::default()
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Method {
    /// Correlate each character segment against all byte templates
    Matched,
    /// Strongest FFT bin of each 1024-sample frame
    Spectral,
}

#[derive(Debug, Error)]
enum WavError {
    #[error("Unsupported bit depth: {0}")]
    UnsupportedBitDepth(u16),

    #[error("WAV file has no channels")]
    NoChannels,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { text, output, chirp } => encode_command(&text, &output, &chirp)?,
        Commands::Decode {
            input,
            method,
            capture_rate,
            chirp,
        } => decode_command(&input, method, capture_rate, &chirp)?,
    }

    Ok(())
}

fn encode_command(
    text: &str,
    output_path: &Path,
    args: &ChirpArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.to_config();
    let encoder = Encoder::with_config(config)?;
    let samples = encoder.encode(text)?;
    println!(
        "Encoded {} bytes to {} audio samples",
        text.len(),
        samples.len()
    );

    // Write WAV file (16-bit PCM), scaled so the loudest sample hits full scale
    let spec = WavSpec {
        channels: 1,
        sample_rate: encoder.config().sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let peak = samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    let gain = if peak > 0.0 { 1.0 / peak } else { 1.0 };

    let file = File::create(output_path)?;
    let mut writer = hound::WavWriter::new(file, spec)?;
    for sample in samples {
        let clamped = (sample * gain).clamp(-1.0, 1.0);
        writer.write_sample((clamped * 32767.0) as i16)?;
    }
    writer.finalize()?;

    println!("Generated chirp audio: {}", output_path.display());
    Ok(())
}

fn decode_command(
    input_path: &Path,
    method: Method,
    capture_rate: bool,
    args: &ChirpArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let (samples, sample_rate) = read_wav(input_path)?;
    println!("Extracted {} samples at {} Hz", samples.len(), sample_rate);

    // Segments must be cut at the rate the file was recorded with
    let config = ChirpConfig {
        sample_rate,
        ..args.to_config()
    };

    let text = match method {
        Method::Matched => {
            let decoder = MatchedFilterDecoder::with_config(config)?;
            decoder.decode(&samples)
        }
        Method::Spectral => {
            let reference = if capture_rate {
                FrequencyReference::Capture
            } else {
                FrequencyReference::Fixed
            };
            let decoder_config = DecoderConfig {
                f_start: config.f_start,
                f_step: config.f_step,
                ..DecoderConfig::default()
            };
            let decoder =
                Decoder::with_config(decoder_config.with_frequency_reference(reference))?;
            decoder.scan(&samples, sample_rate as f64)
        }
    };

    println!("Decoded text: {}", text);
    Ok(())
}

/// Read channel 0 of a WAV file as peak-normalized f32 samples.
fn read_wav(path: &Path) -> Result<(Vec<f32>, u32), Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let mut reader = hound::WavReader::new(file)?;

    let spec = reader.spec();
    log::debug!(
        "Read WAV: {} Hz, {} channels, {} bits",
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample
    );
    if spec.channels == 0 {
        return Err(WavError::NoChannels.into());
    }

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => {
            let int_samples: Result<Vec<i16>, _> = reader.samples::<i16>().collect();
            int_samples?
                .into_iter()
                .map(|s| s as f32 / 32768.0)
                .collect()
        }
        (hound::SampleFormat::Float, 32) => {
            let float_samples: Result<Vec<f32>, _> = reader.samples::<f32>().collect();
            float_samples?
        }
        (_, bits) => return Err(WavError::UnsupportedBitDepth(bits).into()),
    };

    let mut samples: Vec<f32> = interleaved
        .into_iter()
        .step_by(spec.channels as usize)
        .collect();

    let peak = samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    if peak > 0.0 {
        samples.iter_mut().for_each(|s| *s /= peak);
    }

    Ok((samples, spec.sample_rate))
}
