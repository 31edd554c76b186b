use chirpwave_core::{
    ChirpConfig, Decoder, DecoderConfig, Encoder, FrequencyReference, MatchedFilterDecoder,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmEncoder {
    inner: Encoder,
}

#[wasm_bindgen]
impl WasmEncoder {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmEncoder {
        WasmEncoder {
            inner: Encoder::new(),
        }
    }

    /// Build an encoder for a given output rate (e.g. `AudioContext.sampleRate`)
    #[wasm_bindgen(js_name = withSampleRate)]
    pub fn with_sample_rate(sample_rate: u32) -> Result<WasmEncoder, JsValue> {
        let config = ChirpConfig {
            sample_rate,
            ..ChirpConfig::default()
        };
        Encoder::with_config(config)
            .map(|inner| WasmEncoder { inner })
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Encode text into mono audio samples
    /// Takes a string and returns a Float32Array of audio samples
    #[wasm_bindgen]
    pub fn encode(&self, text: &str) -> Result<Vec<f32>, JsValue> {
        self.inner
            .encode(text)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter, js_name = sampleRate)]
    pub fn sample_rate(&self) -> u32 {
        self.inner.config().sample_rate
    }
}

impl Default for WasmEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-frame detector for a live capture stream
#[wasm_bindgen]
pub struct WasmDecoder {
    inner: Decoder,
}

#[wasm_bindgen]
impl WasmDecoder {
    /// `use_capture_rate` selects the frame's own rate for bin-to-Hz conversion
    /// instead of the fixed 44.1 kHz reference
    #[wasm_bindgen(constructor)]
    pub fn new(use_capture_rate: bool) -> Result<WasmDecoder, JsValue> {
        let reference = if use_capture_rate {
            FrequencyReference::Capture
        } else {
            FrequencyReference::Fixed
        };
        let config = DecoderConfig::default().with_frequency_reference(reference);
        Decoder::with_config(config)
            .map(|inner| WasmDecoder { inner })
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter, js_name = frameSize)]
    pub fn frame_size(&self) -> usize {
        self.inner.frame_size()
    }

    /// Detect one character in a 1024-sample frame
    /// Returns undefined when no character is present
    #[wasm_bindgen]
    pub fn process(&self, frame: &[f32], sample_rate: f64) -> Option<String> {
        self.inner
            .process(frame, sample_rate)
            .map(String::from)
    }
}

/// Whole-recording decoder for buffers aligned to character boundaries
#[wasm_bindgen]
pub struct WasmSegmentDecoder {
    inner: MatchedFilterDecoder,
}

#[wasm_bindgen]
impl WasmSegmentDecoder {
    #[wasm_bindgen(constructor)]
    pub fn new(sample_rate: u32) -> Result<WasmSegmentDecoder, JsValue> {
        let config = ChirpConfig {
            sample_rate,
            ..ChirpConfig::default()
        };
        MatchedFilterDecoder::with_config(config)
            .map(|inner| WasmSegmentDecoder { inner })
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Decode audio samples back to text
    #[wasm_bindgen]
    pub fn decode(&self, samples: &[f32]) -> String {
        self.inner.decode(samples)
    }
}
