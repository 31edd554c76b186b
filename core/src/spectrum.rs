use rustfft::num_complex::Complex;
use std::cmp::Ordering;
use std::f32::consts::PI;

/// Periodic Hann window: 0.5 * (1 - cos(2πn/N))
pub fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|n| {
            let x = 2.0 * PI * n as f32 / size as f32;
            0.5 * (1.0 - x.cos())
        })
        .collect()
}

/// Squared magnitudes of the first `num_bins` bins.
///
/// Only the arg-max is ever used, so the square root is skipped.
pub fn power_spectrum(spectrum: &[Complex<f32>], num_bins: usize) -> Vec<f32> {
    spectrum
        .iter()
        .take(num_bins)
        .map(|c| c.norm_sqr())
        .collect()
}

/// Index of the largest value, taking the lowest index on ties.
///
/// NaN entries never win unless they come first. Returns `None` for an
/// empty slice.
pub fn peak_bin(magnitudes: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &m) in magnitudes.iter().enumerate() {
        let better = match best {
            None => true,
            Some((_, current)) => m.partial_cmp(&current) == Some(Ordering::Greater),
        };
        if better {
            best = Some((i, m));
        }
    }
    best.map(|(i, _)| i)
}

/// Centre frequency of `bin` for an FFT of `fft_size` at `sample_rate`.
pub fn bin_to_freq(bin: usize, sample_rate: f64, fft_size: usize) -> f64 {
    bin as f64 * sample_rate / fft_size as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_window() {
        let window = hann_window(4);
        assert_eq!(window.len(), 4);
        assert!(window[0].abs() < 1e-6);
        assert!((window[1] - 0.5).abs() < 1e-6);
        assert!((window[2] - 1.0).abs() < 1e-6);
        assert!((window[3] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_hann_window_symmetry() {
        let window = hann_window(1024);
        for n in 1..512 {
            assert!((window[n] - window[1024 - n]).abs() < 1e-5);
        }
    }

    #[test]
    fn test_power_spectrum_truncates() {
        let spectrum = vec![Complex::new(3.0, 4.0); 8];
        let power = power_spectrum(&spectrum, 4);
        assert_eq!(power, vec![25.0; 4]);
    }

    #[test]
    fn test_peak_bin_first_occurrence() {
        assert_eq!(peak_bin(&[1.0, 3.0, 3.0, 2.0]), Some(1));
        assert_eq!(peak_bin(&[5.0, 5.0, 5.0]), Some(0));
        assert_eq!(peak_bin(&[0.0, 1.0, 2.0, 7.0]), Some(3));
    }

    #[test]
    fn test_peak_bin_empty() {
        assert_eq!(peak_bin(&[]), None);
    }

    #[test]
    fn test_peak_bin_all_zero() {
        assert_eq!(peak_bin(&[0.0; 512]), Some(0));
    }

    #[test]
    fn test_peak_bin_ignores_nan() {
        assert_eq!(peak_bin(&[1.0, f32::NAN, 2.0]), Some(2));
    }

    #[test]
    fn test_bin_to_freq() {
        assert_eq!(bin_to_freq(0, 44100.0, 1024), 0.0);
        assert!((bin_to_freq(25, 44100.0, 1024) - 1076.66015625).abs() < 1e-9);
        assert_eq!(bin_to_freq(512, 44100.0, 1024), 22050.0);
    }
}
