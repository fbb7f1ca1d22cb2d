//! Waveform preprocessing - resampling, silence trimming, peak normalization

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::{debug, warn};

use crate::audio::AudioClip;
use crate::config::PreprocessingConfig;
use crate::error::AudioError;

/// Prepares decoded waveforms for classification
///
/// Runs up to three stages over a clip, each toggleable in the config:
/// resample to the classifier's expected rate, trim leading/trailing
/// silence, and normalize to unit peak. The input clip is never mutated.
pub struct WaveformPreprocessor {
    config: PreprocessingConfig,
}

impl WaveformPreprocessor {
    pub fn new(config: PreprocessingConfig) -> Self {
        Self { config }
    }

    /// Run the configured stages and return a new clip
    pub fn process(&self, clip: &AudioClip) -> Result<AudioClip, AudioError> {
        let mut samples = clip.samples.clone();
        let mut sample_rate = clip.sample_rate;

        if self.config.enable_resampling && sample_rate != self.config.target_sample_rate {
            samples = resample(&samples, sample_rate, self.config.target_sample_rate)?;
            sample_rate = self.config.target_sample_rate;
        }

        if self.config.enable_trim {
            let before = samples.len();
            samples = self.trim_silence(samples);
            if samples.len() < before {
                debug!("Trimmed silence: {} -> {} samples", before, samples.len());
            }
        }

        if self.config.enable_normalization {
            normalize(&mut samples);
        }

        Ok(AudioClip::new(samples, sample_rate))
    }

    /// Drop leading and trailing frames whose RMS energy falls more than
    /// the configured threshold below the loudest frame of the clip.
    fn trim_silence(&self, samples: Vec<f32>) -> Vec<f32> {
        if samples.is_empty() {
            return samples;
        }

        let frame_len = self.config.trim_frame_len.clamp(1, samples.len());
        let hop = self.config.trim_hop_len.max(1);

        let mut energies = Vec::new();
        let mut start = 0;
        while start < samples.len() {
            let end = (start + frame_len).min(samples.len());
            let frame = &samples[start..end];
            let rms =
                (frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32).sqrt();
            energies.push(rms);
            start += hop;
        }

        let peak = energies.iter().fold(0.0f32, |a, &b| a.max(b));
        if peak <= 0.0 {
            // Digital silence has no peak to measure against
            return samples;
        }

        let threshold = peak * 10f32.powf(-self.config.trim_threshold_db / 20.0);
        let first = energies.iter().position(|&e| e > threshold);
        let last = energies.iter().rposition(|&e| e > threshold);

        match (first, last) {
            (Some(first), Some(last)) => {
                let lo = first * hop;
                let hi = (last * hop + frame_len).min(samples.len());
                samples[lo..hi].to_vec()
            }
            _ => samples,
        }
    }
}

/// One-shot sinc resample of a whole buffer
fn resample(input: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, AudioError> {
    if input.is_empty() || from_rate == to_rate {
        return Ok(input.to_vec());
    }

    let ratio = to_rate as f64 / from_rate as f64;
    debug!("Resampling: {} Hz -> {} Hz", from_rate, to_rate);

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, input.len(), 1)
        .map_err(|e| AudioError::Resample(e.to_string()))?;

    let waves_in = vec![input.to_vec()];
    let mut waves_out = resampler
        .process(&waves_in, None)
        .map_err(|e| AudioError::Resample(e.to_string()))?;

    Ok(waves_out.remove(0))
}

/// Scale samples so the peak absolute amplitude is exactly 1.0
fn normalize(samples: &mut [f32]) {
    let peak = samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0f32, |a, b| a.max(b));

    if peak < 1e-9 {
        warn!("Skipping normalization of silent clip");
        return;
    }

    let scale = 1.0 / peak;
    for sample in samples.iter_mut() {
        *sample *= scale;
    }
}
