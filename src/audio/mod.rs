//! Audio decoding and waveform preprocessing

pub mod decode;
pub mod preprocess;

pub use decode::{decode_file, AudioClip};
pub use preprocess::WaveformPreprocessor;
