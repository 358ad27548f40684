// src/types.rs
use std::path::PathBuf;

use crate::ecg::{EcgError, RawWaveformRecord};

/// Posted by the loader thread when a dataset read finishes, successfully or not.
#[derive(Debug)]
pub struct LoadOutcome {
    pub path: PathBuf,
    /// `Ok(None)`: the waveform sequence was empty.
    pub result: Result<Option<RawWaveformRecord>, EcgError>,
}
