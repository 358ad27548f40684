use std::path::PathBuf;
use thiserror::Error;
use crate::ecg::lead::LeadLayout;
use crate::logging::Severity;
#[derive(Debug, Error)]
pub enum EcgError {
    #[error("{} is not a valid DICOM file", .0.display())]
    InvalidHeader(PathBuf),
    #[error("{} is not a ECG file (modality {modality:?})", .path.display())]
    WrongModality { path: PathBuf, modality: String },
    #[error("dataset does not contain Waveform Sequence (5400,0100)")]
    MissingWaveformSequence,
    #[error("malformed waveform record: {channels} channels x {samples} samples, buffer holds {actual} values")]
    Decode {
        channels: u16,
        samples: u64,
        actual: usize,
    },
    #[error("viewport {width}x{height} cannot hold an ECG grid")]
    Layout { width: f32, height: f32 },
    #[error("cannot map samples of an empty waveform")]
    Mapping,
    #[error("lead layout {0} is not implemented")]
    LeadLayoutNotImplemented(LeadLayout),
    #[error("failed to read dataset: {0}")]
    Dataset(String),
    #[error("a dataset is already being loaded from {}", .0.display())]
    LoadInProgress(PathBuf),
    #[error("loader for {} stopped without a result", .0.display())]
    LoaderFailed(PathBuf),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl EcgError {
    /// Level at which the failure is reported to the user log.
    pub fn severity(&self) -> Severity {
        match self {
            EcgError::InvalidHeader(_) => Severity::Warn,
            EcgError::WrongModality { .. } | EcgError::MissingWaveformSequence => Severity::Info,
            _ => Severity::Error,
        }
    }
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for EcgError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        EcgError::Plot(format!("{value:?}"))
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn rejection_levels_follow_taxonomy() {
        assert_eq!(
            EcgError::InvalidHeader("a.dcm".into()).severity(),
            Severity::Warn
        );
        let wrong = EcgError::WrongModality {
            path: "a.dcm".into(),
            modality: "XA".into(),
        };
        assert_eq!(wrong.severity(), Severity::Info);
        assert_eq!(EcgError::MissingWaveformSequence.severity(), Severity::Info);
        assert_eq!(EcgError::Mapping.severity(), Severity::Error);
    }
    #[test]
    fn decode_message_names_the_shape() {
        let err = EcgError::Decode {
            channels: 12,
            samples: 500,
            actual: 10,
        };
        assert_eq!(
            err.to_string(),
            "malformed waveform record: 12 channels x 500 samples, buffer holds 10 values"
        );
    }
}
