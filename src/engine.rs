// src/engine.rs
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use crate::ecg::{extract_record, DatasetReader, EcgError, RawWaveformRecord};
use crate::types::LoadOutcome;

/// Header check, parse and record extraction for one file. Runs to completion; there is no
/// way to abort a parse once it started.
pub fn load<R: DatasetReader>(
    reader: &R,
    path: &Path,
) -> Result<Option<RawWaveformRecord>, EcgError> {
    if !reader.has_valid_header(path) {
        return Err(EcgError::InvalidHeader(path.to_path_buf()));
    }
    let dataset = reader.open(path)?;
    extract_record(&dataset, path)
}

struct PendingLoad {
    path: PathBuf,
    rx: Receiver<LoadOutcome>,
}

/// Reads datasets off the GUI thread, one at a time.
///
/// A second request while one is pending is refused with [`EcgError::LoadInProgress`];
/// the host disables its open actions while [`DatasetLoader::is_loading`] is true.
pub struct DatasetLoader<R: DatasetReader> {
    reader: Arc<R>,
    pending: Option<PendingLoad>,
}

impl<R: DatasetReader> DatasetLoader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Arc::new(reader),
            pending: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn start(&mut self, path: PathBuf) -> Result<(), EcgError> {
        if let Some(pending) = &self.pending {
            return Err(EcgError::LoadInProgress(pending.path.clone()));
        }
        let (tx, rx) = channel();
        let reader = Arc::clone(&self.reader);
        let worker_path = path.clone();
        thread::spawn(move || {
            let result = load(reader.as_ref(), &worker_path);
            tx.send(LoadOutcome {
                path: worker_path,
                result,
            })
            .ok();
        });
        self.pending = Some(PendingLoad { path, rx });
        Ok(())
    }

    /// Non-blocking; called once per frame by the host.
    pub fn poll(&mut self) -> Option<LoadOutcome> {
        let pending = self.pending.as_ref()?;
        match pending.rx.try_recv() {
            Ok(outcome) => {
                self.pending = None;
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => self.pending.take().map(Self::abandoned),
        }
    }

    #[cfg(test)]
    fn wait(&mut self) -> Option<LoadOutcome> {
        let pending = self.pending.take()?;
        match pending.rx.recv() {
            Ok(outcome) => Some(outcome),
            Err(_) => Some(Self::abandoned(pending)),
        }
    }

    fn abandoned(pending: PendingLoad) -> LoadOutcome {
        LoadOutcome {
            result: Err(EcgError::LoaderFailed(pending.path.clone())),
            path: pending.path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecg::source::testing::{MemoryDataset, MemoryItem, MemoryReader};
    use crate::ecg::source::Tag;

    fn record() -> RawWaveformRecord {
        RawWaveformRecord {
            channel_count: 2,
            sample_count: 3,
            interleaved_samples: vec![1, 2, 3, 4, 5, 6],
        }
    }

    fn reader_with(dataset: MemoryDataset) -> MemoryReader {
        MemoryReader {
            dataset: Some(dataset),
            valid_header: true,
        }
    }

    #[test]
    fn load_checks_header_before_parsing() {
        let reader = MemoryReader {
            dataset: None,
            valid_header: false,
        };
        let err = load(&reader, Path::new("notes.txt")).unwrap_err();
        assert!(matches!(err, EcgError::InvalidHeader(p) if p == Path::new("notes.txt")));
    }

    #[test]
    fn load_surfaces_parse_failures() {
        let reader = MemoryReader {
            dataset: None,
            valid_header: true,
        };
        assert!(matches!(
            load(&reader, Path::new("broken.dcm")),
            Err(EcgError::Dataset(_))
        ));
    }

    #[test]
    fn loader_delivers_record_from_worker() {
        let dataset = MemoryDataset::ecg(vec![MemoryItem::from_record(&record())]);
        let mut loader = DatasetLoader::new(reader_with(dataset));
        assert!(loader.poll().is_none());
        loader.start(PathBuf::from("ecg.dcm")).unwrap();
        assert!(loader.is_loading());
        let outcome = loader.wait().unwrap();
        assert_eq!(outcome.path, PathBuf::from("ecg.dcm"));
        assert_eq!(outcome.result.unwrap(), Some(record()));
        assert!(!loader.is_loading());
    }

    #[test]
    fn second_request_while_pending_is_refused() {
        let mut dataset = MemoryDataset::ecg(vec![]);
        dataset.strings.insert(Tag::Modality, "XA".to_owned());
        let mut loader = DatasetLoader::new(reader_with(dataset));
        loader.start(PathBuf::from("first.dcm")).unwrap();
        let err = loader.start(PathBuf::from("second.dcm")).unwrap_err();
        assert!(matches!(err, EcgError::LoadInProgress(p) if p == Path::new("first.dcm")));
        let outcome = loader.wait().unwrap();
        assert_eq!(outcome.path, PathBuf::from("first.dcm"));
        assert!(matches!(outcome.result, Err(EcgError::WrongModality { .. })));
        loader.start(PathBuf::from("second.dcm")).unwrap();
    }

    struct CrashingReader;

    impl DatasetReader for CrashingReader {
        type Dataset = MemoryDataset;
        fn has_valid_header(&self, _path: &Path) -> bool {
            true
        }
        fn open(&self, _path: &Path) -> Result<MemoryDataset, EcgError> {
            panic!("parser crashed");
        }
    }

    #[test]
    fn crashed_worker_is_reported_as_loader_failure() {
        let mut loader = DatasetLoader::new(CrashingReader);
        loader.start(PathBuf::from("crash.dcm")).unwrap();
        let outcome = loader.wait().unwrap();
        assert!(matches!(outcome.result, Err(EcgError::LoaderFailed(_))));
        assert!(!loader.is_loading());
    }
}
