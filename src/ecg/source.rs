use std::fs::File;
use std::io::Read;
use std::path::Path;
use dicom_dictionary_std::tags;
use dicom_object::{open_file, DefaultDicomObject, InMemDicomObject};
use crate::ecg::decode::RawWaveformRecord;
use crate::ecg::EcgError;
/// Dataset attributes the pipeline reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    Modality,
    WaveformSequence,
    NumberOfWaveformChannels,
    NumberOfWaveformSamples,
    WaveformData,
}
impl Tag {
    fn dicom(self) -> dicom_core::Tag {
        match self {
            Tag::Modality => tags::MODALITY,
            Tag::WaveformSequence => tags::WAVEFORM_SEQUENCE,
            Tag::NumberOfWaveformChannels => tags::NUMBER_OF_WAVEFORM_CHANNELS,
            Tag::NumberOfWaveformSamples => tags::NUMBER_OF_WAVEFORM_SAMPLES,
            Tag::WaveformData => tags::WAVEFORM_DATA,
        }
    }
}
/// One item of a sequence attribute.
pub trait DatasetItem {
    fn u16_value(&self, tag: Tag) -> Result<u16, EcgError>;
    fn u64_value(&self, tag: Tag) -> Result<u64, EcgError>;
    fn u16_values(&self, tag: Tag) -> Result<Vec<u16>, EcgError>;
}
/// A parsed dataset.
pub trait Dataset {
    type Item: DatasetItem;
    fn string_or_default(&self, tag: Tag, default: &str) -> String;
    fn contains(&self, tag: Tag) -> bool;
    fn sequence(&self, tag: Tag) -> Result<Vec<Self::Item>, EcgError>;
}
/// Something that can validate and open dataset files.
pub trait DatasetReader: Send + Sync + 'static {
    type Dataset: Dataset;
    fn has_valid_header(&self, path: &Path) -> bool;
    fn open(&self, path: &Path) -> Result<Self::Dataset, EcgError>;
}
/// Pull the first waveform record out of an ECG dataset.
///
/// `Ok(None)` means the waveform sequence exists but holds no items; callers keep whatever
/// they were showing and report nothing.
pub fn extract_record<D: Dataset>(
    dataset: &D,
    path: &Path,
) -> Result<Option<RawWaveformRecord>, EcgError> {
    let modality = dataset.string_or_default(Tag::Modality, "");
    if modality != "ECG" {
        return Err(EcgError::WrongModality {
            path: path.to_path_buf(),
            modality,
        });
    }
    if !dataset.contains(Tag::WaveformSequence) {
        return Err(EcgError::MissingWaveformSequence);
    }
    let items = dataset.sequence(Tag::WaveformSequence)?;
    let Some(first) = items.first() else {
        return Ok(None);
    };
    Ok(Some(RawWaveformRecord {
        channel_count: first.u16_value(Tag::NumberOfWaveformChannels)?,
        sample_count: first.u64_value(Tag::NumberOfWaveformSamples)?,
        interleaved_samples: first.u16_values(Tag::WaveformData)?,
    }))
}
const DICOM_PREAMBLE_LEN: usize = 128;
const DICOM_MAGIC: &[u8; 4] = b"DICM";
/// DICOM Part 10 files read through `dicom-object`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DicomReader;
pub struct DicomDataset(DefaultDicomObject);
pub struct DicomItem(InMemDicomObject);
fn dataset_error(err: impl std::fmt::Display) -> EcgError {
    EcgError::Dataset(err.to_string())
}
impl DatasetReader for DicomReader {
    type Dataset = DicomDataset;
    fn has_valid_header(&self, path: &Path) -> bool {
        let mut header = [0u8; DICOM_PREAMBLE_LEN + 4];
        match File::open(path).and_then(|mut file| file.read_exact(&mut header)) {
            Ok(()) => &header[DICOM_PREAMBLE_LEN..] == DICOM_MAGIC,
            Err(_) => false,
        }
    }
    fn open(&self, path: &Path) -> Result<DicomDataset, EcgError> {
        open_file(path).map(DicomDataset).map_err(dataset_error)
    }
}
impl Dataset for DicomDataset {
    type Item = DicomItem;
    fn string_or_default(&self, tag: Tag, default: &str) -> String {
        self.0
            .element(tag.dicom())
            .ok()
            .and_then(|element| element.to_str().ok())
            .map(|value| value.trim_end_matches(['\0', ' ']).to_owned())
            .unwrap_or_else(|| default.to_owned())
    }
    fn contains(&self, tag: Tag) -> bool {
        self.0.element(tag.dicom()).is_ok()
    }
    fn sequence(&self, tag: Tag) -> Result<Vec<DicomItem>, EcgError> {
        let element = self.0.element(tag.dicom()).map_err(dataset_error)?;
        Ok(element
            .items()
            .map(|items| items.iter().cloned().map(DicomItem).collect())
            .unwrap_or_default())
    }
}
impl DatasetItem for DicomItem {
    fn u16_value(&self, tag: Tag) -> Result<u16, EcgError> {
        let element = self.0.element(tag.dicom()).map_err(dataset_error)?;
        element.to_int::<u16>().map_err(dataset_error)
    }
    fn u64_value(&self, tag: Tag) -> Result<u64, EcgError> {
        let element = self.0.element(tag.dicom()).map_err(dataset_error)?;
        element.to_int::<u64>().map_err(dataset_error)
    }
    fn u16_values(&self, tag: Tag) -> Result<Vec<u16>, EcgError> {
        let element = self.0.element(tag.dicom()).map_err(dataset_error)?;
        element.to_multi_int::<u16>().map_err(dataset_error)
    }
}
/// In-memory dataset for deterministic tests.
#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::HashMap;
    #[derive(Clone, Debug, Default)]
    pub struct MemoryItem {
        pub channels: Option<u16>,
        pub samples: Option<u64>,
        pub data: Option<Vec<u16>>,
    }
    impl MemoryItem {
        pub fn from_record(record: &RawWaveformRecord) -> Self {
            Self {
                channels: Some(record.channel_count),
                samples: Some(record.sample_count),
                data: Some(record.interleaved_samples.clone()),
            }
        }
    }
    fn missing(tag: Tag) -> EcgError {
        EcgError::Dataset(format!("{tag:?} not present"))
    }
    impl DatasetItem for MemoryItem {
        fn u16_value(&self, tag: Tag) -> Result<u16, EcgError> {
            match tag {
                Tag::NumberOfWaveformChannels => self.channels.ok_or(missing(tag)),
                _ => Err(missing(tag)),
            }
        }
        fn u64_value(&self, tag: Tag) -> Result<u64, EcgError> {
            match tag {
                Tag::NumberOfWaveformSamples => self.samples.ok_or(missing(tag)),
                _ => Err(missing(tag)),
            }
        }
        fn u16_values(&self, tag: Tag) -> Result<Vec<u16>, EcgError> {
            match tag {
                Tag::WaveformData => self.data.clone().ok_or(missing(tag)),
                _ => Err(missing(tag)),
            }
        }
    }
    #[derive(Clone, Debug, Default)]
    pub struct MemoryDataset {
        pub strings: HashMap<Tag, String>,
        pub sequences: HashMap<Tag, Vec<MemoryItem>>,
    }
    impl MemoryDataset {
        pub fn ecg(items: Vec<MemoryItem>) -> Self {
            let mut dataset = Self::default();
            dataset.strings.insert(Tag::Modality, "ECG".to_owned());
            dataset.sequences.insert(Tag::WaveformSequence, items);
            dataset
        }
    }
    impl Dataset for MemoryDataset {
        type Item = MemoryItem;
        fn string_or_default(&self, tag: Tag, default: &str) -> String {
            self.strings
                .get(&tag)
                .cloned()
                .unwrap_or_else(|| default.to_owned())
        }
        fn contains(&self, tag: Tag) -> bool {
            self.strings.contains_key(&tag) || self.sequences.contains_key(&tag)
        }
        fn sequence(&self, tag: Tag) -> Result<Vec<MemoryItem>, EcgError> {
            self.sequences.get(&tag).cloned().ok_or(missing(tag))
        }
    }
    /// Serves a fixed dataset for every path, or a parse failure when `dataset` is `None`.
    #[derive(Clone, Debug, Default)]
    pub struct MemoryReader {
        pub dataset: Option<MemoryDataset>,
        pub valid_header: bool,
    }
    impl DatasetReader for MemoryReader {
        type Dataset = MemoryDataset;
        fn has_valid_header(&self, _path: &Path) -> bool {
            self.valid_header
        }
        fn open(&self, path: &Path) -> Result<MemoryDataset, EcgError> {
            self.dataset
                .clone()
                .ok_or_else(|| EcgError::Dataset(format!("cannot parse {}", path.display())))
        }
    }
}
