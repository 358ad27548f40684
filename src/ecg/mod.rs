// src/ecg/mod.rs
// Waveform decode, grid geometry and draw-command generation.
pub mod decode;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod lead;
pub mod mapper;
pub mod pipeline;
pub mod plot;
pub mod scene;
pub mod source;
pub mod trace;
pub use decode::{RawWaveformRecord, WaveformMatrix};
pub use error::EcgError;
pub use lead::{LeadLayout, LeadMenu};
pub use pipeline::{Redraw, RenderOrchestrator};
pub use plot::BitmapSurface;
pub use scene::{DrawCommand, RenderSurface, RetainedScene, StrokeKind};
pub use source::{extract_record, DatasetReader, DicomReader};
