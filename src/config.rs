// src/config.rs
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::ecg::geometry::{DEFAULT_HYSTERESIS, DEFAULT_ROWS_PER_SCREEN, DEFAULT_TICKS_PER_CELL};
use crate::ecg::mapper::DEFAULT_MAX_AMPLITUDE_SCALE;
use crate::ecg::trace::TraceScale;
use crate::ecg::{EcgError, LeadLayout};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "ECG_PLOT_CONFIG";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "ecg-plot.json";

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub render: RenderConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        // Same canvas the first desktop build drew into.
        Self {
            width: 1201.0,
            height: 721.0,
        }
    }
}

/// Where draw commands end up inside the window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    /// Replayed through the egui painter every frame.
    #[default]
    Vector,
    /// Rasterised into a bitmap and shown as a texture.
    Raster,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub rows_per_screen: u32,
    pub ticks_per_cell: u32,
    pub max_amplitude_scale: f32,
    pub hysteresis: f32,
    pub lead_layout: String,
    pub surface: SurfaceKind,
    pub style: GridStyle,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            rows_per_screen: DEFAULT_ROWS_PER_SCREEN,
            ticks_per_cell: DEFAULT_TICKS_PER_CELL,
            max_amplitude_scale: DEFAULT_MAX_AMPLITUDE_SCALE,
            hysteresis: DEFAULT_HYSTERESIS,
            lead_layout: LeadLayout::Regular.label().to_owned(),
            surface: SurfaceKind::default(),
            style: GridStyle::default(),
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), EcgError> {
        if self.rows_per_screen < 2 {
            return Err(EcgError::Config(format!(
                "rows_per_screen must be at least 2, got {}",
                self.rows_per_screen
            )));
        }
        if self.ticks_per_cell == 0 {
            return Err(EcgError::Config("ticks_per_cell must be positive".into()));
        }
        if !(self.max_amplitude_scale > 0.0) {
            return Err(EcgError::Config(format!(
                "max_amplitude_scale must be positive, got {}",
                self.max_amplitude_scale
            )));
        }
        if !(0.0..1.0).contains(&self.hysteresis) {
            return Err(EcgError::Config(format!(
                "hysteresis must be in [0, 1), got {}",
                self.hysteresis
            )));
        }
        self.lead_layout()?;
        Ok(())
    }

    pub fn lead_layout(&self) -> Result<LeadLayout, EcgError> {
        self.lead_layout.parse().map_err(EcgError::Config)
    }

    pub fn trace_scale(&self) -> TraceScale {
        TraceScale {
            rows: self.rows_per_screen,
            ticks_per_cell: self.ticks_per_cell,
            max_amplitude_scale: self.max_amplitude_scale,
        }
    }
}

/// Stroke colour and width for one kind of primitive.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct StrokeStyle {
    pub color: [u8; 3],
    pub width: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridStyle {
    pub background: [u8; 3],
    pub major: StrokeStyle,
    pub minor: StrokeStyle,
    pub trace: StrokeStyle,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            background: [255, 255, 255],
            major: StrokeStyle {
                color: [255, 0, 0],
                width: 1.0,
            },
            // PaleVioletRed
            minor: StrokeStyle {
                color: [219, 112, 147],
                width: 0.5,
            },
            trace: StrokeStyle {
                color: [0, 0, 0],
                width: 1.5,
            },
        }
    }
}

impl AppConfig {
    /// Explicit path from the environment, else the working-directory file, else defaults.
    pub fn discover() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::load(Path::new(&path));
        }
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Self::load(&local);
        }
        Ok(Self::default())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(text).context("malformed JSON")?;
        config.render.validate()?;
        if !(config.window.width > 0.0 && config.window.height > 0.0) {
            return Err(EcgError::Config(format!(
                "window size must be positive, got {}x{}",
                config.window.width, config.window.height
            ))
            .into());
        }
        Ok(config)
    }
}
