use std::path::Path;
use std::sync::Arc;
use crate::config::RenderConfig;
use crate::ecg::decode::{RawWaveformRecord, WaveformMatrix};
use crate::ecg::geometry::{GridGeometry, GridLayout};
use crate::ecg::grid::build_grid;
use crate::ecg::lead::LeadLayout;
use crate::ecg::scene::{compose, RenderSurface};
use crate::ecg::trace::{build_traces, max_traces};
use crate::ecg::EcgError;
use crate::logging::EventLog;
/// What a trigger did to the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Redraw {
    /// Nothing was regenerated.
    Unchanged,
    /// State was updated but there is no viewport to draw into yet.
    Deferred,
    Presented { grid_lines: usize, traces: usize },
    /// Grid presented without traces because the lead layout has no arrangement.
    GridOnly(LeadLayout),
}
/// Owns the decoded waveform, grid geometry and lead selection, and regenerates the scene
/// on load, resize and layout changes.
pub struct RenderOrchestrator<S: RenderSurface> {
    config: RenderConfig,
    log: Arc<dyn EventLog>,
    surface: S,
    geometry: GridGeometry,
    viewport: Option<(f32, f32)>,
    matrix: Option<WaveformMatrix>,
    lead: LeadLayout,
}
impl<S: RenderSurface> RenderOrchestrator<S> {
    pub fn new(config: RenderConfig, lead: LeadLayout, surface: S, log: Arc<dyn EventLog>) -> Self {
        let geometry = GridGeometry::new(
            config.rows_per_screen,
            config.ticks_per_cell,
            config.hysteresis,
        );
        Self {
            config,
            log,
            surface,
            geometry,
            viewport: None,
            matrix: None,
            lead,
        }
    }
    pub fn surface(&self) -> &S {
        &self.surface
    }
    pub fn matrix(&self) -> Option<&WaveformMatrix> {
        self.matrix.as_ref()
    }
    pub fn layout(&self) -> Option<GridLayout> {
        self.geometry.layout()
    }
    /// Feed the outcome of a dataset read. An empty waveform sequence (`Ok(None)`) is ignored.
    pub fn on_load_result(
        &mut self,
        path: &Path,
        result: Result<Option<RawWaveformRecord>, EcgError>,
    ) -> Result<Redraw, EcgError> {
        match result {
            Ok(Some(record)) => self.on_data_loaded(&record),
            Ok(None) => Ok(Redraw::Unchanged),
            Err(err) => Err(self.report(err)),
        }
        .map(|redraw| {
            if redraw != Redraw::Unchanged {
                self.log.debug(&format!("{} rendered: {redraw:?}", path.display()));
            }
            redraw
        })
    }
    /// Decode a new record and replace the current matrix. A malformed record leaves the
    /// previous matrix in place.
    pub fn on_data_loaded(&mut self, record: &RawWaveformRecord) -> Result<Redraw, EcgError> {
        let matrix = record.decode().map_err(|err| self.report(err))?;
        self.log.info(&format!(
            "decoded {} channels x {} samples",
            matrix.channel_count(),
            matrix.sample_count()
        ));
        let cap = max_traces(self.config.rows_per_screen);
        if matrix.channel_count() > cap {
            self.log.debug(&format!(
                "only the first {cap} of {} channels fit the grid",
                matrix.channel_count()
            ));
        }
        self.matrix = Some(matrix);
        self.redraw()
    }
    /// Track the viewport; regenerate only when the grid layout leaves its hysteresis band.
    pub fn on_viewport_changed(&mut self, width: f32, height: f32) -> Result<Redraw, EcgError> {
        let changed = self
            .geometry
            .update(width, height)
            .map_err(|err| self.report(err))?;
        self.viewport = Some((width, height));
        if !changed {
            self.log.trace(&format!("viewport {width}x{height} keeps the current grid"));
            return Ok(Redraw::Unchanged);
        }
        if let Some(layout) = self.geometry.layout() {
            self.log.debug(&format!(
                "grid layout: cell {:.2}, spacing {:.2}, {} columns",
                layout.cell_size, layout.spacing, layout.column_count
            ));
        }
        self.redraw()
    }
    /// An accepted lead layout selection.
    pub fn on_lead_layout_changed(&mut self, lead: LeadLayout) -> Result<Redraw, EcgError> {
        self.log.info(&format!("lead layout: {lead}"));
        self.lead = lead;
        self.redraw()
    }
    fn redraw(&mut self) -> Result<Redraw, EcgError> {
        let (Some(layout), Some((width, height))) = (self.geometry.layout(), self.viewport) else {
            return Ok(Redraw::Deferred);
        };
        let grid = build_grid(
            width,
            height,
            &layout,
            self.config.rows_per_screen,
            self.config.ticks_per_cell,
        );
        let grid_lines = grid.len();
        let scale = self.config.trace_scale();
        let (traces, redraw) = match &self.matrix {
            None => (
                Vec::new(),
                Redraw::Presented {
                    grid_lines,
                    traces: 0,
                },
            ),
            Some(matrix) => match build_traces(matrix, &layout, self.lead, &scale) {
                Ok(traces) => {
                    let count = traces.len();
                    (
                        traces,
                        Redraw::Presented {
                            grid_lines,
                            traces: count,
                        },
                    )
                }
                Err(EcgError::LeadLayoutNotImplemented(lead)) => {
                    self.log
                        .warn(&format!("lead layout {lead} is not implemented; drawing grid only"));
                    (Vec::new(), Redraw::GridOnly(lead))
                }
                Err(err) => return Err(self.report(err)),
            },
        };
        let commands = compose(width, height, grid, traces);
        self.surface
            .present(&commands)
            .map_err(|err| self.report(err))?;
        Ok(redraw)
    }
    fn report(&self, err: EcgError) -> EcgError {
        self.log.log(err.severity(), &err.to_string());
        err
    }
}
