use crate::ecg::decode::WaveformMatrix;
use crate::ecg::geometry::GridLayout;
use crate::ecg::lead::LeadLayout;
use crate::ecg::mapper::CoordinateMapper;
use crate::ecg::scene::Polyline;
use crate::ecg::EcgError;
/// Scale parameters shared by every lead arrangement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceScale {
    pub rows: u32,
    pub ticks_per_cell: u32,
    pub max_amplitude_scale: f32,
}
/// Strategy turning a decoded matrix into trace polylines for one lead layout.
pub trait LeadArrangement {
    fn arrange(
        &self,
        matrix: &WaveformMatrix,
        layout: &GridLayout,
        scale: &TraceScale,
    ) -> Result<Vec<Polyline>, EcgError>;
}
/// Stacked full-length traces, channel `i` centred on row pair `i`.
///
/// Only `rows / 2` channels fit; later channels are dropped.
pub struct RegularLayout;
impl LeadArrangement for RegularLayout {
    fn arrange(
        &self,
        matrix: &WaveformMatrix,
        layout: &GridLayout,
        scale: &TraceScale,
    ) -> Result<Vec<Polyline>, EcgError> {
        if matrix.is_empty() {
            return Ok(Vec::new());
        }
        let mapper = CoordinateMapper::new(
            layout,
            matrix.sample_count(),
            scale.max_amplitude_scale,
            scale.ticks_per_cell,
        )?;
        let visible = matrix.channel_count().min(max_traces(scale.rows));
        let traces = (0..visible)
            .map(|channel| Polyline {
                channel,
                points: matrix
                    .channel(channel)
                    .iter()
                    .enumerate()
                    .map(|(sample, amplitude)| mapper.map(channel, sample, *amplitude))
                    .collect(),
            })
            .collect();
        Ok(traces)
    }
}
/// Number of traces a grid of `rows` can hold.
pub fn max_traces(rows: u32) -> usize {
    (rows / 2) as usize
}
/// Pick the arrangement for a lead layout. Only [`LeadLayout::Regular`] has one.
pub fn arrangement_for(lead: LeadLayout) -> Result<&'static dyn LeadArrangement, EcgError> {
    match lead {
        LeadLayout::Regular => Ok(&RegularLayout),
        other => Err(EcgError::LeadLayoutNotImplemented(other)),
    }
}
/// One polyline per rendered channel.
pub fn build_traces(
    matrix: &WaveformMatrix,
    layout: &GridLayout,
    lead: LeadLayout,
    scale: &TraceScale,
) -> Result<Vec<Polyline>, EcgError> {
    arrangement_for(lead)?.arrange(matrix, layout, scale)
}
