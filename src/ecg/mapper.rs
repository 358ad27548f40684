use crate::ecg::geometry::GridLayout;
use crate::ecg::scene::Point;
use crate::ecg::EcgError;
/// Raw amplitude drawn as one full cell height.
pub const DEFAULT_MAX_AMPLITUDE_SCALE: f32 = 1000.0;
/// Maps (channel, sample, amplitude) into device coordinates for a fixed layout.
///
/// Channel `i` sits on the baseline `spacing * ticks * (2i + 1)`, so each trace owns a pair of
/// grid rows. The full sample range is stretched across `column_count` cells and larger
/// amplitudes move up the screen (smaller `y`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    scale_x: f32,
    scale_y: f32,
    row_pitch: f32,
}
impl CoordinateMapper {
    pub fn new(
        layout: &GridLayout,
        sample_count: usize,
        max_amplitude_scale: f32,
        ticks_per_cell: u32,
    ) -> Result<Self, EcgError> {
        if sample_count == 0 {
            return Err(EcgError::Mapping);
        }
        Ok(Self {
            scale_x: layout.cell_size * layout.column_count as f32 / sample_count as f32,
            scale_y: layout.cell_size / max_amplitude_scale,
            row_pitch: layout.spacing * ticks_per_cell as f32,
        })
    }
    #[cfg(test)]
    pub fn scale_x(&self) -> f32 {
        self.scale_x
    }
    #[cfg(test)]
    pub fn scale_y(&self) -> f32 {
        self.scale_y
    }
    pub fn offset_y(&self, channel: usize) -> f32 {
        self.row_pitch * (2 * channel + 1) as f32
    }
    pub fn map(&self, channel: usize, sample_index: usize, amplitude: i16) -> Point {
        Point::new(
            sample_index as f32 * self.scale_x,
            self.offset_y(channel) - f32::from(amplitude) * self.scale_y,
        )
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }
    fn map_sample(
        channel: usize,
        sample_index: usize,
        amplitude: i16,
        layout: &GridLayout,
        sample_count: usize,
    ) -> Result<Point, EcgError> {
        let mapper = CoordinateMapper::new(layout, sample_count, 1000.0, 5)?;
        Ok(mapper.map(channel, sample_index, amplitude))
    }
    fn layout_1200x720() -> GridLayout {
        GridLayout {
            cell_size: 30.0,
            spacing: 6.0,
            column_count: 40,
        }
    }
    #[test]
    fn scales_follow_layout() {
        let mapper = CoordinateMapper::new(&layout_1200x720(), 500, 1000.0, 5).unwrap();
        assert!(close(mapper.scale_x(), 2.4));
        assert!(close(mapper.scale_y(), 0.03));
    }
    #[test]
    fn channel_baselines_skip_a_row() {
        let mapper = CoordinateMapper::new(&layout_1200x720(), 500, 1000.0, 5).unwrap();
        assert!(close(mapper.offset_y(0), 30.0));
        assert!(close(mapper.offset_y(2), 150.0));
        assert!(close(mapper.offset_y(11), 690.0));
    }
    #[test]
    fn positive_amplitude_moves_up() {
        let p = map_sample(0, 0, 500, &layout_1200x720(), 500).unwrap();
        assert!(close(p.x, 0.0));
        assert!(close(p.y, 15.0));
        let q = map_sample(0, 10, -500, &layout_1200x720(), 500).unwrap();
        assert!(close(q.x, 24.0));
        assert!(close(q.y, 45.0));
        assert!(p.y < q.y);
    }
    #[test]
    fn last_sample_lands_inside_the_columns() {
        let layout = layout_1200x720();
        let p = map_sample(3, 499, 0, &layout, 500).unwrap();
        assert!(p.x < layout.cell_size * layout.column_count as f32);
        assert!(close(p.y, 210.0));
    }
    #[test]
    fn zero_samples_cannot_be_mapped() {
        assert!(matches!(
            map_sample(0, 0, 0, &layout_1200x720(), 0),
            Err(EcgError::Mapping)
        ));
    }
}
