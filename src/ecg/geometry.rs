use crate::ecg::EcgError;
/// Major grid rows fitted into the viewport height.
pub const DEFAULT_ROWS_PER_SCREEN: u32 = 24;
/// Minor divisions per major cell.
pub const DEFAULT_TICKS_PER_CELL: u32 = 5;
/// Relative cell-size change tolerated before the layout is recomputed.
pub const DEFAULT_HYSTERESIS: f32 = 0.1;
/// Grid geometry derived from the viewport, in device units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    /// Height of one major grid row.
    pub cell_size: f32,
    /// Minor tick spacing, `cell_size / ticks_per_cell`.
    pub spacing: f32,
    /// Whole cells that fit across the viewport width.
    pub column_count: u32,
}
/// Compute a candidate layout for the viewport and decide whether it replaces `previous`.
///
/// The candidate cell size is `height / rows_per_screen`. It is committed when there is no
/// previous layout or when it leaves the `previous.cell_size * (1 ± hysteresis)` band;
/// otherwise `previous` is returned unchanged with `false`.
pub fn recompute(
    width: f32,
    height: f32,
    rows_per_screen: u32,
    ticks_per_cell: u32,
    hysteresis: f32,
    previous: Option<GridLayout>,
) -> Result<(GridLayout, bool), EcgError> {
    let degenerate = EcgError::Layout { width, height };
    if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
        return Err(degenerate);
    }
    if rows_per_screen == 0 || ticks_per_cell == 0 {
        return Err(degenerate);
    }
    let candidate = height / rows_per_screen as f32;
    if let Some(previous) = previous {
        let upper = previous.cell_size * (1.0 + hysteresis);
        let lower = previous.cell_size * (1.0 - hysteresis);
        if candidate <= upper && candidate >= lower {
            return Ok((previous, false));
        }
    }
    let column_count = (width / candidate).floor() as u32;
    if column_count == 0 {
        // narrower than a single cell
        return Err(degenerate);
    }
    let layout = GridLayout {
        cell_size: candidate,
        spacing: candidate / ticks_per_cell as f32,
        column_count,
    };
    Ok((layout, true))
}
/// Holds the committed layout between viewport changes.
#[derive(Clone, Debug)]
pub struct GridGeometry {
    rows_per_screen: u32,
    ticks_per_cell: u32,
    hysteresis: f32,
    layout: Option<GridLayout>,
}
impl GridGeometry {
    pub fn new(rows_per_screen: u32, ticks_per_cell: u32, hysteresis: f32) -> Self {
        Self {
            rows_per_screen,
            ticks_per_cell,
            hysteresis,
            layout: None,
        }
    }
    pub fn layout(&self) -> Option<GridLayout> {
        self.layout
    }
    /// Returns whether the stored layout changed.
    pub fn update(&mut self, width: f32, height: f32) -> Result<bool, EcgError> {
        let (layout, changed) = recompute(
            width,
            height,
            self.rows_per_screen,
            self.ticks_per_cell,
            self.hysteresis,
            self.layout,
        )?;
        self.layout = Some(layout);
        Ok(changed)
    }
}
impl Default for GridGeometry {
    fn default() -> Self {
        Self::new(
            DEFAULT_ROWS_PER_SCREEN,
            DEFAULT_TICKS_PER_CELL,
            DEFAULT_HYSTERESIS,
        )
    }
}
