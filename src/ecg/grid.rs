use crate::ecg::geometry::GridLayout;
use crate::ecg::scene::{LineSegment, StrokeKind};
/// Build the calibration grid for the current viewport.
///
/// Horizontal lines: `rows` major cells of `ticks_per_cell` divisions each, closed by a major
/// line at the bottom. Vertical lines: the same alternation from `x = 0`, at most
/// `column_count + 1` cells and never past `width`, closed by a minor line wherever the walk
/// stopped. The closing vertical is minor on purpose; the horizontal one is major.
pub fn build_grid(
    width: f32,
    height: f32,
    layout: &GridLayout,
    rows: u32,
    ticks_per_cell: u32,
) -> Vec<LineSegment> {
    let spacing = layout.spacing;
    let mut lines = Vec::with_capacity(
        ((rows + layout.column_count + 2) * ticks_per_cell.max(1)) as usize + 2,
    );
    let mut y = 0.0;
    for _ in 0..rows {
        lines.push(LineSegment::horizontal(y, width, StrokeKind::Major));
        y += spacing;
        for _ in 1..ticks_per_cell {
            lines.push(LineSegment::horizontal(y, width, StrokeKind::Minor));
            y += spacing;
        }
    }
    lines.push(LineSegment::horizontal(y, width, StrokeKind::Major));
    let mut x = 0.0;
    for _ in 0..=layout.column_count {
        if x > width {
            break;
        }
        lines.push(LineSegment::vertical(x, height, StrokeKind::Major));
        x += spacing;
        for _ in 1..ticks_per_cell {
            if x > width {
                break;
            }
            lines.push(LineSegment::vertical(x, height, StrokeKind::Minor));
            x += spacing;
        }
    }
    lines.push(LineSegment::vertical(x, height, StrokeKind::Minor));
    lines
}
#[cfg(test)]
mod tests {
    use super::*;
    fn count(lines: &[LineSegment], horizontal: bool, kind: StrokeKind) -> usize {
        lines
            .iter()
            .filter(|l| l.is_horizontal() == horizontal && l.kind == kind)
            .count()
    }
    fn layout_1200x720() -> GridLayout {
        GridLayout {
            cell_size: 30.0,
            spacing: 6.0,
            column_count: 40,
        }
    }
    #[test]
    fn horizontal_counts_for_standard_paper() {
        let lines = build_grid(1200.0, 720.0, &layout_1200x720(), 24, 5);
        assert_eq!(count(&lines, true, StrokeKind::Major), 25);
        assert_eq!(count(&lines, true, StrokeKind::Minor), 96);
    }
    #[test]
    fn horizontal_lines_span_width_and_close_at_bottom() {
        let lines = build_grid(1200.0, 720.0, &layout_1200x720(), 24, 5);
        let horizontal: Vec<_> = lines.iter().filter(|l| l.is_horizontal()).collect();
        assert!(horizontal
            .iter()
            .all(|l| l.start.x == 0.0 && l.end.x == 1200.0));
        let last = horizontal.last().unwrap();
        assert_eq!(last.kind, StrokeKind::Major);
        assert_eq!(last.start.y, 720.0);
        assert_eq!(horizontal[5].kind, StrokeKind::Major);
        assert_eq!(horizontal[5].start.y, 30.0);
    }
    #[test]
    fn vertical_walk_stops_at_width_and_closes_minor() {
        let lines = build_grid(1200.0, 720.0, &layout_1200x720(), 24, 5);
        let vertical: Vec<_> = lines.iter().filter(|l| !l.is_horizontal()).collect();
        // 41 major positions 0..=1200, four minors after each of the first 40
        assert_eq!(count(&lines, false, StrokeKind::Major), 41);
        assert_eq!(count(&lines, false, StrokeKind::Minor), 160 + 1);
        let closing = vertical.last().unwrap();
        assert_eq!(closing.kind, StrokeKind::Minor);
        assert_eq!(closing.start.x, 1206.0);
        assert!(vertical.iter().all(|l| l.start.y == 0.0 && l.end.y == 720.0));
    }
    #[test]
    fn vertical_walk_respects_partial_last_cell() {
        // width 1215 fits 40 whole cells plus two minor ticks
        let layout = layout_1200x720();
        let lines = build_grid(1215.0, 720.0, &layout, 24, 5);
        assert_eq!(count(&lines, false, StrokeKind::Major), 41);
        assert_eq!(count(&lines, false, StrokeKind::Minor), 160 + 2 + 1);
        let closing = lines.last().unwrap();
        assert_eq!(closing.start.x, 1218.0);
    }
    #[test]
    fn single_tick_cells_have_no_minor_lines() {
        let layout = GridLayout {
            cell_size: 10.0,
            spacing: 10.0,
            column_count: 3,
        };
        let lines = build_grid(30.0, 40.0, &layout, 4, 1);
        assert_eq!(count(&lines, true, StrokeKind::Major), 5);
        assert_eq!(count(&lines, true, StrokeKind::Minor), 0);
        assert_eq!(count(&lines, false, StrokeKind::Major), 4);
        assert_eq!(count(&lines, false, StrokeKind::Minor), 1);
    }
}
