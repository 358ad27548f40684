use crate::ecg::EcgError;
/// A point in device-independent coordinates, `y` growing downwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}
impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
/// Stroke style a primitive is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrokeKind {
    Major,
    Minor,
    Trace,
}
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSegment {
    pub start: Point,
    pub end: Point,
    pub kind: StrokeKind,
}
impl LineSegment {
    pub fn horizontal(y: f32, width: f32, kind: StrokeKind) -> Self {
        Self {
            start: Point::new(0.0, y),
            end: Point::new(width, y),
            kind,
        }
    }
    pub fn vertical(x: f32, height: f32, kind: StrokeKind) -> Self {
        Self {
            start: Point::new(x, 0.0),
            end: Point::new(x, height),
            kind,
        }
    }
    #[cfg(test)]
    pub fn is_horizontal(&self) -> bool {
        self.start.y == self.end.y
    }
}
/// One rendered channel, always drawn with [`StrokeKind::Trace`].
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    pub channel: usize,
    pub points: Vec<Point>,
}
/// Primitive handed to a [`RenderSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole viewport with the background; always first in a frame.
    Clear { width: f32, height: f32 },
    Line(LineSegment),
    Polyline(Polyline),
}
/// Assemble one frame: background, grid, then traces.
pub fn compose(
    width: f32,
    height: f32,
    grid: Vec<LineSegment>,
    traces: Vec<Polyline>,
) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(1 + grid.len() + traces.len());
    commands.push(DrawCommand::Clear { width, height });
    commands.extend(grid.into_iter().map(DrawCommand::Line));
    commands.extend(traces.into_iter().map(DrawCommand::Polyline));
    commands
}
/// Whatever turns draw commands into pixels: a painter, a bitmap, a vector scene.
pub trait RenderSurface {
    fn present(&mut self, commands: &[DrawCommand]) -> Result<(), EcgError>;
}
/// Keeps the last presented frame so an immediate-mode painter can replay it.
#[derive(Clone, Debug, Default)]
pub struct RetainedScene {
    commands: Vec<DrawCommand>,
}
impl RetainedScene {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }
    #[cfg(test)]
    pub fn lines(&self) -> impl Iterator<Item = &LineSegment> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Line(line) => Some(line),
            _ => None,
        })
    }
    #[cfg(test)]
    pub fn polylines(&self) -> impl Iterator<Item = &Polyline> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Polyline(poly) => Some(poly),
            _ => None,
        })
    }
}
impl RenderSurface for RetainedScene {
    fn present(&mut self, commands: &[DrawCommand]) -> Result<(), EcgError> {
        self.commands.clear();
        self.commands.extend_from_slice(commands);
        Ok(())
    }
}
