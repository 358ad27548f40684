use plotters::prelude::*;
use crate::config::{GridStyle, StrokeStyle};
use crate::ecg::error::EcgError;
use crate::ecg::scene::{DrawCommand, Point, RenderSurface, StrokeKind};
/// Rasterises presented frames into an in-memory RGB buffer.
#[derive(Clone, Debug)]
pub struct BitmapSurface {
    style: GridStyle,
    width: u32,
    height: u32,
    pixels: Vec<u8>, // RGB, row-major
    generation: u64,
}
impl BitmapSurface {
    pub fn new(style: GridStyle) -> Self {
        Self {
            style,
            width: 0,
            height: 0,
            pixels: Vec::new(),
            generation: 0,
        }
    }
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
    /// Bumped on every successful present so hosts know when to re-upload.
    pub fn generation(&self) -> u64 {
        self.generation
    }
    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y * self.width + x) * 3) as usize;
        let rgb = self.pixels.get(offset..offset + 3)?;
        Some([rgb[0], rgb[1], rgb[2]])
    }
    fn stroke(&self, kind: StrokeKind) -> ShapeStyle {
        let StrokeStyle { color, width } = match kind {
            StrokeKind::Major => self.style.major,
            StrokeKind::Minor => self.style.minor,
            StrokeKind::Trace => self.style.trace,
        };
        RGBColor(color[0], color[1], color[2]).stroke_width(width.round().max(1.0) as u32)
    }
}
fn to_pixel(point: Point) -> (i32, i32) {
    (point.x.round() as i32, point.y.round() as i32)
}
impl RenderSurface for BitmapSurface {
    fn present(&mut self, commands: &[DrawCommand]) -> Result<(), EcgError> {
        let Some(DrawCommand::Clear { width, height }) = commands.first() else {
            return Err(EcgError::Plot("frame does not start with a clear".into()));
        };
        let width = width.ceil().max(1.0) as u32;
        let height = height.ceil().max(1.0) as u32;
        let [r, g, b] = self.style.background;
        let background = RGBColor(r, g, b);
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&background)?;
            for command in &commands[1..] {
                match command {
                    DrawCommand::Clear { .. } => root.fill(&background)?,
                    DrawCommand::Line(line) => root.draw(&PathElement::new(
                        vec![to_pixel(line.start), to_pixel(line.end)],
                        self.stroke(line.kind),
                    ))?,
                    DrawCommand::Polyline(polyline) => root.draw(&PathElement::new(
                        polyline.points.iter().copied().map(to_pixel).collect::<Vec<_>>(),
                        self.stroke(StrokeKind::Trace),
                    ))?,
                }
            }
            root.present()?;
        }
        self.width = width;
        self.height = height;
        self.pixels = buffer;
        self.generation += 1;
        Ok(())
    }
}
