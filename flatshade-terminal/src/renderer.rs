/// Half-block pixel canvas for terminal rendering
use crossterm::{
    cursor,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use flatshade_core::{Color, DisplaySink};
use nalgebra::Point2;
use std::io::Write;

/// Upper half block: foreground paints the top pixel, background the bottom
const HALF_BLOCK: char = '\u{2580}';

/// RGB framebuffer with two pixels per terminal cell, stacked vertically.
///
/// There is no depth buffer; each fill overwrites whatever was there.
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
    background: Color,
}

impl Canvas {
    /// Canvas covering `cols` x `rows` terminal cells
    pub fn for_terminal(cols: u16, rows: u16, background: Color) -> Self {
        Self::new(cols as usize, rows as usize * 2, background)
    }

    pub fn new(width: usize, height: usize, background: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![background; width * height],
            background,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.pixels.fill(self.background);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current: Option<(Color, Color)> = None;
        for row in 0..self.height / 2 {
            writer.queue(cursor::MoveTo(0, row as u16))?;
            for x in 0..self.width {
                let top = self.pixels[row * 2 * self.width + x];
                let bottom = self.pixels[(row * 2 + 1) * self.width + x];
                if current != Some((top, bottom)) {
                    writer.queue(SetForegroundColor(term_color(top)))?;
                    writer.queue(SetBackgroundColor(term_color(bottom)))?;
                    current = Some((top, bottom));
                }
                writer.queue(Print(HALF_BLOCK))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl DisplaySink for Canvas {
    fn fill_triangle(&mut self, points: &[Point2<f64>; 3], color: Color) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let [v0, v1, v2] = *points;

        // Bounding box, clipped to screen bounds
        let min_x = v0.x.min(v1.x).min(v2.x).floor().max(0.0);
        let max_x = v0.x.max(v1.x).max(v2.x).ceil().min(self.width as f64 - 1.0);
        let min_y = v0.y.min(v1.y).min(v2.y).floor().max(0.0);
        let max_y = v0.y.max(v1.y).max(v2.y).ceil().min(self.height as f64 - 1.0);
        if !(min_x <= max_x && min_y <= max_y) {
            return;
        }

        for y in min_y as usize..=max_y as usize {
            for x in min_x as usize..=max_x as usize {
                let p = Point2::new(x as f64 + 0.5, y as f64 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(&v0, &v1, &v2, &p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.pixels[y * self.width + x] = color;
                    }
                }
            }
        }
    }
}

fn term_color(c: Color) -> TermColor {
    TermColor::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: &Point2<f64>,
    v1: &Point2<f64>,
    v2: &Point2<f64>,
    p: &Point2<f64>,
) -> Option<(f64, f64, f64)> {
    let denom = (v1.y - v2.y) * (v0.x - v2.x) + (v2.x - v1.x) * (v0.y - v2.y);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.y - v2.y) * (p.x - v2.x) + (v2.x - v1.x) * (p.y - v2.y)) / denom;
    let w1 = ((v2.y - v0.y) * (p.x - v2.x) + (v0.x - v2.x) * (p.y - v2.y)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
