//! 2D drawing surfaces.
//!
//! [`DrawSurface`] is the small canvas-style API the particle field draws
//! through: clear, set a fill color, build a path of arcs, fill it.
//!
//! Two implementations ship with the crate:
//! - [`Raster`] - an RGBA8 pixel buffer, presented to the window by the GPU
//! - [`CommandLog`] - records every call, for inspecting what was drawn

use std::f32::consts::TAU;

use crate::color::Color;

/// A 2D raster drawing target.
///
/// Coordinates are in pixels with the origin at the top-left corner.
pub trait DrawSurface {
    /// Surface width in pixels.
    fn width(&self) -> u32;

    /// Surface height in pixels.
    fn height(&self) -> u32;

    /// Resize the surface. Resizing always clears it.
    fn resize(&mut self, width: u32, height: u32);

    /// Reset a rectangle to fully transparent.
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Set the color used by subsequent [`fill`](DrawSurface::fill) calls.
    fn set_fill_style(&mut self, color: Color);

    /// Start a new, empty path.
    fn begin_path(&mut self);

    /// Add a circular arc around `(x, y)` to the current path. Angles are
    /// in radians, clockwise from the positive x axis.
    fn arc(&mut self, x: f32, y: f32, radius: f32, start_angle: f32, end_angle: f32);

    /// Fill the current path with the fill style.
    fn fill(&mut self);

    /// Clear the whole surface.
    fn clear(&mut self) {
        let (w, h) = (self.width() as f32, self.height() as f32);
        self.clear_rect(0.0, 0.0, w, h);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ArcSegment {
    x: f32,
    y: f32,
    radius: f32,
    start: f32,
    end: f32,
}

impl ArcSegment {
    /// Whether the sector swept by this arc contains the point.
    fn contains(&self, px: f32, py: f32) -> bool {
        let dx = px - self.x;
        let dy = py - self.y;
        if dx * dx + dy * dy > self.radius * self.radius {
            return false;
        }
        let sweep = self.end - self.start;
        if sweep.abs() >= TAU {
            return true;
        }
        let angle = (dy.atan2(dx) - self.start).rem_euclid(TAU);
        if sweep >= 0.0 {
            angle <= sweep
        } else {
            angle >= TAU + sweep
        }
    }
}

/// Supersampling grid edge length for coverage.
const SAMPLES: u32 = 4;

/// An RGBA8 pixel buffer with straight alpha.
///
/// Fills are anti-aliased by sampling each pixel on a 4x4 grid, so the
/// sub-pixel radii typical of sparkles still leave a visible dot.
#[derive(Debug, Clone)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    fill_style: Color,
    path: Vec<ArcSegment>,
}

impl Raster {
    /// Create a cleared raster.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize) * 4],
            fill_style: Color::BLACK,
            path: Vec::new(),
        }
    }

    /// Raw RGBA bytes, row-major, `width * height * 4` long.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Read one pixel. Returns `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        let p = &self.pixels[i..i + 4];
        Some(Color::rgba(p[0], p[1], p[2], p[3]))
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + x as usize) * 4
    }

    /// Source-over blend `color` into pixel `(x, y)` at `coverage`.
    fn blend(&mut self, x: u32, y: u32, color: Color, coverage: f32) {
        let src_a = color.a as f32 / 255.0 * coverage;
        if src_a <= 0.0 {
            return;
        }
        let i = self.index(x, y);
        let dst = &mut self.pixels[i..i + 4];
        let dst_a = dst[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        let src = [color.r, color.g, color.b];
        for c in 0..3 {
            let s = src[c] as f32;
            let d = dst[c] as f32;
            let v = (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
            dst[c] = v.round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Clamp a float span to pixel indices `[lo, hi)` within `0..limit`.
    fn span(lo: f32, hi: f32, limit: u32) -> (u32, u32) {
        let lo = lo.floor().max(0.0).min(limit as f32) as u32;
        let hi = hi.ceil().max(0.0).min(limit as f32) as u32;
        (lo, hi)
    }
}

impl DrawSurface for Raster {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize((width as usize) * (height as usize) * 4, 0);
        self.path.clear();
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let (x0, x1) = Self::span(x, x + width, self.width);
        let (y0, y1) = Self::span(y, y + height, self.height);
        if x0 >= x1 {
            return;
        }
        for row in y0..y1 {
            let start = self.index(x0, row);
            let end = self.index(x1 - 1, row) + 4;
            self.pixels[start..end].fill(0);
        }
    }

    fn set_fill_style(&mut self, color: Color) {
        self.fill_style = color;
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start_angle: f32, end_angle: f32) {
        if radius > 0.0 && radius.is_finite() && x.is_finite() && y.is_finite() {
            self.path.push(ArcSegment {
                x,
                y,
                radius,
                start: start_angle,
                end: end_angle,
            });
        }
    }

    fn fill(&mut self) {
        let color = self.fill_style;
        let path = std::mem::take(&mut self.path);
        let step = 1.0 / SAMPLES as f32;
        let total = (SAMPLES * SAMPLES) as f32;

        for arc in &path {
            let (x0, x1) = Self::span(arc.x - arc.radius, arc.x + arc.radius, self.width);
            let (y0, y1) = Self::span(arc.y - arc.radius, arc.y + arc.radius, self.height);
            for py in y0..y1 {
                for px in x0..x1 {
                    let mut hits = 0u32;
                    for sy in 0..SAMPLES {
                        for sx in 0..SAMPLES {
                            let fx = px as f32 + (sx as f32 + 0.5) * step;
                            let fy = py as f32 + (sy as f32 + 0.5) * step;
                            if arc.contains(fx, fy) {
                                hits += 1;
                            }
                        }
                    }
                    if hits > 0 {
                        self.blend(px, py, color, hits as f32 / total);
                    }
                }
            }
        }

        // The path survives a fill, as on a canvas.
        self.path = path;
    }
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Resize { width: u32, height: u32 },
    ClearRect { x: f32, y: f32, width: f32, height: f32 },
    FillStyle(Color),
    BeginPath,
    Arc { x: f32, y: f32, radius: f32, start_angle: f32, end_angle: f32 },
    Fill,
}

/// A surface that draws nothing and records every call.
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl CommandLog {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// All calls since creation or the last [`take`](CommandLog::take).
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain the recorded calls.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Circles filled so far, as `(x, y, radius)`.
    pub fn filled_circles(&self) -> Vec<(f32, f32, f32)> {
        let mut pending = Vec::new();
        let mut filled = Vec::new();
        for cmd in &self.commands {
            match *cmd {
                DrawCommand::BeginPath => pending.clear(),
                DrawCommand::Arc { x, y, radius, .. } => pending.push((x, y, radius)),
                DrawCommand::Fill => filled.extend(pending.iter().copied()),
                _ => {}
            }
        }
        filled
    }
}

impl DrawSurface for CommandLog {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.push(DrawCommand::Resize { width, height });
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.commands.push(DrawCommand::ClearRect { x, y, width, height });
    }

    fn set_fill_style(&mut self, color: Color) {
        self.commands.push(DrawCommand::FillStyle(color));
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start_angle: f32, end_angle: f32) {
        self.commands.push(DrawCommand::Arc {
            x,
            y,
            radius,
            start_angle,
            end_angle,
        });
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_raster_is_clear() {
        let raster = Raster::new(4, 3);
        assert_eq!(raster.pixels().len(), 4 * 3 * 4);
        assert!(raster.pixels().iter().all(|&b| b == 0));
        assert_eq!(raster.pixel(4, 0), None);
    }

    #[test]
    fn test_fill_circle_covers_center() {
        let mut raster = Raster::new(20, 20);
        raster.set_fill_style(Color::WHITE);
        raster.begin_path();
        raster.arc(10.0, 10.0, 3.0, 0.0, TAU);
        raster.fill();

        assert_eq!(raster.pixel(10, 10), Some(Color::WHITE));
        assert_eq!(raster.pixel(0, 0), Some(Color::TRANSPARENT));
        assert_eq!(raster.pixel(15, 10), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_subpixel_radius_is_visible() {
        let mut raster = Raster::new(4, 4);
        raster.set_fill_style(Color::WHITE);
        raster.begin_path();
        raster.arc(2.0, 2.0, 0.6, 0.0, TAU);
        raster.fill();

        let alpha: u32 = raster.pixels().chunks(4).map(|p| p[3] as u32).sum();
        assert!(alpha > 0);
    }

    #[test]
    fn test_half_arc_fills_one_side() {
        let mut raster = Raster::new(20, 20);
        raster.set_fill_style(Color::WHITE);
        raster.begin_path();
        // 0..PI sweeps through +y, which is down on screen.
        raster.arc(10.0, 10.0, 6.0, 0.0, std::f32::consts::PI);
        raster.fill();

        assert_eq!(raster.pixel(10, 14), Some(Color::WHITE));
        assert_eq!(raster.pixel(10, 5), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_clear_rect_and_resize() {
        let mut raster = Raster::new(8, 8);
        raster.set_fill_style(Color::WHITE);
        raster.begin_path();
        raster.arc(4.0, 4.0, 4.0, 0.0, TAU);
        raster.fill();
        assert_eq!(raster.pixel(4, 4), Some(Color::WHITE));

        raster.clear_rect(0.0, 0.0, 8.0, 8.0);
        assert!(raster.pixels().iter().all(|&b| b == 0));

        raster.fill();
        raster.resize(5, 2);
        assert_eq!(raster.width(), 5);
        assert_eq!(raster.pixels().len(), 5 * 2 * 4);
        assert!(raster.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_clear_rect_clamps_to_bounds() {
        let mut raster = Raster::new(4, 4);
        raster.clear_rect(-10.0, -10.0, 100.0, 100.0);
        raster.clear_rect(10.0, 10.0, 1.0, 1.0);
    }

    #[test]
    fn test_translucent_blend() {
        let mut raster = Raster::new(3, 3);
        raster.set_fill_style(Color::rgba(255, 0, 0, 128));
        raster.begin_path();
        raster.arc(1.5, 1.5, 3.0, 0.0, TAU);
        raster.fill();

        let p = raster.pixel(1, 1).unwrap();
        assert_eq!((p.r, p.g, p.b), (255, 0, 0));
        assert_eq!(p.a, 128);
    }

    #[test]
    fn test_command_log_records_circles() {
        let mut log = CommandLog::new(10, 10);
        log.set_fill_style(Color::WHITE);
        log.begin_path();
        log.arc(1.0, 2.0, 0.5, 0.0, TAU);
        log.fill();
        log.begin_path();
        log.arc(9.0, 9.0, 1.0, 0.0, TAU);

        assert_eq!(log.filled_circles(), vec![(1.0, 2.0, 0.5)]);
        assert_eq!(log.commands().len(), 6);
        assert_eq!(log.take().len(), 6);
        assert!(log.commands().is_empty());
    }
}
