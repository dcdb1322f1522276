// Drawing targets for the effects. `CanvasSurface` paints through a 2d canvas
// context, `PixelSurface` rasterizes into an RGBA buffer that can be pushed to a
// canvas with put_image_data (and inspected directly in tests).

use std::f64::consts::PI;

use vecmath::{vec2_add, vec2_dot, vec2_len, vec2_scale, vec2_sub, Vector2};
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use crate::color::Color;
use crate::error::{EffectsError, Result};

/// Pixel dimensions of a drawing surface.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Bounds {
        Bounds { width, height }
    }

    pub fn center(&self) -> Vector2<f64> {
        [self.width / 2.0, self.height / 2.0]
    }

    pub fn contains(&self, pos: Vector2<f64>) -> bool {
        pos[0] >= 0.0 && pos[0] <= self.width && pos[1] >= 0.0 && pos[1] <= self.height
    }

    pub fn clamp(&self, pos: Vector2<f64>) -> Vector2<f64> {
        [
            pos[0].max(0.0).min(self.width),
            pos[1].max(0.0).min(self.height),
        ]
    }
}

/// Fill or stroke style. Gradient stops are a colour plus an alpha.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid {
        color: Color,
        alpha: f64,
    },
    Linear {
        start: Vector2<f64>,
        end: Vector2<f64>,
        from: (Color, f64),
        to: (Color, f64),
    },
    Radial {
        center: Vector2<f64>,
        radius: f64,
        from: (Color, f64),
        to: (Color, f64),
    },
}

impl Paint {
    pub fn solid(color: Color, alpha: f64) -> Paint {
        Paint::Solid { color, alpha }
    }

    /// Colour and alpha of the paint at `point`.
    pub fn sample(&self, point: Vector2<f64>) -> (Color, f64) {
        let (from, to, t) = match *self {
            Paint::Solid { color, alpha } => return (color, alpha),
            Paint::Linear {
                start,
                end,
                from,
                to,
            } => {
                let axis = vec2_sub(end, start);
                let len_sq = vec2_dot(axis, axis);
                let t = if len_sq > 0.0 {
                    vec2_dot(vec2_sub(point, start), axis) / len_sq
                } else {
                    0.0
                };
                (from, to, t)
            }
            Paint::Radial {
                center,
                radius,
                from,
                to,
            } => {
                let t = if radius > 0.0 {
                    vec2_len(vec2_sub(point, center)) / radius
                } else {
                    1.0
                };
                (from, to, t)
            }
        };
        let t = t.max(0.0).min(1.0);
        (from.0.lerp(to.0, t), from.1 + (to.1 - from.1) * t)
    }
}

/// The 2d raster target the effects paint onto.
pub trait DrawingSurface {
    /// Current dimensions, read at the start of every frame.
    fn bounds(&self) -> Bounds;

    fn clear(&mut self);

    fn fill_circle(&mut self, center: Vector2<f64>, radius: f64, paint: &Paint);

    fn stroke_line(&mut self, from: Vector2<f64>, to: Vector2<f64>, width: f64, paint: &Paint);

    /// Strokes a polyline, joining the last point back to the first when `closed`.
    fn stroke_path(&mut self, points: &[Vector2<f64>], closed: bool, width: f64, paint: &Paint) {
        for pair in points.windows(2) {
            self.stroke_line(pair[0], pair[1], width, paint);
        }
        if closed && points.len() > 2 {
            self.stroke_line(points[points.len() - 1], points[0], width, paint);
        }
    }
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<CanvasSurface> {
        let context = canvas
            .get_context("2d")?
            .ok_or(EffectsError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| EffectsError::ContextUnavailable)?;

        Ok(CanvasSurface { canvas, context })
    }

    /// Looks up a `<canvas>` on the current document by id.
    pub fn from_element_id(id: &str) -> Result<CanvasSurface> {
        let canvas = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(id))
            .ok_or_else(|| EffectsError::MissingElement(id.to_owned()))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| EffectsError::MissingElement(id.to_owned()))?;
        CanvasSurface::new(canvas)
    }

    /// Host-side resize notification; the next frame picks the new bounds up.
    pub fn set_size(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.context
    }

    fn apply_paint(&self, paint: &Paint, fill: bool) {
        let style: JsValue = match *paint {
            Paint::Solid { color, alpha } => JsValue::from_str(&color.css(alpha)),
            Paint::Linear {
                start,
                end,
                from,
                to,
            } => {
                let gradient = self
                    .context
                    .create_linear_gradient(start[0], start[1], end[0], end[1]);
                add_stops(&gradient, from, to);
                gradient.into()
            }
            Paint::Radial {
                center,
                radius,
                from,
                to,
            } => match self.context.create_radial_gradient(
                center[0], center[1], 0.0, center[0], center[1], radius,
            ) {
                Ok(gradient) => {
                    add_stops(&gradient, from, to);
                    gradient.into()
                }
                Err(err) => {
                    log::warn!("radial gradient rejected: {:?}", err);
                    JsValue::from_str(&from.0.css(from.1))
                }
            },
        };
        if fill {
            self.context.set_fill_style(&style);
        } else {
            self.context.set_stroke_style(&style);
        }
    }
}

fn add_stops(gradient: &CanvasGradient, from: (Color, f64), to: (Color, f64)) {
    for (offset, (color, alpha)) in [(0.0, from), (1.0, to)].iter() {
        if let Err(err) = gradient.add_color_stop(*offset as f32, &color.css(*alpha)) {
            log::warn!("gradient stop rejected: {:?}", err);
        }
    }
}

impl DrawingSurface for CanvasSurface {
    fn bounds(&self) -> Bounds {
        Bounds::new(self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn clear(&mut self) {
        let bounds = self.bounds();
        self.context.clear_rect(0.0, 0.0, bounds.width, bounds.height);
    }

    fn fill_circle(&mut self, center: Vector2<f64>, radius: f64, paint: &Paint) {
        self.context.begin_path();
        if let Err(err) = self
            .context
            .arc(center[0], center[1], radius, 0.0, PI * 2.0)
        {
            log::warn!("arc rejected: {:?}", err);
            return;
        }
        self.apply_paint(paint, true);
        self.context.fill();
    }

    fn stroke_line(&mut self, from: Vector2<f64>, to: Vector2<f64>, width: f64, paint: &Paint) {
        self.context.begin_path();
        self.context.move_to(from[0], from[1]);
        self.context.line_to(to[0], to[1]);
        self.apply_paint(paint, false);
        self.context.set_line_width(width);
        self.context.stroke();
    }

    fn stroke_path(&mut self, points: &[Vector2<f64>], closed: bool, width: f64, paint: &Paint) {
        let (first, rest) = match points.split_first() {
            Some(split) => split,
            None => return,
        };
        self.context.begin_path();
        self.context.move_to(first[0], first[1]);
        for point in rest {
            self.context.line_to(point[0], point[1]);
        }
        if closed {
            self.context.close_path();
        }
        self.apply_paint(paint, false);
        self.context.set_line_width(width);
        self.context.stroke();
    }
}

/// Software RGBA raster. Pixel (x, y) covers [x, x+1) x [y, y+1).
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixel_data: Vec<u8>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> PixelSurface {
        PixelSurface {
            width,
            height,
            pixel_data: vec![0x00; (width * height * 4) as usize],
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixel_data = vec![0x00; (width * height * 4) as usize];
    }

    pub fn pixel_data(&self) -> &[u8] {
        &self.pixel_data
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.get_pixel_index(x, y).map(|idx| Color {
            r: self.pixel_data[idx],
            g: self.pixel_data[idx + 1],
            b: self.pixel_data[idx + 2],
            a: self.pixel_data[idx + 3],
        })
    }

    /// Copies the raster onto a canvas context at the origin.
    pub fn present(&self, ctx: &CanvasRenderingContext2d) -> std::result::Result<(), JsValue> {
        let image_data = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(self.pixel_data.as_slice()),
            self.width,
            self.height,
        )?;

        ctx.put_image_data(&image_data, 0.0, 0.0)
    }

    fn get_pixel_index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(((y * self.width as i32 + x) * 4) as usize)
        } else {
            None
        }
    }

    fn blend_pixel(&mut self, x: i32, y: i32, paint: &Paint) {
        let idx = match self.get_pixel_index(x, y) {
            Some(idx) => idx,
            None => return,
        };
        let dst = Color {
            r: self.pixel_data[idx],
            g: self.pixel_data[idx + 1],
            b: self.pixel_data[idx + 2],
            a: self.pixel_data[idx + 3],
        };
        let (color, alpha) = paint.sample([x as f64 + 0.5, y as f64 + 0.5]);
        let out = color.blend_over(dst, alpha);
        self.pixel_data[idx] = out.r;
        self.pixel_data[idx + 1] = out.g;
        self.pixel_data[idx + 2] = out.b;
        self.pixel_data[idx + 3] = out.a;
    }

    // Pixel rows/columns overlapping [min, max], clipped to the raster.
    fn span(&self, min: f64, max: f64, limit: u32) -> std::ops::Range<i32> {
        let lo = min.floor().max(0.0) as i32;
        let hi = (max.floor() + 1.0).min(limit as f64).max(0.0) as i32;
        lo..hi.max(lo)
    }
}

fn distance_to_segment(point: Vector2<f64>, from: Vector2<f64>, to: Vector2<f64>) -> f64 {
    let seg = vec2_sub(to, from);
    let len_sq = vec2_dot(seg, seg);
    if len_sq == 0.0 {
        return vec2_len(vec2_sub(point, from));
    }
    let t = (vec2_dot(vec2_sub(point, from), seg) / len_sq).max(0.0).min(1.0);
    let closest = vec2_add(from, vec2_scale(seg, t));
    vec2_len(vec2_sub(point, closest))
}

impl DrawingSurface for PixelSurface {
    fn bounds(&self) -> Bounds {
        Bounds::new(self.width as f64, self.height as f64)
    }

    fn clear(&mut self) {
        for byte in self.pixel_data.iter_mut() {
            *byte = 0x00;
        }
    }

    fn fill_circle(&mut self, center: Vector2<f64>, radius: f64, paint: &Paint) {
        let mut covered = false;
        for y in self.span(center[1] - radius, center[1] + radius, self.height) {
            for x in self.span(center[0] - radius, center[0] + radius, self.width) {
                let pixel_center = [x as f64 + 0.5, y as f64 + 0.5];
                if vec2_len(vec2_sub(pixel_center, center)) <= radius {
                    self.blend_pixel(x, y, paint);
                    covered = true;
                }
            }
        }
        // Sub-pixel dots still mark the pixel they sit in.
        if !covered {
            self.blend_pixel(center[0].floor() as i32, center[1].floor() as i32, paint);
        }
    }

    fn stroke_line(&mut self, from: Vector2<f64>, to: Vector2<f64>, width: f64, paint: &Paint) {
        let half = (width / 2.0).max(0.5);
        let rows = self.span(from[1].min(to[1]) - half, from[1].max(to[1]) + half, self.height);
        let cols = self.span(from[0].min(to[0]) - half, from[0].max(to[0]) + half, self.width);
        for y in rows {
            for x in cols.clone() {
                let pixel_center = [x as f64 + 0.5, y as f64 + 0.5];
                if distance_to_segment(pixel_center, from, to) <= half {
                    self.blend_pixel(x, y, paint);
                }
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    const BLUE: Color = Color::rgb(96, 165, 250);

    #[test]
    fn bounds_contain_edges() {
        let bounds = Bounds::new(300.0, 200.0);
        assert!(bounds.contains([0.0, 0.0]));
        assert!(bounds.contains([300.0, 200.0]));
        assert!(!bounds.contains([300.1, 10.0]));
        assert_eq!(bounds.clamp([-4.0, 250.0]), [0.0, 200.0]);
        assert_eq!(bounds.center(), [150.0, 100.0]);
    }

    #[test]
    fn linear_paint_interpolates_along_axis() {
        let paint = Paint::Linear {
            start: [0.0, 0.0],
            end: [10.0, 0.0],
            from: (Color::rgb(0, 0, 0), 0.0),
            to: (Color::rgb(200, 100, 50), 1.0),
        };
        let (color, alpha) = paint.sample([5.0, 3.0]);
        assert_eq!(color, Color::rgb(100, 50, 25));
        assert!((alpha - 0.5).abs() < 1e-12);
        assert_eq!(paint.sample([-5.0, 0.0]).1, 0.0);
        assert_eq!(paint.sample([50.0, 0.0]).1, 1.0);
    }

    #[test]
    fn radial_paint_fades_out_at_radius() {
        let paint = Paint::Radial {
            center: [20.0, 20.0],
            radius: 40.0,
            from: (Color::rgb(37, 99, 235), 0.15),
            to: (Color::rgb(37, 99, 235), 0.0),
        };
        assert!((paint.sample([20.0, 20.0]).1 - 0.15).abs() < 1e-12);
        assert_eq!(paint.sample([100.0, 20.0]).1, 0.0);
    }

    #[test]
    fn filled_circle_covers_center_only_within_radius() {
        let mut surface = PixelSurface::new(20, 20);
        surface.fill_circle([10.0, 10.0], 2.0, &Paint::solid(BLUE, 1.0));
        assert_eq!(surface.pixel(10, 10), Some(BLUE));
        assert_eq!(surface.pixel(9, 9), Some(BLUE));
        assert_eq!(surface.pixel(14, 10), Some(Color::TRANSPARENT));
    }

    #[test]
    fn tiny_circle_still_marks_its_pixel() {
        let mut surface = PixelSurface::new(4, 4);
        surface.fill_circle([2.9, 1.1], 0.1, &Paint::solid(BLUE, 1.0));
        assert_eq!(surface.pixel(2, 1), Some(BLUE));
    }

    #[test]
    fn drawing_outside_is_clipped() {
        let mut surface = PixelSurface::new(4, 4);
        surface.fill_circle([-10.0, -10.0], 2.0, &Paint::solid(BLUE, 1.0));
        surface.stroke_line([-5.0, 50.0], [50.0, 50.0], 1.0, &Paint::solid(BLUE, 1.0));
        assert!(surface.pixel_data().iter().all(|&b| b == 0));
    }

    #[test]
    fn line_blends_each_pixel_once() {
        let mut surface = PixelSurface::new(10, 3);
        let line = Color::rgb(37, 99, 235);
        surface.stroke_line([0.0, 1.5], [10.0, 1.5], 0.5, &Paint::solid(line, 0.5));
        for x in 0..10 {
            assert_eq!(surface.pixel(x, 1).map(|c| c.a), Some(128));
        }
        assert_eq!(surface.pixel(5, 0), Some(Color::TRANSPARENT));
    }

    #[test]
    fn clear_resets_to_transparent() {
        let mut surface = PixelSurface::new(5, 5);
        surface.fill_circle([2.5, 2.5], 3.0, &Paint::solid(BLUE, 1.0));
        surface.clear();
        assert!(surface.pixel_data().iter().all(|&b| b == 0));
    }

    #[test]
    fn resize_reallocates_and_updates_bounds() {
        let mut surface = PixelSurface::new(5, 5);
        surface.resize(8, 2);
        assert_eq!(surface.bounds(), Bounds::new(8.0, 2.0));
        assert_eq!(surface.pixel_data().len(), 8 * 2 * 4);
        assert_eq!(surface.pixel(7, 1), Some(Color::TRANSPARENT));
        assert_eq!(surface.pixel(8, 1), None);
    }

    #[test]
    fn default_path_closes_back_to_start() {
        let mut pixels = PixelSurface::new(10, 10);
        let square = [[1.5, 1.5], [8.5, 1.5], [8.5, 8.5], [1.5, 8.5]];
        pixels.stroke_path(&square, true, 1.0, &Paint::solid(BLUE, 1.0));
        assert_eq!(pixels.pixel(1, 5), Some(BLUE));
        assert_eq!(pixels.pixel(5, 5), Some(Color::TRANSPARENT));
    }
}
