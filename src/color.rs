// Simple color struct, created from an unsigned 32 representing RRGGBBAA.
// Translucency of strokes and fills is carried separately as an f64 alpha so
// that faint connection lines keep their exact opacity on a 2d canvas.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color { r, g, b, a }
    }

    pub fn from_u32(num: u32) -> Color {
        let r = (num >> 24) as u8;
        let g = (num >> 16) as u8;
        let b = (num >> 8) as u8;
        let a = num as u8;

        Color { r, g, b, a }
    }

    /// CSS `rgba()` string with the given alpha, as accepted by canvas fill and stroke styles.
    pub fn css(&self, alpha: f64) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, alpha)
    }

    /// Composites `self` at `alpha` over `dst` (source-over, straight alpha).
    pub fn blend_over(&self, dst: Color, alpha: f64) -> Color {
        let src_a = alpha.max(0.0).min(1.0) * (self.a as f64 / 255.0);
        if src_a <= 0.0 {
            return dst;
        }
        let dst_a = dst.a as f64 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        let channel = |s: u8, d: u8| {
            let c = (s as f64 * src_a + d as f64 * dst_a * (1.0 - src_a)) / out_a;
            c.round() as u8
        };

        Color {
            r: channel(self.r, dst.r),
            g: channel(self.g, dst.g),
            b: channel(self.b, dst.b),
            a: (out_a * 255.0).round() as u8,
        }
    }

    /// Linear interpolation between two colours, `t` clamped to [0, 1].
    pub fn lerp(&self, other: Color, t: f64) -> Color {
        let t = t.max(0.0).min(1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_u32_unpacks_rrggbbaa() {
        assert_eq!(Color::from_u32(0x60a5faff), Color::rgb(96, 165, 250));
    }

    #[test]
    fn css_keeps_fractional_alpha() {
        assert_eq!(Color::rgb(37, 99, 235).css(0.04), "rgba(37,99,235,0.04)");
    }

    #[test]
    fn opaque_blend_replaces_destination() {
        let out = Color::rgb(10, 20, 30).blend_over(Color::rgb(200, 200, 200), 1.0);
        assert_eq!(out, Color::rgb(10, 20, 30));
    }

    #[test]
    fn blend_onto_transparent_keeps_colour_and_sets_alpha() {
        let out = Color::rgb(96, 165, 250).blend_over(Color::TRANSPARENT, 0.5);
        assert_eq!((out.r, out.g, out.b), (96, 165, 250));
        assert_eq!(out.a, 128);
    }

    #[test]
    fn zero_alpha_is_a_no_op() {
        let dst = Color::rgb(1, 2, 3);
        assert_eq!(Color::rgb(255, 255, 255).blend_over(dst, 0.0), dst);
    }

    #[test]
    fn lerp_hits_endpoints() {
        let a = Color::rgb(37, 99, 235);
        let b = Color::rgb(6, 182, 212);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }
}
