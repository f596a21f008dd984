// Text extents
use unicode_width::UnicodeWidthChar;

/// Measures the unrotated extent of a word
///
/// Implementations backed by real font metrics can be swapped in; the engine
/// only relies on the returned `(width, height)`.
pub trait TextMeasurer: Send + Sync {
    fn measure(&self, text: &str, font_family: &str, font_size: f64) -> (f64, f64);
}

/// Em-based approximation using terminal display widths
///
/// Wide glyphs (CJK, fullwidth forms) advance `wide_advance` em, other
/// printable glyphs `narrow_advance` em, combining marks nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmMeasurer {
    pub narrow_advance: f64,
    pub wide_advance: f64,
    pub line_height: f64,
}

impl Default for EmMeasurer {
    fn default() -> Self {
        Self {
            narrow_advance: 0.6,
            wide_advance: 1.0,
            line_height: 1.0,
        }
    }
}

impl TextMeasurer for EmMeasurer {
    fn measure(&self, text: &str, _font_family: &str, font_size: f64) -> (f64, f64) {
        let ems: f64 = text
            .chars()
            .map(|c| match c.width() {
                Some(2) => self.wide_advance,
                Some(0) => 0.0,
                _ => self.narrow_advance,
            })
            .sum();
        (ems * font_size, self.line_height * font_size)
    }
}

/// Axis-aligned hull of a `width` x `height` box rotated by `degrees`
pub fn rotated_extent(width: f64, height: f64, degrees: f64) -> (f64, f64) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    (width * cos + height * sin, width * sin + height * cos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_glyphs_are_one_em() {
        let m = EmMeasurer::default();
        let (w, h) = m.measure("词云", "any", 20.0);
        assert_eq!(w, 40.0);
        assert_eq!(h, 20.0);
    }

    #[test]
    fn test_narrow_glyphs() {
        let m = EmMeasurer::default();
        let (w, _) = m.measure("data", "any", 10.0);
        assert!((w - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotated_extent_quarter_turn_swaps() {
        let (w, h) = rotated_extent(40.0, 10.0, 90.0);
        assert!((w - 10.0).abs() < 1e-9);
        assert!((h - 40.0).abs() < 1e-9);

        let (w, h) = rotated_extent(40.0, 10.0, -90.0);
        assert!((w - 10.0).abs() < 1e-9);
        assert!((h - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotated_extent_diagonal_grows() {
        let (w, h) = rotated_extent(10.0, 10.0, 45.0);
        assert!((w - 10.0 * 2f64.sqrt()).abs() < 1e-9);
        assert!((h - w).abs() < 1e-9);
    }
}
