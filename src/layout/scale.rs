// Weight -> font size mapping
use crate::layout::{ScaleKind, SizedWord};
use crate::weighting::WeightedWord;

/// Map a weight onto `[range.0, range.1]`.
///
/// Degenerate domains never fail:
/// - a batch whose maximum is `<= 0` collapses to the minimum size
/// - `domain.0 == domain.1` maps everything to the maximum size
/// - `Log` over a domain reaching zero or below falls back to `Linear`
pub fn font_size(value: f64, domain: (f64, f64), range: (f64, f64), kind: ScaleKind) -> f64 {
    let (lo, hi) = if range.0 <= range.1 {
        (range.0, range.1)
    } else {
        (range.1, range.0)
    };
    let (d_min, d_max) = domain;

    if !value.is_finite() || d_max <= 0.0 {
        return range.0;
    }
    if d_min == d_max {
        return range.1;
    }

    let t = match kind {
        ScaleKind::Linear => normalize(value, d_min, d_max),
        ScaleKind::Sqrt => {
            let (s_min, s_max) = (d_min.max(0.0).sqrt(), d_max.sqrt());
            if s_min == s_max {
                return range.1;
            }
            normalize(value.max(0.0).sqrt(), s_min, s_max)
        }
        ScaleKind::Log => {
            if d_min <= 0.0 {
                tracing::debug!(
                    "Log scale undefined for domain [{}, {}], using linear",
                    d_min,
                    d_max
                );
                normalize(value, d_min, d_max)
            } else if value <= 0.0 {
                0.0
            } else {
                normalize(value.ln(), d_min.ln(), d_max.ln())
            }
        }
    };

    (range.0 + t * (range.1 - range.0)).clamp(lo, hi)
}

fn normalize(value: f64, min: f64, max: f64) -> f64 {
    (value - min) / (max - min)
}

/// Scale mapper bound to one kind and output range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleMapper {
    pub kind: ScaleKind,
    /// (min_px, max_px)
    pub range: (f64, f64),
}

impl ScaleMapper {
    pub fn new(kind: ScaleKind, min_px: f64, max_px: f64) -> Self {
        Self {
            kind,
            range: (min_px, max_px),
        }
    }

    /// (min, max) weight over a batch, ignoring non-finite values
    pub fn domain_of(words: &[WeightedWord]) -> Option<(f64, f64)> {
        words
            .iter()
            .map(|w| w.value)
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((min, max)) => Some((min.min(v), max.max(v))),
            })
    }

    pub fn font_size(&self, value: f64, domain: (f64, f64)) -> f64 {
        font_size(value, domain, self.range, self.kind)
    }

    /// Size a whole batch against its own domain, keeping input order
    pub fn size_words(&self, words: &[WeightedWord]) -> Vec<SizedWord> {
        let Some(domain) = Self::domain_of(words) else {
            return words
                .iter()
                .map(|w| SizedWord::new(w.text.clone(), self.range.0))
                .collect();
        };

        words
            .iter()
            .map(|w| SizedWord::new(w.text.clone(), self.font_size(w.value, domain)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RANGE: (f64, f64) = (14.0, 80.0);

    #[test]
    fn test_linear_endpoints_and_midpoint() {
        let d = (10.0, 110.0);
        assert_eq!(font_size(10.0, d, RANGE, ScaleKind::Linear), 14.0);
        assert_eq!(font_size(110.0, d, RANGE, ScaleKind::Linear), 80.0);
        assert!((font_size(60.0, d, RANGE, ScaleKind::Linear) - 47.0).abs() < 1e-9);
    }

    #[test]
    fn test_sqrt_compresses_high_end() {
        let d = (0.0, 100.0);
        let linear = font_size(25.0, d, RANGE, ScaleKind::Linear);
        let sqrt = font_size(25.0, d, RANGE, ScaleKind::Sqrt);
        // sqrt(25)/sqrt(100) = 0.5 vs 0.25 linearly
        assert!((sqrt - 47.0).abs() < 1e-9);
        assert!(sqrt > linear);
    }

    #[test]
    fn test_log_interpolates_over_ln() {
        let d = (1.0, 100.0);
        let mid = font_size(10.0, d, RANGE, ScaleKind::Log);
        assert!((mid - 47.0).abs() < 1e-9);
    }

    #[test]
    fn test_log_falls_back_to_linear_at_zero() {
        let d = (0.0, 50.0);
        assert_eq!(
            font_size(25.0, d, RANGE, ScaleKind::Log),
            font_size(25.0, d, RANGE, ScaleKind::Linear)
        );
    }

    #[test]
    fn test_degenerate_domain_is_maximal() {
        assert_eq!(font_size(7.0, (7.0, 7.0), RANGE, ScaleKind::Linear), 80.0);
        assert_eq!(font_size(7.0, (7.0, 7.0), RANGE, ScaleKind::Log), 80.0);
    }

    #[test]
    fn test_zero_maximum_collapses_to_minimum() {
        assert_eq!(font_size(0.0, (0.0, 0.0), RANGE, ScaleKind::Linear), 14.0);
        assert_eq!(font_size(0.0, (0.0, 0.0), RANGE, ScaleKind::Sqrt), 14.0);
    }

    #[test]
    fn test_output_clamped_to_range() {
        let d = (10.0, 20.0);
        assert_eq!(font_size(-500.0, d, RANGE, ScaleKind::Linear), 14.0);
        assert_eq!(font_size(500.0, d, RANGE, ScaleKind::Sqrt), 80.0);
        assert_eq!(font_size(f64::NAN, d, RANGE, ScaleKind::Linear), 14.0);
    }

    #[test]
    fn test_custom_range() {
        let mapper = ScaleMapper::new(ScaleKind::Linear, 10.0, 20.0);
        assert_eq!(mapper.font_size(5.0, (0.0, 10.0)), 15.0);
    }

    #[test]
    fn test_size_words_uses_batch_domain() {
        let mapper = ScaleMapper::new(ScaleKind::Linear, 14.0, 80.0);
        let words = vec![
            WeightedWord::new("a", 100.0),
            WeightedWord::new("b", 50.0),
            WeightedWord::new("c", 0.0),
        ];
        let sized = mapper.size_words(&words);
        assert_eq!(sized[0].font_size, 80.0);
        assert_eq!(sized[2].font_size, 14.0);
        assert_eq!(sized[1].text, "b");
        assert!(ScaleMapper::domain_of(&[]).is_none());
    }
}
