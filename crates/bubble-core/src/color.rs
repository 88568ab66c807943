//! Color and intensity model.
//!
//! Token bubbles are colored from the distribution of the whole live set:
//! an outlier pass (largest gap in the sorted magnitudes) decides which
//! bubbles get an extra glow. Trade bubbles are simply green or red with
//! emphasis relative to the largest bubble on screen.

use crate::constants::*;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// CSS `rgba()` form accepted by canvas fill/stroke/shadow styles.
impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.a)
    }
}

pub const WHITE: Rgba = Rgba::new(255, 255, 255, 0.8);
pub const LIGHT_GREEN: Rgba = Rgba::new(134, 239, 172, 0.9);
pub const MEDIUM_GREEN: Rgba = Rgba::new(74, 222, 128, 0.9);
pub const GREEN: Rgba = Rgba::new(34, 197, 94, 0.9);
pub const DEEP_GREEN: Rgba = Rgba::new(22, 163, 74, 0.95);
pub const ORANGE: Rgba = Rgba::new(251, 146, 60, 0.9);
pub const DARK_ORANGE: Rgba = Rgba::new(249, 115, 22, 0.9);
pub const RED: Rgba = Rgba::new(239, 68, 68, 0.9);
pub const DEEP_RED: Rgba = Rgba::new(185, 28, 28, 0.95);

/// Everything the renderer needs to paint a bubble's body and glow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BubbleStyle {
    pub fill: Rgba,
    pub glow: Rgba,
    pub line_width: f32,
    pub shadow_blur: f32,
    pub intensity: f32,
    pub outlier: f32,
}

/// Statistics of |change| over the live set, recomputed every frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChangeDistribution {
    pub max: f64,
    pub min: f64,
    pub avg: f64,
    pub max_gap: f64,
    pub values_are_close: bool,
    pub has_significant_gaps: bool,
    pub gap_threshold: f64,
}

impl ChangeDistribution {
    pub fn from_changes(changes: &[f64]) -> Self {
        let mut sorted: Vec<f64> = changes
            .iter()
            .filter(|c| c.is_finite())
            .map(|c| c.abs())
            .collect();
        if sorted.is_empty() {
            return Self::default();
        }
        sorted.sort_by(|a, b| a.total_cmp(b));

        let n = sorted.len();
        let min = sorted[0];
        let max = sorted[n - 1];
        let avg = sorted.iter().sum::<f64>() / n as f64;
        let range = max - min;
        let values_are_close = range < avg * CLOSE_VALUES_RATIO;

        let start = ((n as f64 * GAP_SCAN_START_QUANTILE).floor() as usize).max(1);
        let max_gap = (start..n)
            .map(|i| sorted[i] - sorted[i - 1])
            .fold(0.0_f64, f64::max);
        let has_significant_gaps = max_gap > range * SIGNIFICANT_GAP_RATIO;
        let gap_threshold = if has_significant_gaps {
            max - max_gap
        } else {
            max
        };

        Self {
            max,
            min,
            avg,
            max_gap,
            values_are_close,
            has_significant_gaps,
            gap_threshold,
        }
    }

    /// 0 for ordinary values, up to 1 for values beyond the largest gap.
    pub fn outlier_factor(&self, abs_change: f64) -> f32 {
        if self.has_significant_gaps && !self.values_are_close && abs_change > self.gap_threshold {
            ((abs_change - self.gap_threshold) / self.max_gap).min(1.0) as f32
        } else {
            0.0
        }
    }

    pub fn intensity(&self, abs_change: f64, outlier: f32) -> f32 {
        let share = if self.max > 0.0 {
            (abs_change / self.max) as f32
        } else {
            0.0
        };
        (share * CHANGE_INTENSITY_WEIGHT + outlier * OUTLIER_INTENSITY_WEIGHT).min(MAX_INTENSITY)
    }
}

/// Style of a token bubble with percent `change` within `dist`.
pub fn token_style(change: f64, dist: &ChangeDistribution) -> BubbleStyle {
    let change = if change.is_finite() { change } else { 0.0 };
    let abs_change = change.abs();
    let positive = change >= 0.0;
    let outlier = dist.outlier_factor(abs_change);
    let intensity = dist.intensity(abs_change, outlier);

    let normalized = if positive {
        (change / SATURATION_CHANGE).min(1.0)
    } else {
        (change / SATURATION_CHANGE).max(-1.0)
    } as f32;

    let (glow, fill_base, alpha_span) = if abs_change < NEAR_ZERO_CHANGE {
        (WHITE, WHITE, NEUTRAL_FILL_ALPHA_SPAN)
    } else if positive {
        match normalized {
            n if n < LOW_BAND => (LIGHT_GREEN, LIGHT_GREEN, FILL_ALPHA_SPAN),
            n if n < MID_BAND => (MEDIUM_GREEN, MEDIUM_GREEN, FILL_ALPHA_SPAN),
            _ if outlier > 0.0 => (DEEP_GREEN, GREEN, FILL_ALPHA_SPAN),
            _ => (GREEN, GREEN, FILL_ALPHA_SPAN),
        }
    } else {
        match normalized {
            n if n > -LOW_BAND => (ORANGE, ORANGE, FILL_ALPHA_SPAN),
            n if n > -MID_BAND => (DARK_ORANGE, DARK_ORANGE, FILL_ALPHA_SPAN),
            _ if outlier > 0.0 => (DEEP_RED, RED, FILL_ALPHA_SPAN),
            _ => (RED, RED, FILL_ALPHA_SPAN),
        }
    };

    BubbleStyle {
        fill: fill_base.with_alpha(FILL_ALPHA_BASE + intensity * alpha_span),
        glow,
        line_width: GLOW_WIDTH_BASE + intensity * GLOW_WIDTH_INTENSITY + outlier * GLOW_WIDTH_OUTLIER,
        shadow_blur: GLOW_BLUR_BASE + outlier * GLOW_BLUR_OUTLIER,
        intensity,
        outlier,
    }
}

pub fn token_styles(changes: &[f64]) -> Vec<BubbleStyle> {
    let dist = ChangeDistribution::from_changes(changes);
    changes.iter().map(|c| token_style(*c, &dist)).collect()
}

/// Buy/sell coloring with emphasis `radius / max_radius`.
pub fn trade_style(is_buy: bool, radius: f32, max_radius: f32) -> BubbleStyle {
    let intensity = if max_radius > 0.0 {
        (radius / max_radius).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let base = if is_buy { GREEN } else { RED };
    BubbleStyle {
        fill: base.with_alpha(FILL_ALPHA_BASE + intensity * FILL_ALPHA_SPAN),
        glow: base,
        line_width: GLOW_WIDTH_BASE + intensity * GLOW_WIDTH_INTENSITY,
        shadow_blur: GLOW_BLUR_BASE,
        intensity,
        outlier: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_formats_as_css() {
        assert_eq!(GREEN.to_string(), "rgba(34, 197, 94, 0.900)");
        assert_eq!(WHITE.with_alpha(2.0).a, 1.0);
    }

    #[test]
    fn largest_gap_marks_the_outlier() {
        let dist = ChangeDistribution::from_changes(&[1.0, -2.0, 3.0, 4.0, 50.0]);
        assert!(dist.has_significant_gaps);
        assert!(!dist.values_are_close);
        assert_eq!(dist.max_gap, 46.0);
        assert_eq!(dist.gap_threshold, 4.0);
        assert_eq!(dist.outlier_factor(50.0), 1.0);
        assert_eq!(dist.outlier_factor(4.0), 0.0);
        assert!((dist.intensity(50.0, 1.0) - MAX_INTENSITY).abs() < 1e-6);
    }

    #[test]
    fn close_values_produce_no_outliers() {
        let styles = token_styles(&[10.0, 10.5, 11.0, 12.0]);
        assert!(styles.iter().all(|s| s.outlier == 0.0));
    }

    #[test]
    fn color_bands_follow_sign_and_magnitude() {
        let dist = ChangeDistribution::from_changes(&[0.2, 2.0, 4.0, 8.0, -2.0, -4.0, -8.0]);
        assert_eq!(token_style(0.2, &dist).glow, WHITE);
        assert_eq!(token_style(2.0, &dist).glow, LIGHT_GREEN);
        assert_eq!(token_style(4.0, &dist).glow, MEDIUM_GREEN);
        assert_eq!(token_style(-2.0, &dist).glow, ORANGE);
        assert_eq!(token_style(-4.0, &dist).glow, DARK_ORANGE);
        let deep = token_style(-8.0, &dist).glow;
        assert!(deep == RED || deep == DEEP_RED);
    }

    #[test]
    fn outlier_gets_wider_glow() {
        let dist = ChangeDistribution::from_changes(&[1.0, 2.0, 3.0, 4.0, 50.0]);
        let plain = token_style(4.0, &dist);
        let outlier = token_style(50.0, &dist);
        assert_eq!(outlier.glow, DEEP_GREEN);
        assert!(outlier.line_width > plain.line_width);
        assert!(outlier.shadow_blur > plain.shadow_blur);
    }

    #[test]
    fn empty_and_zero_sets_do_not_produce_nan() {
        let dist = ChangeDistribution::from_changes(&[]);
        assert_eq!(dist.intensity(0.0, 0.0), 0.0);
        let styles = token_styles(&[0.0, 0.0]);
        assert!(styles.iter().all(|s| s.fill.a.is_finite() && s.intensity == 0.0));
    }

    #[test]
    fn trade_emphasis_scales_with_radius() {
        let small = trade_style(true, 20.0, 40.0);
        let big = trade_style(false, 40.0, 40.0);
        assert_eq!(small.glow, GREEN);
        assert_eq!(big.glow, RED);
        assert!(big.fill.a > small.fill.a);
        assert!((big.line_width - 3.5).abs() < 1e-6);
    }
}
