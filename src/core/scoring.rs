//! Scoring Primitives
//!
//! Numeric building blocks shared by the analyzers:
//! deviation-to-score curve, range classification, weighted blend and
//! Pearson correlation.

/// Deviation band (in points) that still scores a perfect 100
pub const FIT_TOLERANCE: f64 = 0.5;

/// Points lost per unit of deviation beyond the tolerance band
const FIT_PENALTY_PER_POINT: f64 = 20.0;

/// Convert a distance-from-ideal into a 0-100 fit score
///
/// Returns 100 inside the tolerance band and decreases linearly
/// outside of it, never dropping below 0. NaN scores 0.
///
/// # Examples
/// ```
/// use horserace::core::scoring::fit_score;
/// assert_eq!(fit_score(0.3), 100.0);
/// assert_eq!(fit_score(-1.0), 90.0);
/// assert_eq!(fit_score(12.0), 0.0);
/// ```
pub fn fit_score(deviation: f64) -> f64 {
    if deviation.is_nan() {
        return 0.0;
    }
    let abs = deviation.abs();
    if abs <= FIT_TOLERANCE {
        return 100.0;
    }

    (100.0 - (abs - FIT_TOLERANCE) * FIT_PENALTY_PER_POINT).clamp(0.0, 100.0)
}

/// Weighted two-source blend: `a * weight_a + b * weight_b`
///
/// Weights are fixed domain constants expected to sum to 1.
pub fn blend(a: f64, weight_a: f64, b: f64, weight_b: f64) -> f64 {
    a * weight_a + b * weight_b
}

/// Pearson product-moment correlation coefficient
///
/// Returns 0 for fewer than 2 points, mismatched lengths, or
/// zero-variance input instead of NaN.
pub fn correlation(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return 0.0;
    }

    let n = xs.len() as f64;
    let sum_x: f64 = xs.iter().sum();
    let sum_y: f64 = ys.iter().sum();
    let sum_xy: f64 = xs.iter().zip(ys).map(|(x, y)| x * y).sum();
    let sum_x2: f64 = xs.iter().map(|x| x * x).sum();
    let sum_y2: f64 = ys.iter().map(|y| y * y).sum();

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();

    if !denominator.is_finite() || denominator.abs() < 1e-9 {
        0.0
    } else {
        (numerator / denominator).clamp(-1.0, 1.0)
    }
}

/// One end of a category range
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Unbounded,
    Inclusive(f64),
    Exclusive(f64),
}

impl Bound {
    fn admits_above(&self, value: f64) -> bool {
        match self {
            Bound::Unbounded => true,
            Bound::Inclusive(n) => value >= *n,
            Bound::Exclusive(n) => value > *n,
        }
    }

    fn admits_below(&self, value: f64) -> bool {
        match self {
            Bound::Unbounded => true,
            Bound::Inclusive(n) => value <= *n,
            Bound::Exclusive(n) => value < *n,
        }
    }
}

/// Named range used by [`classify`]
#[derive(Debug, Clone, Copy)]
pub struct CategoryRange<T> {
    pub category: T,
    pub lower: Bound,
    pub upper: Bound,
}

impl<T: Copy> CategoryRange<T> {
    pub const fn new(category: T, lower: Bound, upper: Bound) -> Self {
        Self {
            category,
            lower,
            upper,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower.admits_above(value) && self.upper.admits_below(value)
    }
}

/// Return the category of the first range containing `value`
///
/// Range tables passed here partition the real line, so only NaN
/// falls through to `None`.
pub fn classify<T: Copy>(value: f64, ranges: &[CategoryRange<T>]) -> Option<T> {
    ranges
        .iter()
        .find(|range| range.contains(value))
        .map(|range| range.category)
}
