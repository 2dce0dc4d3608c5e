//! Lane comparison rules
//!
//! | Class | Rule |
//! |-------|------|
//! | integer lanes | bit-exact |
//! | float, exact primitive | equal, or both NaN, or both below the smallest normal |
//! | float, estimate primitive | relative error within tolerance; exact when the oracle is 0 or infinite |

use lanewise_core::Element;
use serde::Serialize;

/// One lane where backend and oracle disagree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaneMismatch {
    pub lane: usize,
    pub got: String,
    pub expected: String,
    /// Relative error, for estimate-class comparisons
    pub relative_error: Option<f64>,
}

/// Smallest positive normal value at the precision of `T`
fn min_normal<T: Element>() -> f64 {
    match T::KIND.size() {
        4 => f32::MIN_POSITIVE as f64,
        _ => f64::MIN_POSITIVE,
    }
}

/// Exact comparison of a single lane
pub fn lane_matches<T: Element>(got: T, expected: T) -> bool {
    if got == expected || !T::KIND.is_float() {
        return got == expected;
    }
    let (g, e) = (got.to_f64_lossy(), expected.to_f64_lossy());
    (g.is_nan() && e.is_nan()) || (g.abs() < min_normal::<T>() && e.abs() < min_normal::<T>())
}

/// Relative error of `got` against `expected`, `None` when they must match exactly
pub fn relative_error(got: f64, expected: f64) -> Option<f64> {
    if expected == 0.0 || expected.is_infinite() || expected.is_nan() {
        None
    } else {
        Some(((got - expected) / expected).abs())
    }
}

/// Compare two lane slices; mismatches in lane order, at most `limit` of them
pub fn compare_lanes<T: Element>(
    got: &[T],
    expected: &[T],
    tolerance: f64,
    limit: usize,
) -> Vec<LaneMismatch> {
    got.iter()
        .zip(expected)
        .enumerate()
        .filter_map(|(lane, (&g, &e))| {
            if lane_matches(g, e) {
                return None;
            }
            let error = if T::KIND.is_float() && tolerance > 0.0 {
                relative_error(g.to_f64_lossy(), e.to_f64_lossy())
            } else {
                None
            };
            match error {
                Some(err) if err <= tolerance => None,
                _ => Some(LaneMismatch {
                    lane,
                    got: g.to_string(),
                    expected: e.to_string(),
                    relative_error: error,
                }),
            }
        })
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_are_exact() {
        assert!(lane_matches(-5i64, -5));
        assert!(!lane_matches(i64::MAX, i64::MAX - 1));
        let mismatches = compare_lanes(&[1u8, 2, 3], &[1, 9, 4], 0.5, 8);
        assert_eq!(mismatches.len(), 2);
        assert_eq!(mismatches[0].lane, 1);
        assert_eq!(mismatches[0].got, "2");
        assert_eq!(mismatches[0].expected, "9");
        assert_eq!(mismatches[0].relative_error, None);
    }

    #[test]
    fn test_float_special_values() {
        assert!(lane_matches(f32::NAN, -f32::NAN));
        assert!(lane_matches(0.0f64, -0.0));
        assert!(lane_matches(1e-40f32, 0.0));
        assert!(!lane_matches(f32::INFINITY, f32::MAX));
        assert!(!lane_matches(1.0f32, f32::NAN));
    }

    #[test]
    fn test_tolerance() {
        let got = [1.001f32, 2.0, 0.0, f32::INFINITY];
        let want = [1.0f32, 2.1, 1e-3, f32::INFINITY];
        let mismatches = compare_lanes(&got, &want, 1e-2, 8);
        assert_eq!(mismatches.len(), 2);
        assert_eq!(mismatches[0].lane, 1);
        assert!(mismatches[0].relative_error.unwrap() > 1e-2);
        assert_eq!(mismatches[1].lane, 2);
    }

    #[test]
    fn test_exact_when_oracle_is_zero_or_infinite() {
        assert_eq!(relative_error(1e-9, 0.0), None);
        assert_eq!(relative_error(f64::MAX, f64::INFINITY), None);
        assert_eq!(relative_error(1.5, 1.0), Some(0.5));
        let mismatches = compare_lanes(&[f64::MAX], &[f64::INFINITY], 1.0, 8);
        assert_eq!(mismatches.len(), 1);
    }

    #[test]
    fn test_limit() {
        let got = [0u16; 32];
        let want = [1u16; 32];
        assert_eq!(compare_lanes(&got, &want, 0.0, 4).len(), 4);
    }
}
