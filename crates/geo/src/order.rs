//! Deterministic float ordering.
//!
//! Every sort and argmin in the navigation engine goes through
//! [`stable_total_cmp`] so repeated evaluation over the same inputs always
//! produces the same selection.

use core::cmp::Ordering;

/// Canonicalize a float for ordering: `-0.0` folds to `0.0` and all NaNs
/// collapse into one canonical NaN.
pub fn canonical(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Deterministic total ordering for floats.
///
/// Prefer this any time floats are sorted or used as ordered keys.
pub fn stable_total_cmp(a: f64, b: f64) -> Ordering {
    canonical(a).total_cmp(&canonical(b))
}
