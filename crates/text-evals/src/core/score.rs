//! Built-in combinators for [`PointwiseMetric::to_pairwise`](crate::PointwiseMetric::to_pairwise).
//!
//! Each takes `(reference_score, prediction_score)` and is total over finite
//! inputs: none of them panic, and [`ratio`] maps a zero reference to zero.

/// Signature shared by the built-in score functions.
pub type PairwiseScoreFn = fn(f64, f64) -> f64;

/// `prediction - reference`
pub fn difference(reference: f64, prediction: f64) -> f64 {
    prediction - reference
}

/// `prediction / reference`, or `0.0` when the reference score is zero.
pub fn ratio(reference: f64, prediction: f64) -> f64 {
    if reference == 0.0 {
        return 0.0;
    }
    prediction / reference
}

pub fn absolute_difference(reference: f64, prediction: f64) -> f64 {
    (prediction - reference).abs()
}

pub fn max(reference: f64, prediction: f64) -> f64 {
    if reference > prediction {
        reference
    } else {
        prediction
    }
}

pub fn min(reference: f64, prediction: f64) -> f64 {
    if reference < prediction {
        reference
    } else {
        prediction
    }
}

pub fn average(reference: f64, prediction: f64) -> f64 {
    (reference + prediction) / 2.0
}

/// Canonical names accepted by [`by_name`].
pub const SCORE_FN_NAMES: &[&str] = &[
    "difference",
    "ratio",
    "absolute_difference",
    "max",
    "min",
    "average",
];

/// Looks up a built-in score function by its snake_case name.
pub fn by_name(name: &str) -> Option<PairwiseScoreFn> {
    let score_fn: PairwiseScoreFn = match name {
        "difference" => difference,
        "ratio" => ratio,
        "absolute_difference" => absolute_difference,
        "max" => max,
        "min" => min,
        "average" => average,
        _ => return None,
    };
    Some(score_fn)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0.0, 5.0)]
    #[case(0.0, 0.0)]
    #[case(0.0, -3.5)]
    fn ratio_by_zero_reference_is_zero(#[case] reference: f64, #[case] prediction: f64) {
        assert_eq!(ratio(reference, prediction), 0.0);
    }

    #[rstest]
    #[case(1.0, 4.0)]
    #[case(-2.5, 0.5)]
    #[case(3.0, 3.0)]
    fn symmetry_properties(#[case] r: f64, #[case] p: f64) {
        assert_eq!(average(r, p), average(p, r));
        assert_eq!(difference(r, p), -difference(p, r));
        assert_eq!(absolute_difference(r, p), absolute_difference(p, r));
        assert_eq!(max(r, p), max(p, r));
        assert_eq!(min(r, p), min(p, r));
    }

    #[test]
    fn basic_values() {
        assert_eq!(difference(2.0, 5.0), 3.0);
        assert_eq!(ratio(2.0, 5.0), 2.5);
        assert_eq!(absolute_difference(5.0, 2.0), 3.0);
        assert_eq!(max(2.0, 5.0), 5.0);
        assert_eq!(min(2.0, 5.0), 2.0);
        assert_eq!(average(2.0, 5.0), 3.5);
    }

    #[test]
    fn every_listed_name_resolves() {
        for name in SCORE_FN_NAMES {
            assert!(by_name(name).is_some(), "{name} should resolve");
        }
        assert!(by_name("median").is_none());
    }
}
