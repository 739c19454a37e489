//! Entropy-based uncertainty helpers shared by generation and prediction.

/// Added inside `ln` so zero probabilities stay finite.
pub const LOG_EPSILON: f64 = 1e-12;

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Shannon entropy (nats) with an epsilon-guarded log.
pub fn entropy(probs: &[f64]) -> f64 {
    -probs.iter().map(|p| p * (p + LOG_EPSILON).ln()).sum::<f64>()
}

/// Entropy divided by the maximum for `probs.len()` outcomes, clamped to [0, 1].
///
/// Distributions with fewer than two outcomes carry no uncertainty.
pub fn normalized_entropy(probs: &[f64]) -> f64 {
    if probs.len() < 2 {
        return 0.0;
    }
    let max = (probs.len() as f64).ln();
    (entropy(probs) / max).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_uniform_triple_is_one() {
        let third = 1.0 / 3.0;
        let u = normalized_entropy(&[third, third, third]);
        assert!((u - 1.0).abs() < 0.01, "got {}", u);
    }

    #[test]
    fn test_one_hot_is_zero() {
        let u = normalized_entropy(&[1.0, 0.0, 0.0]);
        assert!(u.abs() < 0.01, "got {}", u);
    }

    #[test]
    fn test_single_outcome() {
        assert_eq!(normalized_entropy(&[1.0]), 0.0);
        assert_eq!(normalized_entropy(&[]), 0.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.456, 2), 0.46);
        assert_eq!(round_to(0.454, 2), 0.45);
        assert_eq!(round_to(0.12345, 3), 0.123);
    }

    proptest! {
        #[test]
        fn normalized_entropy_in_unit_interval(raw in prop::collection::vec(0.0f64..1.0, 2..60)) {
            let total: f64 = raw.iter().sum();
            prop_assume!(total > 1e-9);
            let probs: Vec<f64> = raw.iter().map(|p| p / total).collect();
            let u = normalized_entropy(&probs);
            prop_assert!((0.0..=1.0).contains(&u));
        }
    }
}
