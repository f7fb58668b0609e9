//! Histogram bucket helpers.

/// Decimal buckets from `10^min_power` to `5 * 10^max_power` with 1-2-5
/// steps per decade.
///
/// `decimal_buckets(-2, 1)` yields
/// `[0.01, 0.02, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 50.0]`.
pub fn decimal_buckets(min_power: i32, max_power: i32) -> Vec<f64> {
    assert!(
        min_power <= max_power,
        "min_power must be <= max_power, given {} and {}",
        min_power,
        max_power
    );
    let mut buckets = Vec::with_capacity(3 * (max_power - min_power + 1) as usize);
    for power in min_power..=max_power {
        for mul in &[1f64, 2f64, 5f64] {
            buckets.push(mul * 10f64.powi(power));
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_two_five_per_decade() {
        assert_eq!(
            decimal_buckets(-1, 1),
            vec![0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 50.0]
        );
    }
}
