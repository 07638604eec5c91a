use rand::Rng;

/// Uniform draw from `[-half_width, half_width]`.
#[inline]
pub fn jitter(rng: &mut impl Rng, half_width: f64) -> f64 {
    if half_width <= 0.0 {
        return 0.0;
    }
    rng.gen_range(-half_width..=half_width)
}

#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Uniform integer draw from the inclusive range.
#[inline]
pub fn pick(rng: &mut impl Rng, low: u32, high: u32) -> u32 {
    rng.gen_range(low..=high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn jitter_stays_within_half_width() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1_000 {
            let j = jitter(&mut rng, 0.05);
            assert!((-0.05..=0.05).contains(&j));
        }
    }

    #[test]
    fn zero_width_jitter_is_zero() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(jitter(&mut rng, 0.0), 0.0);
    }

    #[test]
    fn round_to_truncates_to_requested_decimals() {
        assert_eq!(round_to(0.95449, 3), 0.954);
        assert_eq!(round_to(12.36, 1), 12.4);
        assert_eq!(round_to(-1.234, 2), -1.23);
    }
}
