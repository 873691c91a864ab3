use std::sync::Mutex;

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Coin flip used to make some refreshes fail on purpose.
#[derive(Debug)]
pub struct FailureInjector {
    rate: f64,
    rng: Mutex<StdRng>,
}

impl FailureInjector {
    pub fn new(rate: f64, seed: Option<u64>) -> Self {
        let rate = if rate.is_finite() { rate.clamp(0.0, 1.0) } else { 0.0 };
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rate,
            rng: Mutex::new(rng),
        }
    }

    pub fn should_fail(&self) -> bool {
        if self.rate <= 0.0 {
            return false;
        }
        if self.rate >= 1.0 {
            return true;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_bool(self.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_are_deterministic() {
        let never = FailureInjector::new(0.0, None);
        let always = FailureInjector::new(1.0, None);
        for _ in 0..100 {
            assert!(!never.should_fail());
            assert!(always.should_fail());
        }
    }

    #[test]
    fn out_of_range_rates_are_clamped() {
        let above = FailureInjector::new(7.5, None);
        let below = FailureInjector::new(-1.0, None);
        let nan = FailureInjector::new(f64::NAN, None);
        for _ in 0..100 {
            assert!(above.should_fail());
            assert!(!below.should_fail());
            assert!(!nan.should_fail());
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = FailureInjector::new(0.2, Some(42));
        let b = FailureInjector::new(0.2, Some(42));
        let xs: Vec<bool> = (0..64).map(|_| a.should_fail()).collect();
        let ys: Vec<bool> = (0..64).map(|_| b.should_fail()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn rate_is_roughly_respected() {
        let inj = FailureInjector::new(0.2, Some(7));
        let failures = (0..10_000).filter(|_| inj.should_fail()).count();
        assert!((1_500..2_500).contains(&failures), "got {failures}");
    }
}
