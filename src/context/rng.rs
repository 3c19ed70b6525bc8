/// A seeded generator of numbers in `[0, 1)`. It only needs to spread names
/// apart reproducibly, so it is not suitable for anything else.
#[derive(Debug, PartialEq, Clone)]
pub(crate) struct SimpleRng {
    seed: f64,
}

impl SimpleRng {
    pub(crate) fn with_seed(seed: f64) -> Self {
        Self { seed }
    }

    pub(crate) fn next_float(&mut self) -> f64 {
        let x = self.seed.sin() * 10_000.0;
        self.seed += 1.0;
        x - x.floor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_rng_is_reproducible() {
        let mut first = SimpleRng::with_seed(1.0);
        let mut second = SimpleRng::with_seed(1.0);
        for _ in 0..10 {
            let value = first.next_float();
            assert!((0.0..1.0).contains(&value));
            assert_eq!(value, second.next_float());
        }
    }

    #[test]
    fn simple_rng_first_value() {
        // sin(1) * 10000 = 8414.709848078965
        let value = SimpleRng::with_seed(1.0).next_float();
        assert!((value - 0.709848078965).abs() < 1e-6);
    }
}
