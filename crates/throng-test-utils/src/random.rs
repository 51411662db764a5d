//! Deterministic random source for tests.

use throng_core::RandomSource;

/// Replays a fixed list of samples, cycling when exhausted.
///
/// An empty list behaves like `constant(0.0)`.
#[derive(Clone, Debug)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
    draws: u64,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            cursor: 0,
            draws: 0,
        }
    }

    /// Always returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of samples drawn so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        self.draws += 1;
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor = (self.cursor + 1) % self.values.len();
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_values() {
        let mut r = ScriptedRandom::new(vec![0.1, 0.2]);
        assert_eq!(r.next_f64(), 0.1);
        assert_eq!(r.next_f64(), 0.2);
        assert_eq!(r.next_f64(), 0.1);
        assert_eq!(r.draws(), 3);
    }
}
