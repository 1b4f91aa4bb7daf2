//! Exponential moving average smoother
//!
//! Single-pole low-pass filter used by the `smooth` transform. The state
//! lives in the normalized input domain; scaling happens afterwards.

/// Default smoothing factor
pub const DEFAULT_ALPHA: f64 = 0.15;

/// Stateful EMA filter for one target parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Smoother {
    alpha: f64,
    state: Option<f64>,
}

impl Smoother {
    /// Create a smoother; `alpha` is clamped into (0, 1]
    pub fn new(alpha: f64) -> Self {
        let alpha = if alpha.is_finite() {
            alpha.clamp(f64::EPSILON, 1.0)
        } else {
            DEFAULT_ALPHA
        };
        Self { alpha, state: None }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Current filtered value, `None` before the first update
    pub fn value(&self) -> Option<f64> {
        self.state
    }

    /// Feed a raw value and return the filtered one
    ///
    /// The first update seeds the state with the raw value, so there is no
    /// warm-up ramp from zero.
    pub fn update(&mut self, raw: f64) -> f64 {
        let next = match self.state {
            None => raw,
            Some(current) => current + self.alpha * (raw - current),
        };
        self.state = Some(next);
        next
    }
}

impl Default for Smoother {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_update_seeds_state() {
        let mut smoother = Smoother::new(0.1);
        assert_eq!(smoother.value(), None);
        assert_eq!(smoother.update(0.8), 0.8);
        assert_eq!(smoother.value(), Some(0.8));
    }

    #[test]
    fn test_update_moves_by_alpha() {
        let mut smoother = Smoother::new(0.5);
        smoother.update(1.0);
        assert_eq!(smoother.update(0.0), 0.5);
        assert_eq!(smoother.update(0.0), 0.25);
    }

    #[test]
    fn test_converges_to_constant_input() {
        let alpha = 0.15;
        let mut smoother = Smoother::new(alpha);
        smoother.update(0.0);

        // Error shrinks by (1 - alpha) per tick; 10/alpha ticks is plenty
        let ticks = (10.0 / alpha) as usize;
        let mut previous = 0.0;
        for _ in 0..ticks {
            let value = smoother.update(1.0);
            assert!(value >= previous);
            previous = value;
        }
        assert!((1.0 - previous).abs() < 1e-3);
    }

    #[test]
    fn test_alpha_is_clamped() {
        assert_eq!(Smoother::new(4.0).alpha(), 1.0);
        assert!(Smoother::new(0.0).alpha() > 0.0);
        assert_eq!(Smoother::new(f64::NAN).alpha(), DEFAULT_ALPHA);
    }

    #[test]
    fn test_alpha_one_tracks_input() {
        let mut smoother = Smoother::new(1.0);
        smoother.update(0.2);
        assert_eq!(smoother.update(0.9), 0.9);
    }
}
