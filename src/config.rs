/// Tunables shared by the rate solver and the amortization engine.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Convergence threshold for the secant solver in [`crate::formula::rate_with_config`].
    pub accuracy: f64,
    /// Upper bound on secant steps before the solver gives up.
    pub max_iterations: u32,
    /// Decimal places kept in schedule rows and totals.
    pub precision: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            accuracy: 1e-6,
            max_iterations: 100,
            precision: 2,
        }
    }
}

impl Config {
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_precision(mut self, precision: i32) -> Self {
        self.precision = precision;
        self
    }
}

/// Round `amt` to `dec` decimal places, halves away from zero.
pub fn round(amt: f64, dec: i32) -> f64 {
    if amt == 0. {
        0.
    } else {
        let scale = 10_f64.powi(dec);
        (amt * scale).round() / scale
    }
}

#[cfg(test)]
mod tests {
    use super::{round, Config};
    use test_log::test;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.accuracy, 1e-6);
        assert_eq!(config.max_iterations, 100);
        assert_eq!(config.precision, 2);
    }

    #[test]
    fn test_config_setters() {
        let config = Config::default()
            .with_accuracy(1e-9)
            .with_max_iterations(20)
            .with_precision(4);
        assert_eq!(
            config,
            Config {
                accuracy: 1e-9,
                max_iterations: 20,
                precision: 4
            }
        );
    }

    #[test]
    fn test_round() {
        assert_eq!(round(5833.333333, 2), 5833.33);
        assert_eq!(round(89166.666666, 2), 89166.67);
        assert_eq!(round(-1223.9338728947132, 2), -1223.93);
        assert_eq!(round(1799.86912, 4), 1799.8691);
        assert_eq!(round(2.5, 0), 3.);
        assert_eq!(round(-2.5, 0), -3.);
        assert_eq!(round(0., 2), 0.);
    }
}
