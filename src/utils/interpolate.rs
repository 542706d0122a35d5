use crate::errors::SimulationError;

/// Piecewise-linear lookup table over a non-decreasing abscissa.
///
/// Queries outside the sampled range clamp to the nearest endpoint value.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleTable {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl SampleTable {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, SimulationError> {
        if xs.len() != ys.len() {
            return Err(SimulationError::ConfigurationError(format!(
                "Sample table length mismatch: {} abscissae, {} values",
                xs.len(),
                ys.len()
            )));
        }
        if xs.is_empty() {
            return Err(SimulationError::ConfigurationError(
                "Sample table must contain at least one sample".to_string(),
            ));
        }
        if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
            return Err(SimulationError::ConfigurationError(
                "Sample table contains non-finite values".to_string(),
            ));
        }
        if let Some(i) = xs.windows(2).position(|w| w[1] < w[0]) {
            return Err(SimulationError::ConfigurationError(format!(
                "Sample table abscissae must be non-decreasing ({} follows {} at index {})",
                xs[i + 1],
                xs[i],
                i + 1
            )));
        }

        Ok(SampleTable { xs, ys })
    }

    /// Single-sample table, constant everywhere.
    pub fn constant(value: f64) -> Self {
        SampleTable {
            xs: vec![0.0],
            ys: vec![value],
        }
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn interpolate(&self, x: f64) -> f64 {
        let last = self.xs.len() - 1;
        // first index whose abscissa lies strictly above x
        let upper = self.xs.partition_point(|&sample| sample <= x);

        if upper == 0 {
            return self.ys[0];
        }
        if upper > last {
            return self.ys[last];
        }

        // xs[lower] <= x < xs[upper], so the segment has non-zero width
        let lower = upper - 1;
        let fraction = (x - self.xs[lower]) / (self.xs[upper] - self.xs[lower]);
        self.ys[lower] + fraction * (self.ys[upper] - self.ys[lower])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn thrust_curve() -> SampleTable {
        SampleTable::new(
            vec![0.0, 10_000.0, 20_000.0, 40_000.0],
            vec![10_000.0, 11_000.0, 11_500.0, 12_000.0],
        )
        .unwrap()
    }

    #[test]
    fn test_interpolates_between_samples() {
        let table = thrust_curve();
        assert_abs_diff_eq!(table.interpolate(5_000.0), 10_500.0, epsilon = 1e-9);
        assert_abs_diff_eq!(table.interpolate(30_000.0), 11_750.0, epsilon = 1e-9);
    }

    #[test]
    fn test_exact_samples_are_returned() {
        let table = thrust_curve();
        assert_eq!(table.interpolate(0.0), 10_000.0);
        assert_eq!(table.interpolate(20_000.0), 11_500.0);
        assert_eq!(table.interpolate(40_000.0), 12_000.0);
    }

    #[test]
    fn test_clamps_outside_range() {
        let table = thrust_curve();
        assert_eq!(table.interpolate(-500.0), 10_000.0);
        assert_eq!(table.interpolate(1.0e6), 12_000.0);
    }

    #[test]
    fn test_repeated_abscissa_steps_without_dividing_by_zero() {
        let table = SampleTable::new(vec![0.0, 100.0, 100.0, 200.0], vec![1.0, 2.0, 5.0, 6.0])
            .unwrap();
        assert_eq!(table.interpolate(100.0), 5.0);
        assert_abs_diff_eq!(table.interpolate(50.0), 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(table.interpolate(150.0), 5.5, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_table() {
        let table = SampleTable::constant(42.0);
        assert_eq!(table.len(), 1);
        assert_eq!(table.interpolate(-1.0), 42.0);
        assert_eq!(table.interpolate(1.0e9), 42.0);
    }

    #[test]
    fn test_rejects_malformed_tables() {
        assert!(matches!(
            SampleTable::new(vec![0.0, 1.0], vec![1.0]),
            Err(SimulationError::ConfigurationError(_))
        ));
        assert!(matches!(
            SampleTable::new(vec![], vec![]),
            Err(SimulationError::ConfigurationError(_))
        ));
        assert!(matches!(
            SampleTable::new(vec![0.0, 2.0, 1.0], vec![1.0, 2.0, 3.0]),
            Err(SimulationError::ConfigurationError(_))
        ));
        assert!(matches!(
            SampleTable::new(vec![0.0, f64::NAN], vec![1.0, 2.0]),
            Err(SimulationError::ConfigurationError(_))
        ));
    }
}
