use crate::error::SplagError;
use crate::types::Vector;

/// Population variance (ddof = 0), the convention used when screening the
/// dependent variable before a fit is attempted.
pub(crate) fn variance(values: &Vector) -> f64 {
    values.var(0.0)
}

/// Standardized residuals with the degrees-of-freedom correction:
/// sqrt(dof / n) * r / std(r), where std is the population standard
/// deviation of the residuals themselves.
pub(crate) fn standardized_residuals(
    residuals: &Vector,
    dof: usize,
    n: usize,
) -> Result<Vector, SplagError> {
    let spread = residuals.std(0.0);
    if spread == 0.0 || !spread.is_finite() {
        return Err(SplagError::DegenerateResiduals);
    }
    let scale = (dof as f64 / n as f64).sqrt();
    Ok(residuals.mapv(|r| scale * r / spread))
}

/// All-NaN column of length n, used when the estimator reports no
/// predicted errors.
pub(crate) fn nan_vector(n: usize) -> Vector {
    Vector::from_elem(n, f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_standardized_residuals() {
        let r = array![1.0, -1.0, 2.0, -2.0];
        let n = 10;
        let dof = 7;

        let out = standardized_residuals(&r, dof, n).unwrap();

        let spread = r.std(0.0);
        let scale = (7.0f64 / 10.0).sqrt();
        for (got, want) in out.iter().zip(r.iter().map(|v| scale * v / spread)) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn test_constant_residuals_are_degenerate() {
        let r = array![3.0, 3.0, 3.0];
        let result = standardized_residuals(&r, 1, 3);
        assert!(matches!(result, Err(SplagError::DegenerateResiduals)));
    }

    #[test]
    fn test_nan_vector() {
        let v = nan_vector(4);
        assert_eq!(v.len(), 4);
        assert!(v.iter().all(|x| x.is_nan()));
    }

    #[test]
    fn test_variance_is_population_variance() {
        let v = array![1.0, 2.0, 3.0, 4.0];
        assert!((variance(&v) - 1.25).abs() < 1e-12);
    }
}
