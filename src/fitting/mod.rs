use crate::dataset::SpatialDataset;
use crate::error::SplagError;
use crate::estimator::{FitOptions, LagEstimator, LagFit};
use crate::math;
use crate::types::{DesignMatrix, Matrix, ResponseVector, Vector};
use crate::weights::WeightsRef;

/// Outcome of the validation and invocation stages, consumed by the
/// crate-root model struct.
#[derive(Debug)]
pub(crate) struct FitOutcome {
    pub(crate) ind_vars: Vec<String>,
    pub(crate) k: usize,
    pub(crate) dof: usize,
    pub(crate) fit: LagFit,
    pub(crate) std_residuals: Vector,
}

pub(crate) fn fit_model<E: LagEstimator>(
    dataset: &SpatialDataset,
    weights: &WeightsRef,
    dep_var: &str,
    ind_vars: &[String],
    estimator: &E,
) -> Result<FitOutcome, SplagError> {
    let dep_var = dep_var.trim().to_uppercase();
    let mut ind_vars: Vec<String> = ind_vars.iter().map(|v| v.trim().to_uppercase()).collect();

    // The ID field cannot double as the dependent variable.
    if dataset.id_field() == dep_var {
        return Err(SplagError::MasterFieldIsDependent { field: dep_var });
    }

    // The ID field and the dependent variable are dropped from the
    // regressors with a warning, not a failure.
    if let Some(position) = ind_vars.iter().position(|v| v == dataset.id_field()) {
        log::warn!(
            "unique ID field '{}' removed from the independent variables",
            dataset.id_field()
        );
        ind_vars.remove(position);
    }
    if let Some(position) = ind_vars.iter().position(|v| *v == dep_var) {
        log::warn!(
            "dependent variable '{}' removed from the independent variables",
            dep_var
        );
        ind_vars.remove(position);
    }
    if ind_vars.is_empty() {
        return Err(SplagError::NoIndependentVars);
    }

    // Weights must be joined to the same key field the dataset uses.
    if let Some(declared) = weights.id_field.as_deref() {
        if declared != dataset.id_field() {
            return Err(SplagError::WeightsKeyMismatch {
                declared: declared.to_string(),
                id_field: dataset.id_field().to_string(),
            });
        }
    }
    weights.weights.validate_against(dataset.ids())?;

    let n = dataset.n();
    let y = ResponseVector(dataset.numeric_column(&dep_var)?);

    let y_var = math::variance(&y);
    if y_var.is_nan() || y_var <= 0.0 {
        return Err(SplagError::ZeroVariance { field: dep_var });
    }

    // k counts the intercept the estimator will add.
    let k = ind_vars.len() + 1;
    if n <= k + 1 {
        return Err(SplagError::TooFewDegreesOfFreedom { n, k });
    }
    let dof = n - k - 1;

    let mut x = Matrix::zeros((n, k - 1));
    for (column, variable) in ind_vars.iter().enumerate() {
        x.column_mut(column).assign(&dataset.numeric_column(variable)?);
    }
    let x = DesignMatrix(x);

    let options = FitOptions::new(
        dep_var,
        ind_vars.clone(),
        weights.name.clone(),
        dataset.display_name(),
    );
    let fit = estimator.fit(&y, &x, &weights.weights, dataset.ids(), &options)?;

    check_len("predicted values", fit.predicted.len(), n)?;
    check_len("residuals", fit.residuals.len(), n)?;
    if let Some(e_pred) = &fit.predicted_errors {
        check_len("predicted errors", e_pred.len(), n)?;
    }

    let std_residuals = math::standardized_residuals(&fit.residuals, dof, n)?;
    log::info!("{}", fit.summary);

    Ok(FitOutcome {
        ind_vars,
        k,
        dof,
        fit,
        std_residuals,
    })
}

fn check_len(what: &'static str, got: usize, expected: usize) -> Result<(), SplagError> {
    if got != expected {
        return Err(SplagError::EstimatorShape {
            what,
            got,
            expected,
        });
    }
    Ok(())
}
