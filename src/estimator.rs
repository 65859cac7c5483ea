use crate::error::SplagError;
use crate::types::{DesignMatrix, ResponseVector, Vector};
use crate::weights::SpatialWeights;

/// Standard-error treatment requested from the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Robust {
    /// Classical standard errors.
    None,
    /// White heteroskedasticity-consistent standard errors.
    #[default]
    White,
}

/// Everything the estimator needs besides the data itself. The display
/// names are threaded through so the textual summary can name the model
/// variables, the weights and the source dataset.
#[derive(Debug, Clone)]
pub struct FitOptions {
    pub robust: Robust,
    pub spatial_diagnostics: bool,
    pub name_y: String,
    pub name_x: Vec<String>,
    pub name_w: String,
    pub name_ds: String,
}

impl FitOptions {
    pub fn new(name_y: String, name_x: Vec<String>, name_w: String, name_ds: String) -> Self {
        Self {
            robust: Robust::White,
            spatial_diagnostics: true,
            name_y,
            name_x,
            name_w,
            name_ds,
        }
    }
}

/// What a fitted spatial-lag estimator hands back.
#[derive(Debug, Clone)]
pub struct LagFit {
    /// Predicted values, one per observation.
    pub predicted: Vector,
    /// Raw residuals, one per observation.
    pub residuals: Vector,
    /// Prediction-error estimates; estimators are allowed to omit these.
    pub predicted_errors: Option<Vector>,
    /// Human-readable fit summary.
    pub summary: String,
}

/// Contract of the external statistics library. Rows of `y` and `x` follow
/// the order of `ids`, which key into `weights`.
pub trait LagEstimator {
    fn fit(
        &self,
        y: &ResponseVector,
        x: &DesignMatrix,
        weights: &SpatialWeights,
        ids: &[i64],
        options: &FitOptions,
    ) -> Result<LagFit, SplagError>;
}
