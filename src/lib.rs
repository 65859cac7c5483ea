//! Front end for spatial-lag regression runs: parameter marshaling, dataset
//! validation, weights resolution, and output-field construction. The
//! estimation itself lives behind the [`LagEstimator`] contract.

mod dataset;
mod error;
mod estimator;
mod fitting;
mod math;
mod output;
mod params;
mod types;
mod weights;

pub use dataset::{GeometryKind, SpatialDataset, MIN_OBSERVATIONS};
pub use error::SplagError;
pub use estimator::{FitOptions, LagEstimator, LagFit, Robust};
pub use output::{
    build_output, symbology_template, write_output, CandidateField, FieldKind, FIELD_NAMES,
};
pub use params::ToolParameters;
pub use polars::prelude::DataFrame;
pub use types::{DesignMatrix, Matrix, ResponseVector, Vector};
pub use weights::{SpatialWeights, WeightsRef};

use serde::Serialize;
use std::path::{Path, PathBuf};

/// A fitted spatial-lag run: the estimator's outputs plus the locally
/// computed standardized residuals.
#[derive(Debug)]
pub struct SpatialLagModel {
    pub dep_var: String,
    /// Regressors actually used, after the ID and dependent-variable drops.
    pub ind_vars: Vec<String>,
    pub n: usize,
    pub k: usize,
    pub dof: usize,
    pub fit: LagFit,
    pub std_residuals: Vector,
}

impl SpatialLagModel {
    /// Validate the variable configuration, join the weights, and run the
    /// estimator with White-robust standard errors and spatial diagnostics.
    pub fn fit<E: LagEstimator>(
        dataset: &SpatialDataset,
        weights: &WeightsRef,
        dep_var: &str,
        ind_vars: &[String],
        estimator: &E,
    ) -> Result<Self, SplagError> {
        let outcome = fitting::fit_model(dataset, weights, dep_var, ind_vars, estimator)?;
        Ok(Self {
            dep_var: dep_var.trim().to_uppercase(),
            ind_vars: outcome.ind_vars,
            n: dataset.n(),
            k: outcome.k,
            dof: outcome.dof,
            fit: outcome.fit,
            std_residuals: outcome.std_residuals,
        })
    }

    /// All model variables in output order, dependent variable first.
    pub fn all_vars(&self) -> Vec<String> {
        let mut vars = Vec::with_capacity(1 + self.ind_vars.len());
        vars.push(self.dep_var.clone());
        vars.extend(self.ind_vars.iter().cloned());
        vars
    }
}

/// Everything a finished run hands back to the host.
#[derive(Debug, Clone, Serialize)]
pub struct RunArtifacts {
    pub output_table: PathBuf,
    /// Chosen symbology template, when one was found for the geometry.
    pub symbology: Option<PathBuf>,
    pub rows: usize,
}

/// End-to-end tool run: resolve the weights file, read the attribute table,
/// fit, and materialize the output table with default symbology.
///
/// `id_field` is the host's unique-ID fallback; a key field declared by the
/// weights file header takes precedence, the way the host resolves it.
pub fn run_tool<E: LagEstimator>(
    params: &ToolParameters,
    id_field: &str,
    geometry: GeometryKind,
    template_dir: &Path,
    estimator: &E,
) -> Result<RunArtifacts, SplagError> {
    let weights = WeightsRef::from_path(&params.weights_file)?;
    let id_field = weights.id_field.as_deref().unwrap_or(id_field);

    let dataset = SpatialDataset::read_csv(&params.input_table, id_field, geometry)?;
    let model = SpatialLagModel::fit(
        &dataset,
        &weights,
        &params.dep_var,
        &params.ind_vars,
        estimator,
    )?;

    let mut frame = output::build_output(&dataset, &model)?;
    output::write_output(&mut frame, &params.output_table)?;
    let symbology = output::symbology_template(dataset.geometry(), template_dir);

    Ok(RunArtifacts {
        output_table: params.output_table.clone(),
        symbology,
        rows: frame.height(),
    })
}
