use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SplagError {
    #[error("expected {expected} positional parameters, got {got}")]
    ParameterCount { expected: usize, got: usize },

    #[error("parameter {index} ({name}) is empty")]
    EmptyParameter { index: usize, name: &'static str },

    #[error("unique ID field '{field}' cannot also be the dependent variable")]
    MasterFieldIsDependent { field: String },

    #[error("no independent variables remain after validation")]
    NoIndependentVars,

    #[error("dependent variable '{field}' has zero or undefined variance")]
    ZeroVariance { field: String },

    #[error("{got} observations found, at least {min} are required")]
    TooFewObservations { got: usize, min: usize },

    #[error("n = {n} observations cannot support {k} model terms")]
    TooFewDegreesOfFreedom { n: usize, k: usize },

    #[error("field '{field}' not found in {location}")]
    FieldNotFound { field: String, location: String },

    #[error("field '{field}' is not numeric or has missing values ({affected} affected rows)")]
    FieldNotNumeric { field: String, affected: usize },

    #[error("ID field '{field}' is not unique: {distinct} distinct values over {rows} rows")]
    IdFieldNotUnique {
        field: String,
        distinct: usize,
        rows: usize,
    },

    #[error("weights file {path}: {reason}")]
    WeightsParse { path: String, reason: String },

    #[error("weights are keyed by '{declared}' but the dataset ID field is '{id_field}'")]
    WeightsKeyMismatch { declared: String, id_field: String },

    #[error("observation {id} has no entry in the weights structure")]
    WeightsCoverage { id: i64 },

    #[error("weights structure references unknown observation {id}")]
    UnknownWeightsId { id: i64 },

    #[error("estimator returned {got} values for {what}, expected {expected}")]
    EstimatorShape {
        what: &'static str,
        got: usize,
        expected: usize,
    },

    #[error("residuals have zero spread, standardized residuals are undefined")]
    DegenerateResiduals,

    #[error("estimation failed: {0}")]
    Estimation(String),

    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
