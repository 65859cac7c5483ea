use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::dataset::{GeometryKind, SpatialDataset};
use crate::error::SplagError;
use crate::math;
use crate::types::Vector;
use crate::SpatialLagModel;

/// Derived column names, in output order.
pub const FIELD_NAMES: [&str; 4] = ["Estimated", "Residual", "StdResid", "PredRes"];

/// Storage type of an output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Double,
    Integer,
}

/// A column waiting to be appended to the output table.
#[derive(Debug, Clone)]
pub struct CandidateField {
    pub name: String,
    pub kind: FieldKind,
    pub values: Vector,
}

impl CandidateField {
    pub fn double(name: &str, values: Vector) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Double,
            values,
        }
    }

    pub fn to_series(&self) -> Series {
        match self.kind {
            FieldKind::Double => Series::new(&self.name, self.values.to_vec()),
            FieldKind::Integer => {
                let values: Vec<i64> = self.values.iter().map(|v| *v as i64).collect();
                Series::new(&self.name, values)
            }
        }
    }
}

/// Assemble the output table: the ID field, the model variables, then the
/// four derived columns. Row count always matches the input. Estimators may
/// omit predicted errors; the column is still written, as NaN.
pub fn build_output(
    dataset: &SpatialDataset,
    model: &SpatialLagModel,
) -> Result<DataFrame, SplagError> {
    let e_pred = match &model.fit.predicted_errors {
        Some(e) => e.clone(),
        None => math::nan_vector(dataset.n()),
    };

    let mut columns: Vec<Series> =
        Vec::with_capacity(2 + model.ind_vars.len() + FIELD_NAMES.len());
    columns.push(Series::new(dataset.id_field(), dataset.ids().to_vec()));
    for variable in model.all_vars() {
        columns.push(Series::new(
            &variable,
            dataset.numeric_column(&variable)?.to_vec(),
        ));
    }

    let derived = [
        CandidateField::double(FIELD_NAMES[0], model.fit.predicted.clone()),
        CandidateField::double(FIELD_NAMES[1], model.fit.residuals.clone()),
        CandidateField::double(FIELD_NAMES[2], model.std_residuals.clone()),
        CandidateField::double(FIELD_NAMES[3], e_pred),
    ];
    for field in &derived {
        columns.push(field.to_series());
    }

    Ok(DataFrame::new(columns)?)
}

/// Write the assembled output as CSV.
pub fn write_output(frame: &mut DataFrame, path: &Path) -> Result<(), SplagError> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(frame)?;
    Ok(())
}

/// Pick the symbology template for the output's geometry, under
/// `<template dir>/Layers`. Missing templates only warn; a run never fails
/// over presentation.
pub fn symbology_template(geometry: GeometryKind, template_dir: &Path) -> Option<PathBuf> {
    let file = match geometry {
        GeometryKind::Point => "StdResidPoints.lyr",
        GeometryKind::Polyline => "StdResidPolylines.lyr",
        GeometryKind::Polygon => "StdResidPolygons.lyr",
    };

    let path = template_dir.join("Layers").join(file);
    if path.is_file() {
        Some(path)
    } else {
        log::warn!(
            "symbology template {} not found, output keeps default symbology",
            path.display()
        );
        None
    }
}
