//! Synthetic end-to-end run of the spatial-lag front end.
//!
//! A deliberately naive neighborhood-average backend stands in for a real
//! spatial-lag estimator, so the whole pipeline can be exercised without
//! one: parameters, dataset, weights join, derived fields, symbology.
//!
//! Usage: cargo run --example splag_fit

use std::fs;

use rand::prelude::*;

use splag_rs::{
    run_tool, DesignMatrix, FitOptions, GeometryKind, LagEstimator, LagFit, ResponseVector,
    SpatialWeights, SplagError, ToolParameters,
};

/// Placeholder backend: predicts each observation as the row-standardized
/// weighted average of its neighbors' responses.
struct NeighborhoodAverage;

impl LagEstimator for NeighborhoodAverage {
    fn fit(
        &self,
        y: &ResponseVector,
        x: &DesignMatrix,
        weights: &SpatialWeights,
        ids: &[i64],
        options: &FitOptions,
    ) -> Result<LagFit, SplagError> {
        let mut standardized = weights.clone();
        standardized.row_standardize();
        let dense = standardized.to_dense(ids)?;

        let predicted = dense.dot(&y.0);
        let residuals = &y.0 - &predicted;

        Ok(LagFit {
            predicted,
            residuals,
            predicted_errors: None,
            summary: format!(
                "neighborhood average of {} over '{}' ({} regressors passed through)",
                options.name_y,
                options.name_w,
                x.ncols()
            ),
        })
    }
}

fn main() -> Result<(), SplagError> {
    let dir = tempfile::tempdir()?;
    let n = 25;
    let mut rng = rand::rng();

    // attribute table
    let mut csv = String::from("ID,Y,X1,X2\n");
    for id in 1..=n {
        let x1: f64 = rng.random_range(0.0..10.0);
        let x2: f64 = rng.random::<f64>();
        let y = 1.0 + 0.6 * x1 - 2.0 * x2 + rng.random_range(-0.5..0.5);
        csv.push_str(&format!("{},{},{},{}\n", id, y, x1, x2));
    }
    let input = dir.path().join("synthetic.csv");
    fs::write(&input, csv)?;

    // ring contiguity: every observation neighbors its predecessor and successor
    let mut gal = format!("0 {} synthetic ID\n", n);
    for id in 1..=n {
        let prev = if id == 1 { n } else { id - 1 };
        let next = if id == n { 1 } else { id + 1 };
        gal.push_str(&format!("{} 2\n{} {}\n", id, prev, next));
    }
    let weights = dir.path().join("synthetic.gal");
    fs::write(&weights, gal)?;

    let output = dir.path().join("lag_out.csv");
    let params = ToolParameters::from_args(&[
        input.to_string_lossy().as_ref(),
        "y",
        "x1;x2",
        weights.to_string_lossy().as_ref(),
        output.to_string_lossy().as_ref(),
    ])?;

    println!("Fitting spatial lag run over {} observations...", n);
    let artifacts = run_tool(
        &params,
        "ID",
        GeometryKind::Point,
        dir.path(),
        &NeighborhoodAverage,
    )?;

    println!(
        "wrote {} rows to {}",
        artifacts.rows,
        artifacts.output_table.display()
    );
    match &artifacts.symbology {
        Some(path) => println!("symbology template: {}", path.display()),
        None => println!("symbology template: none found, host default applies"),
    }

    for line in fs::read_to_string(&artifacts.output_table)?.lines().take(4) {
        println!("{}", line);
    }

    Ok(())
}
