use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::SplagError;
use crate::types::Vector;

/// Minimum number of observations required to attempt a fit.
pub const MIN_OBSERVATIONS: usize = 5;

/// Geometry of the source feature class, reduced to the three kinds the
/// symbology templates distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
    Polyline,
    Polygon,
}

impl GeometryKind {
    /// Parse a shape-type label such as "POINT" or "Polygon".
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "POINT" | "MULTIPOINT" => Some(Self::Point),
            "POLYLINE" | "LINE" => Some(Self::Polyline),
            "POLYGON" => Some(Self::Polygon),
            _ => None,
        }
    }
}

/// Read-only tabular view over the input feature attributes, keyed by a
/// unique integer ID field. Built once per run.
#[derive(Debug, Clone)]
pub struct SpatialDataset {
    frame: DataFrame,
    id_field: String,
    ids: Vec<i64>,
    geometry: GeometryKind,
    source: PathBuf,
}

impl SpatialDataset {
    /// Wrap an in-memory table. Column names are upper-cased so field
    /// lookups are case-insensitive, the way the host resolves them.
    pub fn from_frame(
        mut frame: DataFrame,
        id_field: &str,
        geometry: GeometryKind,
        source: impl Into<PathBuf>,
    ) -> Result<Self, SplagError> {
        let source = source.into();

        let upper: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|c| c.to_uppercase())
            .collect();
        frame.set_column_names(&upper)?;
        let id_field = id_field.trim().to_uppercase();

        let rows = frame.height();
        if rows < MIN_OBSERVATIONS {
            return Err(SplagError::TooFewObservations {
                got: rows,
                min: MIN_OBSERVATIONS,
            });
        }

        let ids = integer_column(&frame, &id_field, &source)?;
        let distinct = ids.iter().collect::<HashSet<_>>().len();
        if distinct != rows {
            return Err(SplagError::IdFieldNotUnique {
                field: id_field,
                distinct,
                rows,
            });
        }

        Ok(Self {
            frame,
            id_field,
            ids,
            geometry,
            source,
        })
    }

    /// Read a CSV attribute table from disk.
    pub fn read_csv(
        path: &Path,
        id_field: &str,
        geometry: GeometryKind,
    ) -> Result<Self, SplagError> {
        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;
        Self::from_frame(frame, id_field, geometry, path)
    }

    pub fn n(&self) -> usize {
        self.frame.height()
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Unique ids, in row order.
    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn geometry(&self) -> GeometryKind {
        self.geometry
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Short display name for summaries: the file stem of the source.
    pub fn display_name(&self) -> String {
        self.source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.frame.column(&name.trim().to_uppercase()).is_ok()
    }

    /// Fetch a model field as a dense f64 column. Missing values and
    /// non-numeric columns are rejected.
    pub fn numeric_column(&self, name: &str) -> Result<Vector, SplagError> {
        let name = name.trim().to_uppercase();
        let series = self
            .frame
            .column(&name)
            .map_err(|_| SplagError::FieldNotFound {
                field: name.clone(),
                location: self.display_name(),
            })?;

        let cast = series
            .cast(&DataType::Float64)
            .map_err(|_| SplagError::FieldNotNumeric {
                field: name.clone(),
                affected: series.len(),
            })?;
        let affected = cast.null_count();
        if affected > 0 {
            return Err(SplagError::FieldNotNumeric {
                field: name,
                affected,
            });
        }

        Ok(Vector::from_iter(cast.f64()?.into_no_null_iter()))
    }
}

/// The ID column must cast cleanly to integers.
fn integer_column(frame: &DataFrame, name: &str, source: &Path) -> Result<Vec<i64>, SplagError> {
    let series = frame.column(name).map_err(|_| SplagError::FieldNotFound {
        field: name.to_string(),
        location: source.display().to_string(),
    })?;

    let cast = series
        .cast(&DataType::Int64)
        .map_err(|_| SplagError::FieldNotNumeric {
            field: name.to_string(),
            affected: series.len(),
        })?;
    let affected = cast.null_count();
    if affected > 0 {
        return Err(SplagError::FieldNotNumeric {
            field: name.to_string(),
            affected,
        });
    }

    Ok(cast.i64()?.into_no_null_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> DataFrame {
        df!(
            "id" => [1i64, 2, 3, 4, 5],
            "y" => [1.0, 2.0, 3.0, 4.0, 5.0],
            "x1" => [0.5, 0.25, 0.75, 1.0, 0.0],
        )
        .unwrap()
    }

    #[test]
    fn test_field_names_are_upper_cased() {
        let ds = SpatialDataset::from_frame(sample_frame(), "id", GeometryKind::Point, "mem")
            .unwrap();

        assert_eq!(ds.id_field(), "ID");
        assert!(ds.has_field("X1"));
        assert!(ds.has_field("x1"));
        assert_eq!(ds.ids(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_too_few_observations() {
        let frame = df!("id" => [1i64, 2], "y" => [1.0, 2.0]).unwrap();
        let result = SpatialDataset::from_frame(frame, "id", GeometryKind::Point, "mem");
        assert!(matches!(
            result,
            Err(SplagError::TooFewObservations { got: 2, min: 5 })
        ));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let frame = df!(
            "id" => [1i64, 2, 2, 4, 5],
            "y" => [1.0, 2.0, 3.0, 4.0, 5.0],
        )
        .unwrap();
        let result = SpatialDataset::from_frame(frame, "id", GeometryKind::Point, "mem");
        assert!(matches!(
            result,
            Err(SplagError::IdFieldNotUnique { distinct: 4, .. })
        ));
    }

    #[test]
    fn test_missing_field_lookup() {
        let ds = SpatialDataset::from_frame(sample_frame(), "id", GeometryKind::Point, "mem")
            .unwrap();
        assert!(matches!(
            ds.numeric_column("nope"),
            Err(SplagError::FieldNotFound { .. })
        ));
    }

    #[test]
    fn test_string_column_is_not_numeric() {
        let frame = df!(
            "id" => [1i64, 2, 3, 4, 5],
            "name" => ["a", "b", "c", "d", "e"],
        )
        .unwrap();
        let ds = SpatialDataset::from_frame(frame, "id", GeometryKind::Point, "mem").unwrap();
        assert!(matches!(
            ds.numeric_column("name"),
            Err(SplagError::FieldNotNumeric { .. })
        ));
    }

    #[test]
    fn test_geometry_kind_parse() {
        assert_eq!(GeometryKind::parse("point"), Some(GeometryKind::Point));
        assert_eq!(GeometryKind::parse("MULTIPOINT"), Some(GeometryKind::Point));
        assert_eq!(
            GeometryKind::parse(" Polyline "),
            Some(GeometryKind::Polyline)
        );
        assert_eq!(GeometryKind::parse("POLYGON"), Some(GeometryKind::Polygon));
        assert_eq!(GeometryKind::parse("raster"), None);
    }
}
