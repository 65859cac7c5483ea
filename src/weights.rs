//! Spatial weights keyed to the dataset's unique ID field.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::error::SplagError;
use crate::types::Matrix;

/// Neighbor lists with weights, keyed by observation id.
#[derive(Debug, Clone, Default)]
pub struct SpatialWeights {
    neighbors: BTreeMap<i64, Vec<(i64, f64)>>,
}

impl SpatialWeights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_neighbors(neighbors: BTreeMap<i64, Vec<(i64, f64)>>) -> Self {
        Self { neighbors }
    }

    /// Number of observations with an entry.
    pub fn n(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.neighbors.contains_key(&id)
    }

    pub fn neighbors(&self, id: i64) -> Option<&[(i64, f64)]> {
        self.neighbors.get(&id).map(Vec::as_slice)
    }

    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.neighbors.keys().copied()
    }

    /// Observations with an entry but no neighbors.
    pub fn islands(&self) -> usize {
        self.neighbors.values().filter(|n| n.is_empty()).count()
    }

    /// Scale each neighbor list so its weights sum to one. Islands are left
    /// untouched.
    pub fn row_standardize(&mut self) {
        for nbrs in self.neighbors.values_mut() {
            let sum: f64 = nbrs.iter().map(|(_, w)| w).sum();
            if sum > 0.0 {
                for (_, w) in nbrs.iter_mut() {
                    *w /= sum;
                }
            }
        }
    }

    /// Dense n x n view with rows and columns following `order`. Ids in the
    /// structure but not in `order` are skipped; neighbors of an ordered id
    /// must themselves be in `order`.
    pub fn to_dense(&self, order: &[i64]) -> Result<Matrix, SplagError> {
        let index: HashMap<i64, usize> = order
            .iter()
            .enumerate()
            .map(|(position, &id)| (id, position))
            .collect();

        let n = order.len();
        let mut dense = Matrix::zeros((n, n));
        for (&id, nbrs) in &self.neighbors {
            let row = match index.get(&id) {
                Some(&row) => row,
                None => continue,
            };
            for &(neighbor, weight) in nbrs {
                let col = index
                    .get(&neighbor)
                    .ok_or(SplagError::UnknownWeightsId { id: neighbor })?;
                dense[[row, *col]] = weight;
            }
        }
        Ok(dense)
    }

    /// Check the join against the dataset: every dataset id needs an entry,
    /// and every neighbor of a dataset id must itself be a dataset id.
    /// Entries for ids outside the dataset are ignored with a warning.
    pub fn validate_against(&self, ids: &[i64]) -> Result<(), SplagError> {
        let known: HashSet<i64> = ids.iter().copied().collect();

        for &id in ids {
            if !self.neighbors.contains_key(&id) {
                return Err(SplagError::WeightsCoverage { id });
            }
        }

        let mut extra = 0usize;
        for (&id, nbrs) in &self.neighbors {
            if !known.contains(&id) {
                extra += 1;
                continue;
            }
            for &(neighbor, _) in nbrs {
                if !known.contains(&neighbor) {
                    return Err(SplagError::UnknownWeightsId { id: neighbor });
                }
            }
        }
        if extra > 0 {
            log::warn!(
                "weights structure has {} ids not present in the dataset, ignoring them",
                extra
            );
        }

        let islands = ids
            .iter()
            .filter(|&&id| self.neighbors.get(&id).is_some_and(|n| n.is_empty()))
            .count();
        if islands > 0 {
            log::warn!("{} observations have no neighbors", islands);
        }

        Ok(())
    }
}

/// A weights structure joined to the dataset's ID field, plus the display
/// name used in messages and summaries.
#[derive(Debug, Clone)]
pub struct WeightsRef {
    pub weights: SpatialWeights,
    pub name: String,
    /// Key field declared by the file header, when the format carries one.
    pub id_field: Option<String>,
}

impl WeightsRef {
    /// Load a weights file, dispatching on the extension. GAL (neighbor
    /// lists) and GWT (weighted edges) are supported.
    pub fn from_path(path: &Path) -> Result<Self, SplagError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let parsed = match extension.as_deref() {
            Some("gal") => parse_gal(&fs::read_to_string(path)?),
            Some("gwt") => parse_gwt(&fs::read_to_string(path)?),
            _ => Err("unsupported weights format, expected .gal or .gwt".to_string()),
        };

        let (weights, id_field) = parsed.map_err(|reason| SplagError::WeightsParse {
            path: path.display().to_string(),
            reason,
        })?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            weights,
            name,
            id_field,
        })
    }
}

/// Header line: either a bare observation count, or "0 n <source> <key>"
/// where the trailing tokens are optional.
fn parse_header(line: &str) -> Result<(usize, Option<String>), String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.len() {
        0 => Err("missing header line".to_string()),
        1 => tokens[0]
            .parse()
            .map(|n| (n, None))
            .map_err(|_| format!("invalid observation count '{}'", tokens[0])),
        _ => {
            let n = tokens[1]
                .parse()
                .map_err(|_| format!("invalid observation count '{}'", tokens[1]))?;
            let id_field = tokens.get(3).map(|f| f.trim().to_uppercase());
            Ok((n, id_field))
        }
    }
}

/// GAL: per observation, a "<id> <count>" record followed by `count`
/// neighbor ids. Neighbor weights are implicitly one.
fn parse_gal(text: &str) -> Result<(SpatialWeights, Option<String>), String> {
    let mut lines = text.lines();
    let header = lines
        .by_ref()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| "empty file".to_string())?;
    let (n, id_field) = parse_header(header)?;

    let mut tokens = lines.flat_map(str::split_whitespace);
    let mut weights = SpatialWeights::new();
    while let Some(token) = tokens.next() {
        let id = parse_id(token)?;
        let count: usize = tokens
            .next()
            .ok_or_else(|| format!("record for {} is truncated", id))?
            .parse()
            .map_err(|_| format!("invalid neighbor count for {}", id))?;

        let mut nbrs = Vec::with_capacity(count);
        for _ in 0..count {
            let neighbor = tokens
                .next()
                .ok_or_else(|| format!("record for {} is truncated", id))?;
            nbrs.push((parse_id(neighbor)?, 1.0));
        }
        if weights.neighbors.insert(id, nbrs).is_some() {
            return Err(format!("duplicate record for {}", id));
        }
    }

    check_count(n, weights.n())?;
    Ok((weights, id_field))
}

/// GWT: "<from> <to> <weight>" triples. Observations that only ever appear
/// as a target still get an (empty) entry.
fn parse_gwt(text: &str) -> Result<(SpatialWeights, Option<String>), String> {
    let mut lines = text.lines();
    let header = lines
        .by_ref()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| "empty file".to_string())?;
    let (n, id_field) = parse_header(header)?;

    let mut tokens = lines.flat_map(str::split_whitespace);
    let mut weights = SpatialWeights::new();
    while let Some(token) = tokens.next() {
        let from = parse_id(token)?;
        let to = parse_id(
            tokens
                .next()
                .ok_or_else(|| format!("edge from {} is truncated", from))?,
        )?;
        let weight: f64 = tokens
            .next()
            .ok_or_else(|| format!("edge {} -> {} has no weight", from, to))?
            .parse()
            .map_err(|_| format!("invalid weight on edge {} -> {}", from, to))?;

        weights.neighbors.entry(from).or_default().push((to, weight));
        weights.neighbors.entry(to).or_default();
    }

    check_count(n, weights.n())?;
    Ok((weights, id_field))
}

fn parse_id(token: &str) -> Result<i64, String> {
    token
        .parse()
        .map_err(|_| format!("invalid observation id '{}'", token))
}

fn check_count(declared: usize, found: usize) -> Result<(), String> {
    if declared != 0 && declared != found {
        return Err(format!(
            "header declares {} observations, file contains {}",
            declared, found
        ));
    }
    Ok(())
}
