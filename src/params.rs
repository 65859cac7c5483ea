use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::SplagError;

/// The five positional tool parameters, in host order: input table,
/// dependent variable, semicolon-delimited independent variables, weights
/// file, output table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameters {
    pub input_table: PathBuf,
    pub dep_var: String,
    pub ind_vars: Vec<String>,
    pub weights_file: PathBuf,
    pub output_table: PathBuf,
}

const PARAMETER_NAMES: [&str; 5] = [
    "input table",
    "dependent variable",
    "independent variables",
    "weights file",
    "output table",
];

impl ToolParameters {
    pub const COUNT: usize = 5;

    /// Parse host-ordered positional parameters. Variable names are trimmed
    /// and upper-cased; the independent list is split on ';'.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, SplagError> {
        if args.len() != Self::COUNT {
            return Err(SplagError::ParameterCount {
                expected: Self::COUNT,
                got: args.len(),
            });
        }

        let raw: Vec<&str> = args.iter().map(|a| a.as_ref().trim()).collect();
        for (index, value) in raw.iter().enumerate() {
            if value.is_empty() {
                return Err(SplagError::EmptyParameter {
                    index,
                    name: PARAMETER_NAMES[index],
                });
            }
        }

        let dep_var = normalize(raw[1]);
        let ind_vars: Vec<String> = raw[2]
            .split(';')
            .map(normalize)
            .filter(|v| !v.is_empty())
            .collect();
        if ind_vars.is_empty() {
            return Err(SplagError::EmptyParameter {
                index: 2,
                name: PARAMETER_NAMES[2],
            });
        }

        Ok(Self {
            input_table: raw[0].into(),
            dep_var,
            ind_vars,
            weights_file: raw[3].into(),
            output_table: raw[4].into(),
        })
    }
}

/// Field names are matched case-insensitively, so everything is carried
/// upper-case internally.
fn normalize(name: &str) -> String {
    name.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_five_positional_parameters() {
        let params = ToolParameters::from_args(&[
            "counties.csv",
            "crime",
            "income; housing",
            "counties.gal",
            "out.csv",
        ])
        .unwrap();

        assert_eq!(params.dep_var, "CRIME");
        assert_eq!(params.ind_vars, vec!["INCOME", "HOUSING"]);
        assert_eq!(params.input_table, PathBuf::from("counties.csv"));
        assert_eq!(params.weights_file, PathBuf::from("counties.gal"));
    }

    #[test]
    fn test_rejects_wrong_arity() {
        let result = ToolParameters::from_args(&["a", "b", "c"]);
        assert!(matches!(
            result,
            Err(SplagError::ParameterCount {
                expected: 5,
                got: 3
            })
        ));
    }

    #[test]
    fn test_rejects_empty_parameter() {
        let result = ToolParameters::from_args(&["in.csv", "", "x1", "w.gal", "out.csv"]);
        assert!(matches!(
            result,
            Err(SplagError::EmptyParameter { index: 1, .. })
        ));
    }

    #[test]
    fn test_empty_segments_in_independent_list_are_dropped() {
        let params =
            ToolParameters::from_args(&["in.csv", "y", "x1;;x2;", "w.gal", "out.csv"]).unwrap();
        assert_eq!(params.ind_vars, vec!["X1", "X2"]);
    }

    #[test]
    fn test_all_empty_independent_list_is_an_error() {
        let result = ToolParameters::from_args(&["in.csv", "y", " ; ; ", "w.gal", "out.csv"]);
        assert!(matches!(
            result,
            Err(SplagError::EmptyParameter { index: 2, .. })
        ));
    }
}
