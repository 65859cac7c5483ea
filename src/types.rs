use ndarray::{Array1, Array2};
use std::ops::{Deref, DerefMut};

// ----- Shorthand, the ndarray names are a mouthful
pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;

// ----- Newtypes so a response can't be handed where a design matrix belongs

/// Response vector, one entry per observation.
#[derive(Debug, Clone)]
pub struct ResponseVector(pub Vector);

/// Design matrix, n x (k - 1). The intercept column is the estimator's
/// business, so it is never materialized here.
#[derive(Debug, Clone)]
pub struct DesignMatrix(pub Matrix);

impl Deref for ResponseVector {
    type Target = Vector;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl DerefMut for ResponseVector {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Deref for DesignMatrix {
    type Target = Matrix;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl DerefMut for DesignMatrix {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
