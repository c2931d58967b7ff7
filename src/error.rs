use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("invalid weight {0}: weights must be finite and non-negative")]
    InvalidWeight(f64),
}
