use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum GeneratorError {
    #[error("code length must be between {min} and {max}, got {got}")]
    InvalidLength { min: usize, max: usize, got: usize },
}
