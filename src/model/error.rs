//! Declaration value errors.

use thiserror::Error;

/// Error returned when a declaration value cannot be rendered as CSS.
///
/// These never abort a compile: the emitter drops the single declaration
/// that produced the error and moves on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    /// The storage layer marked the value invalid.
    #[error("invalid value '{0}'")]
    Invalid(String),
    /// The value has a shape this compiler does not know how to render.
    #[error("unsupported value type")]
    Unsupported,
    /// The value rendered to nothing.
    #[error("empty value")]
    Empty,
    /// A numeric component is NaN or infinite.
    #[error("non-finite number {0}")]
    NonFinite(f64),
    /// An image references an asset id that is not in the asset table.
    #[error("unknown asset '{0}'")]
    UnknownAsset(String),
    /// The rendered text would terminate or escape its declaration.
    #[error("value '{0}' does not stay inside its declaration")]
    Escapes(String),
}
