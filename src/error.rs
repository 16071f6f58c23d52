//! Error types for generation, validation and export.
//!
//! Remote content failures ([`crate::remote::ServiceError`],
//! [`ValidationError`]) never reach the caller of a generate operation; they are
//! turned into a fallback puzzle plus a notice. Only request problems the caller
//! can fix come back as [`GenerateError`].

use thiserror::Error;

use crate::puzzle_engine::GameKind;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("a theme is required to generate {0}")]
    MissingTheme(GameKind),

    #[error("{0} is generated locally, not by the content service")]
    NotRemote(GameKind),

    #[error("{0} needs the content service and cannot be generated locally")]
    NotLocal(GameKind),
}

/// Structural problem in a remote payload. Any one of these rejects the whole payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("payload does not match the schema: {0}")]
    Shape(String),

    #[error("`{field}` has {actual} entries, expected {expected}")]
    Length { field: &'static str, expected: usize, actual: usize },

    #[error("`{field}` must contain exactly one missing marker, found {found}")]
    Sentinel { field: &'static str, found: usize },

    #[error("`{field}` value {value} is out of range")]
    OutOfRange { field: &'static str, value: i64 },

    #[error("`{field}` is empty")]
    Empty { field: &'static str },

    #[error("problem {index}: answer {stated} does not equal {computed}")]
    WrongAnswer { index: usize, stated: i64, computed: i64 },

    #[error("`{field}` value {value} appears more than once")]
    Duplicate { field: &'static str, value: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("no rendered worksheet is available to export")]
    SurfaceUnavailable,

    #[error("could not mount the off-screen copy: {0}")]
    Mount(String),

    #[error("rasterization failed: {0}")]
    Rasterize(String),

    #[error("rasterizer produced an empty bitmap")]
    EmptyBitmap,

    #[error("could not write the document: {0}")]
    Sink(String),
}
