use std::path::PathBuf;

use thiserror::Error;

use crate::ShapeKind;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("the {kind} collection is full ({capacity} shapes)")]
    CapacityExceeded { kind: ShapeKind, capacity: usize },
    #[error("expected a {expected} but got a {found}")]
    KindMismatch { expected: ShapeKind, found: ShapeKind },
    #[error("there is no {kind} at index {index}")]
    IndexOutOfRange { kind: ShapeKind, index: usize },
    #[error("unknown scene preset `{0}`")]
    UnknownPreset(String),
    #[error("invalid color `{0}`, expected #RRGGBB")]
    InvalidColor(String),
    #[error("failed to parse scene preset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
