use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Invalid abstraction file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid csv point file: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid obj file: {0}")]
    Obj(#[from] obj::ObjError),
    #[error("Expected point cloud data with at least 3 columns for x, y, z coordinates, but got shape {0:?}")]
    NotEnoughColumns(Vec<u64>),
    #[error("Missing `{0}` data in point file")]
    Missing(&'static str),
    #[error("Malformed row {row}: {reason}")]
    Malformed { row: usize, reason: String },
    #[error("Unsupported point cloud format: {0}")]
    UnsupportedFormat(PathBuf),
}
