//! Error type shared by the loading, configuration and output stages.
//!
//! Every variant is raised before relaxation starts or after it finishes;
//! the relaxation loop itself has no failure path.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Failed to load frame '{}': {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(
        "Frame dimensions differ: first is {}x{}, second is {}x{}",
        .first.0, .first.1, .second.0, .second.1
    )]
    DimensionMismatch {
        first: (usize, usize),
        second: (usize, usize),
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Cannot split a {width}x{height} image into {workers} column strips")]
    Partition {
        width: usize,
        height: usize,
        workers: usize,
    },

    #[error(
        "Strip x={start_x}..{end_x} y={start_y}..{end_y} does not fit a full-height column of a {width}x{height} image"
    )]
    InvalidStrip {
        start_x: usize,
        end_x: usize,
        start_y: usize,
        end_y: usize,
        width: usize,
        height: usize,
    },

    #[error("Failed to write image '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON error for '{}': {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, FlowError>;
