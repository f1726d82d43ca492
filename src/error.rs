//! Error types for mesh validation and sketch setup.

use std::path::PathBuf;

use thiserror::Error;

/// A mesh broke the "every index is in range" invariant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    #[error("cell {cell} references index {index}, but the mesh has {len} positions")]
    IndexOutOfRange { cell: usize, index: u32, len: usize },
}

/// Failures while building a sketch or bringing up the GPU.
///
/// All of these are fatal for the running sketch; the binary logs them and exits.
#[derive(Debug, Error)]
pub enum SketchError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("surface is not supported by the adapter")]
    UnsupportedSurface,

    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("failed to access mesh file {path}: {source}")]
    MeshIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("mesh file {path} is malformed: {source}")]
    MeshFormat {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    InvalidMesh(#[from] MeshError),

    #[error("failed to read back frame {frame_num}: {source}")]
    Readback {
        frame_num: u64,
        source: wgpu::BufferAsyncError,
    },

    #[error("failed to save frame {path}: {source}")]
    Capture {
        path: PathBuf,
        source: image::ImageError,
    },
}
