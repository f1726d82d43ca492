//! Pre-baked mesh files: `{"positions": [...], "cells": [...]}` JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Cell, Mesh, Plane};
use crate::error::SketchError;

/// Planar positions (as written by text vectorizers) lift into XY
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredPosition {
    Planar([f32; 2]),
    Spatial([f32; 3]),
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredMesh {
    positions: Vec<StoredPosition>,
    cells: Vec<Cell>,
}

impl From<StoredMesh> for Mesh {
    fn from(stored: StoredMesh) -> Self {
        let positions = stored
            .positions
            .into_iter()
            .map(|p| match p {
                StoredPosition::Planar(uv) => Plane::Xy.lift(uv),
                StoredPosition::Spatial(xyz) => xyz,
            })
            .collect();
        Mesh {
            positions,
            cells: stored.cells,
        }
    }
}

fn parse_mesh(json: &str) -> Result<Mesh, serde_json::Error> {
    serde_json::from_str::<StoredMesh>(json).map(Mesh::from)
}

fn to_json(mesh: &Mesh) -> Result<String, serde_json::Error> {
    let stored = StoredMesh {
        positions: mesh
            .positions
            .iter()
            .map(|&p| StoredPosition::Spatial(p))
            .collect(),
        cells: mesh.cells.clone(),
    };
    serde_json::to_string(&stored)
}

/// Read and validate a mesh file
pub fn load_mesh(path: &Path) -> Result<Mesh, SketchError> {
    let json = fs::read_to_string(path).map_err(|source| SketchError::MeshIo {
        path: path.to_path_buf(),
        source,
    })?;
    let mesh = parse_mesh(&json).map_err(|source| SketchError::MeshFormat {
        path: path.to_path_buf(),
        source,
    })?;
    mesh.validate()?;
    log::debug!(
        "Loaded mesh {}: {} positions, {} cells",
        path.display(),
        mesh.positions.len(),
        mesh.cells.len()
    );
    Ok(mesh)
}

/// Write a mesh file with 3-D positions
pub fn save_mesh(path: &Path, mesh: &Mesh) -> Result<(), SketchError> {
    let json = to_json(mesh).map_err(|source| SketchError::MeshFormat {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| SketchError::MeshIo {
        path: path.to_path_buf(),
        source,
    })
}
