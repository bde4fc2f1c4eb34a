//! JSON case descriptions.
//!
//! A case file describes a [`MeshSpec`] in plain data so that the command
//! line tool (or a host without Rust bindings) can drive the pipeline:
//!
//! ```json
//! {
//!   "convert_to_meters": 0.001,
//!   "search_length": 0.5,
//!   "vertices": [[0, 0, 0], [1, 0, 0], [1, 1, 0], [0, 1, 0],
//!                [0, 0, 1], [1, 0, 1], [1, 1, 1], [0, 1, 1]],
//!   "blocks": [{ "vertices": [0, 1, 2, 3, 4, 5, 6, 7], "name": "fluid" }],
//!   "edges": [{ "v0": 0, "v1": 1, "cells": 10, "ratio": 2.0 }],
//!   "patches": [{ "name": "walls", "type": "wall", "faces": [[0, 3, 2, 1]] }],
//!   "projections": [{ "face": [4, 5, 6, 7], "surface": "lid" }],
//!   "curved_edges": [{ "kind": "arc", "start": 4, "end": 5, "through": [0.5, 0, 1.2] }],
//!   "surfaces": { "lid": "lid.stl" }
//! }
//! ```
//!
//! Relative surface paths are resolved against the directory of the case
//! file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use nalgebra::Point3;
use serde::Deserialize;

use crate::error::{BlockFitError, Result};
use crate::spec::{
    ArcEdge, Block, BoundaryPatch, EdgeGrading, MeshSpec, PatchType, PolyLineEdge, RawEdge,
    SplineEdge,
};

fn one() -> f64 {
    1.0
}

/// A hexahedral block entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockDef {
    /// Corner vertex indices.
    pub vertices: [usize; 8],
    /// Region name.
    pub name: String,
}

/// An edge grading entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeDef {
    /// One end of the edge.
    pub v0: usize,
    /// Other end of the edge.
    pub v1: usize,
    /// Cell count along the edge.
    pub cells: u32,
    /// Last-to-first cell size ratio, uniform when omitted.
    #[serde(default = "one")]
    pub ratio: f64,
}

/// A boundary patch entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchDef {
    /// Patch name.
    pub name: String,
    /// Boundary type word, e.g. `wall`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Quadrilateral faces.
    pub faces: Vec<[usize; 4]>,
}

/// A snap projection entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectionDef {
    /// Projected face.
    pub face: [usize; 4],
    /// Target surface name.
    pub surface: String,
}

/// A curved edge entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CurvedEdgeDef {
    /// Circular arc.
    Arc {
        /// First vertex.
        start: usize,
        /// Last vertex.
        end: usize,
        /// A point on the arc.
        through: [f64; 3],
    },
    /// Interpolating spline.
    Spline {
        /// First vertex.
        start: usize,
        /// Last vertex.
        end: usize,
        /// Interior points.
        points: Vec<[f64; 3]>,
    },
    /// Piecewise linear edge.
    PolyLine {
        /// First vertex.
        start: usize,
        /// Last vertex.
        end: usize,
        /// Interior points.
        points: Vec<[f64; 3]>,
    },
    /// Pre-formatted dictionary text.
    Raw {
        /// Entry text, copied verbatim.
        text: String,
    },
}

fn points(raw: &[[f64; 3]]) -> Vec<Point3<f64>> {
    raw.iter().map(|&p| Point3::from(p)).collect()
}

/// A complete case description.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseFile {
    /// Coordinate scale factor.
    #[serde(default = "one")]
    pub convert_to_meters: f64,
    /// Snapping search length.
    #[serde(default = "one")]
    pub search_length: f64,
    /// Block vertices.
    pub vertices: Vec<[f64; 3]>,
    /// Blocks.
    pub blocks: Vec<BlockDef>,
    /// Edge gradings.
    pub edges: Vec<EdgeDef>,
    /// Boundary patches.
    #[serde(default)]
    pub patches: Vec<PatchDef>,
    /// Snap projections.
    #[serde(default)]
    pub projections: Vec<ProjectionDef>,
    /// Curved edges.
    #[serde(default)]
    pub curved_edges: Vec<CurvedEdgeDef>,
    /// Snap target surfaces: name to STL file.
    #[serde(default)]
    pub surfaces: BTreeMap<String, PathBuf>,
}

impl CaseFile {
    /// Parse a case description from JSON text.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Load a case file, resolving relative surface paths against its
    /// directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let mut case = Self::from_json(&text).map_err(|e| BlockFitError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for surface in case.surfaces.values_mut() {
            if surface.is_relative() {
                *surface = base.join(&*surface);
            }
        }
        Ok(case)
    }

    /// Build the mesh specification.
    pub fn to_spec(&self) -> Result<MeshSpec> {
        if !(self.convert_to_meters > 0.0) {
            return Err(BlockFitError::invalid_param(
                "convert_to_meters",
                self.convert_to_meters,
                "must be positive",
            ));
        }
        if !(self.search_length >= 0.0) {
            return Err(BlockFitError::invalid_param(
                "search_length",
                self.search_length,
                "must not be negative",
            ));
        }

        let mut spec = MeshSpec::new()
            .with_convert_to_meters(self.convert_to_meters)
            .with_search_length(self.search_length);
        spec.vertices = points(&self.vertices);

        for b in &self.blocks {
            spec.add_block(Block::new(b.vertices, b.name.clone()));
        }
        for e in &self.edges {
            if e.cells == 0 {
                return Err(BlockFitError::invalid_param(
                    "cells",
                    format!("edge ({}, {})", e.v0, e.v1),
                    "must be at least 1",
                ));
            }
            spec.set_grading(e.v0, e.v1, EdgeGrading::new(e.ratio, e.cells));
        }
        for p in &self.patches {
            spec.add_patch(BoundaryPatch::new(
                p.name.clone(),
                PatchType::from(p.kind.as_str()),
                p.faces.clone(),
            ));
        }
        for p in &self.projections {
            spec.add_projection(p.face, p.surface.clone());
        }
        for edge in &self.curved_edges {
            match edge {
                CurvedEdgeDef::Arc { start, end, through } => spec.add_curved_edge(ArcEdge {
                    start: *start,
                    end: *end,
                    through: Point3::from(*through),
                }),
                CurvedEdgeDef::Spline { start, end, points: p } => {
                    spec.add_curved_edge(SplineEdge {
                        start: *start,
                        end: *end,
                        points: points(p),
                    })
                }
                CurvedEdgeDef::PolyLine { start, end, points: p } => {
                    spec.add_curved_edge(PolyLineEdge {
                        start: *start,
                        end: *end,
                        points: points(p),
                    })
                }
                CurvedEdgeDef::Raw { text } => spec.add_curved_edge(RawEdge(text.clone())),
            }
        }
        Ok(spec)
    }
}
