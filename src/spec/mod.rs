//! In-memory block mesh specification.
//!
//! A [`MeshSpec`] holds everything the dictionary writer needs: vertices,
//! hexahedral blocks, the edge grading table, boundary patches, snap
//! projections and curved edges. It is assembled whole by the caller and
//! handed to a run; nothing mutates it afterwards.
//!
//! # Example
//!
//! ```
//! use blockfit::spec::{Block, EdgeGrading, MeshSpec};
//! use nalgebra::Point3;
//!
//! let mut spec = MeshSpec::new();
//! for z in [0.0, 1.0] {
//!     spec.add_vertex(Point3::new(0.0, 0.0, z));
//!     spec.add_vertex(Point3::new(1.0, 0.0, z));
//!     spec.add_vertex(Point3::new(1.0, 1.0, z));
//!     spec.add_vertex(Point3::new(0.0, 1.0, z));
//! }
//! spec.add_block(Block::new([0, 1, 2, 3, 4, 5, 6, 7], "fluid"));
//! for (a, b) in blockfit::spec::HEX_EDGES {
//!     spec.set_grading(a, b, EdgeGrading::uniform(4));
//! }
//! assert_eq!(spec.cell_count().unwrap(), 64);
//! ```

mod block;
mod edge;
mod patch;

use std::collections::HashMap;

use nalgebra::Point3;

pub use block::{Block, EdgeGrading, EdgeKey, AXIS_EDGES, HEX_EDGES};
pub use edge::{ArcEdge, EdgeShape, PolyLineEdge, RawEdge, SplineEdge};
pub use patch::{BoundaryPatch, PatchType, Projection};

use crate::error::{BlockFitError, Result};

/// Complete input of one dictionary.
#[derive(Debug)]
pub struct MeshSpec {
    /// Scale factor applied by the tool to all coordinates.
    pub convert_to_meters: f64,
    /// Search distance used when snapping faces onto target surfaces.
    pub search_length: f64,
    /// Block vertices.
    pub vertices: Vec<Point3<f64>>,
    /// Hexahedral blocks.
    pub blocks: Vec<Block>,
    /// Grading per canonical edge.
    pub edges: HashMap<EdgeKey, EdgeGrading>,
    /// Boundary patches.
    pub patches: Vec<BoundaryPatch>,
    /// Faces projected onto target surfaces.
    pub projections: Vec<Projection>,
    /// Non-straight edges.
    pub curved_edges: Vec<Box<dyn EdgeShape>>,
}

impl Default for MeshSpec {
    fn default() -> Self {
        Self {
            convert_to_meters: 1.0,
            search_length: 1.0,
            vertices: Vec::new(),
            blocks: Vec::new(),
            edges: HashMap::new(),
            patches: Vec::new(),
            projections: Vec::new(),
            curved_edges: Vec::new(),
        }
    }
}

impl MeshSpec {
    /// Create an empty specification with unit scale and search length.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the coordinate scale factor.
    pub fn with_convert_to_meters(mut self, scale: f64) -> Self {
        self.convert_to_meters = scale;
        self
    }

    /// Set the snapping search length.
    pub fn with_search_length(mut self, length: f64) -> Self {
        self.search_length = length;
        self
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, p: Point3<f64>) -> usize {
        self.vertices.push(p);
        self.vertices.len() - 1
    }

    /// Append a block and return its index.
    pub fn add_block(&mut self, block: Block) -> usize {
        self.blocks.push(block);
        self.blocks.len() - 1
    }

    /// Set the grading of the edge between `a` and `b` (in either order).
    pub fn set_grading(&mut self, a: usize, b: usize, grading: EdgeGrading) {
        self.edges.insert(EdgeKey::new(a, b), grading);
    }

    /// Look up the grading of the edge between `a` and `b` (in either order).
    pub fn grading(&self, a: usize, b: usize) -> Option<&EdgeGrading> {
        self.edges.get(&EdgeKey::new(a, b))
    }

    /// Append a boundary patch.
    pub fn add_patch(&mut self, patch: BoundaryPatch) {
        self.patches.push(patch);
    }

    /// Project a face onto a target surface.
    pub fn add_projection(&mut self, face: [usize; 4], surface: impl Into<String>) {
        self.projections.push(Projection::new(face, surface));
    }

    /// Append a curved edge.
    pub fn add_curved_edge<E: EdgeShape + 'static>(&mut self, edge: E) {
        self.curved_edges.push(Box::new(edge));
    }

    /// The 12 gradings of block `index` in template order.
    pub fn block_gradings(&self, index: usize) -> Result<[EdgeGrading; 12]> {
        let block = self.blocks.get(index).ok_or_else(|| {
            BlockFitError::invalid_param("block", index, "block index out of range")
        })?;
        let mut out = [EdgeGrading::uniform(0); 12];
        for (slot, edge) in out.iter_mut().zip(block.edges()) {
            *slot = *self
                .edges
                .get(&edge)
                .ok_or(BlockFitError::MissingEdgeGrading {
                    block: index,
                    v0: edge.v0(),
                    v1: edge.v1(),
                })?;
        }
        Ok(out)
    }

    /// Cell counts of block `index` along (i, j, k).
    pub fn block_resolution(&self, index: usize) -> Result<[u32; 3]> {
        let gradings = self.block_gradings(index)?;
        Ok(AXIS_EDGES.map(|e| gradings[e].cells))
    }

    /// Total number of cells over all blocks.
    ///
    /// Fails with [`BlockFitError::InvalidParameter`] when the total does not
    /// fit in a `u64`.
    pub fn cell_count(&self) -> Result<u64> {
        let mut total = 0u64;
        for index in 0..self.blocks.len() {
            let [i, j, k] = self.block_resolution(index)?;
            total = u64::from(i)
                .checked_mul(u64::from(j))
                .and_then(|ij| ij.checked_mul(u64::from(k)))
                .and_then(|cells| total.checked_add(cells))
                .ok_or_else(|| {
                    BlockFitError::invalid_param(
                        "cells",
                        format!("block {} ({} x {} x {})", index, i, j, k),
                        "total cell count overflows u64",
                    )
                })?;
        }
        Ok(total)
    }

    /// Projected faces grouped by target surface, in order of first appearance.
    pub fn snap_groups(&self) -> Vec<(&str, Vec<[usize; 4]>)> {
        let mut groups: Vec<(&str, Vec<[usize; 4]>)> = Vec::new();
        let mut slot: HashMap<&str, usize> = HashMap::new();
        for p in &self.projections {
            let idx = *slot.entry(p.surface.as_str()).or_insert_with(|| {
                groups.push((p.surface.as_str(), Vec::new()));
                groups.len() - 1
            });
            groups[idx].1.push(p.face);
        }
        groups
    }

    /// Check that every vertex reference is in range.
    pub fn validate(&self) -> Result<()> {
        let count = self.vertices.len();
        let check = |element: &dyn Fn() -> String, indices: &[usize]| -> Result<()> {
            match indices.iter().find(|&&v| v >= count) {
                Some(&vertex) => Err(BlockFitError::InvalidVertexIndex {
                    element: element(),
                    vertex,
                    count,
                }),
                None => Ok(()),
            }
        };

        for (bi, block) in self.blocks.iter().enumerate() {
            check(&|| format!("block {}", bi), &block.vertices[..])?;
        }
        for key in self.edges.keys() {
            check(&|| format!("grading of edge {}", key), &[key.v0(), key.v1()][..])?;
        }
        for patch in &self.patches {
            for face in &patch.faces {
                check(&|| format!("patch '{}'", patch.name), &face[..])?;
            }
        }
        for p in &self.projections {
            check(&|| format!("projection onto '{}'", p.surface), &p.face[..])?;
        }
        for (ei, edge) in self.curved_edges.iter().enumerate() {
            if let Some(key) = edge.endpoints() {
                check(&|| format!("curved edge {}", ei), &[key.v0(), key.v1()][..])?;
            }
        }
        Ok(())
    }
}
