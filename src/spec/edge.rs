//! Curved edge descriptors.
//!
//! Straight block edges need no entry in the dictionary. Any other edge shape
//! is described by a type implementing [`EdgeShape`], which renders itself as
//! one line of the `edges` list. The writer only needs the rendered text and
//! the endpoints (for index validation), so new shapes can be added without
//! touching it.

use std::fmt::{self, Write as _};

use nalgebra::Point3;

use super::block::EdgeKey;
use crate::io::foam::format_scalar;

/// A non-straight block edge that renders itself to dictionary syntax.
pub trait EdgeShape: fmt::Debug {
    /// The two block vertices the edge connects, if known.
    ///
    /// Opaque descriptors return `None` and are not index-checked.
    fn endpoints(&self) -> Option<EdgeKey>;

    /// Render the edge entry, including the trailing newline.
    fn render(&self) -> String;
}

fn push_point(out: &mut String, p: &Point3<f64>) {
    // Writing into a String cannot fail.
    let [x, y, z] = [p.x, p.y, p.z].map(format_scalar);
    let _ = write!(out, "({} {} {})", x, y, z);
}

fn push_points(out: &mut String, points: &[Point3<f64>]) {
    out.push('(');
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        push_point(out, p);
    }
    out.push(')');
}

/// Circular arc through an intermediate point.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcEdge {
    /// Start vertex.
    pub start: usize,
    /// End vertex.
    pub end: usize,
    /// A point on the arc between the two vertices.
    pub through: Point3<f64>,
}

impl EdgeShape for ArcEdge {
    fn endpoints(&self) -> Option<EdgeKey> {
        Some(EdgeKey::new(self.start, self.end))
    }

    fn render(&self) -> String {
        let mut out = format!("    arc {} {} ", self.start, self.end);
        push_point(&mut out, &self.through);
        out.push('\n');
        out
    }
}

/// Interpolating spline through interior points.
#[derive(Debug, Clone, PartialEq)]
pub struct SplineEdge {
    /// Start vertex.
    pub start: usize,
    /// End vertex.
    pub end: usize,
    /// Interior interpolation points, ordered from start to end.
    pub points: Vec<Point3<f64>>,
}

impl EdgeShape for SplineEdge {
    fn endpoints(&self) -> Option<EdgeKey> {
        Some(EdgeKey::new(self.start, self.end))
    }

    fn render(&self) -> String {
        let mut out = format!("    spline {} {} ", self.start, self.end);
        push_points(&mut out, &self.points);
        out.push('\n');
        out
    }
}

/// Piecewise linear edge through interior points.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyLineEdge {
    /// Start vertex.
    pub start: usize,
    /// End vertex.
    pub end: usize,
    /// Interior points, ordered from start to end.
    pub points: Vec<Point3<f64>>,
}

impl EdgeShape for PolyLineEdge {
    fn endpoints(&self) -> Option<EdgeKey> {
        Some(EdgeKey::new(self.start, self.end))
    }

    fn render(&self) -> String {
        let mut out = format!("    polyLine {} {} ", self.start, self.end);
        push_points(&mut out, &self.points);
        out.push('\n');
        out
    }
}

/// Pre-formatted edge text passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEdge(pub String);

impl EdgeShape for RawEdge {
    fn endpoints(&self) -> Option<EdgeKey> {
        None
    }

    fn render(&self) -> String {
        self.0.clone()
    }
}
