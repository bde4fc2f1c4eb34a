//! Shared pieces of the OpenFOAM plain-text dictionary format.
//!
//! Lists in this format start with an element count on its own line followed
//! by an opening `(`:
//!
//! ```text
//! FoamFile { ... }
//!
//! 3
//! (
//! inlet
//! {
//!     type            patch;
//!     nFaces          16;
//!     startFace       420;
//! }
//! ...
//! )
//! ```
//!
//! [`read_header`] locates the count and the first record line,
//! [`read_boundaries`] parses the brace-delimited records of a `boundary`
//! file.

use std::path::Path;

use tracing::warn;

use crate::error::{BlockFitError, Result};
use crate::spec::PatchType;

/// Position and size of the list in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Index of the first line after the opening `(`.
    pub start: usize,
    /// Number of records announced by the count line, 0 if none was found.
    pub count: usize,
}

/// One patch entry of a `boundary` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryRecord {
    /// Patch name.
    pub name: String,
    /// Patch type.
    pub kind: PatchType,
    /// Number of faces in the patch.
    pub n_faces: usize,
    /// Index of the first face of the patch in the `faces` list.
    pub start_face: usize,
}

impl BoundaryRecord {
    /// Face index range covered by the patch, `None` if its end overflows.
    pub fn face_range(&self) -> Option<std::ops::Range<usize>> {
        let end = self.start_face.checked_add(self.n_faces)?;
        Some(self.start_face..end)
    }
}

/// Find the record count and the first record line.
///
/// Lines before the count that are not a bare integer (banner, `FoamFile`
/// block, blank lines) are skipped. When no `(` is found, `start` is the
/// number of lines so that nothing is read.
pub fn read_header(lines: &[&str]) -> Header {
    let mut count = None;
    for (idx, line) in lines.iter().enumerate() {
        if count.is_none() {
            count = line.trim().parse::<usize>().ok();
        }
        if line.contains('(') {
            if count.is_none() {
                warn!(line = idx + 1, "list has no element count");
            }
            return Header {
                start: idx + 1,
                count: count.unwrap_or(0),
            };
        }
    }
    Header {
        start: lines.len(),
        count: count.unwrap_or(0),
    }
}

#[derive(Default)]
struct PendingRecord {
    name: String,
    line: usize,
    kind: Option<PatchType>,
    n_faces: Option<usize>,
    start_face: Option<usize>,
}

impl PendingRecord {
    fn finish(self, path: &Path) -> Result<BoundaryRecord> {
        let missing = |field: &str| {
            BlockFitError::format(
                path,
                self.line,
                format!("patch '{}' has no {} entry", self.name, field),
            )
        };
        Ok(BoundaryRecord {
            kind: self.kind.clone().ok_or_else(|| missing("type"))?,
            n_faces: self.n_faces.ok_or_else(|| missing("nFaces"))?,
            start_face: self.start_face.ok_or_else(|| missing("startFace"))?,
            name: self.name,
        })
    }
}

/// Parse boundary records from `lines[start..]` until the closing `)`.
///
/// `path` is only used for error context. Keys other than `type`, `nFaces`
/// and `startFace` are ignored.
pub fn read_boundaries(path: &Path, lines: &[&str], start: usize) -> Result<Vec<BoundaryRecord>> {
    let mut records = Vec::new();
    let mut pending: Option<PendingRecord> = None;
    let mut in_block = false;

    for (offset, raw) in lines.iter().enumerate().skip(start) {
        let line_no = offset + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if !in_block {
            match line {
                "{" => {
                    if pending.is_none() {
                        return Err(BlockFitError::format(path, line_no, "'{' without a patch name"));
                    }
                    in_block = true;
                }
                ")" => {
                    if let Some(p) = pending {
                        return Err(BlockFitError::format(
                            path,
                            p.line,
                            format!("patch '{}' has no entries", p.name),
                        ));
                    }
                    return Ok(records);
                }
                name => {
                    if let Some(p) = &pending {
                        return Err(BlockFitError::format(
                            path,
                            line_no,
                            format!("expected '{{' after patch '{}', found '{}'", p.name, name),
                        ));
                    }
                    pending = Some(PendingRecord {
                        name: name.to_string(),
                        line: line_no,
                        ..Default::default()
                    });
                }
            }
            continue;
        }

        if line == "}" {
            if let Some(p) = pending.take() {
                records.push(p.finish(path)?);
            }
            in_block = false;
            continue;
        }

        let mut tokens = line.split_whitespace();
        let key = tokens.next().unwrap_or_default();
        if !matches!(key, "type" | "nFaces" | "startFace") {
            continue;
        }
        let value = tokens
            .next()
            .map(|v| v.trim_end_matches(';'))
            .ok_or_else(|| BlockFitError::format(path, line_no, format!("'{}' has no value", key)))?;
        let number = || {
            value.parse::<usize>().map_err(|_| {
                BlockFitError::format(path, line_no, format!("invalid {} '{}'", key, value))
            })
        };
        if let Some(p) = pending.as_mut() {
            match key {
                "type" => p.kind = Some(PatchType::from(value)),
                "nFaces" => p.n_faces = Some(number()?),
                _ => p.start_face = Some(number()?),
            }
        }
    }

    match pending {
        Some(p) => Err(BlockFitError::format(
            path,
            p.line,
            format!("patch '{}' is not terminated", p.name),
        )),
        None => Ok(records),
    }
}

/// The banner and `FoamFile` block that open every generated dictionary.
pub fn banner(class: &str, object: &str) -> String {
    format!(
        "/*--------------------------------*- C++ -*----------------------------------*/\n\
         \n\
         // File was generated by blockfit.\n\
         \n\
         FoamFile\n\
         {{\n\
         \x20   version     2.0;\n\
         \x20   format      ascii;\n\
         \x20   class       {class};\n\
         \x20   object      {object};\n\
         }}\n\
         // * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * * //\n"
    )
}

/// Format a coordinate or scale factor.
///
/// Plain notation for ordinary magnitudes, exponent notation for very small
/// or very large ones. Both round-trip exactly.
pub fn format_scalar(x: f64) -> String {
    let magnitude = x.abs();
    if x == 0.0 || !x.is_finite() || (1e-4..1e15).contains(&magnitude) {
        format!("{}", x)
    } else {
        format!("{:e}", x)
    }
}
