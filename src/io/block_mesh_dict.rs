//! `blockMeshDict` writer.
//!
//! Serializes a [`MeshSpec`] in the dictionary syntax read by
//! `blockMeshBodyFit`. Sections are written in a fixed order: banner,
//! `convertToMeters`, `searchLength`, `vertices`, `blocks`, `snapFaces`,
//! `patches`, `edges`.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::Result;
use crate::io::foam;
use crate::spec::{MeshSpec, AXIS_EDGES};

/// Write the dictionary for `spec` and return the predicted cell count.
///
/// `spec` is validated first; an out-of-range vertex index or a block edge
/// without grading aborts before anything block-related is written.
///
/// # Example
///
/// ```no_run
/// use blockfit::io::block_mesh_dict;
/// use blockfit::spec::MeshSpec;
///
/// let spec = MeshSpec::new();
/// let mut text = Vec::new();
/// let cells = block_mesh_dict::write(&spec, &mut text).unwrap();
/// assert_eq!(cells, 0);
/// ```
pub fn write<W: Write>(spec: &MeshSpec, out: &mut W) -> Result<u64> {
    spec.validate()?;

    // Resolve every block first so a missing grading leaves no half-written
    // block list behind in the output.
    let gradings = (0..spec.blocks.len())
        .map(|b| spec.block_gradings(b))
        .collect::<Result<Vec<_>>>()?;
    let total_cells = spec.cell_count()?;

    out.write_all(foam::banner("dictionary", "blockMeshDict").as_bytes())?;
    writeln!(out)?;
    writeln!(out, "convertToMeters {};", foam::format_scalar(spec.convert_to_meters))?;
    writeln!(out)?;
    writeln!(out, "searchLength {};", foam::format_scalar(spec.search_length))?;
    writeln!(out)?;
    writeln!(out)?;

    writeln!(out, "vertices")?;
    writeln!(out, "(")?;
    for v in &spec.vertices {
        let [x, y, z] = [v.x, v.y, v.z].map(foam::format_scalar);
        writeln!(out, "    ({} {} {})", x, y, z)?;
    }
    writeln!(out, ");")?;

    writeln!(out, "blocks")?;
    writeln!(out, "(")?;
    for (bid, (block, grading)) in spec.blocks.iter().zip(&gradings).enumerate() {
        let [i, j, k] = AXIS_EDGES.map(|e| grading[e].cells);
        for (axis, &first) in AXIS_EDGES.iter().enumerate() {
            let cells = grading[first].cells;
            if grading[first..first + 4].iter().any(|g| g.cells != cells) {
                warn!(
                    block = bid,
                    axis,
                    cells,
                    "edges along one axis disagree on cell count, using the first"
                );
            }
        }

        let corners = block.vertices.map(|v| v.to_string()).join(" ");
        let ratios = grading
            .iter()
            .map(|g| format_general(g.ratio, 6))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "// block id {}", bid)?;
        writeln!(
            out,
            "hex ({}) {} ({} {} {}) edgeGrading ({})",
            corners, block.name, i, j, k, ratios
        )?;
    }
    writeln!(out, ");")?;
    writeln!(out)?;

    writeln!(out, "snapFaces")?;
    writeln!(out, "{{")?;
    for (surface, faces) in spec.snap_groups() {
        writeln!(out, "   {}.stl", surface)?;
        writeln!(out, "   {{")?;
        writeln!(out, "   faces")?;
        writeln!(out, "      (")?;
        for f in faces {
            writeln!(out, "      ({} {} {} {})", f[0], f[1], f[2], f[3])?;
        }
        writeln!(out, "      );")?;
        writeln!(out, "   }}")?;
    }
    writeln!(out, "}};")?;
    writeln!(out)?;

    writeln!(out, "patches")?;
    writeln!(out, "(")?;
    for patch in &spec.patches {
        writeln!(out, "    {} {}", patch.kind, patch.name)?;
        writeln!(out, "    (")?;
        for f in &patch.faces {
            writeln!(out, "        ({} {} {} {})", f[0], f[1], f[2], f[3])?;
        }
        writeln!(out, "    )")?;
    }
    writeln!(out, ");")?;
    writeln!(out)?;

    writeln!(out, "edges")?;
    writeln!(out, "(")?;
    for edge in &spec.curved_edges {
        out.write_all(edge.render().as_bytes())?;
    }
    writeln!(out, ");")?;

    debug!(
        vertices = spec.vertices.len(),
        blocks = spec.blocks.len(),
        cells = total_cells,
        "wrote blockMeshDict"
    );
    Ok(total_cells)
}

/// Write the dictionary for `spec` to `path` and return the predicted cell count.
///
/// The file is only created once the whole dictionary has been rendered, so
/// an invalid spec leaves `path` untouched.
pub fn save<P: AsRef<Path>>(spec: &MeshSpec, path: P) -> Result<u64> {
    let mut text = Vec::new();
    let cells = write(spec, &mut text)?;
    fs::write(path.as_ref(), text)?;
    Ok(cells)
}

/// Format `x` like C's `%.{precision}g`: shortest of fixed and exponent
/// notation with `precision` significant digits and no trailing zeros.
pub fn format_general(x: f64, precision: usize) -> String {
    if x == 0.0 || !x.is_finite() {
        return if x == 0.0 { "0".to_string() } else { x.to_string() };
    }
    let precision = precision.max(1);

    // Let the exponent formatter do the rounding, so 999999.5 correctly
    // becomes 1e+06 rather than 1000000.
    let sci = format!("{:.*e}", precision - 1, x);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exp < -4 || exp >= precision as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_zeros(mantissa), sign, exp.abs())
    } else {
        let decimals = (precision as i32 - 1 - exp).max(0) as usize;
        trim_zeros(&format!("{:.*}", decimals, x)).to_string()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
