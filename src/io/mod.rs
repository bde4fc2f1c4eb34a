//! Case file I/O.
//!
//! This module reads and writes the files exchanged with the meshing tool.
//!
//! # Files
//!
//! | File | Module | Read | Write |
//! |------|--------|------|-------|
//! | `blockMeshDict` | [`block_mesh_dict`] | ✗ | ✓ |
//! | `constant/polyMesh/{points,faces,boundary}` | [`poly_mesh`] | ✓ | ✗ |
//! | `constant/triSurface/*.stl` | [`stl`] | ✗ | ✓ |
//! | preview `.ply` / `.obj` / `.stl` | [`export`] | ✗ | ✓ |
//!
//! [`foam`] holds the list header and boundary record parsing shared by the
//! readers.
//!
//! # Usage
//!
//! ```no_run
//! use blockfit::io::{block_mesh_dict, poly_mesh};
//! use blockfit::spec::MeshSpec;
//!
//! let spec = MeshSpec::new();
//! let cells = block_mesh_dict::save(&spec, "case/system/blockMeshDict").unwrap();
//!
//! // ... run the tool on "case" ...
//!
//! let mesh = poly_mesh::load("case", false).unwrap();
//! println!("{} cells, {} boundary faces", cells, mesh.num_faces());
//! ```

pub mod block_mesh_dict;
pub mod export;
pub mod foam;
pub mod poly_mesh;
pub mod stl;

pub use foam::{BoundaryRecord, Header};
