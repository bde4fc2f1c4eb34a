//! Blockfit CLI - write body-fitted block mesh cases and preview their meshes.
//!
//! Usage: blockfit [OPTIONS] <COMMAND>
//!
//! Run `blockfit --help` for available commands.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use blockfit::case::{CaseDir, CaseLocation};
use blockfit::config::CaseFile;
use blockfit::io::{block_mesh_dict, export, poly_mesh};
use blockfit::mesh::PreviewMesh;
use blockfit::preview::{PreviewMesher, RunOptions};
use blockfit::runner::{ExecutableResolver, FixedExecutable, MeshTool, SearchPath};

#[derive(Parser)]
#[command(name = "blockfit")]
#[command(author, version, about = "Body-fitted block mesh case tool", long_about = None)]
struct Cli {
    /// Log level
    #[arg(short, long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    /// Every pipeline detail
    Trace,
    /// Stage and file logs
    Debug,
    /// Stage summaries
    Info,
    /// Recoverable problems only
    Warn,
    /// Failures only
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Export a case directory without running the mesher
    Write {
        /// JSON case description
        case_file: PathBuf,

        /// Case directory to write into
        output: PathBuf,
    },

    /// Run the mesher and export the resulting boundary mesh
    Preview {
        /// JSON case description
        case_file: PathBuf,

        /// Output mesh file (.ply, .obj or .stl)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Persistent case directory (a temporary one is used otherwise)
        #[arg(long)]
        case_dir: Option<PathBuf>,

        /// Mesher executable (searched on PATH otherwise)
        #[arg(long)]
        executable: Option<PathBuf>,

        /// Return all faces instead of only boundary faces
        #[arg(long)]
        internal_cells: bool,

        /// Keep the temporary case directory
        #[arg(long)]
        keep: bool,
    },

    /// Read the mesh of an already meshed case
    Read {
        /// Case directory
        case_dir: PathBuf,

        /// Output mesh file (.ply, .obj or .stl)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Return all faces instead of only boundary faces
        #[arg(long)]
        internal_cells: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: could not install logger: {}", e);
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Write { case_file, output } => {
            cmd_write(&case_file, &output)?;
        }

        Commands::Preview {
            case_file,
            output,
            case_dir,
            executable,
            internal_cells,
            keep,
        } => {
            let options = RunOptions::default()
                .with_internal_cells(internal_cells)
                .with_keep_workspace(keep);
            cmd_preview(&case_file, output.as_deref(), case_dir, executable, &options)?;
        }

        Commands::Read {
            case_dir,
            output,
            internal_cells,
        } => {
            cmd_read(&case_dir, output.as_deref(), internal_cells)?;
        }
    }

    Ok(())
}

fn copy_surfaces(case_file: &CaseFile, case: &CaseDir) -> Result<(), Box<dyn std::error::Error>> {
    for (name, source) in &case_file.surfaces {
        let path = case.copy_surface(name, source)?;
        println!("Surface: {}", path.display());
    }
    Ok(())
}

fn cmd_write(case_path: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let case_file = CaseFile::load(case_path)?;
    let spec = case_file.to_spec()?;

    // An existing directory is taken as the case root.
    fs::create_dir_all(output)?;
    let case = CaseDir::persistent(output)?;
    copy_surfaces(&case_file, &case)?;
    let cells = block_mesh_dict::save(&spec, case.dict_path())?;

    println!("Blocks: {}", spec.blocks.len());
    println!("Cells: {}", cells);
    println!("Saved: {}", case.dict_path().display());
    Ok(())
}

fn cmd_preview(
    case_path: &Path,
    output: Option<&Path>,
    case_dir: Option<PathBuf>,
    executable: Option<PathBuf>,
    options: &RunOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let case_file = CaseFile::load(case_path)?;
    let spec = case_file.to_spec()?;

    let resolver: Box<dyn ExecutableResolver> = match executable {
        Some(path) => Box::new(FixedExecutable::new(path)),
        None => Box::new(SearchPath::from_env()),
    };
    let location = match case_dir {
        Some(dir) => CaseLocation::Persistent(dir),
        None => CaseLocation::Temporary,
    };

    let tool = MeshTool::locate(resolver.as_ref())?;
    if let CaseLocation::Persistent(dir) = &location {
        fs::create_dir_all(dir)?;
    }
    let mut mesher = PreviewMesher::with_tool(tool, &location)?;
    println!("Mesher: {}", mesher.tool().program().display());
    copy_surfaces(&case_file, mesher.case())?;

    let start = Instant::now();
    let mesh = mesher.generate(&spec, options)?;
    let elapsed = start.elapsed();

    print_mesh(&mesh);
    println!("Meshed in {:.2?}", elapsed);
    if options.keep_workspace || !mesher.case().is_temporary() {
        println!("Case: {}", mesher.case().root().display());
    }
    save_mesh(&mesh, output)
}

fn cmd_read(
    case_dir: &Path,
    output: Option<&Path>,
    internal_cells: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let mesh = poly_mesh::load(case_dir, internal_cells)?;
    let elapsed = start.elapsed();

    print_mesh(&mesh);
    println!("Read in {:.2?}", elapsed);
    save_mesh(&mesh, output)
}

fn print_mesh(mesh: &PreviewMesh) {
    if let Some(cells) = mesh.cell_count {
        println!("Cells: {}", cells);
    }
    println!("Points: {}", mesh.num_points());
    println!("Faces: {}", mesh.num_faces());
}

fn save_mesh(mesh: &PreviewMesh, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        export::save(mesh, path)?;
        println!("Saved: {}", path.display());
    }
    Ok(())
}
