use std::fs::File;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::loaders::binary::Format;

#[derive(Debug, Clone, Parser)]
#[command(name = "meshbin", version, about = "Convert and inspect binary mesh files")]
pub struct AppConfig {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Convert an OBJ model and its material libraries into a binary mesh file.
    Export {
        /// Source model (.obj)
        input: PathBuf,
        /// Destination file
        output: PathBuf,
        /// Write the unnamed, position-only layout
        #[arg(long)]
        legacy: bool,
    },
    /// Print a summary of a binary mesh file.
    Info {
        /// Binary mesh file
        input: PathBuf,
        /// Read the unnamed, position-only layout
        #[arg(long)]
        legacy: bool,
        /// Material library (.mtl) to load alongside
        #[arg(long)]
        materials: Option<PathBuf>,
        /// Also print every vertex and index
        #[arg(long)]
        dump: bool,
    },
}

pub fn format_for(legacy: bool) -> Format {
    if legacy {
        Format::Legacy
    } else {
        Format::Extended
    }
}

pub fn validate_inputs(command: &Command) -> Result<(), String> {
    match command {
        Command::Export { input, .. } => validate_path(input, Some("obj"), "model"),
        Command::Info {
            input, materials, ..
        } => {
            validate_path(input, None, "mesh")?;
            if let Some(materials) = materials {
                validate_path(materials, Some("mtl"), "material")?;
            }
            Ok(())
        }
    }
}

fn validate_path(
    file_path: &Path,
    expected_extension: Option<&str>,
    label: &str,
) -> Result<(), String> {
    let path = file_path.display();
    if !file_path.exists() {
        return Err(format!("{} file does not exist: {}", label, path));
    }
    if !file_path.is_file() {
        return Err(format!("{} path is not a file: {}", label, path));
    }

    if let Some(expected_extension) = expected_extension {
        let extension = file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| format!("{} file has no extension: {}", label, path))?;
        if !extension.eq_ignore_ascii_case(expected_extension) {
            return Err(format!(
                "{} file must have .{} extension: {}",
                label, expected_extension, path
            ));
        }
    }

    File::open(file_path)
        .map(|_| ())
        .map_err(|error| format!("Failed to open {} file '{}': {}", label, path, error))
}
