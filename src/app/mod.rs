pub mod cli;
pub mod error;

use std::path::Path;

use clap::Parser;

use crate::loaders::binary::{self, BinaryOptions};
use crate::loaders::obj::{self, parse_mtl, ObjLoadOptions};
use crate::scene::{Model, VertexData};

use cli::{AppConfig, Command};
use error::AppError;

pub fn run_from_env() -> Result<(), AppError> {
    run(AppConfig::parse())
}

pub fn run(config: AppConfig) -> Result<(), AppError> {
    cli::validate_inputs(&config.command).map_err(AppError::Cli)?;

    match config.command {
        Command::Export {
            input,
            output,
            legacy,
        } => export(&input, &output, &BinaryOptions::with_format(cli::format_for(legacy))),
        Command::Info {
            input,
            legacy,
            materials,
            dump,
        } => {
            let report = info(
                &input,
                materials.as_deref(),
                dump,
                &BinaryOptions::with_format(cli::format_for(legacy)),
            )?;
            print!("{}", report);
            Ok(())
        }
    }
}

pub fn export(input: &Path, output: &Path, options: &BinaryOptions) -> Result<(), AppError> {
    let mut model = obj::load(input, &ObjLoadOptions::default())?;
    let layout = options.format.layout();
    if model.layout() != layout {
        model.vertices = model.vertices.to_layout(layout);
    }
    binary::store(&model, output, options)?;
    Ok(())
}

pub fn info(
    input: &Path,
    materials: Option<&Path>,
    dump: bool,
    options: &BinaryOptions,
) -> Result<String, AppError> {
    let mut model = binary::load(input, options)?;
    if let Some(materials) = materials {
        parse_mtl::parse(materials, &mut model)?;
    }

    let mut report = format!("{}\n", model.summary());
    for material in &model.materials {
        report.push('\n');
        report.push_str(&material.to_string());
    }
    if dump {
        report.push('\n');
        report.push_str(&dump_arrays(&model));
    }
    Ok(report)
}

fn dump_arrays(model: &Model) -> String {
    let mut out = String::new();
    match &model.vertices {
        VertexData::Positions(positions) => {
            for (i, p) in positions.iter().enumerate() {
                out.push_str(&format!(
                    "Vertex {}: {:5.2} {:5.2} {:5.2}\n",
                    i, p.x, p.y, p.z
                ));
            }
        }
        VertexData::Full(vertices) => {
            for (i, v) in vertices.iter().enumerate() {
                out.push_str(&format!(
                    "Vertex {}: {:5.2} {:5.2} {:5.2}\t{:5.2} {:5.2}\t{:5.2} {:5.2} {:5.2}\n",
                    i,
                    v.position.x,
                    v.position.y,
                    v.position.z,
                    v.texel.u,
                    v.texel.v,
                    v.normal.x,
                    v.normal.y,
                    v.normal.z
                ));
            }
        }
    }
    for (i, index) in model.indices.iter().enumerate() {
        out.push_str(&format!("Index {}, vertex {}\n", i, index));
    }
    out
}
