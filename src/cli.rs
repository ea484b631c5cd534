// Copyright 2023 Mikael Lund
//
// Licensed under the Apache license, version 2.0 (the "license");
// you may not use this file except in compliance with the license.
// You may obtain a copy of the license at
//
//     http://www.apache.org/licenses/license-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the license is distributed on an "as is" basis,
// without warranties or conditions of any kind, either express or implied.
// See the license for the specific language governing permissions and
// limitations under the license.

use crate::{cell::Cuboid, frame::Frame, PositionVec};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pretty_env_logger::env_logger::DEFAULT_FILTER_ENV;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply boundary conditions and evaluate Lennard-Jones forces for one frame
    #[clap(arg_required_else_help = true)]
    Eval {
        /// Input file in YAML format
        #[clap(long, short = 'i')]
        input: PathBuf,
    },
}

#[derive(Parser)]
#[clap(version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    pub command: Commands,

    /// Verbose output. See more with e.g. RUST_LOG=Trace
    #[clap(long, short = 'v', action)]
    pub verbose: bool,
    /// Output file in YAML format
    #[clap(long, short = 'o', default_value = "output.yaml")]
    pub output: PathBuf,
}

pub fn do_main() -> Result<()> {
    let args = Args::parse();
    if std::env::var(DEFAULT_FILTER_ENV).is_err() {
        std::env::set_var(
            DEFAULT_FILTER_ENV,
            if args.verbose { "Debug" } else { "Info" },
        );
    }
    pretty_env_logger::init();

    match args.command {
        Commands::Eval { input } => {
            let frame = Frame::from_file(&input)?;
            let report = eval(frame)?;
            write_yaml(&report, &args.output)?;
        }
    }
    Ok(())
}

/// Frame after one evaluation, as written to the output file
#[derive(Serialize)]
struct EvalReport {
    cell: Cuboid,
    positions: PositionVec,
    velocities: PositionVec,
    forces: PositionVec,
    energy: f32,
}

/// Serialize `data` to a new YAML file, replacing any existing one
fn write_yaml<T: Serialize>(data: &T, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(data)?;
    std::fs::write(path, yaml).with_context(|| format!("Error writing file {:?}", path))?;
    log::info!("Wrote {:?}", path);
    Ok(())
}

fn eval(mut frame: Frame) -> Result<EvalReport> {
    let evaluation = frame.step()?;
    log::info!("Potential energy: {:.6}", evaluation.energy);
    Ok(EvalReport {
        cell: frame.cell,
        positions: frame.positions,
        velocities: frame.velocities,
        forces: evaluation.forces,
        energy: evaluation.energy,
    })
}
