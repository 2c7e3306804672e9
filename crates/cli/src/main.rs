#![deny(unsafe_code)]
//! CLI binary for the leapfrog point-vortex simulator.
//!
//! Subcommands:
//! - `run`: simulate a scenario and write PNG frames and/or a JSON trajectory
//! - `list`: print available scenarios and palettes

mod error;

use clap::{Parser, Subcommand, ValueEnum};
use error::CliError;
use leapfrog_core::{Scenario, Simulation, SimulationParams};
use leapfrog_render::{
    FieldStyle, Outputs, Palette, PngSequence, RenderOptions, Rgb, StreamlineOptions,
    TrajectoryRecorder,
};
use log::{info, LevelFilter};
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "leapfrog", about = "Point-vortex leapfrog simulator")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Png,
    Json,
    Both,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Style {
    Speed,
    Streamlines,
    Both,
}

impl From<Style> for FieldStyle {
    fn from(style: Style) -> Self {
        match style {
            Style::Speed => FieldStyle::Speed,
            Style::Streamlines => FieldStyle::Streamlines,
            Style::Both => FieldStyle::Both,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Simulate and write one PNG per frame and/or a JSON trajectory.
    Run {
        /// Initial ensemble (leapfrog, pair, corotating).
        #[arg(long)]
        scenario: Option<String>,

        /// Euler time step.
        #[arg(long, allow_hyphen_values = true)]
        dt: Option<f64>,

        /// Number of steps after the initial frame.
        #[arg(short, long)]
        steps: Option<usize>,

        /// Half-width of the square sampling domain.
        #[arg(long)]
        half_width: Option<f64>,

        /// Grid samples per axis.
        #[arg(short, long)]
        resolution: Option<usize>,

        /// Field samples closer than this to a vortex are left undefined.
        #[arg(long)]
        mask_radius: Option<f64>,

        /// Simulation parameters as a JSON object; explicit flags win.
        #[arg(long, default_value = "{}")]
        params: String,

        /// How to draw the field in PNG frames.
        #[arg(long, value_enum, default_value_t = Style::Streamlines)]
        style: Style,

        /// Streamline colour as hex.
        #[arg(long, default_value = "#6495ed")]
        line_color: String,

        /// Streamline seed density.
        #[arg(long, default_value_t = 1.3)]
        density: f64,

        /// Speed-map palette name (cornflower, mono, fire).
        #[arg(short, long, default_value = "cornflower")]
        palette: String,

        /// Map speed linearly instead of logarithmically.
        #[arg(long)]
        linear: bool,

        /// Output directory.
        #[arg(short, long, default_value = "leapfrog-out")]
        out: PathBuf,

        /// What to write.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Png)]
        format: OutputFormat,

        /// Include the sampled velocity field in the JSON trajectory.
        #[arg(long)]
        include_field: bool,
    },
    /// List available scenarios and palettes.
    List,
}

/// Parses `--params` and lays explicit flags over it.
fn merge_params(raw: &str, overrides: &[(&str, Option<Value>)]) -> Result<Value, CliError> {
    let parsed: Value = serde_json::from_str(raw)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    let mut map: Map<String, Value> = match parsed {
        Value::Object(map) => map,
        other => {
            return Err(CliError::Input(format!(
                "--params must be a JSON object, got {other}"
            )))
        }
    };
    for (key, value) in overrides {
        if let Some(value) = value {
            map.insert((*key).to_string(), value.clone());
        }
    }
    Ok(Value::Object(map))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let scenarios = Scenario::list_names();
            let palettes = Palette::list_names();
            if cli.json {
                let info = json!({
                    "scenarios": scenarios,
                    "palettes": palettes,
                    "params": SimulationParams::schema(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Scenarios:");
                for name in scenarios {
                    println!("  {name}");
                }
                println!("Palettes:");
                println!("  {}", palettes.join(", "));
            }
        }
        Command::Run {
            scenario,
            dt,
            steps,
            half_width,
            resolution,
            mask_radius,
            params,
            style,
            line_color,
            density,
            palette,
            linear,
            out,
            format,
            include_field,
        } => {
            let params = merge_params(
                &params,
                &[
                    ("scenario", scenario.map(Value::from)),
                    ("dt", dt.map(Value::from)),
                    ("steps", steps.map(Value::from)),
                    ("half_width", half_width.map(Value::from)),
                    ("resolution", resolution.map(Value::from)),
                    ("mask_radius", mask_radius.map(Value::from)),
                ],
            )?;
            let mut sim = Simulation::from_json(&params)?;

            let mut outputs = Outputs::new();
            if matches!(format, OutputFormat::Png | OutputFormat::Both) {
                let options = RenderOptions {
                    style: style.into(),
                    streamlines: StreamlineOptions {
                        density,
                        color: Rgb::from_hex(&line_color)?,
                        ..StreamlineOptions::default()
                    },
                    log_scale: !linear,
                    ..RenderOptions::default()
                };
                let palette = Palette::from_name(&palette)?;
                outputs.push(Box::new(PngSequence::new(&out, palette, options)?));
            }
            let trajectory_path = out.join("trajectory.json");
            if matches!(format, OutputFormat::Json | OutputFormat::Both) {
                std::fs::create_dir_all(&out)
                    .map_err(|e| CliError::Io(format!("{}: {e}", out.display())))?;
                outputs.push(Box::new(TrajectoryRecorder::new(
                    &trajectory_path,
                    include_field,
                )));
            }

            info!("parameters: {}", sim.params().to_json());
            sim.run(&mut outputs)?;

            let frames = sim.step_index() + 1;
            if cli.json {
                let info = json!({
                    "vortices": sim.system().len(),
                    "frames": frames,
                    "params": sim.params().to_json(),
                    "final_positions": sim
                        .system()
                        .positions()
                        .iter()
                        .map(|p| p.to_array())
                        .collect::<Vec<_>>(),
                    "output": out.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "simulated {} vortices over {frames} frames (t = {}) -> {}",
                    sim.system().len(),
                    sim.time(),
                    out.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
