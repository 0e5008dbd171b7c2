use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, ValueHint};
use tracing_subscriber::EnvFilter;

use gpx_elevation_extend::{extend_file, ErrorKind, ExtendOptions, RunError};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Append a track that climbs a given net elevation to a GPX recording",
    long_about = None
)]
struct Cli {
    /// GPX file to extend
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Net elevation delta to reach, in meters
    #[arg(allow_negative_numbers = true)]
    elevation: f64,

    /// Shift the recorded activity by its duration plus a buffer so the new track reads as a separate activity
    #[arg(long, action = ArgAction::SetTrue)]
    detach: bool,

    /// Output GPX path (defaults to <input>_modified[_fake_time].gpx)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Seconds between the end of the recording and the new track
    #[arg(long, default_value_t = ExtendOptions::default().start_gap_secs)]
    start_gap_secs: u32,

    /// Seconds added to the recording's duration when detaching
    #[arg(long, default_value_t = ExtendOptions::default().detach_buffer_secs)]
    detach_buffer_secs: u32,

    /// Name for the new track (defaults to the first track's name)
    #[arg(long)]
    track_name: Option<String>,

    /// Print a JSON summary instead of the output path
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> ExtendOptions {
        ExtendOptions {
            detach: self.detach,
            start_gap_secs: self.start_gap_secs,
            detach_buffer_secs: self.detach_buffer_secs,
            track_name: self.track_name.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let kind = failure_kind(&err);
            eprintln!("Error [{kind}]: {err}");
            ExitCode::from(kind.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let outcome = extend_file(
        &cli.input,
        cli.elevation,
        &cli.options(),
        cli.output.as_deref(),
    )?;

    if cli.json {
        let summary = serde_json::json!({
            "output": outcome.output.display().to_string(),
            "extension": outcome.extension,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Elevation modified and written to {}",
            outcome.output.display()
        );
    }
    Ok(())
}

/// Failures that did not come from the extension itself are output problems.
fn failure_kind(err: &anyhow::Error) -> ErrorKind {
    err.downcast_ref::<RunError>()
        .map(RunError::kind)
        .unwrap_or(ErrorKind::OutputUnavailable)
}
