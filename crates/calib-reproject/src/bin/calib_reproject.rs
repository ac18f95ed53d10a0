use calib_reproject::load::run_config;
use calib_reproject::pipeline::{DemoConfig, DemoReport};
use clap::Parser;
use log::LevelFilter;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "calib-reproject")]
#[command(about = "Project checkerboard axes through a stored camera calibration")]
struct Args {
    /// JSON run configuration
    #[arg(short, long)]
    config: PathBuf,

    /// Report path; overrides `output_path` from the config
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level for this tool; dependencies are capped at `warn`
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// Emit JSON logs (only with the `tracing` feature)
    #[arg(long)]
    json_logs: bool,
}

fn init_logging(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing")]
    {
        calib_reproject::core::init_tracing(args.log_level, args.json_logs);
        Ok(())
    }
    #[cfg(not(feature = "tracing"))]
    {
        if args.json_logs {
            eprintln!("--json-logs requires the `tracing` feature; using plain logs");
        }
        calib_reproject::core::init_with_level(args.log_level)?;
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    let mut cfg = DemoConfig::load_json(&args.config)?;
    let base_dir = args.config.parent().unwrap_or(Path::new("."));
    cfg.resolve_paths(base_dir);
    if let Some(out) = &args.output {
        cfg.output_path = Some(out.to_string_lossy().into_owned());
    }
    let report_path = cfg.output_path();

    match run_config(&cfg, &args.config) {
        Ok((report, outcome)) => {
            println!(
                "reprojection error: {:.4} px ({} corners)",
                outcome.estimate.reprojection_error,
                outcome.detection.len()
            );
            for (name, px) in ["origin", "x", "y", "z"].iter().zip(&outcome.axis_pixels) {
                println!("axis {name}: ({:.2}, {:.2})", px.x, px.y);
            }
            report.write_json(&report_path)?;
            log::info!("report written to {}", report_path.display());
            Ok(())
        }
        Err(err) => {
            let mut report = DemoReport::new(&cfg, &args.config);
            report.set_error(&err);
            report.write_json(&report_path)?;
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
