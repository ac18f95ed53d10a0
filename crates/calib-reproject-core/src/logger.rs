//! Logging setup for the reprojection tools.
//!
//! Records from the `calib_reproject*` crates pass at the requested level.
//! Records from dependencies (image decoders and similar) are capped at
//! `Warn` so `--log-level debug` stays readable. Output looks like
//! `[  0.012s DEBUG core::model] camera model: ...`.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

const OWN_PREFIX: &str = "calib_reproject";

#[cfg(feature = "tracing")]
const OWN_CRATES: [&str; 3] = [
    "calib_reproject",
    "calib_reproject_core",
    "calib_reproject_pipeline",
];

fn admits(level: Level, target: &str, max: LevelFilter) -> bool {
    let cap = if target.starts_with(OWN_PREFIX) {
        max
    } else {
        max.min(LevelFilter::Warn)
    };
    level <= cap
}

/// `calib_reproject_core::model` -> `core::model`; foreign targets are kept.
fn short_target(target: &str) -> &str {
    match target.strip_prefix(OWN_PREFIX) {
        Some(rest) if !rest.is_empty() => rest.trim_start_matches(['_', ':']),
        _ => target,
    }
}

struct ReprojectLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for ReprojectLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        admits(metadata.level(), metadata.target(), self.level)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{:8.3}s {:<5} {}] {}",
            self.started.elapsed().as_secs_f64(),
            record.level(),
            short_target(record.target()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<ReprojectLogger> = OnceLock::new();

/// Install the stderr logger with `level`.
///
/// Later calls are no-ops; the first level wins.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| ReprojectLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// `EnvFilter` directives equivalent to [`init_with_level`]'s filtering.
#[cfg(feature = "tracing")]
fn filter_directives(level: LevelFilter) -> String {
    let own = level.as_str().to_ascii_lowercase();
    let deps = level.min(LevelFilter::Warn).as_str().to_ascii_lowercase();
    let mut directives = deps;
    for krate in OWN_CRATES {
        directives.push_str(&format!(",{krate}={own}"));
    }
    directives
}

/// Install a `tracing` fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` applies to this workspace and
/// dependencies are capped at `warn`.
#[cfg(feature = "tracing")]
pub fn init_tracing(level: LevelFilter, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(level)));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_records_are_capped_at_warn() {
        assert!(admits(Level::Debug, "calib_reproject_core::model", LevelFilter::Debug));
        assert!(!admits(Level::Debug, "image::codecs::png", LevelFilter::Debug));
        assert!(admits(Level::Warn, "image::codecs::png", LevelFilter::Debug));
        assert!(!admits(Level::Info, "calib_reproject::load", LevelFilter::Warn));
        assert!(!admits(Level::Error, "calib_reproject", LevelFilter::Off));
    }

    #[test]
    fn own_targets_are_shortened() {
        assert_eq!(short_target("calib_reproject_core::model"), "core::model");
        assert_eq!(short_target("calib_reproject_pipeline::demo"), "pipeline::demo");
        assert_eq!(short_target("calib_reproject::load"), "load");
        assert_eq!(short_target("calib_reproject"), "calib_reproject");
        assert_eq!(short_target("image::codecs"), "image::codecs");
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn tracing_directives_follow_the_requested_level() {
        assert_eq!(
            filter_directives(LevelFilter::Debug),
            "warn,calib_reproject=debug,calib_reproject_core=debug,calib_reproject_pipeline=debug"
        );
        assert!(filter_directives(LevelFilter::Error).starts_with("error,"));
        EnvFilter::try_new(filter_directives(LevelFilter::Trace)).expect("valid directives");
    }

    #[test]
    fn repeated_init_is_a_noop() {
        init_with_level(LevelFilter::Debug).expect("first init");
        init_with_level(LevelFilter::Trace).expect("second init");
        log::debug!("logger installed");
    }
}
