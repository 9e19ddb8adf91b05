//! Process-wide logging on top of `log4rs`.
//!
//! Everything goes to the console. With a log directory, application logs also
//! roll in `app.log` and benchmark records (target [`METRICS_TARGET`]) in
//! `metrics.log`.

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::append::rolling_file::policy::compound::{
    CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
};
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::Path;
use std::sync::Mutex;

/// Log target for per-dataset benchmark records.
pub const METRICS_TARGET: &str = "h5sweep::metrics";

const FILE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}";
const CONSOLE_PATTERN: &str = "{d(%H:%M:%S)} [{l}] {m}{n}";
const ROLL_SIZE: u64 = 10 * 1024 * 1024;

static HANDLE: Mutex<Option<log4rs::Handle>> = Mutex::new(None);

fn parse_level(level: Option<&str>) -> LevelFilter {
    match level.unwrap_or("info").to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

fn rolling(
    dir: &Path,
    stem: &str,
    keep: u32,
) -> Result<RollingFileAppender, Box<dyn std::error::Error>> {
    let pattern = dir.join(format!("{stem}.{{}}.log"));
    let roller = FixedWindowRoller::builder().build(&pattern.display().to_string(), keep)?;
    let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(ROLL_SIZE)), Box::new(roller));
    Ok(RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(FILE_PATTERN)))
        .build(dir.join(format!("{stem}.log")), Box::new(policy))?)
}

/// Configure logging for the process. Calling it again replaces the previous
/// configuration.
/// - dir: directory for `app.log`/`metrics.log`; console only when `None`
/// - level: off|error|warn|info|debug|trace (default info)
/// - retention: number of rolled files to keep (default 7)
///
/// # Errors
/// Returns an error if the directory or log files cannot be created.
pub fn configure_logging(
    dir: Option<&Path>,
    level: Option<&str>,
    retention: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let lvl = parse_level(level);
    let keep = u32::try_from(retention.unwrap_or(7)).unwrap_or(u32::MAX);
    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
        .build();
    let mut builder =
        Config::builder().appender(Appender::builder().build("console", Box::new(console)));
    let mut root = Root::builder().appender("console");
    let mut metrics = Logger::builder().appender("console").additive(false);
    if let Some(dir) = dir {
        std::fs::create_dir_all(dir)?;
        let app = rolling(dir, "app", keep)?;
        let metrics_file = rolling(dir, "metrics", keep)?;
        builder = builder
            .appender(Appender::builder().build("app", Box::new(app)))
            .appender(Appender::builder().build("metrics", Box::new(metrics_file)));
        root = root.appender("app");
        metrics = metrics.appender("metrics");
    }
    let config = builder
        .logger(metrics.build(METRICS_TARGET, lvl))
        .build(root.build(lvl))?;

    let mut guard = HANDLE.lock().map_err(|_| "logger handle lock poisoned")?;
    if let Some(handle) = guard.as_ref() {
        handle.set_config(config);
    } else {
        *guard = Some(log4rs::init_config(config)?);
    }
    Ok(())
}

/// Configure logging from environment variables if present:
/// - H5SWEEP_LOG_DIR
/// - H5SWEEP_LOG_LEVEL
/// - H5SWEEP_LOG_RETENTION
pub fn configure_from_env() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::var("H5SWEEP_LOG_DIR").ok().map(std::path::PathBuf::from);
    let level = std::env::var("H5SWEEP_LOG_LEVEL").ok();
    let retention =
        std::env::var("H5SWEEP_LOG_RETENTION").ok().and_then(|s| s.parse::<usize>().ok());
    configure_logging(dir.as_deref(), level.as_deref(), retention)
}
