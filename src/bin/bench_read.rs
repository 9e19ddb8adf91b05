use clap::Parser;
use h5sweep::{AccessMode, Harness, load_config, logger};

/// Time reading every sweep dataset back and write a CSV report.
#[derive(Parser, Debug)]
#[command(name = "bench_read", version, about)]
struct Cli {
    /// Open datasets lazily and read X on demand instead of loading them fully.
    #[arg(long)]
    backed: bool,
}

fn run(cli: &Cli) -> h5sweep::Result<()> {
    let cfg = load_config(None)?;
    let mode = if cli.backed {
        AccessMode::Backed
    } else {
        AccessMode::Full
    };
    let container = cfg.bench.format.open()?;
    let harness = Harness::new(cfg.bench, container);
    let records = harness.run(mode)?;
    log::info!(
        "{} dataset(s) benchmarked, report at {}",
        records.len(),
        harness.report_path(mode).display()
    );
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = logger::configure_from_env() {
        eprintln!("error: logging setup failed: {e}");
        std::process::exit(1);
    }
    if let Err(e) = run(&cli) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
