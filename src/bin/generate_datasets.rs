use h5sweep::{SweepGenerator, SweepOutcome, load_config, logger};

fn run() -> h5sweep::Result<()> {
    let cfg = load_config(None)?;
    let sweep = cfg.sweep;
    log::info!(
        "sweep of {} size(s) into {} ({} format, n_vars={}, density={})",
        sweep.sizes.len(),
        sweep.data_dir.display(),
        sweep.format,
        sweep.n_vars,
        sweep.density
    );
    let container = sweep.format.open()?;
    let outcomes = SweepGenerator::new(sweep, container).run()?;
    let generated = outcomes.iter().filter(|o| matches!(o, SweepOutcome::Generated { .. })).count();
    log::info!(
        "done: {generated} generated, {} skipped",
        outcomes.len() - generated
    );
    Ok(())
}

fn main() {
    if let Err(e) = logger::configure_from_env() {
        eprintln!("error: logging setup failed: {e}");
        std::process::exit(1);
    }
    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
