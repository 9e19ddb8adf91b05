use h5sweep::fixtures::generate_fixtures;
use h5sweep::{load_config, logger};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn run() -> h5sweep::Result<()> {
    let cfg = load_config(None)?.fixtures;
    let container = cfg.format.open()?;
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let written = generate_fixtures(
        &cfg.dir,
        cfg.n_obs,
        cfg.n_vars,
        container.as_ref(),
        &mut rng,
    )?;
    log::info!("{} fixture(s) in {}", written.len(), cfg.dir.display());
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
