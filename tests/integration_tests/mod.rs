// One file per public component; shared builders live in _support.
mod _support;

#[path = "mod_assembler.rs"]
mod assembler_tests;
#[path = "mod_bench.rs"]
mod bench_tests;
#[path = "mod_config.rs"]
mod config_tests;
#[path = "mod_container.rs"]
mod container_tests;
#[path = "mod_errors.rs"]
mod errors_tests;
#[path = "mod_generator.rs"]
mod generator_tests;
#[path = "mod_logger.rs"]
mod logger_tests;
#[path = "mod_sweep.rs"]
mod sweep_tests;
