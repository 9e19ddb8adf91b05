#[path = "prop_generator.rs"]
mod generator_props;
#[path = "prop_sparse.rs"]
mod sparse_props;
#[path = "prop_stats.rs"]
mod stats_props;
