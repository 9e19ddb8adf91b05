//! Cargo features this build was compiled with (generated by `build.rs`).

include!(concat!(env!("OUT_DIR"), "/compiled_features.rs"));

#[must_use]
pub fn is_compiled(name: &str) -> bool {
    COMPILED_FEATURES.contains(&name)
}
