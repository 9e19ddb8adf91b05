use std::env;
use std::fs;
use std::path::PathBuf;

// Records which cargo features this build was compiled with so the binaries can
// refuse a container format whose backend was left out.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    let out = match env::var("OUT_DIR") {
        Ok(v) => PathBuf::from(v),
        Err(e) => panic!("OUT_DIR not set: {e}"),
    };
    let mut features: Vec<String> = env::vars()
        .filter_map(|(k, _)| {
            k.strip_prefix("CARGO_FEATURE_").map(|n| n.to_ascii_lowercase().replace('_', "-"))
        })
        .collect();
    features.sort();
    let list = features.iter().map(|s| format!("{s:?}")).collect::<Vec<_>>().join(", ");
    let content = format!("pub static COMPILED_FEATURES: &[&str] = &[{list}];\n");
    if let Err(e) = fs::write(out.join("compiled_features.rs"), content) {
        panic!("failed to write compiled_features.rs: {e}");
    }
}
