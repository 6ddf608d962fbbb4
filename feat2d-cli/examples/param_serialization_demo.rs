//! Round-trip a parameter map through TOML and reconfigure a backend with it.

use feat2d_cli::contrast::{CONTRAST_PATCH_SIZE, CONTRAST_THRESHOLD, ContrastBackend};
use feat2d_core::{ParamMap, ParamValue, params};
use feat2d_pipeline::FeatureBackend;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut map = ParamMap::new();
    map.insert(CONTRAST_THRESHOLD.to_string(), ParamValue::Float(28.0));
    map.insert(CONTRAST_PATCH_SIZE.to_string(), ParamValue::Int(7));

    let path = std::env::temp_dir().join("feat2d_params_demo.toml");
    params::save_toml(&map, &path)?;
    println!("saved {}", path.display());

    let loaded = params::load_toml(&path)?;
    let mut backend = ContrastBackend::new(&ParamMap::new());
    println!("defaults:   {:?}", backend.config());
    backend.configure(&loaded);
    println!("configured: {:?}", backend.config());

    Ok(())
}
