use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::models::RideParams;

/// Leser rideparametre fra disk (JSON).
/// Hvis filen ikke finnes, returneres default-parametre.
pub fn load_params(path: impl AsRef<Path>) -> Result<RideParams> {
    let path = path.as_ref();
    if !path.exists() {
        warn!("fant ikke parametre på {}, bruker default", path.display());
        return Ok(RideParams::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading ride params from {}", path.display()))?;
    let params: RideParams = serde_json::from_str(&contents)
        .with_context(|| format!("parsing ride params in {}", path.display()))?;
    params.validate()?;
    info!("parametre lastet fra {} (strategy={})", path.display(), params.strategy);
    Ok(params)
}

/// Lagrer parametre til disk som JSON (pretty-print).
pub fn save_params(params: &RideParams, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(params)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    info!("parametre lagret til {} (strategy={})", path.display(), params.strategy);
    Ok(())
}
