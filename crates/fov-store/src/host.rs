use std::fs;
use std::path::Path;

use fov_core::{FovLayer, XrRuntime};

use crate::config::LayerConfig;
use crate::error::{Result, StoreError};
use crate::paths;
use crate::store::SettingsDb;

/// Build a layer over `next`, backed by the settings database and config in
/// the data directory (`base_dir`, else `$FOV_DATA_DIR`, else
/// `~/.customized-fov`). The directory is created if needed.
pub fn attach<R: XrRuntime>(next: R, base_dir: Option<&Path>) -> Result<FovLayer<R, SettingsDb>> {
    let base = paths::resolve_base_dir(base_dir);
    fs::create_dir_all(&base).map_err(|e| {
        StoreError::InvalidData(format!("failed to create {}: {e}", base.display()))
    })?;

    let config = LayerConfig::load(&paths::config_path(&base))?;
    let settings = SettingsDb::open(&paths::settings_path(&base))?.with_namespace(&config.namespace);
    tracing::debug!(
        base = %base.display(),
        namespace = %config.namespace,
        "layer attached"
    );

    Ok(FovLayer::new(next, settings).with_hooks(config))
}
