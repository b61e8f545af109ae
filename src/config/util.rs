//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find the config file, walking upward from the current directory.
///
/// ```text
/// /home/user/shop/data/configs/  ← cwd
/// /home/user/shop/scconf.toml    ← found
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.exists())
}
