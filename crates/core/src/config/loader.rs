//! Settings file loader.
//!
//! Settings live in an optional `stagekit.toml` at the root of the
//! directory the consumer points us at. Every key is optional.

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use sk_protocol::config_models::Settings;
use std::path::Path;

/// File name looked up by [`load_settings`].
pub const SETTINGS_FILE_NAME: &str = "stagekit.toml";

/// Loads runtime settings from `<root>/stagekit.toml`.
///
/// # Arguments
///
/// * `root` - Directory containing the settings file
///
/// # Returns
///
/// The parsed settings. A missing file yields [`Settings::default`] rather
/// than an error.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - The file exists but cannot be read
/// - The file is not valid TOML or has values of the wrong type
///
/// # Example
///
/// ```rust,no_run
/// use sk_core::config::loader::load_settings;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = load_settings(Path::new(".")).await?;
/// println!("Logging at {}", settings.log_level);
/// # Ok(())
/// # }
/// ```
pub async fn load_settings(root: &Path) -> ConfigResult<Settings> {
    let settings_path = root.join(SETTINGS_FILE_NAME);

    if !settings_path.exists() {
        return Ok(Settings::default());
    }

    let content = tokio::fs::read_to_string(&settings_path)
        .await
        .map_err(|source| ConfigError::FileRead {
            path: settings_path.clone(),
            source,
        })?;

    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: settings_path,
        source,
    })
}
