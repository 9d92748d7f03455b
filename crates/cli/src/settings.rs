//! Database settings for the terminal front-end.
//!
//! Reads the same sources as the web server so both front-ends talk to the
//! same database without extra setup.

use config::builder::DefaultState;
use config::ConfigBuilder;
use persistence::db::{database_env_overrides, DatabaseConfig};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct Settings {
    #[serde(default)]
    database: DatabaseConfig,
}

/// Loads `[database]` from config files, `CONTACTS__DATABASE__*` and the
/// `PG_*` variables, in increasing precedence.
pub fn load_database_config() -> Result<DatabaseConfig, config::ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("config/default").required(false))
        .add_source(config::File::with_name("config/local").required(false))
        .add_source(config::Environment::with_prefix("CONTACTS").separator("__"));
    let builder = apply_legacy_env(builder, |var| std::env::var(var).ok())?;

    let settings: Settings = builder.build()?.try_deserialize()?;
    Ok(settings.database)
}

fn apply_legacy_env<F>(
    mut builder: ConfigBuilder<DefaultState>,
    lookup: F,
) -> Result<ConfigBuilder<DefaultState>, config::ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    for (key, value) in database_env_overrides(lookup) {
        builder = builder.set_override(key, value)?;
    }
    Ok(builder)
}
