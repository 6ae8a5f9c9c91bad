use config::builder::{ConfigBuilder, DefaultState};
use config::ConfigError;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct OdinConfig {
    pub api: ApiSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    /// Root of the Odin REST API, e.g. `https://odin.rss.chalmers.se`
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub listen_addr: String,
    /// Periods streamed by the calendar endpoint when the client does not ask for a count
    pub calendar_periods: usize,
}

fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("api.base_url", "https://odin.rss.chalmers.se")?
        .set_default("api.timeout_secs", 30)?
        .set_default("server.listen_addr", "0.0.0.0:8080")?
        .set_default("server.calendar_periods", 3)
}

/// Load `config/odin.{toml,yaml,json}` (optional) with `ODIN__SECTION__KEY` environment overrides.
pub fn load_odin_config() -> anyhow::Result<OdinConfig> {
    let settings = with_defaults()?
        .add_source(config::File::with_name("config/odin").required(false))
        .add_source(config::Environment::with_prefix("ODIN").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
