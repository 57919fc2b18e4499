use crate::application::refresh_cache::CACHE_TTL;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_UPSTREAM_URL: &str = "https://waterservices.usgs.gov/nwis/iv/";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub server: ServerSettings,
    pub upstream: UpstreamSettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheSettings {
    pub ttl_secs: u64,
}

impl UpstreamSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

fn builder_with_defaults() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(config::Config::builder()
        .set_default("server.bind_addr", DEFAULT_BIND_ADDR)?
        .set_default("upstream.base_url", DEFAULT_UPSTREAM_URL)?
        .set_default("upstream.timeout_secs", DEFAULT_UPSTREAM_TIMEOUT_SECS)?
        .set_default("cache.ttl_secs", CACHE_TTL.as_secs())?)
}

/// Load `config/service` (optional) with `RIVER__SECTION__KEY` overrides.
pub fn load_service_config() -> anyhow::Result<ServiceConfig> {
    let settings = builder_with_defaults()?
        .add_source(config::File::with_name("config/service").required(false))
        .add_source(
            config::Environment::with_prefix("RIVER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
