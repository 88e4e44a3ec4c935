use anyhow::{Context, Result};
use importer::{BenefitResolution, ImportOptions, RelationPolicy};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub api_keys: String,
    pub site_url: String,
    pub import_options: ImportOptions,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let benefit_resolution = match std::env::var("IMPORT_BENEFIT_RESOLUTION") {
            Ok(value) => value
                .parse::<BenefitResolution>()
                .map_err(anyhow::Error::msg)
                .context("Invalid IMPORT_BENEFIT_RESOLUTION")?,
            Err(_) => BenefitResolution::default(),
        };

        let relation_policy = match std::env::var("IMPORT_STRICT").as_deref() {
            Ok("1") | Ok("true") => RelationPolicy::Strict,
            _ => RelationPolicy::BestEffort,
        };

        let host = std::env::var("HOST").context("Cannot load HOST env variable")?;
        let port: u16 = std::env::var("PORT")
            .context("PORT must be a number")?
            .parse()?;
        let site_url =
            std::env::var("SITE_URL").unwrap_or_else(|_| format!("http://{}:{}", host, port));

        Ok(Self {
            host,
            port,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            api_keys: std::env::var("API_KEYS").unwrap_or_default(),
            site_url,
            import_options: ImportOptions {
                benefit_resolution,
                relation_policy,
            },
        })
    }
}
