use crate::error::{ConfigError, ConfigResult, ErrorKind};
use crate::schema::SchemaCatalog;
use std::path::PathBuf;

pub const SCHEMA_PATH_ENV: &str = "CHANNELKIT_SCHEMA_PATH";
pub const CATALOG_PATH_ENV: &str = "CHANNELKIT_CATALOG_PATH";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub schema_path: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let path = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(|v| PathBuf::from(v.trim()))
        };
        Self {
            schema_path: path(SCHEMA_PATH_ENV),
            catalog_path: path(CATALOG_PATH_ENV),
        }
    }

    /// Built-in table unless a schema file is configured.
    pub async fn load_schema_catalog(&self) -> ConfigResult<SchemaCatalog> {
        let Some(path) = &self.schema_path else {
            return SchemaCatalog::builtin();
        };
        let raw = tokio::fs::read_to_string(path).await.map_err(|err| {
            ConfigError::new(
                ErrorKind::InvalidSchema,
                "schema_read_failed",
                format!("{}: {err}", path.display()),
            )
        })?;
        let catalog = SchemaCatalog::from_json(&raw)?;
        tracing::info!(
            path = %path.display(),
            types = catalog.known_types().len(),
            "loaded channel schema table"
        );
        Ok(catalog)
    }
}
