use crate::model_catalog::RawModel;
use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog parse failed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Where the model catalog comes from. Implementations perform the fetch;
/// the store decides which result wins.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_models(&self) -> Result<Vec<RawModel>, CatalogError>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticCatalogSource {
    models: Vec<RawModel>,
}

impl StaticCatalogSource {
    pub fn new(models: Vec<RawModel>) -> Self {
        Self { models }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    async fn fetch_models(&self) -> Result<Vec<RawModel>, CatalogError> {
        Ok(self.models.clone())
    }
}

/// Reads `[{"id", "owned_by"}]` from a JSON file on every fetch.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    async fn fetch_models(&self) -> Result<Vec<RawModel>, CatalogError> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        Ok(parse_catalog(&raw)?)
    }
}

/// Accepts either a bare array or the `{"data": [...]}` envelope the model
/// listing endpoint returns.
pub fn parse_catalog(raw: &str) -> Result<Vec<RawModel>, serde_json::Error> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Shape {
        Bare(Vec<RawModel>),
        Enveloped { data: Vec<RawModel> },
    }

    Ok(match serde_json::from_str::<Shape>(raw)? {
        Shape::Bare(models) | Shape::Enveloped { data: models } => models,
    })
}
