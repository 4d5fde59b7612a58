pub mod catalog_source;
pub mod channel_type;
pub mod codec;
pub mod config;
pub mod content_cache;
pub mod error;
pub mod model_catalog;
pub mod presets;
pub mod record;
pub mod resolver;
pub mod schema;
pub mod session;
pub mod validator;
