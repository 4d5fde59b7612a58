use channelkit::catalog_source::FileCatalogSource;
use channelkit::channel_type::ChannelType;
use channelkit::codec::decode;
use channelkit::config::RuntimeConfig;
use channelkit::error::{ConfigError, ErrorKind, ValidationErrors};
use channelkit::model_catalog::ModelCatalogStore;
use channelkit::record::{ChannelRecord, WireRecord};
use channelkit::{codec, validator};
use serde::Serialize;

const USAGE: &str = "usage: channelkit resolve <type> | submit <record.json> [--batch] | load <wire.json>";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,channelkit=debug")),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(std::env::args().skip(1).collect()).await {
        match serde_json::to_string_pretty(&err.envelope()) {
            Ok(body) => eprintln!("{body}"),
            Err(_) => eprintln!("error: {}", err.message),
        }
        std::process::exit(1);
    }
}

async fn run(args: Vec<String>) -> Result<(), ConfigError> {
    let runtime = RuntimeConfig::from_env();
    let schemas = runtime.load_schema_catalog().await?;
    let catalog = ModelCatalogStore::new();
    if let Some(path) = &runtime.catalog_path {
        if let Err(err) = catalog.refresh(&FileCatalogSource::new(path)).await {
            tracing::warn!(code = %err.code, "continuing with freehand model entries only");
        }
    }

    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match args.as_slice() {
        ["resolve", ty] => {
            let ty: i64 = ty.parse().map_err(|_| usage())?;
            print_json(&schemas.resolve(ChannelType(ty)))
        }
        ["submit", path, rest @ ..] => {
            let batch = rest.contains(&"--batch");
            let raw: serde_json::Value = read_json(path).await?;
            if let Err(errors) = validator::require_type(&raw) {
                return Err(report(errors)?);
            }
            let record: ChannelRecord = serde_json::from_value(raw).map_err(|err| {
                ConfigError::new(ErrorKind::InvalidRecord, "parse_failed", format!("{path}: {err}"))
            })?;
            if let Err(errors) = validator::validate(&record, record.is_edit) {
                return Err(report(errors)?);
            }
            let wire = codec::encode(&record, batch)?;
            if batch {
                print_json(&codec::expand_batch(&wire))
            } else {
                print_json(&wire)
            }
        }
        ["load", path] => {
            let wire: WireRecord = read_json(path).await?;
            let snapshot = catalog.snapshot().await;
            print_json(&decode(&wire, &snapshot))
        }
        _ => Err(usage()),
    }
}

/// Prints the field-keyed errors and returns the error that ends the run.
fn report(errors: ValidationErrors) -> Result<ConfigError, ConfigError> {
    print_json(&serde_json::json!({ "errors": errors }))?;
    Ok(ConfigError::new(
        ErrorKind::RequiredFieldMissing,
        "validation_failed",
        errors.to_string(),
    ))
}

fn usage() -> ConfigError {
    ConfigError::new(ErrorKind::InvalidRecord, "usage", USAGE)
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, ConfigError> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|err| {
        ConfigError::new(ErrorKind::InvalidRecord, "read_failed", format!("{path}: {err}"))
    })?;
    serde_json::from_str(&raw).map_err(|err| {
        ConfigError::new(ErrorKind::InvalidRecord, "parse_failed", format!("{path}: {err}"))
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ConfigError> {
    let body = serde_json::to_string_pretty(value).map_err(|err| {
        ConfigError::new(ErrorKind::InvalidRecord, "serialize_failed", err.to_string())
    })?;
    println!("{body}");
    Ok(())
}
