use crate::channel_type::ChannelType;
use crate::error::{ConfigError, ConfigResult, ErrorKind};
use crate::model_catalog::{ModelCatalog, ModelEntry};
use crate::record::{ChannelRecord, WireRecord};
use crate::schema::Field;
use serde_json::Value;
use std::collections::HashSet;

/// API version submitted when an Azure channel leaves `other` empty.
pub const AZURE_DEFAULT_API_VERSION: &str = "2024-05-01-preview";
/// API version submitted when an iFlytek Spark channel leaves `other` empty.
pub const XUNFEI_DEFAULT_API_VERSION: &str = "v2.1";

fn other_fallback(ty: ChannelType) -> Option<&'static str> {
    match ty {
        ChannelType::AZURE => Some(AZURE_DEFAULT_API_VERSION),
        ChannelType::XUNFEI => Some(XUNFEI_DEFAULT_API_VERSION),
        _ => None,
    }
}

/// Serializes a structured record for the save endpoint.
///
/// In batch mode `base_url` and `key` stay newline-delimited lists; use
/// [`expand_batch`] to split them into one record per key.
pub fn encode(record: &ChannelRecord, batch: bool) -> ConfigResult<WireRecord> {
    if batch && record.is_edit {
        return Err(ConfigError::new(
            ErrorKind::InvalidRecord,
            "batch_on_edit",
            "batch mode is only available when creating channels",
        ));
    }

    let (base_url, key) = if batch {
        (
            join_lines(batch_lines(&record.base_url).map(strip_trailing_slash)),
            join_lines(batch_lines(&record.key)),
        )
    } else {
        (
            strip_trailing_slash(record.base_url.trim()).to_string(),
            record.key.trim().to_string(),
        )
    };

    let mut other = record.other.trim().to_string();
    if other.is_empty() {
        if let Some(fallback) = other_fallback(record.channel_type) {
            other = fallback.to_string();
        }
    }

    Ok(WireRecord {
        id: record.id,
        channel_type: record.channel_type,
        name: record.name.trim().to_string(),
        tag: record.tag.trim().to_string(),
        base_url,
        key,
        other,
        proxy: record.proxy.trim().to_string(),
        test_model: record.test_model.trim().to_string(),
        only_chat: record.only_chat,
        models: unique_model_ids(&record.models).join(","),
        group: unique_groups(&record.groups).join(","),
        model_mapping: encode_mapping(&record.model_mapping)?,
        plugin: record.plugin.clone(),
    })
}

/// Rebuilds the structured record from a loaded channel. Never fails: a
/// mapping that does not parse is kept verbatim for the validator to flag.
pub fn decode(wire: &WireRecord, catalog: &ModelCatalog) -> ChannelRecord {
    ChannelRecord {
        id: wire.id,
        channel_type: wire.channel_type,
        name: wire.name.clone(),
        tag: wire.tag.clone(),
        base_url: wire.base_url.clone(),
        key: wire.key.clone(),
        other: wire.other.clone(),
        proxy: wire.proxy.clone(),
        test_model: wire.test_model.clone(),
        only_chat: wire.only_chat,
        models: if wire.models.is_empty() {
            Vec::new()
        } else {
            catalog.dedupe(wire.models.split(','))
        },
        groups: split_csv(&wire.group),
        model_mapping: decode_mapping(&wire.model_mapping),
        plugin: wire.plugin.clone(),
        is_edit: wire.id.is_some(),
    }
}

/// Parses model mapping text, requiring a JSON object. Empty text is unset.
pub fn parse_mapping(text: &str) -> ConfigResult<Option<serde_json::Map<String, Value>>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => Ok(Some(map)),
        Ok(_) => Err(ConfigError::new(
            ErrorKind::MalformedMapping,
            "mapping_not_object",
            "model mapping must be a JSON object",
        )
        .with_field(Field::ModelMapping)),
        Err(err) => Err(ConfigError::new(
            ErrorKind::MalformedMapping,
            "mapping_invalid_json",
            format!("model mapping is not valid JSON: {err}"),
        )
        .with_field(Field::ModelMapping)),
    }
}

fn encode_mapping(text: &str) -> ConfigResult<String> {
    match parse_mapping(text)? {
        None => Ok(String::new()),
        Some(map) => serde_json::to_string_pretty(&Value::Object(map)).map_err(|err| {
            ConfigError::new(ErrorKind::MalformedMapping, "mapping_encode_failed", err.to_string())
                .with_field(Field::ModelMapping)
        }),
    }
}

fn decode_mapping(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| text.to_string())
}

/// Pairs batch base URLs with keys by line index. Keys past the last base
/// URL use the first one; surplus base URLs are ignored.
pub fn align_batch(base_urls: &[String], keys: &[String]) -> Vec<(String, String)> {
    let fallback = base_urls.first().cloned().unwrap_or_default();
    keys.iter()
        .enumerate()
        .map(|(idx, key)| {
            let base_url = base_urls.get(idx).cloned().unwrap_or_else(|| fallback.clone());
            (base_url, key.clone())
        })
        .collect()
}

/// Splits a batch wire record into one record per key.
pub fn expand_batch(wire: &WireRecord) -> Vec<WireRecord> {
    let base_urls: Vec<String> = batch_lines(&wire.base_url)
        .map(strip_trailing_slash)
        .map(str::to_string)
        .collect();
    let keys: Vec<String> = batch_lines(&wire.key).map(str::to_string).collect();

    align_batch(&base_urls, &keys)
        .into_iter()
        .map(|(base_url, key)| WireRecord {
            base_url,
            key,
            ..wire.clone()
        })
        .collect()
}

fn batch_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

fn join_lines<'a>(lines: impl Iterator<Item = &'a str>) -> String {
    lines.collect::<Vec<_>>().join("\n")
}

fn strip_trailing_slash(url: &str) -> &str {
    url.trim_end_matches('/')
}

fn split_csv(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn unique_model_ids(models: &[ModelEntry]) -> Vec<&str> {
    let mut seen = HashSet::with_capacity(models.len());
    models
        .iter()
        .map(|m| m.id.as_str())
        .filter(|id| seen.insert(*id))
        .collect()
}

fn unique_groups(groups: &[String]) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::with_capacity(groups.len());
    for group in groups.iter().map(|g| g.trim()) {
        if !group.is_empty() && !out.contains(&group) {
            out.push(group);
        }
    }
    out
}
