use channelkit::catalog_source::StaticCatalogSource;
use channelkit::channel_type::ChannelType;
use channelkit::codec::{self, AZURE_DEFAULT_API_VERSION};
use channelkit::model_catalog::{ModelCatalog, ModelCatalogStore, ModelEntry, RawModel};
use channelkit::record::{ChannelRecord, WireRecord};
use channelkit::resolver::on_type_change;
use channelkit::schema::{Field, ParamValue, SchemaCatalog};
use channelkit::session::{EditSession, SubmitError};
use channelkit::validator::validate;
use serde_json::json;
use std::sync::Arc;

fn raw(id: &str, owned_by: &str) -> RawModel {
    RawModel {
        id: id.to_string(),
        owned_by: owned_by.to_string(),
    }
}

fn catalog_models() -> Vec<RawModel> {
    vec![
        raw("gpt-4", "OpenAI"),
        raw("gpt-4o", "OpenAI"),
        raw("gemini-1.5-pro", "Google Gemini"),
        raw("claude-3-haiku-20240307", "Anthropic"),
    ]
}

async fn store() -> ModelCatalogStore {
    let store = ModelCatalogStore::new();
    store
        .refresh(&StaticCatalogSource::new(catalog_models()))
        .await
        .expect("refresh");
    store
}

fn schemas() -> Arc<SchemaCatalog> {
    Arc::new(SchemaCatalog::builtin().expect("builtin schema"))
}

#[tokio::test]
async fn azure_create_fails_then_encodes_default_api_version() {
    let mut session = EditSession::create(schemas(), store().await).await;
    session.change_type(ChannelType::AZURE).await;
    {
        let record = session.record_mut();
        record.name.clear();
        record.models.clear();
        record.groups = vec!["default".to_string()];
        record.other.clear();
        record.key = "azure-key".to_string();
        record.base_url = "https://example.openai.azure.com/".to_string();
    }

    let errors = session.validate().expect_err("missing name and models");
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec![Field::Name, Field::Models]);

    {
        let record = session.record_mut();
        record.name = "azure-1".to_string();
        record.models = ModelCatalog::new(catalog_models()).dedupe(["gpt-4"]);
    }
    let wires = session.submit(false).expect("submit");
    assert_eq!(wires.len(), 1);
    let wire = &wires[0];
    assert_eq!(wire.other, AZURE_DEFAULT_API_VERSION);
    assert_eq!(wire.other, "2024-05-01-preview");
    assert_eq!(wire.models, "gpt-4");
    assert_eq!(wire.base_url, "https://example.openai.azure.com");
    assert_eq!(wire.group, "default");
}

#[tokio::test]
async fn batch_keys_beyond_base_urls_use_first_base_url() {
    let mut session = EditSession::create(schemas(), store().await).await;
    {
        let record = session.record_mut();
        record.name = "pool".to_string();
        record.base_url = "https://a\nhttps://b".to_string();
        record.key = "k1\nk2\nk3".to_string();
    }

    let wires = session.submit(true).expect("batch submit");
    let pairs: Vec<(&str, &str)> = wires
        .iter()
        .map(|w| (w.base_url.as_str(), w.key.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![("https://a", "k1"), ("https://b", "k2"), ("https://a", "k3")]
    );
}

#[tokio::test]
async fn loaded_channel_round_trips_through_session() {
    let wire: WireRecord = serde_json::from_value(json!({
        "id": 31,
        "type": 25,
        "name": "gemini",
        "tag": "",
        "base_url": null,
        "key": "AIza-test",
        "other": "v1beta",
        "proxy": "",
        "test_model": "gemini-1.5-pro",
        "only_chat": false,
        "models": "gemini-1.5-pro,gemini-exp",
        "group": "default,vip",
        "model_mapping": "{\"gemini-pro\":\"gemini-1.5-pro\"}",
        "plugin": { "code_execution": { "enable": true } }
    }))
    .expect("wire");

    let session = EditSession::load(schemas(), store().await, &wire).await;
    let record = session.record();
    assert!(record.is_edit);
    assert_eq!(
        record.models,
        vec![
            ModelEntry::new("gemini-1.5-pro", "Google Gemini"),
            ModelEntry::freehand("gemini-exp"),
        ]
    );
    assert_eq!(record.groups, vec!["default".to_string(), "vip".to_string()]);
    assert_eq!(
        record.model_mapping,
        "{\n  \"gemini-pro\": \"gemini-1.5-pro\"\n}"
    );

    let resubmitted = session.submit(false).expect("submit");
    let decoded = codec::decode(&resubmitted[0], &ModelCatalog::new(catalog_models()));
    assert_eq!(&decoded, record);
}

#[tokio::test]
async fn plugin_values_follow_type_switches() {
    let mut session = EditSession::create(schemas(), store().await).await;
    session
        .record_mut()
        .plugin
        .get_mut("online")
        .expect("online plugin on OpenAI")
        .insert("enable".to_string(), ParamValue::Bool(true));

    session.change_type(ChannelType::CUSTOM).await;
    assert_eq!(
        session.record().plugin["online"]["enable"],
        ParamValue::Bool(true)
    );

    session.change_type(ChannelType::GEMINI).await;
    assert!(!session.record().plugin.contains_key("online"));
    assert_eq!(
        session.record().plugin["code_execution"]["enable"],
        ParamValue::Bool(false)
    );
}

#[tokio::test]
async fn unavailable_catalog_still_allows_editing() {
    let session = EditSession::create(schemas(), ModelCatalogStore::new()).await;
    assert!(!session.record().models.is_empty());
    assert!(session.record().models.iter().all(ModelEntry::is_freehand));
}

#[tokio::test]
async fn supported_models_fill_uses_type_group() {
    let mut session = EditSession::create(schemas(), store().await).await;
    session.change_type(ChannelType::ANTHROPIC).await;
    session.fill_supported_models().await;
    assert_eq!(
        session.record().models,
        vec![ModelEntry::new("claude-3-haiku-20240307", "Anthropic")]
    );

    session.fill_all_models().await;
    assert_eq!(session.record().models.len(), 4);
}

#[test]
fn resolver_is_pure_over_its_inputs() {
    let schemas = SchemaCatalog::builtin().expect("schema");
    let catalog = ModelCatalog::new(catalog_models());
    let record = ChannelRecord::from_defaults(&schemas.resolve(ChannelType::AZURE), &catalog);
    let before = record.clone();

    let first = on_type_change(&schemas, &catalog, ChannelType::GEMINI, &record);
    let second = on_type_change(&schemas, &catalog, ChannelType::GEMINI, &record);
    assert_eq!(first, second);
    assert_eq!(record, before);
}

#[test]
fn mapping_shape_rules() {
    let schemas = SchemaCatalog::builtin().expect("schema");
    let mut record =
        ChannelRecord::from_defaults(&schemas.resolve(ChannelType::OPENAI), &ModelCatalog::empty());
    record.name = "n".to_string();
    record.key = "k".to_string();

    record.model_mapping = "[1,2]".to_string();
    let errors = validate(&record, false).expect_err("array mapping");
    assert!(errors.contains(Field::ModelMapping));

    record.model_mapping = String::new();
    assert!(validate(&record, false).is_ok());
}

#[tokio::test]
async fn batch_on_edit_is_refused() {
    let wire = WireRecord {
        id: Some(5),
        name: "existing".to_string(),
        key: "k".to_string(),
        models: "gpt-4".to_string(),
        group: "default".to_string(),
        ..WireRecord::default()
    };
    let session = EditSession::load(schemas(), store().await, &wire).await;
    assert!(matches!(session.submit(true), Err(SubmitError::Encode(_))));
}
