use crate::channel_type::ChannelType;
use crate::model_catalog::{ModelCatalog, ModelEntry};
use crate::schema::{Field, FieldValue, ParamValue, ResolvedSchema};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Plugin name -> param name -> value.
pub type PluginValues = BTreeMap<String, BTreeMap<String, ParamValue>>;

/// Channel as held by an edit session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub other: String,
    #[serde(default)]
    pub proxy: String,
    #[serde(default)]
    pub test_model: String,
    #[serde(default)]
    pub only_chat: bool,
    #[serde(default)]
    pub models: Vec<ModelEntry>,
    #[serde(default)]
    pub groups: Vec<String>,
    /// JSON object text as the operator edits it; empty means unset.
    #[serde(default)]
    pub model_mapping: String,
    #[serde(default)]
    pub plugin: PluginValues,
    #[serde(default)]
    pub is_edit: bool,
}

impl ChannelRecord {
    /// New-channel record populated from the defaults of `schema`.
    pub fn from_defaults(schema: &ResolvedSchema, catalog: &ModelCatalog) -> Self {
        let mut record = Self {
            id: None,
            channel_type: schema.channel_type,
            name: String::new(),
            tag: String::new(),
            base_url: String::new(),
            key: String::new(),
            other: String::new(),
            proxy: String::new(),
            test_model: String::new(),
            only_chat: false,
            models: Vec::new(),
            groups: Vec::new(),
            model_mapping: String::new(),
            plugin: PluginValues::new(),
            is_edit: false,
        };
        for (field, spec) in &schema.fields {
            match (field, &spec.default) {
                (Field::Type, _) => {}
                (Field::Models, FieldValue::List(ids)) => record.models = catalog.dedupe(ids),
                (_, value) => record.set_field(*field, value.clone()),
            }
        }
        record.plugin = schema
            .plugins
            .iter()
            .map(|(name, plugin)| {
                let params = plugin
                    .params
                    .iter()
                    .map(|(param, spec)| (param.clone(), spec.zero_value()))
                    .collect();
                (name.clone(), params)
            })
            .collect();
        record
    }

    pub fn field_value(&self, field: Field) -> FieldValue {
        match field {
            Field::Type => FieldValue::Number(self.channel_type.0),
            Field::Tag => FieldValue::Text(self.tag.clone()),
            Field::Name => FieldValue::Text(self.name.clone()),
            Field::BaseUrl => FieldValue::Text(self.base_url.clone()),
            Field::Other => FieldValue::Text(self.other.clone()),
            Field::Models => {
                FieldValue::List(self.models.iter().map(|m| m.id.clone()).collect())
            }
            Field::Key => FieldValue::Text(self.key.clone()),
            Field::ModelMapping => FieldValue::Text(self.model_mapping.clone()),
            Field::Proxy => FieldValue::Text(self.proxy.clone()),
            Field::TestModel => FieldValue::Text(self.test_model.clone()),
            Field::OnlyChat => FieldValue::Flag(self.only_chat),
            Field::Groups => FieldValue::List(self.groups.clone()),
        }
    }

    /// Writes `value` into `field`. Values of the wrong kind are ignored.
    /// Model ids set this way are tagged freehand; use a catalog to resolve
    /// their groups.
    pub fn set_field(&mut self, field: Field, value: FieldValue) {
        match (field, value) {
            (Field::Type, FieldValue::Number(n)) => self.channel_type = ChannelType(n),
            (Field::OnlyChat, FieldValue::Flag(b)) => self.only_chat = b,
            (Field::Models, FieldValue::List(ids)) => {
                self.models = ModelCatalog::empty().dedupe(ids);
            }
            (Field::Groups, FieldValue::List(groups)) => self.groups = groups,
            (field, FieldValue::Text(text)) => match field {
                Field::Tag => self.tag = text,
                Field::Name => self.name = text,
                Field::BaseUrl => self.base_url = text,
                Field::Other => self.other = text,
                Field::Key => self.key = text,
                Field::ModelMapping => self.model_mapping = text,
                Field::Proxy => self.proxy = text,
                Field::TestModel => self.test_model = text,
                _ => tracing::warn!(field = field.as_str(), "ignoring text value for field"),
            },
            (field, _) => tracing::warn!(field = field.as_str(), "ignoring value of wrong kind"),
        }
    }
}

/// Channel as the load/save endpoints exchange it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub base_url: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub other: String,
    #[serde(default)]
    pub proxy: String,
    #[serde(default)]
    pub test_model: String,
    #[serde(default)]
    pub only_chat: bool,
    /// Comma-joined model ids.
    #[serde(default)]
    pub models: String,
    /// Comma-joined group names.
    #[serde(default)]
    pub group: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub model_mapping: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub plugin: PluginValues,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaCatalog;
    use serde_json::json;

    #[test]
    fn wire_record_tolerates_null_columns() {
        let wire: WireRecord = serde_json::from_value(json!({
            "id": 7,
            "type": 1,
            "name": "openai",
            "base_url": null,
            "model_mapping": null,
            "plugin": null
        }))
        .expect("wire");
        assert_eq!(wire.base_url, "");
        assert!(wire.plugin.is_empty());
        assert_eq!(wire.group, "");
    }

    #[test]
    fn defaults_follow_resolved_schema() {
        let schemas = SchemaCatalog::builtin().expect("schema");
        let resolved = schemas.resolve(ChannelType::GEMINI);
        let record = ChannelRecord::from_defaults(&resolved, &ModelCatalog::empty());
        assert_eq!(record.channel_type, ChannelType::GEMINI);
        assert_eq!(record.groups, vec!["default".to_string()]);
        assert_eq!(record.test_model, "gemini-1.5-flash");
        assert!(record.models.iter().all(ModelEntry::is_freehand));
        assert_eq!(
            record.plugin["code_execution"]["enable"],
            ParamValue::Bool(false)
        );
        assert!(!record.is_edit);
    }

    #[test]
    fn set_field_ignores_mismatched_kinds() {
        let schemas = SchemaCatalog::builtin().expect("schema");
        let resolved = schemas.resolve(ChannelType::OPENAI);
        let mut record = ChannelRecord::from_defaults(&resolved, &ModelCatalog::empty());
        record.set_field(Field::Name, FieldValue::List(vec!["x".to_string()]));
        assert_eq!(record.name, "");
        record.set_field(Field::Name, FieldValue::text("primary"));
        assert_eq!(record.field_value(Field::Name), FieldValue::text("primary"));
    }
}
