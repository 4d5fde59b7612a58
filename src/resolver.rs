use crate::channel_type::ChannelType;
use crate::model_catalog::{ModelCatalog, ModelEntry};
use crate::record::{ChannelRecord, PluginValues};
use crate::schema::{Field, FieldValue, PluginSchema, SchemaCatalog};
use std::collections::BTreeMap;

/// Mutations produced by switching a record to another channel type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeChange {
    pub channel_type: ChannelType,
    /// Defaults for fields that were empty, models excluded.
    pub fields: BTreeMap<Field, FieldValue>,
    /// Set when the models list was empty and the new type has defaults.
    pub models: Option<Vec<ModelEntry>>,
    /// Complete replacement for the plugin map.
    pub plugin: PluginValues,
}

impl TypeChange {
    pub fn is_noop_for(&self, record: &ChannelRecord) -> bool {
        self.channel_type == record.channel_type
            && self.fields.is_empty()
            && self.models.is_none()
            && self.plugin == record.plugin
    }

    pub fn apply_to(&self, record: &mut ChannelRecord) {
        record.channel_type = self.channel_type;
        for (field, value) in &self.fields {
            record.set_field(*field, value.clone());
        }
        if let Some(models) = &self.models {
            record.models = models.clone();
        }
        record.plugin = self.plugin.clone();
    }
}

/// Computes the patch for switching `current` to `new_type`.
///
/// Fields the operator already filled keep their values; empty ones take the
/// new type's defaults. Plugins outside the new type's schema are dropped.
pub fn on_type_change(
    schemas: &SchemaCatalog,
    catalog: &ModelCatalog,
    new_type: ChannelType,
    current: &ChannelRecord,
) -> TypeChange {
    let resolved = schemas.resolve(new_type);

    let mut fields = BTreeMap::new();
    let mut models = None;
    for (field, spec) in &resolved.fields {
        if *field == Field::Type || !current.field_value(*field).is_empty() {
            continue;
        }
        if spec.default.is_empty() {
            continue;
        }
        match (field, &spec.default) {
            (Field::Models, FieldValue::List(ids)) => models = Some(catalog.dedupe(ids)),
            _ => {
                fields.insert(*field, spec.default.clone());
            }
        }
    }

    TypeChange {
        channel_type: new_type,
        fields,
        models,
        plugin: carry_plugins(&resolved.plugins, &current.plugin),
    }
}

fn carry_plugins(schema: &PluginSchema, previous: &PluginValues) -> PluginValues {
    let dropped: Vec<&String> = previous
        .keys()
        .filter(|name| !schema.contains_key(*name))
        .collect();
    if !dropped.is_empty() {
        tracing::debug!(?dropped, "dropping plugins not offered by the new channel type");
    }

    schema
        .iter()
        .map(|(name, plugin)| {
            let old = previous.get(name);
            let params = plugin
                .params
                .iter()
                .map(|(param, spec)| {
                    let value = old
                        .and_then(|values| values.get(param))
                        .filter(|value| spec.accepts(value) && !value.is_zero())
                        .cloned()
                        .unwrap_or_else(|| spec.zero_value());
                    (param.clone(), value)
                })
                .collect();
            (name.clone(), params)
        })
        .collect()
}

/// Catalog entries in the model group of `ty`.
pub fn supported_models(
    schemas: &SchemaCatalog,
    catalog: &ModelCatalog,
    ty: ChannelType,
) -> Vec<ModelEntry> {
    catalog.filter_by_group(&schemas.resolve(ty).model_group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_catalog::RawModel;
    use crate::schema::ParamValue;

    fn schemas() -> SchemaCatalog {
        SchemaCatalog::builtin().expect("schema")
    }

    fn catalog() -> ModelCatalog {
        ModelCatalog::new(vec![
            RawModel {
                id: "gpt-4o".to_string(),
                owned_by: "OpenAI".to_string(),
            },
            RawModel {
                id: "claude-3-haiku-20240307".to_string(),
                owned_by: "Anthropic".to_string(),
            },
        ])
    }

    fn fresh(ty: ChannelType) -> ChannelRecord {
        let schemas = schemas();
        ChannelRecord::from_defaults(&schemas.resolve(ty), &catalog())
    }

    #[test]
    fn empty_fields_take_new_defaults() {
        let mut record = fresh(ChannelType::AZURE);
        assert!(record.models.is_empty());
        let change = on_type_change(&schemas(), &catalog(), ChannelType::ANTHROPIC, &record);
        change.apply_to(&mut record);

        assert_eq!(record.channel_type, ChannelType::ANTHROPIC);
        let ids: Vec<&str> = record.models.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids[0], "claude-3-haiku-20240307");
        assert_eq!(record.models[0].group, "Anthropic");
        assert!(record.models[1].is_freehand());
    }

    #[test]
    fn operator_values_survive_type_switch() {
        let mut record = fresh(ChannelType::OPENAI);
        record.name = "primary".to_string();
        record.test_model = "gpt-4o".to_string();
        let models_before = record.models.clone();

        let change = on_type_change(&schemas(), &catalog(), ChannelType::ANTHROPIC, &record);
        assert!(change.models.is_none());
        assert!(!change.fields.contains_key(&Field::TestModel));
        change.apply_to(&mut record);

        assert_eq!(record.name, "primary");
        assert_eq!(record.test_model, "gpt-4o");
        assert_eq!(record.models, models_before);
    }

    #[test]
    fn plugin_dropped_when_new_type_lacks_it() {
        let mut record = fresh(ChannelType::OPENAI);
        record
            .plugin
            .get_mut("online")
            .expect("online plugin")
            .insert("enable".to_string(), ParamValue::Bool(true));

        let change = on_type_change(&schemas(), &catalog(), ChannelType::ANTHROPIC, &record);
        assert!(change.plugin.is_empty());
    }

    #[test]
    fn plugin_values_carry_over_when_shared() {
        let mut record = fresh(ChannelType::OPENAI);
        let online = record.plugin.get_mut("online").expect("online plugin");
        online.insert("enable".to_string(), ParamValue::Bool(true));
        online.insert("engine".to_string(), ParamValue::Text("bing".to_string()));

        let change = on_type_change(&schemas(), &catalog(), ChannelType::CUSTOM, &record);
        assert_eq!(change.plugin["online"]["enable"], ParamValue::Bool(true));
        assert_eq!(
            change.plugin["online"]["engine"],
            ParamValue::Text("bing".to_string())
        );
        assert_eq!(
            change.plugin["online"]["api_key"],
            ParamValue::Text(String::new())
        );
    }

    #[test]
    fn mismatched_param_kind_resets_to_zero() {
        let mut record = fresh(ChannelType::OPENAI);
        record
            .plugin
            .get_mut("online")
            .expect("online plugin")
            .insert("enable".to_string(), ParamValue::Text("yes".to_string()));

        let change = on_type_change(&schemas(), &catalog(), ChannelType::CUSTOM, &record);
        assert_eq!(change.plugin["online"]["enable"], ParamValue::Bool(false));
    }

    #[test]
    fn switching_to_same_type_is_noop_for_filled_record() {
        let mut record = fresh(ChannelType::OPENAI);
        record.name = "n".to_string();
        record.key = "sk".to_string();
        record.base_url = "https://api.example.com".to_string();
        record.tag = "t".to_string();
        record.model_mapping = "{}".to_string();
        record.proxy = "http://127.0.0.1:1080".to_string();
        let change = on_type_change(&schemas(), &catalog(), ChannelType::OPENAI, &record);
        assert!(change.is_noop_for(&record));
    }

    #[test]
    fn supported_models_follow_model_group() {
        let out = supported_models(&schemas(), &catalog(), ChannelType::ANTHROPIC);
        assert_eq!(out, vec![ModelEntry::new("claude-3-haiku-20240307", "Anthropic")]);
        let azure = supported_models(&schemas(), &catalog(), ChannelType::AZURE);
        assert_eq!(azure, vec![ModelEntry::new("gpt-4o", "OpenAI")]);
    }
}
