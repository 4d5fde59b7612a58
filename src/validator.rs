use crate::channel_type::ChannelType;
use crate::codec::parse_mapping;
use crate::error::{ConfigError, ValidationErrors};
use crate::record::ChannelRecord;
use crate::schema::Field;

/// Types whose channels cannot work without an explicit endpoint.
pub const BASE_URL_REQUIRED: &[ChannelType] = &[ChannelType::AZURE, ChannelType::CUSTOM];

/// Checks that a raw record names its channel type. A structured
/// [`ChannelRecord`] cannot exist without one, so callers holding raw JSON run
/// this first to get a field-keyed `type` error instead of a parse failure.
pub fn require_type(raw: &serde_json::Value) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if raw.get("type").is_none_or(serde_json::Value::is_null) {
        errors.insert(Field::Type, ConfigError::required(Field::Type));
    }
    errors.into_result()
}

/// Checks `record` before submission. Every rule runs so the caller can show
/// all failing fields at once; each field reports its first failure. The
/// `type` rule is covered by [`require_type`] on raw input.
pub fn validate(record: &ChannelRecord, is_edit: bool) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if record.name.trim().is_empty() {
        errors.insert(Field::Name, ConfigError::required(Field::Name));
    }
    if !is_edit && record.key.trim().is_empty() {
        errors.insert(Field::Key, ConfigError::required(Field::Key));
    }
    if record.models.is_empty() {
        errors.insert(Field::Models, ConfigError::required(Field::Models));
    }
    if record.groups.iter().all(|group| group.trim().is_empty()) {
        errors.insert(Field::Groups, ConfigError::required(Field::Groups));
    }
    if BASE_URL_REQUIRED.contains(&record.channel_type) && record.base_url.trim().is_empty() {
        errors.insert(Field::BaseUrl, ConfigError::required(Field::BaseUrl));
    }
    if let Err(err) = parse_mapping(&record.model_mapping) {
        errors.insert(Field::ModelMapping, err);
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model_catalog::ModelEntry;
    use crate::record::PluginValues;

    fn valid() -> ChannelRecord {
        ChannelRecord {
            id: None,
            channel_type: ChannelType::OPENAI,
            name: "openai".to_string(),
            tag: String::new(),
            base_url: String::new(),
            key: "sk-1".to_string(),
            other: String::new(),
            proxy: String::new(),
            test_model: String::new(),
            only_chat: false,
            models: vec![ModelEntry::new("gpt-4", "OpenAI")],
            groups: vec!["default".to_string()],
            model_mapping: String::new(),
            plugin: PluginValues::new(),
            is_edit: false,
        }
    }

    #[test]
    fn valid_record_passes() {
        assert_eq!(validate(&valid(), false), Ok(()));
    }

    #[test]
    fn all_failing_fields_are_reported() {
        let mut r = valid();
        r.name = "   ".to_string();
        r.key.clear();
        r.models.clear();
        r.groups.clear();
        let errors = validate(&r, false).expect_err("invalid");
        let fields: Vec<Field> = errors.fields().collect();
        assert_eq!(fields, vec![Field::Name, Field::Models, Field::Key, Field::Groups]);
        assert!(
            fields
                .iter()
                .all(|f| errors.get(*f).map(|e| e.kind) == Some(ErrorKind::RequiredFieldMissing))
        );
    }

    #[test]
    fn missing_or_null_type_is_field_keyed() {
        for raw in [
            serde_json::json!({ "name": "n" }),
            serde_json::json!({ "type": null, "name": "n" }),
        ] {
            let errors = require_type(&raw).expect_err("no type");
            assert_eq!(
                errors.get(Field::Type).map(|e| e.kind),
                Some(ErrorKind::RequiredFieldMissing)
            );
        }
        assert!(require_type(&serde_json::json!({ "type": 3 })).is_ok());
    }

    #[test]
    fn key_optional_when_editing() {
        let mut r = valid();
        r.key.clear();
        assert!(validate(&r, true).is_ok());
        assert!(validate(&r, false).is_err());
    }

    #[test]
    fn base_url_required_for_azure_and_custom() {
        let mut r = valid();
        for ty in [ChannelType::AZURE, ChannelType::CUSTOM] {
            r.channel_type = ty;
            let errors = validate(&r, false).expect_err("base_url");
            assert!(errors.contains(Field::BaseUrl));
        }
        r.channel_type = ChannelType::GEMINI;
        assert!(validate(&r, false).is_ok());
    }

    #[test]
    fn mapping_must_be_object_or_empty() {
        let mut r = valid();
        r.model_mapping = "[1,2]".to_string();
        let errors = validate(&r, false).expect_err("array");
        assert_eq!(
            errors.get(Field::ModelMapping).map(|e| e.kind),
            Some(ErrorKind::MalformedMapping)
        );

        for bad in ["\"text\"", "42", "null", "{oops"] {
            r.model_mapping = bad.to_string();
            assert!(validate(&r, false).is_err(), "{bad} should be rejected");
        }

        r.model_mapping = String::new();
        assert!(validate(&r, false).is_ok());
        r.model_mapping = r#"{"gpt-4": "gpt-4-0613"}"#.to_string();
        assert!(validate(&r, false).is_ok());
    }
}
