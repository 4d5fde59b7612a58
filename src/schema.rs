use crate::channel_type::ChannelType;
use crate::error::{ConfigError, ConfigResult, ErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Editable inputs of a channel form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Type,
    Tag,
    Name,
    BaseUrl,
    Other,
    Models,
    Key,
    ModelMapping,
    Proxy,
    TestModel,
    OnlyChat,
    Groups,
}

impl Field {
    pub const ALL: &'static [Field] = &[
        Field::Type,
        Field::Tag,
        Field::Name,
        Field::BaseUrl,
        Field::Other,
        Field::Models,
        Field::Key,
        Field::ModelMapping,
        Field::Proxy,
        Field::TestModel,
        Field::OnlyChat,
        Field::Groups,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Tag => "tag",
            Self::Name => "name",
            Self::BaseUrl => "base_url",
            Self::Other => "other",
            Self::Models => "models",
            Self::Key => "key",
            Self::ModelMapping => "model_mapping",
            Self::Proxy => "proxy",
            Self::TestModel => "test_model",
            Self::OnlyChat => "only_chat",
            Self::Groups => "groups",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Type => FieldKind::Number,
            Self::OnlyChat => FieldKind::Flag,
            Self::Models | Self::Groups => FieldKind::List,
            _ => FieldKind::Text,
        }
    }

    /// Inputs hidden when editing every channel that shares a tag at once.
    pub fn hidden_in_tag_mode(&self) -> bool {
        matches!(self, Self::Type | Self::Name | Self::BaseUrl | Self::Key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Flag,
    Number,
    Text,
    List,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Number(i64),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Flag(_) => FieldKind::Flag,
            Self::Number(_) => FieldKind::Number,
            Self::Text(_) => FieldKind::Text,
            Self::List(_) => FieldKind::List,
        }
    }

    /// Empty string or empty list. Flags and numbers always count as set.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Flag(_) | Self::Number(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ParamSpec {
    #[serde(rename = "bool")]
    Boolean { name: String, description: String },
    #[serde(rename = "string")]
    Text { name: String, description: String },
}

impl ParamSpec {
    pub fn zero_value(&self) -> ParamValue {
        match self {
            Self::Boolean { .. } => ParamValue::Bool(false),
            Self::Text { .. } => ParamValue::Text(String::new()),
        }
    }

    pub fn accepts(&self, value: &ParamValue) -> bool {
        matches!(
            (self, value),
            (Self::Boolean { .. }, ParamValue::Bool(_)) | (Self::Text { .. }, ParamValue::Text(_))
        )
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Boolean { name, .. } | Self::Text { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Text(String),
}

impl ParamValue {
    /// `false` and the empty string are the unset values of their kinds.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Bool(b) => !b,
            Self::Text(s) => s.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub params: BTreeMap<String, ParamSpec>,
}

pub type PluginSchema = BTreeMap<String, PluginSpec>;

/// One entry of the type-keyed table. On the generic entry every map is
/// complete; on a type entry each key overrides its generic counterpart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeSchema {
    #[serde(default)]
    pub input: BTreeMap<Field, FieldValue>,
    #[serde(default)]
    pub label: BTreeMap<Field, String>,
    #[serde(default)]
    pub prompt: BTreeMap<Field, String>,
    #[serde(default)]
    pub model_group: Option<String>,
    #[serde(default)]
    pub provider_models_list: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaTable {
    pub generic: TypeSchema,
    #[serde(default)]
    pub types: BTreeMap<ChannelType, TypeSchema>,
    #[serde(default)]
    pub plugins: BTreeMap<ChannelType, PluginSchema>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub label: String,
    pub prompt: String,
    pub default: FieldValue,
}

impl FieldSpec {
    pub fn is_visible(&self) -> bool {
        !self.prompt.is_empty()
    }
}

/// Effective field and plugin set for one channel type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSchema {
    pub channel_type: ChannelType,
    pub fallback: bool,
    pub fields: BTreeMap<Field, FieldSpec>,
    pub model_group: String,
    pub provider_models_list: Option<String>,
    pub plugins: PluginSchema,
}

impl ResolvedSchema {
    pub fn field(&self, field: Field) -> Option<&FieldSpec> {
        self.fields.get(&field)
    }

    pub fn default_value(&self, field: Field) -> Option<&FieldValue> {
        self.fields.get(&field).map(|spec| &spec.default)
    }

    pub fn is_visible(&self, field: Field, tag_mode: bool) -> bool {
        if tag_mode && field.hidden_in_tag_mode() {
            return false;
        }
        self.fields.get(&field).is_some_and(FieldSpec::is_visible)
    }

    pub fn visible_fields(&self, tag_mode: bool) -> Vec<Field> {
        self.fields
            .keys()
            .copied()
            .filter(|field| self.is_visible(*field, tag_mode))
            .collect()
    }
}

/// Lookup-with-fallback over the channel-type schema table.
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    generic: TypeSchema,
    generic_model_group: String,
    types: HashMap<ChannelType, TypeSchema>,
    plugins: HashMap<ChannelType, PluginSchema>,
}

impl SchemaCatalog {
    pub fn new(table: SchemaTable) -> ConfigResult<Self> {
        let SchemaTable {
            generic,
            types,
            plugins,
        } = table;

        for field in Field::ALL {
            let Some(value) = generic.input.get(field) else {
                return Err(invalid(format!(
                    "generic schema has no default for {}",
                    field.as_str()
                )));
            };
            check_kind(*field, value, None)?;
            if !generic.label.contains_key(field) {
                return Err(invalid(format!(
                    "generic schema has no label for {}",
                    field.as_str()
                )));
            }
            if !generic.prompt.contains_key(field) {
                return Err(invalid(format!(
                    "generic schema has no prompt for {}",
                    field.as_str()
                )));
            }
        }
        let generic_model_group = generic
            .model_group
            .clone()
            .ok_or_else(|| invalid("generic schema has no model group".to_string()))?;

        for (ty, schema) in &types {
            for (field, value) in &schema.input {
                check_kind(*field, value, Some(*ty))?;
            }
        }

        Ok(Self {
            generic,
            generic_model_group,
            types: types.into_iter().collect(),
            plugins: plugins.into_iter().collect(),
        })
    }

    pub fn from_json(raw: &str) -> ConfigResult<Self> {
        let table: SchemaTable = serde_json::from_str(raw)
            .map_err(|err| invalid(format!("schema table parse failed: {err}")))?;
        Self::new(table)
    }

    pub fn builtin() -> ConfigResult<Self> {
        let table: SchemaTable = serde_json::from_value(crate::presets::channel_schema_table())
            .map_err(|err| invalid(format!("builtin schema table is malformed: {err}")))?;
        Self::new(table)
    }

    pub fn type_schema(&self, ty: ChannelType) -> ConfigResult<&TypeSchema> {
        self.types.get(&ty).ok_or_else(|| {
            ConfigError::new(
                ErrorKind::SchemaNotFound,
                "schema_not_found",
                format!("no schema registered for {ty}"),
            )
        })
    }

    pub fn plugin_schema(&self, ty: ChannelType) -> Option<&PluginSchema> {
        self.plugins.get(&ty)
    }

    pub fn generic_model_group(&self) -> &str {
        &self.generic_model_group
    }

    pub fn known_types(&self) -> Vec<ChannelType> {
        let mut out: Vec<ChannelType> = self.types.keys().copied().collect();
        out.sort();
        out
    }

    /// Never fails; unknown types get the generic defaults.
    pub fn resolve(&self, ty: ChannelType) -> ResolvedSchema {
        let empty = TypeSchema::default();
        let (overrides, fallback) = match self.type_schema(ty) {
            Ok(schema) => (schema, false),
            Err(err) => {
                tracing::debug!(channel_type = ty.0, "{}, using generic schema", err.message);
                (&empty, true)
            }
        };

        let mut fields = BTreeMap::new();
        for field in Field::ALL {
            let pick = |own: &BTreeMap<Field, String>, base: &BTreeMap<Field, String>| {
                own.get(field)
                    .or_else(|| base.get(field))
                    .cloned()
                    .unwrap_or_default()
            };
            let default = overrides
                .input
                .get(field)
                .or_else(|| self.generic.input.get(field))
                .cloned()
                .unwrap_or_else(|| zero_value(field.kind()));
            fields.insert(
                *field,
                FieldSpec {
                    label: pick(&overrides.label, &self.generic.label),
                    prompt: pick(&overrides.prompt, &self.generic.prompt),
                    default,
                },
            );
        }

        ResolvedSchema {
            channel_type: ty,
            fallback,
            fields,
            model_group: overrides
                .model_group
                .clone()
                .unwrap_or_else(|| self.generic_model_group.clone()),
            provider_models_list: overrides
                .provider_models_list
                .clone()
                .or_else(|| self.generic.provider_models_list.clone()),
            plugins: self.plugins.get(&ty).cloned().unwrap_or_default(),
        }
    }
}

fn zero_value(kind: FieldKind) -> FieldValue {
    match kind {
        FieldKind::Flag => FieldValue::Flag(false),
        FieldKind::Number => FieldValue::Number(0),
        FieldKind::Text => FieldValue::Text(String::new()),
        FieldKind::List => FieldValue::List(Vec::new()),
    }
}

fn check_kind(field: Field, value: &FieldValue, ty: Option<ChannelType>) -> ConfigResult<()> {
    if value.kind() == field.kind() {
        return Ok(());
    }
    let owner = ty.map_or_else(|| "generic schema".to_string(), |ty| ty.to_string());
    Err(invalid(format!(
        "{owner}: default for {} has the wrong kind",
        field.as_str()
    ))
    .with_field(field))
}

fn invalid(message: String) -> ConfigError {
    ConfigError::new(ErrorKind::InvalidSchema, "invalid_schema", message)
}
