use crate::schema::Field;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    SchemaNotFound,
    MalformedMapping,
    RequiredFieldMissing,
    CatalogUnavailable,
    InvalidSchema,
    InvalidRecord,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SchemaNotFound => "schema_not_found",
            Self::MalformedMapping => "malformed_mapping",
            Self::RequiredFieldMissing => "required_field_missing",
            Self::CatalogUnavailable => "catalog_unavailable",
            Self::InvalidSchema => "invalid_schema",
            Self::InvalidRecord => "invalid_record",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ConfigError {
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
    pub field: Option<Field>,
}

impl ConfigError {
    pub fn new(kind: ErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.field = Some(field);
        self
    }

    pub fn required(field: Field) -> Self {
        Self::new(
            ErrorKind::RequiredFieldMissing,
            "required",
            format!("{} is required", field.as_str()),
        )
        .with_field(field)
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: ErrorBody {
                message: self.message.clone(),
                error_type: self.kind.as_str().to_string(),
                field: self.field.map(|f| f.as_str().to_string()),
                code: self.code.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(rename = "type")]
    error_type: String,
    field: Option<String>,
    code: String,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Field-keyed validation failures, one entry per offending field.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("validation failed for {} field(s)", .0.len())]
pub struct ValidationErrors(BTreeMap<Field, ConfigError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `err` against `field` unless that field already failed.
    pub fn insert(&mut self, field: Field, err: ConfigError) {
        self.0.entry(field).or_insert(err.with_field(field));
    }

    pub fn get(&self, field: Field) -> Option<&ConfigError> {
        self.0.get(&field)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, err) in &self.0 {
            map.serialize_entry(field.as_str(), &err.message)?;
        }
        map.end()
    }
}
