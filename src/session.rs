use crate::channel_type::ChannelType;
use crate::codec::{decode, encode, expand_batch};
use crate::error::{ConfigError, ValidationErrors};
use crate::model_catalog::{ModelCatalog, ModelCatalogStore};
use crate::record::{ChannelRecord, WireRecord};
use crate::resolver::{TypeChange, on_type_change, supported_models};
use crate::schema::{Field, ResolvedSchema, SchemaCatalog};
use crate::validator::validate;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("{0}")]
    Invalid(ValidationErrors),
    #[error("{0}")]
    Encode(ConfigError),
}

/// Type change that has been requested but not yet applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTypeChange {
    session: Uuid,
    generation: u64,
    pub channel_type: ChannelType,
}

/// One in-flight create or edit of a channel.
pub struct EditSession {
    id: Uuid,
    schemas: Arc<SchemaCatalog>,
    catalog: ModelCatalogStore,
    record: ChannelRecord,
    tag_mode: bool,
    generation: u64,
}

impl EditSession {
    /// New channel populated from the OpenAI defaults.
    pub async fn create(schemas: Arc<SchemaCatalog>, catalog: ModelCatalogStore) -> Self {
        let snapshot = catalog.snapshot().await;
        let record = ChannelRecord::from_defaults(&schemas.resolve(ChannelType::OPENAI), &snapshot);
        Self::with_record(schemas, catalog, record)
    }

    pub async fn load(
        schemas: Arc<SchemaCatalog>,
        catalog: ModelCatalogStore,
        wire: &WireRecord,
    ) -> Self {
        let snapshot = catalog.snapshot().await;
        let mut record = decode(wire, &snapshot);
        record.is_edit = true;
        Self::with_record(schemas, catalog, record)
    }

    fn with_record(
        schemas: Arc<SchemaCatalog>,
        catalog: ModelCatalogStore,
        record: ChannelRecord,
    ) -> Self {
        let id = Uuid::new_v4();
        tracing::debug!(session = %id, channel_type = record.channel_type.0, "edit session opened");
        Self {
            id,
            schemas,
            catalog,
            record,
            tag_mode: false,
            generation: 0,
        }
    }

    /// Edits every channel sharing the record's tag; identity inputs are hidden.
    pub fn into_tag_mode(mut self) -> Self {
        self.tag_mode = true;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn record(&self) -> &ChannelRecord {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut ChannelRecord {
        &mut self.record
    }

    pub fn schema(&self) -> ResolvedSchema {
        self.schemas.resolve(self.record.channel_type)
    }

    pub fn visible_fields(&self) -> Vec<Field> {
        self.schema().visible_fields(self.tag_mode)
    }

    /// Switches type and applies the resulting patch immediately.
    pub async fn change_type(&mut self, channel_type: ChannelType) -> TypeChange {
        let pending = self.begin_type_change(channel_type);
        let change = self.resolve_type_change(&pending).await;
        self.commit_type_change(pending, change.clone());
        change
    }

    /// Marks `channel_type` as the latest requested type. Any change begun
    /// earlier will be refused at commit.
    pub fn begin_type_change(&mut self, channel_type: ChannelType) -> PendingTypeChange {
        self.generation += 1;
        PendingTypeChange {
            session: self.id,
            generation: self.generation,
            channel_type,
        }
    }

    /// Computes the patch against the newest catalog snapshot available now.
    pub async fn resolve_type_change(&self, pending: &PendingTypeChange) -> TypeChange {
        let snapshot = self.catalog.snapshot().await;
        on_type_change(&self.schemas, &snapshot, pending.channel_type, &self.record)
    }

    /// Applies `change` if `pending` is still the latest request of this
    /// session. Returns whether it was applied.
    pub fn commit_type_change(&mut self, pending: PendingTypeChange, change: TypeChange) -> bool {
        if pending.session != self.id || pending.generation != self.generation {
            tracing::debug!(
                session = %self.id,
                generation = pending.generation,
                latest = self.generation,
                "discarding superseded type change"
            );
            return false;
        }
        change.apply_to(&mut self.record);
        true
    }

    /// Replaces the models with the catalog entries of the current type's group.
    pub async fn fill_supported_models(&mut self) {
        let snapshot = self.catalog.snapshot().await;
        self.record.models = supported_models(&self.schemas, &snapshot, self.record.channel_type);
    }

    pub async fn fill_all_models(&mut self) {
        self.record.models = self.catalog.snapshot().await.list().to_vec();
    }

    /// Replaces the models with ids listed by the provider itself.
    pub fn apply_provider_models<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.record.models = ModelCatalog::provider_models(ids);
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate(&self.record, self.record.is_edit)
    }

    /// Validates and encodes. Batch submissions yield one record per key.
    pub fn submit(&self, batch: bool) -> Result<Vec<WireRecord>, SubmitError> {
        self.validate().map_err(SubmitError::Invalid)?;
        let wire = encode(&self.record, batch).map_err(SubmitError::Encode)?;
        if batch {
            Ok(expand_batch(&wire))
        } else {
            Ok(vec![wire])
        }
    }
}
