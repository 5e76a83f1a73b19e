//! The remote-store capability consumed by `RecordManager`.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{Record, RecordFields, RecordId};

/// A failed call to the remote store. The message, when present, is meant
/// for display as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("service failure{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct ServiceFailure {
    pub message: Option<String>,
}

impl ServiceFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn silent() -> Self {
        Self::default()
    }
}

/// List/create/update/delete against the remote store.
///
/// Implementations handle transport and authentication. Only
/// `RecordManager` calls these methods.
#[async_trait]
pub trait RecordService: Send + Sync {
    async fn list(&self) -> Result<Vec<Record>, ServiceFailure>;

    async fn create(&self, fields: &RecordFields) -> Result<Record, ServiceFailure>;

    async fn update(&self, id: &RecordId, fields: &RecordFields) -> Result<Record, ServiceFailure>;

    async fn delete(&self, id: &RecordId) -> Result<(), ServiceFailure>;
}
