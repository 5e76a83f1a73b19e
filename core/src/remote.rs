//! `RecordService` over HTTP: `RecordsClient` plus a host `Transport`.

use async_trait::async_trait;

use crate::client::RecordsClient;
use crate::error::ApiError;
use crate::http::Transport;
use crate::service::{RecordService, ServiceFailure};
use crate::types::{Record, RecordFields, RecordId};

pub struct HttpRecordService<T> {
    client: RecordsClient,
    transport: T,
}

impl<T: Transport> HttpRecordService<T> {
    pub fn new(client: RecordsClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &RecordsClient {
        &self.client
    }
}

#[async_trait]
impl<T: Transport> RecordService for HttpRecordService<T> {
    async fn list(&self) -> Result<Vec<Record>, ServiceFailure> {
        let response = self.transport.execute(self.client.build_list_records()).await?;
        Ok(self.client.parse_list_records(response)?)
    }

    async fn create(&self, fields: &RecordFields) -> Result<Record, ServiceFailure> {
        let request = self.client.build_create_record(fields)?;
        let response = self.transport.execute(request).await?;
        Ok(self.client.parse_create_record(response)?)
    }

    async fn update(&self, id: &RecordId, fields: &RecordFields) -> Result<Record, ServiceFailure> {
        let request = self.client.build_update_record(id, fields)?;
        let response = self.transport.execute(request).await?;
        Ok(self.client.parse_update_record(response)?)
    }

    /// A 404 means the record is already gone, which is what the caller
    /// asked for.
    async fn delete(&self, id: &RecordId) -> Result<(), ServiceFailure> {
        let response = self.transport.execute(self.client.build_delete_record(id)).await?;
        match self.client.parse_delete_record(response) {
            Ok(()) => Ok(()),
            Err(ApiError::NotFound { .. }) => {
                log::debug!("record {id} was already deleted");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}
