//! Generic create/read/update/delete over one resource collection.
//!
//! [`Crud`] is parameterized by the decoded resource type, so a schema
//! mismatch shows up as a typed [`ClientError::Decode`] at the call site.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};
use uptimekit_core::{ListPage, ResourceKind};

use crate::error::ClientError;
use crate::executor::{RequestExecutor, decode};
use crate::poll::{DeletionPoller, PollPolicy};
use crate::request::EndpointCall;

/// CRUD operations on the collection under `prefix`.
pub struct Crud<T> {
    executor: Arc<RequestExecutor>,
    prefix: String,
    poll: PollPolicy,
    _resource: PhantomData<fn() -> T>,
}

impl<T> Clone for Crud<T> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
            prefix: self.prefix.clone(),
            poll: self.poll,
            _resource: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Crud<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crud")
            .field("prefix", &self.prefix)
            .field("poll", &self.poll)
            .finish_non_exhaustive()
    }
}

impl<T: DeserializeOwned> Crud<T> {
    /// Creates a CRUD base for the collection at `prefix` (e.g. `/monitors`).
    pub fn new(executor: Arc<RequestExecutor>, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let prefix = format!("/{}", prefix.trim_matches('/'));
        Self {
            executor,
            prefix,
            poll: PollPolicy::default(),
            _resource: PhantomData,
        }
    }

    /// Creates a CRUD base for a known resource kind.
    pub fn for_kind(executor: Arc<RequestExecutor>, kind: ResourceKind) -> Self {
        Self::new(executor, kind.path_prefix())
    }

    /// Overrides the deletion polling schedule.
    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    /// Returns the collection prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the underlying executor, for endpoints CRUD does not cover.
    pub fn executor(&self) -> &Arc<RequestExecutor> {
        &self.executor
    }

    /// Returns `{prefix}/{id}`.
    pub fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.prefix, id.trim_matches('/'))
    }

    /// POST to the collection.
    #[instrument(skip(self, body), fields(prefix = %self.prefix))]
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<T, ClientError> {
        let call = EndpointCall::post(self.prefix.clone()).json(body)?;
        self.executor.send_json(&call).await
    }

    /// GET one resource.
    #[instrument(skip(self), fields(prefix = %self.prefix))]
    pub async fn get(&self, id: &str) -> Result<T, ClientError> {
        let call = EndpointCall::get(self.item_path(id));
        self.executor.send_json(&call).await
    }

    /// PATCH one resource.
    #[instrument(skip(self, body), fields(prefix = %self.prefix))]
    pub async fn update<B: Serialize + ?Sized>(&self, id: &str, body: &B) -> Result<T, ClientError> {
        let call = EndpointCall::patch(self.item_path(id)).json(body)?;
        self.executor.send_json(&call).await
    }

    /// DELETE one resource. Already deleted counts as deleted.
    #[instrument(skip(self), fields(prefix = %self.prefix))]
    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let call = EndpointCall::delete(self.item_path(id));
        match self.executor.send(&call).await {
            Ok(_) => Ok(()),
            Err(err) if err.is_not_found() => {
                debug!(id, "Resource already deleted");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// GET the whole collection.
    #[instrument(skip(self), fields(prefix = %self.prefix))]
    pub async fn list(&self) -> Result<Vec<T>, ClientError> {
        Ok(self.list_page().await?.into_items())
    }

    pub(crate) async fn list_page(&self) -> Result<ListPage<T>, ClientError> {
        let call = EndpointCall::get(self.prefix.clone());
        let body = self.executor.send(&call).await?;
        decode(&body, &format!("list {}", self.prefix))
    }

    /// Polls until the resource reports not-found, the timeout passes, or
    /// `cancel` fires.
    ///
    /// Errors other than not-found are treated as transient and polling
    /// continues until the deadline.
    pub async fn wait_deleted(
        &self,
        id: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        DeletionPoller::new(Arc::clone(&self.executor), self.item_path(id))
            .with_policy(self.poll)
            .wait(id, timeout, cancel)
            .await
            .map(|_| ())
    }

    /// Deletes and then waits for the deletion to become visible.
    pub async fn delete_and_wait(
        &self,
        id: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        self.delete(id).await?;
        self.wait_deleted(id, timeout, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use uptimekit_core::Record;

    fn crud(prefix: &str) -> Crud<Record> {
        let config = ClientConfig::builder().api_key("k").build().unwrap();
        Crud::new(Arc::new(RequestExecutor::new(config).unwrap()), prefix)
    }

    #[test]
    fn test_prefix_normalized() {
        assert_eq!(crud("monitors").prefix(), "/monitors");
        assert_eq!(crud("/monitors/").prefix(), "/monitors");
    }

    #[test]
    fn test_item_path() {
        let crud = crud("/psps");
        assert_eq!(crud.item_path("12"), "/psps/12");
        assert_eq!(crud.item_path("/12/"), "/psps/12");
    }
}
