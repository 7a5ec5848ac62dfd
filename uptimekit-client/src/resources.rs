//! Resource modules built on [`Crud`] and the raw executor.
//!
//! These cover endpoints that do not fit the CRUD shape: monitor pause/start
//! actions and multipart asset uploads for status pages.

use std::sync::Arc;

use tracing::instrument;
use uptimekit_core::{Monitor, Record, ResourceKind};

use crate::config::ClientConfig;
use crate::crud::Crud;
use crate::error::ClientError;
use crate::executor::RequestExecutor;
use crate::request::{EndpointCall, MultipartForm};

// ============================================================================
// API Client
// ============================================================================

/// Entry point bundling one executor with every resource module.
#[derive(Debug, Clone)]
pub struct ApiClient {
    executor: Arc<RequestExecutor>,
}

impl ApiClient {
    /// Creates a client from a config.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::with_executor(Arc::new(RequestExecutor::new(config)?)))
    }

    /// Wraps an existing executor.
    pub fn with_executor(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Returns the shared executor.
    pub fn executor(&self) -> &Arc<RequestExecutor> {
        &self.executor
    }

    /// Monitors.
    pub fn monitors(&self) -> Monitors {
        Monitors::new(Arc::clone(&self.executor))
    }

    /// Public status pages.
    pub fn status_pages(&self) -> StatusPages {
        StatusPages::new(Arc::clone(&self.executor))
    }

    /// Schema-free CRUD over any collection.
    pub fn records(&self, kind: ResourceKind) -> Crud<Record> {
        Crud::for_kind(Arc::clone(&self.executor), kind)
    }
}

// ============================================================================
// Monitors
// ============================================================================

/// Monitor collection with pause/start actions.
#[derive(Debug, Clone)]
pub struct Monitors {
    crud: Crud<Monitor>,
}

impl Monitors {
    /// Creates the module.
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self {
            crud: Crud::for_kind(executor, ResourceKind::Monitor),
        }
    }

    /// Generic CRUD operations.
    pub fn crud(&self) -> &Crud<Monitor> {
        &self.crud
    }

    /// Fetches one monitor, using the list endpoint if the single fetch 5xxs.
    pub async fn get(&self, id: &str) -> Result<Monitor, ClientError> {
        self.crud.get_with_fallback(id).await
    }

    /// Lists all monitors.
    pub async fn list(&self) -> Result<Vec<Monitor>, ClientError> {
        self.crud.list().await
    }

    /// Stops checking a monitor.
    #[instrument(skip(self))]
    pub async fn pause(&self, id: &str) -> Result<Monitor, ClientError> {
        self.action(id, "pause").await
    }

    /// Resumes checking a monitor.
    #[instrument(skip(self))]
    pub async fn start(&self, id: &str) -> Result<Monitor, ClientError> {
        self.action(id, "start").await
    }

    async fn action(&self, id: &str, action: &str) -> Result<Monitor, ClientError> {
        let call = EndpointCall::post(format!("{}/{action}", self.crud.item_path(id)));
        self.crud.executor().send_json(&call).await
    }
}

// ============================================================================
// Status Pages
// ============================================================================

/// Status page collection with asset uploads.
#[derive(Debug, Clone)]
pub struct StatusPages {
    crud: Crud<Record>,
}

impl StatusPages {
    /// Creates the module.
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self {
            crud: Crud::for_kind(executor, ResourceKind::StatusPage),
        }
    }

    /// Generic CRUD operations.
    pub fn crud(&self) -> &Crud<Record> {
        &self.crud
    }

    /// Creates a status page from a multipart form (fields plus logo/icon).
    #[instrument(skip(self, form), fields(parts = form.len()))]
    pub async fn create_with_assets(&self, form: MultipartForm) -> Result<Record, ClientError> {
        let call = EndpointCall::post(self.crud.prefix().to_string()).multipart(form);
        self.crud.executor().send_json(&call).await
    }

    /// Updates a status page from a multipart form.
    ///
    /// Use [`MultipartForm::clear_file`] to remove an existing logo or icon.
    #[instrument(skip(self, form), fields(parts = form.len()))]
    pub async fn update_with_assets(&self, id: &str, form: MultipartForm) -> Result<Record, ClientError> {
        let call = EndpointCall::patch(self.crud.item_path(id)).multipart(form);
        self.crud.executor().send_json(&call).await
    }
}
