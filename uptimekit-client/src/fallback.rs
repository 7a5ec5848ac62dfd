//! List-endpoint fallback for single-resource fetches.
//!
//! Some backend records are only served reliably by the bulk endpoint. When
//! a single GET fails server-side (5xx), the collection is listed and searched
//! client-side. The two failure modes stay distinct: the list failing too,
//! versus the list succeeding without the identifier.

use tracing::{debug, instrument, warn};
use uptimekit_core::Resource;

use crate::crud::Crud;
use crate::error::ClientError;

impl<T: Resource> Crud<T> {
    /// GET one resource, falling back to the list endpoint on a 5xx.
    #[instrument(skip(self), fields(prefix = %self.prefix()))]
    pub async fn get_with_fallback(&self, id: &str) -> Result<T, ClientError> {
        let primary = match self.get(id).await {
            Ok(resource) => return Ok(resource),
            Err(err) if err.is_server_error() => err,
            Err(err) => return Err(err),
        };

        warn!(error = %primary, "Single fetch failed server-side, trying list endpoint");

        match self.list_page().await {
            Ok(page) => match page.find(id) {
                Some(resource) => {
                    debug!("Found resource via list fallback");
                    Ok(resource)
                }
                None => Err(ClientError::FallbackNotFound {
                    id: id.to_string(),
                    primary: Box::new(primary),
                }),
            },
            Err(fallback) => Err(ClientError::FallbackFailed {
                id: id.to_string(),
                primary: Box::new(primary),
                fallback: Box::new(fallback),
            }),
        }
    }
}
