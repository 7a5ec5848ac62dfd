//! Endpoint call descriptors and request payloads.
//!
//! A call's body is materialized once, before the first attempt. Every retry
//! and every redirect hop builds a fresh request from the same bytes.

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;

use crate::error::ClientError;

// ============================================================================
// Endpoint Call
// ============================================================================

/// One logical API call: method, path relative to the base URL, and payload.
#[derive(Debug, Clone)]
pub struct EndpointCall {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the base URL, e.g. `/monitors/42`.
    pub path: String,
    /// Request body.
    pub payload: Payload,
}

impl EndpointCall {
    /// Creates a call with no body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            payload: Payload::Empty,
        }
    }

    /// GET `path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST `path`.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// PATCH `path`.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// DELETE `path`.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attaches a JSON body, serializing it now.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ClientError> {
        let bytes = serde_json::to_vec(body).map_err(ClientError::Encode)?;
        self.payload = Payload::Json(Bytes::from(bytes));
        Ok(self)
    }

    /// Attaches a multipart form.
    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.payload = Payload::Multipart(form);
        self
    }

    /// Returns true if the method is safe to repeat.
    pub fn is_idempotent(&self) -> bool {
        is_idempotent(&self.method)
    }
}

/// GET, DELETE, HEAD and OPTIONS may be retried; POST, PATCH and PUT may not.
pub fn is_idempotent(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::DELETE | Method::HEAD | Method::OPTIONS
    )
}

// ============================================================================
// Payload
// ============================================================================

/// Request body, kept in a form that can be replayed.
#[derive(Debug, Clone, Default)]
pub enum Payload {
    /// No body.
    #[default]
    Empty,
    /// Serialized JSON.
    Json(Bytes),
    /// Multipart form, re-materialized per attempt.
    Multipart(MultipartForm),
}

impl Payload {
    /// Returns the JSON bytes, if any.
    pub fn json_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Json(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Attaches this payload to a request builder.
    pub(crate) fn apply(&self, builder: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        match self {
            Self::Empty => Ok(builder),
            Self::Json(bytes) => Ok(builder
                .header(CONTENT_TYPE, "application/json")
                .body(bytes.clone())),
            Self::Multipart(form) => Ok(builder.multipart(form.to_form()?)),
        }
    }
}

// ============================================================================
// Multipart Form
// ============================================================================

#[derive(Debug, Clone)]
enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        content_type: String,
        data: Bytes,
    },
}

/// Owned multipart form.
///
/// `reqwest::multipart::Form` is consumed on send, so the parts are kept here
/// and turned into a new form for each attempt.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Adds a file part.
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        });
        self
    }

    /// Clears a file-bearing field on the server.
    ///
    /// The API reads an empty string in place of a file as "remove this asset".
    pub fn clear_file(self, name: impl Into<String>) -> Self {
        self.text(name, "")
    }

    /// Returns the number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns true if the form has no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    fn to_form(&self) -> Result<Form, ClientError> {
        let mut form = Form::new();
        for part in &self.parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
                FormPart::File {
                    name,
                    file_name,
                    content_type,
                    data,
                } => {
                    let part = Part::stream(data.clone())
                        .file_name(file_name.clone())
                        .mime_str(content_type)
                        .map_err(|e| {
                            ClientError::InvalidRequest(format!(
                                "content type {content_type:?} for part {name:?}: {e}"
                            ))
                        })?;
                    form.part(name.clone(), part)
                }
            };
        }
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idempotency_classification() {
        for method in [Method::GET, Method::DELETE, Method::HEAD, Method::OPTIONS] {
            assert!(is_idempotent(&method), "{method}");
        }
        for method in [Method::POST, Method::PATCH, Method::PUT] {
            assert!(!is_idempotent(&method), "{method}");
        }
    }

    #[test]
    fn test_json_body_serialized_once() {
        let call = EndpointCall::post("/monitors")
            .json(&serde_json::json!({"friendlyName": "api"}))
            .unwrap();

        let first = call.payload.json_bytes().unwrap().clone();
        let again = call.clone();
        assert_eq!(again.payload.json_bytes().unwrap(), &first);
        assert_eq!(&first[..], br#"{"friendlyName":"api"}"#);
    }

    #[test]
    fn test_multipart_clear_sentinel() {
        let form = MultipartForm::new()
            .text("friendlyName", "Status")
            .file("logo", "logo.png", "image/png", vec![1_u8, 2, 3])
            .clear_file("icon");

        assert_eq!(form.len(), 3);
        assert!(form.to_form().is_ok());
    }

    #[test]
    fn test_multipart_rejects_bad_mime() {
        let form = MultipartForm::new().file("logo", "logo.png", "not a mime", vec![0_u8]);
        assert!(form.to_form().is_err());
    }
}
