//! Stateless HTTP request builder and response parser for the
//! personalization API.
//!
//! # Design
//! `RequestBuilder` holds only the base URL and api key. Each operation is
//! split into a `build_*` method that produces an `HttpRequest` and a
//! `parse_*` function that consumes an `HttpResponse`. Whoever executes the
//! round-trip in between (the façade, a test, a C host) stays out of the
//! mapping logic, which keeps it deterministic.
//!
//! Status codes are mapped per `Operation`: the same code means different
//! things on different endpoints (400 is a bad id on interactions but a bad
//! payload on ingestion).

use crate::error::{BuildError, ErrorKind, XaynError, XaynResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    IngestedDocument, IngestionRequest, PersonalizedDocumentsResponse, UserInteraction,
    UserInteractionRequest, UserInteractionType,
};

pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const AUTHORIZATION_HEADER: &str = "authorizationToken";

/// The three logical operations of the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    PersonalizedDocuments,
    LikeDocument,
    AddDocuments,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::PersonalizedDocuments => "personalized_documents",
            Operation::LikeDocument => "like_document",
            Operation::AddDocuments => "add_documents",
        }
    }

    pub fn method(self) -> HttpMethod {
        match self {
            Operation::PersonalizedDocuments => HttpMethod::Get,
            Operation::LikeDocument => HttpMethod::Patch,
            Operation::AddDocuments => HttpMethod::Post,
        }
    }

    /// Error kind for a non-2xx `status` returned by this operation's endpoint.
    pub fn error_kind(self, status: u16) -> ErrorKind {
        match (self, status) {
            (Operation::PersonalizedDocuments, 404) => ErrorKind::UserNotFound,
            (Operation::PersonalizedDocuments, 422) => ErrorKind::UnableToCreateListForUser,
            (Operation::LikeDocument, 400) => ErrorKind::InvalidUserOrDocumentId,
            (Operation::AddDocuments, 400) => ErrorKind::InvalidRequest,
            (Operation::AddDocuments, 500) => ErrorKind::DocumentsNotSuccessfullyUploaded,
            _ => ErrorKind::UnknownError,
        }
    }
}

/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    api_key: String,
}

impl RequestBuilder {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(
        &self,
        operation: Operation,
        path: String,
        query: Vec<(String, String)>,
        body: Option<String>,
    ) -> HttpRequest {
        HttpRequest {
            method: operation.method(),
            path: format!("{}{path}", self.base_url),
            query,
            headers: vec![
                (CONTENT_TYPE_HEADER.to_string(), "application/json".to_string()),
                (AUTHORIZATION_HEADER.to_string(), self.api_key.clone()),
            ],
            body,
        }
    }

    pub fn build_personalized_documents(&self, user_id: &str, count: Option<u32>) -> HttpRequest {
        let query = count
            .map(|n| vec![("count".to_string(), n.to_string())])
            .unwrap_or_default();
        self.request(
            Operation::PersonalizedDocuments,
            format!("/users/{}/personalized_documents", urlencoding::encode(user_id)),
            query,
            None,
        )
    }

    pub fn build_like_document(
        &self,
        user_id: &str,
        document_id: &str,
    ) -> Result<HttpRequest, BuildError> {
        let payload = UserInteractionRequest {
            documents: vec![UserInteraction {
                id: document_id.to_string(),
                kind: UserInteractionType::Positive,
            }],
        };
        let body = serde_json::to_string(&payload)?;
        Ok(self.request(
            Operation::LikeDocument,
            format!("/users/{}/interactions", urlencoding::encode(user_id)),
            Vec::new(),
            Some(body),
        ))
    }

    pub fn build_add_documents(
        &self,
        documents: &[IngestedDocument],
    ) -> Result<HttpRequest, BuildError> {
        let body = serde_json::to_string(&IngestionRequest { documents })?;
        Ok(self.request(
            Operation::AddDocuments,
            "/documents".to_string(),
            Vec::new(),
            Some(body),
        ))
    }

    pub fn parse_personalized_documents(
        response: HttpResponse,
    ) -> XaynResult<PersonalizedDocumentsResponse> {
        check_status(Operation::PersonalizedDocuments, &response)?;
        check_content_type(&response)?;
        serde_json::from_str(&response.body).map_err(|e| {
            XaynError::unknown(format!("unable to decode response: {e}"))
                .with_status(response.status)
        })
    }

    pub fn parse_like_document(response: HttpResponse) -> XaynResult<()> {
        check_status(Operation::LikeDocument, &response)
    }

    pub fn parse_add_documents(response: HttpResponse) -> XaynResult<()> {
        check_status(Operation::AddDocuments, &response)
    }
}

/// A success body labeled as anything but JSON is not decoded. A missing
/// `Content-Type` is accepted.
fn check_content_type(response: &HttpResponse) -> XaynResult<()> {
    match response.header(CONTENT_TYPE_HEADER) {
        Some(content_type) if !is_json(content_type) => Err(XaynError::unknown(format!(
            "unexpected content type: {content_type}"
        ))
        .with_status(response.status)),
        _ => Ok(()),
    }
}

fn is_json(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || mime.ends_with("+json")
}

/// Map a non-2xx status to the operation's `XaynError`, keeping the body as
/// the diagnostic message when there is one.
fn check_status(operation: Operation, response: &HttpResponse) -> XaynResult<()> {
    if response.is_success() {
        return Ok(());
    }
    let err = XaynError::new(operation.error_kind(response.status)).with_status(response.status);
    let body = response.body.trim();
    if body.is_empty() {
        Err(err)
    } else {
        Err(err.with_message(body))
    }
}
