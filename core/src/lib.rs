//! Client core for the personalization service.
//!
//! # Overview
//! Three operations (fetch personalized documents, like a document, ingest
//! documents) are translated into plain-data `HttpRequest` values, executed
//! through a `Transport`, and the `HttpResponse` is mapped back to a typed
//! result or an `XaynError`.
//!
//! # Design
//! - `RequestBuilder` is the pure translation layer: `build_*` produces a
//!   request, `parse_*` consumes a response. It never touches the network,
//!   which lets the FFI crate expose it to hosts that do their own IO.
//! - `XaynClient` is the façade: one exchange per call, awaited or with a
//!   completion callback.
//! - `Transport` is the only seam to the network; `ReqwestTransport` is the
//!   default implementation (feature `reqwest`).
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod request;
pub mod transport;
pub mod types;

pub use client::XaynClient;
pub use config::{ClientConfig, ConfigError, DEFAULT_BASE_URL};
pub use error::{BuildError, ErrorKind, TransportError, XaynError, XaynResult};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use request::{Operation, RequestBuilder};
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
pub use transport::Transport;
pub use types::{
    IngestedDocument, PersonalizedDocumentData, PersonalizedDocumentsResponse, Properties,
    PropertyValue, UserInteraction, UserInteractionType,
};
