//! The client façade.
//!
//! # Design
//! Every operation builds its `HttpRequest` synchronously, at the moment the
//! method is called, and returns a `'static` future that performs the single
//! exchange. The user id is therefore captured at dispatch time: an
//! `update_user_id` issued while a request is in flight never leaks into it.
//!
//! Callback-style `*_with` methods spawn that same future on a tokio
//! runtime and hand the result to a completion closure, so both calling
//! conventions share one code path. The runtime is the one the caller is
//! running on, else the one captured when the client was built (or set with
//! `with_runtime`). With neither, the completion receives an `UnknownError`
//! immediately.

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{BuildError, XaynError, XaynResult};
use crate::http::{HttpRequest, HttpResponse};
use crate::request::{Operation, RequestBuilder};
use crate::transport::Transport;
use crate::types::{IngestedDocument, PersonalizedDocumentsResponse};

/// Mutable client context shared by all clones of a `XaynClient`.
struct ClientSession {
    user_id: RwLock<Arc<str>>,
    requests: RequestBuilder,
}

/// Asynchronous client for the personalization API.
///
/// Cloning is cheap; clones share the session, so `update_user_id` on one
/// clone is seen by all of them.
#[derive(Clone)]
pub struct XaynClient {
    session: Arc<ClientSession>,
    transport: Arc<dyn Transport>,
    runtime: Option<Handle>,
}

impl XaynClient {
    /// Create a client that talks HTTP through reqwest.
    #[cfg(feature = "reqwest")]
    pub fn new(config: ClientConfig) -> XaynResult<Self> {
        let transport = crate::transport::ReqwestTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client on top of any `Transport`.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let session = ClientSession {
            user_id: RwLock::new(Arc::from(config.user_id)),
            requests: RequestBuilder::new(&config.base_url, &config.api_key),
        };
        Self {
            session: Arc::new(session),
            transport,
            runtime: Handle::try_current().ok(),
        }
    }

    /// Run callback-style calls on `runtime` when the caller is not itself
    /// inside a tokio runtime.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn user_id(&self) -> Arc<str> {
        let guard = self
            .session
            .user_id
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the user id used by requests dispatched after this returns.
    pub fn update_user_id(&self, user_id: impl Into<String>) {
        let user_id: Arc<str> = Arc::from(user_id.into());
        let mut guard = self
            .session
            .user_id
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = user_id;
    }

    pub fn base_url(&self) -> &str {
        self.session.requests.base_url()
    }

    /// Documents personalized for the current user, best match first.
    /// `count` caps the list length; `None` leaves it to the server.
    pub fn fetch_personalized_documents(
        &self,
        count: Option<u32>,
    ) -> impl Future<Output = XaynResult<PersonalizedDocumentsResponse>> + Send + 'static {
        let request = self
            .session
            .requests
            .build_personalized_documents(&self.user_id(), count);
        self.exchange(
            Operation::PersonalizedDocuments,
            Ok(request),
            RequestBuilder::parse_personalized_documents,
        )
    }

    /// Record a positive interaction of the current user with a document.
    pub fn like_document(
        &self,
        document_id: &str,
    ) -> impl Future<Output = XaynResult<()>> + Send + 'static {
        let request = self
            .session
            .requests
            .build_like_document(&self.user_id(), document_id);
        self.exchange(
            Operation::LikeDocument,
            request,
            RequestBuilder::parse_like_document,
        )
    }

    /// Upload documents. An empty batch is sent as-is; the server decides
    /// whether it is acceptable.
    pub fn add_documents(
        &self,
        documents: &[IngestedDocument],
    ) -> impl Future<Output = XaynResult<()>> + Send + 'static {
        let request = self.session.requests.build_add_documents(documents);
        self.exchange(
            Operation::AddDocuments,
            request,
            RequestBuilder::parse_add_documents,
        )
    }

    /// Callback form of [`XaynClient::fetch_personalized_documents`].
    ///
    /// Returns the spawned task, or `None` when no runtime was available and
    /// `completion` already ran with an error.
    pub fn fetch_personalized_documents_with<F>(
        &self,
        count: Option<u32>,
        completion: F,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(XaynResult<PersonalizedDocumentsResponse>) + Send + 'static,
    {
        self.spawn_with(self.fetch_personalized_documents(count), completion)
    }

    /// Callback form of [`XaynClient::like_document`].
    pub fn like_document_with<F>(&self, document_id: &str, completion: F) -> Option<JoinHandle<()>>
    where
        F: FnOnce(XaynResult<()>) + Send + 'static,
    {
        self.spawn_with(self.like_document(document_id), completion)
    }

    /// Callback form of [`XaynClient::add_documents`].
    pub fn add_documents_with<F>(
        &self,
        documents: &[IngestedDocument],
        completion: F,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(XaynResult<()>) + Send + 'static,
    {
        self.spawn_with(self.add_documents(documents), completion)
    }

    fn spawn_with<T, Fut, F>(&self, future: Fut, completion: F) -> Option<JoinHandle<()>>
    where
        T: Send + 'static,
        Fut: Future<Output = XaynResult<T>> + Send + 'static,
        F: FnOnce(XaynResult<T>) + Send + 'static,
    {
        let Some(runtime) = Handle::try_current().ok().or_else(|| self.runtime.clone()) else {
            debug!("no async runtime available for callback");
            completion(Err(XaynError::unknown("no async runtime available")));
            return None;
        };
        Some(runtime.spawn(async move { completion(future.await) }))
    }

    fn exchange<T, P>(
        &self,
        operation: Operation,
        request: Result<HttpRequest, BuildError>,
        parse: P,
    ) -> impl Future<Output = XaynResult<T>> + Send + 'static
    where
        T: Send + 'static,
        P: FnOnce(HttpResponse) -> XaynResult<T> + Send + 'static,
    {
        let transport = Arc::clone(&self.transport);
        async move {
            let request = request?;
            debug!(
                op = operation.name(),
                method = request.method.as_str(),
                url = %request.url(),
                "dispatching request"
            );
            let response = transport.execute(request).await.map_err(|e| {
                debug!(op = operation.name(), error = %e, "exchange failed");
                XaynError::from(e)
            })?;
            debug!(op = operation.name(), status = response.status, "received response");
            parse(response)
        }
    }
}
