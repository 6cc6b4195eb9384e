//! In-memory stand-in for the personalization service.
//!
//! Implements the three public routes with the status codes the real
//! service uses, so the client can be exercised end-to-end without network
//! access. State lives for the lifetime of the `Router`.
//!
//! The token is checked before the body or query is decoded, so an
//! unauthenticated request is 401 whatever its payload.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, Uri},
    routing::{get, patch, post},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

pub const AUTH_HEADER: &str = "authorizationtoken";

/// Number of documents returned when the request has no `count`.
pub const DEFAULT_COUNT: usize = 10;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: String,
    pub snippet: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Deserialize)]
pub struct IngestionRequest {
    pub documents: Vec<Document>,
}

#[derive(Deserialize)]
pub struct Interaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Deserialize)]
pub struct InteractionRequest {
    pub documents: Vec<Interaction>,
}

#[derive(Deserialize)]
pub struct PersonalizedQuery {
    pub count: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PersonalizedDocument {
    pub id: String,
    pub score: u32,
    pub properties: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PersonalizedDocumentsResponse {
    pub documents: Vec<PersonalizedDocument>,
}

#[derive(Default)]
pub struct Store {
    documents: BTreeMap<String, Document>,
    likes: HashMap<String, BTreeSet<String>>,
}

#[derive(Clone)]
pub struct AppState {
    api_key: Arc<str>,
    store: Arc<RwLock<Store>>,
}

pub fn app(api_key: &str) -> Router {
    let state = AppState {
        api_key: Arc::from(api_key),
        store: Arc::new(RwLock::new(Store::default())),
    };
    Router::new()
        .route("/documents", post(add_documents))
        .route("/users/{user_id}/interactions", patch(add_interactions))
        .route(
            "/users/{user_id}/personalized_documents",
            get(personalized_documents),
        )
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), StatusCode> {
    match headers.get(AUTH_HEADER).and_then(|v| v.to_str().ok()) {
        Some(token) if token == &*state.api_key => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

fn decode_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, StatusCode> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "rejecting malformed body");
        StatusCode::BAD_REQUEST
    })
}

async fn add_documents(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, StatusCode> {
    authorize(&state, &headers)?;
    let input: IngestionRequest = decode_json(&body)?;
    let invalid = input
        .documents
        .iter()
        .any(|d| d.id.trim().is_empty() || d.snippet.trim().is_empty());
    if input.documents.is_empty() || invalid {
        return Err(StatusCode::BAD_REQUEST);
    }

    let mut store = state.store.write().await;
    debug!(count = input.documents.len(), "ingesting documents");
    for doc in input.documents {
        store.documents.insert(doc.id.clone(), doc);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn add_interactions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, StatusCode> {
    authorize(&state, &headers)?;
    let input: InteractionRequest = decode_json(&body)?;
    let mut store = state.store.write().await;
    let valid = !user_id.trim().is_empty()
        && !input.documents.is_empty()
        && input
            .documents
            .iter()
            .all(|i| i.kind == "positive" && store.documents.contains_key(&i.id));
    if !valid {
        return Err(StatusCode::BAD_REQUEST);
    }

    debug!(%user_id, count = input.documents.len(), "recording interactions");
    let likes = store.likes.entry(user_id).or_default();
    likes.extend(input.documents.into_iter().map(|i| i.id));
    Ok(StatusCode::NO_CONTENT)
}

async fn personalized_documents(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Json<PersonalizedDocumentsResponse>, StatusCode> {
    authorize(&state, &headers)?;
    let Query(query) =
        Query::<PersonalizedQuery>::try_from_uri(&uri).map_err(|_| StatusCode::BAD_REQUEST)?;
    let store = state.store.read().await;
    let liked = match store.likes.get(&user_id) {
        Some(liked) if !liked.is_empty() => liked,
        _ => return Err(StatusCode::NOT_FOUND),
    };
    let liked_docs: Vec<&Document> = liked
        .iter()
        .filter_map(|id| store.documents.get(id))
        .collect();

    let mut ranked: Vec<PersonalizedDocument> = store
        .documents
        .values()
        .filter(|doc| !liked.contains(&doc.id))
        .map(|doc| PersonalizedDocument {
            id: doc.id.clone(),
            score: score(doc, &liked_docs),
            properties: doc.properties.clone(),
        })
        .collect();
    if ranked.is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    ranked.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
    ranked.truncate(query.count.unwrap_or(DEFAULT_COUNT));
    Ok(Json(PersonalizedDocumentsResponse { documents: ranked }))
}

/// Percentage (0-100) of `liked` documents sharing at least one property
/// value with `candidate`.
pub fn score(candidate: &Document, liked: &[&Document]) -> u32 {
    if liked.is_empty() {
        return 0;
    }
    let matching = liked
        .iter()
        .filter(|l| {
            l.properties
                .iter()
                .any(|(k, v)| candidate.properties.get(k) == Some(v))
        })
        .count();
    (matching * 100 / liked.len()) as u32
}
