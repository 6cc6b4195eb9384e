//! Domain DTOs for the personalization API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined
//! independently; integration tests catch drift between the two crates.
//! Document properties are heterogeneous JSON scalars, so they are modelled
//! as a `PropertyValue` tagged variant rather than raw `serde_json::Value`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Property map attached to a document. Ordered so encoded bodies are stable.
pub type Properties = BTreeMap<String, PropertyValue>;

/// A single scalar document property.
///
/// Serialized untagged, i.e. as the bare JSON value. Non-finite floats
/// encode as `null`, which decodes back as `Null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Null,
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::String(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::String(v)
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        PropertyValue::Int(v.into())
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Float(v)
    }
}

/// A document uploaded to the service for later personalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestedDocument {
    pub id: String,
    pub snippet: String,
    #[serde(default)]
    pub properties: Properties,
}

impl IngestedDocument {
    pub fn new(id: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            snippet: snippet.into(),
            properties: Properties::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// A document recommended for the current user. Higher `score` means a
/// better match with the user's preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalizedDocumentData {
    pub id: String,
    pub score: i64,
    #[serde(default)]
    pub properties: Properties,
}

/// Response body of the personalized documents endpoint. `documents` keeps
/// the server's ranking order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalizedDocumentsResponse {
    pub documents: Vec<PersonalizedDocumentData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserInteractionType {
    Positive,
}

/// One interaction of the current user with a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInteraction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: UserInteractionType,
}

/// Request payload for `PATCH /users/{id}/interactions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInteractionRequest {
    pub documents: Vec<UserInteraction>,
}

/// Request payload for `POST /documents`.
#[derive(Debug, Clone, Serialize)]
pub struct IngestionRequest<'a> {
    pub documents: &'a [IngestedDocument],
}
