//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results or errors. Comparing parsed JSON (not raw
//! strings) avoids false negatives from field-ordering differences.

use serde_json::Value;
use xayn_core::{
    ErrorKind, HttpMethod, HttpRequest, HttpResponse, IngestedDocument,
    PersonalizedDocumentsResponse, RequestBuilder, XaynError,
};

const BASE_URL: &str = "http://localhost:3000";
const API_KEY: &str = "vector-key";

fn builder() -> RequestBuilder {
    RequestBuilder::new(BASE_URL, API_KEY)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PATCH" => HttpMethod::Patch,
        other => panic!("unknown method: {other}"),
    }
}

fn parse_kind(s: &str) -> ErrorKind {
    match s {
        "unknownError" => ErrorKind::UnknownError,
        "invalidRequest" => ErrorKind::InvalidRequest,
        "invalidUserId" => ErrorKind::InvalidUserId,
        "invalidUserOrDocumentId" => ErrorKind::InvalidUserOrDocumentId,
        "userNotFound" => ErrorKind::UserNotFound,
        "unableToCreateListForUser" => ErrorKind::UnableToCreateListForUser,
        "documentsNotSuccessfullyUploaded" => ErrorKind::DocumentsNotSuccessfullyUploaded,
        other => panic!("unknown error kind: {other}"),
    }
}

fn pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let arr = pair.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

fn simulated_response(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");
    assert_eq!(req.headers, pairs(&expected["headers"]), "{name}: headers");
    match expected.get("query") {
        Some(query) => assert_eq!(req.query, pairs(query), "{name}: query"),
        None => assert!(req.query.is_empty(), "{name}: query should be empty"),
    }
    match expected.get("body") {
        Some(body) => {
            let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

/// Assert `result` matches the case's `expected_error`, if it has one.
/// Returns `true` when the case expects an error.
fn check_error<T: std::fmt::Debug>(name: &str, case: &Value, result: &Result<T, XaynError>) -> bool {
    let Some(expected) = case.get("expected_error") else {
        assert!(result.is_ok(), "{name}: expected success, got {result:?}");
        return false;
    };
    let err = result.as_ref().unwrap_err();
    assert_eq!(err.kind, parse_kind(expected["kind"].as_str().unwrap()), "{name}: kind");
    assert_eq!(
        err.status.map(u64::from),
        expected["status"].as_u64(),
        "{name}: status"
    );
    true
}

// ---------------------------------------------------------------------------
// Personalized documents
// ---------------------------------------------------------------------------

#[test]
fn personalized_documents_test_vectors() {
    let raw = include_str!("../../test-vectors/personalized_documents.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let b = builder();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let user_id = case["input"]["user_id"].as_str().unwrap();
        let count = case["input"]["count"].as_u64().map(|n| n as u32);

        // Verify build
        let req = b.build_personalized_documents(user_id, count);
        check_request(name, &req, &case["expected_request"]);

        // Verify parse
        let result = RequestBuilder::parse_personalized_documents(simulated_response(case));
        if !check_error(name, case, &result) {
            let expected: PersonalizedDocumentsResponse =
                serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Like document
// ---------------------------------------------------------------------------

#[test]
fn like_document_test_vectors() {
    let raw = include_str!("../../test-vectors/like_document.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let b = builder();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let user_id = case["input"]["user_id"].as_str().unwrap();
        let document_id = case["input"]["document_id"].as_str().unwrap();

        let req = b.build_like_document(user_id, document_id).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = RequestBuilder::parse_like_document(simulated_response(case));
        check_error(name, case, &result);
    }
}

// ---------------------------------------------------------------------------
// Add documents
// ---------------------------------------------------------------------------

#[test]
fn add_documents_test_vectors() {
    let raw = include_str!("../../test-vectors/add_documents.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let b = builder();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let documents: Vec<IngestedDocument> = serde_json::from_value(case["input"].clone()).unwrap();

        let req = b.build_add_documents(&documents).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = RequestBuilder::parse_add_documents(simulated_response(case));
        check_error(name, case, &result);
    }
}
