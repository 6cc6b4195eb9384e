//! Acts as a C host would: builds requests through the C ABI, executes them
//! with a blocking HTTP client, and hands the responses back for parsing.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use xayn_ffi::types::*;
use xayn_ffi::*;

const KEY: &str = "host-key";

fn start_server() -> String {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            mock_server::run(listener, KEY).await.unwrap();
        });
    });
    format!("http://{}", rx.recv().unwrap())
}

fn read(ptr: *const c_char) -> String {
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string()
}

/// A response as the host received it.
struct HostResponse {
    status: u16,
    content_type: Option<CString>,
    body: CString,
}

impl HostResponse {
    fn as_ffi(&self) -> FfiHttpResponse {
        FfiHttpResponse {
            status: self.status,
            content_type: self
                .content_type
                .as_ref()
                .map_or(std::ptr::null(), |ct| ct.as_ptr()),
            body: self.body.as_ptr(),
        }
    }
}

/// Execute an `FfiHttpRequest` and return what came back.
fn execute(agent: &ureq::Agent, req: *mut FfiHttpRequest) -> HostResponse {
    assert!(!req.is_null());
    let r = unsafe { &*req };
    let url = read(r.url);
    let headers: Vec<(String, String)> = if r.headers.is_null() {
        Vec::new()
    } else {
        unsafe { std::slice::from_raw_parts(r.headers, r.headers_len as usize) }
            .iter()
            .map(|h| (read(h.key), read(h.value)))
            .collect()
    };
    let body = if r.body.is_null() {
        String::new()
    } else {
        read(r.body)
    };

    let result = match r.method {
        FfiHttpMethod::Get => {
            let mut builder = agent.get(&url);
            for (k, v) in &headers {
                builder = builder.header(k, v);
            }
            builder.call()
        }
        FfiHttpMethod::Post | FfiHttpMethod::Patch => {
            let mut builder = if r.method == FfiHttpMethod::Post {
                agent.post(&url)
            } else {
                agent.patch(&url)
            };
            for (k, v) in &headers {
                builder = builder.header(k, v);
            }
            builder.send(body.as_str())
        }
    };
    xayn_free_request(req);

    let mut response = result.unwrap();
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|v| CString::new(v).unwrap());
    let text = response.body_mut().read_to_string().unwrap();
    HostResponse {
        status,
        content_type,
        body: CString::new(text).unwrap(),
    }
}

#[test]
fn host_round_trip_against_mock_server() {
    let base_url = start_server();
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .into();

    let url = CString::new(base_url).unwrap();
    let key = CString::new(KEY).unwrap();
    let client = xayn_client_new(url.as_ptr(), key.as_ptr());
    assert!(!client.is_null());
    let user = CString::new("host user").unwrap();

    // unknown user
    let req = xayn_build_personalized_documents(client, user.as_ptr(), -1);
    let resp = execute(&agent, req);
    let result = xayn_parse_personalized_documents(&resp.as_ffi());
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::UserNotFound);
    assert_eq!(r.http_status, 404);
    xayn_free_result(result);

    // ingest
    let docs = CString::new(
        r#"[
            {"id":"a","snippet":"Alpha","properties":{"topic":"rust","pages":4}},
            {"id":"b","snippet":"Beta","properties":{"topic":"rust"}},
            {"id":"c","snippet":"Gamma","properties":{"topic":"food"}}
        ]"#,
    )
    .unwrap();
    let req = xayn_build_add_documents(client, docs.as_ptr());
    let resp = execute(&agent, req);
    let result = xayn_parse_add_documents(&resp.as_ffi());
    assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::Ok);
    xayn_free_result(result);

    // like
    let doc = CString::new("a").unwrap();
    let req = xayn_build_like_document(client, user.as_ptr(), doc.as_ptr());
    let resp = execute(&agent, req);
    let result = xayn_parse_like_document(&resp.as_ffi());
    assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::Ok);
    xayn_free_result(result);

    // ranked list
    let req = xayn_build_personalized_documents(client, user.as_ptr(), 5);
    let resp = execute(&agent, req);
    let result = xayn_parse_personalized_documents(&resp.as_ffi());
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::Ok);
    assert_eq!(r.data_tag, FfiDataTag::PersonalizedDocuments);
    let list = unsafe { &*(r.data as *const FfiPersonalizedDocumentList) };
    let items = unsafe { std::slice::from_raw_parts(list.items, list.len as usize) };
    let ids: Vec<String> = items.iter().map(|d| read(d.id)).collect();
    assert_eq!(ids, ["b", "c"]);
    assert!(items[0].score > items[1].score);
    let props: serde_json::Value = serde_json::from_str(&read(items[0].properties_json)).unwrap();
    assert_eq!(props["topic"], "rust");
    xayn_free_result(result);

    // liking an unknown document
    let doc = CString::new("missing").unwrap();
    let req = xayn_build_like_document(client, user.as_ptr(), doc.as_ptr());
    let resp = execute(&agent, req);
    let result = xayn_parse_like_document(&resp.as_ffi());
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::InvalidUserOrDocumentId);
    assert_eq!(r.http_status, 400);
    xayn_free_result(result);

    xayn_client_free(client);
}

#[test]
fn wrong_key_is_unknown_error() {
    let base_url = start_server();
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .into();

    let url = CString::new(base_url).unwrap();
    let key = CString::new("not-the-key").unwrap();
    let client = xayn_client_new(url.as_ptr(), key.as_ptr());
    let docs = CString::new(r#"[{"id":"a","snippet":"Alpha"}]"#).unwrap();

    let req = xayn_build_add_documents(client, docs.as_ptr());
    let resp = execute(&agent, req);
    let result = xayn_parse_add_documents(&resp.as_ffi());
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::UnknownError);
    assert_eq!(r.http_status, 401);
    xayn_free_result(result);

    xayn_client_free(client);
}
