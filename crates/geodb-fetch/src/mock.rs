//! In-process [`HttpClient`] returning canned responses, for tests.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;

use url::Url;

use crate::http::{HttpClient, HttpResponse};

#[derive(Debug, thiserror::Error)]
#[error("mock transport error: {0}")]
pub struct MockError(pub String);

#[derive(Clone, Debug)]
enum MockReply {
    Respond { status: u16, body: Vec<u8> },
    Fail(String),
}

/// A request seen by [`MockHttpClient`].
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub url: Url,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn query(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Mock HTTP client keyed on the `suffix` query parameter, so the checksum
/// request (`tar.gz.md5`) and the archive request (`tar.gz`) can be stubbed
/// independently. Unrouted requests get a 404.
#[derive(Default)]
pub struct MockHttpClient {
    routes: Mutex<HashMap<String, MockReply>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockHttpClient {
    pub fn new() -> Self { Self::default() }

    pub fn respond(&self, suffix: &str, status: u16, body: impl Into<Vec<u8>>) -> &Self {
        self.route(suffix, MockReply::Respond {
            status,
            body: body.into(),
        })
    }

    pub fn fail(&self, suffix: &str, message: &str) -> &Self {
        self.route(suffix, MockReply::Fail(message.to_string()))
    }

    fn route(&self, suffix: &str, reply: MockReply) -> &Self {
        self.routes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(suffix.to_string(), reply);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of requests made with the given `suffix` parameter.
    pub fn count(&self, suffix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.query("suffix").as_deref() == Some(suffix))
            .count()
    }

    pub fn clear_requests(&self) {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl HttpClient for MockHttpClient {
    type Error = MockError;

    fn get(&self, url: &Url, headers: &[(String, String)]) -> Result<HttpResponse, Self::Error> {
        let request = RecordedRequest {
            url: url.clone(),
            headers: headers.to_vec(),
        };
        let suffix = request.query("suffix").unwrap_or_default();
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);

        let reply = self
            .routes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&suffix)
            .cloned();

        match reply {
            Some(MockReply::Respond { status, body }) => {
                Ok(HttpResponse::new(status, Cursor::new(body)))
            }
            Some(MockReply::Fail(message)) => Err(MockError(message)),
            None => Ok(HttpResponse::new(404, Cursor::new(b"Not Found".to_vec()))),
        }
    }
}
