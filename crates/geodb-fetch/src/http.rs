use std::io::Read;
use std::sync::Arc;

use url::Url;

/// Response of a GET issued through an [`HttpClient`].
pub struct HttpResponse {
    pub status: u16,
    pub body: Box<dyn Read + Send>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Read + Send + 'static) -> Self {
        Self {
            status,
            body: Box::new(body),
        }
    }

    pub fn is_ok(&self) -> bool { self.status == 200 }
}

/// Blocking HTTP client abstraction.
///
/// Implementations follow redirects and apply their own timeouts; a non-200
/// status is returned as a normal response so the caller can report the body.
///
/// # Implementations
///
/// - [`ReqwestClient`](crate::ReqwestClient): production implementation using `reqwest`
/// - [`MockHttpClient`](crate::mock::MockHttpClient): canned responses for tests
pub trait HttpClient: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn get(&self, url: &Url, headers: &[(String, String)]) -> Result<HttpResponse, Self::Error>;
}

impl<T: HttpClient + ?Sized> HttpClient for Arc<T> {
    type Error = T::Error;

    fn get(&self, url: &Url, headers: &[(String, String)]) -> Result<HttpResponse, Self::Error> {
        (**self).get(url, headers)
    }
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use std::time::Duration;

    use super::*;

    /// Production HTTP client implementation using blocking reqwest.
    pub struct ReqwestClient {
        client: reqwest::blocking::Client,
    }

    impl ReqwestClient {
        /// Create a client with the transport's default timeouts.
        pub fn new() -> Result<Self, reqwest::Error> { Self::with_timeout(None) }

        pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
            let mut builder = reqwest::blocking::Client::builder();
            if let Some(timeout) = timeout {
                builder = builder.timeout(timeout);
            }
            Ok(Self {
                client: builder.build()?,
            })
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        fn get(
            &self,
            url: &Url,
            headers: &[(String, String)],
        ) -> Result<HttpResponse, Self::Error> {
            let mut request = self.client.get(url.as_str());
            for (key, value) in headers {
                request = request.header(key.as_str(), value.as_str());
            }

            // The URL carries the license key; keep it out of error messages.
            let response = request.send().map_err(reqwest::Error::without_url)?;
            Ok(HttpResponse::new(response.status().as_u16(), response))
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
