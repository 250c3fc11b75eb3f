// src/fetch/client.rs
// =============================================================================
// HTTP fetching with reqwest.
//
// Key functionality:
// - One shared Client (connection pooling) built from FetchSettings
// - Timeouts and a redirect limit on every request
// - Any answer that arrives is returned with its status and body; only
//   transport problems (timeouts, refused connections, ...) are errors
// - reqwest errors are sorted into a small enum so the rest of the program
//   can match on *what* went wrong
// =============================================================================

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use thiserror::Error;

// Knobs for the HTTP client
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            redirect_limit: 5,
            user_agent: concat!("image-crawler/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

// Everything that can go wrong while fetching a URL
//
// Timeouts are treated exactly like connection failures by the callers:
// the URL is abandoned for this run, nothing is retried.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request took longer than the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Redirect loop or too many hops
    #[error("Too many redirects")]
    TooManyRedirects,
    /// DNS failure, refused connection, TLS handshake, ...
    #[error("Connection failed: {0}")]
    Connect(String),
    /// Server answered, but not with 2xx (raised by callers that need 2xx)
    #[error("HTTP {0}")]
    HttpStatus(u16),
    /// Connection dropped while reading the body
    #[error("Error reading response body: {0}")]
    Body(String),
    /// Anything else reqwest reports (invalid URL, builder errors, ...)
    #[error("Request failed: {0}")]
    Request(String),
}

// A response that made it back to us, whatever its status
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: u16,
    /// URL after redirects
    pub final_url: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Fetched {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    // Page bodies are parsed as HTML even when the encoding is off, so
    // invalid sequences are replaced rather than rejected.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

// Thin wrapper around a reqwest Client
//
// Client is cheap to clone (it's an Arc internally), so HttpFetcher is too.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(settings: &FetchSettings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .user_agent(settings.user_agent.clone())
            .build()?;

        Ok(Self { client })
    }

    // GETs a URL and returns its full body
    //
    // Parameters:
    //   url: absolute URL to fetch
    //
    // Returns: Fetched for any HTTP answer (404 and 500 included),
    //          FetchError when no answer could be read
    pub async fn get(&self, url: &str) -> Result<Fetched, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Body(e.to_string())
            }
        })?;

        Ok(Fetched {
            status,
            final_url,
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}

// Categorizes the different error types from reqwest
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure / refused connection
// - Too many redirects
// - Malformed URL
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_redirect() {
        FetchError::TooManyRedirects
    } else if error.is_connect() {
        FetchError::Connect(error.to_string())
    } else if error.is_body() || error.is_decode() {
        FetchError::Body(error.to_string())
    } else {
        FetchError::Request(error.to_string())
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why an error enum instead of anyhow here?
//    - The crawler and the downloader both need to *report* fetch failures,
//      and the enum makes every failure kind explicit in the log
//    - anyhow is still used in main.rs where errors only get printed
//
// 2. What does map_err do?
//    - Converts the error inside a Result, leaving Ok untouched
//    - `.map_err(categorize_error)?` turns a reqwest::Error into our
//      FetchError and returns early if it was an error
//
// 3. Why bytes() and not text()?
//    - Images are binary; text() would try to decode them
//    - Pages are decoded later with Fetched::text_lossy
// -----------------------------------------------------------------------------
