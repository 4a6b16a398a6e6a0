mod client;
mod basic;
pub mod auth;

pub use client::HttpClient;
pub use basic::BasicClient;

use crate::error::FetchError;
use reqwest::Url;

/// Issues a GET through `client` and returns the body of a 2xx response.
pub async fn fetch_bytes<C: HttpClient + ?Sized>(
    client: &C,
    url: Url,
) -> Result<Vec<u8>, FetchError> {
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    Ok(resp.bytes().await?.to_vec())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::HttpClient;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Answers every request with a canned status and body, recording the URLs.
    pub(crate) struct CannedClient {
        pub status: u16,
        pub body: String,
        pub seen: Mutex<Vec<String>>,
    }

    impl CannedClient {
        pub(crate) fn new(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn urls(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpClient for CannedClient {
        async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            self.seen.lock().unwrap().push(req.url().to_string());
            let resp = http::Response::builder()
                .status(self.status)
                .body(self.body.clone())
                .unwrap();
            Ok(reqwest::Response::from(resp))
        }
    }
}
