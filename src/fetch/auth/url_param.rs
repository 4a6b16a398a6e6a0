use crate::fetch::client::HttpClient;
use async_trait::async_trait;

/// An [`HttpClient`] wrapper that appends an API key as a URL query parameter.
///
/// `param_name` is the query parameter name and `key` is its value. The WAQI
/// API expects its token as `?token=<key>`, see [`UrlParam::token`].
pub struct UrlParam<C> {
    pub inner: C,
    pub param_name: String,
    pub key: String,
}

impl<C> UrlParam<C> {
    /// Wraps `inner` so every request carries `token=<key>`.
    pub fn token(inner: C, key: String) -> Self {
        Self {
            inner,
            param_name: "token".to_string(),
            key,
        }
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for UrlParam<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.url_mut()
            .query_pairs_mut()
            .append_pair(&self.param_name, &self.key);
        self.inner.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::fetch_bytes;
    use crate::fetch::testing::CannedClient;
    use reqwest::Url;

    #[tokio::test]
    async fn test_token_is_appended_as_query_param() {
        let client = UrlParam::token(CannedClient::new(200, "{}"), "s3cr3t".to_string());
        let url = Url::parse("https://api.waqi.info/feed/Tokyo/").unwrap();

        fetch_bytes(&client, url).await.unwrap();

        assert_eq!(
            client.inner.urls(),
            vec!["https://api.waqi.info/feed/Tokyo/?token=s3cr3t"]
        );
    }

    #[tokio::test]
    async fn test_token_is_url_encoded() {
        let client = UrlParam::token(CannedClient::new(200, "{}"), "a b&c".to_string());
        let url = Url::parse("https://api.waqi.info/feed/Tokyo/").unwrap();

        fetch_bytes(&client, url).await.unwrap();

        assert_eq!(
            client.inner.urls(),
            vec!["https://api.waqi.info/feed/Tokyo/?token=a+b%26c"]
        );
    }
}
