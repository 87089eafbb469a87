//! [`HttpClient`] backed by `reqwest`.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Method, RequestBuilder};
use std::time::Duration;

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response};

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        let text = err.to_string();
        if err.is_timeout() {
            HttpError::Timeout(text)
        } else if err.is_connect() {
            HttpError::ConnectionFailed(text)
        } else if err.is_builder() {
            HttpError::InvalidUrl(text)
        } else if err.is_body() || err.is_decode() {
            HttpError::Io(text)
        } else {
            HttpError::Other(text)
        }
    }
}

/// Chat backend transport over a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
    /// Applies to `get`, `post` and `delete` only; a streamed reply may run
    /// for as long as the model keeps talking.
    request_timeout: Option<Duration>,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    fn request(&self, method: Method, url: &str, body: Option<&str>, headers: &Headers) -> RequestBuilder {
        let mut builder = self.client.request(method, url);
        if let Some(body) = body {
            builder = builder.body(body.to_owned());
        }
        headers
            .iter()
            .fold(builder, |builder, (name, value)| builder.header(name, value))
    }

    async fn fetch(&self, builder: RequestBuilder) -> Result<Response, HttpError> {
        let builder = match self.request_timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        };
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = header_map(response.headers());
        let body = response.bytes().await?;
        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

/// Header values that are not visible ASCII are dropped.
fn header_map(headers: &reqwest::header::HeaderMap) -> Headers {
    headers
        .iter()
        .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_owned())))
        .collect()
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.fetch(self.request(Method::GET, url, None, headers)).await
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.fetch(self.request(Method::POST, url, Some(body), headers))
            .await
    }

    async fn delete(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.fetch(self.request(Method::DELETE, url, None, headers))
            .await
    }

    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        let response = self
            .request(Method::POST, url, Some(body), headers)
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(HttpError::ServerError { status, message });
        }

        // A failure after the headers arrived is a body read error, unless it timed out.
        let chunks = response.bytes_stream().map(|chunk| {
            chunk.map_err(|err| match HttpError::from(err) {
                HttpError::Timeout(text) => HttpError::Timeout(text),
                other => HttpError::Io(other.to_string()),
            })
        });
        Ok(Box::pin(chunks))
    }
}
