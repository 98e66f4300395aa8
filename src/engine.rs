//! HTTP execution engine for sqlreq.
//!
//! Compiles queries and issues the described requests with reqwest.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Request, Response, StatusCode};
use tracing::{debug, warn};

use crate::binder::Arg;
use crate::compile;
use crate::config::Config;
use crate::descriptor::RequestDescriptor;
use crate::error::{SqlReqError, SqlReqResult};
use crate::parser::Mode;

/// An HTTP client that runs sqlreq queries.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    default_headers: HeaderMap,
}

impl Client {
    /// Client with default settings.
    pub fn new() -> SqlReqResult<Self> {
        Self::with_config(&Config::default())
    }

    /// Client using the `[http]` section of `config`.
    ///
    /// Default headers that are not valid HTTP headers are skipped.
    pub fn with_config(config: &Config) -> SqlReqResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(agent) = &config.http.user_agent {
            builder = builder.user_agent(agent.as_str());
        }
        if let Some(secs) = config.http.connect_timeout {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }

        let mut default_headers = HeaderMap::new();
        for (name, value) in &config.http.default_headers {
            match header_pair(name, value) {
                Ok((name, value)) => {
                    default_headers.insert(name, value);
                }
                Err(e) => warn!("skipping default header: {}", e),
            }
        }

        Ok(Self {
            http: builder.build()?,
            default_headers,
        })
    }

    /// Build, but do not send, the request for a descriptor.
    ///
    /// The body is always JSON. Query headers override default headers.
    /// `with timeout 0` leaves the request without a timeout.
    pub fn request(&self, desc: &RequestDescriptor) -> SqlReqResult<Request> {
        let mut headers = self.default_headers.clone();
        for (name, value) in &desc.headers {
            let (name, value) = header_pair(name, value)?;
            headers.insert(name, value);
        }

        let mut builder = self
            .http
            .request(desc.method.into(), desc.url.as_str())
            .headers(headers)
            .json(&desc.body());

        if let Some(timeout) = desc.timeout_duration() {
            builder = builder.timeout(timeout);
        }
        if let Some(auth) = &desc.basic_auth {
            builder = builder.basic_auth(&auth.login, Some(&auth.password));
        }

        Ok(builder.build()?)
    }

    /// Send the request for a descriptor.
    pub async fn execute(&self, desc: &RequestDescriptor) -> SqlReqResult<Response> {
        let request = self.request(desc)?;
        debug!("{} {} (timeout {}s)", desc.method, desc.url, desc.timeout);

        let response = self.http.execute(request).await?;
        debug!("{} {} -> {}", desc.method, desc.url, response.status());
        Ok(response)
    }

    /// Run a query and return the raw response.
    pub async fn select_response(&self, query: &str, args: &[Arg]) -> SqlReqResult<Response> {
        let desc = compile(Mode::Body, query, args)?;
        self.execute(&desc).await
    }

    /// Run a query and return all response headers. The body is dropped.
    pub async fn select_headers(
        &self,
        query: &str,
        args: &[Arg],
    ) -> SqlReqResult<(HeaderMap, StatusCode)> {
        let response = self.select_response(query, args).await?;
        Ok((response.headers().clone(), response.status()))
    }

    /// Run a header-selection query and return only the listed headers.
    ///
    /// ```rust,ignore
    /// let (headers, status) = client
    ///     .select_header("content-type, etag from https://example.com", &[])
    ///     .await?;
    /// ```
    pub async fn select_header(
        &self,
        query: &str,
        args: &[Arg],
    ) -> SqlReqResult<(BTreeMap<String, String>, StatusCode)> {
        let desc = compile(Mode::HeaderSelection, query, args)?;
        let response = self.execute(&desc).await?;
        Ok((
            pick_headers(response.headers(), &desc.output_headers),
            response.status(),
        ))
    }

    /// Run a query and return the response body.
    pub async fn select_body(&self, query: &str, args: &[Arg]) -> SqlReqResult<(Vec<u8>, StatusCode)> {
        let response = self.select_response(query, args).await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok((body.to_vec(), status))
    }
}

/// Keep only the named headers. A header missing from `headers` maps to "".
pub fn pick_headers(headers: &HeaderMap, names: &[String]) -> BTreeMap<String, String> {
    names
        .iter()
        .map(|name| {
            let value = headers
                .get(name.as_str())
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            (name.clone(), value.to_string())
        })
        .collect()
}

fn header_pair(name: &str, value: &str) -> SqlReqResult<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| SqlReqError::InvalidHeader(format!("{}: {}", name, e)))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|e| SqlReqError::InvalidHeader(format!("{}: {}", name, e)))?;
    Ok((header_name, header_value))
}
