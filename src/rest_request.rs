//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use reqwest::Method;
use std::time::Duration;

/// A request against any endpoint below a client's base path.
///
/// The path is relative to the client: `/documents` on a [`Client`](crate::Client)
/// goes to `/v1/documents`, `/timestamp` on an
/// [`AdminClient`](crate::AdminClient) goes to `/admin/v1/timestamp`.
///
/// ```no_run
/// use marklogic_rust_sdk::{Client, Format, MapHandle, Method, RestRequest};
/// # async fn run(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let mut resp = MapHandle::new(Format::Json)?;
/// RestRequest::new(Method::GET, "/documents")
///     .param("uri", "/example.json")
///     .execute(client, &mut resp)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RestRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) params: Vec<(String, String)>,
    pub(crate) timeout: Option<Duration>,
}

impl RestRequest {
    pub fn new(method: Method, path: &str) -> RestRequest {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        RestRequest {
            method,
            path,
            params: Vec::new(),
            timeout: None,
        }
    }

    /// Add a query parameter. Parameters may repeat.
    pub fn param(mut self, key: &str, value: &str) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    /// Specify the timeout value for the request.
    ///
    /// This is optional.
    /// If not set, the default timeout value configured for the
    /// [`ConnectionBuilder`](crate::ConnectionBuilder::timeout()) is used.
    pub fn timeout(mut self, t: &Duration) -> Self {
        self.timeout = Some(*t);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Send the request without a body and decode the response into `response`.
    pub async fn execute<H>(
        &self,
        client: &crate::Client,
        response: &mut H,
    ) -> Result<(), crate::MarkLogicError>
    where
        H: crate::Handle + ?Sized,
    {
        client.execute(self, response).await
    }
}
