//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::StatusCode;
use std::result::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

use crate::auth::Authenticator;
use crate::connection::ConnectionBuilder;
use crate::error::{ia_err, ml_err, user_agent, MarkLogicError};
use crate::format::Format;
use crate::handle::{accept_response, Handle};
use crate::rest_request::RestRequest;

/// Base path of the REST API.
pub const REST_BASE_PATH: &str = "/v1";
/// Base path of the admin API.
pub const ADMIN_BASE_PATH: &str = "/admin/v1";

/// **The REST API client**.
///
/// This should be created once and used
/// throughout the application lifetime, across all threads.
///
/// Note: there is no need to enclose this struct in an `Rc` or [`Arc`], as it uses an
/// [`Arc`] internally, so calling `.clone()` on this struct will always return the
/// same underlying client.
#[derive(Clone, Debug)]
pub struct Client {
    pub(crate) inner: Arc<ClientRef>,
}

/// **The admin API client**, used with the admin requests such as
/// [`TimestampRequest`](crate::TimestampRequest) and
/// [`ServerConfigRequest`](crate::ServerConfigRequest).
///
/// Like [`Client`], it is cheap to clone and meant to be shared.
#[derive(Clone, Debug)]
pub struct AdminClient {
    pub(crate) inner: Arc<ClientRef>,
}

#[derive(Debug)]
pub(crate) struct ClientRef {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: String,
    auth: Authenticator,
    timeout: Duration,
}

impl Client {
    /// Create a new [`ConnectionBuilder`].
    pub fn builder() -> ConnectionBuilder {
        ConnectionBuilder::new()
    }

    pub(crate) fn new(b: &ConnectionBuilder) -> Result<Client, MarkLogicError> {
        Ok(Client {
            inner: Arc::new(ClientRef::new(b, b.port, REST_BASE_PATH)?),
        })
    }

    /// The base URL requests are sent below, e.g. `http://localhost:8000/v1`.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Send `req` without a body and decode the response into `response`.
    ///
    /// A `204 No Content` answer leaves `response` untouched.
    pub async fn execute<H>(&self, req: &RestRequest, response: &mut H) -> Result<(), MarkLogicError>
    where
        H: Handle + ?Sized,
    {
        self.inner.execute(req, None, response).await
    }

    /// Send `req` with the encoded contents of `body` and decode the response
    /// into `response`.
    pub async fn execute_with_body<B, H>(
        &self,
        req: &RestRequest,
        body: &B,
        response: &mut H,
    ) -> Result<(), MarkLogicError>
    where
        B: Handle + ?Sized,
        H: Handle + ?Sized,
    {
        self.inner
            .execute(req, Some((body.format(), body.bytes())), response)
            .await
    }
}

impl AdminClient {
    /// Create a new [`ConnectionBuilder`].
    pub fn builder() -> ConnectionBuilder {
        ConnectionBuilder::new()
    }

    pub(crate) fn new(b: &ConnectionBuilder) -> Result<AdminClient, MarkLogicError> {
        Ok(AdminClient {
            inner: Arc::new(ClientRef::new(b, b.admin_port, ADMIN_BASE_PATH)?),
        })
    }

    /// The base URL requests are sent below, e.g. `http://localhost:8001/admin/v1`.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Send `req` without a body and decode the response into `response`.
    pub async fn execute<H>(&self, req: &RestRequest, response: &mut H) -> Result<(), MarkLogicError>
    where
        H: Handle + ?Sized,
    {
        self.inner.execute(req, None, response).await
    }

    /// Send `req` with the encoded contents of `body` and decode the response
    /// into `response`.
    pub async fn execute_with_body<B, H>(
        &self,
        req: &RestRequest,
        body: &B,
        response: &mut H,
    ) -> Result<(), MarkLogicError>
    where
        B: Handle + ?Sized,
        H: Handle + ?Sized,
    {
        self.inner
            .execute(req, Some((body.format(), body.bytes())), response)
            .await
    }
}

impl ClientRef {
    fn new(b: &ConnectionBuilder, port: u16, base_path: &str) -> Result<ClientRef, MarkLogicError> {
        if b.host.is_empty() {
            if b.from_environment {
                return ia_err!("cannot build client: no host specified. set MARKLOGIC_HOST environment.");
            }
            return ia_err!("cannot build client: no host specified");
        }
        // default timeout to 30 seconds
        let timeout = b.timeout.unwrap_or(Duration::new(30, 0));
        let c = {
            if let Some(c) = &b.client {
                c.clone()
            } else {
                let mut cb = reqwest::Client::builder()
                    .timeout(timeout)
                    .connect_timeout(timeout);
                if let Some(cert) = &b.add_cert {
                    cb = cb.add_root_certificate(cert.clone());
                }
                if b.accept_invalid_certs {
                    cb = cb.danger_accept_invalid_certs(true);
                }
                cb.build()?
            }
        };
        let scheme = if b.use_https { "https" } else { "http" };
        let base_url = format!("{}://{}:{}{}", scheme, b.host, port, base_path);
        // validate once so per-request joins only fail on bad paths
        Url::parse(&base_url)?;
        let auth = Authenticator::new(b.auth_type, &b.credentials)?;
        debug!(
            "Creating new client: base_url={}, auth={:?}, timeout={:?}",
            base_url, b.auth_type, timeout
        );
        Ok(ClientRef {
            client: c,
            base_url,
            auth,
            timeout,
        })
    }

    pub(crate) fn url_for(&self, req: &RestRequest) -> Result<Url, MarkLogicError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, req.path))?;
        if !req.params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in &req.params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    async fn execute<H>(
        &self,
        req: &RestRequest,
        body: Option<(Format, &[u8])>,
        response: &mut H,
    ) -> Result<(), MarkLogicError>
    where
        H: Handle + ?Sized,
    {
        if let Some(resp) = self.send(req, body, response.format()).await? {
            accept_response(response, resp).await?;
        }
        Ok(())
    }

    // Returns None for 204 No Content.
    async fn send(
        &self,
        req: &RestRequest,
        body: Option<(Format, &[u8])>,
        accept: Format,
    ) -> Result<Option<reqwest::Response>, MarkLogicError> {
        let url = self.url_for(req)?;
        let uri = match url.query() {
            Some(q) => format!("{}?{}", url.path(), q),
            None => url.path().to_string(),
        };
        let timeout = req.timeout.unwrap_or(self.timeout);
        let mut auth_header = self.auth.header_for(&req.method, &uri)?;
        let mut answered = false;
        loop {
            let mut rb = self
                .client
                .request(req.method.clone(), url.clone())
                .timeout(timeout)
                .header(ACCEPT, accept.mime_type())
                .header(USER_AGENT, user_agent());
            if let Some((format, bytes)) = body {
                rb = rb
                    .header(CONTENT_TYPE, format.mime_type())
                    .body(bytes.to_vec());
            }
            if let Some(h) = &auth_header {
                rb = rb.header(AUTHORIZATION, h.clone());
            }
            trace!("{} {}", req.method, url);
            let resp = rb.send().await?;
            let status = resp.status();
            trace!("{} {} -> {}", req.method, url, status);

            if status == StatusCode::UNAUTHORIZED && !answered {
                if let Some(h) = self.auth.answer(resp.headers(), &req.method, &uri)? {
                    auth_header = Some(h);
                    answered = true;
                    continue;
                }
            }
            if status == StatusCode::NO_CONTENT {
                return Ok(None);
            }
            if status.is_success() {
                return Ok(Some(resp));
            }
            let content = resp.text().await?;
            if status == StatusCode::UNAUTHORIZED {
                return ml_err!(
                    InvalidAuthorization,
                    "server rejected credentials: {}, response text: {}",
                    status,
                    content
                );
            }
            return ml_err!(
                UnexpectedStatus,
                "got unexpected http status: {}, response text: {}",
                status,
                content
            );
        }
    }
}
