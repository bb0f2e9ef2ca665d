//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use reqwest::Method;
use serde_derive::{Deserialize, Serialize};
use std::result::Result;
use std::time::Duration;

use crate::client::AdminClient;
use crate::codec::{unsupported, Codec, JsonCodec, XmlCodec, XmlElement};
use crate::error::MarkLogicError;
use crate::format::Format;
use crate::record_handle::{Record, RecordHandle};
use crate::rest_request::RestRequest;
use crate::timestamp::Timestamp;

/// Configuration of a MarkLogic host, suitable for joining it to a cluster.
///
/// Returned by `GET /admin/v1/server-config` as a `<host>` document in the
/// `http://marklogic.com/manage` namespace. Readable and writable as XML or
/// JSON; element and key names are the kebab-case forms of the field names.
///
/// The foreign ports and the certificate may be absent; every other field
/// must be present or decoding fails with
/// [`MalformedPayload`](crate::MarkLogicErrorCode::MalformedPayload).
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServerConfigResponse {
    pub timestamp: Timestamp,
    pub version: String,
    pub platform: String,
    pub edition: String,
    pub host_id: String,
    pub host_name: String,
    pub bind_port: i64,
    pub connect_port: i64,
    #[serde(default)]
    pub foreign_bind_port: i64,
    #[serde(default)]
    pub foreign_connect_port: i64,
    #[serde(default)]
    pub ssl_certificate: String,
}

impl XmlElement for ServerConfigResponse {
    const ELEMENT: &'static str = "host";
}

impl Record for ServerConfigResponse {
    fn codec(format: Format) -> Result<Box<dyn Codec<Self>>, MarkLogicError> {
        match format {
            Format::Xml => Ok(Box::new(XmlCodec)),
            Format::Json => Ok(Box::new(JsonCodec)),
            Format::PlainText => unsupported(format),
        }
    }
}

/// Handle for a [`ServerConfigResponse`].
pub type ServerConfigResponseHandle = RecordHandle<ServerConfigResponse>;

/// Struct used for retrieving the server configuration of the host the
/// [`AdminClient`] points at.
///
/// ```no_run
/// use marklogic_rust_sdk::{AdminClient, Format, ServerConfigRequest, ServerConfigResponseHandle};
/// # async fn run(admin: &AdminClient) -> Result<(), Box<dyn std::error::Error>> {
/// let mut handle = ServerConfigResponseHandle::new(Format::Xml)?;
/// ServerConfigRequest::new().execute(admin, &mut handle).await?;
/// println!("MarkLogic {} on {}", handle.get().version, handle.get().host_name);
/// # Ok(())
/// # }
/// ```
#[derive(Default, Debug)]
pub struct ServerConfigRequest {
    pub(crate) timeout: Option<Duration>,
}

impl ServerConfigRequest {
    pub fn new() -> ServerConfigRequest {
        ServerConfigRequest::default()
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

    /// Execute the request, decoding the `<host>` document into `handle`.
    pub async fn execute(
        &self,
        admin: &AdminClient,
        handle: &mut ServerConfigResponseHandle,
    ) -> Result<(), MarkLogicError> {
        let mut req = RestRequest::new(Method::GET, "/server-config");
        if let Some(t) = &self.timeout {
            req = req.timeout(t);
        }
        admin.execute(&req, handle).await
    }
}
