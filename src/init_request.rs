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
use crate::restart::RestartResponseHandle;

/// License information sent with [`InitRequest`], as an `<init>` document.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InitializeProperties {
    pub license_key: String,
    pub licensee: String,
}

impl XmlElement for InitializeProperties {
    const ELEMENT: &'static str = "init";
}

impl Record for InitializeProperties {
    fn codec(format: Format) -> Result<Box<dyn Codec<Self>>, MarkLogicError> {
        match format {
            Format::Xml => Ok(Box::new(XmlCodec)),
            Format::Json => Ok(Box::new(JsonCodec)),
            Format::PlainText => unsupported(format),
        }
    }
}

/// Handle for an [`InitializeProperties`] request body.
pub type InitHandle = RecordHandle<InitializeProperties>;

/// Struct used to initialize a freshly installed MarkLogic Server.
///
/// This installs the license and restarts the server. The [`RestartResponse`](crate::RestartResponse)
/// it returns carries the startup time to wait for.
///
/// ```no_run
/// use marklogic_rust_sdk::*;
/// # async fn run(admin: &AdminClient) -> Result<(), Box<dyn std::error::Error>> {
/// let body = InitHandle::with_value(
///     Format::Xml,
///     InitializeProperties {
///         license_key: "1234-5678-90AB".to_string(),
///         licensee: "Your Licensee".to_string(),
///     },
/// )?;
/// let mut restart = RestartResponseHandle::new(Format::Xml)?;
/// InitRequest::new().execute(admin, &body, &mut restart).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Default, Debug)]
pub struct InitRequest {
    pub(crate) timeout: Option<Duration>,
}

impl InitRequest {
    pub fn new() -> InitRequest {
        InitRequest::default()
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

    /// Post the properties held by `body` to `/admin/v1/init`.
    ///
    /// Servers that are already initialized answer `204 No Content`, in which
    /// case `response` is left as it was.
    pub async fn execute(
        &self,
        admin: &AdminClient,
        body: &InitHandle,
        response: &mut RestartResponseHandle,
    ) -> Result<(), MarkLogicError> {
        let mut req = RestRequest::new(Method::POST, "/init");
        if let Some(t) = &self.timeout {
            req = req.timeout(t);
        }
        admin.execute_with_body(&req, body, response).await
    }
}
