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
use crate::error::{ia_err, MarkLogicError};
use crate::format::Format;
use crate::handle::Handle;
use crate::record_handle::{Record, RecordHandle};
use crate::rest_request::RestRequest;
use crate::restart::RestartResponseHandle;

/// The `<instance-admin>` document naming the first administrator of a
/// newly initialized server.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InstanceAdminProperties {
    pub admin_username: String,
    pub admin_password: String,
    #[serde(default)]
    pub realm: String,
}

impl XmlElement for InstanceAdminProperties {
    const ELEMENT: &'static str = "instance-admin";
}

impl Record for InstanceAdminProperties {
    fn codec(format: Format) -> Result<Box<dyn Codec<Self>>, MarkLogicError> {
        match format {
            Format::Xml => Ok(Box::new(XmlCodec)),
            Format::Json => Ok(Box::new(JsonCodec)),
            Format::PlainText => unsupported(format),
        }
    }
}

/// Handle for an [`InstanceAdminProperties`] request body.
pub type InstanceAdminHandle = RecordHandle<InstanceAdminProperties>;

/// Struct used to install the admin user and security database on a server
/// that has been initialized with an [`InitRequest`](crate::InitRequest).
///
/// The server restarts afterwards.
#[derive(Default, Debug)]
pub struct InstanceAdminRequest {
    pub(crate) properties: InstanceAdminProperties,
    pub(crate) format: Format,
    pub(crate) timeout: Option<Duration>,
}

impl InstanceAdminRequest {
    /// Create a request for the given administrator. `username` must be non-empty.
    pub fn new(username: &str, password: &str, realm: &str) -> InstanceAdminRequest {
        InstanceAdminRequest {
            properties: InstanceAdminProperties {
                admin_username: username.to_string(),
                admin_password: password.to_string(),
                realm: realm.to_string(),
            },
            ..Default::default()
        }
    }

    /// Send the body as XML (the default) or JSON.
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
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

    pub async fn execute(
        &self,
        admin: &AdminClient,
        response: &mut RestartResponseHandle,
    ) -> Result<(), MarkLogicError> {
        if self.properties.admin_username.is_empty() {
            return ia_err!("instance admin username must not be empty");
        }
        let mut body = InstanceAdminHandle::new(self.format)?;
        body.encode(self.properties.clone())?;
        let mut req = RestRequest::new(Method::POST, "/instance-admin");
        if let Some(t) = &self.timeout {
            req = req.timeout(t);
        }
        admin.execute_with_body(&req, &body, response).await
    }
}
