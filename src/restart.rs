//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use serde_derive::{Deserialize, Serialize};
use std::result::Result;

use crate::codec::{unsupported, Codec, XmlCodec, XmlElement};
use crate::error::MarkLogicError;
use crate::format::Format;
use crate::record_handle::{Record, RecordHandle};
use crate::timestamp::Timestamp;

/// The `<restart>` document returned by admin operations that restart the
/// server, such as [`InitRequest`](crate::InitRequest) and
/// [`InstanceAdminRequest`](crate::InstanceAdminRequest).
///
/// The `last-startup` timestamp is the one to compare against
/// [`TimestampRequest`](crate::TimestampRequest) results to see when the
/// restart has finished:
///
/// ```text
/// <restart xmlns="http://marklogic.com/manage">
///   <last-startup host-id="13544732455686476949">2013-04-01T10:35:19.09913-07:00</last-startup>
///   <link><kindref>timestamp</kindref><uriref>/admin/v1/timestamp</uriref></link>
///   <message>Check for new timestamp to verify host restart.</message>
/// </restart>
/// ```
///
/// Only XML is supported.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RestartResponse {
    pub last_startup: LastStartupElement,
    #[serde(default)]
    pub link: LinkElement,
    pub message: String,
}

/// The startup time of one host.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastStartupElement {
    #[serde(rename = "@host-id", default)]
    pub host_id: String,
    #[serde(rename = "$text")]
    pub value: Timestamp,
}

/// A pointer to the endpoint to poll next.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkElement {
    pub kindref: String,
    pub uriref: String,
}

impl XmlElement for RestartResponse {
    const ELEMENT: &'static str = "restart";
}

impl Record for RestartResponse {
    fn codec(format: Format) -> Result<Box<dyn Codec<Self>>, MarkLogicError> {
        match format {
            Format::Xml => Ok(Box::new(XmlCodec)),
            _ => unsupported(format),
        }
    }
}

/// Handle for a [`RestartResponse`].
pub type RestartResponseHandle = RecordHandle<RestartResponse>;
