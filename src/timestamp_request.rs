//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use reqwest::Method;
use std::result::Result;
use std::time::Duration;

use crate::client::AdminClient;
use crate::codec::{unsupported, Codec, TextCodec};
use crate::error::MarkLogicError;
use crate::format::Format;
use crate::record_handle::{Record, RecordHandle};
use crate::rest_request::RestRequest;
use crate::timestamp::Timestamp;

impl Record for Timestamp {
    fn codec(format: Format) -> Result<Box<dyn Codec<Self>>, MarkLogicError> {
        match format {
            Format::PlainText => Ok(Box::new(TextCodec)),
            _ => unsupported(format),
        }
    }
}

/// Handle for the plain-text body of `GET /admin/v1/timestamp`.
///
/// Surrounding whitespace is ignored when decoding.
pub type TimestampResponseHandle = RecordHandle<Timestamp>;

/// Struct used to verify that MarkLogic Server is up and accepting requests.
///
/// The server answers with the time it last started. Comparing it with the
/// `last-startup` of a [`RestartResponse`](crate::RestartResponse) tells
/// whether a restart has completed.
#[derive(Default, Debug)]
pub struct TimestampRequest {
    pub(crate) timeout: Option<Duration>,
}

impl TimestampRequest {
    pub fn new() -> TimestampRequest {
        TimestampRequest::default()
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
        handle: &mut TimestampResponseHandle,
    ) -> Result<(), MarkLogicError> {
        let mut req = RestRequest::new(Method::GET, "/timestamp");
        if let Some(t) = &self.timeout {
            req = req.timeout(t);
        }
        admin.execute(&req, handle).await
    }
}
