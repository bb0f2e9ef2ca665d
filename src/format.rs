//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::error::MarkLogicError;
use crate::error::MarkLogicErrorCode::IllegalArgument;

/// The wire format a handle reads and writes.
///
/// Every handle carries one of these. The integer values are stable and may be
/// stored or exchanged by callers:
///
/// | variant | value | MIME type |
/// | ------- | ----- | --------- |
/// | [`Format::Xml`] | 0 | `application/xml` |
/// | [`Format::Json`] | 1 | `application/json` |
/// | [`Format::PlainText`] | 2 | `text/plain` |
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum Format {
    Xml = 0,
    Json = 1,
    PlainText = 2,
}

// Not derived: num_enum would read #[default] as a catch-all for unknown values.
impl Default for Format {
    fn default() -> Self {
        Format::Xml
    }
}

impl Format {
    pub fn from_int(ival: i32) -> Result<Format, MarkLogicError> {
        match Format::try_from(ival) {
            Ok(f) => Ok(f),
            Err(_) => Err(MarkLogicError::new(
                IllegalArgument,
                &format!("unrecognized format value {}", ival),
            )),
        }
    }

    /// The MIME type used for `Accept` and `Content-Type` headers.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Format::Xml => "application/xml",
            Format::Json => "application/json",
            Format::PlainText => "text/plain",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Format::Xml => write!(f, "xml"),
            Format::Json => write!(f, "json"),
            Format::PlainText => write!(f, "text"),
        }
    }
}
