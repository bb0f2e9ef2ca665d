//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use num_enum::{IntoPrimitive, TryFromPrimitive};

include!(concat!(env!("OUT_DIR"), "/ua.rs"));

pub(crate) fn sdk_version() -> &'static str {
    SDK_VERSION
}

pub(crate) fn user_agent() -> &'static str {
    USER_AGENT
}

/// Enumeration of all possible errors returned by this library.
#[derive(Debug, Clone)]
pub struct MarkLogicError {
    pub code: MarkLogicErrorCode,
    pub message: String,
}

impl std::error::Error for MarkLogicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl std::fmt::Display for MarkLogicError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        return write!(f, "code={:?} message=\"{}\"", self.code, self.message);
    }
}

impl MarkLogicError {
    pub fn new(code: MarkLogicErrorCode, msg: &str) -> MarkLogicError {
        MarkLogicError {
            code,
            message: msg.to_string(),
        }
    }

    pub fn from_int(icode: i32, msg: &str) -> MarkLogicError {
        if let Ok(code) = MarkLogicErrorCode::try_from(icode) {
            return MarkLogicError {
                code: code,
                message: msg.to_string(),
            };
        }
        MarkLogicError {
            code: MarkLogicErrorCode::UnknownError,
            message: format!("Invalid integer error code {}", icode),
        }
    }
}

macro_rules! ia_error {
    ($($t:tt)*) => {{
        let m = format!($($t)*);
        MarkLogicError {
            code: crate::error::MarkLogicErrorCode::IllegalArgument,
            message: format!("{} ({})", m, crate::error::sdk_version()),
        }
    }};
}

pub(crate) use ia_error;

macro_rules! ia_err {
    ($($t:tt)*) => {{
        let m = format!($($t)*);
        Err(MarkLogicError {
            code: crate::error::MarkLogicErrorCode::IllegalArgument,
            message: format!("{} ({})", m, crate::error::sdk_version()),
        })
    }};
}

pub(crate) use ia_err;

// Same as ia_err, but with an explicit error code.
macro_rules! ml_err {
    ($code:ident, $($t:tt)*) => {{
        let m = format!($($t)*);
        Err(MarkLogicError {
            code: crate::error::MarkLogicErrorCode::$code,
            message: format!("{} ({})", m, crate::error::sdk_version()),
        })
    }};
}

pub(crate) use ml_err;

impl From<reqwest::Error> for MarkLogicError {
    fn from(e: reqwest::Error) -> Self {
        let mut code = MarkLogicErrorCode::TransportError;
        if e.is_timeout() {
            code = MarkLogicErrorCode::RequestTimeout;
        }
        MarkLogicError {
            code: code,
            message: format!(
                "reqwest error: {} ({})",
                e.to_string(),
                crate::error::sdk_version()
            ),
        }
    }
}

impl From<reqwest::header::InvalidHeaderValue> for MarkLogicError {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        ia_error!("invalid header value: {}", e.to_string())
    }
}

impl From<url::ParseError> for MarkLogicError {
    fn from(e: url::ParseError) -> Self {
        ia_error!("error parsing url: {}", e.to_string())
    }
}

impl From<chrono::ParseError> for MarkLogicError {
    fn from(e: chrono::ParseError) -> Self {
        MarkLogicError {
            code: MarkLogicErrorCode::InvalidTimestamp,
            message: format!(
                "invalid datetime value: {} ({})",
                e.to_string(),
                crate::error::sdk_version()
            ),
        }
    }
}

impl From<serde_json::Error> for MarkLogicError {
    fn from(e: serde_json::Error) -> Self {
        MarkLogicError {
            code: MarkLogicErrorCode::MalformedPayload,
            message: format!(
                "json error: {} ({})",
                e.to_string(),
                crate::error::sdk_version()
            ),
        }
    }
}

impl From<quick_xml::de::DeError> for MarkLogicError {
    fn from(e: quick_xml::de::DeError) -> Self {
        MarkLogicError {
            code: MarkLogicErrorCode::MalformedPayload,
            message: format!(
                "xml error: {} ({})",
                e.to_string(),
                crate::error::sdk_version()
            ),
        }
    }
}

impl From<quick_xml::se::SeError> for MarkLogicError {
    fn from(e: quick_xml::se::SeError) -> Self {
        ia_error!("cannot write xml: {}", e.to_string())
    }
}

impl From<quick_xml::Error> for MarkLogicError {
    fn from(e: quick_xml::Error) -> Self {
        MarkLogicError {
            code: MarkLogicErrorCode::MalformedPayload,
            message: format!(
                "xml error: {} ({})",
                e.to_string(),
                crate::error::sdk_version()
            ),
        }
    }
}

impl From<std::io::Error> for MarkLogicError {
    fn from(e: std::io::Error) -> Self {
        MarkLogicError {
            code: MarkLogicErrorCode::IoError,
            message: format!(
                "io error: {} ({})",
                e.to_string(),
                crate::error::sdk_version()
            ),
        }
    }
}

// MarkLogicErrorCode represents the error code.
// Error codes are divided into categories as follows:
//
// 1. Error codes for caller errors and payload problems, range from 1 to 50(exclusive).
// These include illegal arguments, formats a handle cannot speak, bytes that
// are not in the expected format, and unparseable values.
//
// 2. Error codes returned by the server, range from 50 to 100(exclusive).
//
// 3. Error codes for transport issues, range from 100 to 125(exclusive).
//
// 4. Anything else, from 125.
//
#[derive(Debug, Clone, Copy, Eq, PartialEq, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum MarkLogicErrorCode {
    /// NoError represents there is no error.
    NoError = 0,

    /// IllegalArgument error represents the application provided an illegal
    /// argument for the operation.
    IllegalArgument = 1,

    /// UnsupportedFormat error represents a handle was asked to use a wire
    /// format that its value type has no codec for, for example a
    /// [`RestartResponse`](crate::RestartResponse) in JSON.
    UnsupportedFormat = 2,

    /// FormatMismatch error represents a handle was given bytes that are not
    /// in its configured format, for example JSON bytes passed to an XML handle.
    /// The handle's value is left unchanged.
    FormatMismatch = 3,

    /// MalformedPayload error represents bytes in the right format that could
    /// not be decoded into the handle's value: bad syntax, a missing field, the
    /// wrong root element or namespace.
    MalformedPayload = 4,

    /// InvalidTimestamp error represents a timestamp that could not be parsed
    /// by the RFC 3339 parser or by any of the fallback parsers.
    InvalidTimestamp = 5,

    /// UnexpectedStatus error represents the server answered with a non-success
    /// http status. The message carries the status and the response text.
    UnexpectedStatus = 50,

    /// InvalidAuthorization error represents the server rejected the credentials
    /// (http status 401), after any digest challenge has been answered.
    InvalidAuthorization = 51,

    /// RequestTimeout error represents the request did not complete when the
    /// configured timeout elapsed.
    RequestTimeout = 100,

    /// TransportError represents a failure building, sending or reading an
    /// http request. It is never retried by this library.
    TransportError = 101,

    /// IoError represents a local i/o failure, such as reading a configuration
    /// or certificate file.
    IoError = 102,

    /// UnknownError represents an unknown error has occurred.
    UnknownError = 125,
}
