//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use std::borrow::Cow;
use tracing::trace;

use crate::error::MarkLogicError;
use crate::format::Format;

/// The serialization contract shared by every handle.
///
/// A handle owns three things: the [`Format`] it speaks, a buffer holding the
/// last wire bytes it read or wrote, and the in-memory value those bytes
/// decode to. The value type is fixed per handle through [`Handle::Value`], so
/// handing a handle a value of the wrong shape does not compile.
///
/// Handles are plain owned values; `decode` and `encode` take `&mut self`, so a
/// handle is never decoded into from two places at once.
pub trait Handle {
    /// What [`encode`](Handle::encode) accepts.
    type Value;

    /// The format this handle was built with.
    fn format(&self) -> Format;

    /// Replace the buffered bytes with `bytes` and decode them.
    ///
    /// If decoding fails the error is returned and the previously decoded
    /// value is kept.
    fn decode(&mut self, bytes: &[u8]) -> Result<(), MarkLogicError>;

    /// Store `value` and serialize it into the buffer.
    fn encode(&mut self, value: Self::Value) -> Result<(), MarkLogicError>;

    /// Serialize the stored value again and return the buffer as text.
    ///
    /// Calling this twice without a decode or encode in between returns the
    /// same string.
    fn serialized(&mut self) -> Result<String, MarkLogicError>;

    /// The buffered wire bytes.
    fn bytes(&self) -> &[u8];
}

/// Read the full body of `resp` and decode it into `handle`.
///
/// A body that cannot be read is reported as a transport error and leaves the
/// handle as it was.
pub async fn accept_response<H>(handle: &mut H, resp: reqwest::Response) -> Result<(), MarkLogicError>
where
    H: Handle + ?Sized,
{
    let body: bytes::Bytes = resp.bytes().await?;
    trace!(
        "accepting {} byte response as {}",
        body.len(),
        handle.format()
    );
    handle.decode(&body)
}

/// A handle that keeps payloads as opaque bytes.
///
/// Nothing is parsed: [`decode`](Handle::decode) copies the bytes into the
/// buffer and [`encode`](Handle::encode) stores the given bytes as they are.
/// The format only selects the `Accept` or `Content-Type` header when the
/// handle takes part in a request.
///
/// ```no_run
/// use marklogic_rust_sdk::{Format, Handle, RawHandle};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut body = RawHandle::new(Format::Json);
/// body.encode(br#"{"name":"value"}"#.to_vec())?;
/// assert_eq!(body.get(), r#"{"name":"value"}"#);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default, Clone)]
pub struct RawHandle {
    format: Format,
    buf: Vec<u8>,
}

impl RawHandle {
    pub fn new(format: Format) -> RawHandle {
        RawHandle {
            format,
            buf: Vec::new(),
        }
    }

    /// The buffered bytes as text. Invalid UTF-8 sequences are replaced.
    pub fn get(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.buf)
    }
}

impl Handle for RawHandle {
    type Value = Vec<u8>;

    fn format(&self) -> Format {
        self.format
    }

    fn decode(&mut self, bytes: &[u8]) -> Result<(), MarkLogicError> {
        self.buf.clear();
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    fn encode(&mut self, value: Vec<u8>) -> Result<(), MarkLogicError> {
        self.buf = value;
        Ok(())
    }

    fn serialized(&mut self) -> Result<String, MarkLogicError> {
        Ok(self.get().into_owned())
    }

    fn bytes(&self) -> &[u8] {
        &self.buf
    }
}
