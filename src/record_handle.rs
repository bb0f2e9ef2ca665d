//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use std::fmt::Debug;
use tracing::trace;

use crate::codec::Codec;
use crate::error::MarkLogicError;
use crate::format::Format;
use crate::handle::Handle;

/// A value type that a [`RecordHandle`] can hold.
///
/// Implementations say which formats the type can be read and written in by
/// returning a codec for them, and an
/// [`UnsupportedFormat`](crate::MarkLogicErrorCode::UnsupportedFormat) error
/// for the rest.
pub trait Record: Default + Debug + Sized + 'static {
    fn codec(format: Format) -> Result<Box<dyn Codec<Self>>, MarkLogicError>;
}

/// A handle over a typed record.
///
/// The codec is picked from the format when the handle is built, so a handle
/// only ever reads and writes that one format. Decoding bytes in another
/// format fails with
/// [`FormatMismatch`](crate::MarkLogicErrorCode::FormatMismatch).
///
/// Per-endpoint handles such as
/// [`ServerConfigResponseHandle`](crate::ServerConfigResponseHandle) are
/// aliases of this type.
#[derive(Debug)]
pub struct RecordHandle<R: Record> {
    buf: Vec<u8>,
    codec: Box<dyn Codec<R>>,
    record: R,
}

impl<R: Record> RecordHandle<R> {
    /// Create an empty handle for `format`.
    ///
    /// Fails with `UnsupportedFormat` if `R` has no codec for `format`.
    pub fn new(format: Format) -> Result<RecordHandle<R>, MarkLogicError> {
        Ok(RecordHandle {
            buf: Vec::new(),
            codec: R::codec(format)?,
            record: R::default(),
        })
    }

    /// Create a handle for `format` holding `record`, typically a request body.
    pub fn with_value(format: Format, record: R) -> Result<RecordHandle<R>, MarkLogicError> {
        let mut h = RecordHandle::new(format)?;
        h.encode(record)?;
        Ok(h)
    }

    pub fn get(&self) -> &R {
        &self.record
    }

    /// Mutable access to the record. Changes show up in the next
    /// [`serialized()`](Handle::serialized).
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.record
    }

    pub fn into_record(self) -> R {
        self.record
    }
}

impl<R: Record> Handle for RecordHandle<R> {
    type Value = R;

    fn format(&self) -> Format {
        self.codec.format()
    }

    fn decode(&mut self, bytes: &[u8]) -> Result<(), MarkLogicError> {
        self.buf.clear();
        self.buf.extend_from_slice(bytes);
        let record = self.codec.decode(&self.buf)?;
        trace!("decoded {:?}", record);
        self.record = record;
        Ok(())
    }

    fn encode(&mut self, value: R) -> Result<(), MarkLogicError> {
        self.record = value;
        self.buf.clear();
        self.codec.encode(&self.record, &mut self.buf)
    }

    fn serialized(&mut self) -> Result<String, MarkLogicError> {
        self.buf.clear();
        self.codec.encode(&self.record, &mut self.buf)?;
        Ok(String::from_utf8_lossy(&self.buf).into_owned())
    }

    fn bytes(&self) -> &[u8] {
        &self.buf
    }
}
