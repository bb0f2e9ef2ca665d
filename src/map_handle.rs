//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use tracing::trace;

use crate::codec::{payload_text, unsupported};
use crate::error::{ia_err, ml_err, MarkLogicError};
use crate::format::Format;
use crate::handle::Handle;
use crate::types::MapValue;
use crate::xml_map::{map_to_xml, xml_to_map};

/// A handle that decodes payloads into a generic [`MapValue`].
///
/// Use it for endpoints that have no typed record. JSON objects map one to
/// one. An XML document becomes a map with a single entry named after the
/// root element, whose value holds attributes as `@name` entries, child
/// elements by local name (repeated ones as arrays) and mixed text as
/// `#text`. Text is trimmed, and an element with only whitespace reads as
/// null.
///
/// ```no_run
/// use marklogic_rust_sdk::{Format, Handle, MapHandle};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut h = MapHandle::new(Format::Xml)?;
/// h.decode(br#"<host xmlns="http://marklogic.com/manage"><version>7.0</version></host>"#)?;
/// let host = h.get().and_then(|m| m.get_map("host")).ok_or("no host")?;
/// assert_eq!(host.get_string("version"), Some("7.0".to_string()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default, Clone)]
pub struct MapHandle {
    format: Format,
    buf: Vec<u8>,
    value: Option<MapValue>,
}

impl MapHandle {
    /// Create an empty handle. Only XML and JSON are supported.
    pub fn new(format: Format) -> Result<MapHandle, MarkLogicError> {
        if format == Format::PlainText {
            unsupported::<MapValue>(format)?;
        }
        Ok(MapHandle {
            format,
            buf: Vec::new(),
            value: None,
        })
    }

    /// Create a handle holding `value`.
    pub fn with_value(format: Format, value: MapValue) -> Result<MapHandle, MarkLogicError> {
        let mut h = MapHandle::new(format)?;
        h.encode(value)?;
        Ok(h)
    }

    /// The decoded or encoded map, if there is one yet.
    pub fn get(&self) -> Option<&MapValue> {
        self.value.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut MapValue> {
        self.value.as_mut()
    }

    pub fn take(&mut self) -> Option<MapValue> {
        self.value.take()
    }
}

// Write `value` in `format` to `buf`. Nothing is written on error.
fn write_map(format: Format, value: &MapValue, buf: &mut Vec<u8>) -> Result<(), MarkLogicError> {
    let mut out = Vec::new();
    match format {
        Format::Json => serde_json::to_writer(&mut out, &value.to_json_value()?)?,
        Format::Xml => map_to_xml(value, &mut out)?,
        Format::PlainText => return ia_err!("map handle cannot write text"),
    }
    *buf = out;
    Ok(())
}

impl Handle for MapHandle {
    type Value = MapValue;

    fn format(&self) -> Format {
        self.format
    }

    fn decode(&mut self, bytes: &[u8]) -> Result<(), MarkLogicError> {
        self.buf.clear();
        self.buf.extend_from_slice(bytes);
        let text = payload_text(&self.buf, self.format)?;
        let value = match self.format {
            Format::Json => {
                match serde_json::from_str(text)? {
                    serde_json::Value::Object(o) => MapValue::from_json_map(&o)?,
                    _ => return ml_err!(MalformedPayload, "json payload is not an object"),
                }
            }
            Format::Xml => xml_to_map(text)?,
            Format::PlainText => return ia_err!("map handle cannot read text"),
        };
        trace!("decoded map with {} top level entries", value.len());
        self.value = Some(value);
        Ok(())
    }

    /// The map is stored only if it can be written; a rejected map leaves
    /// the handle as it was.
    fn encode(&mut self, value: MapValue) -> Result<(), MarkLogicError> {
        write_map(self.format, &value, &mut self.buf)?;
        self.value = Some(value);
        Ok(())
    }

    fn serialized(&mut self) -> Result<String, MarkLogicError> {
        match &self.value {
            Some(v) => write_map(self.format, v, &mut self.buf)?,
            None => self.buf.clear(),
        }
        Ok(String::from_utf8_lossy(&self.buf).into_owned())
    }

    fn bytes(&self) -> &[u8] {
        &self.buf
    }
}
