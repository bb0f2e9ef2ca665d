//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Wire codecs used by [`RecordHandle`](crate::RecordHandle).
//!
//! There is exactly one codec per [`Format`]. Each one speaks only its own
//! format and rejects bytes in any other format with
//! [`FormatMismatch`](crate::MarkLogicErrorCode::FormatMismatch).
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Display};
use std::str::FromStr;

use crate::error::{ia_err, ml_err, MarkLogicError};
use crate::format::Format;

/// Namespace of all MarkLogic management API documents.
pub const MANAGE_NAMESPACE: &str = "http://marklogic.com/manage";

/// Decodes bytes of one wire format into `T`, and encodes `T` back.
pub trait Codec<T>: Debug + Send + Sync {
    /// The one format this codec reads and writes.
    fn format(&self) -> Format;
    /// Decode a complete payload.
    fn decode(&self, bytes: &[u8]) -> Result<T, MarkLogicError>;
    /// Append the encoding of `value` to `buf`.
    fn encode(&self, value: &T, buf: &mut Vec<u8>) -> Result<(), MarkLogicError>;
}

/// Root element name and namespace of a type written as an XML document.
pub trait XmlElement {
    const ELEMENT: &'static str;
    const NAMESPACE: &'static str = MANAGE_NAMESPACE;
}

/// XML through `quick-xml`'s serde support.
///
/// The root element must have the local name and namespace declared by
/// [`XmlElement`]. Attributes map to
/// fields renamed `@name`, element text to a field renamed `$text`.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlCodec;

/// JSON through `serde_json`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

/// A single value written as text, parsed with [`FromStr`] and written with
/// [`Display`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TextCodec;

impl<T> Codec<T> for XmlCodec
where
    T: XmlElement + Serialize + DeserializeOwned,
{
    fn format(&self) -> Format {
        Format::Xml
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, MarkLogicError> {
        let text = payload_text(bytes, Format::Xml)?;
        check_root(text, T::ELEMENT, T::NAMESPACE)?;
        Ok(quick_xml::de::from_str(text)?)
    }

    fn encode(&self, value: &T, buf: &mut Vec<u8>) -> Result<(), MarkLogicError> {
        let doc = quick_xml::se::to_string_with_root(T::ELEMENT, value)?;
        // the serializer has no notion of namespaces: declare the default
        // namespace on the root start tag it wrote
        let start = format!("<{}", T::ELEMENT);
        match doc.strip_prefix(&start) {
            Some(rest) => {
                buf.extend_from_slice(start.as_bytes());
                buf.extend_from_slice(format!(" xmlns=\"{}\"", T::NAMESPACE).as_bytes());
                buf.extend_from_slice(rest.as_bytes());
                Ok(())
            }
            None => ia_err!(
                "xml serializer did not start the document with <{}>",
                T::ELEMENT
            ),
        }
    }
}

impl<T> Codec<T> for JsonCodec
where
    T: Serialize + DeserializeOwned,
{
    fn format(&self) -> Format {
        Format::Json
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, MarkLogicError> {
        let text = payload_text(bytes, Format::Json)?;
        Ok(serde_json::from_str(text)?)
    }

    fn encode(&self, value: &T, buf: &mut Vec<u8>) -> Result<(), MarkLogicError> {
        serde_json::to_writer(buf, value)?;
        Ok(())
    }
}

impl<T> Codec<T> for TextCodec
where
    T: FromStr<Err = MarkLogicError> + Display,
{
    fn format(&self) -> Format {
        Format::PlainText
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, MarkLogicError> {
        let text = payload_text(bytes, Format::PlainText)?;
        text.parse::<T>()
    }

    fn encode(&self, value: &T, buf: &mut Vec<u8>) -> Result<(), MarkLogicError> {
        buf.extend_from_slice(value.to_string().as_bytes());
        Ok(())
    }
}

/// The error for a value type that has no codec for `format`.
pub fn unsupported<T>(format: Format) -> Result<Box<dyn Codec<T>>, MarkLogicError> {
    let name = std::any::type_name::<T>();
    let short = name.rsplit("::").next().unwrap_or(name);
    ml_err!(UnsupportedFormat, "{} cannot be read or written as {}", short, format)
}

// Check the payload is UTF-8 text that looks like `format`, and return it
// without a leading byte order mark or whitespace.
pub(crate) fn payload_text(bytes: &[u8], format: Format) -> Result<&str, MarkLogicError> {
    let text = match std::str::from_utf8(bytes) {
        Ok(t) => t,
        Err(e) => {
            return ml_err!(MalformedPayload, "payload is not valid UTF-8: {}", e);
        }
    };
    let body = text.trim_start_matches('\u{feff}').trim_start();
    let looks_right = match format {
        Format::Xml => body.starts_with('<'),
        Format::Json => body.starts_with('{') || body.starts_with('['),
        Format::PlainText => !(body.starts_with('<') || body.starts_with('{')),
    };
    if !looks_right {
        let preview: String = body.chars().take(40).collect();
        return ml_err!(FormatMismatch, "payload is not {}: '{}'", format, preview);
    }
    Ok(body)
}

fn check_root(text: &str, element: &str, namespace: &str) -> Result<(), MarkLogicError> {
    let mut reader = Reader::from_str(text);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                let local = e.local_name();
                if local.as_ref() != element.as_bytes() {
                    return ml_err!(
                        MalformedPayload,
                        "expected root element <{}>, found <{}>",
                        element,
                        String::from_utf8_lossy(local.as_ref())
                    );
                }
                let ns_attr = match e.name().prefix() {
                    Some(p) => format!("xmlns:{}", String::from_utf8_lossy(p.as_ref())),
                    None => "xmlns".to_string(),
                };
                for attr in e.attributes() {
                    let attr = attr.map_err(quick_xml::Error::from)?;
                    if attr.key.as_ref() != ns_attr.as_bytes() {
                        continue;
                    }
                    let ns = attr.unescape_value()?;
                    if ns != namespace {
                        return ml_err!(
                            MalformedPayload,
                            "root element <{}> is in namespace '{}', expected '{}'",
                            element,
                            ns,
                            namespace
                        );
                    }
                    return Ok(());
                }
                return ml_err!(
                    MalformedPayload,
                    "root element <{}> has no namespace, expected '{}'",
                    element,
                    namespace
                );
            }
            Event::Eof => {
                return ml_err!(MalformedPayload, "xml payload has no root element");
            }
            _ => {}
        }
    }
}
