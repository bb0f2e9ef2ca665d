//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
// Conversion between XML documents and MapValues:
//
//   <host xmlns="ns" id="1"><port>7999</port><port>7998</port><empty/></host>
//
// becomes
//
//   {"host": {"@xmlns": "ns", "@id": "1", "port": ["7999", "7998"], "empty": null}}
//
// Element keys are local names. Text next to attributes or child elements is
// kept under "#text". Element text is trimmed wherever it appears, and
// whitespace-only text counts as no text.
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Write;

use crate::error::{ia_err, ml_err, MarkLogicError};
use crate::types::{FieldValue, MapValue};

pub(crate) const TEXT_KEY: &str = "#text";

struct OpenElement {
    name: String,
    map: MapValue,
    text: String,
}

impl OpenElement {
    fn new(e: &BytesStart) -> Result<OpenElement, MarkLogicError> {
        let mut map = MapValue::new();
        for attr in e.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = format!("@{}", String::from_utf8_lossy(attr.key.as_ref()));
            let value = attr.unescape_value()?;
            map.put_str(&key, &value);
        }
        Ok(OpenElement {
            name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
            map,
            text: String::new(),
        })
    }

    fn into_value(mut self) -> FieldValue {
        let text = self.text.trim();
        if self.map.is_empty() {
            if text.is_empty() {
                return FieldValue::Null;
            }
            return FieldValue::String(text.to_string());
        }
        if !text.is_empty() {
            self.map.put_str(TEXT_KEY, text);
        }
        FieldValue::Map(self.map)
    }
}

pub(crate) fn xml_to_map(text: &str) -> Result<MapValue, MarkLogicError> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<(String, FieldValue)> = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(OpenElement::new(&e)?),
            Event::Empty(e) => {
                let el = OpenElement::new(&e)?;
                close_element(el, &mut stack, &mut root)?;
            }
            Event::End(_) => match stack.pop() {
                Some(el) => close_element(el, &mut stack, &mut root)?,
                None => return ml_err!(MalformedPayload, "unbalanced end tag in xml payload"),
            },
            Event::Text(t) => {
                let s = t.unescape()?;
                match stack.last_mut() {
                    Some(top) => top.text.push_str(&s),
                    None => {
                        if !s.trim().is_empty() {
                            return ml_err!(MalformedPayload, "text outside the root element");
                        }
                    }
                }
            }
            Event::CData(c) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    if let Some(el) = stack.last() {
        return ml_err!(MalformedPayload, "element <{}> is never closed", el.name);
    }
    match root {
        Some((name, value)) => {
            let mut m = MapValue::new();
            m.put_field_value(&name, value);
            Ok(m)
        }
        None => ml_err!(MalformedPayload, "xml payload has no root element"),
    }
}

fn close_element(
    el: OpenElement,
    stack: &mut Vec<OpenElement>,
    root: &mut Option<(String, FieldValue)>,
) -> Result<(), MarkLogicError> {
    let name = el.name.clone();
    let value = el.into_value();
    match stack.last_mut() {
        Some(parent) => {
            add_child(&mut parent.map, &name, value);
            Ok(())
        }
        None => {
            if root.is_some() {
                return ml_err!(MalformedPayload, "xml payload has more than one root element");
            }
            *root = Some((name, value));
            Ok(())
        }
    }
}

// Element values are never arrays, so an existing array means a repeated element.
fn add_child(map: &mut MapValue, name: &str, value: FieldValue) {
    match map.get_field_value_mut(name) {
        Some(FieldValue::Array(items)) => items.push(value),
        Some(existing) => {
            let first = std::mem::take(existing);
            *existing = FieldValue::Array(vec![first, value]);
        }
        None => map.put_field_value(name, value),
    }
}

pub(crate) fn map_to_xml(map: &MapValue, buf: &mut Vec<u8>) -> Result<(), MarkLogicError> {
    if map.len() != 1 {
        return ia_err!(
            "an xml document needs exactly one root entry, map has {}",
            map.len()
        );
    }
    let mut writer = Writer::new(buf);
    for (name, value) in map.iter() {
        if let FieldValue::Array(_) = value {
            return ia_err!("root entry '{}' of an xml document cannot be an array", name);
        }
        write_element(&mut writer, name, value)?;
    }
    Ok(())
}

fn write_element<W: Write>(
    w: &mut Writer<W>,
    name: &str,
    value: &FieldValue,
) -> Result<(), MarkLogicError> {
    match value {
        FieldValue::Array(items) => {
            for item in items {
                if let FieldValue::Array(_) = item {
                    return ia_err!("nested arrays under '{}' have no xml form", name);
                }
                write_element(w, name, item)?;
            }
        }
        FieldValue::Null => {
            w.write_event(Event::Empty(BytesStart::new(name)))?;
        }
        FieldValue::Map(m) => {
            let mut start = BytesStart::new(name);
            let mut text: Option<String> = None;
            let mut children: Vec<(&String, &FieldValue)> = Vec::new();
            for (k, v) in m.iter() {
                if let Some(attr) = k.strip_prefix('@') {
                    let attr_value = scalar_text(k, v)?;
                    start.push_attribute((attr, attr_value.as_str()));
                } else if k == TEXT_KEY {
                    text = Some(scalar_text(k, v)?);
                } else {
                    children.push((k, v));
                }
            }
            if children.is_empty() && text.is_none() {
                w.write_event(Event::Empty(start))?;
                return Ok(());
            }
            w.write_event(Event::Start(start))?;
            if let Some(t) = text {
                w.write_event(Event::Text(BytesText::new(&t)))?;
            }
            for (k, v) in children {
                write_element(w, k, v)?;
            }
            w.write_event(Event::End(BytesEnd::new(name)))?;
        }
        _ => {
            let text = scalar_text(name, value)?;
            w.write_event(Event::Start(BytesStart::new(name)))?;
            w.write_event(Event::Text(BytesText::new(&text)))?;
            w.write_event(Event::End(BytesEnd::new(name)))?;
        }
    }
    Ok(())
}

fn scalar_text(key: &str, value: &FieldValue) -> Result<String, MarkLogicError> {
    match value {
        FieldValue::String(s) => Ok(s.clone()),
        FieldValue::Number(n) => Ok(n.to_string()),
        FieldValue::Boolean(b) => Ok(b.to_string()),
        FieldValue::Null => Ok(String::new()),
        _ => ia_err!("'{}' must be a string, number or boolean to be written as xml text", key),
    }
}
