//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::MarkLogicErrorCode;
use crate::format::Format;
use crate::handle::Handle;
use crate::map_handle::MapHandle;
use crate::timestamp::Timestamp;
use crate::types;
use crate::types::FieldValue;
use crate::types::ToFieldValue;
use std::error::Error;
use std::result::Result;

fn get_string(fv: &FieldValue) -> Option<&String> {
    if let FieldValue::String(s) = fv {
        Some(s)
    } else {
        None
    }
}

#[test]
fn test_basic_mapvalue() -> Result<(), Box<dyn Error>> {
    let mut m = types::MapValue::new();
    m.put_bool("boolval", true);
    m.put_i64("i64val", 123456789);
    m.put_float64("floatval", 2345.0023456);
    m.put_str("strval", "This is a string value");
    m.put_null("nullval");
    let mut arr = Vec::<FieldValue>::new();
    arr.push("array element 1".to_field_value());
    arr.push("array element 2".to_field_value());
    arr.push(12121212i64.to_field_value());
    m.put_array("arrval", arr);
    assert_eq!(m.get_bool("boolval").ok_or("boolval doesn't exist")?, true);
    assert_eq!(
        m.get_float64("floatval").ok_or("floatval doesn't exist")?,
        2345.0023456
    );
    assert_eq!(
        m.get_i64("i64val").ok_or("i64val doesn't exist")?,
        123456789
    );
    assert_eq!(
        m.get_string("strval").ok_or("strval doesn't exist")?,
        "This is a string value"
    );
    assert!(m.get_field_value("nullval").ok_or("nullval doesn't exist")?.is_null());
    let arr_result = m.get_array("arrval").ok_or("arrval doesn't exist")?;
    assert_eq!(arr_result.len(), 3);
    assert_eq!(
        get_string(&arr_result[0]).ok_or("arr[0] doesn't contain a string")?,
        "array element 1"
    );
    assert_eq!(arr_result[2].as_i64()?, 12121212);

    // insertion order is kept
    let keys: Vec<&String> = m.iter().map(|(k, _)| k).collect();
    assert_eq!(
        keys,
        vec!["boolval", "i64val", "floatval", "strval", "nullval", "arrval"]
    );
    Ok(())
}

#[test]
fn test_builder_style() -> Result<(), Box<dyn Error>> {
    let ts = Timestamp::parse("2013-06-18T08:11:29.188561-07:00")?;
    let m = types::MapValue::new()
        .str("name", "my-host")
        .i64("port", 7999)
        .bool("ssl", false)
        .column("started", &ts)
        .map("inner", types::MapValue::new().str("a", "b"));
    assert_eq!(m.len(), 5);
    assert_eq!(m.get_timestamp("started").ok_or("no timestamp")?, ts);
    assert_eq!(
        m.get_map("inner").ok_or("no inner")?.get_string("a"),
        Some("b".to_string())
    );
    assert_eq!(
        m.to_string(),
        r#"{"name":"my-host","port":7999,"ssl":false,"started":"2013-06-18T08:11:29.188561-07:00","inner":{"a":"b"}}"#
    );
    Ok(())
}

#[test]
fn test_string_accessors_parse() -> Result<(), Box<dyn Error>> {
    // XML leaves are strings; the typed getters read through them
    let m = types::MapValue::new()
        .str("bind-port", "7999")
        .str("enabled", "true")
        .str("ratio", "0.5");
    assert_eq!(m.get_i64("bind-port"), Some(7999));
    assert_eq!(m.get_bool("enabled"), Some(true));
    assert_eq!(m.get_float64("ratio"), Some(0.5));
    assert_eq!(m.get_i64("enabled"), None);
    Ok(())
}

#[test]
fn test_take_field_value() -> Result<(), Box<dyn Error>> {
    let mut m = types::MapValue::new().i64("a", 1).i64("b", 2).i64("c", 3);
    let b = m.take_field_value("b")?;
    assert_eq!(b.as_i64()?, 2);
    let keys: Vec<&String> = m.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["a", "c"]);
    let err = m.take_field_value("b").unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::IllegalArgument);
    Ok(())
}

#[test]
fn test_json_numbers_keep_digits() -> Result<(), Box<dyn Error>> {
    let mut h = MapHandle::new(Format::Json)?;
    let doc = r#"{"big":12345678901234567890123,"dec":0.10,"neg":-7}"#;
    h.decode(doc.as_bytes())?;
    let m = h.get().ok_or("no map")?;
    assert_eq!(m.get_i64("neg"), Some(-7));
    assert_eq!(m.get_i64("big"), None);
    assert_eq!(h.serialized()?, doc);
    Ok(())
}

#[test]
fn test_map_handle_json() -> Result<(), Box<dyn Error>> {
    let doc = r#"{"host":{"version":"7.0","bind-port":7999,"ssl":true,"groups":["Default","Eval"],"cert":null}}"#;
    let mut h = MapHandle::new(Format::Json)?;
    assert!(h.get().is_none());
    h.decode(doc.as_bytes())?;
    let host = h
        .get()
        .and_then(|m| m.get_map("host"))
        .ok_or("no host")?;
    assert_eq!(host.get_string("version"), Some("7.0".to_string()));
    assert_eq!(host.get_i64("bind-port"), Some(7999));
    assert_eq!(host.get_bool("ssl"), Some(true));
    assert_eq!(host.get_array("groups").ok_or("no groups")?.len(), 2);
    assert!(host.get_field_value("cert").ok_or("no cert")?.is_null());
    assert_eq!(h.serialized()?, doc);
    assert_eq!(h.serialized()?, doc);

    let err = h.decode(b"[1,2,3]").unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::MalformedPayload);
    let err = h.decode(b"<host/>").unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::FormatMismatch);
    // still the first document
    assert_eq!(h.serialized()?, doc);
    Ok(())
}

#[test]
fn test_map_handle_xml() -> Result<(), Box<dyn Error>> {
    let doc = r#"<host xmlns="http://marklogic.com/manage" id="1"><version>7.0</version><group>Default</group><group>Eval</group><ssl-certificate/><note lang="en">hello</note></host>"#;
    let mut h = MapHandle::new(Format::Xml)?;
    h.decode(doc.as_bytes())?;
    let m = h.get().ok_or("no map")?;
    assert_eq!(m.len(), 1);
    let host = m.get_map("host").ok_or("no host")?;
    assert_eq!(
        host.get_string("@xmlns"),
        Some("http://marklogic.com/manage".to_string())
    );
    assert_eq!(host.get_string("@id"), Some("1".to_string()));
    assert_eq!(host.get_string("version"), Some("7.0".to_string()));
    let groups = host.get_array("group").ok_or("no groups")?;
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[1].as_str(), Some("Eval"));
    assert!(host
        .get_field_value("ssl-certificate")
        .ok_or("no ssl-certificate")?
        .is_null());
    let note = host.get_map("note").ok_or("no note")?;
    assert_eq!(note.get_string("@lang"), Some("en".to_string()));
    assert_eq!(note.get_string("#text"), Some("hello".to_string()));

    // writing it back gives the same document
    assert_eq!(h.serialized()?, doc);
    Ok(())
}

#[test]
fn test_map_handle_xml_encode() -> Result<(), Box<dyn Error>> {
    let m = types::MapValue::new().map(
        "init",
        types::MapValue::new()
            .str("@xmlns", "http://marklogic.com/manage")
            .str("license-key", "1234-5678-90AB")
            .str("licensee", "Smith & Sons"),
    );
    let mut h = MapHandle::with_value(Format::Xml, m.clone())?;
    let text = h.serialized()?;
    assert_eq!(
        text,
        r#"<init xmlns="http://marklogic.com/manage"><license-key>1234-5678-90AB</license-key><licensee>Smith &amp; Sons</licensee></init>"#
    );

    let mut back = MapHandle::new(Format::Xml)?;
    back.decode(text.as_bytes())?;
    assert_eq!(back.get(), Some(&m));
    Ok(())
}

#[test]
fn test_map_handle_xml_errors() -> Result<(), Box<dyn Error>> {
    let two_roots = types::MapValue::new().str("a", "1").str("b", "2");
    let mut h = MapHandle::new(Format::Xml)?;
    let err = h.encode(two_roots).unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::IllegalArgument);

    let err = h.decode(b"<a><b></a>").unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::MalformedPayload);
    let err = h.decode(b"<a/><b/>").unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::MalformedPayload);
    let err = h.decode(br#"{"a":1}"#).unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::FormatMismatch);

    let err = MapHandle::new(Format::PlainText).unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::UnsupportedFormat);
    Ok(())
}

#[test]
fn test_rejected_encode_keeps_value() -> Result<(), Box<dyn Error>> {
    let good = types::MapValue::new().map("a", types::MapValue::new().str("b", "1"));
    let mut h = MapHandle::with_value(Format::Xml, good.clone())?;
    let written = h.serialized()?;

    let two_roots = types::MapValue::new().str("a", "1").str("b", "2");
    let err = h.encode(two_roots).unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::IllegalArgument);
    assert_eq!(h.get(), Some(&good));
    assert_eq!(h.bytes(), written.as_bytes());
    assert_eq!(h.serialized()?, written);

    let mut empty = MapHandle::new(Format::Xml)?;
    let mut array_root = types::MapValue::new();
    array_root.put_array("x", vec!["1".to_field_value()]);
    let err = empty.encode(array_root).unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::IllegalArgument);
    assert!(empty.get().is_none());
    assert!(empty.bytes().is_empty());
    Ok(())
}

#[test]
fn test_xml_text_is_trimmed() -> Result<(), Box<dyn Error>> {
    let doc = "<a>\n  <v>\n 7.0\n</v>\n  <w id=\"1\"> 7.0 </w>\n  <e>   </e>\n</a>\n";
    let mut h = MapHandle::new(Format::Xml)?;
    h.decode(doc.as_bytes())?;
    let a = h
        .get()
        .and_then(|m| m.get_map("a"))
        .ok_or("no root")?;
    assert_eq!(a.get_string("v"), Some("7.0".to_string()));
    let w = a.get_map("w").ok_or("no w")?;
    assert_eq!(w.get_string("#text"), Some("7.0".to_string()));
    assert!(a.get_field_value("e").ok_or("no e")?.is_null());
    // indentation between children is not text of the parent
    assert!(!a.contains_key("#text"));
    Ok(())
}
