//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::MarkLogicErrorCode;
use crate::format::Format;
use crate::handle::{Handle, RawHandle};
use crate::init_request::{InitHandle, InitializeProperties};
use crate::instance_admin_request::{InstanceAdminHandle, InstanceAdminProperties};
use crate::restart::{RestartResponse, RestartResponseHandle};
use crate::server_config_request::{ServerConfigResponse, ServerConfigResponseHandle};
use crate::timestamp::Timestamp;
use crate::timestamp_request::TimestampResponseHandle;
use std::error::Error;
use std::result::Result;

const SERVER_CONFIG_XML: &str = r#"<host xmlns="http://marklogic.com/manage"><timestamp>2013-06-18T08:11:29.188561-07:00</timestamp><version>7.0</version><platform>linux</platform><edition>Essential Enterprise</edition><host-id>4808503609057420751</host-id><host-name>my-host.marklogic.com</host-name><bind-port>7999</bind-port><connect-port>7996</connect-port><foreign-bind-port>7998</foreign-bind-port><foreign-connect-port>7997</foreign-connect-port><ssl-certificate>...elided...</ssl-certificate></host>"#;

const RESTART_XML: &str = r#"<restart xmlns="http://marklogic.com/manage"><last-startup host-id="13544732455686476949">2013-04-01T10:35:19.09913-07:00</last-startup><link><kindref>timestamp</kindref><uriref>/admin/v1/timestamp</uriref></link><message>Check for new timestamp to verify host restart.</message></restart>"#;

fn want_server_config() -> Result<ServerConfigResponse, Box<dyn Error>> {
    Ok(ServerConfigResponse {
        timestamp: Timestamp::parse("2013-06-18T08:11:29.188561-07:00")?,
        version: "7.0".to_string(),
        platform: "linux".to_string(),
        edition: "Essential Enterprise".to_string(),
        host_id: "4808503609057420751".to_string(),
        host_name: "my-host.marklogic.com".to_string(),
        bind_port: 7999,
        connect_port: 7996,
        foreign_bind_port: 7998,
        foreign_connect_port: 7997,
        ssl_certificate: "...elided...".to_string(),
    })
}

#[test]
fn test_server_config_xml() -> Result<(), Box<dyn Error>> {
    let mut h = ServerConfigResponseHandle::new(Format::Xml)?;
    assert_eq!(h.format(), Format::Xml);
    h.decode(SERVER_CONFIG_XML.as_bytes())?;
    assert_eq!(h.get(), &want_server_config()?);
    assert_eq!(h.get().version, "7.0");
    assert_eq!(h.get().bind_port, 7999);
    assert_eq!(h.get().edition, "Essential Enterprise");
    assert_eq!(h.bytes(), SERVER_CONFIG_XML.as_bytes());
    Ok(())
}

#[test]
fn test_server_config_reencode() -> Result<(), Box<dyn Error>> {
    let mut h = ServerConfigResponseHandle::new(Format::Xml)?;
    h.decode(SERVER_CONFIG_XML.as_bytes())?;
    let first = h.serialized()?;
    let second = h.serialized()?;
    assert_eq!(first, second);
    assert!(first.starts_with(r#"<host xmlns="http://marklogic.com/manage">"#));

    // what we wrote reads back to the same record
    let mut again = ServerConfigResponseHandle::new(Format::Xml)?;
    again.decode(first.as_bytes())?;
    assert_eq!(again.get(), h.get());
    Ok(())
}

#[test]
fn test_server_config_json() -> Result<(), Box<dyn Error>> {
    let want = want_server_config()?;
    let mut h = ServerConfigResponseHandle::with_value(Format::Json, want.clone())?;
    let text = h.serialized()?;
    assert!(text.contains(r#""bind-port":7999"#));
    assert!(text.contains(r#""timestamp":"2013-06-18T08:11:29.188561-07:00""#));

    let mut back = ServerConfigResponseHandle::new(Format::Json)?;
    back.decode(text.as_bytes())?;
    assert_eq!(back.into_record(), want);
    Ok(())
}

#[test]
fn test_format_gating() -> Result<(), Box<dyn Error>> {
    let mut h = ServerConfigResponseHandle::new(Format::Xml)?;
    h.decode(SERVER_CONFIG_XML.as_bytes())?;

    let json = br#"{"version":"8.0","bind-port":1}"#;
    let err = h.decode(json).unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::FormatMismatch);
    // the previous record survives
    assert_eq!(h.get(), &want_server_config()?);
    // and the buffer holds what was passed in
    assert_eq!(h.bytes(), json);

    let mut jh = ServerConfigResponseHandle::new(Format::Json)?;
    let err = jh.decode(SERVER_CONFIG_XML.as_bytes()).unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::FormatMismatch);
    assert_eq!(jh.get(), &ServerConfigResponse::default());

    let mut th = TimestampResponseHandle::new(Format::PlainText)?;
    let err = th.decode(SERVER_CONFIG_XML.as_bytes()).unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::FormatMismatch);
    Ok(())
}

#[test]
fn test_unsupported_formats() {
    let err = RestartResponseHandle::new(Format::Json).unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::UnsupportedFormat);
    assert!(err.message.contains("RestartResponse"));

    let err = TimestampResponseHandle::new(Format::Xml).unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::UnsupportedFormat);

    let err = ServerConfigResponseHandle::new(Format::PlainText).unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::UnsupportedFormat);

    let err = InitHandle::new(Format::PlainText).unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::UnsupportedFormat);
}

#[test]
fn test_wrong_document() -> Result<(), Box<dyn Error>> {
    let mut h = ServerConfigResponseHandle::new(Format::Xml)?;
    let err = h.decode(RESTART_XML.as_bytes()).unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::MalformedPayload);

    let other_ns = SERVER_CONFIG_XML.replace("http://marklogic.com/manage", "urn:other");
    let err = h.decode(other_ns.as_bytes()).unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::MalformedPayload);

    let no_ns = SERVER_CONFIG_XML.replace(r#" xmlns="http://marklogic.com/manage""#, "");
    let err = h.decode(no_ns.as_bytes()).unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::MalformedPayload);

    let err = h.decode(b"<host xmlns=\"http://marklogic.com/manage\"><version>").unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::MalformedPayload);

    let bad_time = SERVER_CONFIG_XML.replace("2013-06-18T08:11:29.188561-07:00", "last tuesday");
    let err = h.decode(bad_time.as_bytes()).unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::MalformedPayload);
    assert!(err.message.contains("last tuesday"));

    assert_eq!(h.get(), &ServerConfigResponse::default());
    Ok(())
}

#[test]
fn test_plain_text_timestamp() -> Result<(), Box<dyn Error>> {
    let body = "2013-05-15T10:35:38.932514-07:00";
    let mut h = TimestampResponseHandle::new(Format::PlainText)?;
    assert_eq!(h.get(), &Timestamp::default());
    h.decode(format!("{}\n", body).as_bytes())?;
    assert_eq!(h.get(), &Timestamp::parse(body)?);
    assert_eq!(h.serialized()?, body);

    let err = h.decode(b"garbage").unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::InvalidTimestamp);
    assert_eq!(h.get(), &Timestamp::parse(body)?);
    Ok(())
}

#[test]
fn test_restart() -> Result<(), Box<dyn Error>> {
    let mut h = RestartResponseHandle::new(Format::Xml)?;
    h.decode(RESTART_XML.as_bytes())?;
    let r: &RestartResponse = h.get();
    assert_eq!(r.last_startup.host_id, "13544732455686476949");
    assert_eq!(
        r.last_startup.value,
        Timestamp::parse("2013-04-01T10:35:19.09913-07:00")?
    );
    assert_eq!(r.link.kindref, "timestamp");
    assert_eq!(r.link.uriref, "/admin/v1/timestamp");
    assert_eq!(r.message, "Check for new timestamp to verify host restart.");

    let text = h.serialized()?;
    assert!(text.contains(r#"<last-startup host-id="13544732455686476949">"#));
    let mut back = RestartResponseHandle::new(Format::Xml)?;
    back.decode(text.as_bytes())?;
    assert_eq!(back.get(), h.get());
    Ok(())
}

#[test]
fn test_get_mut_changes_serialized() -> Result<(), Box<dyn Error>> {
    let mut h = ServerConfigResponseHandle::new(Format::Xml)?;
    h.decode(SERVER_CONFIG_XML.as_bytes())?;
    h.get_mut().bind_port = 8999;
    let text = h.serialized()?;
    assert!(text.contains("<bind-port>8999</bind-port>"));
    Ok(())
}

#[test]
fn test_request_bodies() -> Result<(), Box<dyn Error>> {
    let init = InitHandle::with_value(
        Format::Xml,
        InitializeProperties {
            license_key: "1234-5678-90AB".to_string(),
            licensee: "Your Licensee".to_string(),
        },
    )?;
    assert_eq!(
        String::from_utf8(init.bytes().to_vec())?,
        r#"<init xmlns="http://marklogic.com/manage"><license-key>1234-5678-90AB</license-key><licensee>Your Licensee</licensee></init>"#
    );

    let mut admin = InstanceAdminHandle::new(Format::Json)?;
    admin.encode(InstanceAdminProperties {
        admin_username: "admin".to_string(),
        admin_password: "password".to_string(),
        realm: "public".to_string(),
    })?;
    assert_eq!(
        admin.serialized()?,
        r#"{"admin-username":"admin","admin-password":"password","realm":"public"}"#
    );
    Ok(())
}

#[test]
fn test_raw_handle() -> Result<(), Box<dyn Error>> {
    let mut h = RawHandle::new(Format::Json);
    assert_eq!(h.get(), "");
    h.decode(SERVER_CONFIG_XML.as_bytes())?;
    assert_eq!(h.get(), SERVER_CONFIG_XML);
    assert_eq!(h.serialized()?, SERVER_CONFIG_XML);

    h.encode(b"{\"a\":1}".to_vec())?;
    assert_eq!(h.bytes(), b"{\"a\":1}");
    assert_eq!(h.serialized()?, h.serialized()?);
    assert_eq!(h.format(), Format::Json);
    Ok(())
}

#[test]
fn test_handles_as_trait_objects() -> Result<(), Box<dyn Error>> {
    let mut handles: Vec<Box<dyn Handle<Value = Vec<u8>>>> = vec![
        Box::new(RawHandle::new(Format::Xml)),
        Box::new(RawHandle::new(Format::PlainText)),
    ];
    for h in handles.iter_mut() {
        h.decode(b"abc")?;
        assert_eq!(h.bytes(), b"abc");
    }
    Ok(())
}

#[test]
fn test_format_values() -> Result<(), Box<dyn Error>> {
    assert_eq!(Format::from_int(0)?, Format::Xml);
    assert_eq!(Format::from_int(1)?, Format::Json);
    assert_eq!(Format::from_int(2)?, Format::PlainText);
    let err = Format::from_int(7).unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::IllegalArgument);
    assert_eq!(i32::from(Format::PlainText), 2);
    assert_eq!(Format::default(), Format::Xml);
    assert_eq!(Format::Json.mime_type(), "application/json");
    assert_eq!(Format::PlainText.to_string(), "text");
    Ok(())
}

#[test]
fn test_wrong_shape_is_an_error() -> Result<(), Box<dyn Error>> {
    let want = want_server_config()?;
    let mut jh = ServerConfigResponseHandle::with_value(Format::Json, want.clone())?;
    let good = jh.serialized()?;
    jh.decode(good.as_bytes())?;

    let wrapped = format!(r#"{{"host":{}}}"#, good);
    for doc in [
        wrapped.as_str(),
        r#"{"restart":{"message":"Check for new timestamp"}}"#,
        r#"{}"#,
        r#"{"version":"7.0"}"#,
    ] {
        let err = jh.decode(doc.as_bytes()).unwrap_err();
        assert_eq!(err.code, MarkLogicErrorCode::MalformedPayload, "json {}", doc);
        assert_eq!(jh.get(), &want);
    }

    let mut xh = ServerConfigResponseHandle::new(Format::Xml)?;
    xh.decode(SERVER_CONFIG_XML.as_bytes())?;
    for doc in [
        r#"<host xmlns="http://marklogic.com/manage"/>"#,
        r#"<host xmlns="http://marklogic.com/manage"><restart>now</restart></host>"#,
    ] {
        let err = xh.decode(doc.as_bytes()).unwrap_err();
        assert_eq!(err.code, MarkLogicErrorCode::MalformedPayload, "xml {}", doc);
        assert_eq!(xh.get(), &want);
    }

    let mut init = InitHandle::new(Format::Json)?;
    let err = init.decode(br#"{"licenseKey":"abc"}"#).unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::MalformedPayload);
    assert_eq!(init.get(), &InitializeProperties::default());

    let mut restart = RestartResponseHandle::new(Format::Xml)?;
    let err = restart
        .decode(br#"<restart xmlns="http://marklogic.com/manage"><message>hi</message></restart>"#)
        .unwrap_err();
    assert_eq!(err.code, MarkLogicErrorCode::MalformedPayload);
    Ok(())
}

#[test]
fn test_optional_fields_may_be_absent() -> Result<(), Box<dyn Error>> {
    let no_cert = SERVER_CONFIG_XML
        .replace("<ssl-certificate>...elided...</ssl-certificate>", "")
        .replace("<foreign-bind-port>7998</foreign-bind-port>", "");
    let mut h = ServerConfigResponseHandle::new(Format::Xml)?;
    h.decode(no_cert.as_bytes())?;
    assert_eq!(h.get().ssl_certificate, "");
    assert_eq!(h.get().foreign_bind_port, 0);
    assert_eq!(h.get().foreign_connect_port, 7997);

    let mut admin = InstanceAdminHandle::new(Format::Json)?;
    admin.decode(br#"{"admin-username":"admin","admin-password":"pw"}"#)?;
    assert_eq!(admin.get().realm, "");
    Ok(())
}
