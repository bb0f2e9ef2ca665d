//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! MarkLogic Rust SDK
//!
//! This is a Rust client for the [MarkLogic](https://www.progress.com/marklogic) REST
//! and management APIs. It sends HTTP requests to well-known endpoints and converts
//! the XML, JSON or plain-text bodies they return into Rust values, and back.
//!
//! This SDK supplies and uses Rust `async` methods throughout, using the [tokio](https://crates.io/crates/tokio) runtime. There is currently no blocking support.
//!
//! The general flow for an application is:
//! - Create a [`ConnectionBuilder`] with all needed parameters
//! - Build a [`Client`] (REST API, `/v1`) or an [`AdminClient`] (management API, `/admin/v1`) from it,
//!   once, and share it throughout the application, across all threads
//! - Create a **handle** for each payload: it knows the wire [`Format`] and holds the decoded value
//! - Execute a request such as [`ServerConfigRequest`] or a generic [`RestRequest`] with the handle
//!
//! ## Simple Example
//! The following code builds an admin client from the current environment and prints the
//! configuration of the host it connects to.
//! ```no_run
//! use marklogic_rust_sdk::{AdminClient, Format, ServerConfigRequest, ServerConfigResponseHandle};
//! use std::error::Error;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn Error>> {
//!     let admin = AdminClient::builder()
//!         .from_environment()?
//!         .build_admin_client()?;
//!     let mut handle = ServerConfigResponseHandle::new(Format::Xml)?;
//!     ServerConfigRequest::new().execute(&admin, &mut handle).await?;
//!     println!("ServerConfig={:?}", handle.get());
//!     Ok(())
//! }
//! ```
//!
//! ## Handles
//!
//! Every handle implements the [`Handle`] trait: it has a [`Format`], a buffer with the
//! last bytes it read or wrote, and a decoded value. Three kinds are provided:
//!
//! | handle | value | formats |
//! | ------ | ----- | ------- |
//! | [`RawHandle`] | the bytes, untouched | any |
//! | [`MapHandle`] | a generic [`MapValue`](types::MapValue) | XML, JSON |
//! | [`RecordHandle<R>`] | a typed record `R` | those `R` supports |
//!
//! The typed handles for the admin endpoints are aliases of [`RecordHandle`]:
//!
//! | alias | record | formats |
//! | ----- | ------ | ------- |
//! | [`ServerConfigResponseHandle`] | [`ServerConfigResponse`] | XML, JSON |
//! | [`RestartResponseHandle`] | [`RestartResponse`] | XML |
//! | [`TimestampResponseHandle`] | [`Timestamp`] | plain text |
//! | [`InitHandle`] | [`InitializeProperties`] | XML, JSON |
//! | [`InstanceAdminHandle`] | [`InstanceAdminProperties`] | XML, JSON |
//!
//! A handle only ever speaks the format it was created with. Creating one for a format
//! its record does not support fails with [`UnsupportedFormat`](MarkLogicErrorCode::UnsupportedFormat),
//! and handing it bytes in another format fails with
//! [`FormatMismatch`](MarkLogicErrorCode::FormatMismatch) and keeps the previous value:
//!
//! ```
//! use marklogic_rust_sdk::{Format, Handle, MarkLogicErrorCode, ServerConfigResponseHandle};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut h = ServerConfigResponseHandle::new(Format::Xml)?;
//! let err = h.decode(br#"{"version":"7.0"}"#).unwrap_err();
//! assert_eq!(err.code, MarkLogicErrorCode::FormatMismatch);
//! assert_eq!(h.get().version, "");
//! # Ok(())
//! # }
//! ```
//!
//! ## Timestamps
//!
//! MarkLogic writes timestamps as RFC 3339 with nanosecond precision. [`Timestamp`]
//! parses those strictly and falls back to a few looser encodings; see its module
//! documentation for the list.
//!
//! ## Configuring the SDK
//!
//! [`ConnectionBuilder::from_environment()`] reads the `MARKLOGIC_*` environment variables,
//! and [`ConnectionBuilder::from_file_with_profile()`] reads a profile of an ini file.
//! Both may be combined with explicit settings; whatever is called last wins.
//!
//! Authentication is [`AuthType::Digest`] (MarkLogic's default), [`AuthType::Basic`],
//! or [`AuthType::None`]. Digest answers the server's first challenge and reuses it
//! for following requests.
//!
//! ## Logging
//!
//! The SDK logs through [tracing](https://crates.io/crates/tracing): client setup at
//! `debug`, requests, auth challenges and decoded values at `trace`. It does not install
//! a subscriber.
//!
//! ## License
//!
//! Copyright (C) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//!
//! This SDK is licensed under the Universal Permissive License 1.0. See
//! [LICENSE](https://oss.oracle.com/licenses/upl/) for
//! details.
//!

pub(crate) mod auth;
pub use crate::auth::AuthType;


pub(crate) mod client;
pub use crate::client::{AdminClient, Client, ADMIN_BASE_PATH, REST_BASE_PATH};

pub mod codec;
pub use crate::codec::{Codec, MANAGE_NAMESPACE};

pub(crate) mod connection;
pub use crate::connection::{ConnectionBuilder, DEFAULT_ADMIN_PORT, DEFAULT_PORT};


pub(crate) mod error;
pub use crate::error::{MarkLogicError, MarkLogicErrorCode};

pub(crate) mod file_utils;
pub(crate) mod format;
pub use crate::format::Format;

pub(crate) mod handle;
pub use crate::handle::{accept_response, Handle, RawHandle};

#[cfg(test)]
pub(crate) mod handle_tests;

pub(crate) mod init_request;
pub use crate::init_request::{InitHandle, InitRequest, InitializeProperties};

pub(crate) mod instance_admin_request;
pub use crate::instance_admin_request::{
    InstanceAdminHandle, InstanceAdminProperties, InstanceAdminRequest,
};

pub(crate) mod map_handle;
pub use crate::map_handle::MapHandle;

#[cfg(test)]
pub(crate) mod mapvalue_tests;

pub(crate) mod record_handle;
pub use crate::record_handle::{Record, RecordHandle};

pub(crate) mod rest_request;
pub use crate::rest_request::RestRequest;
pub use reqwest::Method;

pub(crate) mod restart;
pub use crate::restart::{LastStartupElement, LinkElement, RestartResponse, RestartResponseHandle};

pub(crate) mod server_config_request;
pub use crate::server_config_request::{
    ServerConfigRequest, ServerConfigResponse, ServerConfigResponseHandle,
};

pub mod timestamp;
pub use crate::timestamp::Timestamp;


pub(crate) mod timestamp_request;
pub use crate::timestamp_request::{TimestampRequest, TimestampResponseHandle};

pub mod types;

pub(crate) mod xml_map;
