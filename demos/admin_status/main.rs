//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//

// This is an example program that asks a MarkLogic host for its clock and its
// configuration through the admin API, once as typed records and once as a
// generic map.

// To run this example:
//    MARKLOGIC_HOST=localhost MARKLOGIC_USERNAME=admin MARKLOGIC_PASSWORD=admin \
//        cargo run --example admin_status
//
// for extra output:
//    RUST_LOG=debug cargo run --example admin_status
//
// or, for a LOT of tracing output:
//    RUST_LOG=trace cargo run --example admin_status

use marklogic_rust_sdk::{
    AdminClient, Format, MapHandle, MarkLogicError, Method, RestRequest, ServerConfigRequest,
    ServerConfigResponseHandle, TimestampRequest, TimestampResponseHandle,
};
use std::error::Error;
use std::time::Duration;
use tracing::info;

// Note: later methods called on this builder override earlier ones, so the
// values set here are defaults the environment may replace.
fn get_admin_client() -> Result<AdminClient, MarkLogicError> {
    AdminClient::builder()
        .host("localhost")?
        //
        // For a host with its own CA:
        // .host("https://ml.example.com")?
        // .add_cert_from_pemfile("/path/to/ca.pem")?
        //
        // Or read a profile of an ini file:
        // .from_file_with_profile("~/.marklogic/config", "staging")?
        //
        .from_environment()?
        // Optional: set a different default timeout (default is 30 seconds)
        .timeout(Duration::from_secs(15))?
        .build_admin_client()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Set up a tracing subscriber to see output based on RUST_LOG environment setting
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .compact()
        .init();

    let admin = get_admin_client()?;
    info!("Connected to {}", admin.base_url());

    let mut ts = TimestampResponseHandle::new(Format::PlainText)?;
    TimestampRequest::new().execute(&admin, &mut ts).await?;
    info!("Server time: {}", ts.get());

    let mut config = ServerConfigResponseHandle::new(Format::Xml)?;
    ServerConfigRequest::new().execute(&admin, &mut config).await?;
    let c = config.get();
    info!(
        "MarkLogic {} ({}) on {} [{}], bind port {}",
        c.version, c.edition, c.host_name, c.platform, c.bind_port
    );

    // The same endpoint as JSON, without a record type
    let mut raw = MapHandle::new(Format::Json)?;
    let req = RestRequest::new(Method::GET, "/server-config").timeout(&Duration::from_secs(5));
    admin.execute(&req, &mut raw).await?;
    if let Some(m) = raw.get() {
        info!("server-config as json: {}", m);
    }
    Ok(())
}
