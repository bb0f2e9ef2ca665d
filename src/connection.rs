//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Builder for creating a [`Client`] or an [`AdminClient`]
//!
use ini::Ini;
use reqwest::Certificate;
use std::default::Default;
use std::env;
use std::result::Result;
use std::time::Duration;
use tracing::debug;

use crate::auth::{AuthType, Credentials};
use crate::client::{AdminClient, Client};
use crate::error::{ia_err, MarkLogicError};
use crate::file_utils::{expand_user_home, file_to_string};

/// Default port of the REST API app server.
pub const DEFAULT_PORT: u16 = 8000;
/// Default port of the admin API app server.
pub const DEFAULT_ADMIN_PORT: u16 = 8001;

const HOST: &str = "host";
const PORT: &str = "port";
const ADMIN_PORT: &str = "admin_port";
const USERNAME: &str = "username";
const PASSWORD: &str = "password";
const AUTH: &str = "auth";

/// Builder used to set all the parameters to create a [`Client`] or an [`AdminClient`].
///
/// Both clients can be built from the same builder; they share the host,
/// credentials and TLS settings and differ only in port and base path.
///
/// ```no_run
/// use marklogic_rust_sdk::{AuthType, ConnectionBuilder};
/// # fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let builder = ConnectionBuilder::new()
///     .host("localhost")?
///     .credentials("admin", "admin")?
///     .auth_type(AuthType::Digest)?;
/// let client = builder.build_client()?;
/// let admin = builder.build_admin_client()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionBuilder {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) admin_port: u16,
    pub(crate) use_https: bool,
    pub(crate) credentials: Option<Credentials>,
    pub(crate) auth_type: AuthType,
    pub(crate) timeout: Option<Duration>,
    pub(crate) add_cert: Option<Certificate>,
    pub(crate) client: Option<reqwest::Client>,
    pub(crate) accept_invalid_certs: bool,
    // For error messaging
    pub(crate) from_environment: bool,
}

impl Default for ConnectionBuilder {
    fn default() -> Self {
        ConnectionBuilder {
            host: String::new(),
            port: DEFAULT_PORT,
            admin_port: DEFAULT_ADMIN_PORT,
            use_https: false,
            credentials: None,
            auth_type: AuthType::None,
            timeout: None,
            add_cert: None,
            client: None,
            accept_invalid_certs: false,
            from_environment: false,
        }
    }
}

impl ConnectionBuilder {
    /// Create a new ConnectionBuilder struct.
    ///
    /// The default builder has no host and does not authenticate. Consider calling
    /// [`from_environment()`](ConnectionBuilder::from_environment()) to collect all
    /// parameters from the local environment.
    pub fn new() -> Self {
        ConnectionBuilder {
            ..Default::default()
        }
    }
    /// Build a [`Client`] for the REST API at `/v1` on [`port`](ConnectionBuilder::port()).
    ///
    /// Note: Internally, if the builder contains
    /// a reference to an existing [`reqwest::Client`], it will clone and
    /// use that. Otherwise, it will create a new [`reqwest::Client`] for its
    /// own internal use. See [`reqwest_client()`](ConnectionBuilder::reqwest_client()).
    pub fn build_client(&self) -> Result<Client, MarkLogicError> {
        Client::new(self)
    }
    /// Build an [`AdminClient`] for the admin API at `/admin/v1` on
    /// [`admin_port`](ConnectionBuilder::admin_port()).
    pub fn build_admin_client(&self) -> Result<AdminClient, MarkLogicError> {
        AdminClient::new(self)
    }
    /// Gather configuration settings from the current envrionment.
    ///
    /// This method will scan the process [`standard environment`](std::env::Vars) to collect and
    /// set the configuration parameters. The values can be overridden in code if this method is
    /// called first and other methods are called afterwards.
    ///
    /// The following environment variables are used:
    ///
    /// | variable | description |
    /// | -------- | ----------- |
    /// | `MARKLOGIC_CONFIG_FILE` | A profile file read first with [`ConnectionBuilder::from_file()`]; the variables below override it. |
    /// | `MARKLOGIC_HOST` | The server host, optionally with scheme and port. See [`ConnectionBuilder::host()`]. |
    /// | `MARKLOGIC_PORT` | The REST API port. |
    /// | `MARKLOGIC_ADMIN_PORT` | The admin API port. |
    /// | `MARKLOGIC_USERNAME` | The user name to authenticate as. |
    /// | `MARKLOGIC_PASSWORD` | The password for `MARKLOGIC_USERNAME`. |
    /// | `MARKLOGIC_AUTH` | The auth mechanism. One of: `none`, `basic`, `digest`. |
    /// | `MARKLOGIC_CA_CERT` | The path to a certificate file in `pem` format (see [`ConnectionBuilder::add_cert_from_pemfile()`]). |
    /// | `MARKLOGIC_ACCEPT_INVALID_CERTS` | If this is set to `1` or `true`, do not check certificates (see [`ConnectionBuilder::danger_accept_invalid_certs()`]). |
    ///
    pub fn from_environment(mut self) -> Result<Self, MarkLogicError> {
        self.from_environment = true;
        if let Ok(val) = env::var("MARKLOGIC_CONFIG_FILE") {
            self = self.from_file(&val)?;
        }
        if let Ok(val) = env::var("MARKLOGIC_HOST") {
            self = self.host(&val)?;
        }
        if let Ok(val) = env::var("MARKLOGIC_PORT") {
            self = self.port(parse_port("MARKLOGIC_PORT", &val)?)?;
        }
        if let Ok(val) = env::var("MARKLOGIC_ADMIN_PORT") {
            self = self.admin_port(parse_port("MARKLOGIC_ADMIN_PORT", &val)?)?;
        }
        if let Ok(user) = env::var("MARKLOGIC_USERNAME") {
            let pass = env::var("MARKLOGIC_PASSWORD").unwrap_or_default();
            self = self.credentials(&user, &pass)?;
        }
        if let Ok(val) = env::var("MARKLOGIC_CA_CERT") {
            self = self.add_cert_from_pemfile(&val)?;
        }
        if let Ok(val) = env::var("MARKLOGIC_ACCEPT_INVALID_CERTS") {
            let lv = val.to_lowercase();
            if lv == "true" || lv == "1" {
                self = self.danger_accept_invalid_certs(true)?;
            }
        }
        if let Ok(val) = env::var("MARKLOGIC_AUTH") {
            self = self.auth_type(AuthType::from_name(&val)?)?;
        }
        Ok(self)
    }
    /// Read settings from the `DEFAULT` profile of an ini file.
    ///
    /// See [`from_file_with_profile()`](ConnectionBuilder::from_file_with_profile()).
    pub fn from_file(self, config_file: &str) -> Result<Self, MarkLogicError> {
        self.from_file_with_profile(config_file, "DEFAULT")
    }
    /// Read settings from one profile of an ini file, such as:
    ///```text
    /// [DEFAULT]
    /// host=localhost
    /// username=admin
    /// password=admin
    /// auth=digest
    ///
    /// [staging]
    /// host=https://ml-staging.example.com
    /// port=8010
    /// admin_port=8011
    ///```
    /// Recognized keys are `host`, `port`, `admin_port`, `username`,
    /// `password` and `auth`; all are optional. A leading `~` in the path is
    /// expanded to the home directory.
    pub fn from_file_with_profile(
        mut self,
        config_file: &str,
        profile: &str,
    ) -> Result<Self, MarkLogicError> {
        debug!(
            "Reading connection settings from file {} and profile {}",
            config_file, profile
        );
        let file_path = expand_user_home(config_file)?;
        let config = match Ini::load_from_file(&file_path) {
            Ok(c) => c,
            Err(e) => {
                return Err(MarkLogicError::new(
                    crate::MarkLogicErrorCode::IoError,
                    &format!("error reading config file '{}': {}", file_path, e),
                ));
            }
        };
        let props = match config.section(Some(profile)) {
            Some(p) => p,
            None => {
                // keys before any section header count as the DEFAULT profile
                match config.section(None::<String>) {
                    Some(p) if profile == "DEFAULT" && !p.is_empty() => p,
                    _ => {
                        return ia_err!(
                            "error reading config file '{}': missing profile '{}'",
                            file_path,
                            profile
                        );
                    }
                }
            }
        };
        if let Some(v) = props.get(HOST) {
            self = self.host(v)?;
        }
        if let Some(v) = props.get(PORT) {
            self = self.port(parse_port(PORT, v)?)?;
        }
        if let Some(v) = props.get(ADMIN_PORT) {
            self = self.admin_port(parse_port(ADMIN_PORT, v)?)?;
        }
        if let Some(user) = props.get(USERNAME) {
            let pass = props.get(PASSWORD).unwrap_or("");
            self = self.credentials(user, pass)?;
        }
        if let Some(v) = props.get(AUTH) {
            self = self.auth_type(AuthType::from_name(v)?)?;
        }
        Ok(self)
    }
    /// Set the server host.
    ///
    /// A scheme selects http or https, and a port overrides the REST API port:
    /// ```text
    ///     localhost
    ///     http://localhost:8010
    ///     https://ml.example.com
    ///     [::1]:8010
    /// ```
    /// IPv6 addresses must be written in brackets.
    pub fn host(mut self, host: &str) -> Result<Self, MarkLogicError> {
        let mut h = host.trim();
        if let Some(rest) = h.strip_prefix("https://") {
            self.use_https = true;
            h = rest;
        } else if let Some(rest) = h.strip_prefix("http://") {
            self.use_https = false;
            h = rest;
        }
        let h = h.trim_end_matches('/');
        if h.is_empty() {
            return ia_err!("invalid host '{}'", host);
        }
        if h.contains('/') {
            return ia_err!("invalid host '{}': paths are not allowed", host);
        }
        if h.starts_with('[') {
            // a bracketed IPv6 literal without a port
            if h.ends_with(']') {
                self.host = h.to_string();
                return Ok(self);
            }
        } else if h.matches(':').count() > 1 {
            return ia_err!("invalid host '{}': IPv6 addresses must be in brackets", host);
        }
        match h.rsplit_once(':') {
            Some((name, port)) => match port.parse::<u16>() {
                Ok(p)
                    if p > 0
                        && !name.is_empty()
                        && name.starts_with('[') == name.ends_with(']') =>
                {
                    self.host = name.to_string();
                    self.port = p;
                }
                _ => return ia_err!("invalid port in host '{}'", host),
            },
            None if h.starts_with('[') => return ia_err!("invalid host '{}'", host),
            None => self.host = h.to_string(),
        }
        Ok(self)
    }
    /// Set the REST API port. The default is 8000.
    pub fn port(mut self, port: u16) -> Result<Self, MarkLogicError> {
        if port == 0 {
            return ia_err!("port must be greater than zero");
        }
        self.port = port;
        Ok(self)
    }
    /// Set the admin API port. The default is 8001.
    pub fn admin_port(mut self, port: u16) -> Result<Self, MarkLogicError> {
        if port == 0 {
            return ia_err!("admin port must be greater than zero");
        }
        self.admin_port = port;
        Ok(self)
    }
    /// Specify the user name and password to authenticate with.
    ///
    /// If no auth type has been chosen yet, this selects [`AuthType::Digest`],
    /// MarkLogic's default for app servers.
    pub fn credentials(mut self, username: &str, password: &str) -> Result<Self, MarkLogicError> {
        if username.is_empty() {
            return ia_err!("username must not be empty");
        }
        self.credentials = Some(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        });
        if self.auth_type == AuthType::None {
            self.auth_type = AuthType::Digest;
        }
        Ok(self)
    }
    /// Choose how requests authenticate. Basic and digest need
    /// [`credentials()`](ConnectionBuilder::credentials()) by the time a client is built.
    pub fn auth_type(mut self, auth_type: AuthType) -> Result<Self, MarkLogicError> {
        self.auth_type = auth_type;
        Ok(self)
    }
    /// Add a certificate to use for https connections from a file.
    ///
    /// The file must contain an x509 certificate in `PEM` file format.
    pub fn add_cert_from_pemfile(self, pemfile: &str) -> Result<Self, MarkLogicError> {
        let buf = file_to_string(pemfile)?.into_bytes();
        match reqwest::Certificate::from_pem(&buf) {
            Ok(cert) => self.add_cert(cert),
            Err(e) => ia_err!(
                "error getting certificate from pemfile {}: {}",
                pemfile,
                e.to_string()
            ),
        }
    }

    /// Add a certificate to use for https connections.
    pub fn add_cert(mut self, cert: Certificate) -> Result<Self, MarkLogicError> {
        self.add_cert = Some(cert);
        Ok(self)
    }
    // see https://docs.rs/reqwest/latest/reqwest/struct.ClientBuilder.html#method.danger_accept_invalid_certs
    /// Allow https connection without validating certificates.
    ///
    /// **Warning:** This is only recommended for local testing purposes. Its use is insecure. See [`reqwest::ClientBuilder::danger_accept_invalid_certs()`] for details.
    ///
    pub fn danger_accept_invalid_certs(
        mut self,
        accept_invalid_certs: bool,
    ) -> Result<Self, MarkLogicError> {
        self.accept_invalid_certs = accept_invalid_certs;
        Ok(self)
    }
    /// Specify a [`reqwest::Client`] to use for all http/s connections.
    ///
    /// By default, each client creates an internal [`reqwest::Client`] to use for
    /// all communications. If your application already has a reqwest Client, you can pass that
    /// into the builder to avoid creating multiple connection pools.
    pub fn reqwest_client(mut self, client: &reqwest::Client) -> Result<Self, MarkLogicError> {
        self.client = Some(client.clone());
        Ok(self)
    }
    /// Specify the timeout used for operations.
    ///
    /// Currently this is used for both connection and request timeouts.
    /// Note that the request timeout can be set on a per-request basis.
    ///
    /// The default timeout is 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Result<Self, MarkLogicError> {
        if timeout.is_zero() {
            return ia_err!("timeout must be greater than zero");
        }
        self.timeout = Some(timeout);
        Ok(self)
    }
}

fn parse_port(name: &str, val: &str) -> Result<u16, MarkLogicError> {
    match val.trim().parse::<u16>() {
        Ok(p) => Ok(p),
        Err(_) => ia_err!("invalid value '{}' for {}", val, name),
    }
}
