//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! HTTP basic and digest authentication.
//!
//! Digest follows RFC 7616: `MD5`, `SHA-256` and their `-sess` variants, with
//! `qop=auth` when the server offers it. The last challenge is cached so
//! requests after the first one authenticate without a round trip.
use base64::prelude::{Engine as _, BASE64_STANDARD};
use md5::Md5;
use reqwest::header::{HeaderMap, HeaderValue, WWW_AUTHENTICATE};
use reqwest::Method;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::trace;

use crate::error::{ia_err, ml_err, MarkLogicError};

/// How requests authenticate to the server.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthType {
    /// Send no credentials.
    #[default]
    None,
    /// `Authorization: Basic`, sent with every request.
    Basic,
    /// `Authorization: Digest`, answering the server's challenge.
    Digest,
}

impl AuthType {
    /// Parse the names used in environment variables and config files:
    /// `none`, `basic` or `digest`, in any case.
    pub fn from_name(name: &str) -> Result<AuthType, MarkLogicError> {
        match name.trim().to_lowercase().as_str() {
            "none" | "" => Ok(AuthType::None),
            "basic" => Ok(AuthType::Basic),
            "digest" => Ok(AuthType::Digest),
            _ => ia_err!("invalid auth type '{}': use none, basic or digest", name),
        }
    }
}

#[derive(Default, Clone)]
pub(crate) struct Credentials {
    pub(crate) username: String,
    pub(crate) password: String,
}

// keep passwords out of debug output
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

#[derive(Debug)]
pub(crate) enum Authenticator {
    None,
    Basic(HeaderValue),
    Digest(DigestAuth),
}

impl Authenticator {
    pub(crate) fn new(
        auth_type: AuthType,
        creds: &Option<Credentials>,
    ) -> Result<Authenticator, MarkLogicError> {
        if auth_type == AuthType::None {
            return Ok(Authenticator::None);
        }
        let creds = match creds {
            Some(c) if !c.username.is_empty() => c,
            _ => return ia_err!("{:?} authentication requires a username", auth_type),
        };
        match auth_type {
            AuthType::Basic => Ok(Authenticator::Basic(basic_header(creds)?)),
            AuthType::Digest => Ok(Authenticator::Digest(DigestAuth::new(creds.clone()))),
            AuthType::None => Ok(Authenticator::None),
        }
    }

    // The header to send with a first attempt, if there is one.
    pub(crate) fn header_for(
        &self,
        method: &Method,
        uri: &str,
    ) -> Result<Option<HeaderValue>, MarkLogicError> {
        match self {
            Authenticator::None => Ok(None),
            Authenticator::Basic(h) => Ok(Some(h.clone())),
            Authenticator::Digest(d) => d.cached_header(method, uri),
        }
    }

    // The header answering the challenge in a 401 response, if we can answer it.
    pub(crate) fn answer(
        &self,
        headers: &HeaderMap,
        method: &Method,
        uri: &str,
    ) -> Result<Option<HeaderValue>, MarkLogicError> {
        let d = match self {
            Authenticator::Digest(d) => d,
            _ => return Ok(None),
        };
        for value in headers.get_all(WWW_AUTHENTICATE) {
            let text = match value.to_str() {
                Ok(t) => t,
                Err(_) => continue,
            };
            if let Some(challenge) = DigestChallenge::parse(text)? {
                return d.answer(challenge, method, uri).map(Some);
            }
        }
        Ok(None)
    }
}

pub(crate) fn basic_header(creds: &Credentials) -> Result<HeaderValue, MarkLogicError> {
    let up = format!("{}:{}", creds.username, creds.password);
    let mut h = HeaderValue::from_str(&format!("Basic {}", BASE64_STANDARD.encode(up)))?;
    h.set_sensitive(true);
    Ok(h)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DigestAlgorithm {
    Md5,
    Md5Sess,
    Sha256,
    Sha256Sess,
}

impl DigestAlgorithm {
    fn from_name(name: &str) -> Option<DigestAlgorithm> {
        match name.to_uppercase().as_str() {
            "MD5" => Some(DigestAlgorithm::Md5),
            "MD5-SESS" => Some(DigestAlgorithm::Md5Sess),
            "SHA-256" => Some(DigestAlgorithm::Sha256),
            "SHA-256-SESS" => Some(DigestAlgorithm::Sha256Sess),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            DigestAlgorithm::Md5 => "MD5",
            DigestAlgorithm::Md5Sess => "MD5-sess",
            DigestAlgorithm::Sha256 => "SHA-256",
            DigestAlgorithm::Sha256Sess => "SHA-256-sess",
        }
    }

    fn is_session(&self) -> bool {
        matches!(self, DigestAlgorithm::Md5Sess | DigestAlgorithm::Sha256Sess)
    }

    fn hex(&self, data: &str) -> String {
        match self {
            DigestAlgorithm::Md5 | DigestAlgorithm::Md5Sess => {
                format!("{:x}", Md5::digest(data.as_bytes()))
            }
            DigestAlgorithm::Sha256 | DigestAlgorithm::Sha256Sess => {
                format!("{:x}", Sha256::digest(data.as_bytes()))
            }
        }
    }
}

/// The parameters of a `WWW-Authenticate: Digest` header.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DigestChallenge {
    pub(crate) realm: String,
    pub(crate) nonce: String,
    pub(crate) opaque: Option<String>,
    pub(crate) algorithm: DigestAlgorithm,
    pub(crate) qop_auth: bool,
}

impl DigestChallenge {
    /// Parse a `WWW-Authenticate` value. Returns `None` for other schemes.
    pub(crate) fn parse(header: &str) -> Result<Option<DigestChallenge>, MarkLogicError> {
        let header = header.trim();
        let (scheme, rest) = match header.split_once(char::is_whitespace) {
            Some((s, r)) => (s, r),
            None => (header, ""),
        };
        if !scheme.eq_ignore_ascii_case("digest") {
            return Ok(None);
        }
        let mut realm = None;
        let mut nonce = None;
        let mut opaque = None;
        let mut algorithm = DigestAlgorithm::Md5;
        let mut qop_auth = false;
        for (k, v) in split_params(rest) {
            match k.to_lowercase().as_str() {
                "realm" => realm = Some(v),
                "nonce" => nonce = Some(v),
                "opaque" => opaque = Some(v),
                "algorithm" => match DigestAlgorithm::from_name(&v) {
                    Some(a) => algorithm = a,
                    None => {
                        return ml_err!(
                            InvalidAuthorization,
                            "unsupported digest algorithm '{}'",
                            v
                        )
                    }
                },
                "qop" => qop_auth = v.split(',').any(|q| q.trim() == "auth"),
                _ => {}
            }
        }
        let nonce = match nonce {
            Some(n) => n,
            None => return ml_err!(InvalidAuthorization, "digest challenge has no nonce"),
        };
        Ok(Some(DigestChallenge {
            realm: realm.unwrap_or_default(),
            nonce,
            opaque,
            algorithm,
            qop_auth,
        }))
    }
}

// Split `k1="v, 1", k2=v2` into pairs, honoring quotes and backslash escapes.
fn split_params(s: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let mut chars = s.chars().peekable();
    loop {
        while let Some(c) = chars.peek() {
            if *c == ',' || c.is_whitespace() {
                chars.next();
            } else {
                break;
            }
        }
        let mut key = String::new();
        while let Some(c) = chars.peek() {
            if *c == '=' || *c == ',' {
                break;
            }
            key.push(*c);
            chars.next();
        }
        if key.is_empty() {
            return out;
        }
        let mut value = String::new();
        if chars.peek() == Some(&'=') {
            chars.next();
            if chars.peek() == Some(&'"') {
                chars.next();
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => {
                            if let Some(n) = chars.next() {
                                value.push(n);
                            }
                        }
                        '"' => break,
                        _ => value.push(c),
                    }
                }
            } else {
                while let Some(c) = chars.peek() {
                    if *c == ',' {
                        break;
                    }
                    value.push(*c);
                    chars.next();
                }
            }
        }
        out.push((key.trim().to_string(), value.trim().to_string()));
    }
}

#[derive(Debug)]
pub(crate) struct DigestAuth {
    creds: Credentials,
    // never held across an await
    challenge: std::sync::Mutex<Option<DigestChallenge>>,
    nonce_count: AtomicU32,
}

impl DigestAuth {
    pub(crate) fn new(creds: Credentials) -> DigestAuth {
        DigestAuth {
            creds,
            challenge: std::sync::Mutex::new(None),
            nonce_count: AtomicU32::new(0),
        }
    }

    fn cached_header(
        &self,
        method: &Method,
        uri: &str,
    ) -> Result<Option<HeaderValue>, MarkLogicError> {
        let challenge = match self.challenge.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => return ia_err!("digest challenge cache is poisoned"),
        };
        match challenge {
            Some(ch) => {
                let nc = self.nonce_count.fetch_add(1, Ordering::Relaxed) + 1;
                let cnonce = new_cnonce();
                let h = self.authorization(&ch, method, uri, nc, &cnonce);
                Ok(Some(sensitive(&h)?))
            }
            None => Ok(None),
        }
    }

    fn answer(
        &self,
        challenge: DigestChallenge,
        method: &Method,
        uri: &str,
    ) -> Result<HeaderValue, MarkLogicError> {
        trace!(
            "answering digest challenge: realm={} algorithm={}",
            challenge.realm,
            challenge.algorithm.name()
        );
        let cnonce = new_cnonce();
        let h = self.authorization(&challenge, method, uri, 1, &cnonce);
        match self.challenge.lock() {
            Ok(mut guard) => {
                *guard = Some(challenge);
                self.nonce_count.store(1, Ordering::Relaxed);
            }
            Err(_) => return ia_err!("digest challenge cache is poisoned"),
        }
        sensitive(&h)
    }

    // The full `Authorization` value for one request.
    pub(crate) fn authorization(
        &self,
        ch: &DigestChallenge,
        method: &Method,
        uri: &str,
        nc: u32,
        cnonce: &str,
    ) -> String {
        let alg = ch.algorithm;
        let mut ha1 = alg.hex(&format!(
            "{}:{}:{}",
            self.creds.username, ch.realm, self.creds.password
        ));
        if alg.is_session() {
            ha1 = alg.hex(&format!("{}:{}:{}", ha1, ch.nonce, cnonce));
        }
        let ha2 = alg.hex(&format!("{}:{}", method.as_str(), uri));
        let nc_str = format!("{:08x}", nc);
        let response = if ch.qop_auth {
            alg.hex(&format!(
                "{}:{}:{}:{}:auth:{}",
                ha1, ch.nonce, nc_str, cnonce, ha2
            ))
        } else {
            alg.hex(&format!("{}:{}:{}", ha1, ch.nonce, ha2))
        };

        let mut h = format!(
            "Digest username=\"{}\", realm=\"{}\", nonce=\"{}\", uri=\"{}\", algorithm={}, response=\"{}\"",
            self.creds.username,
            ch.realm,
            ch.nonce,
            uri,
            alg.name(),
            response
        );
        if ch.qop_auth {
            h.push_str(&format!(", qop=auth, nc={}, cnonce=\"{}\"", nc_str, cnonce));
        }
        if let Some(o) = &ch.opaque {
            h.push_str(&format!(", opaque=\"{}\"", o));
        }
        h
    }
}

fn new_cnonce() -> String {
    format!("{:016x}", rand::random::<u64>())
}

fn sensitive(s: &str) -> Result<HeaderValue, MarkLogicError> {
    let mut h = HeaderValue::from_str(s)?;
    h.set_sensitive(true);
    Ok(h)
}
