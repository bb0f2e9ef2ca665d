//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Timestamps as they appear in MarkLogic responses.
//!
//! MarkLogic writes timestamps as RFC 3339 values with up to nanosecond
//! precision and an explicit offset, for example
//! `2013-06-18T08:11:29.188561-07:00`. [`Timestamp`] parses that profile first
//! and, if it fails, tries a few looser encodings before giving up:
//!
//! | input | interpreted as |
//! | ----- | -------------- |
//! | `2013-05-15T10:34:38.932514` | no offset: UTC |
//! | `2013-05-15T10:34:38.932514-0700` | offset without a colon |
//! | `2013-05-15 10:34:38.932514-07:00` | space between date and time |
//! | `Wed, 15 May 2013 10:34:38 -0700` | RFC 2822 |
//! | `2013-05-15` | midnight UTC |
//!
//! When none of them match, the error from the RFC 3339 parser is returned.
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use tracing::trace;

use crate::error::MarkLogicError;
use crate::error::MarkLogicErrorCode::InvalidTimestamp;

const FALLBACK_OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

/// A point in time with nanosecond precision and a fixed UTC offset.
///
/// Two timestamps are equal when they denote the same instant, regardless of
/// the offset they were written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<FixedOffset>);

impl Timestamp {
    pub fn new(time: DateTime<FixedOffset>) -> Timestamp {
        Timestamp(time)
    }

    /// Parse `s` as a timestamp.
    ///
    /// The string is used as given; see [`FromStr`] for the variant that trims
    /// surrounding whitespace first.
    pub fn parse(s: &str) -> Result<Timestamp, MarkLogicError> {
        let primary_err = match DateTime::parse_from_rfc3339(s) {
            Ok(dt) => return Ok(Timestamp(dt)),
            Err(e) => e,
        };
        if let Some(dt) = parse_fallback(s) {
            trace!("parsed timestamp '{}' with a fallback format", s);
            return Ok(Timestamp(dt));
        }
        Err(MarkLogicError::new(
            InvalidTimestamp,
            &format!(
                "error parsing string '{}' into RFC3339 timestamp: {}",
                s, primary_err
            ),
        ))
    }

    /// The wrapped instant.
    pub fn time(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

fn parse_fallback(s: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ndt.and_utc().fixed_offset());
    }
    for fmt in FALLBACK_OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d
            .and_hms_opt(0, 0, 0)
            .map(|ndt| ndt.and_utc().fixed_offset());
    }
    None
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp(DateTime::<Utc>::UNIX_EPOCH.fixed_offset())
    }
}

impl FromStr for Timestamp {
    type Err = MarkLogicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timestamp::parse(s.trim())
    }
}

// RFC 3339 with 0, 3, 6 or 9 fractional digits, whichever keeps every
// nanosecond, and "Z" for a zero offset.
impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Timestamp(dt)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp(dt.fixed_offset())
    }
}

impl From<Timestamp> for DateTime<FixedOffset> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Timestamp::parse(&s).map_err(|e| serde::de::Error::custom(e.message))
    }
}
