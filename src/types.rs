//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Generic values used by the [`MapHandle`](crate::MapHandle).
use bigdecimal::BigDecimal;
use bigdecimal::ToPrimitive;
use indexmap::map::Iter;
use indexmap::IndexMap;
use std::result::Result;
use std::str::FromStr;

use crate::error::ia_err;
use crate::error::MarkLogicError;
use crate::timestamp::Timestamp;

/// One value in a [`MapValue`].
///
/// The variants are the ones JSON can express. Numbers are kept as arbitrary
/// precision decimals, so a value read from JSON is written back with the same
/// digits. XML carries no types: every XML leaf decodes to
/// [`FieldValue::String`], and the `as_*` accessors parse strings where that
/// makes sense.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldValue {
    String(String),
    Number(BigDecimal),
    Boolean(bool),
    #[default]
    Null,
    Map(MapValue),
    Array(Vec<FieldValue>),
}

impl FieldValue {
    pub fn new() -> Self {
        FieldValue::Null
    }
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
    pub fn is_atomic(&self) -> bool {
        match self {
            FieldValue::Array(_) => false,
            FieldValue::Map(_) => false,
            _ => true,
        }
    }
    pub fn get_map_value(self) -> Result<MapValue, MarkLogicError> {
        if let FieldValue::Map(mv) = self {
            return Ok(mv);
        }
        ia_err!("get_map_value: not a Map: {:?}", self)
    }
    pub fn get_map_value_ref(&self) -> Result<&MapValue, MarkLogicError> {
        if let FieldValue::Map(mv) = self {
            return Ok(mv);
        }
        ia_err!("get_map_value_ref: not a Map: {:?}", self)
    }
    pub fn get_array_value_ref(&self) -> Result<&Vec<FieldValue>, MarkLogicError> {
        if let FieldValue::Array(av) = self {
            return Ok(av);
        }
        ia_err!("get_array_value_ref: not an Array: {:?}", self)
    }
    pub fn as_str(&self) -> Option<&str> {
        if let FieldValue::String(s) = self {
            return Some(s);
        }
        None
    }
    pub fn as_i64(&self) -> Result<i64, MarkLogicError> {
        match self {
            FieldValue::Number(n) => {
                if n.is_integer() {
                    if let Some(i) = n.to_i64() {
                        return Ok(i);
                    }
                }
                ia_err!("as_i64: number {} is not a 64-bit integer", n)
            }
            FieldValue::String(s) => match s.trim().parse::<i64>() {
                Ok(i) => Ok(i),
                Err(_) => ia_err!("as_i64: string '{}' is not an integer", s),
            },
            _ => ia_err!("as_i64 called for {:?}", self),
        }
    }
    pub fn as_f64(&self) -> Result<f64, MarkLogicError> {
        match self {
            FieldValue::Number(n) => match n.to_f64() {
                Some(f) => Ok(f),
                None => ia_err!("as_f64: number {} does not fit an f64", n),
            },
            FieldValue::String(s) => match s.trim().parse::<f64>() {
                Ok(f) => Ok(f),
                Err(_) => ia_err!("as_f64: string '{}' is not a number", s),
            },
            _ => ia_err!("as_f64 called for {:?}", self),
        }
    }
    pub fn as_bool(&self) -> Result<bool, MarkLogicError> {
        match self {
            FieldValue::Boolean(b) => Ok(*b),
            FieldValue::String(s) => match s.trim() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => ia_err!("as_bool: string '{}' is not a boolean", s),
            },
            _ => ia_err!("as_bool called for {:?}", self),
        }
    }
    pub fn as_timestamp(&self) -> Result<Timestamp, MarkLogicError> {
        if let FieldValue::String(s) = self {
            return s.parse::<Timestamp>();
        }
        ia_err!("as_timestamp called for {:?}", self)
    }

    pub fn from_json(json: &serde_json::Value) -> Result<FieldValue, MarkLogicError> {
        match json {
            serde_json::Value::Null => Ok(FieldValue::Null),
            serde_json::Value::Bool(b) => Ok(FieldValue::Boolean(*b)),
            serde_json::Value::String(s) => Ok(FieldValue::String(s.clone())),
            serde_json::Value::Number(n) => {
                // with arbitrary_precision the string form is the original text
                match BigDecimal::from_str(&n.to_string()) {
                    Ok(bd) => Ok(FieldValue::Number(bd)),
                    Err(e) => ia_err!("error converting number {} to BigDecimal: {}", n, e),
                }
            }
            serde_json::Value::Array(a) => {
                let mut arr: Vec<FieldValue> = Vec::with_capacity(a.len());
                for v in a {
                    arr.push(FieldValue::from_json(v)?);
                }
                Ok(FieldValue::Array(arr))
            }
            serde_json::Value::Object(o) => Ok(FieldValue::Map(MapValue::from_json_map(o)?)),
        }
    }

    pub fn to_json(&self) -> Result<serde_json::Value, MarkLogicError> {
        match self {
            FieldValue::Null => Ok(serde_json::Value::Null),
            FieldValue::Boolean(b) => Ok(serde_json::Value::Bool(*b)),
            FieldValue::String(s) => Ok(serde_json::Value::String(s.clone())),
            FieldValue::Number(n) => {
                let num: serde_json::Number = serde_json::from_str(&n.to_string())?;
                Ok(serde_json::Value::Number(num))
            }
            FieldValue::Array(a) => {
                let mut arr = Vec::with_capacity(a.len());
                for v in a {
                    arr.push(v.to_json()?);
                }
                Ok(serde_json::Value::Array(arr))
            }
            FieldValue::Map(m) => m.to_json_value(),
        }
    }
}

/// Conversion of native values into a [`FieldValue`].
pub trait ToFieldValue {
    fn to_field_value(&self) -> FieldValue;
}

impl ToFieldValue for FieldValue {
    fn to_field_value(&self) -> FieldValue {
        self.clone()
    }
}
impl ToFieldValue for i64 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Number(BigDecimal::from(*self))
    }
}
impl ToFieldValue for i32 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Number(BigDecimal::from(*self))
    }
}
// NaN and the infinities have no JSON form and become Null.
impl ToFieldValue for f64 {
    fn to_field_value(&self) -> FieldValue {
        match BigDecimal::try_from(*self) {
            Ok(bd) => FieldValue::Number(bd),
            Err(_) => FieldValue::Null,
        }
    }
}
impl ToFieldValue for BigDecimal {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Number(self.clone())
    }
}
impl ToFieldValue for String {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.to_string())
    }
}
impl ToFieldValue for &str {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.to_string())
    }
}
impl ToFieldValue for bool {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Boolean(*self)
    }
}
impl ToFieldValue for Timestamp {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.to_string())
    }
}
impl ToFieldValue for MapValue {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Map(self.clone())
    }
}
impl<T: ToFieldValue> ToFieldValue for Option<T> {
    fn to_field_value(&self) -> FieldValue {
        if let Some(v) = self {
            v.to_field_value()
        } else {
            FieldValue::Null
        }
    }
}
impl<T: ToFieldValue> ToFieldValue for &T {
    fn to_field_value(&self) -> FieldValue {
        let v = *self;
        v.to_field_value()
    }
}
impl<T: ToFieldValue> ToFieldValue for Vec<T> {
    fn to_field_value(&self) -> FieldValue {
        let v: Vec<FieldValue> = self.iter().map(|i| i.to_field_value()).collect();
        FieldValue::Array(v)
    }
}

/// An ordered map of `String` to [`FieldValue`].
///
/// Entries keep the order they were inserted in (for decoded payloads: the
/// order they appeared on the wire). Equality does not depend on order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapValue {
    pub(crate) m: IndexMap<String, FieldValue>,
}

impl MapValue {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_json_map(
        json: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, MarkLogicError> {
        let mut mv = MapValue::new();
        for (key, val) in json {
            mv.put_field_value(key, FieldValue::from_json(val)?);
        }
        Ok(mv)
    }

    pub fn from_json_object(json: &serde_json::Value) -> Result<Self, MarkLogicError> {
        if let serde_json::Value::Object(o) = json {
            return Self::from_json_map(o);
        }
        ia_err!("from_json_object: json value is not an Object: {:#?}", json)
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, MarkLogicError> {
        let mut o = serde_json::Map::new();
        for (k, v) in &self.m {
            o.insert(k.clone(), v.to_json()?);
        }
        Ok(serde_json::Value::Object(o))
    }

    pub fn len(&self) -> usize {
        self.m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.m.is_empty()
    }

    pub fn iter(&self) -> Iter<String, FieldValue> {
        self.m.iter()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.m.contains_key(key)
    }

    pub fn put(&mut self, key: &str, val: impl ToFieldValue) {
        self.m.insert(key.to_string(), val.to_field_value());
    }

    pub fn column(mut self, key: &str, val: impl ToFieldValue) -> MapValue {
        self.put(key, val);
        self
    }

    pub fn put_i64(&mut self, key: &str, val: i64) {
        self.put(key, val);
    }
    pub fn i64(mut self, key: &str, val: i64) -> MapValue {
        self.put_i64(key, val);
        self
    }
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.m.get(key)?.as_i64().ok()
    }

    pub fn put_float64(&mut self, key: &str, val: f64) {
        self.put(key, val);
    }
    pub fn get_float64(&self, key: &str) -> Option<f64> {
        self.m.get(key)?.as_f64().ok()
    }

    pub fn put_str(&mut self, key: &str, val: &str) {
        self.put_string(key, val.to_string())
    }
    pub fn str(mut self, key: &str, val: &str) -> MapValue {
        self.put_str(key, val);
        self
    }
    pub fn put_string(&mut self, key: &str, val: String) {
        self.m.insert(key.to_string(), FieldValue::String(val));
    }
    pub fn get_string(&self, key: &str) -> Option<String> {
        if let FieldValue::String(s) = self.m.get(key)? {
            Some(s.clone())
        } else {
            None
        }
    }

    pub fn put_bool(&mut self, key: &str, val: bool) {
        self.m.insert(key.to_string(), FieldValue::Boolean(val));
    }
    pub fn bool(mut self, key: &str, val: bool) -> MapValue {
        self.put_bool(key, val);
        self
    }
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.m.get(key)?.as_bool().ok()
    }

    pub fn put_null(&mut self, key: &str) {
        self.m.insert(key.to_string(), FieldValue::Null);
    }

    pub fn put_timestamp(&mut self, key: &str, val: &Timestamp) {
        self.put(key, val);
    }
    pub fn get_timestamp(&self, key: &str) -> Option<Timestamp> {
        self.m.get(key)?.as_timestamp().ok()
    }

    pub fn put_array(&mut self, key: &str, val: Vec<FieldValue>) {
        self.m.insert(key.to_string(), FieldValue::Array(val));
    }
    pub fn get_array(&self, key: &str) -> Option<&Vec<FieldValue>> {
        if let FieldValue::Array(a) = self.m.get(key)? {
            Some(a)
        } else {
            None
        }
    }

    pub fn put_map(&mut self, key: &str, val: MapValue) {
        self.m.insert(key.to_string(), FieldValue::Map(val));
    }
    pub fn map(mut self, key: &str, val: MapValue) -> MapValue {
        self.put_map(key, val);
        self
    }
    pub fn get_map(&self, key: &str) -> Option<&MapValue> {
        if let FieldValue::Map(a) = self.m.get(key)? {
            Some(a)
        } else {
            None
        }
    }

    pub fn put_field_value(&mut self, key: &str, val: FieldValue) {
        self.m.insert(key.to_string(), val);
    }
    pub fn get_field_value(&self, key: &str) -> Option<&FieldValue> {
        self.m.get(key)
    }
    pub fn get_field_value_mut(&mut self, key: &str) -> Option<&mut FieldValue> {
        self.m.get_mut(key)
    }
    pub fn take_field_value(&mut self, key: &str) -> Result<FieldValue, MarkLogicError> {
        if let Some(v) = self.m.shift_remove(key) {
            return Ok(v);
        }
        ia_err!("field '{}' does not exist in map", key)
    }

    pub fn put_json_map_value(&mut self, key: &str, json: &str) -> Result<(), MarkLogicError> {
        let vr: Result<serde_json::Value, serde_json::Error> = serde_json::from_str(json);
        match vr {
            Ok(v) => {
                let mv = MapValue::from_json_object(&v)?;
                self.put_field_value(key, FieldValue::Map(mv));
                return Ok(());
            }
            Err(e) => {
                return ia_err!("error parsing json into MapValue: {}", e.to_string());
            }
        }
    }
}

impl std::fmt::Display for MapValue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.to_json_value() {
            Ok(v) => write!(f, "{}", v),
            Err(_) => write!(f, "{:#?}", self),
        }
    }
}
