// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Timestamped, typed O-DF values and lenient type coercion.
//!
//! Publishers routinely mislabel their encodings, so casting a raw value to
//! its declared XML Schema type never fails: when the cast is impossible the
//! value keeps its raw text and is tagged [`Coercion::Fallback`].

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::observability::messages::odf::ValueCoercionFallback;
use crate::observability::messages::StructuredLog;

pub const XS_STRING: &str = "xs:string";

/// The typed payload of a [`Value`].
///
/// Equality treats NaN as equal to NaN so that a stored NaN reading is
/// recognised as a duplicate of itself.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OdfValue {
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    DateTime(DateTime<FixedOffset>),
    String(String),
}

impl OdfValue {
    /// Canonical XML Schema name of the held data.
    pub fn type_name(&self) -> &'static str {
        match self {
            OdfValue::Short(_) => "xs:short",
            OdfValue::Int(_) => "xs:int",
            OdfValue::Long(_) => "xs:long",
            OdfValue::Float(_) => "xs:float",
            OdfValue::Double(_) => "xs:double",
            OdfValue::Boolean(_) => "xs:boolean",
            OdfValue::DateTime(_) => "xs:dateTime",
            OdfValue::String(_) => XS_STRING,
        }
    }
}

impl PartialEq for OdfValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (OdfValue::Short(a), OdfValue::Short(b)) => a == b,
            (OdfValue::Int(a), OdfValue::Int(b)) => a == b,
            (OdfValue::Long(a), OdfValue::Long(b)) => a == b,
            (OdfValue::Float(a), OdfValue::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (OdfValue::Double(a), OdfValue::Double(b)) => a == b || (a.is_nan() && b.is_nan()),
            (OdfValue::Boolean(a), OdfValue::Boolean(b)) => a == b,
            (OdfValue::DateTime(a), OdfValue::DateTime(b)) => a == b,
            (OdfValue::String(a), OdfValue::String(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for OdfValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OdfValue::Short(v) => write!(f, "{}", v),
            OdfValue::Int(v) => write!(f, "{}", v),
            OdfValue::Long(v) => write!(f, "{}", v),
            OdfValue::Float(v) => write!(f, "{}", v),
            OdfValue::Double(v) => write!(f, "{}", v),
            OdfValue::Boolean(v) => write!(f, "{}", v),
            OdfValue::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            OdfValue::String(v) => write!(f, "{}", v),
        }
    }
}

/// Outcome of casting a raw value to its declared type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "coercion", rename_all = "snake_case")]
pub enum Coercion {
    /// The raw text was interpreted as declared.
    Exact,
    /// The cast failed and the raw text was kept as a string.
    Fallback { declared: String, reason: String },
}

/// A single immutable measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Value {
    data: OdfValue,
    type_attribute: String,
    timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    attributes: HashMap<String, String>,
    #[serde(flatten)]
    coercion: Coercion,
}

impl Value {
    /// Value from already typed data; the declared type is the data's own type.
    pub fn new(data: OdfValue, timestamp: DateTime<Utc>) -> Self {
        Self {
            type_attribute: data.type_name().to_string(),
            data,
            timestamp,
            attributes: HashMap::new(),
            coercion: Coercion::Exact,
        }
    }

    /// Value from its raw text form, cast to `type_attribute` when possible.
    ///
    /// ```
    /// use chrono::Utc;
    /// use std::collections::HashMap;
    /// use omi_node::odf::{OdfValue, Value};
    ///
    /// let ok = Value::from_string("21.5", "xs:double", Utc::now(), HashMap::new());
    /// assert_eq!(ok.data(), &OdfValue::Double(21.5));
    ///
    /// let mislabeled = Value::from_string("warm", "xs:double", Utc::now(), HashMap::new());
    /// assert!(mislabeled.is_fallback());
    /// assert_eq!(mislabeled.as_str(), Some("warm"));
    /// assert_eq!(mislabeled.type_attribute(), "xs:double");
    /// ```
    pub fn from_string(
        raw: &str,
        type_attribute: &str,
        timestamp: DateTime<Utc>,
        attributes: HashMap<String, String>,
    ) -> Self {
        let declared = if type_attribute.trim().is_empty() {
            XS_STRING.to_string()
        } else {
            type_attribute.trim().to_string()
        };

        let (data, coercion) = match cast(raw, &declared) {
            Ok(data) => (data, Coercion::Exact),
            Err(reason) => {
                ValueCoercionFallback {
                    raw,
                    declared: &declared,
                    reason: &reason,
                }
                .log();
                (
                    OdfValue::String(raw.to_string()),
                    Coercion::Fallback {
                        declared: declared.clone(),
                        reason,
                    },
                )
            }
        };

        Self {
            data,
            type_attribute: declared,
            timestamp,
            attributes,
            coercion,
        }
    }

    pub fn with_attributes(mut self, attributes: HashMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn data(&self) -> &OdfValue {
        &self.data
    }

    /// Declared type as received, even when the cast fell back to a string.
    pub fn type_attribute(&self) -> &str {
        &self.type_attribute
    }

    /// Type of the data actually held.
    pub fn value_type(&self) -> &'static str {
        self.data.type_name()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    pub fn coercion(&self) -> &Coercion {
        &self.coercion
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.coercion, Coercion::Fallback { .. })
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.data {
            OdfValue::Short(v) => Some(v as f64),
            OdfValue::Int(v) => Some(v as f64),
            OdfValue::Long(v) => Some(v as f64),
            OdfValue::Float(v) => Some(v as f64),
            OdfValue::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.data {
            OdfValue::Boolean(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.data {
            OdfValue::String(v) => Some(v),
            _ => None,
        }
    }

    /// Same measurement: identical timestamp and data.
    pub fn same_measurement(&self, other: &Value) -> bool {
        self.timestamp == other.timestamp && self.data == other.data
    }
}

fn cast(raw: &str, declared: &str) -> Result<OdfValue, String> {
    let local = declared.strip_prefix("xs:").unwrap_or(declared);
    let text = raw.trim();
    match local {
        "short" => text.parse().map(OdfValue::Short).map_err(|e| e.to_string()),
        "int" => text.parse().map(OdfValue::Int).map_err(|e| e.to_string()),
        "integer" | "long" => text.parse().map(OdfValue::Long).map_err(|e| e.to_string()),
        "float" => text.parse().map(OdfValue::Float).map_err(|e| e.to_string()),
        "double" | "decimal" => text.parse().map(OdfValue::Double).map_err(|e| e.to_string()),
        "boolean" => match text {
            "true" | "1" => Ok(OdfValue::Boolean(true)),
            "false" | "0" => Ok(OdfValue::Boolean(false)),
            other => Err(format!("'{}' is not a boolean", other)),
        },
        "dateTime" => DateTime::parse_from_rfc3339(text)
            .map(OdfValue::DateTime)
            .map_err(|e| e.to_string()),
        // Strings and unknown types keep the raw text under the declared type.
        _ => Ok(OdfValue::String(raw.to_string())),
    }
}
