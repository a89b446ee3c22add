// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Boundary constructors for O-DF nodes.
//!
//! These take loosely shaped input (string paths, optional strings, any
//! iterable collection) as produced by a parser or an agent, validate it
//! once, and return the canonical node types. Empty optional strings are
//! normalized to `None`. Inputs are never modified.
//!
//! ```
//! use chrono::Utc;
//! use std::collections::HashMap;
//! use omi_node::odf::factory;
//! use omi_node::traits::Odf;
//!
//! let value = factory::create_value("21.5", "xs:double", Utc::now(), HashMap::new());
//! let temp = factory::create_info_item(
//!     "temp",
//!     "Objects/House/Room/temp",
//!     None,
//!     vec![],
//!     vec![],
//!     vec![value],
//!     None,
//!     HashMap::new(),
//! )
//! .unwrap();
//!
//! let odf = factory::create_immutable_odf(vec![temp.into()]).unwrap();
//! assert_eq!(odf.len(), 4);
//! ```

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::errors::OdfError;
use crate::odf::{
    Description, ImmutableOdf, InfoItem, MetaData, MutableOdf, Node, Object, Objects, Path,
    QlmId, Value,
};
use crate::traits::Odf;

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Value cast to `type_value` when possible, otherwise kept as a string.
pub fn create_value(
    value: &str,
    type_value: &str,
    timestamp: DateTime<Utc>,
    attributes: HashMap<String, String>,
) -> Value {
    Value::from_string(value, type_value, timestamp, attributes)
}

pub fn create_description(text: &str, language: Option<&str>) -> Description {
    Description::new(text, non_empty(language))
}

pub fn create_qlm_id(
    id: &str,
    id_type: Option<&str>,
    tag_type: Option<&str>,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    attributes: HashMap<String, String>,
) -> QlmId {
    QlmId {
        id: id.to_string(),
        id_type: non_empty(id_type),
        tag_type: non_empty(tag_type),
        start_date,
        end_date,
        attributes,
    }
}

pub fn create_meta_data<I>(info_items: I) -> MetaData
where
    I: IntoIterator<Item = InfoItem>,
{
    MetaData::new(info_items.into_iter().collect())
}

/// InfoItem at `path`; `name` must equal the last path segment.
#[allow(clippy::too_many_arguments)]
pub fn create_info_item<N, D, V>(
    name: &str,
    path: &str,
    type_attribute: Option<&str>,
    names: N,
    descriptions: D,
    values: V,
    meta_data: Option<MetaData>,
    attributes: HashMap<String, String>,
) -> Result<InfoItem, OdfError>
where
    N: IntoIterator<Item = QlmId>,
    D: IntoIterator<Item = Description>,
    V: IntoIterator<Item = Value>,
{
    let path: Path = path.parse()?;
    Ok(InfoItem::named(name, path)?
        .with_type_attribute(non_empty(type_attribute))
        .with_names(names.into_iter().collect())
        .with_descriptions(descriptions.into_iter().collect())
        .with_values(values.into_iter().collect())
        .with_meta_data(meta_data)
        .with_attributes(attributes))
}

pub fn create_object<I, D>(
    ids: I,
    path: &str,
    type_attribute: Option<&str>,
    descriptions: D,
    attributes: HashMap<String, String>,
) -> Result<Object, OdfError>
where
    I: IntoIterator<Item = QlmId>,
    D: IntoIterator<Item = Description>,
{
    let path: Path = path.parse()?;
    Ok(Object::new(path)?
        .with_ids(ids.into_iter().collect())
        .with_type_attribute(non_empty(type_attribute))
        .with_descriptions(descriptions.into_iter().collect())
        .with_attributes(attributes))
}

pub fn create_objects(version: Option<&str>, attributes: HashMap<String, String>) -> Objects {
    Objects::new(non_empty(version), attributes)
}

pub fn create_immutable_odf<I>(nodes: I) -> Result<ImmutableOdf, OdfError>
where
    I: IntoIterator<Item = Node>,
{
    ImmutableOdf::from_nodes(nodes)
}

pub fn create_mutable_odf<I>(nodes: I) -> Result<MutableOdf, OdfError>
where
    I: IntoIterator<Item = Node>,
{
    MutableOdf::from_nodes(nodes)
}
