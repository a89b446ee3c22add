// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! O-DF node types: the root `Objects`, interior `Object`s and leaf `InfoItem`s,
//! plus the descriptive elements attached to them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::errors::OdfError;
use crate::odf::{Path, Value};
use crate::utils::{merge_attributes, union_distinct};

/// Human readable description, optionally tagged with a language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Description {
    pub text: String,
    pub language: Option<String>,
}

impl Description {
    pub fn new(text: impl Into<String>, language: Option<String>) -> Self {
        Self {
            text: text.into(),
            language,
        }
    }
}

/// External identifier correlated with a node, with an optional validity interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QlmId {
    pub id: String,
    pub id_type: Option<String>,
    pub tag_type: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
}

impl QlmId {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            id_type: None,
            tag_type: None,
            start_date: None,
            end_date: None,
            attributes: HashMap::new(),
        }
    }

    /// Whether `instant` falls inside the (inclusive, open-ended) validity interval.
    pub fn is_valid_at(&self, instant: DateTime<Utc>) -> bool {
        self.start_date.map_or(true, |start| start <= instant)
            && self.end_date.map_or(true, |end| instant <= end)
    }
}

/// Metadata about an InfoItem, itself expressed as InfoItems.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MetaData {
    pub info_items: Vec<InfoItem>,
}

impl MetaData {
    pub fn new(info_items: Vec<InfoItem>) -> Self {
        Self { info_items }
    }

    pub fn get(&self, name: &str) -> Option<&InfoItem> {
        self.info_items.iter().find(|ii| ii.name() == name)
    }

    /// Entries with the same name are merged, new names are appended.
    pub fn union(&self, other: &MetaData) -> MetaData {
        let mut merged = self.info_items.clone();
        for incoming in &other.info_items {
            match merged.iter_mut().find(|ii| ii.name() == incoming.name()) {
                Some(existing) => *existing = existing.union(incoming),
                None => merged.push(incoming.clone()),
            }
        }
        MetaData::new(merged)
    }
}

/// Leaf node holding a time series of values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoItem {
    name: String,
    path: Path,
    type_attribute: Option<String>,
    names: Vec<QlmId>,
    descriptions: Vec<Description>,
    values: Vec<Value>,
    meta_data: Option<MetaData>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    attributes: HashMap<String, String>,
}

impl InfoItem {
    /// Empty InfoItem at `path`; its name is the last path segment.
    pub fn new(path: Path) -> Result<Self, OdfError> {
        if path.is_root() {
            return Err(OdfError::invalid_path(
                path.to_string(),
                "InfoItem cannot be placed at the root",
            ));
        }
        Ok(Self {
            name: path.name().to_string(),
            path,
            type_attribute: None,
            names: Vec::new(),
            descriptions: Vec::new(),
            values: Vec::new(),
            meta_data: None,
            attributes: HashMap::new(),
        })
    }

    /// Like [`InfoItem::new`], but checks that `name` matches the path.
    pub fn named(name: &str, path: Path) -> Result<Self, OdfError> {
        if path.name() != name {
            return Err(OdfError::NameMismatch {
                name: name.to_string(),
                path: path.to_string(),
            });
        }
        Self::new(path)
    }

    pub fn with_type_attribute(mut self, type_attribute: Option<String>) -> Self {
        self.type_attribute = type_attribute;
        self
    }

    pub fn with_names(mut self, names: Vec<QlmId>) -> Self {
        self.names = names;
        self
    }

    pub fn with_descriptions(mut self, descriptions: Vec<Description>) -> Self {
        self.descriptions = descriptions;
        self
    }

    pub fn with_values(mut self, mut values: Vec<Value>) -> Self {
        values.sort_by_key(|v| v.timestamp());
        self.values = values;
        self
    }

    pub fn with_meta_data(mut self, meta_data: Option<MetaData>) -> Self {
        self.meta_data = meta_data;
        self
    }

    pub fn with_attributes(mut self, attributes: HashMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn type_attribute(&self) -> Option<&str> {
        self.type_attribute.as_deref()
    }

    pub fn names(&self) -> &[QlmId] {
        &self.names
    }

    pub fn descriptions(&self) -> &[Description] {
        &self.descriptions
    }

    /// Values ordered by timestamp, oldest first.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn newest_value(&self) -> Option<&Value> {
        self.values.last()
    }

    pub fn meta_data(&self) -> Option<&MetaData> {
        self.meta_data.as_ref()
    }

    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    /// Copy keeping only the `count` latest values.
    pub fn newest(&self, count: usize) -> InfoItem {
        let skip = self.values.len().saturating_sub(count);
        InfoItem {
            values: self.values[skip..].to_vec(),
            ..self.clone()
        }
    }

    pub fn values_removed(&self) -> InfoItem {
        InfoItem {
            values: Vec::new(),
            ..self.clone()
        }
    }

    /// Merge with another InfoItem at the same path.
    ///
    /// Values are concatenated and ordered by timestamp; a value identical in
    /// timestamp and data to one already present is dropped.
    pub fn union(&self, other: &InfoItem) -> InfoItem {
        let mut values = self.values.clone();
        for incoming in &other.values {
            if !values.iter().any(|v| v.same_measurement(incoming)) {
                values.push(incoming.clone());
            }
        }
        values.sort_by_key(|v| v.timestamp());

        InfoItem {
            values,
            ..self.merge_descriptive(other)
        }
    }

    /// Merge where a non-empty incoming value sequence replaces the current one.
    pub fn update(&self, other: &InfoItem) -> InfoItem {
        if other.values.is_empty() {
            return self.union(other);
        }
        InfoItem {
            values: other.values.clone(),
            ..self.merge_descriptive(other)
        }
    }

    fn merge_descriptive(&self, other: &InfoItem) -> InfoItem {
        let meta_data = match (&self.meta_data, &other.meta_data) {
            (Some(left), Some(right)) => Some(left.union(right)),
            (left, right) => right.clone().or_else(|| left.clone()),
        };
        InfoItem {
            name: self.name.clone(),
            path: self.path.clone(),
            type_attribute: other
                .type_attribute
                .clone()
                .or_else(|| self.type_attribute.clone()),
            names: union_distinct(&self.names, &other.names),
            descriptions: union_distinct(&self.descriptions, &other.descriptions),
            values: Vec::new(),
            meta_data,
            attributes: merge_attributes(&self.attributes, &other.attributes),
        }
    }
}

/// Interior node grouping InfoItems and other Objects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Object {
    ids: Vec<QlmId>,
    path: Path,
    type_attribute: Option<String>,
    descriptions: Vec<Description>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    attributes: HashMap<String, String>,
}

impl Object {
    /// Empty Object at `path`, as synthesized for missing ancestors.
    pub fn new(path: Path) -> Result<Self, OdfError> {
        if path.is_root() {
            return Err(OdfError::invalid_path(
                path.to_string(),
                "Object cannot be placed at the root",
            ));
        }
        Ok(Self {
            ids: Vec::new(),
            path,
            type_attribute: None,
            descriptions: Vec::new(),
            attributes: HashMap::new(),
        })
    }

    pub fn with_ids(mut self, ids: Vec<QlmId>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_type_attribute(mut self, type_attribute: Option<String>) -> Self {
        self.type_attribute = type_attribute;
        self
    }

    pub fn with_descriptions(mut self, descriptions: Vec<Description>) -> Self {
        self.descriptions = descriptions;
        self
    }

    pub fn with_attributes(mut self, attributes: HashMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn name(&self) -> &str {
        self.path.name()
    }

    pub fn ids(&self) -> &[QlmId] {
        &self.ids
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn type_attribute(&self) -> Option<&str> {
        self.type_attribute.as_deref()
    }

    pub fn descriptions(&self) -> &[Description] {
        &self.descriptions
    }

    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    /// True for an Object carrying nothing but its path.
    pub fn is_placeholder(&self) -> bool {
        self.ids.is_empty()
            && self.type_attribute.is_none()
            && self.descriptions.is_empty()
            && self.attributes.is_empty()
    }

    pub fn union(&self, other: &Object) -> Object {
        Object {
            ids: union_distinct(&self.ids, &other.ids),
            path: self.path.clone(),
            type_attribute: other
                .type_attribute
                .clone()
                .or_else(|| self.type_attribute.clone()),
            descriptions: union_distinct(&self.descriptions, &other.descriptions),
            attributes: merge_attributes(&self.attributes, &other.attributes),
        }
    }
}

/// The implicit root of every O-DF tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Objects {
    version: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    attributes: HashMap<String, String>,
}

impl Objects {
    pub fn new(version: Option<String>, attributes: HashMap<String, String>) -> Self {
        Self {
            version,
            attributes,
        }
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    pub fn union(&self, other: &Objects) -> Objects {
        Objects {
            version: other.version.clone().or_else(|| self.version.clone()),
            attributes: merge_attributes(&self.attributes, &other.attributes),
        }
    }
}

impl Default for Objects {
    fn default() -> Self {
        Self::new(None, HashMap::new())
    }
}

/// Any node of an O-DF tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Node {
    Objects(Objects),
    Object(Object),
    InfoItem(InfoItem),
}

impl Node {
    /// Path of the node; `Objects` for the root.
    pub fn path(&self) -> Path {
        match self {
            Node::Objects(_) => Path::root(),
            Node::Object(obj) => obj.path().clone(),
            Node::InfoItem(ii) => ii.path().clone(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Objects(_) => "Objects",
            Node::Object(_) => "Object",
            Node::InfoItem(_) => "InfoItem",
        }
    }

    pub fn as_info_item(&self) -> Option<&InfoItem> {
        match self {
            Node::InfoItem(ii) => Some(ii),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Node::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_objects(&self) -> Option<&Objects> {
        match self {
            Node::Objects(objs) => Some(objs),
            _ => None,
        }
    }

    pub fn is_info_item(&self) -> bool {
        matches!(self, Node::InfoItem(_))
    }

    /// Combine two nodes at the same path.
    pub fn union(&self, other: &Node) -> Result<Node, OdfError> {
        match (self, other) {
            (Node::Objects(a), Node::Objects(b)) => Ok(Node::Objects(a.union(b))),
            (Node::Object(a), Node::Object(b)) => Ok(Node::Object(a.union(b))),
            (Node::InfoItem(a), Node::InfoItem(b)) => Ok(Node::InfoItem(a.union(b))),
            _ => Err(self.kind_conflict(other)),
        }
    }

    /// Like [`Node::union`], but incoming InfoItem values replace stored ones.
    pub fn update(&self, other: &Node) -> Result<Node, OdfError> {
        match (self, other) {
            (Node::InfoItem(a), Node::InfoItem(b)) => Ok(Node::InfoItem(a.update(b))),
            _ => self.union(other),
        }
    }

    pub fn values_removed(&self) -> Node {
        match self {
            Node::InfoItem(ii) => Node::InfoItem(ii.values_removed()),
            other => other.clone(),
        }
    }

    fn kind_conflict(&self, other: &Node) -> OdfError {
        OdfError::KindConflict {
            path: self.path().to_string(),
            existing: self.kind(),
            incoming: other.kind(),
        }
    }
}

impl From<Objects> for Node {
    fn from(objects: Objects) -> Self {
        Node::Objects(objects)
    }
}

impl From<Object> for Node {
    fn from(object: Object) -> Self {
        Node::Object(object)
    }
}

impl From<InfoItem> for Node {
    fn from(info_item: InfoItem) -> Self {
        Node::InfoItem(info_item)
    }
}
