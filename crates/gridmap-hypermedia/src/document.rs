//! Mason documents
//!
//! A document is a set of data fields plus optional `@controls`,
//! `@namespaces` and `@error` properties. A document without controls
//! serializes to exactly its data fields, which is the plain
//! representation.

use crate::relations::{Relation, LINK_RELATIONS, NAMESPACE};
use serde::Serialize;
use serde_json::{Map as Fields, Value};
use std::collections::BTreeMap;

/// HTTP method of a control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ControlMethod {
    /// Create a child resource
    Post,
    /// Replace the resource
    Put,
    /// Remove the resource
    Delete,
}

/// A hypermedia control
///
/// Plain links carry only `href`. POST and PUT controls carry method,
/// encoding, title and the schema of the expected body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Control {
    /// Target path
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<ControlMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

impl Control {
    /// Plain navigation link
    #[must_use]
    pub fn link(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            method: None,
            encoding: None,
            title: None,
            schema: None,
        }
    }

    /// POST control with a JSON body schema
    #[must_use]
    pub fn post(href: impl Into<String>, title: impl Into<String>, schema: Value) -> Self {
        Self {
            href: href.into(),
            method: Some(ControlMethod::Post),
            encoding: Some("json"),
            title: Some(title.into()),
            schema: Some(schema),
        }
    }

    /// PUT control with a JSON body schema
    #[must_use]
    pub fn put(href: impl Into<String>, title: impl Into<String>, schema: Value) -> Self {
        Self {
            href: href.into(),
            method: Some(ControlMethod::Put),
            encoding: Some("json"),
            title: Some(title.into()),
            schema: Some(schema),
        }
    }

    /// DELETE control
    #[must_use]
    pub fn delete(href: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            method: Some(ControlMethod::Delete),
            encoding: None,
            title: Some(title.into()),
            schema: None,
        }
    }

    fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Mason document under construction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MasonDocument {
    fields: Fields<String, Value>,
    controls: BTreeMap<Relation, Control>,
    error: Option<(String, String)>,
    // Set when an embedded document carries a custom relation
    nested_custom: bool,
}

impl MasonDocument {
    /// Create empty document
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create document from data fields
    #[inline]
    #[must_use]
    pub fn from_fields(fields: Fields<String, Value>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    /// Set a data field
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Embed an array of documents under a data field
    ///
    /// Embedded documents never declare namespaces; their custom relations
    /// are declared once on the root.
    pub fn insert_documents(&mut self, key: impl Into<String>, documents: Vec<MasonDocument>) {
        self.nested_custom |= documents.iter().any(MasonDocument::uses_custom_relations);
        let items = documents.into_iter().map(MasonDocument::into_embedded).collect();
        self.fields.insert(key.into(), Value::Array(items));
    }

    /// Add a control
    pub fn add_control(&mut self, relation: Relation, control: Control) {
        self.controls.insert(relation, control);
    }

    /// Add controls from a decision table row
    pub fn add_controls(&mut self, controls: impl IntoIterator<Item = (Relation, Control)>) {
        self.controls.extend(controls);
    }

    /// Add an `@error` element; only meaningful on a root document
    pub fn add_error(&mut self, title: impl Into<String>, details: impl Into<String>) {
        self.error = Some((title.into(), details.into()));
    }

    /// Look up a control
    #[must_use]
    pub fn control(&self, relation: Relation) -> Option<&Control> {
        self.controls.get(&relation)
    }

    /// Check if this document or an embedded one uses a custom relation
    #[must_use]
    pub fn uses_custom_relations(&self) -> bool {
        self.nested_custom || self.controls.keys().any(|r| r.is_custom())
    }

    /// Serialize as a root document, declaring the namespace if needed
    #[must_use]
    pub fn into_value(self) -> Value {
        let declare = self.uses_custom_relations();
        let mut body = self.into_fields();
        if declare {
            let mut namespaces = Fields::new();
            namespaces.insert(
                NAMESPACE.to_string(),
                serde_json::json!({ "name": LINK_RELATIONS }),
            );
            body.insert("@namespaces".to_string(), Value::Object(namespaces));
        }
        Value::Object(body)
    }

    fn into_embedded(self) -> Value {
        Value::Object(self.into_fields())
    }

    fn into_fields(self) -> Fields<String, Value> {
        let mut body = self.fields;
        if let Some((title, details)) = self.error {
            body.insert(
                "@error".to_string(),
                serde_json::json!({ "@message": title, "@messages": [details] }),
            );
        }
        if !self.controls.is_empty() {
            let controls: Fields<String, Value> = self
                .controls
                .iter()
                .map(|(relation, control)| (relation.name().to_string(), control.to_value()))
                .collect();
            body.insert("@controls".to_string(), Value::Object(controls));
        }
        body
    }
}
