//! Component records
//!
//! A component is one `--- !u!<classID> &<fileID>` block of a UYAML
//! document. All of its fields hang off a single root property, usually
//! named after the Unity type (`GameObject:`, `Transform:`, ...).

use crate::class_id::ClassId;
use crate::node::{Node, Object, Property};
use serde::Serialize;
use std::fmt;

/// One top-level block of a UYAML document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    /// Unity type of the block
    pub class_id: ClassId,
    /// Local identifier used by `{fileID: ...}` references
    pub file_id: i64,
    /// Indentation baseline of the block
    #[serde(skip)]
    pub level: usize,
    /// The property holding every field of this component
    pub root_property: Option<Property>,
}

impl Component {
    /// Create a component without a root property
    pub fn new<C: Into<ClassId>>(class_id: C, file_id: i64) -> Self {
        Self {
            class_id: class_id.into(),
            file_id,
            level: 0,
            root_property: None,
        }
    }

    /// Create a component whose root property `name` holds `fields`
    pub fn with_fields<C: Into<ClassId>, S: Into<String>>(
        class_id: C,
        file_id: i64,
        name: S,
        fields: Object,
    ) -> Self {
        let mut component = Self::new(class_id, file_id);
        component.root_property = Some(Property::new(name, Node::Object(fields.with_level(1))));
        component
    }

    /// Set the root property. A component has exactly one, so a second
    /// call returns `false` and keeps the first.
    pub fn add(&mut self, property: Property) -> bool {
        if self.root_property.is_some() {
            return false;
        }
        self.root_property = Some(property);
        true
    }

    /// Name of the root property, i.e. the Unity type name as written in the file
    pub fn class_name(&self) -> Option<&str> {
        self.root_property.as_ref().map(|p| p.name.as_str())
    }

    /// Root node, if any
    pub fn root(&self) -> Option<&Node> {
        self.root_property.as_ref().map(|p| &p.value)
    }

    pub fn root_mut(&mut self) -> Option<&mut Node> {
        self.root_property.as_mut().map(|p| &mut p.value)
    }

    /// Fields of the root object
    pub fn fields(&self) -> Option<&Object> {
        self.root().and_then(Node::as_object)
    }

    pub fn fields_mut(&mut self) -> Option<&mut Object> {
        self.root_mut().and_then(Node::as_object_mut)
    }

    /// Look up a top-level field
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.fields().and_then(|f| f.get(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.fields_mut().and_then(|f| f.get_mut(key))
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// The object name (m_Name property if it exists)
    pub fn name(&self) -> Option<&str> {
        self.get("m_Name").and_then(Node::text)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class_name() {
            Some(name) => write!(f, "{} !u!{} &{}", name, self.class_id.0, self.file_id),
            None => write!(f, "!u!{} &{}", self.class_id.0, self.file_id),
        }
    }
}
