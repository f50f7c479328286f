//! UYAML node tree
//!
//! A parsed document is a tree of three node shapes: scalar values,
//! ordered objects and arrays. Scalars are kept as the raw text found in
//! the file; numbers and booleans are left for the caller to interpret.
//!
//! Every node carries the indentation `level` it was parsed at. The level
//! is layout metadata only and is ignored by [`Node::structurally_eq`].

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// A node of the UYAML tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Value(Value),
    Object(Object),
    Array(Array),
}

/// A scalar, stored as unparsed text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Value {
    #[serde(skip)]
    pub level: usize,
    pub text: String,
}

/// An insertion-ordered mapping of property names to nodes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Object {
    #[serde(skip)]
    pub level: usize,
    properties: IndexMap<String, Node>,
}

/// An ordered sequence of nodes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Array {
    #[serde(skip)]
    pub level: usize,
    pub items: Vec<Node>,
}

/// A named node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    pub name: String,
    pub value: Node,
}

impl Value {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            level: 0,
            text: text.into(),
        }
    }

    pub fn with_level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    /// Insert a property if its name is not used yet.
    ///
    /// Returns `false` and leaves the object untouched when the name
    /// already exists.
    pub fn add(&mut self, property: Property) -> bool {
        if self.properties.contains_key(&property.name) {
            return false;
        }
        self.properties.insert(property.name, property.value);
        true
    }

    /// Insert or replace a property, keeping the position of an existing one
    pub fn set<S: Into<String>>(&mut self, name: S, value: Node) -> Option<Node> {
        self.properties.insert(name.into(), value)
    }

    /// Remove a property, preserving the order of the remaining ones
    pub fn remove(&mut self, name: &str) -> Option<Node> {
        self.properties.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.properties.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.properties.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Property names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Node)> {
        self.properties.iter_mut().map(|(k, v)| (k.as_str(), v))
    }
}

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    /// Append an item
    pub fn add(&mut self, item: Node) {
        self.items.push(item);
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Node> {
        self.items.iter_mut()
    }
}

impl Property {
    pub fn new<S: Into<String>>(name: S, value: Node) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl Node {
    /// Create a scalar node
    pub fn value<S: Into<String>>(text: S) -> Self {
        Node::Value(Value::new(text))
    }

    /// Indentation level this node was parsed at
    pub fn level(&self) -> usize {
        match self {
            Node::Value(v) => v.level,
            Node::Object(o) => o.level,
            Node::Array(a) => a.level,
        }
    }

    pub fn set_level(&mut self, level: usize) {
        match self {
            Node::Value(v) => v.level = level,
            Node::Object(o) => o.level = level,
            Node::Array(a) => a.level = level,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Node::Value(_))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Node::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_value_mut(&mut self) -> Option<&mut Value> {
        match self {
            Node::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Scalar text, if this is a value node
    pub fn text(&self) -> Option<&str> {
        self.as_value().map(|v| v.text.as_str())
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Node::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Node::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Node::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Node::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Add a named property to this node.
    ///
    /// Only objects accept properties; values and arrays return `false`,
    /// as does an object that already holds the name.
    pub fn add_property(&mut self, property: Property) -> bool {
        match self {
            Node::Object(o) => o.add(property),
            _ => false,
        }
    }

    /// Look up a child property by name (objects only)
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.as_object().and_then(|o| o.get(name))
    }

    /// Compare shape, property order and scalar text, ignoring levels
    pub fn structurally_eq(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Value(a), Node::Value(b)) => a.text == b.text,
            (Node::Object(a), Node::Object(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .zip(b.iter())
                        .all(|((ka, va), (kb, vb))| ka == kb && va.structurally_eq(vb))
            }
            (Node::Array(a), Node::Array(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .zip(b.iter())
                        .all(|(x, y)| x.structurally_eq(y))
            }
            _ => false,
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Node::Value(Value::default())
    }
}

impl From<Value> for Node {
    fn from(v: Value) -> Self {
        Node::Value(v)
    }
}

impl From<Object> for Node {
    fn from(o: Object) -> Self {
        Node::Object(o)
    }
}

impl From<Array> for Node {
    fn from(a: Array) -> Self {
        Node::Array(a)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::value(s)
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::value(s)
    }
}

impl FromIterator<Property> for Object {
    /// Later duplicates are dropped, matching [`Object::add`]
    fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
        let mut obj = Object::new();
        for property in iter {
            obj.add(property);
        }
        obj
    }
}

impl FromIterator<Node> for Array {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Array {
            level: 0,
            items: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Value(v) => write!(f, "{}", v.text),
            Node::Array(arr) => {
                write!(f, "[")?;
                for (i, item) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Node::Object(obj) => {
                write!(f, "{{")?;
                for (i, (key, value)) in obj.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}
