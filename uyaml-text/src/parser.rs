//! UYAML parser
//!
//! Turns the text of a Unity scene/prefab/asset file into a list of
//! [`Component`]s. The format is a YAML subset: every object lives in a
//! `--- !u!<classID> &<fileID>` block, nesting is expressed by indentation,
//! and small collections are written inline as `{a: 1, b: 2}` or `[a, b]`.
//!
//! The parser works line by line and tracks structure with an explicit
//! container stack instead of recursion. Containers under construction are
//! kept in an arena and only turned into [`Node`]s once a block is done,
//! because a property's value may still be replaced by an object or array
//! when the following line turns out to be indented.

use indexmap::IndexMap;
use tracing::{debug, instrument, trace};
use uyaml_core::{
    Array, COMPONENT_HEADER, ClassId, Component, MAX_NESTING_DEPTH, Node, Object, Property,
    Result, UyamlError,
};

type NodeId = usize;

/// Node under construction
#[derive(Debug)]
enum Draft {
    /// A finished node, usually an inline value
    Leaf(Node),
    Object {
        level: usize,
        properties: IndexMap<String, NodeId>,
    },
    Array {
        level: usize,
        items: Vec<NodeId>,
    },
}

/// Something properties or items can be added to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Component,
    Node(NodeId),
}

#[derive(Debug)]
struct ComponentDraft {
    class_id: ClassId,
    file_id: i64,
    level: usize,
    root: Option<(String, NodeId)>,
}

/// Parser for UYAML documents.
///
/// A parser can be reused for several documents, but not shared between
/// threads while parsing; all state is reset for every block.
#[derive(Debug, Default)]
pub struct Parser {
    nodes: Vec<Draft>,
    component: Option<ComponentDraft>,
    current: Option<Container>,
    stack: Vec<Container>,
    /// Name and value of the last parsed `key: value` line
    property: Option<(String, NodeId)>,

    /// Width of one indentation level, inferred from the first indented line
    spaces_per_level: usize,
    indent_level: usize,
    prev_indent_level: usize,
    /// Byte offset of the line being parsed
    position: usize,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whole document with a fresh parser
    #[instrument(skip_all, fields(len = content.len()))]
    pub fn parse(content: &str) -> Result<Vec<Component>> {
        Parser::new().parse_document(content)
    }

    /// Parse every component block of `content`.
    ///
    /// Text before the first block (the `%YAML`/`%TAG` preamble) is ignored.
    /// Fails if no block is found or any block is malformed.
    pub fn parse_document(&mut self, content: &str) -> Result<Vec<Component>> {
        let mut offset = find_header(content, 0)
            .ok_or_else(|| UyamlError::parse("There were no component blocks found", 0))?;

        let mut components = Vec::new();
        loop {
            let next = find_header(content, offset + COMPONENT_HEADER.len());
            let end = next.unwrap_or(content.len());
            let block = strip_line_break(&content[offset..end]);

            let component = self.parse_component(block, offset)?;
            debug!(
                class_id = component.class_id.0,
                file_id = component.file_id,
                offset,
                "parsed component"
            );
            components.push(component);

            match next {
                Some(n) => offset = n,
                None => break,
            }
        }

        Ok(components)
    }

    fn reset(&mut self) {
        self.nodes.clear();
        self.component = None;
        self.current = None;
        self.stack.clear();
        self.property = None;
        self.spaces_per_level = 0;
        self.indent_level = 0;
        self.prev_indent_level = 0;
        self.position = 0;
    }

    /// Parse one block. `base` is the block's offset in the document.
    fn parse_component(&mut self, block: &str, base: usize) -> Result<Component> {
        self.reset();

        // A newline only ends a line outside of inline objects and arrays
        let mut brackets = Brackets::default();
        let mut start = 0;
        for (i, byte) in block.bytes().enumerate() {
            if byte == b'\n' && brackets.is_closed() {
                self.position = base + start;
                self.parse_line(&block[start..i])?;
                brackets.end_line();
                start = i + 1;
                continue;
            }

            brackets.feed(byte);
            if brackets.is_underflow() {
                return Err(UyamlError::parse(
                    "Closing bracket without a matching opening one",
                    base + start,
                ));
            }
        }

        if !brackets.is_closed() {
            return Err(UyamlError::parse(
                "Inline object or array is never closed",
                base + start,
            ));
        }

        if start < block.len() {
            self.position = base + start;
            self.parse_line(&block[start..])?;
        }

        self.finish(base)
    }

    /// Turn the drafts of the current block into a component
    fn finish(&mut self, base: usize) -> Result<Component> {
        let draft = self
            .component
            .take()
            .ok_or_else(|| UyamlError::parse("The block is missing the component header", base))?;

        let root_property = match draft.root {
            Some((name, id)) => Some(Property::new(name, self.materialize(id))),
            None => None,
        };

        Ok(Component {
            class_id: draft.class_id,
            file_id: draft.file_id,
            level: draft.level,
            root_property,
        })
    }

    fn materialize(&mut self, id: NodeId) -> Node {
        match std::mem::replace(&mut self.nodes[id], Draft::Leaf(Node::default())) {
            Draft::Leaf(node) => node,
            Draft::Object { level, properties } => {
                let mut obj = Object::new().with_level(level);
                for (name, child) in properties {
                    let child = self.materialize(child);
                    obj.add(Property::new(name, child));
                }
                Node::Object(obj)
            }
            Draft::Array { level, items } => {
                let arr: Array = items.into_iter().map(|c| self.materialize(c)).collect();
                Node::Array(arr.with_level(level))
            }
        }
    }

    fn parse_line(&mut self, raw: &str) -> Result<()> {
        if raw.trim().is_empty() {
            return Ok(());
        }

        self.prev_indent_level = self.indent_level;
        let (mut level, mut line) = self.tabulate(raw);
        if self.spaces_per_level < 1 {
            // The first indented line decides the indentation width
            self.spaces_per_level = level;
            (level, line) = self.tabulate(raw);
        }
        self.indent_level = level;

        let Some(current) = self.current else {
            return self.parse_header(line, level);
        };

        let mut is_array_entry = false;
        if let Some(rest) = strip_array_marker(line) {
            line = rest;
            level += 1;
            self.indent_level = level;
            is_array_entry = true;
        }

        if level > MAX_NESTING_DEPTH {
            return Err(self.error(format!(
                "Nesting deeper than {} levels",
                MAX_NESTING_DEPTH
            )));
        }

        let diff = level as isize - self.prev_indent_level as isize;
        trace!(level, diff, is_array_entry, line, "parse line");

        // `- ` markers may be indented one level below their key
        let max_growth = if is_array_entry { 2 } else { 1 };
        if diff > max_growth {
            return Err(self.error(format!(
                "Indentation grew too rapidly. Changed by {}",
                diff
            )));
        } else if diff > 0 {
            let Some(value_id) = self.property_value() else {
                return Err(self.error("Indented line has no property to nest under"));
            };

            if !is_array_entry
                && current != Container::Component
                && self.append_to_scalar(value_id, line, None)
            {
                // Continuation of a multi-line scalar
                return Ok(());
            }

            // Only a property without a value can turn into a container
            if !self.is_empty_value(value_id) {
                return Err(self.error("Indented line has no property to nest under"));
            }
            self.nodes[value_id] = if is_array_entry {
                Draft::Array {
                    level,
                    items: Vec::new(),
                }
            } else {
                Draft::Object {
                    level,
                    properties: IndexMap::new(),
                }
            };
            self.open(value_id, current);
        } else if diff < 0 {
            self.close_to(level, is_array_entry)?;
        } else if let Some(value_id) = self.property_value() {
            if !is_array_entry
                && level > 0
                && self.append_to_scalar(value_id, line, Some(level - 1))
            {
                return Ok(());
            }
        }

        if !is_key_value(line) {
            let container = if is_array_entry {
                self.entry_array()?
            } else {
                self.current()
            };
            if !self.is_array(container) {
                return Err(self.error("Cannot add key-less values to an object"));
            }
            let mut value = self.parse_value(line, 0)?;
            value.set_level(level);
            let value_id = self.alloc(Draft::Leaf(value));
            self.push_item(container, value_id);
            return Ok(());
        }

        let (name, rest) = line
            .split_once(':')
            .ok_or_else(|| self.error(format!("Cannot find property name in '{}'", line)))?;
        let name = name.trim();
        let mut value = self.parse_value(rest, 0)?;
        value.set_level(level);
        let value_id = self.alloc(Draft::Leaf(value));
        self.property = Some((name.to_string(), value_id));

        if is_array_entry {
            let container = self.entry_array()?;
            // A `- key: value` line starts a new object item
            let item = self.alloc(Draft::Object {
                level,
                properties: IndexMap::new(),
            });
            self.push_item(container, item);
            self.open(item, container);
        }

        if !self.add_property(self.current(), name, value_id) {
            return Err(self.error(format!("Failed to add the property '{}'", name)));
        }

        Ok(())
    }

    /// Handle the first line of a block: `--- !u!<classID> &<fileID>`
    fn parse_header(&mut self, line: &str, level: usize) -> Result<()> {
        if !line.starts_with(COMPONENT_HEADER) {
            return Err(self.error(format!("Expecting a new block, but got '{}'", line)));
        }

        let segments: Vec<&str> = line.split_whitespace().collect();
        if segments.len() != 3 {
            return Err(self.error("Expecting 3 parts in the block header"));
        }

        let class_id = segments[1]
            .strip_prefix("!u!")
            .and_then(|id| id.parse::<i32>().ok())
            .ok_or_else(|| self.error(format!("Invalid class ID '{}'", segments[1])))?;
        let file_id = segments[2]
            .strip_prefix('&')
            .and_then(|id| id.parse::<i64>().ok())
            .ok_or_else(|| self.error(format!("Invalid file ID '{}'", segments[2])))?;

        self.component = Some(ComponentDraft {
            class_id: ClassId(class_id),
            file_id,
            level,
            root: None,
        });
        self.current = Some(Container::Component);
        Ok(())
    }

    /// Pop containers after the indentation decreased to `level`
    fn close_to(&mut self, level: usize, is_array_entry: bool) -> Result<()> {
        let mut popped = false;
        while self.container_level(self.current()).is_some_and(|l| l > level) {
            let parent = self.pop()?;
            self.current = Some(parent);
            popped = true;
        }

        // Nothing was deeper than the new line, which happens after a
        // multi-line scalar. An array entry then belongs to the array
        // sitting at its own level.
        if !popped && is_array_entry {
            while let Some(&top) = self.stack.last() {
                if self.container_level(top) != Some(level) {
                    break;
                }
                self.stack.pop();
                self.current = Some(top);
            }
        }

        Ok(())
    }

    /// The array a `- ` line adds to: the current container, or the array
    /// holding the current object item
    fn entry_array(&mut self) -> Result<Container> {
        let mut container = self.current();
        if !self.is_array(container) && self.stack.last().is_some_and(|c| self.is_array(*c)) {
            container = self.pop()?;
            self.current = Some(container);
        }

        if !self.is_array(container) {
            return Err(self.error(
                "Adding a new array item, but could not get an array to put it in",
            ));
        }
        Ok(container)
    }

    fn is_empty_value(&self, id: NodeId) -> bool {
        matches!(&self.nodes[id], Draft::Leaf(Node::Value(value)) if value.text.is_empty())
    }

    /// Append `line` to the scalar `value_id` if it holds non-empty text
    /// (and sits at `at_level`, when given).
    fn append_to_scalar(&mut self, value_id: NodeId, line: &str, at_level: Option<usize>) -> bool {
        let Draft::Leaf(Node::Value(value)) = &mut self.nodes[value_id] else {
            return false;
        };
        if value.text.is_empty() || at_level.is_some_and(|l| l != value.level) {
            return false;
        }
        value.text.push(' ');
        value.text.push_str(line.trim());
        true
    }

    /// Parse an inline value: scalar, `"quoted"`, `{a: 1}` or `[a, b]`
    fn parse_value(&self, value: &str, depth: usize) -> Result<Node> {
        if depth > MAX_NESTING_DEPTH {
            return Err(self.error("Inline values nested too deeply"));
        }

        let content = value.trim();
        if content.is_empty() {
            return Ok(Node::default());
        }

        if is_wrapped(content, '{', '}') {
            let mut obj = Object::new();
            let inner = &content[1..content.len() - 1];
            if !inner.trim().is_empty() {
                for part in split_top_level(inner) {
                    let (name, rest) = part.split_once(':').ok_or_else(|| {
                        self.error("Cannot parse non-key values inside an inline object")
                    })?;
                    let name = name.trim();
                    let child = self.parse_value(rest, depth + 1)?;
                    if !obj.add(Property::new(name, child)) {
                        return Err(self.error(format!(
                            "Duplicate property '{}' in inline object",
                            name
                        )));
                    }
                }
            }
            return Ok(Node::Object(obj));
        }

        if is_wrapped(content, '[', ']') {
            let mut arr = Array::new();
            let inner = &content[1..content.len() - 1];
            if !inner.trim().is_empty() {
                for part in split_top_level(inner) {
                    arr.add(self.parse_value(part, depth + 1)?);
                }
            }
            return Ok(Node::Array(arr));
        }

        if is_wrapped(content, '"', '"') {
            let inner = &content[1..content.len() - 1];
            return Ok(Node::value(inner.replace("\\\"", "\"")));
        }

        Ok(Node::value(content))
    }

    /// Measure indentation of `content`, returning its level and the text
    /// without leading whitespace or trailing `\r`.
    fn tabulate<'a>(&self, content: &'a str) -> (usize, &'a str) {
        let spaces = content
            .bytes()
            .take_while(|b| *b == b' ' || *b == b'\t')
            .count();
        let line = content
            .trim_start_matches([' ', '\t', '\n', '\r'])
            .trim_end_matches('\r');
        (spaces / self.spaces_per_level.max(1), line)
    }

    fn property_value(&self) -> Option<NodeId> {
        self.property.as_ref().map(|(_, id)| *id)
    }

    fn current(&self) -> Container {
        self.current.unwrap_or(Container::Component)
    }

    fn alloc(&mut self, draft: Draft) -> NodeId {
        self.nodes.push(draft);
        self.nodes.len() - 1
    }

    /// Make `id` the current container, remembering `parent`
    fn open(&mut self, id: NodeId, parent: Container) {
        self.stack.push(parent);
        self.current = Some(Container::Node(id));
    }

    fn pop(&mut self) -> Result<Container> {
        self.stack
            .pop()
            .ok_or_else(|| self.error("Indentation closed more structures than were opened"))
    }

    fn is_array(&self, container: Container) -> bool {
        matches!(container, Container::Node(id) if matches!(self.nodes[id], Draft::Array { .. }))
    }

    fn container_level(&self, container: Container) -> Option<usize> {
        match container {
            Container::Component => None,
            Container::Node(id) => Some(match &self.nodes[id] {
                Draft::Leaf(node) => node.level(),
                Draft::Object { level, .. } | Draft::Array { level, .. } => *level,
            }),
        }
    }

    fn push_item(&mut self, container: Container, item: NodeId) {
        if let Container::Node(id) = container {
            if let Draft::Array { items, .. } = &mut self.nodes[id] {
                items.push(item);
            }
        }
    }

    /// Add a property to a container. Like [`Object::add`], a taken name
    /// or a container that cannot hold properties yields `false`.
    fn add_property(&mut self, container: Container, name: &str, value: NodeId) -> bool {
        match container {
            Container::Component => match &mut self.component {
                Some(component) if component.root.is_none() => {
                    component.root = Some((name.to_string(), value));
                    true
                }
                _ => false,
            },
            Container::Node(id) => match &mut self.nodes[id] {
                Draft::Object { properties, .. } if !properties.contains_key(name) => {
                    properties.insert(name.to_string(), value);
                    true
                }
                _ => false,
            },
        }
    }

    fn error<S: Into<String>>(&self, message: S) -> UyamlError {
        UyamlError::parse(message, self.position)
    }
}

/// Nesting of `{}` and `[]` outside of quoted text.
///
/// `"` opens a quote anywhere, `'` only where a scalar starts (after `:`,
/// `,`, `-` or an opening bracket). Inside single quotes `''` is an escaped
/// quote. Quotes do not carry over to the next line, so a stray quote in a
/// plain scalar cannot swallow the rest of a block.
#[derive(Debug, Default)]
pub(crate) struct Brackets {
    objects: i32,
    arrays: i32,
    quote: Option<u8>,
    escaped: bool,
    /// The previous byte closed a single-quoted scalar
    closed_single: bool,
    /// The previous byte that was not whitespace
    prev_token: u8,
}

impl Brackets {
    pub(crate) fn feed(&mut self, byte: u8) {
        let closed_single = std::mem::take(&mut self.closed_single);
        self.step(byte, closed_single);
        if !byte.is_ascii_whitespace() {
            self.prev_token = byte;
        }
    }

    fn step(&mut self, byte: u8, closed_single: bool) {
        match self.quote {
            Some(b'"') => match byte {
                _ if self.escaped => self.escaped = false,
                b'\\' => self.escaped = true,
                b'"' => self.quote = None,
                _ => {}
            },
            Some(_) => {
                if byte == b'\'' {
                    self.quote = None;
                    self.closed_single = true;
                }
            }
            None => match byte {
                b'"' => self.quote = Some(b'"'),
                b'\'' if closed_single || starts_scalar(self.prev_token) => {
                    self.quote = Some(b'\'')
                }
                b'{' => self.objects += 1,
                b'}' => self.objects -= 1,
                b'[' => self.arrays += 1,
                b']' => self.arrays -= 1,
                _ => {}
            },
        }
    }

    pub(crate) fn end_line(&mut self) {
        self.quote = None;
        self.escaped = false;
        self.closed_single = false;
        self.prev_token = 0;
    }

    pub(crate) fn is_quoted(&self) -> bool {
        self.quote.is_some()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.objects == 0 && self.arrays == 0
    }

    pub(crate) fn is_underflow(&self) -> bool {
        self.objects < 0 || self.arrays < 0
    }

    /// Whether `text` on its own leaves every bracket closed
    pub(crate) fn balanced(text: &str) -> bool {
        let mut brackets = Brackets::default();
        for byte in text.bytes() {
            brackets.feed(byte);
            if brackets.is_underflow() {
                return false;
            }
        }
        brackets.is_closed()
    }
}

fn starts_scalar(prev_token: u8) -> bool {
    matches!(prev_token, 0 | b':' | b',' | b'-' | b'[' | b'{')
}

/// Byte order mark some editors put in front of the first block
const BOM: &str = "\u{feff}";

/// Find the next component header that starts a line, at or after `from`
fn find_header(content: &str, from: usize) -> Option<usize> {
    let mut search = from;
    while let Some(found) = content.get(search..)?.find(COMPONENT_HEADER) {
        let at = search + found;
        let line_start = at == 0 || content.as_bytes()[at - 1] == b'\n';
        if line_start || content.get(..at) == Some(BOM) {
            return Some(at);
        }
        search = at + COMPONENT_HEADER.len();
    }
    None
}

fn strip_line_break(block: &str) -> &str {
    let block = block.strip_suffix('\n').unwrap_or(block);
    block.strip_suffix('\r').unwrap_or(block)
}

/// `- item` or a lone `-`
fn strip_array_marker(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('-')?;
    if rest.is_empty() || rest.starts_with([' ', '\t']) {
        Some(rest.trim_start())
    } else {
        None
    }
}

fn is_key_value(line: &str) -> bool {
    line.contains(':') && !line.starts_with(['{', '[', '"', '\''])
}

fn is_wrapped(content: &str, open: char, close: char) -> bool {
    content.len() >= 2 && content.starts_with(open) && content.ends_with(close)
}

/// Split on commas that are not nested in brackets or quotes
fn split_top_level(content: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut brackets = Brackets::default();
    let mut start = 0;

    for (i, byte) in content.bytes().enumerate() {
        if byte == b',' && brackets.is_closed() && !brackets.is_quoted() {
            parts.push(&content[start..i]);
            start = i + 1;
        }
        brackets.feed(byte);
    }
    parts.push(&content[start..]);
    parts
}
