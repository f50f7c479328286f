//! UYAML writer
//!
//! Renders [`Component`]s back into Unity's YAML dialect. Small collections
//! can be written inline (`{x: 0, y: 0}`, `[a, b]`) and the rules deciding
//! when to do so are configurable through [`WriterOptions`].
//!
//! The writer only reads the tree it is given. A tree it does not know how
//! to render produces missing output rather than an error.

use std::borrow::Cow;
use std::fmt;
use crate::parser::Brackets;
use tracing::trace;
use uyaml_core::{
    Array, COMPONENT_HEADER, Component, LineEnding, Node, Object, UNITY_TAG_URI,
    UNITY_YAML_VERSION,
};

/// Formatting options for [`Writer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    /// Spaces per indentation level
    pub indent_size: usize,
    /// Allow objects to be written as `{a: 1, b: 2}`
    pub inline_objects: bool,
    /// Allow inline objects to contain inline objects and arrays
    pub inline_complex_objects: bool,
    /// Allow arrays to be written as `[a, b]`
    pub inline_arrays: bool,
    /// Allow inline arrays to contain inline objects and arrays
    pub inline_complex_arrays: bool,
    /// Collections with more entries than this are never inlined
    pub max_inline_values: usize,
    /// Prepend the `%YAML` / `%TAG` preamble
    pub include_header: bool,
    pub line_ending: LineEnding,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            indent_size: 2,
            inline_objects: true,
            inline_complex_objects: false,
            inline_arrays: true,
            inline_complex_arrays: false,
            max_inline_values: 3,
            include_header: true,
            line_ending: LineEnding::default(),
        }
    }
}

/// Accumulates rendered components. Call [`Writer::add_component`] for each
/// component, then `to_string()` to get the document.
#[derive(Debug, Default)]
pub struct Writer {
    options: WriterOptions,
    buffer: String,
}

impl Writer {
    /// Create a writer with default options
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: WriterOptions) -> Self {
        Self {
            options,
            buffer: String::new(),
        }
    }

    /// Render `components` with the default options
    pub fn build(components: &[Component]) -> String {
        let mut writer = Writer::new();
        writer.add_components(components);
        writer.to_string()
    }

    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut WriterOptions {
        &mut self.options
    }

    pub fn with_indent_size(mut self, indent_size: usize) -> Self {
        self.options.indent_size = indent_size;
        self
    }

    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.options.line_ending = line_ending;
        self
    }

    pub fn with_inline_objects(mut self, inline: bool) -> Self {
        self.options.inline_objects = inline;
        self
    }

    pub fn with_inline_arrays(mut self, inline: bool) -> Self {
        self.options.inline_arrays = inline;
        self
    }

    /// Let inline objects and arrays nest other inline collections
    pub fn with_inline_complex(mut self, inline: bool) -> Self {
        self.options.inline_complex_objects = inline;
        self.options.inline_complex_arrays = inline;
        self
    }

    pub fn with_max_inline_values(mut self, max: usize) -> Self {
        self.options.max_inline_values = max;
        self
    }

    pub fn with_header(mut self, include_header: bool) -> Self {
        self.options.include_header = include_header;
        self
    }

    pub fn add_components<'a, I>(&mut self, components: I)
    where
        I: IntoIterator<Item = &'a Component>,
    {
        for component in components {
            self.add_component(component);
        }
    }

    pub fn add_component(&mut self, component: &Component) {
        trace!(
            class_id = component.class_id.0,
            file_id = component.file_id,
            "write component"
        );
        self.buffer.push_str(COMPONENT_HEADER);
        self.buffer.push_str(&component.class_id.0.to_string());
        self.buffer.push_str(" &");
        self.buffer.push_str(&component.file_id.to_string());
        self.buffer.push_str(self.eol());

        let Some(root) = &component.root_property else {
            return;
        };

        // The root object is always written as a block, unless it is empty
        match &root.value {
            Node::Object(fields) if !fields.is_empty() => {
                self.buffer.push_str(&root.name);
                self.buffer.push(':');
                self.buffer.push_str(self.eol());
                for (name, value) in fields.iter() {
                    self.append_property(name, value, 1, false, false);
                }
            }
            value => self.append_property(&root.name, value, 0, false, false),
        }
    }

    /// Discard everything written so far
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    fn eol(&self) -> &'static str {
        self.options.line_ending.as_str()
    }

    fn pad(&mut self, level: usize, skip_indent: bool) {
        if !skip_indent {
            let width = level * self.options.indent_size;
            self.buffer.extend(std::iter::repeat_n(' ', width));
        }
    }

    /// Write `name: value` at `indent`. Array items are written as `- value`
    /// one level up; when `skip_indent` is set the line continues the
    /// current one (first property of an array item).
    fn append_property(
        &mut self,
        name: &str,
        node: &Node,
        indent: usize,
        array_item: bool,
        skip_indent: bool,
    ) {
        let mut level = indent;
        let label: Cow<'_, str> = if array_item {
            level = level.saturating_sub(1);
            Cow::Borrowed("-")
        } else if name.is_empty() {
            Cow::Borrowed("")
        } else {
            Cow::Owned(format!("{}:", name))
        };

        self.pad(level, skip_indent);
        self.buffer.push_str(&label);

        match node {
            Node::Value(value) => {
                if !label.is_empty() {
                    self.buffer.push(' ');
                }
                let context = if array_item {
                    Context::Item
                } else {
                    Context::Property
                };
                self.buffer.push_str(&quote(&value.text, context));
                self.buffer.push_str(self.eol());
            }
            // Empty collections and arrays nested in arrays have no block form
            Node::Array(arr) => {
                if arr.is_empty() || array_item || self.can_inline_array(arr) {
                    if !label.is_empty() {
                        self.buffer.push(' ');
                    }
                    self.append_inline(node);
                    self.buffer.push_str(self.eol());
                } else {
                    self.buffer.push_str(self.eol());
                    for item in arr.iter() {
                        self.append_property("", item, level + 1, true, false);
                    }
                }
            }
            Node::Object(obj) => {
                if obj.is_empty() || self.can_inline_object(obj) {
                    if !label.is_empty() {
                        self.buffer.push(' ');
                    }
                    self.append_inline(node);
                    self.buffer.push_str(self.eol());
                } else if array_item {
                    // `- first: value`, remaining properties below it
                    self.buffer.push(' ');
                    for (i, (name, value)) in obj.iter().enumerate() {
                        self.append_property(name, value, level + 1, false, i == 0);
                    }
                } else {
                    self.buffer.push_str(self.eol());
                    for (name, value) in obj.iter() {
                        self.append_property(name, value, level + 1, false, false);
                    }
                }
            }
        }
    }

    /// Render a node as a flow-style literal on the current line
    fn append_inline(&mut self, node: &Node) {
        match node {
            Node::Value(value) => self.buffer.push_str(&quote(&value.text, Context::Inline)),
            Node::Object(obj) => {
                self.buffer.push('{');
                for (i, (name, value)) in obj.iter().enumerate() {
                    if i > 0 {
                        self.buffer.push_str(", ");
                    }
                    self.buffer.push_str(name);
                    self.buffer.push_str(": ");
                    self.append_inline(value);
                }
                self.buffer.push('}');
            }
            Node::Array(arr) => {
                self.buffer.push('[');
                for (i, item) in arr.iter().enumerate() {
                    if i > 0 {
                        self.buffer.push_str(", ");
                    }
                    self.append_inline(item);
                }
                self.buffer.push(']');
            }
        }
    }

    fn can_inline_object(&self, obj: &Object) -> bool {
        if !self.options.inline_objects {
            return false;
        }
        if obj.is_empty() {
            return true;
        }
        if obj.len() > self.options.max_inline_values {
            return false;
        }
        obj.iter()
            .all(|(_, value)| self.can_inline_child(value, self.options.inline_complex_objects))
    }

    fn can_inline_array(&self, arr: &Array) -> bool {
        if !self.options.inline_arrays {
            return false;
        }
        if arr.is_empty() {
            return true;
        }
        if arr.len() > self.options.max_inline_values {
            return false;
        }
        arr.iter()
            .all(|item| self.can_inline_child(item, self.options.inline_complex_arrays))
    }

    fn can_inline_child(&self, node: &Node, complex: bool) -> bool {
        match node {
            Node::Value(_) => true,
            Node::Object(obj) => complex && self.can_inline_object(obj),
            Node::Array(arr) => complex && self.can_inline_array(arr),
        }
    }
}

impl fmt::Display for Writer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.options.include_header {
            let eol = self.eol();
            write!(
                f,
                "%YAML {}.{}{}%TAG !u! {}{}",
                UNITY_YAML_VERSION.0, UNITY_YAML_VERSION.1, eol, UNITY_TAG_URI, eol
            )?;
        }
        f.write_str(&self.buffer)
    }
}

/// Where a scalar is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    /// `name: text`
    Property,
    /// `- text`
    Item,
    /// Inside `{..}` or `[..]`
    Inline,
}

/// Quote scalars that would otherwise be read back as something else
fn quote(text: &str, context: Context) -> Cow<'_, str> {
    let needs_quoting = text.starts_with(['{', '[', '"'])
        || text.trim() != text
        || !Brackets::balanced(text)
        || match context {
            Context::Property => false,
            Context::Item => text.contains(':'),
            Context::Inline => text.contains([',', '{', '}', '[', ']', '\'']),
        };
    if needs_quoting {
        Cow::Owned(format!("\"{}\"", text.replace('"', "\\\"")))
    } else {
        Cow::Borrowed(text)
    }
}
