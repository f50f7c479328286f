//! Whole-file UYAML documents
//!
//! [`UyamlDocument`] pairs the parsed components of a file with where they
//! came from and the line ending the file used, so a document can be
//! queried, edited and saved back in place.

use crate::parser::Parser;
use crate::writer::{Writer, WriterOptions};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;
use uyaml_core::{ClassId, Component, LineEnding, Result, UyamlError};

/// A Unity YAML document containing one or more components
#[derive(Debug, Clone, Default)]
pub struct UyamlDocument {
    components: Vec<Component>,
    /// File the document was loaded from
    path: Option<PathBuf>,
    /// Line ending style used in the original file
    line_ending: LineEnding,
}

impl UyamlDocument {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a Unity YAML file
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use uyaml_text::UyamlDocument;
    ///
    /// let doc = UyamlDocument::load("Assets/Scenes/Main.unity")?;
    /// println!("{} components", doc.len());
    /// # Ok::<(), uyaml_core::UyamlError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut doc: UyamlDocument = content.parse()?;
        doc.path = Some(path.to_path_buf());
        info!(path = %path.display(), components = doc.len(), "loaded document");
        Ok(doc)
    }

    /// Save document to the file it was loaded from
    pub fn save(&self) -> Result<()> {
        match &self.path {
            Some(path) => self.save_to(path),
            None => Err(UyamlError::format(
                "Cannot save document: no file path available. Use save_to() instead.",
            )),
        }
    }

    /// Save document to a specific file, using the document's line ending
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.dump())?;
        info!(path = %path.display(), components = self.len(), "saved document");
        Ok(())
    }

    /// Render with default options and the document's line ending
    pub fn dump(&self) -> String {
        self.dump_with(WriterOptions {
            line_ending: self.line_ending,
            ..WriterOptions::default()
        })
    }

    pub fn dump_with(&self, options: WriterOptions) -> String {
        let mut writer = Writer::with_options(options);
        writer.add_components(&self.components);
        writer.to_string()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn set_line_ending(&mut self, line_ending: LineEnding) {
        self.line_ending = line_ending;
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut Vec<Component> {
        &mut self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Component whose header carries `file_id`
    pub fn find(&self, file_id: i64) -> Option<&Component> {
        self.components.iter().find(|c| c.file_id == file_id)
    }

    pub fn find_mut(&mut self, file_id: i64) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.file_id == file_id)
    }

    /// Like [`find`](Self::find), but a missing component is an error
    pub fn require(&self, file_id: i64) -> Result<&Component> {
        self.find(file_id)
            .ok_or(UyamlError::ComponentNotFound { file_id })
    }

    pub fn filter_by_class<C: Into<ClassId>>(&self, class_id: C) -> Vec<&Component> {
        let class_id = class_id.into();
        self.components
            .iter()
            .filter(|c| c.class_id == class_id)
            .collect()
    }

    /// Components whose root property is called `name` (`GameObject`, ...)
    pub fn filter_by_name(&self, name: &str) -> Vec<&Component> {
        self.components
            .iter()
            .filter(|c| c.class_name() == Some(name))
            .collect()
    }

    pub fn add(&mut self, component: Component) {
        self.components.push(component);
    }

    pub fn remove(&mut self, file_id: i64) -> Option<Component> {
        let index = self.components.iter().position(|c| c.file_id == file_id)?;
        Some(self.components.remove(index))
    }

    /// Rewrite component file ids and every `fileID` reference found in
    /// `map`. Returns the number of rewritten references, headers excluded.
    pub fn remap_file_ids(&mut self, map: &HashMap<i64, i64>) -> usize {
        let mut count = 0;
        for component in &mut self.components {
            if let Some(dest) = map.get(&component.file_id) {
                component.file_id = *dest;
            }
            count += component.replace_file_ids(map);
        }
        count
    }

    /// Rewrite every `guid` reference found in `map`
    pub fn remap_guids(&mut self, map: &HashMap<String, String>) -> usize {
        self.components
            .iter_mut()
            .map(|c| c.replace_guids(map))
            .sum()
    }
}

impl FromStr for UyamlDocument {
    type Err = UyamlError;

    fn from_str(content: &str) -> Result<Self> {
        Ok(Self {
            components: Parser::parse(content)?,
            path: None,
            line_ending: LineEnding::detect(content),
        })
    }
}

impl From<Vec<Component>> for UyamlDocument {
    fn from(components: Vec<Component>) -> Self {
        Self {
            components,
            ..Self::default()
        }
    }
}
