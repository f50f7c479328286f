//! UYAML text format
//!
//! Parser and writer for the YAML dialect Unity uses for scenes, prefabs
//! and assets. The parser is line based and only understands the subset
//! Unity emits; in exchange it keeps property order and writes documents
//! back in Unity's own layout.
//!
//! # Examples
//!
//! ```rust
//! use uyaml_text::{Parser, Writer};
//!
//! let yaml = "--- !u!1 &1\nGameObject:\n  m_Name: Player\n  m_IsActive: 1\n";
//!
//! let components = Parser::parse(yaml)?;
//! assert_eq!(components[0].name(), Some("Player"));
//!
//! let text = Writer::build(&components);
//! assert!(text.starts_with("%YAML 1.1"));
//! # Ok::<(), uyaml_core::UyamlError>(())
//! ```

// Re-export core types
pub use uyaml_core::{
    Array, ClassId, Component, LineEnding, Node, Object, Property, Result, UyamlError, Value,
};

pub mod document;
pub mod parser;
pub mod writer;

pub use document::UyamlDocument;
pub use parser::Parser;
pub use writer::{Writer, WriterOptions};

/// Parse a UYAML document
pub fn parse(content: &str) -> Result<Vec<Component>> {
    Parser::parse(content)
}

/// Render components with the given options
pub fn write(components: &[Component], options: WriterOptions) -> String {
    let mut writer = Writer::with_options(options);
    writer.add_components(components);
    writer.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_functionality() {
        let components = parse("--- !u!4 &7\nTransform:\n  m_Father: {fileID: 0}\n").unwrap();
        assert_eq!(components.len(), 1);

        let options = WriterOptions {
            include_header: false,
            line_ending: LineEnding::Unix,
            ..WriterOptions::default()
        };
        assert_eq!(
            write(&components, options),
            "--- !u!4 &7\nTransform:\n  m_Father: {fileID: 0}\n"
        );
    }
}
