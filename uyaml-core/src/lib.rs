//! UYAML Core
//!
//! Core data structures for Unity's YAML scene and asset format.
//! This crate provides the node tree, component records and error type
//! shared by the text parser and writer.

pub mod class_id;
pub mod component;
pub mod constants;
pub mod error;
pub mod node;
pub mod remap;

// Re-export main types
pub use class_id::ClassId;
pub use component::Component;
pub use constants::*;
pub use error::{Result, UyamlError};
pub use node::{Array, Node, Object, Property, Value};

/// Get Unity class name from class ID
pub fn get_class_name(class_id: i32) -> Option<&'static str> {
    ClassId(class_id).name()
}
