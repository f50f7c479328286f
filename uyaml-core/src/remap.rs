//! Cross-reference remapping
//!
//! References between objects are written as inline objects such as
//! `{fileID: 400000, guid: 0123..., type: 3}`. These helpers rewrite the
//! `fileID` and `guid` scalars of a tree in place, e.g. when merging
//! scenes or re-pointing prefabs at a different asset.

use crate::component::Component;
use crate::node::{Node, Value};
use std::collections::HashMap;

/// Visit every scalar together with the name of the property holding it.
/// Array items inherit an empty name. Returns how many calls to `f`
/// reported a change.
fn rewrite_scalars<F>(name: &str, node: &mut Node, f: &mut F) -> usize
where
    F: FnMut(&str, &mut Value) -> bool,
{
    match node {
        Node::Value(value) => usize::from(f(name, value)),
        Node::Object(obj) => obj
            .iter_mut()
            .map(|(key, child)| rewrite_scalars(key, child, f))
            .sum(),
        Node::Array(arr) => arr
            .iter_mut()
            .map(|item| rewrite_scalars("", item, f))
            .sum(),
    }
}

impl Node {
    /// Rewrite every `fileID` scalar found in `map`. Returns the number of
    /// rewritten references.
    pub fn replace_file_ids(&mut self, map: &HashMap<i64, i64>) -> usize {
        rewrite_scalars("", self, &mut |name, value| {
            if name != "fileID" {
                return false;
            }
            match value.text.trim().parse::<i64>().ok().and_then(|id| map.get(&id)) {
                Some(dest) => {
                    value.text = dest.to_string();
                    true
                }
                None => false,
            }
        })
    }

    /// Rewrite every `guid` scalar found in `map`. Returns the number of
    /// rewritten references.
    pub fn replace_guids(&mut self, map: &HashMap<String, String>) -> usize {
        rewrite_scalars("", self, &mut |name, value| {
            if name != "guid" {
                return false;
            }
            match map.get(value.text.as_str()) {
                Some(dest) => {
                    value.text = dest.clone();
                    true
                }
                None => false,
            }
        })
    }
}

impl Component {
    /// Rewrite `fileID` references inside this component's fields.
    /// The component's own `file_id` is left alone.
    pub fn replace_file_ids(&mut self, map: &HashMap<i64, i64>) -> usize {
        self.root_mut().map_or(0, |root| root.replace_file_ids(map))
    }

    /// Rewrite `guid` references inside this component's fields
    pub fn replace_guids(&mut self, map: &HashMap<String, String>) -> usize {
        self.root_mut().map_or(0, |root| root.replace_guids(map))
    }
}
