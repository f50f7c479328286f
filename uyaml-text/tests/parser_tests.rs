//! Parser behaviour on hand-written snippets and fixture assets

use std::path::Path;
use uyaml_text::{ClassId, Node, Parser, UyamlError};

fn text<'a>(node: Option<&'a Node>) -> Option<&'a str> {
    node.and_then(Node::text)
}

/// The header's class and file ids end up on the component
#[test]
fn test_header_fidelity() {
    let content = "--- !u!1 &12345\nm_Name: Test\n";
    let components = Parser::parse(content).unwrap();

    assert_eq!(components.len(), 1);
    let component = &components[0];
    assert_eq!(component.class_id, ClassId(1));
    assert_eq!(component.file_id, 12345);

    let root = component.root_property.as_ref().unwrap();
    assert_eq!(root.name, "m_Name");
    assert_eq!(root.value.text(), Some("Test"));
}

#[test]
fn test_large_and_negative_file_ids() {
    let content = "--- !u!114 &8926484042661614526\nMonoBehaviour:\n  m_Enabled: 1\n--- !u!4 &-5842393027063345117\nTransform:\n  m_RootOrder: 0\n";
    let components = Parser::parse(content).unwrap();

    assert_eq!(components[0].file_id, 8926484042661614526);
    assert_eq!(components[1].file_id, -5842393027063345117);
    assert_eq!(components[1].class_id, ClassId::TRANSFORM);
}

#[test]
fn test_inline_object() {
    let content = "--- !u!4 &1\nTransform:\n  m_LocalPosition: {x: 1, y: 2, z: 3}\n";
    let components = Parser::parse(content).unwrap();

    let position = components[0].get("m_LocalPosition").unwrap();
    let obj = position.as_object().unwrap();
    assert_eq!(obj.names().collect::<Vec<_>>(), vec!["x", "y", "z"]);
    assert_eq!(text(obj.get("x")), Some("1"));
    assert_eq!(text(obj.get("y")), Some("2"));
    assert_eq!(text(obj.get("z")), Some("3"));
}

#[test]
fn test_block_array_of_objects() {
    let content = "--- !u!1 &1\nGameObject:\n  m_Component:\n  - component: {fileID: 4}\n  - component: {fileID: 23}\n  m_Layer: 0\n";
    let components = Parser::parse(content).unwrap();
    let component = &components[0];

    let items = component.get("m_Component").and_then(Node::as_array).unwrap();
    assert_eq!(items.len(), 2);
    for (item, id) in items.iter().zip(["4", "23"]) {
        let reference = item.get("component").unwrap();
        assert_eq!(text(reference.get("fileID")), Some(id));
    }
    assert_eq!(text(component.get("m_Layer")), Some("0"));
}

/// Two and four space indentation produce the same tree
#[test]
fn test_indent_unit_inference() {
    let two = "--- !u!1 &1\nGameObject:\n  m_Data:\n    a: 1\n    b:\n    - x\n    - y\n  m_Name: N\n";
    let four = "--- !u!1 &1\nGameObject:\n    m_Data:\n        a: 1\n        b:\n        - x\n        - y\n    m_Name: N\n";

    let two = Parser::parse(two).unwrap();
    let four = Parser::parse(four).unwrap();

    let left = two[0].root().unwrap();
    let right = four[0].root().unwrap();
    assert!(left.structurally_eq(right));
    assert_eq!(text(four[0].get("m_Name")), Some("N"));
}

#[test]
fn test_indented_array_markers() {
    let content = "--- !u!1 &1\nGameObject:\n  m_Component:\n    - component: {fileID: 4}\n    - component: {fileID: 5}\n  m_Layer: 0\n";
    let components = Parser::parse(content).unwrap();

    let items = components[0].get("m_Component").and_then(Node::as_array).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(text(components[0].get("m_Layer")), Some("0"));
}

#[test]
fn test_duplicate_property_rejected() {
    let content = "--- !u!1 &1\nGameObject:\n  m_Name: A\n  m_Name: B\n";
    let err = Parser::parse(content).unwrap_err();

    assert!(err.to_string().contains("m_Name"), "{}", err);
    assert_eq!(err.position(), content.find("  m_Name: B"));
}

#[test]
fn test_duplicate_inline_property_rejected() {
    let content = "--- !u!4 &1\nTransform:\n  m_LocalScale: {x: 1, x: 2}\n";
    assert!(matches!(
        Parser::parse(content),
        Err(UyamlError::Parse { .. })
    ));
}

/// Indentation may only grow one level at a time
#[test]
fn test_indentation_jump_rejected() {
    let content = "%YAML 1.1\n%TAG !u! tag:unity3d.com,2011:\n--- !u!1 &1\nGameObject:\n  m_Name: A\n      m_Bad: 1\n";
    let err = Parser::parse(content).unwrap_err();

    assert_eq!(err.position(), content.find("      m_Bad"));
    assert!(err.to_string().contains("Changed by 2"), "{}", err);
}

#[test]
fn test_error_offset_counts_from_document_start() {
    let content = "--- !u!1 &1\nGameObject:\n  m_Name: A\n--- !u!4 &2\nTransform:\n  m_Father: {fileID: 0}\n      m_Bad: 1\n";
    let err = Parser::parse(content).unwrap_err();
    assert_eq!(err.position(), content.find("      m_Bad"));
}

#[test]
fn test_no_blocks() {
    let err = Parser::parse("%YAML 1.1\nfoo: bar\n").unwrap_err();
    assert_eq!(err.position(), Some(0));
}

#[test]
fn test_malformed_headers() {
    for content in [
        "--- !u!1001 &100 stripped\nPrefabInstance:\n  m_ObjectHideFlags: 0\n",
        "--- !u!abc &1\nGameObject:\n  m_Name: A\n",
        "--- !u!1 1\nGameObject:\n  m_Name: A\n",
    ] {
        assert!(Parser::parse(content).is_err(), "{:?}", content);
    }
}

#[test]
fn test_header_marker_inside_text_is_not_a_block() {
    let content = "--- !u!114 &1\nMonoBehaviour:\n  m_Text: see --- !u!1 &2 for details\n";
    let components = Parser::parse(content).unwrap();
    assert_eq!(components.len(), 1);
    assert_eq!(
        text(components[0].get("m_Text")),
        Some("see --- !u!1 &2 for details")
    );
}

#[test]
fn test_key_less_value_in_object_rejected() {
    let content = "--- !u!1 &1\nGameObject:\n  m_Name: A\n  just text\n";
    assert!(Parser::parse(content).is_err());
}

#[test]
fn test_multi_line_scalar() {
    let content = "--- !u!114 &1\nMonoBehaviour:\n  description: A long description that Unity wrapped\n    onto a second line\n  speed: 4\n";
    let components = Parser::parse(content).unwrap();

    assert_eq!(
        text(components[0].get("description")),
        Some("A long description that Unity wrapped onto a second line")
    );
    assert_eq!(text(components[0].get("speed")), Some("4"));
}

/// A wrapped scalar followed by the next array item
#[test]
fn test_multi_line_scalar_in_array_item() {
    let content = "--- !u!1001 &1\nPrefabInstance:\n  m_Modification:\n    m_Modifications:\n    - target: {fileID: 1}\n      value: first part\n        second part\n    - target: {fileID: 2}\n      value: 3\n    m_RemovedComponents: []\n";
    let components = Parser::parse(content).unwrap();

    let modification = components[0].get("m_Modification").unwrap();
    let items = modification
        .get("m_Modifications")
        .and_then(Node::as_array)
        .unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(text(items.items[0].get("value")), Some("first part second part"));
    assert_eq!(text(items.items[1].get("value")), Some("3"));
    assert!(modification.get("m_RemovedComponents").is_some());
}

#[test]
fn test_scalar_array_items() {
    let content = "--- !u!114 &1\nMonoBehaviour:\n  m_Values:\n  - -5\n  - 3\n  - \"quoted, text\"\n";
    let components = Parser::parse(content).unwrap();

    let values: Vec<_> = components[0]
        .get("m_Values")
        .and_then(Node::as_array)
        .unwrap()
        .iter()
        .filter_map(Node::text)
        .collect();
    assert_eq!(values, vec!["-5", "3", "quoted, text"]);
}

/// Bare items may follow an object item in the same array
#[test]
fn test_mixed_array_items() {
    let content = "--- !u!114 &1\nMonoBehaviour:\n  m_L:\n  - a: 1\n    b: 2\n  - 2\n  - {c: 3}\n  m_Next: 1\n";
    let components = Parser::parse(content).unwrap();

    let items = components[0].get("m_L").and_then(Node::as_array).unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(text(items.items[0].get("b")), Some("2"));
    assert_eq!(items.items[1].text(), Some("2"));
    assert_eq!(text(items.items[2].get("c")), Some("3"));
    assert_eq!(text(components[0].get("m_Next")), Some("1"));
}

/// Only a property without a value can hold an indented block
#[test]
fn test_indented_line_under_filled_value_rejected() {
    let after_item = "--- !u!114 &1\nMonoBehaviour:\n  m_L:\n  - [1, 2]\n    - 3\n";
    let err = Parser::parse(after_item).unwrap_err();
    assert_eq!(err.position(), Some(47));

    let lone_dash = "--- !u!114 &1\nMonoBehaviour:\n  m_L:\n  -\n    - 1\n";
    assert!(Parser::parse(lone_dash).is_err());

    let inline = "--- !u!4 &1\nTransform:\n  m_Pos: {x: 1}\n    y: 2\n";
    assert!(Parser::parse(inline).is_err());
}

#[test]
fn test_byte_order_mark() {
    let content = "\u{feff}--- !u!1 &1\nGameObject:\n  m_Name: A\n";
    let components = Parser::parse(content).unwrap();
    assert_eq!(components.len(), 1);
    assert_eq!(components[0].class_id, ClassId(1));
    assert_eq!(text(components[0].get("m_Name")), Some("A"));

    // Offsets still count the mark
    let broken = "\u{feff}--- !u!1 &1\nGameObject:\n  m_Name: A\n      m_Bad: 1\n";
    assert_eq!(Parser::parse(broken).unwrap_err().position(), Some(39));
}

#[test]
fn test_single_quoted_brackets_do_not_nest() {
    let content = "--- !u!114 &1\nMonoBehaviour:\n  m_Name: 'a [b'\n  m_Escaped: 'it''s {x'\n  m_List: ['x, y', z]\n  m_Other: 1\n";
    let components = Parser::parse(content).unwrap();

    assert_eq!(text(components[0].get("m_Name")), Some("'a [b'"));
    assert_eq!(text(components[0].get("m_Escaped")), Some("'it''s {x'"));
    let list: Vec<_> = components[0]
        .get("m_List")
        .and_then(Node::as_array)
        .unwrap()
        .iter()
        .filter_map(Node::text)
        .collect();
    assert_eq!(list, vec!["'x, y'", "z"]);
    assert_eq!(text(components[0].get("m_Other")), Some("1"));
}

#[test]
fn test_inline_object_spanning_lines() {
    let content = "--- !u!114 &1\nMonoBehaviour:\n  m_Script: {fileID: 11500000, guid: 0123456789abcdef0123456789abcdef,\n    type: 3}\n  m_Enabled: 1\n";
    let components = Parser::parse(content).unwrap();

    let script = components[0].get("m_Script").unwrap();
    assert_eq!(text(script.get("type")), Some("3"));
    assert_eq!(text(components[0].get("m_Enabled")), Some("1"));
}

#[test]
fn test_unbalanced_brackets_rejected() {
    let unclosed = "--- !u!4 &1\nTransform:\n  m_LocalScale: {x: 1, y: 1\n";
    assert!(Parser::parse(unclosed).is_err());

    let stray = "--- !u!4 &1\nTransform:\n  m_LocalScale: x]\n";
    assert!(Parser::parse(stray).is_err());
}

#[test]
fn test_quoted_brackets_do_not_nest() {
    let content = "--- !u!114 &1\nMonoBehaviour:\n  m_Text: \"open [ only\"\n  m_Other: 1\n";
    let components = Parser::parse(content).unwrap();
    assert_eq!(text(components[0].get("m_Text")), Some("open [ only"));
    assert_eq!(text(components[0].get("m_Other")), Some("1"));
}

#[test]
fn test_block_nesting_limit() {
    let mut content = String::from("--- !u!114 &1\nMonoBehaviour:\n");
    for depth in 1..140 {
        content.push_str(&"  ".repeat(depth));
        content.push_str("child:\n");
    }
    let err = Parser::parse(&content).unwrap_err();
    assert!(err.to_string().contains("Nesting"), "{}", err);
}

#[test]
fn test_inline_nesting_limit() {
    let content = format!(
        "--- !u!114 &1\nMonoBehaviour:\n  m_Deep: {}{}\n",
        "[".repeat(200),
        "]".repeat(200)
    );
    assert!(Parser::parse(&content).is_err());
}

#[test]
fn test_prefab_fixture() {
    let fixture_path = Path::new("tests/fixtures/Player.prefab");
    let content = std::fs::read_to_string(fixture_path).unwrap();
    let components = Parser::parse(&content).unwrap();

    assert_eq!(components.len(), 3);
    assert_eq!(components[0].name(), Some("Player"));
    assert_eq!(components[1].class_name(), Some("Transform"));

    let behaviour = &components[2];
    assert_eq!(behaviour.class_id, ClassId::MONO_BEHAVIOUR);
    assert_eq!(text(behaviour.get("m_Name")), Some(""));

    let inventory = behaviour.get("inventory").and_then(Node::as_array).unwrap();
    assert_eq!(inventory.len(), 2);
    let tags = inventory.items[0].get("tags").and_then(Node::as_array).unwrap();
    assert_eq!(tags.iter().filter_map(Node::text).collect::<Vec<_>>(), vec!["consumable", "potion"]);
    assert!(inventory.items[1].get("tags").and_then(Node::as_array).unwrap().is_empty());

    let waypoints = behaviour.get("waypoints").and_then(Node::as_array).unwrap();
    assert_eq!(text(waypoints.items[1].get("z")), Some("5"));
}

#[test]
fn test_scene_fixture_with_windows_line_endings() {
    let fixture_path = Path::new("tests/fixtures/Main.unity");
    let content = std::fs::read_to_string(fixture_path).unwrap();
    let components = Parser::parse(&content).unwrap();

    assert_eq!(components.len(), 4);

    let camera = &components[1];
    assert_eq!(camera.class_id, ClassId::CAMERA);
    assert_eq!(text(camera.get("near clip plane")), Some("0.3"));
    let rect = camera.get("m_NormalizedViewPortRect").unwrap();
    assert_eq!(text(rect.get("height")), Some("1"));

    let prefab = &components[3];
    assert_eq!(prefab.class_id, ClassId::PREFAB_INSTANCE);
    let modifications = prefab
        .get("m_Modification")
        .and_then(|m| m.get("m_Modifications"))
        .and_then(Node::as_array)
        .unwrap();
    assert_eq!(modifications.len(), 2);
    assert_eq!(text(modifications.items[1].get("value")), Some("Player (1)"));
    assert_eq!(
        text(prefab.get("m_SourcePrefab").and_then(|s| s.get("guid"))),
        Some("8c9cfa26abfee488c85f1582747f6a02")
    );
}
