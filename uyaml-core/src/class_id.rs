//! Unity class identifiers
//!
//! The number after `!u!` in a block header names the Unity type of the
//! serialized object. The parser treats it as opaque; the names below are
//! only used for display and filtering.

use serde::Serialize;
use std::fmt;

/// Unity class ID of a component block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ClassId(pub i32);

impl ClassId {
    pub const OBJECT: ClassId = ClassId(0);
    pub const GAME_OBJECT: ClassId = ClassId(1);
    pub const COMPONENT: ClassId = ClassId(2);
    pub const TRANSFORM: ClassId = ClassId(4);
    pub const CAMERA: ClassId = ClassId(20);
    pub const MATERIAL: ClassId = ClassId(21);
    pub const MESH_RENDERER: ClassId = ClassId(23);
    pub const MESH_FILTER: ClassId = ClassId(33);
    pub const MONO_BEHAVIOUR: ClassId = ClassId(114);
    pub const RECT_TRANSFORM: ClassId = ClassId(224);
    pub const PREFAB_INSTANCE: ClassId = ClassId(1001);

    /// Raw numeric value
    pub fn value(self) -> i32 {
        self.0
    }

    /// Unity type name for well known class IDs
    pub fn name(self) -> Option<&'static str> {
        let name = match self.0 {
            // Core Unity objects
            0 => "Object",
            1 => "GameObject",
            2 => "Component",
            4 => "Transform",
            8 => "Behaviour",

            // Managers and scene settings
            3 => "LevelGameManager",
            5 => "TimeManager",
            6 => "GlobalGameManager",
            9 => "GameManager",
            11 => "AudioManager",
            13 => "InputManager",
            29 => "OcclusionCullingSettings",
            104 => "RenderSettings",
            157 => "LightmapSettings",
            196 => "NavMeshSettings",

            // Rendering
            20 => "Camera",
            21 => "Material",
            23 => "MeshRenderer",
            25 => "Renderer",
            27 => "Texture",
            28 => "Texture2D",
            33 => "MeshFilter",
            43 => "Mesh",
            48 => "Shader",
            108 => "Light",
            212 => "SpriteRenderer",
            213 => "Sprite",

            // Assets
            49 => "TextAsset",
            74 => "AnimationClip",
            83 => "AudioClip",
            90 => "Avatar",
            91 => "AnimatorController",
            95 => "Animator",
            114 => "MonoBehaviour",
            115 => "MonoScript",
            128 => "Font",

            // Audio
            81 => "AudioListener",
            82 => "AudioSource",

            // Physics
            50 => "Rigidbody2D",
            54 => "Rigidbody",
            56 => "Collider",
            64 => "MeshCollider",
            65 => "BoxCollider",
            135 => "SphereCollider",
            136 => "CapsuleCollider",

            // UI
            222 => "CanvasRenderer",
            223 => "Canvas",
            224 => "RectTransform",

            // Prefabs
            1001 => "PrefabInstance",
            1660057539 => "SceneRoots",

            _ => return None,
        };
        Some(name)
    }
}

impl From<i32> for ClassId {
    fn from(id: i32) -> Self {
        ClassId(id)
    }
}

impl From<ClassId> for i32 {
    fn from(id: ClassId) -> Self {
        id.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}({})", name, self.0),
            None => write!(f, "Class_{}", self.0),
        }
    }
}
