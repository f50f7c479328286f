//! Constants of the UYAML text format
//!
//! Document markers, tags and line ending handling shared by the
//! parser and the writer.

/// Marker that opens every component block (`--- !u!<classID> &<fileID>`)
pub const COMPONENT_HEADER: &str = "--- !u!";

/// Unity YAML tag URI
pub const UNITY_TAG_URI: &str = "tag:unity3d.com,2011:";

/// Unity YAML version
pub const UNITY_YAML_VERSION: (u32, u32) = (1, 1);

/// Deepest structure (block or inline) the parser accepts
pub const MAX_NESTING_DEPTH: usize = 128;

/// Line ending types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    Unix, // \n
    /// Unity writes CRLF on every platform, so this is the default
    #[default]
    Windows, // \r\n
    Mac,  // \r
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Unix => "\n",
            LineEnding::Windows => "\r\n",
            LineEnding::Mac => "\r",
        }
    }

    /// Create LineEnding from string representation
    pub fn from_string(s: &str) -> Self {
        match s {
            "\n" => LineEnding::Unix,
            "\r\n" => LineEnding::Windows,
            "\r" => LineEnding::Mac,
            _ => LineEnding::default(),
        }
    }

    /// Guess the line ending used by existing text
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            LineEnding::Windows
        } else if text.contains('\n') {
            LineEnding::Unix
        } else if text.contains('\r') {
            LineEnding::Mac
        } else {
            LineEnding::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_ending() {
        assert_eq!(LineEnding::Unix.as_str(), "\n");
        assert_eq!(LineEnding::Windows.as_str(), "\r\n");
        assert_eq!(LineEnding::Mac.as_str(), "\r");
        assert_eq!(LineEnding::default(), LineEnding::Windows);
    }

    #[test]
    fn test_line_ending_detect() {
        assert_eq!(LineEnding::detect("a\r\nb"), LineEnding::Windows);
        assert_eq!(LineEnding::detect("a\nb"), LineEnding::Unix);
        assert_eq!(LineEnding::detect("a\rb"), LineEnding::Mac);
        assert_eq!(LineEnding::from_string("\n"), LineEnding::Unix);
    }
}
