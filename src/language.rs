//! Language Support - tree-sitter configuration for the extracted languages
//!
//! Only C# has a schema today. Everything that needs a parser or a language
//! name from a path goes through here.

use anyhow::Result;

/// Languages with a registered schema.
pub const SUPPORTED_LANGUAGES: &[&str] = &["csharp"];

/// Get the tree-sitter grammar for a language name
pub fn get_tree_sitter_language(language: &str) -> Result<tree_sitter::Language> {
    match language {
        "csharp" => Ok(tree_sitter_c_sharp::LANGUAGE.into()),
        _ => Err(anyhow::anyhow!(
            "Unsupported language: '{}'. Supported languages: {}",
            language,
            SUPPORTED_LANGUAGES.join(", ")
        )),
    }
}

/// Detect language from file extension
///
/// Returns the language name that can be passed to `get_tree_sitter_language()`.
pub fn detect_language_from_extension(extension: &str) -> Option<&'static str> {
    match extension {
        "cs" | "csx" => Some("csharp"),
        _ => None,
    }
}

/// Detect language from a file path
pub fn detect_language(file_path: &str) -> Option<&'static str> {
    let extension = std::path::Path::new(file_path)
        .extension()
        .and_then(|ext| ext.to_str())?;
    detect_language_from_extension(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_csharp_sources() {
        assert_eq!(detect_language("src/Program.cs"), Some("csharp"));
        assert_eq!(detect_language("scripts/build.csx"), Some("csharp"));
        assert_eq!(detect_language("README.md"), None);
        assert_eq!(detect_language("Makefile"), None);
    }

    #[test]
    fn test_grammar_lookup() {
        assert!(get_tree_sitter_language("csharp").is_ok());
        let err = get_tree_sitter_language("cobol").unwrap_err();
        assert!(err.to_string().contains("Supported languages: csharp"));
    }
}
