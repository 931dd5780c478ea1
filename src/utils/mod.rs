// Trapper utilities
//
// Path handling, ignore patterns and source discovery for the batch driver.

/// Path conversion utilities (absolute to relative Unix-style, output paths)
pub mod paths;

/// Ignore pattern utilities (.trapperignore support)
pub mod ignore;

/// Source file discovery
pub mod sources;

/// Content hashing shared by the `file` fact and the Python surface
pub mod hashing {
    /// blake3 hex digest of a source text
    pub fn hash_content(content: &str) -> String {
        blake3::hash(content.as_bytes()).to_hex().to_string()
    }

}
