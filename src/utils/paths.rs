// Path conversion for fact output
//
// Facts store source paths relative to the extraction root with `/`
// separators, so trap files are identical across machines and platforms.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use crate::config::OutputFormat;

/// Convert an absolute path to a relative Unix-style path under `root`
///
/// Fails when the file does not live under `root`.
pub fn to_relative_unix_style(absolute: &Path, root: &Path) -> Result<String> {
    // Symlinked roots (/var -> /private/var on macOS) only compare equal once
    // both sides are canonical; missing files keep their spelled paths.
    let (path, root) = match (absolute.canonicalize(), root.canonicalize()) {
        (Ok(path), Ok(root)) => (path, root),
        _ => (absolute.to_path_buf(), root.to_path_buf()),
    };

    let relative = path.strip_prefix(&root).with_context(|| {
        format!(
            "File path '{}' is not within extraction root '{}'",
            path.display(),
            root.display()
        )
    })?;

    let text = relative.to_str().context("Path contains invalid UTF-8")?;
    Ok(if MAIN_SEPARATOR == '\\' {
        text.replace('\\', "/")
    } else {
        text.to_string()
    })
}

/// Output file for one unit: `<trap_dir>/<relative>.<ext>`
///
/// The source extension is kept (`Foo.cs` becomes `Foo.cs.trap`) so two
/// sources differing only by extension never share an output file.
pub fn output_path_for(relative_unix: &str, trap_dir: &Path, format: OutputFormat) -> PathBuf {
    trap_dir.join(format!("{}.{}", relative_unix, format.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linux_absolute_to_relative() {
        let root = PathBuf::from("/home/dev/solution");
        let absolute = PathBuf::from("/home/dev/solution/src/Core/Account.cs");

        let result = to_relative_unix_style(&absolute, &root).unwrap();
        assert_eq!(result, "src/Core/Account.cs");
        assert!(!result.contains('\\'));
    }

    #[test]
    fn test_root_level_file() {
        let root = PathBuf::from("/home/dev/solution");
        let absolute = PathBuf::from("/home/dev/solution/Program.cs");
        assert_eq!(to_relative_unix_style(&absolute, &root).unwrap(), "Program.cs");
    }

    #[test]
    fn test_file_outside_root_rejected() {
        let root = PathBuf::from("/home/dev/solution");
        let outside = PathBuf::from("/etc/hosts");

        let err = to_relative_unix_style(&outside, &root).unwrap_err();
        assert!(err.to_string().contains("not within extraction root"));
    }

    #[test]
    fn test_existing_paths_are_canonicalized() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let nested = temp_dir.path().join("src");
        std::fs::create_dir_all(&nested).unwrap();
        let file = nested.join("A.cs");
        std::fs::write(&file, "class A {}").unwrap();

        assert_eq!(to_relative_unix_style(&file, temp_dir.path()).unwrap(), "src/A.cs");
    }

    #[test]
    fn test_output_path_keeps_source_extension() {
        let trap_dir = PathBuf::from("/tmp/traps");
        assert_eq!(
            output_path_for("src/A.cs", &trap_dir, OutputFormat::Trap),
            PathBuf::from("/tmp/traps/src/A.cs.trap")
        );
        assert_eq!(
            output_path_for("A.cs", &trap_dir, OutputFormat::Jsonl),
            PathBuf::from("/tmp/traps/A.cs.jsonl")
        );
    }
}
