//! Resolution of client-supplied LoRA identifiers to files under a root.
//!
//! Identifiers arrive from untrusted callers. A resolved path is only handed
//! out after it has been proven to lie inside the configured root and to
//! name an existing regular file.
//!
//! Paths are normalized lexically. Symbolic links are not followed during
//! the containment check, so a link inside the root that points elsewhere
//! is served.

use crate::error::{LoraError, Result};
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};
use tracing::{debug, error, warn};

/// An absolute path proven to be inside the root and to name a regular file.
///
/// Only [`PathResolver::resolve`] creates these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    path: PathBuf,
}

impl ResolvedPath {
    pub fn as_path(&self) -> &Path {
        &self.path
    }
}

/// Maps relative identifiers to files under a fixed root directory.
#[derive(Debug, Clone)]
pub struct PathResolver {
    /// Normalized absolute root.
    root: PathBuf,
    /// `root` rendered as a string ending with the platform separator.
    root_prefix: String,
}

impl PathResolver {
    /// Create a resolver for `root`.
    ///
    /// The root is trusted configuration. It is made absolute and normalized
    /// once here and must be an existing directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let absolute = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()
                .map_err(|e| LoraError::Config {
                    message: format!("Cannot determine current directory: {}", e),
                })?
                .join(root)
        };
        let root = normalize_lexically(&absolute);

        if !root.is_dir() {
            return Err(LoraError::Config {
                message: format!("LoRA root is not a directory: {}", root.display()),
            });
        }

        let mut root_prefix = root.to_string_lossy().into_owned();
        if !root_prefix.ends_with(MAIN_SEPARATOR) {
            root_prefix.push(MAIN_SEPARATOR);
        }

        Ok(Self { root, root_prefix })
    }

    /// The normalized root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `identifier` to a file inside the root.
    ///
    /// # Errors
    ///
    /// - [`LoraError::InvalidIdentifier`] for empty identifiers, `..`
    ///   segments, absolute paths or invalid characters. Checked before any
    ///   filesystem access.
    /// - [`LoraError::AccessDenied`] when the joined path leaves the root.
    /// - [`LoraError::FileNotFound`] when nothing (or no regular file) is there.
    /// - [`LoraError::Io`] for other filesystem failures.
    pub fn resolve(&self, identifier: &str) -> Result<ResolvedPath> {
        if identifier.trim().is_empty() {
            warn!("Attempt to resolve empty identifier");
            return Err(LoraError::InvalidIdentifier {
                reason: "LoRA identifier is missing or empty".to_string(),
            });
        }

        if identifier.contains('\0') {
            warn!(identifier = %identifier.escape_debug(), "Identifier contains NUL");
            return Err(LoraError::InvalidIdentifier {
                reason: "contains invalid characters".to_string(),
            });
        }

        let normalized = normalize_separators(identifier);
        if has_parent_segment(&normalized) || is_absolute_form(Path::new(&normalized)) {
            warn!(identifier = %identifier, "Invalid identifier format");
            return Err(LoraError::InvalidIdentifier {
                reason: "contains '..' or is an absolute path".to_string(),
            });
        }

        let candidate = normalize_lexically(&self.root.join(&normalized));

        if !self.contains(&candidate) {
            error!(
                identifier = %identifier,
                resolved = %candidate.display(),
                root = %self.root_prefix,
                "Security: identifier resolves outside the LoRA root"
            );
            return Err(LoraError::AccessDenied {
                identifier: identifier.to_string(),
                resolved: candidate,
            });
        }

        // `a.safetensors/` names a directory, never the file itself.
        if identifier.ends_with(['/', '\\']) {
            warn!(identifier = %identifier, "Identifier ends with a separator");
            return Err(LoraError::FileNotFound {
                identifier: identifier.to_string(),
            });
        }

        match std::fs::metadata(&candidate) {
            Ok(meta) if meta.is_file() => {
                debug!(
                    "Resolved identifier '{}' to '{}'",
                    identifier,
                    candidate.display()
                );
                Ok(ResolvedPath { path: candidate })
            }
            Ok(_) => {
                warn!(identifier = %identifier, "Identifier does not name a regular file");
                Err(LoraError::FileNotFound {
                    identifier: identifier.to_string(),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                error!(path = %candidate.display(), "Cannot stat LoRA file: {}", e);
                Err(LoraError::io_with_path(e, candidate))
            }
            Err(e) => {
                warn!(identifier = %identifier, "LoRA file not found: {}", e);
                Err(LoraError::FileNotFound {
                    identifier: identifier.to_string(),
                })
            }
        }
    }

    /// Whether a normalized absolute path lies strictly under the root.
    pub(crate) fn contains(&self, candidate: &Path) -> bool {
        starts_with_prefix(&candidate.to_string_lossy(), &self.root_prefix)
    }
}

/// Replace both `/` and `\` with the platform separator.
fn normalize_separators(identifier: &str) -> String {
    identifier
        .chars()
        .map(|c| if c == '/' || c == '\\' { MAIN_SEPARATOR } else { c })
        .collect()
}

fn has_parent_segment(normalized: &str) -> bool {
    normalized.split(MAIN_SEPARATOR).any(|segment| segment == "..")
}

fn is_absolute_form(path: &Path) -> bool {
    path.is_absolute()
        || path.has_root()
        || matches!(path.components().next(), Some(Component::Prefix(_)))
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

#[cfg(any(windows, target_os = "macos"))]
fn starts_with_prefix(path: &str, prefix: &str) -> bool {
    path.to_lowercase().starts_with(&prefix.to_lowercase())
}

#[cfg(not(any(windows, target_os = "macos")))]
fn starts_with_prefix(path: &str, prefix: &str) -> bool {
    path.starts_with(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathResolver) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("loras");
        std::fs::create_dir_all(root.join("styles")).unwrap();
        std::fs::write(root.join("styles").join("ink.safetensors"), b"x").unwrap();
        std::fs::write(root.join("top.safetensors"), b"x").unwrap();
        let resolver = PathResolver::new(&root).unwrap();
        (temp_dir, resolver)
    }

    #[test]
    fn test_resolves_nested_file() {
        let (_temp, resolver) = setup();
        let resolved = resolver.resolve("styles/ink.safetensors").unwrap();
        assert_eq!(
            resolved.as_path(),
            resolver.root().join("styles").join("ink.safetensors")
        );
    }

    #[test]
    fn test_backslash_separators_are_normalized() {
        let (_temp, resolver) = setup();
        let resolved = resolver.resolve("styles\\ink.safetensors").unwrap();
        assert!(resolved.as_path().ends_with("ink.safetensors"));
    }

    #[test]
    fn test_current_dir_segments_are_allowed() {
        let (_temp, resolver) = setup();
        assert!(resolver.resolve("./styles/./ink.safetensors").is_ok());
    }

    #[test]
    fn test_empty_identifier_rejected() {
        let (_temp, resolver) = setup();
        for identifier in ["", "   ", "\t\n"] {
            assert!(matches!(
                resolver.resolve(identifier),
                Err(LoraError::InvalidIdentifier { .. })
            ));
        }
    }

    #[test]
    fn test_traversal_rejected_before_filesystem() {
        let (temp, resolver) = setup();
        // The target exists, so only the format check can produce this error.
        std::fs::write(temp.path().join("secret.safetensors"), b"x").unwrap();

        for identifier in [
            "../secret.safetensors",
            "..\\secret.safetensors",
            "styles/../../secret.safetensors",
            "../../etc/passwd",
            "..",
        ] {
            let err = resolver.resolve(identifier).unwrap_err();
            assert!(
                matches!(err, LoraError::InvalidIdentifier { .. }),
                "{identifier}: {err:?}"
            );
        }
    }

    #[test]
    fn test_absolute_identifier_rejected() {
        let (temp, resolver) = setup();
        let absolute = temp.path().join("loras").join("top.safetensors");
        let err = resolver.resolve(&absolute.to_string_lossy()).unwrap_err();
        assert!(matches!(err, LoraError::InvalidIdentifier { .. }));

        let err = resolver.resolve("/etc/passwd").unwrap_err();
        assert!(matches!(err, LoraError::InvalidIdentifier { .. }));

        let err = resolver.resolve("\\etc\\passwd").unwrap_err();
        assert!(matches!(err, LoraError::InvalidIdentifier { .. }));
    }

    #[test]
    fn test_dots_inside_names_are_allowed() {
        let (_temp, resolver) = setup();
        std::fs::write(resolver.root().join("v1..2.safetensors"), b"x").unwrap();
        assert!(resolver.resolve("v1..2.safetensors").is_ok());
    }

    #[test]
    fn test_nul_rejected() {
        let (_temp, resolver) = setup();
        assert!(matches!(
            resolver.resolve("top\0.safetensors"),
            Err(LoraError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn test_root_itself_is_not_contained() {
        let (_temp, resolver) = setup();
        let err = resolver.resolve(".").unwrap_err();
        assert!(matches!(err, LoraError::AccessDenied { .. }));
    }

    #[test]
    fn test_containment_requires_separator_boundary() {
        let (temp, resolver) = setup();
        // Shares the root's string prefix but is a sibling directory.
        let sibling = temp.path().join("loras-evil").join("x.safetensors");
        assert!(!resolver.contains(&normalize_lexically(&sibling)));
        assert!(!resolver.contains(&normalize_lexically(&temp.path().join("loras"))));
        assert!(resolver.contains(&resolver.root().join("a").join("b.safetensors")));
    }

    #[test]
    fn test_containment_catches_escapes_missed_by_format_check() {
        let (_temp, resolver) = setup();
        let escaped =
            normalize_lexically(&resolver.root().join("a").join("..").join("..").join("x"));
        assert!(!resolver.contains(&escaped));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let (_temp, resolver) = setup();
        let err = resolver.resolve("styles/missing.safetensors").unwrap_err();
        assert!(matches!(err, LoraError::FileNotFound { .. }));
    }

    #[test]
    fn test_directory_is_not_found() {
        let (_temp, resolver) = setup();
        let err = resolver.resolve("styles").unwrap_err();
        assert!(matches!(err, LoraError::FileNotFound { .. }));
    }

    #[test]
    fn test_path_below_file_is_not_found() {
        let (_temp, resolver) = setup();
        let err = resolver.resolve("top.safetensors/inner").unwrap_err();
        assert!(matches!(err, LoraError::FileNotFound { .. }));
    }

    #[test]
    fn test_trailing_separator_is_not_found() {
        let (_temp, resolver) = setup();
        for identifier in ["top.safetensors/", "styles\\ink.safetensors\\"] {
            let err = resolver.resolve(identifier).unwrap_err();
            assert!(
                matches!(err, LoraError::FileNotFound { .. }),
                "identifier {}",
                identifier
            );
        }
    }

    #[cfg(any(windows, target_os = "macos"))]
    #[test]
    fn test_containment_ignores_case() {
        assert!(starts_with_prefix("/Srv/LoRAs/a.safetensors", "/srv/loras/"));

        let (_temp, resolver) = setup();
        let shouted = resolver.root().to_string_lossy().to_uppercase();
        assert!(resolver.contains(&PathBuf::from(shouted).join("top.safetensors")));
    }

    #[cfg(not(any(windows, target_os = "macos")))]
    #[test]
    fn test_containment_is_case_sensitive() {
        assert!(!starts_with_prefix("/Srv/LoRAs/a.safetensors", "/srv/loras/"));
        assert!(starts_with_prefix("/srv/loras/a.safetensors", "/srv/loras/"));

        let (_temp, resolver) = setup();
        let shouted = resolver.root().to_string_lossy().to_uppercase();
        assert!(!resolver.contains(&PathBuf::from(shouted).join("top.safetensors")));
    }

    #[test]
    fn test_root_must_be_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file");
        std::fs::write(&file, b"x").unwrap();
        assert!(matches!(
            PathResolver::new(&file),
            Err(LoraError::Config { .. })
        ));
        assert!(PathResolver::new(temp_dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_root_is_normalized() {
        let (temp, _) = setup();
        let messy = temp.path().join("loras").join(".").join("styles").join("..");
        let resolver = PathResolver::new(messy).unwrap();
        assert_eq!(resolver.root(), temp.path().join("loras"));
        assert!(resolver.resolve("top.safetensors").is_ok());
    }

    #[test]
    fn test_normalize_lexically() {
        let sep = MAIN_SEPARATOR;
        let path = PathBuf::from(format!("{sep}a{sep}.{sep}b{sep}..{sep}c"));
        assert_eq!(
            normalize_lexically(&path),
            PathBuf::from(format!("{sep}a{sep}c"))
        );
        let above_root = PathBuf::from(format!("{sep}..{sep}..{sep}x"));
        assert_eq!(
            normalize_lexically(&above_root),
            PathBuf::from(format!("{sep}x"))
        );
    }
}
