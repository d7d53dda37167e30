use std::path::{Path, PathBuf};

/// Expand `~` and `$VAR` references in a user-supplied path.
///
/// Falls back to the path as given when expansion fails (unset variable,
/// non-UTF-8 path).
pub fn expand_path(path: &Path) -> PathBuf {
    let Some(raw) = path.to_str() else {
        return path.to_path_buf();
    };
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => path.to_path_buf(),
    }
}
