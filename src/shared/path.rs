use std::path::{Component, Path, PathBuf};

/// Returns an absolute version of the provided path without touching the filesystem.
/// Falls back to the original path if the current working directory cannot be resolved.
pub fn absolutize<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        return path.to_path_buf();
    }

    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Joins `path` underneath `root` even when `path` is absolute.
///
/// `Path::join` would replace the root for absolute paths; here leading root and
/// prefix components are dropped so `/a/b` lands at `root/a/b`.
pub fn rebase<P: AsRef<Path>>(root: &Path, path: P) -> PathBuf {
    let relative: PathBuf = path
        .as_ref()
        .components()
        .filter(|c| matches!(c, Component::Normal(_) | Component::ParentDir | Component::CurDir))
        .collect();
    root.join(relative)
}
