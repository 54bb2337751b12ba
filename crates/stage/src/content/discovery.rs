use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub(crate) struct DefReadError {
    pub(crate) path: PathBuf,
    pub(crate) source: std::io::Error,
}

/// Collects every `.xml` file under the defs directory, sorted by relative
/// path so compile order is stable across platforms.
pub(crate) fn collect_def_files_sorted(root: &Path) -> Result<Vec<PathBuf>, DefReadError> {
    let mut files = Vec::<PathBuf>::new();
    collect_recursive(root, &mut files)?;
    files.sort_by_key(|path| normalize_rel_path(path.strip_prefix(root).unwrap_or(path)));
    Ok(files)
}

fn collect_recursive(current: &Path, files: &mut Vec<PathBuf>) -> Result<(), DefReadError> {
    let entries = fs::read_dir(current).map_err(|source| DefReadError {
        path: current.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| DefReadError {
            path: current.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            collect_recursive(&path, files)?;
        } else if path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
        {
            files.push(path);
        }
    }
    Ok(())
}

fn normalize_rel_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}
