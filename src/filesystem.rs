//! Existence-guarded filesystem primitives used by the harvest.
//!
//! Not every artifact is built for every platform, so a missing source is
//! never an error here: the copy is skipped and logged at debug level. Any
//! failure after the source was found (permissions, disk full) is still
//! propagated.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Remove `path` if it exists and create it again, empty.
pub fn recreate_dir(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("removing existing directory '{}'", path.display()))?;
    }
    fs::create_dir_all(path).with_context(|| format!("creating directory '{}'", path.display()))?;
    Ok(())
}

/// Copy file `src` into directory `target_dir`, keeping its file name.
///
/// Returns `false` without touching anything when `src` does not exist.
pub fn copy_if_exists(src: &Path, target_dir: &Path) -> Result<bool> {
    if !src.exists() {
        tracing::debug!(src = %src.display(), "source missing, skipping copy");
        return Ok(false);
    }

    let file_name = src
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("source '{}' has no file name", src.display()))?;
    let dst = target_dir.join(file_name);
    fs::copy(src, &dst)
        .with_context(|| format!("copying '{}' to '{}'", src.display(), dst.display()))?;
    Ok(true)
}

/// Copy the directory tree `src` to `dst` (which must not exist yet).
///
/// Symlinks are followed, so the copy holds real files. Returns `false`
/// when `src` does not exist.
pub fn copy_tree_if_exists(src: &Path, dst: &Path) -> Result<bool> {
    if !src.exists() {
        tracing::debug!(src = %src.display(), "source tree missing, skipping copy");
        return Ok(false);
    }

    for entry in WalkDir::new(src).follow_links(true).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking '{}'", src.display()))?;
        let rel = entry.path().strip_prefix(src)?;
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("creating directory '{}'", target.display()))?;
        } else {
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "copying '{}' to '{}'",
                    entry.path().display(),
                    target.display()
                )
            })?;
        }
    }

    Ok(true)
}

/// Copy only files whose extension is in `extensions`, preserving the
/// relative directory layout under `dst`.
///
/// Directories are created lazily, so subtrees without a matching file do
/// not appear in the output. Returns the number of files copied.
pub fn copy_filtered_tree(src: &Path, dst: &Path, extensions: &[&str]) -> Result<usize> {
    if !src.exists() {
        tracing::debug!(src = %src.display(), "source tree missing, nothing to filter");
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(true).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking '{}'", src.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.contains(&ext));
        if !matches {
            continue;
        }

        let rel = entry.path().strip_prefix(src)?;
        let target = dst.join(rel);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory '{}'", parent.display()))?;
        }
        fs::copy(entry.path(), &target).with_context(|| {
            format!(
                "copying '{}' to '{}'",
                entry.path().display(),
                target.display()
            )
        })?;
        copied += 1;
    }

    Ok(copied)
}

/// Read `path`, pass its contents through `rewrite`, and write the result
/// back to the same path.
///
/// Copied files may carry a read-only bit from the build tree, so the file
/// is made writable first.
pub fn rewrite_in_place(path: &Path, rewrite: impl FnOnce(&str) -> Result<String>) -> Result<()> {
    make_writable(path)?;
    let original =
        fs::read_to_string(path).with_context(|| format!("reading '{}'", path.display()))?;
    let updated = rewrite(&original).with_context(|| format!("rewriting '{}'", path.display()))?;
    fs::write(path, updated).with_context(|| format!("writing '{}'", path.display()))?;
    Ok(())
}

#[allow(clippy::permissions_set_readonly_false)]
fn make_writable(path: &Path) -> Result<()> {
    let mut perms = fs::metadata(path)
        .with_context(|| format!("reading metadata '{}'", path.display()))?
        .permissions();
    if perms.readonly() {
        perms.set_readonly(false);
        fs::set_permissions(path, perms)
            .with_context(|| format!("setting permissions '{}'", path.display()))?;
    }
    Ok(())
}
