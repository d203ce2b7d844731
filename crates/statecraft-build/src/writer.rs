use crate::{BuildError, GeneratedFile, WritePolicy};
use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};

/// Commit a batch of generated files under `root`.
///
/// Every file is first written into a staging directory inside `root`, and
/// every target is checked (parent directory present, target not a
/// directory) before the first rename. A file whose current bytes already
/// match, or a `CreateOnly` file whose target exists, is left untouched.
pub fn write_batch(root: &Path, files: &[GeneratedFile]) -> Result<(), BuildError> {
    for file in files {
        check_relative(&file.path).map_err(|err| BuildError::io(&file.path, err))?;
    }

    fs::create_dir_all(root).map_err(|err| BuildError::io(root, err))?;
    let staging = tempfile::Builder::new()
        .prefix(".statecraft-")
        .tempdir_in(root)
        .map_err(|err| BuildError::io(root, err))?;

    // stage
    let mut pending: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(files.len());
    for (index, file) in files.iter().enumerate() {
        let target = root.join(&file.path);
        if !needs_write(file, &target).map_err(|err| BuildError::io(&target, err))? {
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|err| BuildError::io(parent, err))?;
        }

        let staged = staging.path().join(format!("{index}.move"));
        fs::write(&staged, &file.contents).map_err(|err| BuildError::io(&staged, err))?;
        pending.push((staged, target));
    }

    // commit
    for (staged, target) in &pending {
        fs::rename(staged, target).map_err(|err| BuildError::io(target, err))?;
    }

    tracing::debug!(
        root = %root.display(),
        files = files.len(),
        written = pending.len(),
        "committed generated batch"
    );

    Ok(())
}

// Whether the target differs from the file, failing on a directory in the way.
fn needs_write(file: &GeneratedFile, target: &Path) -> io::Result<bool> {
    let meta = match fs::symlink_metadata(target) {
        Ok(meta) => meta,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(true),
        Err(err) => return Err(err),
    };

    if meta.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "a directory occupies the generated file's path",
        ));
    }
    if file.policy == WritePolicy::CreateOnly {
        return Ok(false);
    }

    Ok(fs::read(target)? != file.contents.as_bytes())
}

// Generated paths must stay inside the output root.
fn check_relative(path: &Path) -> io::Result<()> {
    let inside = path.components().next().is_some()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));

    if inside {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "generated path must be relative to the output root",
        ))
    }
}

///
/// TESTS
///
