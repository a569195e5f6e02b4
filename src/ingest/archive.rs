use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Moves `file` into `dir`, keeping its name unless that name is taken, in which
/// case a short random suffix goes before the extension.
pub(crate) fn move_into(file: &Path, dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let destination = free_destination(file, dir)?;

    match fs::rename(file, &destination) {
        Ok(()) => Ok(destination),
        // Cross-device moves cannot be renamed.
        Err(_) => {
            fs::copy(file, &destination)?;
            fs::remove_file(file)?;
            Ok(destination)
        }
    }
}

fn free_destination(file: &Path, dir: &Path) -> io::Result<PathBuf> {
    let name = file.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no file name", file.display()),
        )
    })?;

    let candidate = dir.join(name);
    if !candidate.exists() {
        return Ok(candidate);
    }

    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = &uuid::Uuid::new_v4().simple().to_string()[..8];
    let renamed = match file.extension() {
        Some(ext) => format!("{stem}-{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{suffix}"),
    };
    Ok(dir.join(renamed))
}
