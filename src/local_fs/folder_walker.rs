use std::path::{Path, PathBuf};

use snafu::prelude::*;
use tracing::{debug, error};
use walkdir::WalkDir;

/// A directory directly below the library root. Its name becomes the
/// album name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFolder {
    path: PathBuf,
    name: String,
}

impl LocalFolder {
    #[cfg(test)]
    pub fn new(path: impl Into<PathBuf>, name: &str) -> Self {
        Self {
            path: path.into(),
            name: name.to_owned(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Lists the immediate subdirectories of `root` in the order the file system
/// returns them. Symbolic links to directories count as directories.
///
/// # Errors
///
/// Fails if `root` itself is not a readable directory. Entries that cannot
/// be accessed are logged and skipped.
pub fn list_folders(root: &Path) -> Result<Vec<LocalFolder>, ReadRootError> {
    let walker = WalkDir::new(root).max_depth(1).follow_links(true);

    let mut folders = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(ok) => ok,
            Err(e) if e.depth() == 0 => return Err(e).context(ReadRootSnafu { root }),
            Err(e) => {
                error!("Could not access path: {e}");
                continue;
            }
        };

        if entry.depth() == 0 {
            ensure!(entry.file_type().is_dir(), NotADirectorySnafu { root });
            continue;
        }

        if !entry.file_type().is_dir() {
            debug!("skipping non-directory {}", entry.path().display());
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            error!(
                "skipping folder with non UTF-8 name: {}",
                entry.path().display()
            );
            continue;
        };
        folders.push(LocalFolder {
            name: name.to_owned(),
            path: entry.into_path(),
        });
    }

    Ok(folders)
}

#[derive(Debug, Snafu)]
pub enum ReadRootError {
    #[snafu(display("cannot read library root {}: {source}", root.display()))]
    ReadRoot {
        root: PathBuf,
        source: walkdir::Error,
    },
    #[snafu(display("library root {} is not a directory", root.display()))]
    NotADirectory { root: PathBuf },
}
