use std::path::{Component, Path, PathBuf};

use snafu::{OptionExt, ResultExt, Snafu, ensure};

/// Pairs the library root as seen from this machine with the same root as
/// seen by the Immich server.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Ord, PartialOrd)]
pub struct PrefixMapping {
    local: PathBuf,
    remote: String,
}

impl PrefixMapping {
    /// Creates a mapping between two absolute roots.
    ///
    /// # Errors
    ///
    /// Fails if either root is relative.
    pub fn new(
        local: impl Into<PathBuf>,
        remote: impl Into<String>,
    ) -> Result<Self, PrefixMappingError> {
        let local = local.into();
        let remote = remote.into();
        ensure!(local.is_absolute(), RelativeLocalSnafu { path: local });
        ensure!(remote.starts_with('/'), RelativeRemoteSnafu { path: remote });

        Ok(Self {
            local: normalize(&local),
            remote,
        })
    }

    pub fn local(&self) -> &Path {
        &self.local
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Translates a local folder into the path the server knows it by.
    ///
    /// The result always uses `/` as separator.
    ///
    /// # Errors
    ///
    /// Fails if the folder is not below the local root or cannot be
    /// represented as UTF-8.
    pub fn map(&self, local_path: &Path) -> Result<String, PathMappingError> {
        let absolute = if local_path.is_absolute() {
            normalize(local_path)
        } else {
            let cwd = std::env::current_dir().context(CurrentDirSnafu)?;
            normalize(&cwd.join(local_path))
        };

        let relative = absolute
            .strip_prefix(&self.local)
            .map_err(|_| PathMappingError::OutsideRoot {
                path: absolute.clone(),
                root: self.local.clone(),
            })?;

        let mut remote = self.remote.trim_end_matches('/').to_owned();
        for component in relative.components() {
            let part = component
                .as_os_str()
                .to_str()
                .with_context(|| NotUtf8Snafu {
                    path: absolute.clone(),
                })?;
            remote.push('/');
            remote.push_str(part);
        }

        if remote.is_empty() {
            remote.push('/');
        }
        Ok(remote)
    }
}

/// Resolves `.` and `..` lexically, without touching the file system.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[derive(Debug, Snafu)]
pub enum PrefixMappingError {
    #[snafu(display("local library root {} is not an absolute path", path.display()))]
    RelativeLocal { path: PathBuf },
    #[snafu(display("remote library root {path} is not an absolute path"))]
    RelativeRemote { path: String },
}

#[derive(Debug, Snafu)]
pub enum PathMappingError {
    #[snafu(display(
        "local path '{}' does not start with library root '{}'",
        path.display(),
        root.display()
    ))]
    OutsideRoot { path: PathBuf, root: PathBuf },
    #[snafu(display("local path '{}' is not valid UTF-8", path.display()))]
    NotUtf8 { path: PathBuf },
    #[snafu(display("failed to resolve current directory: {source}"))]
    CurrentDir { source: std::io::Error },
}
