use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};
use url::Url;

use crate::{PrefixMapping, PrefixMappingError, take_last_n_chars};

/// What to assume about an album when the album list cannot be fetched.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckFailurePolicy {
    /// Treat the album as missing and attempt to create it.
    #[default]
    AssumeMissing,
    /// Treat the album as existing and leave the folder alone.
    AssumeExists,
}

impl std::fmt::Display for CheckFailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::AssumeMissing => f.write_str("assume missing"),
            Self::AssumeExists => f.write_str("assume exists"),
        }
    }
}

#[derive(Deserialize, Serialize)]
pub struct Config {
    #[serde(deserialize_with = "instance_url")]
    pub immich_instance: Url,
    pub api_key: String,
    pub library_local_root: PathBuf,
    pub library_remote_root: String,
    pub dry_run: bool,
    pub on_album_check_failure: CheckFailurePolicy,
}

impl Config {
    /// # Errors
    ///
    /// Fails if one of the library roots is not absolute.
    pub fn prefix_mapping(&self) -> Result<PrefixMapping, PrefixMappingError> {
        PrefixMapping::new(
            self.library_local_root.clone(),
            self.library_remote_root.clone(),
        )
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("immich_instance", &self.immich_instance)
            .field("api_key", &"EXPUNGED")
            .field("library_local_root", &self.library_local_root)
            .field("library_remote_root", &self.library_remote_root)
            .field("dry_run", &self.dry_run)
            .field("on_album_check_failure", &self.on_album_check_failure)
            .finish()
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "Configuration:")?;
        writeln!(f, "Immich instance: {}", self.immich_instance)?;
        writeln!(
            f,
            "Immich API key: ...{}",
            take_last_n_chars(&self.api_key, 3)
        )?;
        writeln!(
            f,
            "Local library root: {}",
            self.library_local_root.display()
        )?;
        writeln!(f, "Remote library root: {}", self.library_remote_root)?;
        writeln!(f, "Dry run: {}", self.dry_run)?;
        writeln!(
            f,
            "If albums cannot be listed: {}",
            self.on_album_check_failure
        )?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            immich_instance: "http://localhost:2283"
                .try_into()
                .expect("failed to create default url"),
            api_key: "missing_api_key".to_owned(),
            library_local_root: PathBuf::from("/missing_library_local_root"),
            library_remote_root: "/missing_library_remote_root".to_owned(),
            dry_run: false,
            on_album_check_failure: CheckFailurePolicy::default(),
        }
    }
}

/// Accepts a full http(s) URL or a bare `host:port`, which gets `http://`.
fn instance_url<'de, D>(de: D) -> Result<Url, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: String = Deserialize::deserialize(de)?;
    let url = if raw.contains("://") {
        Url::parse(&raw)
    } else {
        Url::parse(&format!("http://{raw}"))
    }
    .map_err(serde::de::Error::custom)?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(serde::de::Error::custom(format!(
            "'{raw}' is not an http(s) URL or host:port"
        )));
    }
    Ok(url)
}

/// Environment variables with this prefix override the configuration file.
pub const ENV_PREFIX: &str = "IMMICH_ALBUMS_";

/// Loads the configuration from defaults, `config_file` and the environment,
/// in increasing priority. `dry_run` forces dry-run mode on.
///
/// # Errors
///
/// Fails if a value has the wrong type or a library root is relative.
pub fn load_config(config_file: &Path, dry_run: bool) -> Result<Config, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_file))
        .merge(Env::prefixed(ENV_PREFIX));
    if dry_run {
        figment = figment.merge(Serialized::default("dry_run", true));
    }

    let config: Config = figment.extract().context(FigmentSnafu)?;
    config.prefix_mapping().context(LibraryRootSnafu)?;
    Ok(config)
}

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("Failed to set configuration: {source}"))]
    Figment { source: figment::Error },
    #[snafu(display("Invalid library root: {source}"))]
    LibraryRoot { source: PrefixMappingError },
}
