#![warn(clippy::nursery, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, reason = "Too much nagging")]

mod config;
mod helper;
mod local_fs;
mod path_mapping;
mod remote;
mod sync;

use helper::{newtype, take_last_n_chars};

pub use config::{CheckFailurePolicy, Config, ConfigError, ENV_PREFIX, load_config};
pub use local_fs::{LocalFolder, ReadRootError, list_folders};
pub use path_mapping::{PathMappingError, PrefixMapping, PrefixMappingError};
pub use remote::{
    Album, AlbumId, AssetId, Connection, CreateAlbum, DeserializeError, ImmichLibrary,
    ListAlbums, ListFolderAssets, Parse, ProvisionOutcome, Request, RequestError,
};
pub use sync::{FolderOutcome, RunSummary, SyncError, Synchronizer};
