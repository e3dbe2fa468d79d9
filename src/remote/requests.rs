mod common;
mod create_album;
mod list_albums;
mod list_folder_assets;

use common::{Body, parse};

pub use common::{Connection, DeserializeError, Parse, Request, RequestError};
pub use create_album::CreateAlbum;
pub use list_albums::{Album, ListAlbums};
pub use list_folder_assets::ListFolderAssets;
