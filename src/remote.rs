mod common;
mod library;
mod requests;

pub use common::{AlbumId, AssetId};
pub use library::{ImmichLibrary, ProvisionOutcome};
pub use requests::*;
