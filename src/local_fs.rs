mod folder_walker;

pub use folder_walker::{LocalFolder, ReadRootError, list_folders};
