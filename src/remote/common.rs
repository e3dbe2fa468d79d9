use crate::newtype;

newtype!(AssetId);
newtype!(AlbumId);
