use std::borrow::Cow;

use reqwest::header::HeaderMap;

use crate::AlbumId;

use super::{DeserializeError, Parse, Request, parse};

/// Fetches every album of the user owning the API key.
pub struct ListAlbums;

impl Request for ListAlbums {
    fn method(&self) -> reqwest::Method {
        reqwest::Method::GET
    }

    fn endpoint(&self) -> Cow<'_, str> {
        "albums".into()
    }
}

impl Parse for ListAlbums {
    type Output = Vec<Album>;
    type Error = DeserializeError;

    fn parse(_: &HeaderMap, input: &str) -> Result<Self::Output, Self::Error> {
        parse(input)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: Option<AlbumId>,
    pub album_name: String,
}
