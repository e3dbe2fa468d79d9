use std::{borrow::Cow, convert::Infallible};

use reqwest::header::HeaderMap;
use serde::Serialize;

use crate::AssetId;

use super::{Body, Parse, Request};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlbum {
    album_name: String,
    asset_ids: Vec<AssetId>,
    description: String,
}

impl CreateAlbum {
    pub fn new(album_name: impl Into<String>, asset_ids: Vec<AssetId>) -> Self {
        Self {
            album_name: album_name.into(),
            asset_ids,
            description: String::new(),
        }
    }
}

impl Request for CreateAlbum {
    fn method(&self) -> reqwest::Method {
        reqwest::Method::POST
    }

    fn endpoint(&self) -> Cow<'_, str> {
        "albums".into()
    }

    fn body(&self) -> Body {
        self.into()
    }
}

impl Parse for CreateAlbum {
    type Output = ();
    type Error = Infallible;

    fn parse(_: &HeaderMap, _: &str) -> Result<Self::Output, Self::Error> {
        // The created album is not needed. If the server rejected the
        // request (4XX/5XX), it's already handled prior.
        Ok(())
    }
}
