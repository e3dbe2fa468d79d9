use std::borrow::Cow;

use reqwest::header::HeaderMap;
use url::Url;

use crate::AssetId;

use super::{DeserializeError, Parse, Request, common::api_url, parse};

/// Lists the assets the server has indexed below a folder of its library.
pub struct ListFolderAssets {
    path: String,
}

impl ListFolderAssets {
    pub fn new(remote_path: impl Into<String>) -> Self {
        Self {
            path: remote_path.into(),
        }
    }
}

impl Request for ListFolderAssets {
    fn method(&self) -> reqwest::Method {
        reqwest::Method::GET
    }

    fn endpoint(&self) -> Cow<'_, str> {
        "view/folder".into()
    }

    fn url(&self, host: &Url) -> Url {
        let mut url = api_url(host, &self.endpoint());
        url.query_pairs_mut().append_pair("path", &self.path);
        url
    }
}

impl Parse for ListFolderAssets {
    type Output = Vec<AssetId>;
    type Error = DeserializeError;

    fn parse(_: &HeaderMap, input: &str) -> Result<Self::Output, Self::Error> {
        let assets: Vec<Asset> = parse(input)?;
        Ok(assets.into_iter().map(|asset| asset.id).collect())
    }
}

#[derive(Debug, serde::Deserialize)]
struct Asset {
    id: AssetId,
}
