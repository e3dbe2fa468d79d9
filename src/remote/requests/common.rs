use std::borrow::Cow;

use reqwest::{
    StatusCode,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap},
};
use serde::Serialize;
use snafu::{ResultExt, prelude::*};
use tracing::{debug, trace};
use url::Url;

use crate::Config;

const API_KEY_HEADER: &str = "x-api-key";
const JSON_MIME_TYPE: &str = "application/json";

#[derive(Debug)]
pub struct Connection {
    host: Url,
    api_key: String,
    client: reqwest::Client,
}

impl Connection {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            client: reqwest::Client::default(),
            api_key: config.api_key.clone(),
            host: with_trailing_slash(config.immich_instance.clone()),
        }
    }

    /// Sends `request` and parses the response.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, on any non-2xx status and if the response
    /// body cannot be parsed. The latter two keep the response body.
    pub async fn request<T>(&self, request: T) -> Result<T::Output, RequestError<T::Error>>
    where
        T: Request + Parse + Send,
    {
        let url = request.url(&self.host);
        let method = request.method();

        debug!("Starting request {method} {url}");
        let mut request_builder = self
            .client
            .request(method, url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(ACCEPT, JSON_MIME_TYPE);

        match request.body() {
            Body::Json(content) => {
                let body = content.context(SerializeSnafu)?;
                trace!("Sending payload {}", String::from_utf8_lossy(&body));
                request_builder = request_builder
                    .header(CONTENT_TYPE, JSON_MIME_TYPE)
                    .body(body);
            }
            Body::Empty => {}
        }

        let response = request_builder.send().await.context(ReqwestSnafu)?;
        let status = response.status();
        let headers = response.headers().clone();
        let payload = response.text().await.context(ReqwestSnafu)?;
        trace!("Received status {status} with payload {payload} and headers {headers:?}");

        ensure!(
            status.is_success(),
            StatusSnafu {
                status,
                body: payload
            }
        );

        T::parse(&headers, &payload).context(DeserializeSnafu { body: payload })
    }
}

/// `Url::join` replaces the last segment unless the base ends with a slash,
/// which would drop a reverse proxy prefix like `/immich`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

pub fn api_url(host: &Url, endpoint: &str) -> Url {
    let url = host.join("api/").expect("failed to create URL");
    url.join(endpoint).expect("failed to create URL")
}

pub trait Request {
    fn method(&self) -> reqwest::Method;
    fn endpoint(&self) -> Cow<'_, str>;
    fn url(&self, host: &Url) -> Url {
        api_url(host, &self.endpoint())
    }

    fn body(&self) -> Body {
        Body::default()
    }
}

#[derive(Debug, Default)]
pub enum Body {
    Json(serde_json::Result<Vec<u8>>),
    #[default]
    Empty,
}

impl<T: Serialize> From<&T> for Body {
    fn from(value: &T) -> Self {
        Self::Json(serde_json::to_vec(value))
    }
}

pub trait Parse {
    type Output;
    type Error: snafu::Error + 'static;
    /// Parses the response body of the request to the Immich API.
    ///
    /// # Errors
    ///
    /// This function will return an error if parsing failed.
    fn parse(headers: &HeaderMap, body: &str) -> Result<Self::Output, Self::Error>;
}

pub type DeserializeError = serde_path_to_error::Error<serde_json::Error>;

pub fn parse<'de, T: serde::Deserialize<'de>>(input: &'de str) -> Result<T, DeserializeError> {
    let deserializer = &mut serde_json::Deserializer::from_str(input);
    serde_path_to_error::deserialize(deserializer)
}

#[derive(Debug, Snafu)]
pub enum RequestError<E: std::fmt::Display + std::error::Error + 'static> {
    #[snafu(display("Failed to serialize request body: {source}"))]
    Serialize { source: serde_json::Error },
    #[snafu(display("Request failed: {source}"))]
    Reqwest { source: reqwest::Error },
    #[snafu(display("Server responded with {status}"))]
    Status { status: StatusCode, body: String },
    #[snafu(display("Failed to deserialize response: {source}"))]
    Deserialize { source: E, body: String },
}

impl<E: std::fmt::Display + std::error::Error + 'static> RequestError<E> {
    /// The body the server sent along with a failed request, if any.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } | Self::Deserialize { body, .. } => {
                Some(body.as_str()).filter(|body| !body.trim().is_empty())
            }
            Self::Serialize { .. } | Self::Reqwest { .. } => None,
        }
    }
}
