use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use immich_folder_albums::{Config, RunSummary, Synchronizer};
use serde_json::{Value, json};
use tempfile::TempDir;
use tracing::subscriber::DefaultGuard;
use wiremock::{
    Mock, MockServer, Request, Respond, ResponseTemplate,
    http::Method,
    matchers::{header, method, path, query_param},
};

pub type Result<T = (), E = Box<dyn std::error::Error + 'static>> = std::result::Result<T, E>;

pub const REMOTE_ROOT: &str = "/Albums";

type AlbumStore = Arc<Mutex<Vec<Value>>>;

/// Immich stand-in that keeps created albums in memory.
pub struct FakeImmich {
    pub server: MockServer,
    albums: AlbumStore,
}

impl FakeImmich {
    pub const API_KEY: &'static str = "test-api-key";

    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let albums = AlbumStore::default();

        Mock::given(method("GET"))
            .and(path("/api/albums"))
            .and(header("x-api-key", Self::API_KEY))
            .respond_with(ListAlbumsResponder(albums.clone()))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/albums"))
            .and(header("x-api-key", Self::API_KEY))
            .respond_with(CreateAlbumResponder(albums.clone()))
            .mount(&server)
            .await;

        Self { server, albums }
    }

    pub async fn with_folder(&self, remote_path: &str, asset_ids: &[&str]) {
        let assets: Vec<_> = asset_ids
            .iter()
            .map(|id| json!({"id": id, "type": "IMAGE", "isFavorite": false}))
            .collect();
        self.folder_responds(remote_path, ResponseTemplate::new(200).set_body_json(assets))
            .await;
    }

    pub async fn folder_responds(&self, remote_path: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/api/view/folder"))
            .and(query_param("path", remote_path))
            .and(header("x-api-key", Self::API_KEY))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// Answers album requests with `response` instead of the in-memory store.
    pub async fn override_albums(&self, http_method: Method, response: ResponseTemplate) {
        Mock::given(method(http_method))
            .and(path("/api/albums"))
            .respond_with(response)
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    pub fn with_album(&self, name: &str) {
        let mut albums = self.albums.lock().unwrap();
        let id = format!("album-{}", albums.len());
        albums.push(json!({"id": id, "albumName": name, "assetIds": []}));
    }

    pub fn albums(&self) -> Vec<Value> {
        self.albums.lock().unwrap().clone()
    }

    pub fn album_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .albums()
            .iter()
            .filter_map(|album| album["albumName"].as_str().map(ToOwned::to_owned))
            .collect();
        names.sort_unstable();
        names
    }

    pub async fn count_requests(&self, http_method: Method, endpoint: &str) -> usize {
        self.server
            .received_requests()
            .await
            .expect("request recording is enabled")
            .iter()
            .filter(|request| request.method == http_method && request.url.path() == endpoint)
            .count()
    }
}

struct ListAlbumsResponder(AlbumStore);

impl Respond for ListAlbumsResponder {
    fn respond(&self, _: &Request) -> ResponseTemplate {
        let albums = self.0.lock().unwrap().clone();
        ResponseTemplate::new(200).set_body_json(albums)
    }
}

struct CreateAlbumResponder(AlbumStore);

impl Respond for CreateAlbumResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Ok(mut album) = request.body_json::<Value>() else {
            return ResponseTemplate::new(400).set_body_string("invalid json");
        };
        let mut albums = self.0.lock().unwrap();
        album["id"] = json!(format!("album-{}", albums.len()));
        albums.push(album.clone());
        ResponseTemplate::new(201).set_body_json(album)
    }
}

pub struct TestEnv {
    pub immich: FakeImmich,
    pub library: TempDir,
}

impl TestEnv {
    pub async fn new() -> Self {
        Self {
            immich: FakeImmich::start().await,
            library: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn local_root(&self) -> &Path {
        self.library.path()
    }

    pub fn create_folder(&self, relative: &str) -> PathBuf {
        let folder = self.local_root().join(relative);
        std::fs::create_dir_all(&folder).expect("Failed to create folder");
        folder
    }

    pub fn config(&self, dry_run: bool) -> Config {
        Config {
            immich_instance: self.immich.server.uri().parse().expect("invalid mock uri"),
            api_key: FakeImmich::API_KEY.to_owned(),
            library_local_root: self.local_root().to_owned(),
            library_remote_root: REMOTE_ROOT.to_owned(),
            dry_run,
            ..Default::default()
        }
    }

    pub async fn run_with(&self, config: Config) -> Result<RunSummary> {
        let synchronizer = Synchronizer::new(Arc::new(config))?;
        Ok(synchronizer.run().await?)
    }

    pub async fn run(&self, dry_run: bool) -> Result<RunSummary> {
        self.run_with(self.config(dry_run)).await
    }
}

/// Collects everything logged on the current thread while the guard lives.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn install() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        (capture, tracing::subscriber::set_default(subscriber))
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
