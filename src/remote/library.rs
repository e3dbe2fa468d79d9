use std::{path::Path, sync::Arc};

use tracing::{debug, error, info, warn};

use crate::{AssetId, CheckFailurePolicy, Config};

use super::{Connection, CreateAlbum, ListAlbums, ListFolderAssets, RequestError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    AlreadyExists,
    Simulated,
    Created,
    Failed,
}

/// Album operations against the Immich server.
///
/// Request failures never escape this type; they are logged and turned
/// into a safe default so the run can move on to the next folder.
#[derive(Debug)]
pub struct ImmichLibrary {
    connection: Connection,
    config: Arc<Config>,
}

impl ImmichLibrary {
    #[must_use]
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            connection: Connection::from_config(&config),
            config,
        }
    }

    /// Returns the assets below `remote_path` in server order, or nothing if
    /// the server could not be asked.
    pub async fn folder_assets(&self, folder: &Path, remote_path: &str) -> Vec<AssetId> {
        debug!("Calling view/folder with path: {remote_path}");
        match self
            .connection
            .request(ListFolderAssets::new(remote_path))
            .await
        {
            Ok(asset_ids) => {
                debug!("Found {} assets in {remote_path}", asset_ids.len());
                asset_ids
            }
            Err(e) => {
                error!(
                    "Failed to get assets for '{}' (Immich path: '{remote_path}'): {e}",
                    folder.display()
                );
                log_response_body(&e);
                Vec::new()
            }
        }
    }

    /// Checks for an album with exactly this name. Case matters.
    pub async fn album_exists(&self, name: &str) -> bool {
        match self.connection.request(ListAlbums).await {
            Ok(albums) => albums.iter().any(|album| album.album_name == name),
            Err(e) => {
                error!("Failed to check existing albums: {e}");
                log_response_body(&e);
                match self.config.on_album_check_failure {
                    CheckFailurePolicy::AssumeMissing => false,
                    CheckFailurePolicy::AssumeExists => {
                        warn!("Assuming album '{name}' exists");
                        true
                    }
                }
            }
        }
    }

    /// Creates the album unless one with the same name exists. In dry-run
    /// mode the existence check still runs but nothing is written.
    pub async fn provision(
        &self,
        name: &str,
        asset_ids: Vec<AssetId>,
        dry_run: bool,
    ) -> ProvisionOutcome {
        if self.album_exists(name).await {
            info!("[SKIP] Album '{name}' already exists.");
            return ProvisionOutcome::AlreadyExists;
        }

        let asset_count = asset_ids.len();
        if dry_run {
            info!("[DRY-RUN] Simulated creation of album '{name}' with {asset_count} assets.");
            return ProvisionOutcome::Simulated;
        }

        match self
            .connection
            .request(CreateAlbum::new(name, asset_ids))
            .await
        {
            Ok(()) => {
                info!("[OK] Album created: {name} ({asset_count} assets)");
                ProvisionOutcome::Created
            }
            Err(e) => {
                error!("Failed to create album '{name}': {e}");
                log_response_body(&e);
                ProvisionOutcome::Failed
            }
        }
    }
}

fn log_response_body<E>(err: &RequestError<E>)
where
    E: std::fmt::Display + std::error::Error + 'static,
{
    if let Some(body) = err.response_body() {
        error!("Response content: {body}");
    }
}
