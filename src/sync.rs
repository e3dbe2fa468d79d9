use std::sync::Arc;

use snafu::{ResultExt, Snafu};
use tracing::{error, info};

use crate::{
    Config, ImmichLibrary, LocalFolder, PrefixMapping, PrefixMappingError, ProvisionOutcome,
    ReadRootError, list_folders,
};

/// What happened to a single folder during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderOutcome {
    Unmapped,
    NoAssets,
    Provisioned(ProvisionOutcome),
}

/// Tally of folder outcomes over one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub folders: usize,
    pub created: usize,
    pub simulated: usize,
    pub already_existing: usize,
    pub without_assets: usize,
    pub unmapped: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: FolderOutcome) {
        self.folders += 1;
        let counter = match outcome {
            FolderOutcome::Unmapped => &mut self.unmapped,
            FolderOutcome::NoAssets => &mut self.without_assets,
            FolderOutcome::Provisioned(ProvisionOutcome::Created) => &mut self.created,
            FolderOutcome::Provisioned(ProvisionOutcome::Simulated) => &mut self.simulated,
            FolderOutcome::Provisioned(ProvisionOutcome::AlreadyExists) => {
                &mut self.already_existing
            }
            FolderOutcome::Provisioned(ProvisionOutcome::Failed) => &mut self.failed,
        };
        *counter += 1;
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Processed {} folders: {} created, {} simulated, {} already existing, \
             {} without assets, {} outside library root, {} failed",
            self.folders,
            self.created,
            self.simulated,
            self.already_existing,
            self.without_assets,
            self.unmapped,
            self.failed,
        )
    }
}

/// Turns every folder directly below the local library root into an album.
pub struct Synchronizer {
    config: Arc<Config>,
    mapping: PrefixMapping,
    library: ImmichLibrary,
}

impl Synchronizer {
    /// # Errors
    ///
    /// Fails if one of the configured library roots is relative.
    pub fn new(config: Arc<Config>) -> Result<Self, SyncError> {
        let mapping = config.prefix_mapping().context(MappingSnafu)?;
        Ok(Self {
            library: ImmichLibrary::new(config.clone()),
            mapping,
            config,
        })
    }

    /// Processes all folders one after another. Failures of single folders
    /// are logged and counted but never abort the run.
    ///
    /// # Errors
    ///
    /// Fails only if the local library root cannot be listed.
    pub async fn run(&self) -> Result<RunSummary, SyncError> {
        let folders = list_folders(self.mapping.local()).context(ListFoldersSnafu)?;
        let total = folders.len();
        info!(
            "Found {total} folders in {}",
            self.mapping.local().display()
        );

        let mut summary = RunSummary::default();
        for (idx, folder) in folders.iter().enumerate() {
            info!(
                "[{}/{total}] Processing folder: {}",
                idx + 1,
                folder.path().display()
            );
            summary.record(self.process_folder(folder).await);
        }

        Ok(summary)
    }

    async fn process_folder(&self, folder: &LocalFolder) -> FolderOutcome {
        let remote_path = match self.mapping.map(folder.path()) {
            Ok(remote_path) => remote_path,
            Err(e) => {
                error!("{e}");
                return FolderOutcome::Unmapped;
            }
        };

        let asset_ids = self
            .library
            .folder_assets(folder.path(), &remote_path)
            .await;
        if asset_ids.is_empty() {
            info!("[SKIP] No assets found in '{}'", folder.path().display());
            return FolderOutcome::NoAssets;
        }

        let outcome = self
            .library
            .provision(folder.name(), asset_ids, self.config.dry_run)
            .await;
        FolderOutcome::Provisioned(outcome)
    }
}

#[derive(Debug, Snafu)]
pub enum SyncError {
    #[snafu(display("invalid library roots"))]
    Mapping { source: PrefixMappingError },
    #[snafu(display("failed to list folders"))]
    ListFolders { source: ReadRootError },
}
