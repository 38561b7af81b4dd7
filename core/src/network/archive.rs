//! Archive sinks for backups and reports.
//!
//! [`DirectoryArchive`] writes into a local folder. [`ScpArchive`] copies to a
//! remote server over SSH using the archive credentials.

use std::io::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use async_ssh2_tokio::{AuthMethod, Client, ServerCheckMethod};
use async_trait::async_trait;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use ioskit_common::config::{ArchiveConfig, ArchiveKind, Credentials};
use ioskit_common::session::ArchiveSink;
use ioskit_common::{Error, Result};

use super::ssh::log_disconnect;

const UPLOAD_TIMEOUT_SECS: u64 = 120;
const UPLOAD_BUFFER_BYTES: usize = 64 * 1024;

fn archive_error(filename: &str, reason: impl ToString) -> Error {
    Error::Archive {
        filename: filename.to_string(),
        reason: reason.to_string(),
    }
}

/// Builds the sink selected by `cfg.kind`. SCP needs a host and credentials.
pub fn from_config(
    cfg: &ArchiveConfig,
    credentials: Option<Credentials>,
) -> Result<Box<dyn ArchiveSink>> {
    match cfg.kind {
        ArchiveKind::Directory => Ok(Box::new(DirectoryArchive::new(&cfg.directory))),
        ArchiveKind::Scp => {
            let host = cfg
                .host
                .ok_or_else(|| archive_error("-", "archive.host is not configured"))?;
            let credentials = credentials
                .ok_or_else(|| archive_error("-", "no credentials for the archive server"))?;
            Ok(Box::new(ScpArchive::new(
                SocketAddr::new(host, cfg.port),
                credentials,
                &cfg.directory,
            )))
        }
    }
}

#[derive(Debug, Clone)]
pub struct DirectoryArchive {
    root: PathBuf,
}

impl DirectoryArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ArchiveSink for DirectoryArchive {
    async fn store(&self, filename: &str, content: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| archive_error(filename, e))?;

        let path = self.root.join(filename);
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| archive_error(filename, e))?;

        info!("Stored {}", path.display());
        Ok(())
    }
}

pub struct ScpArchive {
    server: SocketAddr,
    credentials: Credentials,
    remote_dir: String,
}

impl ScpArchive {
    pub fn new(server: SocketAddr, credentials: Credentials, remote_dir: &Path) -> Self {
        Self {
            server,
            credentials,
            remote_dir: remote_dir.to_string_lossy().trim_end_matches('/').to_string(),
        }
    }

    fn remote_path(&self, filename: &str) -> String {
        if self.remote_dir.is_empty() {
            filename.to_string()
        } else {
            format!("{}/{filename}", self.remote_dir)
        }
    }
}

#[async_trait]
impl ArchiveSink for ScpArchive {
    async fn store(&self, filename: &str, content: &[u8]) -> Result<()> {
        let mut staged = NamedTempFile::new().map_err(|e| archive_error(filename, e))?;
        staged
            .write_all(content)
            .and_then(|_| staged.flush())
            .map_err(|e| archive_error(filename, e))?;
        let local = staged.path().to_string_lossy().to_string();

        let client = Client::connect(
            self.server,
            &self.credentials.username,
            AuthMethod::with_password(&self.credentials.password),
            ServerCheckMethod::NoCheck,
        )
        .await
        .map_err(|e| archive_error(filename, e))?;

        let remote = self.remote_path(filename);
        debug!("uploading {filename} to {}:{remote}", self.server);
        let uploaded = client
            .upload_file(
                local,
                remote,
                Some(UPLOAD_TIMEOUT_SECS),
                Some(UPLOAD_BUFFER_BYTES),
                false,
            )
            .await
            .map_err(|e| archive_error(filename, e));
        log_disconnect(client.disconnect().await, self.server);
        uploaded?;

        info!("Uploaded {filename} to {}", self.server);
        Ok(())
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
