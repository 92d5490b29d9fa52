//! FileSink - appends lines to a file on disk

use std::path::{Path, PathBuf};

use contracts::{ContractError, LogSink};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, instrument};

/// Sink that writes lines to a file
pub struct FileSink {
    name: String,
    path: PathBuf,
    file: File,
}

impl FileSink {
    /// Open (or create) the file, creating missing parent directories
    ///
    /// With `append = false` an existing file is truncated.
    #[instrument(name = "file_sink_open", skip(name, path))]
    pub async fn open(
        name: impl Into<String>,
        path: impl AsRef<Path>,
        append: bool,
    ) -> Result<Self, ContractError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut options = OpenOptions::new();
        options.create(true);
        if append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }
        let file = options.open(&path).await?;

        debug!(path = %path.display(), append, "FileSink opened");

        Ok(Self {
            name: name.into(),
            path,
            file,
        })
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn write(&mut self, buf: &[u8]) -> Result<usize, ContractError> {
        self.file.write_all(buf).await.map_err(|e| {
            error!(sink = %self.name, path = %self.path.display(), error = %e, "File write failed");
            ContractError::Io(e)
        })?;
        Ok(buf.len())
    }

    #[instrument(name = "file_sink_flush", skip(self), fields(sink = %self.name))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        self.file.flush().await?;
        Ok(())
    }

    #[instrument(name = "file_sink_close", skip(self), fields(sink = %self.name))]
    async fn close(&mut self) -> Result<(), ContractError> {
        self.file.flush().await?;
        self.file.sync_all().await?;
        debug!(sink = %self.name, "FileSink closed");
        Ok(())
    }
}
