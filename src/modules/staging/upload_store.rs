use std::path::{Path, PathBuf};

use chrono::Utc;
use futures::StreamExt;
use thiserror::Error;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::core::config::UploadConfig;
use crate::modules::openai::FileUpload;

/// Read size used when streaming a staged file back out
const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Fallback name for uploads without a usable filename
const FALLBACK_FILENAME: &str = "upload.bin";

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("File too large. Maximum size is {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Failed to stage upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Local directory where attachments wait while they are forwarded upstream
pub struct UploadStagingStore {
    staging_dir: PathBuf,
    max_file_size: usize,
}

impl UploadStagingStore {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            staging_dir: config.staging_dir.clone(),
            max_file_size: config.max_file_size,
        }
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Create the staging directory if it does not exist yet
    pub async fn ensure_dir_exists(&self) -> Result<(), StagingError> {
        if !tokio::fs::try_exists(&self.staging_dir).await? {
            tokio::fs::create_dir_all(&self.staging_dir).await?;
            info!("Created upload staging directory {}", self.staging_dir.display());
        }
        Ok(())
    }

    /// Start staging a new upload. The file is created immediately and removed
    /// again if the writer is dropped before [`StagingWriter::finish`].
    pub async fn begin(
        &self,
        original_filename: &str,
        content_type: Option<String>,
    ) -> Result<StagingWriter, StagingError> {
        let original_filename = sanitize_filename(original_filename);
        let path = self
            .staging_dir
            .join(staged_file_name(Utc::now().timestamp_millis(), &original_filename));

        // create_new: never clobber a concurrent upload that picked the same name
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        debug!("Staging upload at {}", path.display());

        Ok(StagingWriter {
            file,
            guard: StagedPath { path },
            original_filename,
            content_type,
            written: 0,
            limit: self.max_file_size,
        })
    }
}

/// Deletes the staged file when dropped
#[derive(Debug)]
struct StagedPath {
    path: PathBuf,
}

impl Drop for StagedPath {
    fn drop(&mut self) {
        // Single unlink, done inline so the file is gone before the response is sent
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed staged upload {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to remove staged upload {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

/// An upload being written to the staging directory
pub struct StagingWriter {
    file: File,
    guard: StagedPath,
    original_filename: String,
    content_type: Option<String>,
    written: usize,
    limit: usize,
}

impl StagingWriter {
    /// Append a chunk. Fails without writing if the chunk would exceed the limit.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), StagingError> {
        let next = self.written.saturating_add(chunk.len());
        if next > self.limit {
            return Err(StagingError::PayloadTooLarge { limit: self.limit });
        }
        self.file.write_all(chunk).await?;
        self.written = next;
        Ok(())
    }

    pub async fn finish(mut self) -> Result<StagedUpload, StagingError> {
        self.file.flush().await?;
        Ok(StagedUpload {
            guard: self.guard,
            original_filename: self.original_filename,
            content_type: self.content_type,
            size: self.written as u64,
        })
    }
}

/// A fully staged upload; the file lives exactly as long as this value
#[derive(Debug)]
pub struct StagedUpload {
    guard: StagedPath,
    original_filename: String,
    content_type: Option<String>,
    size: u64,
}

impl StagedUpload {
    pub fn path(&self) -> &Path {
        &self.guard.path
    }

    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Open the staged file as a chunked stream ready to forward upstream
    pub async fn open(&self) -> Result<FileUpload, StagingError> {
        let file = File::open(self.path()).await?;
        let stream = futures::stream::try_unfold(file, |mut file| async move {
            let mut buf = vec![0u8; READ_CHUNK_SIZE];
            let read = file.read(&mut buf).await?;
            if read == 0 {
                return Ok::<_, std::io::Error>(None);
            }
            buf.truncate(read);
            Ok(Some((buf, file)))
        });

        Ok(FileUpload {
            filename: self.original_filename.clone(),
            content_type: self.content_type.clone(),
            length: self.size,
            stream: stream.boxed(),
        })
    }
}

/// `{millis}-{filename}`: unique enough for concurrent requests, not guaranteed
pub fn staged_file_name(timestamp_millis: i64, original_filename: &str) -> String {
    format!("{}-{}", timestamp_millis, original_filename)
}

/// Strip any directory components so a client cannot escape the staging dir
pub fn sanitize_filename(name: &str) -> String {
    let basename = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim();

    if basename.is_empty() || basename == "." || basename == ".." {
        FALLBACK_FILENAME.to_string()
    } else {
        basename.to_string()
    }
}
