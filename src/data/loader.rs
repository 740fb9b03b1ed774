//! File Loader Module
//! Reads a picked or dropped file as UTF-8 text on a background thread.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;
use thiserror::Error;
use tracing::{error, info};

/// User-visible text is the same for every read failure; the cause is logged.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("error reading file")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error reading file")]
    NotUtf8 {
        name: String,
        #[source]
        source: std::str::Utf8Error,
    },
}

/// Where a file to load comes from.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// File dialog, or a drop that only carries a path.
    Path(PathBuf),
    /// A drop whose contents were already read into memory.
    Bytes { name: String, bytes: Arc<[u8]> },
}

impl FileSource {
    /// Name shown to the user once the file is loaded.
    pub fn display_name(&self) -> String {
        match self {
            FileSource::Path(path) => file_name_of(path),
            FileSource::Bytes { name, .. } => name.clone(),
        }
    }

    /// Build a source from a file dropped onto the window.
    pub fn from_dropped(file: &egui::DroppedFile) -> Option<Self> {
        if let Some(bytes) = &file.bytes {
            Some(FileSource::Bytes {
                name: file.name.clone(),
                bytes: bytes.clone(),
            })
        } else {
            file.path.clone().map(FileSource::Path)
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Result of one load, delivered back to the UI thread.
#[derive(Debug)]
pub enum LoadResult {
    Complete { name: String, text: String },
    Failed { name: String, error: LoaderError },
}

/// Read the whole source as UTF-8 text.
pub fn read_source(source: &FileSource) -> Result<String, LoaderError> {
    match source {
        FileSource::Path(path) => std::fs::read_to_string(path).map_err(|source| LoaderError::Io {
            path: path.clone(),
            source,
        }),
        FileSource::Bytes { name, bytes } => std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|source| LoaderError::NotUtf8 {
                name: name.clone(),
                source,
            }),
    }
}

/// Runs one read at a time off the UI thread.
#[derive(Default)]
pub struct FileLoader {
    rx: Option<Receiver<LoadResult>>,
}

impl FileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.rx.is_some()
    }

    /// Start reading `source`. Ignored while another read is pending.
    pub fn load(&mut self, source: FileSource) -> bool {
        if self.is_loading() {
            return false;
        }

        let (tx, rx) = channel();
        self.rx = Some(rx);

        thread::spawn(move || {
            let name = source.display_name();
            let result = match read_source(&source) {
                Ok(text) => {
                    info!(file = %name, bytes = text.len(), "file read");
                    LoadResult::Complete { name, text }
                }
                Err(e) => {
                    error!(file = %name, error = ?e, "failed to read file");
                    LoadResult::Failed { name, error: e }
                }
            };
            let _ = tx.send(result);
        });
        true
    }

    /// Take the finished result, if any.
    pub fn poll(&mut self) -> Option<LoadResult> {
        let rx = self.rx.take()?;
        match rx.try_recv() {
            Ok(result) => Some(result),
            Err(std::sync::mpsc::TryRecvError::Empty) => {
                self.rx = Some(rx);
                None
            }
            Err(std::sync::mpsc::TryRecvError::Disconnected) => None,
        }
    }
}
