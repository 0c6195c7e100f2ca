use std::path::{Path, PathBuf};
use strum::Display;

/// Name every batch result is saved under, whatever the uploaded file was called.
pub const BATCH_RESULT_FILE_NAME: &str = "text_analysis_results.csv";

/// A file picked by the user, held in memory until it is uploaded.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub contents: Vec<u8>,
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("name", &self.name)
            .field("size_bytes", &self.size_bytes())
            .finish()
    }
}

impl UploadFile {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.contents.len() as u64
    }

    /// The name the file is sent under, taken from the last path component.
    pub fn name_from_path(path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string())
    }

    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let contents = tokio::fs::read(path).await?;
        Ok(Self::new(Self::name_from_path(path), contents))
    }
}

/// How deeply the service processes each CSV row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum BatchMode {
    /// Every analysis field for every row.
    Full,
    /// Sentiment only, first rows only.
    Quick,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchUploadJob {
    pub file: UploadFile,
    pub mode: BatchMode,
}

impl BatchUploadJob {
    pub fn new(file: UploadFile, mode: BatchMode) -> Self {
        Self { file, mode }
    }
}

/// The CSV the service produced for a batch. Never inspected, only saved.
#[derive(Clone, PartialEq, Eq)]
pub struct BatchArtifact {
    contents: Vec<u8>,
}

impl std::fmt::Debug for BatchArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchArtifact")
            .field("file_name", &self.file_name())
            .field("size_bytes", &self.contents.len())
            .finish()
    }
}

impl BatchArtifact {
    pub fn new(contents: Vec<u8>) -> Self {
        Self { contents }
    }

    pub fn file_name(&self) -> &'static str {
        BATCH_RESULT_FILE_NAME
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Writes the artifact into `dir`, replacing any earlier copy.
    pub async fn save_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let destination = dir.join(self.file_name());
        tokio::fs::write(&destination, &self.contents).await?;
        Ok(destination)
    }
}
