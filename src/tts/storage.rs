//! Local storage for synthesized audio.
//!
//! File names derive from the card's text, so re-running the same vocabulary
//! overwrites the same files. Nothing is ever cleaned up.

use crate::defaults;
use crate::error::Result;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tokio::io::AsyncWriteExt;

#[allow(clippy::expect_used)]
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("non-word pattern is valid"));

/// Replaces every run of non-word characters with a single `_`.
///
/// Word characters are Unicode letters, digits and `_`, so Cyrillic text is
/// kept as is. Applying it twice changes nothing.
pub fn sanitize_stem(text: &str) -> String {
    NON_WORD.replace_all(text, "_").into_owned()
}

/// Directory of mp3 artifacts.
#[derive(Debug, Clone)]
pub struct AudioStore {
    dir: PathBuf,
}

impl AudioStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the directory if needed. Called once at startup.
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// File name an artifact for `text` is stored under.
    pub fn file_name(text: &str) -> String {
        format!("{}.{}", sanitize_stem(text), defaults::AUDIO_EXTENSION)
    }

    /// Full path an artifact for `text` is stored under.
    pub fn path_for(&self, text: &str) -> PathBuf {
        self.dir.join(Self::file_name(text))
    }

    /// Writes `audio` for `text` and syncs it to disk.
    ///
    /// An existing file with the same name is replaced.
    pub async fn save(&self, text: &str, audio: &[u8]) -> Result<PathBuf> {
        let path = self.path_for(text);
        let mut file = tokio::fs::File::create(&path).await?;
        file.write_all(audio).await?;
        file.sync_all().await?;
        Ok(path)
    }
}
