//! Export artifacts and where they go.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::{Error, Result};

/// Content of an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Bytes(Vec<u8>),
    /// A `data:` URL, as produced by a rasterizer.
    DataUrl(String),
}

/// One downloadable file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub mime: String,
    pub payload: Payload,
}

impl Artifact {
    /// A text artifact.
    pub fn text(filename: &str, mime: &str, content: String) -> Self {
        Self {
            filename: filename.to_string(),
            mime: mime.to_string(),
            payload: Payload::Bytes(content.into_bytes()),
        }
    }

    /// An artifact whose content is already a data URL.
    pub fn data_url(filename: &str, mime: &str, url: String) -> Self {
        Self {
            filename: filename.to_string(),
            mime: mime.to_string(),
            payload: Payload::DataUrl(url),
        }
    }

    /// Raw bytes of the artifact, decoding data URLs.
    pub fn bytes(&self) -> Result<Cow<'_, [u8]>> {
        match &self.payload {
            Payload::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
            Payload::DataUrl(url) => decode_data_url(url).map(Cow::Owned),
        }
    }
}

/// Encode bytes as a base64 `data:` URL.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Decode a `data:` URL. Only base64 payloads are accepted.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| Error::DataUrl("missing data: scheme".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::DataUrl("missing payload separator".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(Error::DataUrl(format!("unsupported encoding: {header}")));
    }
    Ok(STANDARD.decode(payload)?)
}

/// Receives finished artifacts (the "download" step).
pub trait Delivery {
    fn deliver(&mut self, artifact: Artifact) -> Result<()>;
}

/// Collects artifacts in memory.
#[derive(Debug, Default)]
pub struct MemoryDelivery {
    artifacts: Vec<Artifact>,
}

impl MemoryDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn filenames(&self) -> Vec<&str> {
        self.artifacts.iter().map(|a| a.filename.as_str()).collect()
    }

    /// Content of a delivered text artifact.
    pub fn text(&self, filename: &str) -> Option<String> {
        let artifact = self.artifacts.iter().find(|a| a.filename == filename)?;
        let bytes = artifact.bytes().ok()?;
        String::from_utf8(bytes.into_owned()).ok()
    }
}

impl Delivery for MemoryDelivery {
    fn deliver(&mut self, artifact: Artifact) -> Result<()> {
        self.artifacts.push(artifact);
        Ok(())
    }
}

/// Writes artifacts as files into a directory, creating it on first use.
#[derive(Debug)]
pub struct DirectoryDelivery {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectoryDelivery {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, in delivery order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl Delivery for DirectoryDelivery {
    fn deliver(&mut self, artifact: Artifact) -> Result<()> {
        // Only the final path component is honored.
        let name = Path::new(&artifact.filename)
            .file_name()
            .ok_or_else(|| Error::Io(std::io::Error::other("artifact has no file name")))?;
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        fs::write(&path, artifact.bytes()?)?;
        tracing::debug!(path = %path.display(), "wrote artifact");
        self.written.push(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_roundtrip() {
        let url = data_url("image/png", b"\x89PNG");
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(decode_data_url(&url).unwrap(), b"\x89PNG");
    }

    #[test]
    fn test_malformed_data_urls() {
        assert!(matches!(decode_data_url("http://x"), Err(Error::DataUrl(_))));
        assert!(matches!(decode_data_url("data:text/plain,hi"), Err(Error::DataUrl(_))));
        assert!(matches!(
            decode_data_url("data:image/png;base64,***"),
            Err(Error::Base64(_))
        ));
    }

    #[test]
    fn test_memory_delivery() {
        let mut delivery = MemoryDelivery::new();
        delivery
            .deliver(Artifact::text("a.txt", "text/plain", "hello".to_string()))
            .unwrap();
        assert_eq!(delivery.filenames(), vec!["a.txt"]);
        assert_eq!(delivery.text("a.txt").as_deref(), Some("hello"));
        assert_eq!(delivery.text("b.txt"), None);
    }

    #[test]
    fn test_directory_delivery_decodes_images() {
        let dir = tempfile::tempdir().unwrap();
        let mut delivery = DirectoryDelivery::new(dir.path().join("out"));
        delivery
            .deliver(Artifact::data_url(
                "../page.png",
                "image/png",
                data_url("image/png", &[1, 2, 3]),
            ))
            .unwrap();

        let path = dir.path().join("out").join("page.png");
        assert_eq!(delivery.written(), &[path.clone()]);
        assert_eq!(fs::read(path).unwrap(), vec![1, 2, 3]);
    }
}
