use crate::error::Result;
use crate::store::Section;

// -----------------------------------------------------------------------------
// Backend

/// Where a document lives between loads.
///
/// A backend only moves whole documents; it never interprets them.
pub trait Backend {
    /// Reads the stored document. A backend with nothing stored yet returns
    /// an empty section.
    fn read(&mut self) -> Result<Section>;

    fn write(&mut self, document: &Section) -> Result<()>;
}

// -----------------------------------------------------------------------------
// MemoryBackend

/// Keeps the last written document in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    stored: Option<Section>,
}

impl MemoryBackend {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose first read returns `document`.
    #[inline]
    pub fn with_document(document: Section) -> Self {
        Self {
            stored: Some(document),
        }
    }

    /// The last written document, if any.
    #[inline]
    pub fn stored(&self) -> Option<&Section> {
        self.stored.as_ref()
    }
}

impl Backend for MemoryBackend {
    fn read(&mut self) -> Result<Section> {
        Ok(self.stored.clone().unwrap_or_default())
    }

    fn write(&mut self, document: &Section) -> Result<()> {
        self.stored = Some(document.clone());
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// YamlFileBackend

#[cfg(feature = "yaml")]
pub use yaml::YamlFileBackend;

#[cfg(feature = "yaml")]
mod yaml {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::Backend;
    use crate::error::{ConfigError, Result};
    use crate::store::Section;

    /// Persists the document as a YAML file.
    ///
    /// A missing or empty file reads as an empty document. Parent directories
    /// are created on write.
    #[derive(Debug, Clone)]
    pub struct YamlFileBackend {
        path: PathBuf,
    }

    impl YamlFileBackend {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        #[inline]
        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl Backend for YamlFileBackend {
        fn read(&mut self) -> Result<Section> {
            let text = match fs::read_to_string(&self.path) {
                Ok(text) => text,
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    log::debug!("`{}` does not exist yet, starting empty", self.path.display());
                    return Ok(Section::new());
                }
                Err(err) => return Err(ConfigError::backend(err)),
            };
            if text.trim().is_empty() {
                return Ok(Section::new());
            }
            serde_yaml::from_str(&text).map_err(ConfigError::backend)
        }

        fn write(&mut self, document: &Section) -> Result<()> {
            let text = serde_yaml::to_string(document).map_err(ConfigError::backend)?;
            if let Some(parent) = self.path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent).map_err(ConfigError::backend)?;
            }
            fs::write(&self.path, text).map_err(ConfigError::backend)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Backend, MemoryBackend};
    use crate::store::Section;

    #[test]
    fn memory_starts_empty() {
        let mut backend = MemoryBackend::new();
        assert!(backend.read().unwrap().is_empty());

        let doc = Section::new().with("a", 1_i64);
        backend.write(&doc).unwrap();
        assert_eq!(backend.read().unwrap(), doc);
        assert_eq!(backend.stored(), Some(&doc));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn yaml_file_round_trip() {
        use super::YamlFileBackend;
        use crate::store::ListSection;

        let dir = tempfile::tempdir().unwrap();
        let mut backend = YamlFileBackend::new(dir.path().join("nested/app.yml"));
        assert!(backend.read().unwrap().is_empty());

        let doc = Section::new()
            .with("title", "demo")
            .with("limits", Section::new().with("max", 10_i64))
            .with("hosts", ListSection::new().with("a").with("b"));
        backend.write(&doc).unwrap();

        let text = std::fs::read_to_string(backend.path()).unwrap();
        assert!(text.starts_with("title: demo"));
        assert_eq!(backend.read().unwrap(), doc);
    }
}
