use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::PathBuf;

use crate::error::AssetError;

/// Where model, label and advisory assets come from.
///
/// The core never assumes a storage medium; anything that can hand out a
/// byte stream per name works.
pub trait AssetProvider: Send + Sync {
    fn open(&self, name: &str) -> Result<Box<dyn Read + Send + '_>, AssetError>;

    /// Reads a whole asset into memory.
    fn read_all(&self, name: &str) -> Result<Vec<u8>, AssetError> {
        let mut reader = self.open(name)?;
        let mut buf = Vec::new();
        reader
            .read_to_end(&mut buf)
            .map_err(|source| AssetError::Io { name: name.to_owned(), source })?;
        Ok(buf)
    }
}

/// Rejects names that could escape the asset root.
fn check_name(name: &str) -> Result<(), AssetError> {
    if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(AssetError::InvalidName(name.to_owned()));
    }
    Ok(())
}

/// Flat directory of asset files.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirAssets { root: root.into() }
    }
}

impl AssetProvider for DirAssets {
    fn open(&self, name: &str) -> Result<Box<dyn Read + Send + '_>, AssetError> {
        check_name(name)?;
        let path = self.root.join(name);
        match File::open(&path) {
            Ok(f) => Ok(Box::new(BufReader::new(f))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AssetError::NotFound(name.to_owned()))
            }
            Err(source) => Err(AssetError::Io { name: name.to_owned(), source }),
        }
    }
}

/// In-memory assets, e.g. bundled with `include_bytes!`.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        MemoryAssets::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> &mut Self {
        self.files.insert(name.into(), bytes.into());
        self
    }

    pub fn with(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(name, bytes);
        self
    }
}

impl AssetProvider for MemoryAssets {
    fn open(&self, name: &str) -> Result<Box<dyn Read + Send + '_>, AssetError> {
        check_name(name)?;
        self.files
            .get(name)
            .map(|bytes| Box::new(Cursor::new(bytes.as_slice())) as Box<dyn Read + Send + '_>)
            .ok_or_else(|| AssetError::NotFound(name.to_owned()))
    }
}
