use crate::utils::LassoError;
use async_compression::tokio::bufread::{ZstdDecoder, ZstdEncoder};
use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tokio::{fs, io::AsyncReadExt};

pub(crate) const BINCODE_CONFIG: bincode::config::Configuration = bincode::config::standard()
    .with_little_endian()
    .with_variable_int_encoding();

/// Local persistence for problem data.
///
/// Values are stored one per id as bincode-encoded, zstd-compressed files
/// under a root directory, so large generated problems can be reused across
/// runs instead of being regenerated.
///
/// # Example
///
/// ```rust,no_run
/// # use lassopath_core::data::DatasetStore;
/// # use lassopath_core::problem::ProblemData;
/// # use std::path::Path;
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = DatasetStore::new(Path::new("data"), "lasso-");
/// let problem = ProblemData::synthetic(200, 100, 10, 42)?;
/// store.write("problem", &problem).await?;
/// let reloaded: ProblemData = store.read("problem").await?;
/// # Ok(())
/// # }
/// ```
pub struct DatasetStore {
    root: PathBuf,
    prefix: String,
}

impl DatasetStore {
    pub fn new(root: &Path, prefix: &str) -> Self {
        DatasetStore {
            root: root.to_path_buf(),
            prefix: prefix.to_string(),
        }
    }

    /// The on-disk path a given id maps to.
    pub fn file_path(&self, id: &str) -> PathBuf {
        self.root
            .join(format!("{}{}", self.prefix, id))
            .with_extension("bin.zst")
    }

    /// Serializes, compresses and writes a value under an id.
    pub async fn write<T: Serialize>(&self, id: &str, value: &T) -> Result<(), LassoError> {
        fs::create_dir_all(&self.root).await.map_err(|e| {
            LassoError::from_string(format!("Failed to create dataset directory: {}", e))
        })?;

        let bytes = bincode::serde::encode_to_vec(value, BINCODE_CONFIG)
            .map_err(|e| LassoError::from_string(format!("Failed to encode value: {}", e)))?;

        let mut encoder =
            ZstdEncoder::with_quality(&bytes[..], async_compression::Level::Precise(3));
        let mut buf = [0; 1024];
        let mut compressed = Vec::new();
        loop {
            let n = encoder.read(&mut buf).await.map_err(|e| {
                LassoError::from_string(format!("Failed to compress value: {}", e))
            })?;
            if n == 0 {
                break;
            }
            compressed.extend_from_slice(&buf[..n]);
        }

        let path = self.file_path(id);
        fs::write(&path, compressed)
            .await
            .map_err(|e| LassoError::from_string(format!("Failed to write {:?}: {}", path, e)))?;
        Ok(())
    }

    /// Reads, decompresses and deserializes the value stored under an id.
    pub async fn read<T: DeserializeOwned>(&self, id: &str) -> Result<T, LassoError> {
        let path = self.file_path(id);
        let bytes = fs::read(&path)
            .await
            .map_err(|e| LassoError::from_string(format!("Failed to read {:?}: {}", path, e)))?;

        let mut decoder = ZstdDecoder::new(&bytes[..]);
        let mut decompressed = Vec::new();
        let mut buf = [0; 1024];
        loop {
            let n = decoder.read(&mut buf).await.map_err(|e| {
                LassoError::from_string(format!("Failed to decompress value: {}", e))
            })?;
            if n == 0 {
                break;
            }
            decompressed.extend_from_slice(&buf[..n]);
        }

        let (value, _): (T, _) = bincode::serde::decode_from_slice(&decompressed, BINCODE_CONFIG)
            .map_err(|e| LassoError::from_string(format!("Failed to decode value: {}", e)))?;
        Ok(value)
    }
}
