use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Serialize, de::DeserializeOwned};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{AppError, AppResult};

/// Durable string-to-string storage. Every logical entity lives under exactly one key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;
    fn keys(&self) -> AppResult<Vec<String>>;
}

#[derive(Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> AppResult<Vec<String>> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }
}

/// One JSON file per key inside a directory.
///
/// File names are the URL-safe base64 of the key, so staff names containing path
/// separators or other awkward characters map to valid file names.
pub struct FileStore {
    dir: PathBuf,
}

const FILE_SUFFIX: &str = ".json";
// common filesystem limit for a single path component
const MAX_FILE_NAME_BYTES: usize = 255;

impl FileStore {
    pub fn open(dir: impl AsRef<Path>) -> AppResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `key`, or `None` when the encoded key cannot be a file name.
    fn path_for(&self, key: &str) -> Option<PathBuf> {
        let file_name = format!("{}{}", URL_SAFE_NO_PAD.encode(key), FILE_SUFFIX);
        (file_name.len() <= MAX_FILE_NAME_BYTES).then(|| self.dir.join(file_name))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        // an unstorable key was never written
        let Some(path) = self.path_for(key) else {
            return Ok(None);
        };
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let path = self.path_for(key).ok_or_else(|| {
            io::Error::new(
                ErrorKind::InvalidInput,
                format!("key is too long to store: {} bytes", key.len()),
            )
        })?;
        let tmp = path.with_extension("tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        // rename is atomic on the same filesystem
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let Some(path) = self.path_for(key) else {
            return Ok(());
        };
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }

    fn keys(&self) -> AppResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let file_name = entry?.file_name();
            let Some(encoded) = file_name
                .to_str()
                .and_then(|name| name.strip_suffix(FILE_SUFFIX))
            else {
                continue;
            };
            match URL_SAFE_NO_PAD
                .decode(encoded)
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok())
            {
                Some(key) => keys.push(key),
                None => log::warn!("Ignoring unrecognised file in data dir: {}", encoded),
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Session-scoped handle to the backing store, shared by every repository.
#[derive(Clone)]
pub struct Store {
    backend: Rc<dyn KeyValueStore>,
}

impl Store {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Rc::new(backend),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    pub fn get_raw(&self, key: &str) -> AppResult<Option<String>> {
        self.backend.get(key)
    }

    pub fn set_raw(&self, key: &str, value: &str) -> AppResult<()> {
        log::debug!("store set {} ({} bytes)", key, value.len());
        self.backend.set(key, value)
    }

    pub fn remove(&self, key: &str) -> AppResult<()> {
        log::debug!("store remove {}", key);
        self.backend.remove(key)
    }

    pub fn keys(&self) -> AppResult<Vec<String>> {
        self.backend.keys()
    }

    /// Load and validate a typed record. Malformed data fails closed with `CorruptRecord`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        match self.backend.get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| AppError::corrupt_record(key, e)),
            None => Ok(None),
        }
    }

    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> AppResult<T> {
        Ok(self.load(key)?.unwrap_or_default())
    }

    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AppResult<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json)
    }
}
