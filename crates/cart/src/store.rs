//! Persisted cart ID slot.
//!
//! A single string survives restarts under [`CART_ID_KEY`]. The slot is not
//! synchronized across processes; two sessions initializing at once can each
//! create a cart and the last write wins.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use harbor_core::CartId;

use crate::error::StoreError;

/// Key the cart ID is stored under.
pub const CART_ID_KEY: &str = "shopify_cart_id";

/// Storage for the current session's cart ID.
pub trait CartIdStore: Send + Sync {
    /// Read the persisted cart ID, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn load(&self) -> Result<Option<CartId>, StoreError>;

    /// Persist `id`, replacing whatever was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn save(&self, id: &CartId) -> Result<(), StoreError>;

    /// Forget the persisted cart ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn clear(&self) -> Result<(), StoreError>;
}

/// In-process store, mostly for tests.
#[derive(Debug, Default)]
pub struct MemoryCartIdStore {
    slot: Mutex<Option<CartId>>,
}

impl MemoryCartIdStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `id` already persisted.
    #[must_use]
    pub fn with_id(id: CartId) -> Self {
        Self {
            slot: Mutex::new(Some(id)),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<CartId>> {
        // A panic while holding the lock cannot leave a half-written ID.
        self.slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl CartIdStore for MemoryCartIdStore {
    fn load(&self) -> Result<Option<CartId>, StoreError> {
        Ok(self.slot().clone())
    }

    fn save(&self, id: &CartId) -> Result<(), StoreError> {
        *self.slot() = Some(id.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot() = None;
        Ok(())
    }
}

/// JSON file of string keys to string values, like a browser's local storage.
///
/// Other keys in the file are preserved. Writes go to a sibling temp file
/// first and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileCartIdStore {
    path: PathBuf,
}

impl FileCartIdStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, serde_json::to_vec_pretty(map)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl CartIdStore for FileCartIdStore {
    fn load(&self) -> Result<Option<CartId>, StoreError> {
        Ok(self
            .read_map()?
            .remove(CART_ID_KEY)
            .filter(|id| !id.is_empty())
            .map(CartId::new))
    }

    fn save(&self, id: &CartId) -> Result<(), StoreError> {
        let mut map = self.read_map()?;
        map.insert(CART_ID_KEY.to_string(), id.as_str().to_string());
        self.write_map(&map)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut map = self.read_map()?;
        if map.remove(CART_ID_KEY).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}
