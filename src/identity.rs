//! Pseudo-anonymous visitor identity.
//!
//! The id is loaded (or created) once and then passed explicitly to
//! whatever needs it. It scopes favorites only; anyone can forge or clear it.

use rand::Rng;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

use crate::domain::value_objects::UserId;

pub const USER_ID_KEY: &str = "bambugoods-user-id";
const USER_ID_PREFIX: &str = "user_";
const RANDOM_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid stored id: {0}")]
    Invalid(String),
}

/// Minimal persistent key/value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, IdentityError>;
    fn set(&self, key: &str, value: &str) -> Result<(), IdentityError>;
    fn remove(&self, key: &str) -> Result<(), IdentityError>;
}

/// Returns the stored visitor id, creating and persisting one when absent.
pub fn load_or_create(store: &dyn KeyValueStore) -> Result<UserId, IdentityError> {
    if let Some(existing) = store.get(USER_ID_KEY)? {
        match UserId::new(existing.as_str()) {
            Ok(id) => return Ok(id),
            Err(e) => tracing::warn!("discarding stored visitor id {:?}: {}", existing, e),
        }
    }
    let id = generate_user_id();
    store.set(USER_ID_KEY, &id)?;
    tracing::info!("created visitor id {}", id);
    UserId::new(id).map_err(|e| IdentityError::Invalid(e.to_string()))
}

/// `user_` + 9 random base-36 chars + `_` + Unix millis.
pub fn generate_user_id() -> String {
    let mut rng = rand::thread_rng();
    let fragment: String = (0..RANDOM_LEN).map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char).collect();
    format!("{USER_ID_PREFIX}{fragment}_{}", chrono::Utc::now().timestamp_millis())
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    pub fn clear(&self) -> Result<(), IdentityError> {
        self.lock()?.clear();
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, IdentityError> {
        self.values.lock().map_err(|e| IdentityError::Storage(e.to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, IdentityError> { Ok(self.lock()?.get(key).cloned()) }
    fn set(&self, key: &str, value: &str) -> Result<(), IdentityError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
    fn remove(&self, key: &str) -> Result<(), IdentityError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// JSON object persisted at `{dir}/storage.json`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { path: dir.as_ref().join("storage.json"), guard: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path { &self.path }

    fn read(&self) -> Result<HashMap<String, String>, IdentityError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| IdentityError::Storage(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(IdentityError::Storage(e.to_string())),
        }
    }

    fn write(&self, values: &HashMap<String, String>) -> Result<(), IdentityError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| IdentityError::Storage(e.to_string()))?;
        }
        let raw = serde_json::to_string_pretty(values).map_err(|e| IdentityError::Storage(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| IdentityError::Storage(e.to_string()))
    }

    fn update(&self, f: impl FnOnce(&mut HashMap<String, String>)) -> Result<(), IdentityError> {
        let _guard = self.guard.lock().map_err(|e| IdentityError::Storage(e.to_string()))?;
        let mut values = self.read()?;
        f(&mut values);
        self.write(&values)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, IdentityError> { Ok(self.read()?.remove(key)) }
    fn set(&self, key: &str, value: &str) -> Result<(), IdentityError> {
        self.update(|values| { values.insert(key.to_string(), value.to_string()); })
    }
    fn remove(&self, key: &str) -> Result<(), IdentityError> {
        self.update(|values| { values.remove(key); })
    }
}

/// Request-scoped view over the visitor's `Cookie` header. Values set here
/// are collected as pending `Set-Cookie` headers for the response.
#[derive(Debug, Default)]
pub struct CookieStore {
    values: Mutex<HashMap<String, String>>,
    pending: Mutex<Vec<(String, String)>>,
}

impl CookieStore {
    pub fn from_header(header: Option<&str>) -> Self {
        let values = header
            .unwrap_or_default()
            .split(';')
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .filter(|(k, _)| !k.is_empty())
            .collect();
        Self { values: Mutex::new(values), pending: Mutex::new(vec![]) }
    }

    /// `Set-Cookie` values for everything written during the request.
    pub fn set_cookie_headers(&self) -> Vec<String> {
        let pending = match self.pending.lock() {
            Ok(p) => p.clone(),
            Err(_) => return vec![],
        };
        pending
            .into_iter()
            .map(|(k, v)| {
                if v.is_empty() {
                    format!("{k}=; Path=/; Max-Age=0; SameSite=Lax")
                } else {
                    format!("{k}={v}; Path=/; Max-Age=31536000; SameSite=Lax")
                }
            })
            .collect()
    }

    fn record(&self, key: &str, value: &str) -> Result<(), IdentityError> {
        self.pending.lock().map_err(|e| IdentityError::Storage(e.to_string()))?.push((key.to_string(), value.to_string()));
        Ok(())
    }
}

impl KeyValueStore for CookieStore {
    fn get(&self, key: &str) -> Result<Option<String>, IdentityError> {
        Ok(self.values.lock().map_err(|e| IdentityError::Storage(e.to_string()))?.get(key).cloned())
    }
    fn set(&self, key: &str, value: &str) -> Result<(), IdentityError> {
        self.values.lock().map_err(|e| IdentityError::Storage(e.to_string()))?.insert(key.to_string(), value.to_string());
        self.record(key, value)
    }
    fn remove(&self, key: &str) -> Result<(), IdentityError> {
        self.values.lock().map_err(|e| IdentityError::Storage(e.to_string()))?.remove(key);
        self.record(key, "")
    }
}
