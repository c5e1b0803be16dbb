use std::{
    path::{Path, PathBuf},
    time::SystemTime,
};

use eyre::Result;
use futures::Future;
use lazy_static::lazy_static;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info};

lazy_static! {
    pub static ref CACHE_DIR: Option<PathBuf> = {
        let path = std::env::var_os("BDIFF_CACHE_DIR")
            .map(PathBuf::from)
            .or_else(|| dirs::cache_dir().map(|dir| dir.join("builddiff")));
        info!(?path, "using cache path");
        path
    };
}

#[derive(Serialize, Deserialize)]
struct CacheValue<V> {
    value: V,
    timestamp: SystemTime,
}

/// Key of a cached value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey(String);

impl CacheKey {
    /// Console output of a build on a given server. Parts are separated by NUL, which can't occur
    /// in a url or job name.
    pub fn console_text(server: &str, job: &str, number: u64) -> Self {
        Self(format!("console_text\0{}\0{}\0{}", server, job, number))
    }
}

impl AsRef<[u8]> for CacheKey {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// On-disk store of values that never change once fetched, like the console output of a
/// finished build.
#[derive(Debug, Clone)]
pub struct Cache {
    path: PathBuf,
}

impl Cache {
    pub fn at(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn default_location() -> Result<Self> {
        CACHE_DIR
            .as_deref()
            .map(Cache::at)
            .ok_or_else(|| eyre::eyre!("Could not find cache directory"))
    }

    // The db needs to be opened in call to allow multiple processes
    fn open_db(&self) -> Result<sled::Db> {
        let db = sled::Config::new()
            .path(&self.path)
            .use_compression(true)
            .open()?;
        Ok(db)
    }

    pub fn put<V: Serialize>(&self, key: &CacheKey, value: &V) -> Result<()> {
        let db = self.open_db()?;
        let value = CacheValue {
            value,
            timestamp: SystemTime::now(),
        };
        let bytes = serde_json::to_vec(&value)?;
        db.insert(key, bytes)?;
        debug!(?key, "cache key set");
        db.flush()?;
        Ok(())
    }

    pub fn get<V: DeserializeOwned>(&self, key: &CacheKey) -> Result<Option<V>> {
        let db = self.open_db()?;
        let value = match db.get(key)? {
            Some(bytes) => {
                let value: CacheValue<V> = serde_json::from_slice(&bytes)?;
                debug!(?key, stored_at = ?value.timestamp, "found cached key");
                Some(value.value)
            }
            None => None,
        };
        Ok(value)
    }

    pub async fn memoize<F, Fut, V>(&self, key: &CacheKey, f: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
        V: Serialize + DeserializeOwned,
    {
        match self.get(key)? {
            Some(cached) => Ok(cached),
            None => {
                debug!(?key, "key not found in cache");
                let value = f().await?;
                self.put(key, &value)?;
                Ok(value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_memoize_calls_function_once() {
        let dir = TempDir::new().unwrap();
        let cache = Cache::at(dir.path());
        let key = CacheKey::console_text("https://ci.example.com", "selenium", 1);

        let first: String = cache
            .memoize(&key, || async { Ok::<_, eyre::Report>("log".to_string()) })
            .await
            .unwrap();
        let second: String = cache
            .memoize(&key, || async { Err::<String, _>(eyre::eyre!("should be cached")) })
            .await
            .unwrap();

        assert_eq!(first, "log");
        assert_eq!(second, "log");
    }

    #[tokio::test]
    async fn test_memoize_does_not_store_errors() {
        let dir = TempDir::new().unwrap();
        let cache = Cache::at(dir.path());
        let key = CacheKey::console_text("https://ci.example.com", "selenium", 2);

        let result: Result<String> = cache
            .memoize(&key, || async { Err::<String, _>(eyre::eyre!("server down")) })
            .await;

        assert!(result.is_err());
        assert_eq!(cache.get::<String>(&key).unwrap(), None);
    }

    #[test]
    fn test_keys_differ_per_server_job_and_build() {
        let key = CacheKey::console_text("a", "job", 1);
        assert_ne!(key, CacheKey::console_text("b", "job", 1));
        assert_ne!(key, CacheKey::console_text("a", "other", 1));
        assert_ne!(key, CacheKey::console_text("a", "job", 2));
    }

    #[test]
    fn test_keys_differ_when_parts_contain_underscores() {
        assert_ne!(
            CacheKey::console_text("http://ci_a", "b", 1),
            CacheKey::console_text("http://ci", "a_b", 1)
        );
        assert_ne!(
            CacheKey::console_text("http://ci", "job_1", 2),
            CacheKey::console_text("http://ci", "job", 12)
        );
    }
}
