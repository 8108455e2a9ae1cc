use crate::history::CallLog;
use crate::ports::KeyValueStore;
use crate::value::Value;
use shared::{Error, Result};
use std::sync::Arc;
use uuid::Uuid;

/// Cache front-end over an injected key-value store handle.
///
/// `store` is instrumented: every call bumps a counter and appends to the
/// input/output history, both kept in the backing store itself.
pub struct Cache {
    kv: Arc<dyn KeyValueStore>,
    store_log: CallLog,
}

impl Cache {
    /// Fully-qualified name of the instrumented store operation; also the
    /// counter key and the prefix of the history log keys.
    pub const STORE_OP: &str = "cache.store";

    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        let store_log = CallLog::new(kv.clone(), Self::STORE_OP);
        Self { kv, store_log }
    }

    /// Call log of the `store` operation, for counters and replay.
    pub fn store_log(&self) -> &CallLog {
        &self.store_log
    }

    /// Write `value` under a fresh random key and return the key.
    pub async fn store(&self, value: impl Into<Value>) -> Result<String> {
        let payload = value.into().into_bytes();
        let key = Uuid::new_v4().to_string();
        self.store_log
            .wrap(&payload, async {
                self.kv.set(&key, payload.clone()).await?;
                Ok(key.clone().into_bytes())
            })
            .await?;
        Ok(key)
    }

    /// Read the raw bytes stored under `key`. Absent keys are `None`.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.kv.get(key).await
    }

    /// Read `key`, converting a present value with `convert`.
    pub async fn get_with<T>(
        &self,
        key: &str,
        convert: impl FnOnce(Vec<u8>) -> Result<T>,
    ) -> Result<Option<T>> {
        match self.kv.get(key).await? {
            Some(raw) => Ok(Some(convert(raw)?)),
            None => Ok(None),
        }
    }

    /// Read `key` as UTF-8 text.
    pub async fn get_str(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, |raw| {
            String::from_utf8(raw).map_err(|e| Error::Decode(e.to_string()))
        })
        .await
    }

    /// Read `key` as a decimal integer.
    pub async fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_with(key, |raw| {
            std::str::from_utf8(&raw)
                .map_err(|e| Error::Decode(e.to_string()))?
                .parse::<i64>()
                .map_err(|e| Error::Decode(e.to_string()))
        })
        .await
    }
}
