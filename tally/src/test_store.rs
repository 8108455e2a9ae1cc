// In-memory stand-in for the backing store, test use only.

use crate::ports::KeyValueStore;
use async_trait::async_trait;
use shared::Result;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub(crate) struct MemoryStore {
    values: Mutex<HashMap<String, Vec<u8>>>,
    lists: Mutex<HashMap<String, Vec<Vec<u8>>>>,
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.values.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut values = self.values.lock().unwrap();
        let next = match values.get(key) {
            Some(raw) => {
                std::str::from_utf8(raw)
                    .expect("counter is utf-8")
                    .parse::<i64>()
                    .expect("counter is numeric")
                    + 1
            }
            None => 1,
        };
        values.insert(key.to_string(), next.to_string().into_bytes());
        Ok(next)
    }

    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.lists
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .push(value);
        Ok(())
    }

    async fn lrange(&self, key: &str) -> Result<Vec<Vec<u8>>> {
        Ok(self
            .lists
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or_default())
    }

    async fn flush_db(&self) -> Result<()> {
        self.values.lock().unwrap().clear();
        self.lists.lock().unwrap().clear();
        Ok(())
    }
}
