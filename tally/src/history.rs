use crate::ports::KeyValueStore;
use shared::{Error, Result};
use std::future::Future;
use std::sync::Arc;

/// Call bookkeeping for one instrumented operation.
///
/// Owns the operation-name-to-key mapping: the call counter lives under
/// the operation name itself, the input and output logs under
/// `<name>:inputs` and `<name>:outputs`. The logs are parallel sequences
/// across completed calls; a failed call leaves an input entry with no
/// matching output entry.
pub struct CallLog {
    kv: Arc<dyn KeyValueStore>,
    operation: String,
}

impl CallLog {
    pub fn new(kv: Arc<dyn KeyValueStore>, operation: impl Into<String>) -> Self {
        Self {
            kv,
            operation: operation.into(),
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn counter_key(&self) -> &str {
        &self.operation
    }

    pub fn input_key(&self) -> String {
        format!("{}:inputs", self.operation)
    }

    pub fn output_key(&self) -> String {
        format!("{}:outputs", self.operation)
    }

    /// Run `delegate` with call bookkeeping: bump the call counter, log
    /// the raw input, then log the returned bytes once the delegate
    /// completes. The delegate is not polled until the input is logged,
    /// and its error, if any, propagates untouched.
    pub async fn wrap<Fut>(&self, input: &[u8], delegate: Fut) -> Result<Vec<u8>>
    where
        Fut: Future<Output = Result<Vec<u8>>>,
    {
        self.kv.incr(self.counter_key()).await?;
        self.kv.rpush(&self.input_key(), input.to_vec()).await?;
        let output = delegate.await?;
        self.kv.rpush(&self.output_key(), output.clone()).await?;
        Ok(output)
    }

    /// How many times the operation was invoked. Zero when never called.
    pub async fn calls(&self) -> Result<u64> {
        match self.kv.get(self.counter_key()).await? {
            Some(raw) => parse_counter(&raw),
            None => Ok(0),
        }
    }

    /// The recorded `(input, output)` pairs, oldest call first.
    pub async fn history(&self) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let inputs = self.kv.lrange(&self.input_key()).await?;
        let outputs = self.kv.lrange(&self.output_key()).await?;
        Ok(inputs.into_iter().zip(outputs).collect())
    }
}

fn parse_counter(raw: &[u8]) -> Result<u64> {
    std::str::from_utf8(raw)
        .map_err(|e| Error::Decode(e.to_string()))?
        .parse::<u64>()
        .map_err(|e| Error::Decode(e.to_string()))
}
