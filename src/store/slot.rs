use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::backend::KeyValueBackend;
use crate::error::StorageError;

type Callback<T> = Arc<dyn Fn(Option<&T>) + Send + Sync>;

struct Subscribers<T> {
    next_id: u64,
    callbacks: BTreeMap<u64, Callback<T>>,
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            callbacks: BTreeMap::new(),
        }
    }
}

/// One named, JSON-encoded value in a [`KeyValueBackend`] that can be observed.
pub struct Slot<T> {
    key: &'static str,
    backend: Arc<dyn KeyValueBackend>,
    subscribers: Arc<Mutex<Subscribers<T>>>,
    _value: PhantomData<fn() -> T>,
}

impl<T> Slot<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    pub(crate) fn new(key: &'static str, backend: Arc<dyn KeyValueBackend>) -> Self {
        Self {
            key,
            backend,
            subscribers: Arc::new(Mutex::new(Subscribers::default())),
            _value: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Current value, or `None` if nothing was stored yet.
    ///
    /// Stored text that does not parse is returned as [`StorageError::Corrupt`].
    pub fn get(&self) -> Result<Option<T>, StorageError> {
        let raw = self
            .backend
            .get_item(self.key)
            .map_err(|source| StorageError::Backend {
                key: self.key.to_owned(),
                source,
            })?;
        let Some(raw) = raw else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(source) => {
                tracing::warn!(key = self.key, error = %source, "stored value is corrupt");
                Err(StorageError::Corrupt {
                    key: self.key.to_owned(),
                    raw,
                    source,
                })
            }
        }
    }

    /// Stores `value` and then notifies every subscriber before returning.
    pub fn set(&self, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: self.key.to_owned(),
            source,
        })?;
        self.backend
            .set_item(self.key, &raw)
            .map_err(|source| StorageError::Backend {
                key: self.key.to_owned(),
                source,
            })?;
        tracing::debug!(key = self.key, bytes = raw.len(), "stored value");

        // Callbacks run outside the lock so they may touch the slot again.
        let callbacks = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .callbacks
            .values()
            .cloned()
            .collect::<Vec<_>>();
        for callback in callbacks {
            callback(Some(value));
        }
        Ok(())
    }

    /// Calls `callback` now with the current value and again after every `set`.
    pub fn subscribe<F>(&self, callback: F) -> Result<Subscription, StorageError>
    where
        F: Fn(Option<&T>) + Send + Sync + 'static,
    {
        let current = self.get()?;
        let callback: Callback<T> = Arc::new(callback);

        let id = {
            let mut subscribers = self
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let id = subscribers.next_id;
            subscribers.next_id += 1;
            subscribers.callbacks.insert(id, Arc::clone(&callback));
            id
        };

        callback(current.as_ref());

        let subscribers: Weak<Mutex<Subscribers<T>>> = Arc::downgrade(&self.subscribers);
        Ok(Subscription {
            cancel: Some(Box::new(move || {
                if let Some(subscribers) = subscribers.upgrade() {
                    subscribers
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .callbacks
                        .remove(&id);
                }
            })),
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .callbacks
            .len()
    }
}

/// Handle returned by [`Slot::subscribe`]. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
