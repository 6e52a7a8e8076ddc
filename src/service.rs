//! Shared vault access.
//!
//! Wraps a [`Vault`] in a mutex so every operation runs to completion before the
//! next starts. A nested call from the thread already inside an operation (for
//! example a collaborator calling back into the vault) is refused with
//! [`VaultError::Reentrant`] instead of deadlocking. Calls from other threads wait.

use crate::engine::{Externals, Vault};
use crate::error::{VaultError, VaultResult};
use std::sync::{Mutex, PoisonError};
use std::thread::{self, ThreadId};

pub struct SharedVault<E: Externals> {
    inner: Mutex<Vault<E>>,
    // thread currently inside an operation
    owner: Mutex<Option<ThreadId>>,
}

// clears the owner slot even if the operation panics
struct EntryGuard<'a> {
    owner: &'a Mutex<Option<ThreadId>>,
}

impl Drop for EntryGuard<'_> {
    fn drop(&mut self) {
        *self.owner.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl<E: Externals> SharedVault<E> {
    pub fn new(vault: Vault<E>) -> Self {
        Self {
            inner: Mutex::new(vault),
            owner: Mutex::new(None),
        }
    }

    /// Runs `op` with exclusive access to the vault.
    pub fn with<T>(&self, op: impl FnOnce(&mut Vault<E>) -> VaultResult<T>) -> VaultResult<T> {
        let me = thread::current().id();
        if *self.owner.lock().unwrap_or_else(PoisonError::into_inner) == Some(me) {
            tracing::warn!("nested vault entry refused");
            return Err(VaultError::Reentrant);
        }

        let mut vault = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        *self.owner.lock().unwrap_or_else(PoisonError::into_inner) = Some(me);
        let _guard = EntryGuard { owner: &self.owner };
        op(&mut vault)
    }

    /// Read-only access. Still serialised with writers.
    pub fn read<T>(&self, view: impl FnOnce(&Vault<E>) -> T) -> VaultResult<T> {
        self.with(|vault| Ok(view(vault)))
    }

    pub fn into_inner(self) -> Vault<E> {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
