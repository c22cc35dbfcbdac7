//! # Application State
//!
//! The vault: current versions of every live record, each with the chain
//! of versions it superseded. A transition is validated and committed
//! inside one write-locked closure on the record's entry, so two requests
//! can never both consume the same version.
//!
//! In-memory only; restarting the service empties the vault.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use stateset_contracts::{
    Account, Agreement, ContractSet, RecordLookup, RecordSchema, SignerDirectory,
};
use stateset_core::{record_digest, CoreError, LinearId, Party, PartyKey, RecordDigest, Timestamp};

use crate::config::AppConfig;

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// The lock is `parking_lot` and is never held across `.await`.
#[derive(Debug)]
pub struct Store<K, T> {
    data: Arc<RwLock<HashMap<K, T>>>,
}

impl<K, T> Clone for Store<K, T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<K: Eq + Hash + Clone, T: Clone> Store<K, T> {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert or replace.
    pub fn insert(&self, key: K, value: T) -> Option<T> {
        self.data.write().insert(key, value)
    }

    /// Insert only if `key` is vacant. Returns `false` if it was taken.
    pub fn insert_new(&self, key: K, value: T) -> bool {
        let mut guard = self.data.write();
        if guard.contains_key(&key) {
            return false;
        }
        guard.insert(key, value);
        true
    }

    pub fn get(&self, key: &K) -> Option<T> {
        self.data.read().get(key).cloned()
    }

    pub fn list(&self) -> Vec<T> {
        self.data.read().values().cloned().collect()
    }

    /// Snapshot of all key-value pairs, in no particular order.
    pub fn entries(&self) -> Vec<(K, T)> {
        self.data
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Atomically read-validate-update an entry.
    ///
    /// Returns `None` if the key is absent, otherwise the closure's result.
    /// The write lock is held for the whole closure.
    pub fn try_update<R, E>(
        &self,
        key: &K,
        f: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Option<Result<R, E>> {
        self.data.write().get_mut(key).map(f)
    }

    /// Atomically validate-then-remove an entry.
    ///
    /// The entry is removed only if the closure returns `Ok`.
    pub fn try_remove<R, E>(
        &self,
        key: &K,
        f: impl FnOnce(&T) -> Result<R, E>,
    ) -> Option<Result<(T, R), E>> {
        let mut guard = self.data.write();
        match f(guard.get(key)?) {
            Ok(r) => guard.remove(key).map(|removed| Ok((removed, r))),
            Err(e) => Some(Err(e)),
        }
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Eq + Hash + Clone, T: Clone> Default for Store<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Versioned Records ---------------------------------------------------------

/// A version that was consumed by a later transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumedVersion<R> {
    pub record: R,
    pub digest: RecordDigest,
    /// Command name of the transition that consumed it.
    pub consumed_by: String,
    pub consumed_at: Timestamp,
}

/// The live version of a record plus its consumed predecessors, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Versioned<R> {
    pub current: R,
    pub digest: RecordDigest,
    pub committed_at: Timestamp,
    pub history: Vec<ConsumedVersion<R>>,
}

impl<R: RecordSchema> Versioned<R> {
    /// First version of a record.
    pub fn issue(record: R, now: Timestamp) -> Result<Self, CoreError> {
        Ok(Self {
            digest: record_digest(&record)?,
            current: record,
            committed_at: now,
            history: Vec::new(),
        })
    }

    /// Replace the current version with `next`, moving it into history.
    ///
    /// The digest is computed first, so on error the entry is unchanged.
    pub fn supersede(&mut self, next: R, consumed_by: &str, now: Timestamp) -> Result<(), CoreError> {
        let digest = record_digest(&next)?;
        let prior = std::mem::replace(&mut self.current, next);
        let prior_digest = std::mem::replace(&mut self.digest, digest);
        self.history.push(ConsumedVersion {
            record: prior,
            digest: prior_digest,
            consumed_by: consumed_by.to_string(),
            consumed_at: now,
        });
        self.committed_at = now;
        Ok(())
    }
}

// -- Application State ---------------------------------------------------------

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Store<String, Versioned<Account>>,
    pub agreements: Store<LinearId, Versioned<Agreement>>,
    /// Every party seen on a committed record, by key.
    pub parties: Store<PartyKey, String>,
    pub contracts: ContractSet,
    pub config: AppConfig,
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("accounts", &self.accounts.len())
            .field("agreements", &self.agreements.len())
            .field("parties", &self.parties.len())
            .field("contracts", &self.contracts)
            .field("config", &self.config)
            .finish()
    }
}

impl AppState {
    /// Default configuration, no metrics recorder.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None)
    }

    pub fn with_config(config: AppConfig, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            accounts: Store::new(),
            agreements: Store::new(),
            parties: Store::new(),
            contracts: ContractSet::new(config.rules),
            config,
            metrics,
        }
    }

    /// Remember the names of a committed record's participants.
    pub fn register_parties<'a>(&self, parties: impl IntoIterator<Item = &'a Party>) {
        for p in parties {
            self.parties.insert(p.owning_key.clone(), p.name.clone());
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl SignerDirectory for AppState {
    fn party_name(&self, key: &PartyKey) -> Option<String> {
        self.parties.get(key)
    }
}

impl RecordLookup for AppState {
    fn account(&self, account_id: &str) -> Option<Account> {
        self.accounts
            .get(&account_id.to_string())
            .map(|v| v.current)
    }

    fn accounts_by_owner(&self, owner: &PartyKey) -> Vec<Account> {
        let mut found: Vec<Account> = self
            .accounts
            .list()
            .into_iter()
            .map(|v| v.current)
            .filter(|a| &a.controller.owning_key == owner)
            .collect();
        found.sort_by(|a, b| a.account_id.cmp(&b.account_id));
        found
    }

    fn agreement(&self, linear_id: &LinearId) -> Option<Agreement> {
        self.agreements.get(linear_id).map(|v| v.current)
    }

    fn agreements_by_party(&self, key: &PartyKey) -> Vec<Agreement> {
        let mut found: Vec<Agreement> = self
            .agreements
            .list()
            .into_iter()
            .map(|v| v.current)
            .filter(|a| &a.party.owning_key == key || &a.counterparty.owning_key == key)
            .collect();
        found.sort_by(|a, b| a.number.cmp(&b.number).then(a.linear_id.cmp(&b.linear_id)));
        found
    }
}
