//! TransactionStore: the single source of truth for a session's transactions.
//!
//! Design:
//! - Canonical copies live in a Vec kept in descending date order.
//! - Every effective mutation re-sorts the whole Vec. Target scale is one
//!   person's history, so O(n log n) per mutation is fine.
//! - The sort is stable: transactions sharing a date keep their previous
//!   relative order, and a freshly added one lands after existing ones of
//!   the same date. An updated transaction keeps its slot among equal dates.
//! - The API is total. Updating or deleting an unknown id is ignored.
//!
//! Observers registered with [`TransactionStore::subscribe`] run after each
//! effective mutation, once the collection is already re-sorted.

use std::fmt;

use crate::transaction::{NewTransaction, Transaction, TransactionId};

/// What changed. Carries the affected id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Added(TransactionId),
    Updated(TransactionId),
    Deleted(TransactionId),
}

type Observer = Box<dyn Fn(&StoreEvent, &[Transaction]) + Send + Sync>;

#[derive(Default)]
pub struct TransactionStore {
    transactions: Vec<Transaction>,
    observers: Vec<Observer>,
}

impl fmt::Debug for TransactionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionStore")
            .field("transactions", &self.transactions)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with already-identified transactions.
    ///
    /// A later entry with an id seen earlier replaces the earlier one.
    pub fn with_transactions(transactions: impl IntoIterator<Item = Transaction>) -> Self {
        let mut store = Self::new();
        for t in transactions {
            match store.position(&t.id) {
                Some(i) => store.transactions[i] = t,
                None => store.transactions.push(t),
            }
        }
        store.resort();
        store
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| &t.id == id)
    }

    /// Current collection, most recent date first.
    pub fn list(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Register a callback run after every effective mutation.
    pub fn subscribe(
        &mut self,
        observer: impl Fn(&StoreEvent, &[Transaction]) + Send + Sync + 'static,
    ) {
        self.observers.push(Box::new(observer));
    }

    /// Assign a fresh id, insert, re-sort, and return the stored copy.
    ///
    /// Callers validate first; this layer does not re-check `amount`.
    pub fn add(&mut self, candidate: NewTransaction) -> Transaction {
        let mut id = TransactionId::generate();
        // uniqueness within the live set is the only hard requirement
        while self.position(&id).is_some() {
            id = TransactionId::generate();
        }

        let stored = candidate.with_id(id.clone());
        self.transactions.push(stored.clone());
        self.resort();

        tracing::debug!(id = %id, date = %stored.date, "added transaction");
        self.notify(StoreEvent::Added(id));
        stored
    }

    /// Replace the transaction whose id matches `updated.id`.
    ///
    /// Returns false, leaving the store untouched, when no such id exists.
    pub fn update(&mut self, updated: Transaction) -> bool {
        let Some(i) = self.position(&updated.id) else {
            tracing::debug!(id = %updated.id, "update ignored: unknown id");
            return false;
        };

        let id = updated.id.clone();
        self.transactions[i] = updated;
        self.resort();

        tracing::debug!(id = %id, "updated transaction");
        self.notify(StoreEvent::Updated(id));
        true
    }

    /// Remove the transaction with `id`, returning it if it was present.
    pub fn delete(&mut self, id: &TransactionId) -> Option<Transaction> {
        let Some(i) = self.position(id) else {
            tracing::debug!(id = %id, "delete ignored: unknown id");
            return None;
        };

        // Vec::remove keeps the remaining order intact, no re-sort needed
        let removed = self.transactions.remove(i);

        tracing::debug!(id = %id, "deleted transaction");
        self.notify(StoreEvent::Deleted(id.clone()));
        Some(removed)
    }

    fn position(&self, id: &TransactionId) -> Option<usize> {
        self.transactions.iter().position(|t| &t.id == id)
    }

    fn resort(&mut self) {
        self.transactions.sort_by(|a, b| b.date.cmp(&a.date));
    }

    fn notify(&self, event: StoreEvent) {
        for observer in &self.observers {
            observer(&event, &self.transactions);
        }
    }
}
