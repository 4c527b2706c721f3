use std::sync::{Mutex, MutexGuard};

use super::domain::{
    NewResident, NewTransaction, Resident, ResidentId, ResidentPatch, Transaction, TransactionId,
    TransactionPatch,
};
use super::repository::{RegistryRepository, RepositoryError};

trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Resident {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

impl Keyed for Transaction {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

/// Insertion-ordered records plus the counter that hands out their ids.
///
/// The counter only moves forward, so an id freed by a removal is never
/// handed out again.
#[derive(Debug)]
struct Collection<T> {
    records: Vec<T>,
    next_id: u64,
}

impl<T: Keyed + Clone> Collection<T> {
    fn seeded(records: Vec<T>) -> Self {
        let highest = records
            .iter()
            .filter_map(|record| record.key().parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        Self {
            records,
            next_id: highest.saturating_add(1),
        }
    }

    fn allocate_id(&mut self) -> String {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id.to_string()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.records.iter().position(|record| record.key() == key)
    }

    fn get(&self, key: &str) -> Option<T> {
        self.records.iter().find(|record| record.key() == key).cloned()
    }

    fn remove(&mut self, key: &str) -> Option<T> {
        self.position(key).map(|index| self.records.remove(index))
    }
}

/// Process-local registry store shared across handlers.
#[derive(Debug)]
pub struct InMemoryRegistry {
    residents: Mutex<Collection<Resident>>,
    transactions: Mutex<Collection<Transaction>>,
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::seeded(Vec::new(), Vec::new())
    }
}

impl InMemoryRegistry {
    /// Build a store around existing records. Counters resume after the
    /// largest numeric id present in each collection.
    pub fn seeded(residents: Vec<Resident>, transactions: Vec<Transaction>) -> Self {
        Self {
            residents: Mutex::new(Collection::seeded(residents)),
            transactions: Mutex::new(Collection::seeded(transactions)),
        }
    }

    fn residents_guard(&self) -> Result<MutexGuard<'_, Collection<Resident>>, RepositoryError> {
        self.residents
            .lock()
            .map_err(|_| RepositoryError::Unavailable("resident store poisoned".to_string()))
    }

    fn transactions_guard(
        &self,
    ) -> Result<MutexGuard<'_, Collection<Transaction>>, RepositoryError> {
        self.transactions
            .lock()
            .map_err(|_| RepositoryError::Unavailable("transaction store poisoned".to_string()))
    }
}

impl RegistryRepository for InMemoryRegistry {
    fn add_resident(&self, draft: NewResident) -> Result<Resident, RepositoryError> {
        let mut guard = self.residents_guard()?;
        let id = ResidentId(guard.allocate_id());
        let resident = draft.into_resident(id);
        guard.records.push(resident.clone());
        Ok(resident)
    }

    fn update_resident(
        &self,
        id: &ResidentId,
        patch: ResidentPatch,
    ) -> Result<Resident, RepositoryError> {
        let mut guard = self.residents_guard()?;
        let index = guard.position(id.as_str()).ok_or(RepositoryError::NotFound)?;
        let resident = &mut guard.records[index];
        patch.apply(resident);
        Ok(resident.clone())
    }

    fn remove_resident(&self, id: &ResidentId) -> Result<Option<Resident>, RepositoryError> {
        Ok(self.residents_guard()?.remove(id.as_str()))
    }

    fn resident(&self, id: &ResidentId) -> Result<Option<Resident>, RepositoryError> {
        Ok(self.residents_guard()?.get(id.as_str()))
    }

    fn residents(&self) -> Result<Vec<Resident>, RepositoryError> {
        Ok(self.residents_guard()?.records.clone())
    }

    fn add_transaction(&self, draft: NewTransaction) -> Result<Transaction, RepositoryError> {
        let mut guard = self.transactions_guard()?;
        let id = TransactionId(guard.allocate_id());
        let transaction = draft.into_transaction(id);
        guard.records.push(transaction.clone());
        Ok(transaction)
    }

    fn update_transaction(
        &self,
        id: &TransactionId,
        patch: TransactionPatch,
    ) -> Result<Transaction, RepositoryError> {
        let mut guard = self.transactions_guard()?;
        let index = guard.position(id.as_str()).ok_or(RepositoryError::NotFound)?;
        let transaction = &mut guard.records[index];
        patch.apply(transaction);
        Ok(transaction.clone())
    }

    fn remove_transaction(
        &self,
        id: &TransactionId,
    ) -> Result<Option<Transaction>, RepositoryError> {
        Ok(self.transactions_guard()?.remove(id.as_str()))
    }

    fn transaction(&self, id: &TransactionId) -> Result<Option<Transaction>, RepositoryError> {
        Ok(self.transactions_guard()?.get(id.as_str()))
    }

    fn transactions(&self) -> Result<Vec<Transaction>, RepositoryError> {
        Ok(self.transactions_guard()?.records.clone())
    }
}
