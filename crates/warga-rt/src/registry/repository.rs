use super::domain::{
    NewResident, NewTransaction, Resident, ResidentId, ResidentPatch, Transaction, TransactionId,
    TransactionPatch,
};

/// Storage abstraction for the resident registry and the cash ledger.
///
/// Lists are returned in insertion order; callers impose their own ordering.
/// `update_*` fails with [`RepositoryError::NotFound`] for unknown ids while
/// `remove_*` treats them as a no-op and returns `Ok(None)`.
pub trait RegistryRepository: Send + Sync {
    fn add_resident(&self, draft: NewResident) -> Result<Resident, RepositoryError>;
    fn update_resident(
        &self,
        id: &ResidentId,
        patch: ResidentPatch,
    ) -> Result<Resident, RepositoryError>;
    fn remove_resident(&self, id: &ResidentId) -> Result<Option<Resident>, RepositoryError>;
    fn resident(&self, id: &ResidentId) -> Result<Option<Resident>, RepositoryError>;
    fn residents(&self) -> Result<Vec<Resident>, RepositoryError>;

    fn add_transaction(&self, draft: NewTransaction) -> Result<Transaction, RepositoryError>;
    fn update_transaction(
        &self,
        id: &TransactionId,
        patch: TransactionPatch,
    ) -> Result<Transaction, RepositoryError>;
    fn remove_transaction(&self, id: &TransactionId)
        -> Result<Option<Transaction>, RepositoryError>;
    fn transaction(&self, id: &TransactionId) -> Result<Option<Transaction>, RepositoryError>;
    fn transactions(&self) -> Result<Vec<Transaction>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
