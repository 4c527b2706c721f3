//! Resident registry and neighborhood cash ledger.
//!
//! The store keeps records in insertion order with counter-assigned ids,
//! statistics are recomputed from a snapshot on every read, and every service
//! entry point is gated by the caller's role.

pub mod access;
pub mod domain;
pub mod format;
pub mod letters;
pub mod memory;
pub mod repository;
pub mod router;
pub mod search;
pub mod seed;
pub mod service;
pub mod stats;
pub mod validation;

#[cfg(test)]
mod tests;

pub use access::{AccessDenied, AccessPolicy, Action, AuthError, Role, User, UserDirectory, View};
pub use domain::{
    Gender, MaritalStatus, NewResident, NewTransaction, Resident, ResidentId, ResidentPatch,
    Transaction, TransactionId, TransactionPatch, TransactionType,
};
pub use letters::{render_letter, service_catalog, Letter, LetterKind, MemberCard};
pub use memory::InMemoryRegistry;
pub use repository::{RegistryRepository, RepositoryError};
pub use router::{registry_router, resolve_actor, RegistryState, USER_HEADER};
pub use service::{RegistryService, RegistryServiceError};
pub use stats::{DashboardStats, FinanceSummary, FinancialStats, PopulationStats};
pub use validation::ValidationError;
