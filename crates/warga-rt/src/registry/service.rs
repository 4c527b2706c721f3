use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use super::access::{AccessDenied, AccessPolicy, Action, User, View};
use super::domain::{
    NewResident, NewTransaction, Resident, ResidentId, ResidentPatch, Transaction, TransactionId,
    TransactionPatch,
};
use super::letters::{render_letter, service_catalog, Letter, MemberCard, ServiceCategory};
use super::repository::{RegistryRepository, RepositoryError};
use super::search::{pick_letter_subject, search_residents, sorted_transactions};
use super::stats::{dashboard, finance_summary, DashboardStats, FinanceSummary};
use super::validation::{validate_resident, validate_transaction, ValidationError};

/// Service composing the registry store, form validation, and the role policy.
///
/// Every entry point takes the acting user and checks the matching
/// [`Action`] before touching the repository.
pub struct RegistryService<R> {
    repository: Arc<R>,
    policy: AccessPolicy,
}

impl<R> RegistryService<R>
where
    R: RegistryRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_policy(repository, AccessPolicy)
    }

    pub fn with_policy(repository: Arc<R>, policy: AccessPolicy) -> Self {
        Self { repository, policy }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    pub fn navigation(&self, actor: &User) -> Vec<View> {
        self.policy.navigation(actor.role)
    }

    fn authorize(&self, actor: &User, action: Action) -> Result<(), RegistryServiceError> {
        self.policy.authorize(actor.role, action).map_err(|denied| {
            debug!(user = %actor.username, ?action, "access denied");
            RegistryServiceError::from(denied)
        })
    }

    /// Residents in registration order, narrowed by an optional search query.
    pub fn residents(
        &self,
        actor: &User,
        query: Option<&str>,
    ) -> Result<Vec<Resident>, RegistryServiceError> {
        self.authorize(actor, Action::ViewResidents)?;
        let residents = self.repository.residents()?;
        Ok(search_residents(&residents, query.unwrap_or_default())
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn resident(
        &self,
        actor: &User,
        id: &ResidentId,
    ) -> Result<Resident, RegistryServiceError> {
        self.authorize(actor, Action::ViewResidents)?;
        let resident = self
            .repository
            .resident(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(resident)
    }

    pub fn register_resident(
        &self,
        actor: &User,
        draft: NewResident,
        today: NaiveDate,
    ) -> Result<Resident, RegistryServiceError> {
        self.authorize(actor, Action::CreateResident)?;
        validate_resident(&draft, today)?;
        let resident = self.repository.add_resident(draft)?;
        info!(user = %actor.username, resident = %resident.id, "resident registered");
        Ok(resident)
    }

    /// Apply a partial edit. The merged record must still pass form
    /// validation; the stored record is untouched when it does not.
    pub fn update_resident(
        &self,
        actor: &User,
        id: &ResidentId,
        patch: ResidentPatch,
        today: NaiveDate,
    ) -> Result<Resident, RegistryServiceError> {
        self.authorize(actor, Action::EditResident)?;
        let mut merged = self
            .repository
            .resident(id)?
            .ok_or(RepositoryError::NotFound)?;
        patch.clone().apply(&mut merged);
        validate_resident(&NewResident::from(&merged), today)?;

        let updated = self.repository.update_resident(id, patch)?;
        info!(user = %actor.username, resident = %updated.id, "resident updated");
        Ok(updated)
    }

    /// Remove a resident. Unknown ids are a no-op and yield `None`.
    pub fn remove_resident(
        &self,
        actor: &User,
        id: &ResidentId,
    ) -> Result<Option<Resident>, RegistryServiceError> {
        self.authorize(actor, Action::DeleteResident)?;
        let removed = self.repository.remove_resident(id)?;
        if removed.is_some() {
            info!(user = %actor.username, resident = %id, "resident removed");
        }
        Ok(removed)
    }

    /// Ledger entries, most recent first.
    pub fn transactions(&self, actor: &User) -> Result<Vec<Transaction>, RegistryServiceError> {
        self.authorize(actor, Action::ViewFinance)?;
        Ok(sorted_transactions(&self.repository.transactions()?))
    }

    pub fn record_transaction(
        &self,
        actor: &User,
        draft: NewTransaction,
    ) -> Result<Transaction, RegistryServiceError> {
        self.authorize(actor, Action::RecordTransaction)?;
        validate_transaction(&draft)?;
        let transaction = self.repository.add_transaction(draft)?;
        info!(
            user = %actor.username,
            transaction = %transaction.id,
            kind = transaction.kind.label(),
            amount = transaction.amount,
            "transaction recorded"
        );
        Ok(transaction)
    }

    pub fn update_transaction(
        &self,
        actor: &User,
        id: &TransactionId,
        patch: TransactionPatch,
    ) -> Result<Transaction, RegistryServiceError> {
        self.authorize(actor, Action::EditTransaction)?;
        let mut merged = self
            .repository
            .transaction(id)?
            .ok_or(RepositoryError::NotFound)?;
        patch.clone().apply(&mut merged);
        validate_transaction(&NewTransaction::from(&merged))?;

        let updated = self.repository.update_transaction(id, patch)?;
        info!(user = %actor.username, transaction = %updated.id, "transaction updated");
        Ok(updated)
    }

    pub fn remove_transaction(
        &self,
        actor: &User,
        id: &TransactionId,
    ) -> Result<Option<Transaction>, RegistryServiceError> {
        self.authorize(actor, Action::DeleteTransaction)?;
        let removed = self.repository.remove_transaction(id)?;
        if removed.is_some() {
            info!(user = %actor.username, transaction = %id, "transaction removed");
        }
        Ok(removed)
    }

    pub fn dashboard(
        &self,
        actor: &User,
        today: NaiveDate,
    ) -> Result<DashboardStats, RegistryServiceError> {
        self.authorize(actor, Action::ViewDashboard)?;
        Ok(dashboard(&self.repository.residents()?, today))
    }

    pub fn finance(&self, actor: &User) -> Result<FinanceSummary, RegistryServiceError> {
        self.authorize(actor, Action::ViewFinance)?;
        Ok(finance_summary(&self.repository.transactions()?))
    }

    pub fn service_catalog(
        &self,
        actor: &User,
    ) -> Result<Vec<ServiceCategory>, RegistryServiceError> {
        self.authorize(actor, Action::GenerateDocument)?;
        Ok(service_catalog())
    }

    /// Candidates for a letter, matched by name or NIK.
    pub fn letter_subjects(
        &self,
        actor: &User,
        query: &str,
    ) -> Result<Vec<Resident>, RegistryServiceError> {
        self.authorize(actor, Action::GenerateDocument)?;
        let residents = self.repository.residents()?;
        Ok(pick_letter_subject(&residents, query)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn letter(
        &self,
        actor: &User,
        id: &ResidentId,
        label: &str,
        issued_on: NaiveDate,
    ) -> Result<Letter, RegistryServiceError> {
        self.authorize(actor, Action::GenerateDocument)?;
        let resident = self
            .repository
            .resident(id)?
            .ok_or(RepositoryError::NotFound)?;
        info!(user = %actor.username, resident = %id, label, "letter generated");
        Ok(render_letter(&resident, label, issued_on))
    }

    pub fn member_card(
        &self,
        actor: &User,
        id: &ResidentId,
    ) -> Result<MemberCard, RegistryServiceError> {
        self.authorize(actor, Action::GenerateDocument)?;
        let resident = self
            .repository
            .resident(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(MemberCard::for_resident(&resident))
    }

    /// Residents for a spreadsheet export, narrowed by the same search the
    /// list view applies.
    pub fn exportable_residents(
        &self,
        actor: &User,
        query: Option<&str>,
    ) -> Result<Vec<Resident>, RegistryServiceError> {
        self.authorize(actor, Action::ExportResidents)?;
        let residents = self.repository.residents()?;
        Ok(search_residents(&residents, query.unwrap_or_default())
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn exportable_transactions(
        &self,
        actor: &User,
    ) -> Result<Vec<Transaction>, RegistryServiceError> {
        self.authorize(actor, Action::ExportTransactions)?;
        Ok(sorted_transactions(&self.repository.transactions()?))
    }

    /// Resident snapshot for the remote spreadsheet push.
    pub fn sync_snapshot(&self, actor: &User) -> Result<Vec<Resident>, RegistryServiceError> {
        self.authorize(actor, Action::SyncResidents)?;
        Ok(self.repository.residents()?)
    }

    /// Resident snapshot embedded in assistant prompts.
    pub fn assistant_context(
        &self,
        actor: &User,
    ) -> Result<Vec<Resident>, RegistryServiceError> {
        self.authorize(actor, Action::UseAssistant)?;
        Ok(self.repository.residents()?)
    }

    pub fn authorize_settings(&self, actor: &User) -> Result<(), RegistryServiceError> {
        self.authorize(actor, Action::ManageSettings)
    }
}

/// Error raised by the registry service.
#[derive(Debug, thiserror::Error)]
pub enum RegistryServiceError {
    #[error(transparent)]
    Access(#[from] AccessDenied),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
