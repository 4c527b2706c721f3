use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Staff,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Staff => "STAFF",
        }
    }
}

/// Screens of the administrative console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum View {
    Dashboard,
    Residents,
    Services,
    Finance,
    Settings,
}

impl View {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Dashboard,
            Self::Residents,
            Self::Services,
            Self::Finance,
            Self::Settings,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Residents => "Data Warga",
            Self::Services => "Layanan Warga",
            Self::Finance => "Kas RT/RW",
            Self::Settings => "Pengaturan",
        }
    }
}

/// Operations guarded by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ViewDashboard,
    ViewResidents,
    CreateResident,
    EditResident,
    DeleteResident,
    GenerateDocument,
    ExportResidents,
    ViewFinance,
    RecordTransaction,
    EditTransaction,
    DeleteTransaction,
    ExportTransactions,
    SyncResidents,
    ManageSettings,
    UseAssistant,
}

impl Action {
    /// The view an action belongs to; a role must see the view to act on it.
    pub const fn view(self) -> View {
        match self {
            Self::ViewDashboard | Self::UseAssistant => View::Dashboard,
            Self::ViewResidents
            | Self::CreateResident
            | Self::EditResident
            | Self::DeleteResident
            | Self::ExportResidents => View::Residents,
            Self::GenerateDocument => View::Services,
            Self::ViewFinance
            | Self::RecordTransaction
            | Self::EditTransaction
            | Self::DeleteTransaction
            | Self::ExportTransactions => View::Finance,
            Self::SyncResidents | Self::ManageSettings => View::Settings,
        }
    }

    const fn is_deletion(self) -> bool {
        matches!(self, Self::DeleteResident | Self::DeleteTransaction)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("role {role:?} is not permitted to {action:?}")]
pub struct AccessDenied {
    pub role: Role,
    pub action: Action,
}

/// Binary role gate: ADMIN sees and does everything, STAFF is limited to the
/// dashboard, resident registry and letter services and may never delete.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicy;

impl AccessPolicy {
    pub const fn can_view(&self, role: Role, view: View) -> bool {
        match role {
            Role::Admin => true,
            Role::Staff => matches!(view, View::Dashboard | View::Residents | View::Services),
        }
    }

    pub const fn permits(&self, role: Role, action: Action) -> bool {
        match role {
            Role::Admin => true,
            Role::Staff => !action.is_deletion() && self.can_view(role, action.view()),
        }
    }

    pub fn authorize(&self, role: Role, action: Action) -> Result<(), AccessDenied> {
        if self.permits(role, action) {
            Ok(())
        } else {
            Err(AccessDenied { role, action })
        }
    }

    pub fn navigation(&self, role: Role) -> Vec<View> {
        View::ordered()
            .into_iter()
            .filter(|view| self.can_view(role, *view))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("username atau password salah")]
    InvalidCredentials,
    #[error("pengguna tidak dikenal")]
    UnknownUser,
}

/// Demo account list. Passwords equal usernames; this is not an
/// authentication mechanism, only a way to resolve a role for a session.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    pub fn demo() -> Self {
        Self::new(vec![
            User {
                username: "admin".to_string(),
                name: "Pak RT".to_string(),
                role: Role::Admin,
            },
            User {
                username: "staff".to_string(),
                name: "Sekretaris".to_string(),
                role: Role::Staff,
            },
        ])
    }

    pub fn find(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|user| user.username == username)
    }

    pub fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthError> {
        match self.find(username) {
            Some(user) if password == user.username => Ok(user.clone()),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }
}
