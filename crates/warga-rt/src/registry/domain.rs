use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier wrapper for registered residents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResidentId(pub String);

/// Identifier wrapper for cash-ledger entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub String);

impl ResidentId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TransactionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResidentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const fn ordered() -> [Self; 2] {
        [Self::Male, Self::Female]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Laki-laki",
            Self::Female => "Perempuan",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
}

impl MaritalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Single => "Belum Kawin",
            Self::Married => "Kawin",
            Self::Divorced => "Cerai",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Income => "Pemasukan",
            Self::Expense => "Pengeluaran",
        }
    }

    /// Categories offered by the ledger form. The list is advisory; any
    /// non-blank category is accepted.
    pub const fn suggested_categories(self) -> &'static [&'static str] {
        match self {
            Self::Income => &["Iuran Warga", "Sumbangan", "Dana Pemerintah", "Lain-lain"],
            Self::Expense => &[
                "Perbaikan Fasilitas",
                "Kebersihan",
                "Keamanan",
                "Operasional",
                "Sosial",
                "Lain-lain",
            ],
        }
    }
}

/// A person registered in the neighborhood population record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    pub id: ResidentId,
    pub nik: String,
    pub full_name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub address: String,
    pub occupation: String,
    pub marital_status: MaritalStatus,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// Resident form payload before the store assigns an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResident {
    pub nik: String,
    pub full_name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub address: String,
    pub occupation: String,
    pub marital_status: MaritalStatus,
    pub phone_number: String,
    #[serde(default)]
    pub photo: Option<String>,
}

impl NewResident {
    pub fn into_resident(self, id: ResidentId) -> Resident {
        Resident {
            id,
            nik: self.nik,
            full_name: self.full_name,
            gender: self.gender,
            birth_date: self.birth_date,
            address: self.address,
            occupation: self.occupation,
            marital_status: self.marital_status,
            phone_number: self.phone_number,
            photo: self.photo,
        }
    }
}

impl From<&Resident> for NewResident {
    fn from(resident: &Resident) -> Self {
        Self {
            nik: resident.nik.clone(),
            full_name: resident.full_name.clone(),
            gender: resident.gender,
            birth_date: resident.birth_date,
            address: resident.address.clone(),
            occupation: resident.occupation.clone(),
            marital_status: resident.marital_status,
            phone_number: resident.phone_number.clone(),
            photo: resident.photo.clone(),
        }
    }
}

/// Partial resident edit. Absent fields keep their stored value; `photo: null`
/// clears the stored photo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentPatch {
    #[serde(default)]
    pub nik: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub marital_status: Option<MaritalStatus>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub photo: Option<Option<String>>,
}

impl ResidentPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply the patch in place; the identifier is never touched.
    pub fn apply(self, resident: &mut Resident) {
        if let Some(nik) = self.nik {
            resident.nik = nik;
        }
        if let Some(full_name) = self.full_name {
            resident.full_name = full_name;
        }
        if let Some(gender) = self.gender {
            resident.gender = gender;
        }
        if let Some(birth_date) = self.birth_date {
            resident.birth_date = birth_date;
        }
        if let Some(address) = self.address {
            resident.address = address;
        }
        if let Some(occupation) = self.occupation {
            resident.occupation = occupation;
        }
        if let Some(marital_status) = self.marital_status {
            resident.marital_status = marital_status;
        }
        if let Some(phone_number) = self.phone_number {
            resident.phone_number = phone_number;
        }
        if let Some(photo) = self.photo {
            resident.photo = photo;
        }
    }
}

/// A single cash-ledger entry for the neighborhood fund. Amounts are whole Rupiah.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub date: NaiveDate,
    pub description: String,
    pub amount: u64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: u64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
}

impl NewTransaction {
    pub fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            date: self.date,
            description: self.description,
            amount: self.amount,
            kind: self.kind,
            category: self.category,
        }
    }
}

impl From<&Transaction> for NewTransaction {
    fn from(transaction: &Transaction) -> Self {
        Self {
            date: transaction.date,
            description: transaction.description.clone(),
            amount: transaction.amount,
            kind: transaction.kind,
            category: transaction.category.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Option<u64>,
    #[serde(default, rename = "type")]
    pub kind: Option<TransactionType>,
    #[serde(default)]
    pub category: Option<String>,
}

impl TransactionPatch {
    pub fn apply(self, transaction: &mut Transaction) {
        if let Some(date) = self.date {
            transaction.date = date;
        }
        if let Some(description) = self.description {
            transaction.description = description;
        }
        if let Some(amount) = self.amount {
            transaction.amount = amount;
        }
        if let Some(kind) = self.kind {
            transaction.kind = kind;
        }
        if let Some(category) = self.category {
            transaction.category = category;
        }
    }
}

// Distinguishes a missing field (outer `None`) from an explicit `null`.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
