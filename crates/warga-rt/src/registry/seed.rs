//! Demo records used by `serve --seed` and the CLI walkthrough.

use chrono::NaiveDate;

use super::domain::{
    Gender, MaritalStatus, Resident, ResidentId, Transaction, TransactionId, TransactionType,
};
use super::memory::InMemoryRegistry;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn resident(
    id: &str,
    nik: &str,
    full_name: &str,
    gender: Gender,
    birth_date: NaiveDate,
    address: &str,
    occupation: &str,
    marital_status: MaritalStatus,
    phone_number: &str,
) -> Resident {
    Resident {
        id: ResidentId::new(id),
        nik: nik.to_string(),
        full_name: full_name.to_string(),
        gender,
        birth_date,
        address: address.to_string(),
        occupation: occupation.to_string(),
        marital_status,
        phone_number: phone_number.to_string(),
        photo: None,
    }
}

pub fn demo_residents() -> Vec<Resident> {
    vec![
        resident(
            "1",
            "3171012001900001",
            "Budi Santoso",
            Gender::Male,
            date(1980, 5, 15),
            "Jl. Merpati No. 4",
            "Wiraswasta",
            MaritalStatus::Married,
            "081234567890",
        ),
        resident(
            "2",
            "3171015505920002",
            "Siti Aminah",
            Gender::Female,
            date(1982, 12, 20),
            "Jl. Merpati No. 4",
            "Ibu Rumah Tangga",
            MaritalStatus::Married,
            "081298765432",
        ),
        resident(
            "3",
            "3171011001100003",
            "Andi Pratama",
            Gender::Male,
            date(2010, 1, 10),
            "Jl. Merpati No. 4",
            "Pelajar",
            MaritalStatus::Single,
            "-",
        ),
        resident(
            "4",
            "3201012003850004",
            "Rina Kartika",
            Gender::Female,
            date(1995, 3, 25),
            "Jl. Kutilang No. 10",
            "Guru",
            MaritalStatus::Single,
            "085678901234",
        ),
        resident(
            "5",
            "3201011508750005",
            "Joko Widodo (Bukan Presiden)",
            Gender::Male,
            date(1975, 8, 17),
            "Jl. Elang No. 8",
            "PNS",
            MaritalStatus::Divorced,
            "081345678901",
        ),
    ]
}

pub fn demo_transactions() -> Vec<Transaction> {
    let entry = |id: &str, on: NaiveDate, description: &str, amount, kind, category: &str| {
        Transaction {
            id: TransactionId::new(id),
            date: on,
            description: description.to_string(),
            amount,
            kind,
            category: category.to_string(),
        }
    };

    vec![
        entry(
            "1",
            date(2023, 10, 1),
            "Saldo Awal Bulan",
            5_000_000,
            TransactionType::Income,
            "Saldo Awal",
        ),
        entry(
            "2",
            date(2023, 10, 5),
            "Iuran Kebersihan & Keamanan (Bpk. Budi)",
            100_000,
            TransactionType::Income,
            "Iuran Warga",
        ),
        entry(
            "3",
            date(2023, 10, 10),
            "Perbaikan Lampu Jalan Merpati",
            350_000,
            TransactionType::Expense,
            "Perbaikan Fasilitas",
        ),
        entry(
            "4",
            date(2023, 10, 15),
            "Konsumsi Rapat Bulanan",
            150_000,
            TransactionType::Expense,
            "Operasional",
        ),
    ]
}

pub fn demo_registry() -> InMemoryRegistry {
    InMemoryRegistry::seeded(demo_residents(), demo_transactions())
}
