//! Aggregates derived from a registry snapshot.
//!
//! Nothing here is cached: every function recomputes from the slice it is
//! given, so callers always see figures consistent with the current store.

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::domain::{Gender, Resident, Transaction, TransactionType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PopulationStats {
    pub total: usize,
    pub male: usize,
    pub female: usize,
    /// Distinct addresses. Unrelated households sharing an address count once.
    pub families: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBracket {
    Youth,
    YoungAdult,
    Adult,
    Senior,
}

impl AgeBracket {
    pub const fn ordered() -> [Self; 4] {
        [Self::Youth, Self::YoungAdult, Self::Adult, Self::Senior]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Youth => "0-17",
            Self::YoungAdult => "18-40",
            Self::Adult => "41-60",
            Self::Senior => ">60",
        }
    }

    pub const fn for_age(age: i32) -> Self {
        if age <= 17 {
            Self::Youth
        } else if age <= 40 {
            Self::YoungAdult
        } else if age <= 60 {
            Self::Adult
        } else {
            Self::Senior
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgeBucketEntry {
    pub bracket: AgeBracket,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenderEntry {
    pub gender: Gender,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FinancialStats {
    pub income: u64,
    pub expense: u64,
    pub balance: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub kind: TransactionType,
    pub category: String,
    pub total: u64,
    pub entries: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub population: PopulationStats,
    pub genders: Vec<GenderEntry>,
    pub age_distribution: Vec<AgeBucketEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinanceSummary {
    pub totals: FinancialStats,
    pub categories: Vec<CategoryTotal>,
    /// Ledger entries, most recent first.
    pub transactions: Vec<Transaction>,
}

pub fn population_stats(residents: &[Resident]) -> PopulationStats {
    let male = residents
        .iter()
        .filter(|resident| resident.gender == Gender::Male)
        .count();
    let female = residents
        .iter()
        .filter(|resident| resident.gender == Gender::Female)
        .count();
    let families = residents
        .iter()
        .map(|resident| resident.address.as_str())
        .collect::<HashSet<_>>()
        .len();

    PopulationStats {
        total: residents.len(),
        male,
        female,
        families,
    }
}

/// Calendar-year difference; month and day are ignored.
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    today.year() - birth_date.year()
}

pub fn age_distribution(residents: &[Resident], today: NaiveDate) -> Vec<AgeBucketEntry> {
    let mut counts = [0usize; 4];
    for resident in residents {
        let bracket = AgeBracket::for_age(age_on(resident.birth_date, today));
        counts[bracket as usize] += 1;
    }

    AgeBracket::ordered()
        .into_iter()
        .map(|bracket| AgeBucketEntry {
            bracket,
            label: bracket.label(),
            count: counts[bracket as usize],
        })
        .collect()
}

pub fn gender_breakdown(population: &PopulationStats) -> Vec<GenderEntry> {
    Gender::ordered()
        .into_iter()
        .map(|gender| GenderEntry {
            gender,
            label: gender.label(),
            count: match gender {
                Gender::Male => population.male,
                Gender::Female => population.female,
            },
        })
        .collect()
}

pub fn dashboard(residents: &[Resident], today: NaiveDate) -> DashboardStats {
    let population = population_stats(residents);
    DashboardStats {
        genders: gender_breakdown(&population),
        age_distribution: age_distribution(residents, today),
        population,
    }
}

pub fn financial_stats(transactions: &[Transaction]) -> FinancialStats {
    let income = sum_of(transactions, TransactionType::Income);
    let expense = sum_of(transactions, TransactionType::Expense);
    let balance = (i128::from(income) - i128::from(expense))
        .clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64;

    FinancialStats {
        income,
        expense,
        balance,
    }
}

/// Totals per `(type, category)`, ordered by type then category label.
pub fn category_totals(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<(TransactionType, &str), (u64, usize)> = BTreeMap::new();
    for transaction in transactions {
        let entry = totals
            .entry((transaction.kind, transaction.category.as_str()))
            .or_default();
        entry.0 = entry.0.saturating_add(transaction.amount);
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|((kind, category), (total, entries))| CategoryTotal {
            kind,
            category: category.to_string(),
            total,
            entries,
        })
        .collect()
}

pub fn finance_summary(transactions: &[Transaction]) -> FinanceSummary {
    FinanceSummary {
        totals: financial_stats(transactions),
        categories: category_totals(transactions),
        transactions: super::search::sorted_transactions(transactions),
    }
}

fn sum_of(transactions: &[Transaction], kind: TransactionType) -> u64 {
    transactions
        .iter()
        .filter(|transaction| transaction.kind == kind)
        .fold(0u64, |acc, transaction| acc.saturating_add(transaction.amount))
}
