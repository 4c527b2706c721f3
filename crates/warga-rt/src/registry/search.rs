use super::domain::{Resident, Transaction};

/// Residents whose name or address contains the query (case-insensitive) or
/// whose NIK contains it verbatim. The query is matched as typed, surrounding
/// spaces included; an empty query matches everything. Input order is kept.
pub fn search_residents<'a>(residents: &'a [Resident], query: &str) -> Vec<&'a Resident> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return residents.iter().collect();
    }

    residents
        .iter()
        .filter(|resident| {
            resident.full_name.to_lowercase().contains(&needle)
                || resident.nik.contains(query)
                || resident.address.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Name-or-NIK lookup used when picking the subject of a letter.
pub fn pick_letter_subject<'a>(residents: &'a [Resident], query: &str) -> Vec<&'a Resident> {
    let needle = query.to_lowercase();
    residents
        .iter()
        .filter(|resident| {
            needle.is_empty()
                || resident.full_name.to_lowercase().contains(&needle)
                || resident.nik.contains(query)
        })
        .collect()
}

/// Ledger entries ordered most recent first. Entries sharing a date keep
/// their insertion order.
pub fn sorted_transactions(transactions: &[Transaction]) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|left, right| right.date.cmp(&left.date));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::domain::{
        Gender, MaritalStatus, ResidentId, TransactionId, TransactionType,
    };
    use chrono::NaiveDate;

    fn resident(id: &str, name: &str, nik: &str, address: &str) -> Resident {
        Resident {
            id: ResidentId::new(id),
            nik: nik.to_string(),
            full_name: name.to_string(),
            gender: Gender::Male,
            birth_date: NaiveDate::from_ymd_opt(1980, 1, 1).expect("valid date"),
            address: address.to_string(),
            occupation: "PNS".to_string(),
            marital_status: MaritalStatus::Married,
            phone_number: "0812".to_string(),
            photo: None,
        }
    }

    fn sample() -> Vec<Resident> {
        vec![
            resident("1", "Budi Santoso", "3171012001900001", "Jl. Merpati No. 4"),
            resident("2", "Siti Aminah", "3171015505920002", "Jl. Merpati No. 4"),
            resident("3", "Rina Kartika", "3201012003850004", "Jl. Kutilang No. 10"),
        ]
    }

    fn ids(found: &[&Resident]) -> Vec<String> {
        found.iter().map(|resident| resident.id.0.clone()).collect()
    }

    #[test]
    fn empty_query_matches_all_in_order() {
        let residents = sample();
        assert_eq!(ids(&search_residents(&residents, "")), vec!["1", "2", "3"]);
    }

    #[test]
    fn query_is_matched_as_typed() {
        let residents = sample();
        assert_eq!(ids(&search_residents(&residents, "budi ")), vec!["1"]);
        assert!(search_residents(&residents, "santoso ").is_empty());
        assert!(search_residents(&residents, "  ").is_empty());
    }

    #[test]
    fn filtering_commutes_with_reordering() {
        let residents = sample();
        let mut by_name = residents.clone();
        by_name.sort_by(|left, right| left.full_name.cmp(&right.full_name));

        for query in ["", "a", "MERPATI", "3171", "zzz"] {
            let mut filtered_then_sorted = search_residents(&residents, query);
            filtered_then_sorted.sort_by(|left, right| left.full_name.cmp(&right.full_name));
            let sorted_then_filtered = search_residents(&by_name, query);
            assert_eq!(ids(&filtered_then_sorted), ids(&sorted_then_filtered), "query {query:?}");
        }
    }

    #[test]
    fn name_match_is_case_insensitive() {
        let residents = sample();
        assert_eq!(ids(&search_residents(&residents, "bUDI")), vec!["1"]);
    }

    #[test]
    fn matches_nik_fragment_and_address() {
        let residents = sample();
        assert_eq!(ids(&search_residents(&residents, "3201")), vec!["3"]);
        assert_eq!(ids(&search_residents(&residents, "merpati")), vec!["1", "2"]);
    }

    #[test]
    fn letter_picker_ignores_address() {
        let residents = sample();
        assert!(pick_letter_subject(&residents, "kutilang").is_empty());
        assert_eq!(ids(&pick_letter_subject(&residents, "siti")), vec!["2"]);
    }

    #[test]
    fn transactions_sort_newest_first_and_stable() {
        let entry = |id: &str, day: u32| Transaction {
            id: TransactionId::new(id),
            date: NaiveDate::from_ymd_opt(2023, 10, day).expect("valid date"),
            description: String::new(),
            amount: 1,
            kind: TransactionType::Income,
            category: "Iuran Warga".to_string(),
        };
        let ledger = vec![entry("1", 1), entry("2", 15), entry("3", 5), entry("4", 15)];

        let sorted: Vec<_> = sorted_transactions(&ledger)
            .into_iter()
            .map(|transaction| transaction.id.0)
            .collect();
        assert_eq!(sorted, vec!["2", "4", "3", "1"]);
    }
}
