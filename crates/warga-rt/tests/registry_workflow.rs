//! End-to-end registry scenarios through the public service facade.

mod common {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use warga_rt::registry::seed::demo_registry;
    use warga_rt::registry::{
        Gender, InMemoryRegistry, MaritalStatus, NewResident, RegistryService, Role, User,
    };

    pub(super) fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date")
    }

    pub(super) fn user(username: &str, role: Role) -> User {
        User {
            username: username.to_string(),
            name: username.to_string(),
            role,
        }
    }

    pub(super) fn service() -> RegistryService<InMemoryRegistry> {
        RegistryService::new(Arc::new(demo_registry()))
    }

    pub(super) fn newborn() -> NewResident {
        NewResident {
            nik: "3171010101260007".to_string(),
            full_name: "Bayu Santoso".to_string(),
            gender: Gender::Male,
            birth_date: NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date"),
            address: "Jl. Merpati No. 4".to_string(),
            occupation: "Belum Bekerja".to_string(),
            marital_status: MaritalStatus::Single,
            phone_number: String::new(),
            photo: None,
        }
    }
}

use common::*;
use warga_rt::export::{resident_table, Cell};
use warga_rt::registry::stats::AgeBracket;
use warga_rt::registry::{ResidentId, Role};

#[test]
fn registering_a_newborn_updates_dashboard_without_new_family() {
    let service = service();
    let staff = user("staff", Role::Staff);

    let before = service.dashboard(&staff, today()).expect("dashboard");
    let created = service
        .register_resident(&staff, newborn(), today())
        .expect("registered");
    let after = service.dashboard(&staff, today()).expect("dashboard");

    assert_eq!(created.id, ResidentId::new("6"));
    assert_eq!(after.population.total, before.population.total + 1);
    assert_eq!(after.population.male, before.population.male + 1);
    assert_eq!(after.population.families, before.population.families);

    let youth = |stats: &warga_rt::registry::DashboardStats| {
        stats
            .age_distribution
            .iter()
            .find(|entry| entry.bracket == AgeBracket::Youth)
            .map(|entry| entry.count)
            .unwrap_or_default()
    };
    assert_eq!(youth(&after), youth(&before) + 1);
}

#[test]
fn seeded_age_distribution_matches_birth_years() {
    let stats = service()
        .dashboard(&user("admin", Role::Admin), today())
        .expect("dashboard");
    let counts: Vec<(&str, usize)> = stats
        .age_distribution
        .iter()
        .map(|entry| (entry.label, entry.count))
        .collect();

    // 2026 ages: Budi 46, Siti 44, Andi 16, Rina 31, Joko 51.
    assert_eq!(
        counts,
        vec![("0-17", 1), ("18-40", 1), ("41-60", 3), (">60", 0)]
    );
}

#[test]
fn exported_rows_follow_registry_order() {
    let service = service();
    let admin = user("admin", Role::Admin);
    service
        .register_resident(&admin, newborn(), today())
        .expect("registered");

    let residents = service.exportable_residents(&admin, None).expect("export");
    let table = resident_table(&residents);
    assert_eq!(table.rows.len(), 6);
    assert_eq!(table.rows[5][1], Cell::Text("Bayu Santoso".to_string()));
    assert_eq!(table.rows[5][6], Cell::Text("Belum Kawin".to_string()));
}

#[test]
fn letter_subject_picker_then_letter() {
    let service = service();
    let staff = user("staff", Role::Staff);

    let subjects = service.letter_subjects(&staff, "3201").expect("subjects");
    let names: Vec<&str> = subjects.iter().map(|r| r.full_name.as_str()).collect();
    assert_eq!(names, vec!["Rina Kartika", "Joko Widodo (Bukan Presiden)"]);

    let letter = service
        .letter(&staff, &subjects[0].id, "Pengantar SKCK", today())
        .expect("letter");
    assert!(letter.text.contains("Rina Kartika"));
    assert!(letter.text.contains("Surat Keterangan Catatan Kepolisian (SKCK)"));
    assert!(letter.text.contains("Jakarta, 18 Oktober 2026"));
}
