use crate::commands::{print_dashboard, print_finance};
use crate::infra::{parse_date, registry_service};
use chrono::{Local, NaiveDate};
use clap::Args;
use warga_rt::error::AppError;
use warga_rt::registry::format::{long_date, rupiah_unsigned};
use warga_rt::registry::{
    Gender, MaritalStatus, NewResident, NewTransaction, RegistryServiceError, TransactionType,
    UserDirectory,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the walkthrough date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip the cash ledger portion of the demo
    #[arg(long)]
    pub(crate) skip_finance: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let users = UserDirectory::demo();
    let admin = users.authenticate("admin", "admin")?;
    let staff = users.authenticate("staff", "staff")?;
    let service = registry_service(true);

    println!("=== Warga RT demo ({}) ===", long_date(today));
    println!("Masuk sebagai {} ({:?})", admin.name, admin.role);
    let menu: Vec<&str> = service
        .navigation(&admin)
        .into_iter()
        .map(|view| view.label())
        .collect();
    println!("Menu: {}", menu.join(" | "));

    println!("\n--- Dashboard ---");
    print_dashboard(&service.dashboard(&admin, today)?);

    println!("\n--- Pendaftaran warga baru ---");
    let birth_date = today
        .checked_sub_signed(chrono::Duration::days(30))
        .unwrap_or(today);
    let newborn = service.register_resident(
        &admin,
        NewResident {
            nik: "3171010101260001".to_string(),
            full_name: "Putri Santoso".to_string(),
            gender: Gender::Female,
            birth_date,
            address: "Jl. Merpati No. 10".to_string(),
            occupation: "Belum Bekerja".to_string(),
            marital_status: MaritalStatus::Single,
            phone_number: "081234567890".to_string(),
            photo: None,
        },
        today,
    )?;
    println!(
        "Terdaftar #{}: {} ({})",
        newborn.id, newborn.full_name, newborn.address
    );
    let population = service.dashboard(&admin, today)?.population;
    println!(
        "Total warga kini {} dalam {} keluarga",
        population.total, population.families
    );

    if !args.skip_finance {
        println!("\n--- Kas RT ---");
        let entry = service.record_transaction(
            &admin,
            NewTransaction {
                date: today,
                description: "Iuran Kebersihan".to_string(),
                amount: 250_000,
                kind: TransactionType::Income,
                category: "Iuran Warga".to_string(),
            },
        )?;
        println!(
            "Dicatat: {} {}",
            entry.description,
            rupiah_unsigned(entry.amount)
        );
        print_finance(&service.finance(&admin)?);

        match service.finance(&staff) {
            Err(RegistryServiceError::Access(_)) => {
                println!("{} tidak dapat membuka menu kas", staff.name)
            }
            Ok(_) => println!("{} dapat membuka menu kas", staff.name),
            Err(err) => return Err(err.into()),
        }
    }

    println!("\n--- Surat pengantar ---");
    let letter = service.letter(&staff, &newborn.id, "Surat Domisili", today)?;
    print!("{}", letter.text);

    println!("\n--- Kartu warga ---");
    print!("{}", service.member_card(&staff, &newborn.id)?.to_text());

    match service.remove_resident(&staff, &newborn.id) {
        Err(RegistryServiceError::Access(_)) => {
            println!("\n{} tidak berwenang menghapus data warga", staff.name)
        }
        Ok(_) => println!("\n{} menghapus data warga", staff.name),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
