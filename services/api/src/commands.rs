use crate::infra::{gemini_assistant, parse_date, registry_service};
use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;
use warga_rt::config::{AppConfig, SettingsStore};
use warga_rt::error::AppError;
use warga_rt::export::{
    export_file_name, resident_table, transaction_table, write_table, ExportFormat, ExportKind,
    SheetSyncClient, SyncError,
};
use warga_rt::registry::format::{long_date, rupiah, rupiah_unsigned};
use warga_rt::registry::stats::{age_on, DashboardStats, FinanceSummary};
use warga_rt::registry::{
    AuthError, RegistryServiceError, Resident, ResidentId, User, UserDirectory,
};

#[derive(Args, Debug, Default)]
pub(crate) struct ResidentsArgs {
    /// Case-insensitive match on name, NIK, or address
    #[arg(long, short)]
    pub(crate) query: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct StatsArgs {
    /// Reference date for ages (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct LetterArgs {
    /// Resident id
    #[arg(long)]
    pub(crate) id: String,
    /// Letter label, e.g. "Surat Domisili" or "Pengantar SKCK"
    #[arg(long, default_value = "Surat Domisili")]
    pub(crate) label: String,
    /// Issue date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct CardArgs {
    /// Resident id
    #[arg(long)]
    pub(crate) id: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum ExportKindArg {
    Residents,
    Transactions,
}

impl From<ExportKindArg> for ExportKind {
    fn from(value: ExportKindArg) -> Self {
        match value {
            ExportKindArg::Residents => ExportKind::Residents,
            ExportKindArg::Transactions => ExportKind::Transactions,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum ExportFormatArg {
    Xlsx,
    Csv,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(value: ExportFormatArg) -> Self {
        match value {
            ExportFormatArg::Xlsx => ExportFormat::Xlsx,
            ExportFormatArg::Csv => ExportFormat::Csv,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    #[arg(long, value_enum, default_value = "residents")]
    pub(crate) kind: ExportKindArg,
    #[arg(long, value_enum, default_value = "xlsx")]
    pub(crate) format: ExportFormatArg,
    /// Directory receiving the file
    #[arg(long, default_value = ".")]
    pub(crate) out_dir: PathBuf,
    /// Export only residents matching this search (residents only)
    #[arg(long, short)]
    pub(crate) query: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SyncArgs {
    /// Web-app URL; falls back to the saved setting
    #[arg(long)]
    pub(crate) url: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct AskArgs {
    /// Question for the assistant
    #[arg(required = true, num_args = 1..)]
    pub(crate) question: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum SettingsCommand {
    /// Print the saved settings
    Show,
    /// Save the spreadsheet sync URL; an empty value clears it
    SetSyncUrl { url: String },
}

fn actor(username: &str) -> Result<User, AppError> {
    let users = UserDirectory::demo();
    let user = users
        .find(username)
        .cloned()
        .ok_or(AuthError::UnknownUser)?;
    Ok(user)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn run_residents(username: &str, args: ResidentsArgs) -> Result<(), AppError> {
    let actor = actor(username)?;
    let service = registry_service(true);
    let residents = service.residents(&actor, args.query.as_deref())?;

    if residents.is_empty() {
        println!("Tidak ada warga yang cocok.");
        return Ok(());
    }

    let today = today();
    for resident in &residents {
        print_resident(resident, today);
    }
    println!("{} warga", residents.len());
    Ok(())
}

fn print_resident(resident: &Resident, today: NaiveDate) {
    println!(
        "{:>3}  {}  {:<24} {:<10} {:>3} th  {}",
        resident.id,
        resident.nik,
        resident.full_name,
        resident.gender.label(),
        age_on(resident.birth_date, today),
        resident.address
    );
}

pub(crate) fn run_stats(username: &str, args: StatsArgs) -> Result<(), AppError> {
    let actor = actor(username)?;
    let service = registry_service(true);
    let today = args.today.unwrap_or_else(today);

    print_dashboard(&service.dashboard(&actor, today)?);

    match service.finance(&actor) {
        Ok(summary) => print_finance(&summary),
        Err(RegistryServiceError::Access(_)) => {
            println!("\n(ringkasan kas hanya untuk admin)");
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

pub(crate) fn print_dashboard(stats: &DashboardStats) {
    let population = &stats.population;
    println!("Total warga    : {}", population.total);
    println!("Kepala keluarga: {}", population.families);
    for entry in &stats.genders {
        println!("{:<15}: {}", entry.label, entry.count);
    }
    println!("Sebaran usia:");
    for bucket in &stats.age_distribution {
        println!("  {:<6} {}", bucket.label, bucket.count);
    }
}

pub(crate) fn print_finance(summary: &FinanceSummary) {
    let totals = &summary.totals;
    println!("\nKas RT:");
    println!("  Pemasukan  : {}", rupiah_unsigned(totals.income));
    println!("  Pengeluaran: {}", rupiah_unsigned(totals.expense));
    println!("  Saldo      : {}", rupiah(totals.balance));
    for category in &summary.categories {
        println!(
            "  - {} / {}: {} ({} transaksi)",
            category.kind.label(),
            category.category,
            rupiah_unsigned(category.total),
            category.entries
        );
    }
}

pub(crate) fn run_letter(username: &str, args: LetterArgs) -> Result<(), AppError> {
    let actor = actor(username)?;
    let service = registry_service(true);
    let issued_on = args.date.unwrap_or_else(today);
    let letter = service.letter(&actor, &ResidentId::new(args.id), &args.label, issued_on)?;
    print!("{}", letter.text);
    Ok(())
}

pub(crate) fn run_card(username: &str, args: CardArgs) -> Result<(), AppError> {
    let actor = actor(username)?;
    let service = registry_service(true);
    let card = service.member_card(&actor, &ResidentId::new(args.id))?;
    print!("{}", card.to_text());
    Ok(())
}

pub(crate) fn run_export(username: &str, args: ExportArgs) -> Result<(), AppError> {
    let actor = actor(username)?;
    let service = registry_service(true);
    let kind = ExportKind::from(args.kind);
    let format = ExportFormat::from(args.format);

    let table = match kind {
        ExportKind::Residents => {
            resident_table(&service.exportable_residents(&actor, args.query.as_deref())?)
        }
        ExportKind::Transactions => transaction_table(&service.exportable_transactions(&actor)?),
    };
    let bytes = write_table(&table, format)?;

    let path = args.out_dir.join(export_file_name(kind, format, today()));
    std::fs::write(&path, bytes)?;
    println!("{} baris ditulis ke {}", table.rows.len(), path.display());
    Ok(())
}

pub(crate) async fn run_sync(username: &str, args: SyncArgs) -> Result<(), AppError> {
    let actor = actor(username)?;
    let service = registry_service(true);
    let residents = service.sync_snapshot(&actor)?;

    let endpoint = match args.url {
        Some(url) => url,
        None => {
            let config = AppConfig::load()?;
            SettingsStore::new(config.settings_path)
                .load()?
                .sheet_sync_url
                .ok_or(SyncError::MissingEndpoint)?
        }
    };

    let response = SheetSyncClient::new()
        .sync_residents(&endpoint, &residents)
        .await?;
    println!("{} warga tersinkron: {}", residents.len(), response);
    Ok(())
}

pub(crate) async fn run_ask(username: &str, args: AskArgs) -> Result<(), AppError> {
    let actor = actor(username)?;
    let config = AppConfig::load()?;
    let service = registry_service(true);
    let residents = service.assistant_context(&actor)?;

    let question = args.question.join(" ");
    let reply = gemini_assistant(&config)
        .respond(&question, &residents)
        .await;

    if reply.is_error {
        eprintln!("{}", reply.text);
    } else {
        println!("{}", reply.text);
    }
    Ok(())
}

pub(crate) fn run_settings(username: &str, command: SettingsCommand) -> Result<(), AppError> {
    let actor = actor(username)?;
    registry_service(false).authorize_settings(&actor)?;

    let config = AppConfig::load()?;
    let store = SettingsStore::new(config.settings_path);

    let settings = match command {
        SettingsCommand::Show => store.load()?,
        SettingsCommand::SetSyncUrl { url } => store.set_sync_url(&url)?,
    };

    println!("Berkas pengaturan: {}", store.path().display());
    match settings.sheet_sync_url {
        Some(url) => println!("URL sinkronisasi: {url}"),
        None => println!("URL sinkronisasi belum diatur"),
    }
    println!("Tanggal: {}", long_date(today()));
    Ok(())
}
