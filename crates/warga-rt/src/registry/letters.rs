//! Plain-text rendering of neighborhood letters and the membership card.
//!
//! Rendering never fails: unknown letter labels fall back to a generic
//! paragraph that names the requested purpose. The issue date is an explicit
//! argument so output is reproducible.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::domain::Resident;
use super::format::long_date;

const UNIT_LINE: &str = "RUKUN TETANGGA 05 RUKUN WARGA 03";
const DISTRICT_LINE: &str = "KELURAHAN MENTENG KECAMATAN MENTENG";
const SECRETARIAT_LINE: &str = "Sekretariat: Jl. Merpati No. 1, Jakarta Pusat";
const SIGNATORY: &str = "Budi Santoso";

pub const DOMISILI_PARAGRAPH: &str = "Menerangkan bahwa orang tersebut di atas adalah benar-benar warga kami yang berdomisili di lingkungan RT 05 RW 03 Kelurahan Menteng, Kecamatan Menteng, Jakarta Pusat.";
pub const SKCK_PARAGRAPH: &str = "Menerangkan bahwa orang tersebut adalah warga kami yang berkelakuan baik dan tidak pernah terlibat tindak pidana di lingkungan kami. Surat ini diberikan sebagai pengantar untuk pengurusan Surat Keterangan Catatan Kepolisian (SKCK).";
pub const UMKM_PARAGRAPH: &str = "Menerangkan bahwa yang bersangkutan benar memiliki usaha di lingkungan RT 05 RW 03. Surat ini diberikan untuk keperluan administrasi UMKM.";
pub const SKTM_PARAGRAPH: &str = "Menerangkan bahwa yang bersangkutan tergolong keluarga kurang mampu (Pra-Sejahtera) di lingkungan kami. Surat ini dibuat untuk keperluan pengajuan Bantuan Sosial / Keringanan Biaya Pendidikan.";

/// Letter bodies keyed by the exact service label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LetterKind {
    Domisili,
    Skck,
    Umkm,
    Sktm,
    Generic(String),
}

impl LetterKind {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Surat Domisili" => Self::Domisili,
            "Pengantar SKCK" => Self::Skck,
            "Surat Keterangan Usaha (UMKM)" => Self::Umkm,
            "Surat Tidak Mampu (Bansos)" => Self::Sktm,
            other => Self::Generic(other.to_string()),
        }
    }

    pub fn paragraph(&self) -> String {
        match self {
            Self::Domisili => DOMISILI_PARAGRAPH.to_string(),
            Self::Skck => SKCK_PARAGRAPH.to_string(),
            Self::Umkm => UMKM_PARAGRAPH.to_string(),
            Self::Sktm => SKTM_PARAGRAPH.to_string(),
            Self::Generic(label) => generic_paragraph(label),
        }
    }
}

pub fn generic_paragraph(label: &str) -> String {
    format!(
        "Menerangkan bahwa orang tersebut adalah benar warga RT 05 RW 03 Kelurahan Menteng. Surat ini diberikan untuk keperluan: {label}."
    )
}

#[derive(Debug, Clone, Serialize)]
pub struct Letter {
    pub label: String,
    pub title: &'static str,
    pub number_line: String,
    pub issued_on: NaiveDate,
    pub text: String,
}

pub fn render_letter(resident: &Resident, label: &str, issued_on: NaiveDate) -> Letter {
    let kind = LetterKind::from_label(label);
    let number_line = format!("Nomor: ... / RT.05 / ... / {}", issued_on.year());

    let mut lines = vec![
        UNIT_LINE.to_string(),
        DISTRICT_LINE.to_string(),
        SECRETARIAT_LINE.to_string(),
        "=".repeat(UNIT_LINE.len()),
        String::new(),
        "SURAT PENGANTAR".to_string(),
        number_line.clone(),
        String::new(),
        "Yang bertanda tangan di bawah ini Ketua RT 05 RW 03 Kelurahan Menteng, Kecamatan Menteng, menerangkan bahwa:".to_string(),
        String::new(),
    ];
    lines.extend(
        identity_rows(resident)
            .into_iter()
            .map(|(field, value)| format!("{field:<18}: {value}")),
    );
    lines.extend([
        String::new(),
        kind.paragraph(),
        String::new(),
        "Demikian surat pengantar ini dibuat untuk dapat dipergunakan sebagaimana mestinya."
            .to_string(),
        String::new(),
        format!("Jakarta, {}", long_date(issued_on)),
        "Ketua RT 05".to_string(),
        String::new(),
        SIGNATORY.to_string(),
    ]);
    let text = terminated(&lines);

    Letter {
        label: label.to_string(),
        title: "SURAT PENGANTAR",
        number_line,
        issued_on,
        text,
    }
}

/// Joins lines with a newline after each, including the last.
fn terminated(lines: &[String]) -> String {
    lines.iter().fold(String::new(), |mut text, line| {
        text.push_str(line);
        text.push('\n');
        text
    })
}

fn identity_rows(resident: &Resident) -> [(&'static str, String); 7] {
    [
        ("Nama Lengkap", resident.full_name.clone()),
        ("NIK", resident.nik.clone()),
        ("Tempat/Tgl Lahir", resident.birth_date.format("%Y-%m-%d").to_string()),
        ("Jenis Kelamin", resident.gender.label().to_string()),
        ("Pekerjaan", resident.occupation.clone()),
        ("Agama", "Islam".to_string()),
        ("Alamat", resident.address.clone()),
    ]
}

/// What selecting a service item does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceAction {
    Letter,
    ResidentForm,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceItem {
    pub id: &'static str,
    pub label: &'static str,
    pub action: ServiceAction,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceCategory {
    pub title: &'static str,
    pub items: Vec<ServiceItem>,
}

const fn letter(id: &'static str, label: &'static str) -> ServiceItem {
    ServiceItem {
        id,
        label,
        action: ServiceAction::Letter,
    }
}

/// Services offered on the citizen-services screen.
pub fn service_catalog() -> Vec<ServiceCategory> {
    vec![
        ServiceCategory {
            title: "Surat Pengantar",
            items: vec![
                letter("ktp_kk", "Pengantar KTP / KK"),
                letter("domisili", "Surat Domisili"),
                letter("skck", "Pengantar SKCK"),
                letter("nikah", "Pengantar Nikah"),
                letter("pindah", "Pengantar Pindah Masuk/Keluar"),
            ],
        },
        ServiceCategory {
            title: "Pendataan Warga",
            items: vec![
                ServiceItem {
                    id: "new_resident",
                    label: "Data Penduduk Baru",
                    action: ServiceAction::ResidentForm,
                },
                letter("birth_death", "Data Kelahiran & Kematian"),
                letter("vote", "Pendataan Pemilih (Pemilu)"),
            ],
        },
        ServiceCategory {
            title: "Legalitas Lingkungan",
            items: vec![
                letter("umkm", "Surat Keterangan Usaha (UMKM)"),
                letter("sktm", "Surat Tidak Mampu (Bansos)"),
            ],
        },
    ]
}

/// Printable resident membership card (`Kartu Tanda Warga`).
#[derive(Debug, Clone, Serialize)]
pub struct MemberCard {
    pub title: &'static str,
    pub unit: &'static str,
    pub full_name: String,
    pub nik: String,
    pub gender: &'static str,
    pub marital_status: &'static str,
    pub address: String,
    pub has_photo: bool,
    pub footer: &'static str,
}

impl MemberCard {
    pub fn for_resident(resident: &Resident) -> Self {
        Self {
            title: "KARTU TANDA WARGA",
            unit: "RT 05 / RW 03 KELURAHAN MENTENG",
            full_name: resident.full_name.to_uppercase(),
            nik: resident.nik.clone(),
            gender: resident.gender.label(),
            marital_status: resident.marital_status.label(),
            address: resident.address.clone(),
            has_photo: resident.photo.is_some(),
            footer: "Kartu ini berlaku selama menjadi warga RT 05/03",
        }
    }

    pub fn to_text(&self) -> String {
        let photo = if self.has_photo {
            "[foto terlampir]"
        } else {
            "[Foto 3x4]"
        };

        terminated(&[
            self.title.to_string(),
            self.unit.to_string(),
            photo.to_string(),
            format!("Nama Lengkap : {}", self.full_name),
            format!("NIK          : {}", self.nik),
            format!("Jenis Kelamin: {}", self.gender),
            format!("Status       : {}", self.marital_status),
            format!("Alamat       : {}", self.address),
            self.footer.to_string(),
            "Mengetahui, KETUA RT 05".to_string(),
        ])
    }
}
