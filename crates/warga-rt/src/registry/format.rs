use chrono::{Datelike, NaiveDate};

const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Whole-Rupiah amount with `.` thousands separators, e.g. `Rp 1.250.000`.
pub fn rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("-Rp {grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

pub fn rupiah_unsigned(amount: u64) -> String {
    rupiah(i64::try_from(amount).unwrap_or(i64::MAX))
}

/// Indonesian long date, e.g. `18 Oktober 2026`.
pub fn long_date(date: NaiveDate) -> String {
    let month = MONTHS[date.month0() as usize];
    format!("{} {} {}", date.day(), month, date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(rupiah(0), "Rp 0");
        assert_eq!(rupiah(999), "Rp 999");
        assert_eq!(rupiah(1_000), "Rp 1.000");
        assert_eq!(rupiah(5_000_000), "Rp 5.000.000");
        assert_eq!(rupiah(-350_000), "-Rp 350.000");
    }

    #[test]
    fn formats_long_dates() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date");
        assert_eq!(long_date(date), "18 Oktober 2026");
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).expect("valid date");
        assert_eq!(long_date(date), "5 Januari 2024");
    }
}
