use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::NaiveDate;

use super::domain::{NewResident, NewTransaction};

/// Largest decoded photo accepted at the form boundary.
pub const MAX_PHOTO_BYTES: usize = 2 * 1024 * 1024;

pub const NIK_LENGTH: usize = 16;

/// Errors raised when a form payload fails boundary checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("NIK harus 16 digit angka (found {found:?})")]
    InvalidNik { found: String },
    #[error("field `{0}` is required")]
    MissingField(&'static str),
    #[error("photo exceeds the 2 MB limit ({bytes} bytes)")]
    PhotoTooLarge { bytes: usize },
    #[error("photo is not valid base64 image data")]
    PhotoEncoding,
    #[error("birth date {0} is in the future")]
    BirthDateInFuture(NaiveDate),
}

/// Boundary checks for a resident form. NIK, name, birth date and address are
/// required; occupation and phone number are free text and may be blank.
/// `today` bounds the birth date.
pub fn validate_resident(draft: &NewResident, today: NaiveDate) -> Result<(), ValidationError> {
    validate_nik(&draft.nik)?;
    require("fullName", &draft.full_name)?;
    if draft.birth_date > today {
        return Err(ValidationError::BirthDateInFuture(draft.birth_date));
    }
    require("address", &draft.address)?;

    if let Some(photo) = draft.photo.as_deref() {
        validate_photo(photo)?;
    }

    Ok(())
}

pub fn validate_transaction(draft: &NewTransaction) -> Result<(), ValidationError> {
    require("description", &draft.description)?;
    require("category", &draft.category)?;
    Ok(())
}

pub fn validate_nik(nik: &str) -> Result<(), ValidationError> {
    if nik.len() == NIK_LENGTH && nik.bytes().all(|byte| byte.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidNik {
            found: nik.to_string(),
        })
    }
}

/// Checks the decoded size of a photo given either as a data URL or as raw base64.
pub fn validate_photo(photo: &str) -> Result<(), ValidationError> {
    let encoded = match photo.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => photo,
    };
    let encoded = encoded.trim();

    // Reject before decoding anything that cannot fit the limit.
    let estimated = encoded.len() / 4 * 3;
    if estimated > MAX_PHOTO_BYTES + 3 {
        return Err(ValidationError::PhotoTooLarge { bytes: estimated });
    }

    let decoded = STANDARD
        .decode(encoded)
        .map_err(|_| ValidationError::PhotoEncoding)?;
    if decoded.len() > MAX_PHOTO_BYTES {
        return Err(ValidationError::PhotoTooLarge {
            bytes: decoded.len(),
        });
    }

    Ok(())
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}
