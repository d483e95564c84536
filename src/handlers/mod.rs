pub mod admin_handlers;
pub mod auth_handlers;
pub mod jenis_paket_handlers;
pub mod makanan_handlers;

use crate::errors::ApiError;

/// Parse id numerik dari path. Gagal -> 400 "Invalid ID",
/// tanpa menyentuh database sama sekali.
pub(crate) fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ApiError::BadRequest("Invalid ID".to_string()))
}

/// Field string wajib: harus ada dan non-kosong setelah trim.
pub(crate) fn required_field<'a>(
    value: &'a Option<String>,
    message: &str,
) -> Result<&'a str, ApiError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::BadRequest(message.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_digits() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id(" 7 ").unwrap(), 7);
    }

    #[test]
    fn parse_id_rejects_non_numeric() {
        let err = parse_id("abc").unwrap_err();
        assert_eq!(err.to_string(), "Invalid ID");
        assert!(parse_id("").is_err());
        assert!(parse_id("12.5").is_err());
        assert!(parse_id("9999999999999").is_err());
    }

    #[test]
    fn required_field_rejects_missing_and_blank() {
        assert!(required_field(&None, "Missing required fields").is_err());
        assert!(required_field(&Some("   ".into()), "Missing required fields").is_err());
        assert_eq!(
            required_field(&Some(" a@b.com ".into()), "x").unwrap(),
            "a@b.com"
        );
    }
}
