use chrono::NaiveDate;
use crate::validate::ValidationError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_LEN: usize = 10;

pub fn encode_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses the leading `YYYY-MM-DD` of `text`, anything after it (time of day, offset) is dropped.
pub fn decode_date(field: &'static str, text: &str) -> Result<NaiveDate, ValidationError> {
    if text.len() < DATE_LEN {
        return Err(ValidationError::InvalidDate(field));
    }
    let Some(date_str) = text.get(..DATE_LEN) else {
        return Err(ValidationError::InvalidDate(field));
    };
    NaiveDate::parse_from_str(date_str, DATE_FORMAT)
        .map_err(|source| ValidationError::MalformedDate { field, source })
}
