pub mod csv;
pub mod json;

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::TripRecord;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("csv: {0}")]
    Csv(#[from] csv::TripCsvError),
    #[error("json: {0}")]
    Json(#[from] json::TripJsonError),
    #[error("unable to detect trip data format")]
    UnknownFormat,
}

/// Auto-detect the trip data format and parse it.
///
/// JSON exports start with an array or object; anything else is treated as
/// CSV, the log's oldest export format.
pub fn parse_auto(data: &[u8]) -> Result<Vec<TripRecord>, IngestError> {
    let first = data
        .iter()
        .copied()
        .find(|b| !b.is_ascii_whitespace());
    match first {
        Some(b'[') | Some(b'{') => Ok(json::parse_json(data)?),
        Some(_) => Ok(csv::parse_csv(data)?),
        None => Err(IngestError::UnknownFormat),
    }
}

/// Date formats seen across export iterations, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d %b %Y"];

pub(crate) fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_json_and_csv() {
        let json = br#" [{"date": "2023-05-01", "event_type": "flight"}]"#;
        assert_eq!(parse_auto(json).expect("json parses").len(), 1);

        let csv = b"date,event_type\n2023-05-01,flight\n";
        assert_eq!(parse_auto(csv).expect("csv parses").len(), 1);

        assert!(matches!(
            parse_auto(b"   "),
            Err(IngestError::UnknownFormat)
        ));
    }

    #[test]
    fn date_formats() {
        let expected: NaiveDate = "2023-05-01".parse().expect("date");
        assert_eq!(parse_date("2023-05-01"), Some(expected));
        assert_eq!(parse_date("05/01/2023"), Some(expected));
        assert_eq!(parse_date("01 May 2023"), Some(expected));
        assert_eq!(parse_date("first of May"), None);
    }
}
