use crate::error::{Result, TimelapseError};
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 解析 `YYYY-MM-DD` 格式的日期
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| TimelapseError::InvalidDateFormat(raw.to_string()))
}

/// 未指定日期時處理前一天的影像
pub fn default_date(today: NaiveDate) -> Result<NaiveDate> {
    today
        .pred_opt()
        .ok_or_else(|| TimelapseError::InvalidDateFormat(today.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        let date = parse_date("2025-12-21").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 12, 21).unwrap());
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(matches!(
            parse_date("21/12/2025"),
            Err(TimelapseError::InvalidDateFormat(_))
        ));
        assert!(parse_date("2025-02-30").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_default_date_crosses_year() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(
            default_date(today).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()
        );
    }
}
