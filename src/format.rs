// Display helpers for prices and dates (Brazilian conventions)

use chrono::{DateTime, Utc};

pub const CURRENCY_SYMBOL: &str = "R$";

// 1299 -> "1.299"
pub fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn format_price(amount: u64) -> String {
    format!("{} {}", CURRENCY_SYMBOL, group_thousands(amount))
}

// dd/mm/yyyy, always in UTC
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn pax_label(pax: u32) -> &'static str {
    if pax > 1 {
        "pessoas"
    } else {
        "pessoa"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    #[test_case(0, "R$ 0"; "#1 zero")]
    #[test_case(50, "R$ 50"; "#2 tens")]
    #[test_case(150, "R$ 150"; "#3 hundreds")]
    #[test_case(1299, "R$ 1.299"; "#4 thousands")]
    #[test_case(35000, "R$ 35.000"; "#5 package price")]
    #[test_case(1234567, "R$ 1.234.567"; "#6 millions")]
    fn test_format_price(amount: u64, expected: &str) {
        assert_eq!(format_price(amount), expected);
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2026, 3, 7, 23, 15, 0).unwrap();
        assert_eq!(format_date(&date), "07/03/2026");
    }

    #[test]
    fn test_pax_label() {
        assert_eq!(pax_label(1), "pessoa");
        assert_eq!(pax_label(0), "pessoa");
        assert_eq!(pax_label(3), "pessoas");
    }
}
