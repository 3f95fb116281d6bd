use crate::{Error, Result};

/// Parses a formatted Steam price such as `₹ 1,234.56`, `1,23€` or `0,--€`.
///
/// Currency symbols, codes and whitespace are dropped. When both `.` and `,` occur the
/// last one is the decimal separator. A lone `,` is decimal unless exactly three
/// digits follow it, and repeated separators are always thousands separators.
pub fn parse_price(raw: &str) -> Result<f64> {
    let digits: String = raw
        .replace("--", "00")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    let digits = digits.trim_matches(|c| c == '.' || c == ',');

    let normalized = match (digits.rfind('.'), digits.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => digits.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => digits.replace(',', ""),
        (None, Some(comma)) => {
            let decimals = digits.len() - comma - 1;
            if digits.matches(',').count() == 1 && decimals != 3 {
                digits.replace(',', ".")
            } else {
                digits.replace(',', "")
            }
        }
        (Some(_), None) if digits.matches('.').count() > 1 => digits.replace('.', ""),
        _ => digits.to_string(),
    };

    normalized
        .parse::<f64>()
        .map_err(|_| Error::InvalidPrice(raw.to_string()))
}
