//! Lenient parsing of free-form currency strings produced by the LLM.
//!
//! Handles the common shapes: `$12,500`, `€1.2M`, `USD 3 million`,
//! `$8,000 - $12,000`, `$8k–$12k`, `$8,000 to $12,000`.

/// Parse a single currency amount, ignoring symbols and thousands separators.
pub fn parse_amount(text: &str) -> Option<f64> {
    let lower = text.trim().to_lowercase();
    let start = lower.find(|c: char| c.is_ascii_digit())?;
    let rest = &lower[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == ',' || c == '.'))
        .unwrap_or(rest.len());

    let number: String = rest[..end].chars().filter(|c| *c != ',').collect();
    let value: f64 = number.trim_end_matches('.').parse().ok()?;

    // Scale words must stand alone: "$45,000 but" is not 45,000 billion.
    let suffix: String = rest[end..]
        .trim_start()
        .chars()
        .take_while(|c| c.is_alphabetic())
        .collect();
    let multiplier = match suffix.as_str() {
        "k" | "thousand" => 1e3,
        "m" | "mm" | "mn" | "million" | "millions" => 1e6,
        "b" | "bn" | "billion" | "billions" => 1e9,
        _ => 1.0,
    };

    Some(value * multiplier)
}

/// Parse a currency range into `(low, high)`, ordered.
pub fn parse_range(text: &str) -> Option<(f64, f64)> {
    let lower = text.to_lowercase();
    let (left, right) = ["–", "—", " to ", "-"]
        .iter()
        .find_map(|sep| lower.split_once(sep))?;

    let a = parse_amount(left)?;
    let b = parse_amount(right)?;
    Some(if a <= b { (a, b) } else { (b, a) })
}

/// Whether `point` lies inside `range` (inclusive).
///
/// `None` when either string cannot be parsed.
pub fn point_within_range(point: &str, range: &str) -> Option<bool> {
    let (low, high) = parse_range(range)?;
    let value = parse_amount(point)?;
    Some(low <= value && value <= high)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_plain_and_separated() {
        assert_eq!(parse_amount("$12,500"), Some(12_500.0));
        assert_eq!(parse_amount("USD 900"), Some(900.0));
        assert_eq!(parse_amount("$40,000,000"), Some(40_000_000.0));
        assert_eq!(parse_amount("€1,250.50"), Some(1_250.5));
    }

    #[test]
    fn test_parse_amount_suffixes() {
        assert_eq!(parse_amount("$1.2M"), Some(1_200_000.0));
        assert_eq!(parse_amount("$3 million"), Some(3_000_000.0));
        assert_eq!(parse_amount("$850k"), Some(850_000.0));
        assert_eq!(parse_amount("£2 billion"), Some(2_000_000_000.0));
    }

    #[test]
    fn test_parse_amount_ignores_following_words() {
        assert_eq!(parse_amount("$45,000 but could go higher"), Some(45_000.0));
        assert_eq!(parse_amount("$900 max"), Some(900.0));
        assert_eq!(parse_amount("$12 kilos of gold"), Some(12.0));
        assert_eq!(parse_amount("$2mm"), Some(2_000_000.0));
        assert_eq!(parse_amount("$3bn."), Some(3_000_000_000.0));
    }

    #[test]
    fn test_parse_amount_rejects_text() {
        assert_eq!(parse_amount("priceless"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_parse_range_shapes() {
        assert_eq!(parse_range("$8,000 - $12,000"), Some((8_000.0, 12_000.0)));
        assert_eq!(parse_range("$8k–$12k"), Some((8_000.0, 12_000.0)));
        assert_eq!(parse_range("$1M to $2.5M"), Some((1_000_000.0, 2_500_000.0)));
        assert_eq!(parse_range("$500-$800 USD"), Some((500.0, 800.0)));
    }

    #[test]
    fn test_parse_range_reordered() {
        assert_eq!(parse_range("$900 - $100"), Some((100.0, 900.0)));
    }

    #[test]
    fn test_parse_range_requires_two_bounds() {
        assert_eq!(parse_range("$5,000"), None);
        assert_eq!(parse_range("around - a lot"), None);
    }

    #[test]
    fn test_point_within_range() {
        assert_eq!(point_within_range("$9,500", "$8,000 - $12,000"), Some(true));
        assert_eq!(point_within_range("$8,000", "$8,000 - $12,000"), Some(true));
        assert_eq!(point_within_range("$12,000", "$8,000 - $12,000"), Some(true));
        assert_eq!(point_within_range("$15,000", "$8,000 - $12,000"), Some(false));
        assert_eq!(point_within_range("$1.1M", "$1M - $2M"), Some(true));
        assert_eq!(point_within_range("unknown", "$1M - $2M"), None);
    }
}
