// Number parsing
// Lenient decimal parsing for prices typed by users or sent by suppliers

/// Parse a decimal number, accepting `.` or a single decimal comma.
///
/// A comma is only read as the decimal separator when it is the only
/// separator and is followed by one or two digits. Anything that looks like
/// digit grouping ("1,000", "1,200.50") is rejected rather than guessed.
/// Non-finite results are rejected.
pub fn parse_decimal(input: &str) -> Option<f64> {
    let input = input.trim();

    let normalized = match input.split_once(',') {
        None => input.to_string(),
        Some((whole, fraction)) => {
            if input.contains('.')
                || fraction.contains(',')
                || fraction.is_empty()
                || fraction.len() > 2
                || !fraction.bytes().all(|b| b.is_ascii_digit())
            {
                return None;
            }
            format!("{}.{}", whole, fraction)
        }
    };

    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("120", Some(120.0) ; "integer")]
    #[test_case(" 99.5 ", Some(99.5) ; "point")]
    #[test_case("99,5", Some(99.5) ; "comma")]
    #[test_case("110,50", Some(110.5) ; "comma cents")]
    #[test_case("-3,5", Some(-3.5) ; "negative comma")]
    #[test_case("1,000", None ; "thousands grouping")]
    #[test_case("1,200.50", None ; "grouping with point")]
    #[test_case("1,2,3", None ; "several commas")]
    #[test_case("5,", None ; "trailing comma")]
    #[test_case("NaN", None ; "not a number")]
    #[test_case("inf", None ; "infinite")]
    #[test_case("", None ; "empty")]
    fn test_parse_decimal(input: &str, expected: Option<f64>) {
        assert_eq!(parse_decimal(input), expected);
    }
}
