//! Star rating from the rating control's accessible label.

use crate::error::{Error, Result};

/// Rating value from a label such as `"4 stars"` or `"Rated 5.0 out of 5"`.
///
/// The first ASCII digit is the rating. A label without a digit, or whose
/// first digit is outside `1..=5`, is [`Error::RatingUnparseable`].
pub fn parse_rating(label: &str) -> Result<u8> {
    let digit = label
        .chars()
        .find_map(|c| c.to_digit(10))
        .ok_or_else(|| Error::RatingUnparseable(label.to_string()))?;

    match u8::try_from(digit) {
        Ok(value @ 1..=5) => Ok(value),
        _ => Err(Error::RatingUnparseable(label.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating("5 stars").unwrap(), 5);
        assert_eq!(parse_rating(" 1 star ").unwrap(), 1);
        assert_eq!(parse_rating("Rated 4.0 out of 5").unwrap(), 4);
    }

    #[test]
    fn test_no_digit() {
        let err = parse_rating("stars").unwrap_err();
        assert!(matches!(err, Error::RatingUnparseable(label) if label == "stars"));
    }

    #[test]
    fn test_out_of_range() {
        assert!(parse_rating("0 stars").is_err());
        assert!(parse_rating("7 stars").is_err());
    }
}
