use thiserror::Error;

/// Rejected user input. Always recoverable by correcting the input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A normalized city/country pair, valid by construction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationQuery {
    city: String,
    country_code: String,
}

impl LocationQuery {
    /// Normalize free-text input into a query.
    ///
    /// The city is trimmed and must not be empty. The country is stripped of
    /// everything but letters; at least two letters must remain, the first two
    /// are kept and uppercased ("de123" -> "DE").
    pub fn normalize(city_raw: &str, country_raw: &str) -> Result<Self, ValidationError> {
        let city = city_raw.trim();
        if city.is_empty() {
            return Err(ValidationError::new("city required"));
        }

        // Filter before uppercasing: "ß" uppercases to "SS" but is one letter
        let letters: Vec<char> = country_raw.chars().filter(|c| c.is_alphabetic()).collect();

        if letters.len() < 2 {
            return Err(ValidationError::new("country code must be 2 letters"));
        }

        Ok(Self {
            city: city.to_string(),
            country_code: letters.iter().take(2).map(|&c| uppercase_letter(c)).collect(),
        })
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// Provider query parameter, e.g. `Berlin,DE`
    pub fn as_provider_query(&self) -> String {
        format!("{},{}", self.city, self.country_code)
    }

    /// Key for caches: city lowercased, country as-is
    pub fn cache_key(&self) -> String {
        format!("{},{}", self.city.to_lowercase(), self.country_code)
    }
}

/// Uppercase a single letter, keeping it when the uppercase form is not one char
fn uppercase_letter(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_city_and_truncates_country() {
        let query = LocationQuery::normalize("  Berlin ", "de99").unwrap();
        assert_eq!(query.city(), "Berlin");
        assert_eq!(query.country_code(), "DE");
    }

    #[test]
    fn test_normalize_rejects_single_letter_country() {
        let err = LocationQuery::normalize("Paris", "f").unwrap_err();
        assert_eq!(err, ValidationError::new("country code must be 2 letters"));
    }

    #[test]
    fn test_normalize_rejects_empty_city() {
        let err = LocationQuery::normalize("   ", "DE").unwrap_err();
        assert_eq!(err.to_string(), "city required");
    }

    #[test]
    fn test_city_is_checked_before_country() {
        let err = LocationQuery::normalize("", "").unwrap_err();
        assert_eq!(err.to_string(), "city required");
    }

    #[test]
    fn test_country_keeps_first_two_filtered_letters() {
        let cases = [
            ("de123", "DE"),
            ("  gb ", "GB"),
            ("u.s.a", "US"),
            ("1f2r3", "FR"),
            ("Deutschland", "DE"),
            ("-_-at!!", "AT"),
        ];
        for (input, expected) in cases {
            let query = LocationQuery::normalize("City", input).unwrap();
            assert_eq!(query.country_code(), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_country_with_fewer_than_two_letters_is_rejected() {
        for input in ["", " ", "1", "12", "d", "d1", "..x..", "é", "ß", "\u{FB01}", " ß1 "] {
            assert!(
                LocationQuery::normalize("City", input).is_err(),
                "input {:?} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_country_keeps_non_ascii_letters() {
        let cases = [("dü", "DÜ"), ("é1s", "ÉS"), ("öSTERREICH", "ÖS"), ("ßa", "ßA")];
        for (input, expected) in cases {
            let query = LocationQuery::normalize("City", input).unwrap();
            assert_eq!(query.country_code(), expected, "input {:?}", input);
            assert_eq!(query.country_code().chars().count(), 2);
        }
    }

    #[test]
    fn test_provider_query_and_cache_key() {
        let query = LocationQuery::normalize("New York", "us").unwrap();
        assert_eq!(query.as_provider_query(), "New York,US");
        assert_eq!(query.cache_key(), "new york,US");
    }
}
