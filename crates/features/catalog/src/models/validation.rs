//! Field constraint checks shared by every catalog model.
//!
//! Checks append human readable messages to a [`ValidationErrors`] map keyed by field name, so a
//! single pass reports every violation of a record at once.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Default length limit of short text columns.
pub const MAX_TEXT: usize = 254;
/// Length limit of icon identifiers and product conditions.
pub const MAX_SHORT_TEXT: usize = 50;
/// Length limit of stored image paths.
pub const MAX_IMAGE_PATH: usize = 100;
/// Length limit of external media URLs.
pub const MAX_URL: usize = 1024;

/// Digit limits of a fixed-point column: `digits` in total, `places` after the point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalSpec {
    pub digits: u32,
    pub places: u32,
}

/// Prices and costs.
pub const MONEY: DecimalSpec = DecimalSpec { digits: 8, places: 2 };
/// Product rating.
pub const RATING: DecimalSpec = DecimalSpec { digits: 6, places: 2 };
/// Subscription discount percentage.
pub const PERCENTAGE: DecimalSpec = DecimalSpec { digits: 5, places: 2 };

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message against `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }

    /// Moves every message of `other` here under `{prefix}.{field}`.
    pub fn extend_prefixed(&mut self, prefix: &str, other: Self) {
        for (field, messages) in other.0 {
            self.0.entry(format!("{prefix}.{field}")).or_default().extend(messages);
        }
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Required text must contain something other than whitespace.
    pub fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "This field cannot be blank.");
        }
    }

    /// Length limit counted in characters.
    pub fn max_length(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(value) = value {
            let length = value.chars().count();
            if length > max {
                self.add(
                    field,
                    format!("Ensure this value has at most {max} characters (it has {length})."),
                );
            }
        }
    }

    /// Required text with a length limit.
    pub fn text(&mut self, field: &str, value: &str, max: usize) {
        self.require(field, value);
        self.max_length(field, Some(value), max);
    }

    /// Fixed-point digit limits. Trailing zeros do not count as decimal places.
    pub fn decimal(&mut self, field: &str, value: Option<Decimal>, spec: DecimalSpec) {
        let Some(value) = value else { return };
        let normalized = value.normalize();
        let places = normalized.scale();
        let whole_digits = count_digits(normalized.trunc().abs());
        let max_whole = spec.digits - spec.places;

        if places + whole_digits > spec.digits {
            self.add(
                field,
                format!("Ensure that there are no more than {} digits in total.", spec.digits),
            );
        }
        if places > spec.places {
            self.add(
                field,
                format!("Ensure that there are no more than {} decimal places.", spec.places),
            );
        }
        if whole_digits > max_whole {
            self.add(
                field,
                format!("Ensure that there are no more than {max_whole} digits before the decimal point."),
            );
        }
    }

    /// Optional absolute `http`/`https` URL with a length limit.
    pub fn url(&mut self, field: &str, value: Option<&str>, max: usize) {
        let Some(value) = value else { return };
        self.max_length(field, Some(value), max);
        let valid = Url::parse(value)
            .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.has_host());
        if !valid {
            self.add(field, "Enter a valid URL.");
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Digits of the integral part; zero counts as no digits.
fn count_digits(whole: Decimal) -> u32 {
    let digits = whole.to_string().trim_start_matches('0').len();
    u32::try_from(digits).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn blank_and_long_text() {
        let mut errors = ValidationErrors::new();
        errors.text("name", "   ", MAX_TEXT);
        errors.text("brand", &"x".repeat(255), MAX_TEXT);
        errors.max_length("icon", Some("fa-guitar"), MAX_SHORT_TEXT);

        assert_eq!(errors.get("name").unwrap(), ["This field cannot be blank."]);
        assert!(errors.get("brand").unwrap()[0].contains("it has 255"));
        assert!(!errors.contains("icon"));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let mut errors = ValidationErrors::new();
        errors.max_length("icon", Some(&"é".repeat(50)), MAX_SHORT_TEXT);
        assert!(errors.is_empty());
    }

    #[test]
    fn decimal_limits() {
        let mut errors = ValidationErrors::new();
        errors.decimal("ok", Some(dec("999999.99")), MONEY);
        errors.decimal("trailing", Some(dec("12.5000")), MONEY);
        errors.decimal("places", Some(dec("1.999")), MONEY);
        errors.decimal("whole", Some(dec("1000000")), MONEY);
        errors.decimal("rating", Some(dec("10000.5")), RATING);
        errors.decimal("discount", Some(dec("100.00")), PERCENTAGE);
        errors.decimal("missing", None, MONEY);

        assert!(!errors.contains("ok"));
        assert!(!errors.contains("trailing"));
        assert!(!errors.contains("discount"));
        assert!(!errors.contains("missing"));
        assert!(errors.get("places").unwrap().iter().any(|m| m.contains("decimal places")));
        assert!(errors.get("whole").unwrap().iter().any(|m| m.contains("before the decimal")));
        assert!(errors.contains("rating"));
    }

    #[test]
    fn url_shape() {
        let mut errors = ValidationErrors::new();
        errors.url("image_url", Some("https://cdn.example.com/violin.jpg"), MAX_URL);
        errors.url("video_url", Some("ftp://example.com/clip.mp4"), MAX_URL);
        errors.url("sound_sample_url", Some("not a url"), MAX_URL);

        assert!(!errors.contains("image_url"));
        assert!(errors.contains("video_url"));
        assert!(errors.contains("sound_sample_url"));
    }

    #[test]
    fn display_lists_every_message() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "This field cannot be blank.");
        errors.add("price", "Too large.");
        assert_eq!(errors.to_string(), "name: This field cannot be blank.; price: Too large.");
        assert!(errors.into_result().is_err());
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn prefixed_messages_keep_their_field() {
        let mut row = ValidationErrors::new();
        row.add("name", "This field cannot be blank.");
        let mut batch = ValidationErrors::new();
        batch.extend_prefixed("abc", row);
        assert_eq!(batch.get("abc.name").unwrap(), ["This field cannot be blank."]);
        assert!(!batch.contains("name"));
    }
}
