//! Validated primitive types shared across DocFlex crates.
//!
//! Each type checks its invariant once at construction, so code holding a value
//! can rely on it without re-validating.

/// Minimum number of digits in a contact number.
pub const CONTACT_NUMBER_MIN_DIGITS: usize = 9;

/// Maximum number of digits in a contact number.
pub const CONTACT_NUMBER_MAX_DIGITS: usize = 12;

/// Errors that can occur when creating validated text types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The input is not a plausible email address
    #[error("Invalid email address")]
    InvalidEmail,
    /// The input contains something other than ASCII digits
    #[error("Contact number must contain digits only")]
    NonNumeric,
    /// The input has too few or too many digits
    #[error("Contact number must be between {min} and {max} digits")]
    DigitCount { min: usize, max: usize },
}

/// Required form text: trimmed, with at least one visible character.
///
/// Names, addresses and reference ids on the console forms are all of this
/// shape; a value made only of spaces counts as missing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Trims `input`, failing with [`TextError::Empty`] when nothing is left.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        match input.as_ref().trim() {
            "" => Err(TextError::Empty),
            text => Ok(Self(text.to_owned())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An email address with a minimal structural check.
///
/// Accepts `local@domain.tld` shapes: exactly one `@`, a non-empty local part,
/// a domain containing a dot that neither starts nor ends the domain, and no
/// whitespace anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parses and trims an email address.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` for blank input and `TextError::InvalidEmail`
    /// when the structure is wrong.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(TextError::InvalidEmail);
        }

        let mut parts = trimmed.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(TextError::InvalidEmail);
        };

        let domain_ok = domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !domain.contains("..");
        if local.is_empty() || !domain_ok {
            return Err(TextError::InvalidEmail);
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A phone number made of ASCII digits only, with a bounded length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContactNumber(String);

impl ContactNumber {
    /// Parses a contact number.
    ///
    /// Surrounding whitespace is trimmed; anything else that is not a digit is
    /// rejected rather than stripped.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TextError::NonNumeric);
        }
        if !(CONTACT_NUMBER_MIN_DIGITS..=CONTACT_NUMBER_MAX_DIGITS).contains(&trimmed.len()) {
            return Err(TextError::DigitCount {
                min: CONTACT_NUMBER_MIN_DIGITS,
                max: CONTACT_NUMBER_MAX_DIGITS,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! string_newtype_impls {
    ($ty:ident, $ctor:path) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $ctor(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

string_newtype_impls!(NonEmptyText, NonEmptyText::new);
string_newtype_impls!(EmailAddress, EmailAddress::parse);
string_newtype_impls!(ContactNumber, ContactNumber::parse);
