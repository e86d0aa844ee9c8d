//! Password strength policy.
//!
//! A candidate password must contain a lowercase letter, an uppercase
//! letter, a digit and a symbol, and be 8 to 64 characters long. Every
//! rule is checked; a failing password reports all of its violations at
//! once, in a fixed order.

use std::fmt;

use unicode_general_category::{get_general_category, GeneralCategory};

/// Minimum number of counted characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum number of counted characters.
pub const MAX_PASSWORD_LENGTH: usize = 64;

/// A single rule a password failed.
///
/// Variants are declared in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PolicyViolation {
    /// No lowercase letter.
    LowercaseMissing,
    /// No uppercase letter.
    UppercaseMissing,
    /// No numeric character.
    DigitMissing,
    /// No punctuation or symbol character.
    SymbolMissing,
    /// Counted length outside `MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH`.
    LengthOutOfRange,
}

impl PolicyViolation {
    /// Returns the human-readable message for this violation.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::LowercaseMissing => "lowercase letter missing",
            Self::UppercaseMissing => "uppercase letter missing",
            Self::DigitMissing => "at least one numeric character required",
            Self::SymbolMissing => "special character missing",
            Self::LengthOutOfRange => "password length must be between 8 to 64 characters long",
        }
    }
}

impl fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A password that failed one or more rules.
///
/// Displays as the comma-joined messages of every violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyError {
    violations: Vec<PolicyViolation>,
}

impl PolicyError {
    /// The violated rules, in reporting order. Never empty.
    #[must_use]
    pub fn violations(&self) -> &[PolicyViolation] {
        &self.violations
    }

    /// Returns `true` if `violation` is among the failures.
    #[must_use]
    pub fn contains(&self, violation: PolicyViolation) -> bool {
        self.violations.contains(&violation)
    }
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(violation.message())?;
        }
        Ok(())
    }
}

impl std::error::Error for PolicyError {}

/// How a single character counts toward the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Digit,
    Uppercase,
    Lowercase,
    Symbol,
    /// Counts toward the length only: caseless letters and plain spaces.
    Other,
}

/// Classifies `ch` by its Unicode general category.
///
/// Returns `None` for characters that do not count at all: format
/// characters, combining marks, private-use, control and whitespace
/// other than `' '`.
fn classify(ch: char) -> Option<CharClass> {
    use GeneralCategory as G;

    match get_general_category(ch) {
        G::DecimalNumber | G::LetterNumber | G::OtherNumber => Some(CharClass::Digit),
        G::UppercaseLetter => Some(CharClass::Uppercase),
        G::LowercaseLetter => Some(CharClass::Lowercase),
        G::ConnectorPunctuation
        | G::DashPunctuation
        | G::OpenPunctuation
        | G::ClosePunctuation
        | G::InitialPunctuation
        | G::FinalPunctuation
        | G::OtherPunctuation
        | G::MathSymbol
        | G::CurrencySymbol
        | G::ModifierSymbol
        | G::OtherSymbol => Some(CharClass::Symbol),
        G::TitlecaseLetter | G::ModifierLetter | G::OtherLetter => Some(CharClass::Other),
        _ if ch == ' ' => Some(CharClass::Other),
        _ => None,
    }
}

/// Checks `password` against every rule.
///
/// Letters, digits, punctuation, symbols and plain spaces count toward
/// the length. Everything else is ignored, including other whitespace,
/// control and format characters, combining marks and private-use code
/// points.
///
/// # Errors
///
/// Returns a [`PolicyError`] listing every violated rule.
///
/// # Examples
///
/// ```
/// use nearby_core::credential::{validate_password, PolicyViolation};
///
/// assert!(validate_password("Abcdef1!").is_ok());
///
/// let err = validate_password("abc").unwrap_err();
/// assert_eq!(
///     err.violations(),
///     [
///         PolicyViolation::UppercaseMissing,
///         PolicyViolation::DigitMissing,
///         PolicyViolation::SymbolMissing,
///         PolicyViolation::LengthOutOfRange,
///     ]
/// );
/// ```
pub fn validate_password(password: &str) -> Result<(), PolicyError> {
    let mut lowercase = false;
    let mut uppercase = false;
    let mut digit = false;
    let mut symbol = false;
    let mut length = 0_usize;

    for class in password.chars().filter_map(classify) {
        match class {
            CharClass::Digit => digit = true,
            CharClass::Uppercase => uppercase = true,
            CharClass::Lowercase => lowercase = true,
            CharClass::Symbol => symbol = true,
            CharClass::Other => {}
        }
        length += 1;
    }

    let checks = [
        (lowercase, PolicyViolation::LowercaseMissing),
        (uppercase, PolicyViolation::UppercaseMissing),
        (digit, PolicyViolation::DigitMissing),
        (symbol, PolicyViolation::SymbolMissing),
        (
            (MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length),
            PolicyViolation::LengthOutOfRange,
        ),
    ];

    let violations: Vec<_> = checks
        .into_iter()
        .filter(|(passed, _)| !passed)
        .map(|(_, violation)| violation)
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(PolicyError { violations })
    }
}
