//! Frequency ratios as typed by the user, e.g. `3/2` for a perfect fifth.
//!
//! Both sides are plain numbers, so `1.5/1` is as valid as `3/2`.

use std::fmt;

/// A ratio of two finite numbers with a nonzero denominator.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ratio {
    num: f64,
    denom: f64,
}

impl Ratio {
    /// Returns `None` if either side is not finite or the denominator is zero.
    ///
    /// ```
    /// use edo_trainer::ratio::Ratio;
    ///
    /// assert!(Ratio::new(3.0, 2.0).is_some());
    /// assert!(Ratio::new(3.0, 0.0).is_none());
    /// assert!(Ratio::new(f64::INFINITY, 2.0).is_none());
    /// ```
    pub fn new(num: f64, denom: f64) -> Option<Ratio> {
        if num.is_finite() && denom.is_finite() && denom != 0.0 {
            Some(Ratio { num, denom })
        } else {
            None
        }
    }

    pub fn numerator(self) -> f64 {
        self.num
    }

    pub fn denominator(self) -> f64 {
        self.denom
    }

    /// ```
    /// use edo_trainer::ratio::Ratio;
    ///
    /// assert_eq!("3/2".parse::<Ratio>().unwrap().value(), 1.5);
    /// assert_eq!("2.5/2".parse::<Ratio>().unwrap().value(), 1.25);
    /// ```
    pub fn value(self) -> f64 {
        self.num / self.denom
    }

    /// Whether this ratio can describe an interval between two audible frequencies.
    pub fn is_positive(self) -> bool {
        self.value() > 0.0
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.denom)
    }
}

/// An error which can be returned when parsing a ratio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRatioError(RatioErrorKind);

impl ParseRatioError {
    pub fn kind(&self) -> RatioErrorKind {
        self.0
    }
}

impl fmt::Display for ParseRatioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.0 {
            RatioErrorKind::InvalidNumber => "numerator or denominator is not a finite number",
            RatioErrorKind::Zero => "denominator is zero",
            RatioErrorKind::Malformed => "expected a ratio of the form <number>/<number>",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ParseRatioError {}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RatioErrorKind {
    /// The numerator or denominator is not a finite number.
    InvalidNumber,
    /// The denominator was zero
    Zero,
    /// The ratio was not of the form `<number>/<number>`.
    Malformed,
}

/// Parses ratios of the form `<number>/<number>`, tolerating whitespace around both numbers.
///
/// # Examples
///
/// ```
/// use edo_trainer::ratio::*;
///
/// assert_eq!(" 3 / 2 ".parse(), Ok(Ratio::new(3.0, 2.0).unwrap()));
/// assert_eq!("3/0".parse::<Ratio>().unwrap_err().kind(), RatioErrorKind::Zero);
/// assert_eq!("3".parse::<Ratio>().unwrap_err().kind(), RatioErrorKind::Malformed);
/// assert_eq!("3/2/1".parse::<Ratio>().unwrap_err().kind(), RatioErrorKind::Malformed);
/// assert_eq!("abc".parse::<Ratio>().unwrap_err().kind(), RatioErrorKind::Malformed);
/// assert_eq!("a/2".parse::<Ratio>().unwrap_err().kind(), RatioErrorKind::InvalidNumber);
/// ```
impl std::str::FromStr for Ratio {
    type Err = ParseRatioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 2 {
            return Err(ParseRatioError(RatioErrorKind::Malformed));
        }
        let numerator = parse_number(parts[0])?;
        let denominator = parse_number(parts[1])?;
        if denominator == 0.0 {
            return Err(ParseRatioError(RatioErrorKind::Zero));
        }
        Ratio::new(numerator, denominator).ok_or(ParseRatioError(RatioErrorKind::InvalidNumber))
    }
}

fn parse_number(text: &str) -> Result<f64, ParseRatioError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|x| x.is_finite())
        .ok_or(ParseRatioError(RatioErrorKind::InvalidNumber))
}

/// Canonical spelling of a ratio as typed by the user, with all whitespace removed.
/// Names for ratios are keyed by this spelling, so `3 / 2` and `3/2` share a name
/// while `6/4` keeps its own.
///
/// ```
/// use edo_trainer::ratio::canonical_text;
///
/// assert_eq!(canonical_text(" 3 / 2"), "3/2");
/// ```
pub fn canonical_text(s: &str) -> String {
    s.chars().filter(|ch| !ch.is_whitespace()).collect()
}
