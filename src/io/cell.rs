use std::fmt::{Display, Formatter};

/// Spreadsheet, CSV or text cell after loading.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim().is_empty() { Self::Empty } else { Self::Text(text) }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Numeric value, placeholders and malformed tokens give `None`.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Empty => None,
            Self::Number(number) => number.is_finite().then_some(*number),
            Self::Text(text) => parse_number(text),
        }
    }

    /// Lower-cased trimmed text for keyword matching.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.to_string().trim().to_lowercase()
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => write!(f, "{text}"),
        }
    }
}

impl From<f64> for Cell {
    fn from(number: f64) -> Self {
        Self::Number(number)
    }
}

impl From<Option<f64>> for Cell {
    fn from(number: Option<f64>) -> Self {
        number.map_or(Self::Empty, Self::Number)
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

impl From<&calamine::Data> for Cell {
    fn from(data: &calamine::Data) -> Self {
        use calamine::Data;

        match data {
            #[expect(clippy::cast_precision_loss)]
            Data::Int(number) => Self::Number(*number as f64),
            Data::Float(number) => Self::Number(*number),
            Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => {
                Self::text(text.as_str())
            }
            Data::DateTime(date_time) => Self::Number(date_time.as_f64()),
            Data::Bool(flag) => Self::Text(flag.to_string()),
            _ => Self::Empty,
        }
    }
}

/// Tokens bills put where a number is missing.
const PLACEHOLDERS: [&str; 9] = ["/", "\\", "na", "n/a", "-", "--", "—", "无", "null"];

/// Parse a numeric token, tolerating thousands separators.
///
/// Placeholders, malformed and non-finite tokens give `None`.
#[must_use]
pub fn parse_number(token: &str) -> Option<f64> {
    let token = token.trim();
    if token.is_empty()
        || PLACEHOLDERS.iter().any(|placeholder| token.eq_ignore_ascii_case(placeholder))
    {
        return None;
    }
    let cleaned =
        token.chars().filter(|c| !matches!(c, ',' | '，' | ' ' | '\u{a0}')).collect::<String>();
    cleaned.parse::<f64>().ok().filter(|number| number.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 1,234.50 "), Some(1234.5));
        assert_eq!(parse_number("1，000"), Some(1000.0));
        assert_eq!(parse_number("-12.5"), Some(-12.5));
        assert_eq!(parse_number("3e2"), Some(300.0));
    }

    #[test]
    fn test_placeholders_are_none() {
        for token in ["", "  ", "/", "NA", "n/a", "-", "--", "—", "无", "abc", "12kWh", "NaN", "inf"] {
            assert_eq!(parse_number(token), None, "{token:?}");
        }
    }

    #[test]
    fn test_cell_as_number() {
        assert_eq!(Cell::Number(2.0).as_number(), Some(2.0));
        assert_eq!(Cell::Number(f64::NAN).as_number(), None);
        assert_eq!(Cell::text("  ").as_number(), None);
        assert!(Cell::text("  ").is_empty());
        assert_eq!(Cell::text("42").as_number(), Some(42.0));
    }

    #[test]
    fn test_from_calamine() {
        assert_eq!(Cell::from(&calamine::Data::Int(3)), Cell::Number(3.0));
        assert_eq!(Cell::from(&calamine::Data::String("时段".into())), Cell::Text("时段".into()));
        assert_eq!(Cell::from(&calamine::Data::Empty), Cell::Empty);
    }
}
