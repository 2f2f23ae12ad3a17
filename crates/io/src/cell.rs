// Cell coercion
//
// Workbook cells carry no declared type: any of them may be a number, some
// text, or nothing. Extractors state which kind they expect per column and
// coerce through the helpers here, which never fail.

use calamine::Data;

/// A raw cell after decoding.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

/// Outcome of reading a cell as a number.
#[derive(Debug, Clone, PartialEq)]
pub enum Numeric {
    /// Missing, empty, or whitespace-only
    Absent,
    Value(f64),
    /// Present but not a finite number; carries the trimmed source text
    Invalid(String),
}

impl Numeric {
    pub fn value(&self) -> Option<f64> {
        match self {
            Numeric::Value(n) => Some(*n),
            _ => None,
        }
    }
}

impl Cell {
    /// True for missing cells and for blank text.
    pub fn is_absent(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Trimmed, non-empty text. Numbers are rendered without a trailing `.0`.
    pub fn text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Cell::Number(n) => Some(format_number(*n)),
        }
    }

    /// Trimmed, lower-cased, non-empty text.
    pub fn keyword(&self) -> Option<String> {
        self.text().map(|s| s.to_lowercase())
    }

    pub fn number(&self) -> Numeric {
        match self {
            Cell::Empty => Numeric::Absent,
            Cell::Number(n) if n.is_finite() => Numeric::Value(*n),
            Cell::Number(n) => Numeric::Invalid(n.to_string()),
            Cell::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Numeric::Absent;
                }
                match trimmed.parse::<f64>() {
                    Ok(n) if n.is_finite() => Numeric::Value(n),
                    _ => Numeric::Invalid(trimmed.to_string()),
                }
            }
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) => {
                if s.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(s.clone())
                }
            }
            Data::Float(n) => Cell::Number(*n),
            Data::Int(n) => Cell::Number(*n as f64),
            Data::Bool(b) => Cell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
            // Dates keep their serial value, as Excel stores them
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            // #DIV/0!, #REF! etc. carry no usable value
            Data::Error(_) => Cell::Empty,
        }
    }
}

/// Integers print without decimals; everything else uses shortest round-trip form.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
