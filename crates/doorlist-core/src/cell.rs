//! Typed spreadsheet cells.
//!
//! Ingestion coerces whatever the workbook holds into one of these variants;
//! nothing past that boundary inspects raw workbook data.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single scalar cell value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
  #[default]
  Empty,
  Text(String),
  Int(i64),
  Float(f64),
  Bool(bool),
}

impl CellValue {
  pub fn text(s: impl Into<String>) -> Self { Self::Text(s.into()) }

  /// `true` for [`CellValue::Empty`] and for text that is blank once trimmed.
  pub fn is_empty(&self) -> bool {
    match self {
      Self::Empty => true,
      Self::Text(s) => s.trim().is_empty(),
      _ => false,
    }
  }

  /// Trim surrounding whitespace from text cells. Other variants pass
  /// through untouched.
  pub fn trimmed(self) -> Self {
    match self {
      Self::Text(s) => {
        let t = s.trim();
        if t.len() == s.len() { Self::Text(s) } else { Self::Text(t.to_owned()) }
      }
      other => other,
    }
  }

  /// Render the cell the way a spreadsheet would display it.
  ///
  /// Blank cells yield `None`. Integral floats drop their fractional part so
  /// that `12.0` and `12` render identically.
  pub fn as_text(&self) -> Option<String> {
    if self.is_empty() {
      return None;
    }
    Some(self.to_string())
  }
}

impl fmt::Display for CellValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Empty => Ok(()),
      Self::Text(s) => f.write_str(s.trim()),
      Self::Int(n) => write!(f, "{n}"),
      Self::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 => {
        write!(f, "{}", *x as i64)
      }
      Self::Float(x) => write!(f, "{x}"),
      Self::Bool(true) => f.write_str("TRUE"),
      Self::Bool(false) => f.write_str("FALSE"),
    }
  }
}

impl From<&str> for CellValue {
  fn from(s: &str) -> Self { Self::Text(s.to_owned()) }
}

impl From<String> for CellValue {
  fn from(s: String) -> Self { Self::Text(s) }
}

impl From<i64> for CellValue {
  fn from(n: i64) -> Self { Self::Int(n) }
}

impl From<f64> for CellValue {
  fn from(x: f64) -> Self { Self::Float(x) }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
  fn from(v: Option<T>) -> Self { v.map_or(Self::Empty, Into::into) }
}
