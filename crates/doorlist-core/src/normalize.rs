//! Location format normalization.
//!
//! Source exports spell the same room as `a-pr-500`, `A-PR-500 ` or
//! `A-PR.500`. The canonical form is trimmed, uppercased, and uses a period
//! before the final room number: `BLOCK-BLOCK.DIGITS[LETTER]`.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cell::CellValue;

static LOCATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\b([A-Z0-9]+-[A-Z0-9]+)-([0-9]+[A-Z]?)\b")
    .expect("location pattern is a valid regex")
});

/// Trim, uppercase, and rewrite every `BLOCK-BLOCK-DIGITS[LETTER]` run to
/// `BLOCK-BLOCK.DIGITS[LETTER]`. Text that does not match passes through
/// after trimming and uppercasing.
pub fn normalize_text(raw: &str) -> String {
  let upper = raw.trim().to_uppercase();
  LOCATION_PATTERN.replace_all(&upper, "${1}.${2}").into_owned()
}

/// Normalize a cell. Only text is rewritten; numbers, booleans and blanks are
/// returned unchanged.
pub fn normalize_location(value: &CellValue) -> CellValue {
  match value {
    CellValue::Text(s) => CellValue::Text(normalize_text(s)),
    other => other.clone(),
  }
}

/// A location blueprint in canonical form.
///
/// The only constructors run the normalizer, so two `Blueprint`s are always
/// comparable; raw text never leaks into an equality check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Blueprint(String);

impl Blueprint {
  /// Normalize `raw`. Returns `None` when nothing is left after trimming.
  pub fn normalize(raw: &str) -> Option<Self> {
    let canonical = normalize_text(raw);
    (!canonical.is_empty()).then_some(Self(canonical))
  }

  /// Normalize a cell. Non-text cells keep their displayed value.
  pub fn from_cell(value: &CellValue) -> Option<Self> {
    normalize_location(value).as_text().and_then(|s| Self::normalize(&s))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Blueprint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl TryFrom<String> for Blueprint {
  type Error = &'static str;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Self::normalize(&value).ok_or("blueprint is empty")
  }
}

impl From<Blueprint> for String {
  fn from(value: Blueprint) -> Self { value.0 }
}
