use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest greeting the table accepts, in characters.
pub const MAX_TEXT_LEN: usize = 500;

/// A persisted greeting.
///
/// Serialized field names follow the column names PostgreSQL reports for the
/// unquoted schema. `createdat` is nullable in the table; rows written by
/// other clients may carry no timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Greeting {
    pub id: i32,
    pub text: String,
    #[serde(rename = "createdat")]
    #[sqlx(rename = "createdat")]
    pub created_at: Option<NaiveDateTime>,
}

/// Why submitted greeting text was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextRejection {
    #[error("Greeting text is required")]
    Missing,

    #[error("Greeting text must be at most {max} characters")]
    TooLong { max: usize, actual: usize },
}

/// Trim submitted text and check it against the column constraints.
pub fn normalize_text(raw: Option<&str>) -> Result<String, TextRejection> {
    let text = raw.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(TextRejection::Missing);
    }

    let actual = text.chars().count();
    if actual > MAX_TEXT_LEN {
        return Err(TextRejection::TooLong {
            max: MAX_TEXT_LEN,
            actual,
        });
    }

    Ok(text.to_string())
}
