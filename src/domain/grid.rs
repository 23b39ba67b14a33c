//! Storage-agnostic criteria shared by grid queries: typed filters, search and
//! sort order over a set of queryable fields.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Direction of a grid sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub const fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Value type of a queryable field, used to parse raw filter input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Text,
    Boolean,
    DateTime,
}

/// A column a grid query can filter, search or sort on.
pub trait GridField: Copy {
    fn kind(&self) -> FieldKind;
}

/// Comparison applied by a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterCondition {
    Eq,
    Neq,
    Like,
    NotLike,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl FilterCondition {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "eq" => Some(Self::Eq),
            "neq" => Some(Self::Neq),
            "like" => Some(Self::Like),
            "nlike" => Some(Self::NotLike),
            "gt" => Some(Self::Gt),
            "lt" => Some(Self::Lt),
            "gte" => Some(Self::Gte),
            "lte" => Some(Self::Lte),
            _ => None,
        }
    }

    /// Query string spelling of the condition.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Like => "like",
            Self::NotLike => "nlike",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Gte => "gte",
            Self::Lte => "lte",
        }
    }
}

/// A filter operand parsed according to the field kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Integer(i64),
    Text(String),
    Boolean(bool),
    DateTime(NaiveDateTime),
}

impl FilterValue {
    /// Parses raw request input. Returns `None` for input that does not fit
    /// the field kind, which callers treat as "no filter".
    pub fn parse(kind: FieldKind, raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match kind {
            FieldKind::Integer => raw.parse().ok().map(FilterValue::Integer),
            FieldKind::Text => Some(FilterValue::Text(raw.to_string())),
            FieldKind::Boolean => match raw.to_ascii_lowercase().as_str() {
                "1" | "true" | "enabled" => Some(FilterValue::Boolean(true)),
                "0" | "false" | "disabled" => Some(FilterValue::Boolean(false)),
                _ => None,
            },
            FieldKind::DateTime => NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .or_else(|| {
                    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                        .ok()
                        .and_then(|date| date.and_hms_opt(0, 0, 0))
                })
                .map(FilterValue::DateTime),
        }
    }

    /// Text form used for substring matching.
    pub fn as_text(&self) -> String {
        match self {
            FilterValue::Integer(value) => value.to_string(),
            FilterValue::Text(value) => value.clone(),
            FilterValue::Boolean(value) => i32::from(*value).to_string(),
            FilterValue::DateTime(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// A single AND-ed predicate on a field.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFilter<F> {
    pub field: F,
    pub condition: FilterCondition,
    pub value: FilterValue,
}

/// Free-text search over several fields, matching when any field contains
/// the term.
#[derive(Debug, Clone, PartialEq)]
pub struct Search<F> {
    pub term: String,
    pub fields: Vec<F>,
}
