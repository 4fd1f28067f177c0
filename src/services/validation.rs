//! Input checking shared by the write services: a field-error collector and
//! the lenient list-parameter parsing used by the list endpoints.

use sea_orm::ActiveEnum;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::entities::types::parse_active_enum;
use crate::error::{AppError, FieldError};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// Collects every offending field so one response can report them all.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Trimmed value of a required text field; records `"{label} is required"`
    /// when it is absent or blank.
    pub fn required_text(&mut self, field: &str, label: &str, value: Option<&str>) -> String {
        let trimmed = value.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            self.push(field, format!("{label} is required"));
        }
        trimmed.to_string()
    }

    /// Trims each entry and rejects the list if any entry is blank.
    pub fn text_list(&mut self, field: &str, values: Option<&[String]>) -> Vec<String> {
        let values = values.unwrap_or_default();
        if values.iter().any(|value| value.trim().is_empty()) {
            self.push(field, "Entries must not be blank");
        }
        values
            .iter()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .collect()
    }

    /// Parses an enum column value, falling back to `default` when absent.
    pub fn enum_value<E>(&mut self, field: &str, raw: Option<&str>, default: E) -> E
    where
        E: ActiveEnum<Value = String>,
    {
        match raw {
            None => default,
            Some(raw) => match parse_active_enum::<E>(raw.trim()) {
                Some(value) => value,
                None => {
                    self.push(field, format!("Invalid value '{raw}'"));
                    default
                }
            },
        }
    }

    /// Parses each entry as an enum value; repeated values keep their first
    /// position.
    pub fn enum_list<E>(&mut self, field: &str, raw: Option<&[String]>) -> Vec<E>
    where
        E: ActiveEnum<Value = String> + PartialEq,
    {
        let mut parsed: Vec<E> = Vec::new();
        for entry in raw.unwrap_or_default() {
            match parse_active_enum::<E>(entry.trim()) {
                Some(value) if !parsed.contains(&value) => parsed.push(value),
                Some(_) => {}
                None => self.push(field, format!("Invalid value '{entry}'")),
            }
        }
        parsed
    }

    /// Parses ids, collapsing duplicates onto their first occurrence.
    pub fn id_list(&mut self, field: &str, raw: Option<&[String]>) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = Vec::new();
        for entry in raw.unwrap_or_default() {
            match Uuid::parse_str(entry.trim()) {
                Ok(id) if !ids.contains(&id) => ids.push(id),
                Ok(_) => {}
                Err(_) => self.push(field, format!("Invalid id '{entry}'")),
            }
        }
        ids
    }

    pub fn finish(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(self.0))
        }
    }
}

/// Raw list query parameters. Kept as strings so malformed numbers fall back
/// to defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Missing, non-numeric or zero values take the default; a limit above
    /// [`MAX_LIMIT`] is rejected.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Result<Self, AppError> {
        let page = positive(page).unwrap_or(DEFAULT_PAGE);
        let limit = positive(limit).unwrap_or(DEFAULT_LIMIT);
        if limit > MAX_LIMIT {
            return Err(AppError::invalid_field(
                "limit",
                format!("Limit must be at most {MAX_LIMIT}"),
            ));
        }
        Ok(Self { page, limit })
    }
}

fn positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|raw| raw.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
}

/// Trimmed optional text; blank collapses to `None`.
pub fn optional_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Blank search text means no search.
pub fn normalize_search(raw: Option<&str>) -> Option<String> {
    optional_text(raw)
}
