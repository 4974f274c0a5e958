//! Pagination, sorting and per-column filter state of a dashboard table.

use super::DocumentStatus;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortableColumn {
    Id,
    Name,
    Status,
    CreatedAt,
    UpdatedAt,
}

impl SortableColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortableColumn::Id => "id",
            SortableColumn::Name => "name",
            SortableColumn::Status => "status",
            SortableColumn::CreatedAt => "createdAt",
            SortableColumn::UpdatedAt => "updatedAt",
        }
    }
}

impl FromStr for SortableColumn {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortableColumn::Id),
            "name" => Ok(SortableColumn::Name),
            "status" => Ok(SortableColumn::Status),
            "createdAt" => Ok(SortableColumn::CreatedAt),
            "updatedAt" => Ok(SortableColumn::UpdatedAt),
            other => Err(QueryError::UnknownSortColumn(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid value for '{0}': {1}")]
    InvalidNumber(&'static str, String),

    #[error("Unknown sort column: {0}")]
    UnknownSortColumn(String),

    #[error("Unknown sort direction: {0}")]
    UnknownSortDirection(String),

    #[error("Filtering by '{0}' is not available here")]
    FilterNotAllowed(String),

    #[error("Status '{0}' is not selectable here")]
    StatusNotAllowed(String),
}

/// Request state of a document list.
///
/// Equality is by value: a table only refetches when the state actually changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentQuery {
    pub page: u32,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortableColumn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<SortDirection>,
    /// Dynamic per-column filters (`status`, `creatorId`, `creatorEmail`, ...).
    #[serde(flatten)]
    pub filters: BTreeMap<String, String>,
}

impl Default for DocumentQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: 10,
            sort_by: None,
            sort_direction: None,
            filters: BTreeMap::new(),
        }
    }
}

impl DocumentQuery {
    /// Sort change. A `None` direction clears sorting. Always goes back to page 1.
    pub fn sort(&mut self, column: SortableColumn, direction: Option<SortDirection>) {
        self.page = 1;
        self.sort_by = direction.map(|_| column);
        self.sort_direction = direction;
    }

    /// Column filter change. An empty value removes the filter.
    pub fn filter_by(&mut self, column: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.filters.remove(column);
            return;
        }

        self.page = 1;
        self.filters.insert(column.to_string(), value.to_string());
    }

    /// Paginator event; `page_index` is zero-based.
    pub fn change_page(&mut self, page_index: u32, size: u32) {
        self.page = page_index.saturating_add(1);
        self.size = size;
    }

    /// Build a query from browser query-string parameters.
    ///
    /// Unset pagination keys keep the values of `base`. Filters other than
    /// `allowed_filters` are rejected, and a `status` filter must be one of
    /// `allowed_statuses`.
    pub fn from_params(
        params: &HashMap<String, String>,
        base: &DocumentQuery,
        allowed_filters: &[&str],
        allowed_statuses: &[DocumentStatus],
    ) -> Result<Self, QueryError> {
        let mut query = DocumentQuery {
            filters: BTreeMap::new(),
            ..base.clone()
        };

        for (key, value) in params {
            match key.as_str() {
                "page" => query.page = parse_positive("page", value)?,
                "size" => query.size = parse_positive("size", value)?,
                "sortBy" => query.sort_by = Some(value.parse()?),
                "sortDirection" => {
                    query.sort_direction = match value.as_str() {
                        "asc" => Some(SortDirection::Asc),
                        "desc" => Some(SortDirection::Desc),
                        "" => None,
                        other => return Err(QueryError::UnknownSortDirection(other.to_string())),
                    }
                }
                "status" => {
                    if value.is_empty() {
                        continue;
                    }
                    let status = value
                        .parse::<DocumentStatus>()
                        .map_err(|_| QueryError::StatusNotAllowed(value.clone()))?;
                    if !allowed_statuses.contains(&status) {
                        return Err(QueryError::StatusNotAllowed(value.clone()));
                    }
                    query.filters.insert(key.clone(), status.to_string());
                }
                column if allowed_filters.contains(&column) => {
                    if !value.trim().is_empty() {
                        query.filters.insert(key.clone(), value.trim().to_string());
                    }
                }
                other => return Err(QueryError::FilterNotAllowed(other.to_string())),
            }
        }

        if query.sort_direction.is_none() {
            query.sort_by = None;
        }

        Ok(query)
    }
}

fn parse_positive(name: &'static str, value: &str) -> Result<u32, QueryError> {
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(QueryError::InvalidNumber(name, value.to_string())),
    }
}

/// Adapt a query to the backend's sorting convention.
///
/// `sortBy` and `sortDirection` are folded into a single `sort=<column>,<direction>`
/// parameter, emitted only when both are set. Every other key is passed through.
pub fn transform_sort_params(query: &DocumentQuery) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    params.insert("page".to_string(), query.page.to_string());
    params.insert("size".to_string(), query.size.to_string());

    for (column, value) in &query.filters {
        params.insert(column.clone(), value.clone());
    }

    if let (Some(column), Some(direction)) = (query.sort_by, query.sort_direction) {
        params.insert(
            "sort".to_string(),
            format!("{},{}", column.as_str(), direction.as_str()),
        );
    }

    params
}
