//! Builds PostgREST query parameters for select, update and delete.

use std::fmt;

pub const DEFAULT_SORT_COLUMN: &str = "id";
pub const ID_COLUMN: &str = "id";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => f.write_str("asc"),
            Direction::Desc => f.write_str("desc"),
        }
    }
}

/// Sort order for a list request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

impl Order {
    pub fn asc(column: impl Into<String>) -> Self {
        Order {
            column: column.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Order {
            column: column.into(),
            direction: Direction::Desc,
        }
    }

    /// Parse a `sort` query value: `created_at` ascending, `-created_at` descending.
    /// Absent or empty values sort ascending by `id`.
    pub fn from_sort_param(sort: Option<&str>) -> Self {
        let raw = sort.map(str::trim).unwrap_or("");
        let (direction, column) = match raw.strip_prefix('-') {
            Some(rest) => (Direction::Desc, rest.trim_start_matches('-')),
            None => (Direction::Asc, raw),
        };
        if column.is_empty() {
            return Order::asc(DEFAULT_SORT_COLUMN);
        }
        Order {
            column: column.to_string(),
            direction,
        }
    }

    fn to_param(&self) -> String {
        format!("{}.{}", self.column, self.direction)
    }
}

impl Default for Order {
    fn default() -> Self {
        Order::asc(DEFAULT_SORT_COLUMN)
    }
}

/// Equality filter on one column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Filter {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn id(id: impl Into<String>) -> Self {
        Filter::eq(ID_COLUMN, id)
    }

    fn to_pair(&self) -> (String, String) {
        (self.column.clone(), format!("eq.{}", self.value))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectQuery {
    pub table: String,
    pub order: Order,
    pub filters: Vec<Filter>,
}

impl SelectQuery {
    pub fn new(table: impl Into<String>) -> Self {
        SelectQuery {
            table: table.into(),
            order: Order::default(),
            filters: Vec::new(),
        }
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Query string pairs: `select=*`, then `order`, then one pair per filter.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() + 2);
        params.push(("select".to_string(), "*".to_string()));
        params.push(("order".to_string(), self.order.to_param()));
        params.extend(self.filters.iter().map(Filter::to_pair));
        params
    }
}

/// Query pairs addressing rows for update/delete.
pub fn filter_params(filter: &Filter) -> Vec<(String, String)> {
    vec![filter.to_pair()]
}
