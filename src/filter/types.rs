use serde_json::Value;

/// How a recognized query parameter is turned into a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// field == literal string
    Exact,
    /// field == parsed boolean
    Boolean,
    /// field == parsed integer
    Integer,
    /// escaped literal, case-insensitive, unanchored
    Pattern,
}

impl FieldKind {
    pub fn expected(&self) -> &'static str {
        match self {
            FieldKind::Exact | FieldKind::Pattern => "string",
            FieldKind::Boolean => "boolean",
            FieldKind::Integer => "integer",
        }
    }
}

/// A query parameter a collection knows how to filter on.
#[derive(Debug, Clone, Copy)]
pub struct QueryField {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl QueryField {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Equals(Value),
    /// Applies to string values only; numbers, booleans and absent fields
    /// never match.
    Matches { pattern: String, case_insensitive: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub field: String,
    pub condition: Condition,
}

impl Clause {
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self { field: field.into(), condition: Condition::Equals(value.into()) }
    }

    pub fn matches(field: impl Into<String>, pattern: impl Into<String>, case_insensitive: bool) -> Self {
        Self {
            field: field.into(),
            condition: Condition::Matches { pattern: pattern.into(), case_insensitive },
        }
    }
}

/// Logical AND of clauses. No clauses matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    pub clauses: Vec<Clause>,
}

impl Predicate {
    pub fn match_all() -> Self {
        Self::default()
    }

    pub fn and(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn is_match_all(&self) -> bool {
        self.clauses.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Single-field ordering handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDirective {
    pub field: String,
    pub direction: SortDirection,
}

impl OrderDirective {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: SortDirection::Asc }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: SortDirection::Desc }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Json(Value),
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}
