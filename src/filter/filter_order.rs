use super::types::{OrderDirective, SortDirection, SqlParam, SqlResult};

pub struct FilterOrder;

impl FilterOrder {
    /// Resolves the requested ordering. Only the exact token `desc` sorts
    /// descending; any other order token, or none, sorts ascending. The field
    /// is passed through verbatim.
    pub fn resolve(sort_by: Option<&str>, sort_order: Option<&str>, default_field: &str) -> OrderDirective {
        let field = sort_by.unwrap_or(default_field);
        match sort_order {
            Some("desc") => OrderDirective::descending(field),
            _ => OrderDirective::ascending(field),
        }
    }

    /// ORDER BY clause over a `doc` JSONB column. The identifier sorts by the
    /// row key; every other field name is bound as a parameter.
    pub fn generate(order: &OrderDirective, starting_param_index: usize) -> SqlResult {
        if order.field == "_id" {
            return SqlResult {
                query: format!("ORDER BY id {}", order.direction.to_sql()),
                params: vec![],
            };
        }
        SqlResult {
            query: format!("ORDER BY (doc -> ${}) {}", starting_param_index + 1, order.direction.to_sql()),
            params: vec![SqlParam::Text(order.field.clone())],
        }
    }
}

impl OrderDirective {
    pub fn is_descending(&self) -> bool {
        self.direction == SortDirection::Desc
    }
}
