use std::collections::HashMap;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{OrderDirective, Predicate, QueryField, SqlResult};

pub const SORT_BY_KEY: &str = "sortby";
pub const SORT_ORDER_KEY: &str = "sortorder";

/// A list query: which documents, in what order.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub predicate: Predicate,
    pub order: OrderDirective,
}

impl Filter {
    pub fn from_query(
        fields: &[QueryField],
        default_sort: &str,
        params: &HashMap<String, String>,
    ) -> Result<Self, FilterError> {
        let predicate = FilterWhere::build(fields, params)?;
        let order = FilterOrder::resolve(
            params.get(SORT_BY_KEY).map(String::as_str),
            params.get(SORT_ORDER_KEY).map(String::as_str),
            default_sort,
        );
        Ok(Self { predicate, order })
    }

    /// Full SELECT over a collection table. `table_name` must already be a
    /// validated identifier.
    pub fn to_sql(predicate: &Predicate, order: Option<&OrderDirective>, table_name: &str) -> SqlResult {
        let where_result = FilterWhere::generate(predicate, 0);
        let mut params = where_result.params;

        let order_clause = match order {
            Some(order) => {
                let order_result = FilterOrder::generate(order, params.len());
                params.extend(order_result.params);
                order_result.query
            }
            None => String::new(),
        };

        let query = [
            "SELECT id, doc".to_string(),
            format!("FROM \"{}\"", table_name),
            format!("WHERE {}", where_result.query),
            order_clause,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult { query, params }
    }
}
