use std::collections::HashMap;

use serde_json::Value;

use super::error::FilterError;
use super::types::{Clause, Condition, FieldKind, Predicate, QueryField, SqlParam, SqlResult};

pub struct FilterWhere {
    param_values: Vec<SqlParam>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Builds the predicate for the recognized parameters present in `params`.
    /// Parameters not declared in `fields` are ignored.
    pub fn build(fields: &[QueryField], params: &HashMap<String, String>) -> Result<Predicate, FilterError> {
        let mut predicate = Predicate::match_all();
        for field in fields {
            if let Some(raw) = params.get(field.name) {
                predicate = predicate.and(Self::parse_field_condition(field, raw)?);
            }
        }
        Ok(predicate)
    }

    fn parse_field_condition(field: &QueryField, raw: &str) -> Result<Clause, FilterError> {
        match field.kind {
            FieldKind::Exact => Ok(Clause::equals(field.name, raw)),
            FieldKind::Boolean => Ok(Clause::equals(field.name, parse_bool(field, raw)?)),
            FieldKind::Integer => Ok(Clause::equals(field.name, parse_integer(field, raw)?)),
            FieldKind::Pattern => Ok(Clause::matches(field.name, regex::escape(raw), true)),
        }
    }

    /// Renders the predicate as a WHERE fragment over a `doc` JSONB column.
    pub fn generate(predicate: &Predicate, starting_param_index: usize) -> SqlResult {
        let mut filter_where = Self::new(starting_param_index);
        let query = filter_where.build_sql(predicate);
        SqlResult { query, params: filter_where.param_values }
    }

    fn build_sql(&mut self, predicate: &Predicate) -> String {
        if predicate.is_match_all() {
            return "1=1".to_string();
        }
        let conditions: Vec<String> = predicate
            .clauses
            .iter()
            .map(|clause| self.build_sql_condition(clause))
            .collect();
        conditions.join(" AND ")
    }

    fn build_sql_condition(&mut self, clause: &Clause) -> String {
        let key = self.param(SqlParam::Text(clause.field.clone()));
        match &clause.condition {
            Condition::Equals(value) => {
                let value = self.param(SqlParam::Json(value.clone()));
                format!("(doc -> {}) = {}", key, value)
            }
            Condition::Matches { pattern, case_insensitive } => {
                let op = if *case_insensitive { "~*" } else { "~" };
                let pattern = self.param(SqlParam::Text(pattern.clone()));
                format!("(jsonb_typeof(doc -> {key}) = 'string' AND (doc ->> {key}) {op} {pattern})")
            }
        }
    }

    fn param(&mut self, value: SqlParam) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

fn parse_bool(field: &QueryField, raw: &str) -> Result<Value, FilterError> {
    if raw.eq_ignore_ascii_case("true") {
        Ok(Value::Bool(true))
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(Value::Bool(false))
    } else {
        Err(bad_value(field, raw))
    }
}

fn parse_integer(field: &QueryField, raw: &str) -> Result<Value, FilterError> {
    raw.parse::<i64>()
        .map(Value::from)
        .map_err(|_| bad_value(field, raw))
}

fn bad_value(field: &QueryField, raw: &str) -> FilterError {
    FilterError::BadFilterValue {
        field: field.name.to_string(),
        value: raw.to_string(),
        expected: field.kind.expected(),
    }
}
