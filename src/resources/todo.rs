use serde::{Deserialize, Serialize};

use super::Resource;
use crate::filter::{FieldKind, QueryField};
use crate::store::DocumentId;
use crate::validation::{is_boolean, non_blank, non_empty, Rule};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub owner: String,
    pub status: bool,
    pub body: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTodo {
    pub owner: String,
    pub status: bool,
    pub body: String,
    pub category: String,
}

impl Resource for Todo {
    type Draft = NewTodo;

    const COLLECTION: &'static str = "todos";
    const NAME: &'static str = "todo";
    const DEFAULT_SORT: &'static str = "owner";

    const QUERY_FIELDS: &'static [QueryField] = &[
        QueryField::new("category", FieldKind::Exact),
        QueryField::new("status", FieldKind::Boolean),
    ];

    const RULES: &'static [Rule] = &[
        Rule::new("owner", non_blank, "Todo must have a non-empty owner"),
        Rule::new("status", is_boolean, "Todo must have a legal status"),
        Rule::new("body", non_empty, "Todo must have a non-empty body"),
        Rule::new("category", non_empty, "Todo must have a non-empty category"),
    ];
}
