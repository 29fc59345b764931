pub mod types;
pub mod filter;
pub mod filter_where;
pub mod filter_order;
pub mod error;

pub use error::FilterError;
pub use filter::{Filter, SORT_BY_KEY, SORT_ORDER_KEY};
pub use filter_order::FilterOrder;
pub use filter_where::FilterWhere;
pub use types::*;
