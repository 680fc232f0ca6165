mod generate_id;
mod pagination;
mod query;

pub use generate_id::generate_id;
pub use pagination::{paginate, Page};
pub use query::{QueryError, QueryParams};
