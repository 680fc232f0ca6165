pub mod handlers;
pub mod pages;
pub mod types;

pub use handlers::*;
pub use types::*;
