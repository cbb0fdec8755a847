pub mod pagination;
pub mod query;
pub mod response;

pub use pagination::{Page, PaginationQuery};
pub use response::ApiResponse;
