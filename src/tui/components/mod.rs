//! Reusable widgets for the console pages

pub mod pagination_bar;
pub mod users_table;

pub use pagination_bar::PaginationBar;
pub use users_table::UsersTable;
