pub mod best;
pub mod get;
pub mod list;
pub mod start;
pub mod stop;
