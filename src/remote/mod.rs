pub mod client;
pub mod query;

pub use client::{PostgrestClient, Record, TableClient};
pub use query::{Direction, Filter, Order, SelectQuery};
