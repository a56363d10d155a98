pub mod crud;

pub use crud::{CrudService, ListOutcome};
