pub mod history;
pub mod query;
pub mod scheduler;

pub use history::*;
pub use query::*;
pub use scheduler::*;
