pub mod record;
pub mod registry;

pub use record::*;
pub use registry::*;
