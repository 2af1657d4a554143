pub mod engine;
pub mod index;
pub mod photo;
pub mod selector;
pub mod trace;
pub mod viewer;

pub use engine::*;
pub use index::*;
pub use photo::*;
pub use selector::*;
pub use trace::*;
pub use viewer::*;
