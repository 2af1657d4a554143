pub mod angle;
pub mod coord;
pub mod order;

// Geo crate: small, well-tested spherical primitives only.
pub use angle::*;
pub use coord::*;
pub use order::*;
