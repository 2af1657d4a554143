pub mod app;
pub mod dto;

#[cfg(target_arch = "wasm32")]
mod wasm;

pub use app::App;
pub use dto::SelectionDto;
