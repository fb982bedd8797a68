pub mod dispatch;
mod play;
pub mod presets;
pub mod status;
mod view;

pub use dispatch::dispatch;
