pub mod app;
pub mod input;
pub mod render;

pub use app::App;
pub use input::Input;
