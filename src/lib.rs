pub mod util;
pub mod config;
pub mod monitor;
pub mod link;
pub mod draw;
pub mod panel;
pub mod app;

pub use crate::app::App;
pub use crate::panel::Input;
