pub mod demo;
pub mod handlers;
pub mod service;
pub mod state;
pub mod view;

pub use service::Dashboard;
pub use state::PanelState;
