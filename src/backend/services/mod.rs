pub mod sharing_service;
pub mod upload_service;

pub use sharing_service::{PendingToggle, Toggle, ToggleOrigin};
