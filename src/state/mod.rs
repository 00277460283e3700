pub mod app_settings;
pub mod app_state;
pub mod favorites;
pub mod goals;
pub mod messages;
pub mod network;
pub mod refresher;
