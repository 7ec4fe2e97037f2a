// Settings service
// TOML-backed persistence of grid settings

mod service;

pub use service::SettingsService;
