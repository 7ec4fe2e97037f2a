// Module exports for models

pub mod accommodation;
pub mod editing;
pub mod modified;
pub mod projection;
pub mod rate;
pub mod selection;
pub mod settings;
