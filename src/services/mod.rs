// Service module exports

pub mod bulk_edit;
pub mod normalize;
pub mod projection;
pub mod settings;
pub mod supplier;
