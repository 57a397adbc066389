// Domain layer - Core types and filename rules

pub mod errors;
pub mod model;
pub mod rules;
