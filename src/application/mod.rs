// Application layer - Use cases and the seams they depend on
pub mod conditions_composer;
pub mod conditions_service;
pub mod readings_source;
pub mod refresh_cache;
