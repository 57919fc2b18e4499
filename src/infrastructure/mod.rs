// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod water_services;
pub mod water_services_client;
