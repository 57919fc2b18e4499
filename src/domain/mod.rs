// Domain layer - Pure types with no I/O
pub mod conditions;
pub mod parameter;
pub mod reading;
pub mod topology;
