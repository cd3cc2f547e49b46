pub mod assistant;
pub mod calendar_gateway;
pub mod calendar_service;
pub mod formatting;
pub mod memory_gateway;
pub mod memory_service;
pub mod routing;
