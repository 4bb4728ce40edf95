pub mod geocode_service;

pub use geocode_service::request_resolve;
