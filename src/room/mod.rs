// Public API - what other modules can use
pub use service::RoomService;

// Internal modules
pub mod models;
pub mod repository;
mod service;
