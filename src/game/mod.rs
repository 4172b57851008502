// Public API
pub use service::GameService;
pub use turn_timer::TurnTimerConfig;
pub use words::WordPool;

// Internal modules
pub mod round;
mod service;
mod turn_timer;
mod words;
