pub mod auth;
pub mod practice_task;
pub mod protocol;
pub mod rest;
pub mod state;
pub mod ws_handler;

// Re-export the main WebSocket handler to make it easily accessible
// to the binary that will build the web server router.
pub use rest::{mistakes_handler, session_handler, settings_handler};
pub use ws_handler::ws_handler;
