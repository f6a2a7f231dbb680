pub mod engine;
pub mod dispatcher;
pub mod locks;
pub mod orchestrator;
pub mod websocket;

pub use engine::*;
pub use dispatcher::*;
pub use locks::*;
pub use orchestrator::*;
pub use websocket::*;
