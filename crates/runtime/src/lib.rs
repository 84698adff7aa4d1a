pub mod deferred;
pub mod event_bus;
pub mod frame;

pub use deferred::*;
pub use event_bus::*;
pub use frame::*;
