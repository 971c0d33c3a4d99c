//! Release physics: where a flick would coast to, and the spring that carries
//! the shade to its chosen anchor.

mod projection;
mod settle;
mod spring;

pub use projection::{project, DecelerationRate};
pub use settle::{SettleEngine, SettleObserver, SettleRun};
pub use spring::{SpringConfig, SpringState};
