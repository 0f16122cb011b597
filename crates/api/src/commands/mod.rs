//! Commands - boundary between callers and the scheduling engine

mod dispatch;
mod requests;
mod scheduling;

pub use dispatch::*;
pub use requests::*;
pub use scheduling::*;
