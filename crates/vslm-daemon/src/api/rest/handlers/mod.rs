//! API request handlers

mod events;
mod servers;
mod system;

pub use events::*;
pub use servers::*;
pub use system::*;
