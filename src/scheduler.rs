//! Discovery and collection scheduling.
//!
//! A [`Supervisor`] runs one [`DiscoverySession`] at a time. Each session
//! discovers devices once and then drives a [`CollectionCycle`] over that
//! fixed device set until re-discovery is due.

mod cycle;
mod session;
mod supervisor;

#[cfg(test)]
mod testing;

pub use cycle::*;
pub use session::*;
pub use supervisor::*;
