//! Campaign dispatch engine components: recipient queue, pacing, delivery,
//! result accounting, lifecycle rules and the per-campaign run registry.

pub mod accumulator;
pub mod error;
pub mod executor;
pub mod lifecycle;
pub mod pacing;
pub mod queue;
pub mod registry;

pub use accumulator::ResultAccumulator;
pub use error::DispatchError;
pub use executor::DeliveryExecutor;
pub use queue::RecipientQueue;
pub use registry::{RunLease, RunRegistry};
