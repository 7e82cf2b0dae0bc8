//! Delivery-to-volunteer resolution and the notification workflows built on it.

pub mod bootstrap;
pub mod cli;
pub mod resolver;
pub mod workflow;

pub use resolver::VolunteerResolver;
pub use workflow::{PickupNotifier, Workflow, WorkflowOutcome};
