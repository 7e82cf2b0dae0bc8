//! Command-line arguments for `pickup-notify`.

use clap::Parser;

use crate::workflow::Workflow;

/// Send a pickup notification to the volunteer assigned to a delivery
#[derive(Debug, Parser)]
#[command(name = "pickup-notify", version, long_about = "Send a pickup notification to the volunteer assigned to a delivery.

Workflows:
  new-pickup  - \"New Pickup Assigned\" / \"You have a new pickup task!\"
  reminder    - \"Pickup Data Reminder\" / \"Please remember to input your pickup data.\"

Examples:
  pickup-notify new-pickup NoQZLaczgEWwHt4tYDOb
  pickup-notify reminder NoQZLaczgEWwHt4tYDOb")]
pub struct Cli {
    /// Which notification to send (new-pickup or reminder)
    pub workflow: Workflow,

    /// Id of the delivery document
    pub delivery_id: String,
}
