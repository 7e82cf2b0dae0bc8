//! Delivery-triggered notification workflows.
//!
//! Each workflow resolves the volunteer assigned to a delivery and sends them a
//! fixed notification. Nothing is surfaced to the caller on failure: a delivery with
//! no reachable volunteer is skipped, store and provider errors are logged.

use std::str::FromStr;

use thiserror::Error;

use pickup_common::types::NotificationRequest;
use pickup_notifier::{Dispatcher, ProviderReceipt};

use crate::resolver::VolunteerResolver;

/// The canned notifications the relay knows how to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    NewPickup,
    PickupReminder,
}

impl Workflow {
    pub fn title(&self) -> &'static str {
        match self {
            Workflow::NewPickup => "New Pickup Assigned",
            Workflow::PickupReminder => "Pickup Data Reminder",
        }
    }

    pub fn body(&self) -> &'static str {
        match self {
            Workflow::NewPickup => "You have a new pickup task!",
            Workflow::PickupReminder => "Please remember to input your pickup data.",
        }
    }

    pub fn request(&self, token: impl Into<String>) -> NotificationRequest {
        NotificationRequest::new(token, self.title(), self.body())
    }
}

impl std::fmt::Display for Workflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Workflow::NewPickup => write!(f, "new-pickup"),
            Workflow::PickupReminder => write!(f, "reminder"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown workflow '{0}', expected 'new-pickup' or 'reminder'")]
pub struct ParseWorkflowError(String);

impl FromStr for Workflow {
    type Err = ParseWorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new-pickup" => Ok(Workflow::NewPickup),
            "reminder" => Ok(Workflow::PickupReminder),
            other => Err(ParseWorkflowError(other.to_string())),
        }
    }
}

/// What happened when a workflow ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    Sent(ProviderReceipt),
    /// No volunteer token could be resolved; nothing was sent
    NoRecipient,
    /// The store or the provider failed; already logged
    Failed,
}

/// Runs workflows: resolve the volunteer, then dispatch.
#[derive(Clone)]
pub struct PickupNotifier {
    resolver: VolunteerResolver,
    dispatcher: Dispatcher,
}

impl PickupNotifier {
    pub fn new(resolver: VolunteerResolver, dispatcher: Dispatcher) -> Self {
        Self {
            resolver,
            dispatcher,
        }
    }

    /// Tell the assigned volunteer they have a new pickup.
    pub async fn send_new_pickup(&self, delivery_id: &str) -> WorkflowOutcome {
        self.run(Workflow::NewPickup, delivery_id).await
    }

    /// Remind the assigned volunteer to input their pickup data.
    pub async fn send_reminder(&self, delivery_id: &str) -> WorkflowOutcome {
        self.run(Workflow::PickupReminder, delivery_id).await
    }

    pub async fn run(&self, workflow: Workflow, delivery_id: &str) -> WorkflowOutcome {
        let token = match self.resolver.resolve_token(delivery_id).await {
            Ok(Some(token)) => token,
            Ok(None) => return WorkflowOutcome::NoRecipient,
            Err(e) => {
                tracing::error!(error = %e, delivery_id, %workflow, "Volunteer lookup failed");
                return WorkflowOutcome::Failed;
            }
        };

        match self.dispatcher.send_and_forget(&workflow.request(token)).await {
            Some(receipt) => {
                tracing::info!(delivery_id, %workflow, "Workflow notification sent");
                WorkflowOutcome::Sent(receipt)
            }
            None => WorkflowOutcome::Failed,
        }
    }
}
