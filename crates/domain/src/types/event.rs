//! Events already on the user's calendar

use serde::{Deserialize, Serialize};

use super::interval::TimeInterval;
use super::meeting::MeetingRequest;
use crate::impl_domain_status_conversions;

/// Provider-side status of a calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Confirmed,
    Tentative,
    Cancelled,
}

impl_domain_status_conversions!(EventStatus {
    Confirmed => "confirmed",
    Tentative => "tentative",
    Cancelled => "cancelled",
});

impl EventStatus {
    /// Cancelled events never occupy time.
    pub fn blocks_time(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

/// An event on the calendar of record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingEvent {
    pub id: String,
    pub interval: TimeInterval,
    pub status: EventStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ExistingEvent {
    pub fn new(id: impl Into<String>, interval: TimeInterval, status: EventStatus) -> Self {
        Self { id: id.into(), interval, status, title: None }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Descriptive fields sent to the provider when booking a slot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
}

impl From<&MeetingRequest> for EventMetadata {
    fn from(request: &MeetingRequest) -> Self {
        Self {
            title: request.title().to_string(),
            description: request.description().map(str::to_string),
            attendees: request.attendees().to_vec(),
            location: request.location().map(str::to_string),
            is_recurring: request.is_recurring(),
        }
    }
}
