//! Domain types and models

pub mod event;
pub mod interval;
pub mod meeting;
pub mod scheduling;

pub use event::{EventMetadata, EventStatus, ExistingEvent};
pub use interval::TimeInterval;
pub use meeting::{MeetingRequest, MeetingRequestBuilder, Priority};
pub use scheduling::{ConflictReport, SchedulingResult, SlotCandidate};
