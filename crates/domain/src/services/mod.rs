//! Domain services for the invitation portal.
//!
//! Services contain business logic that operates on domain models.

pub mod invitation_list;
pub mod rsvp;
pub mod storage;

pub use invitation_list::{filter_items, RsvpFilter, RsvpStats};
pub use rsvp::{
    resolve_choice, ActionsDisabled, ChoiceSource, MockRsvpSubmitter, ResolvedChoice,
    RsvpControl, RsvpKeys, RsvpSubmitter, RsvpView, SubmitError, SubmitOutcome,
    SUBMIT_FAILED_MESSAGE,
};
pub use storage::{KeyValueStore, MemoryStore, StorageError};
