//! Entity services.
//!
//! Thin layers over the store that check required fields before any
//! store call and publish [`MutationEvent`]s after the ones that other
//! parts of the system react to.

mod branches;
mod complaints;
pub(crate) mod events;
mod staff;
mod uploads;

pub use branches::BranchService;
pub use complaints::ComplaintService;
pub use events::{CommitHook, CommitHooks, MutationEvent};
pub use staff::StaffService;
pub use uploads::{DataUrl, embed_image, parse_data_url, validate_image_url};
