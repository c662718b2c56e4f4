//! High-level driver for device interaction.
//!
//! The driver layer turns an SSH shell into a [`Session`]: a sequence of
//! send-and-wait exchanges with a growing transcript and privilege tracking.

mod builder;
mod generic;
mod interactive;
mod privilege;
mod response;
mod session;
mod transcript;

pub use builder::DriverBuilder;
pub use generic::GenericDriver;
pub use interactive::{
    InteractiveBuilder, InteractiveBuilderWithInput, InteractiveEvent, InteractiveResult,
    InteractiveStep,
};
pub use privilege::{PrivilegeManager, TransitionInfo};
pub use response::Response;
pub use session::{Session, Stall};
pub use transcript::Transcript;
