//! Ports (trait boundaries) between the learning core and its collaborators.
//!
//! `ValueAccess` is the capability the TD core uses to read and update
//! action values without knowing how they are stored. `Learner` is the
//! surface an environment driver calls once per layout, episode and step.

pub mod learner;
pub mod value_access;

pub use learner::Learner;
pub use value_access::ValueAccess;
