//! Identities
//!
//! - [`FirstParty`]: private keys plus identity container; makes, unpacks and
//!   receives records.
//! - [`SecondParty`]: another agent's public identity.
//! - [`ThirdParty`]: a public identity verifying records on others' behalf.

mod first_party;
mod second_party;

pub use first_party::FirstParty;
pub use second_party::{SecondParty, ThirdParty};
