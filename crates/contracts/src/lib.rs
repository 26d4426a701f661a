//! Access to compiled contract artifacts as emitted by Hardhat.
pub mod artifact;

pub use artifact::{Artifact, Artifacts};
