//! Finite MDP vocabulary shared by the solvers
//!
//! The solvers never see a concrete game. They work against the traits in
//! [`model`], read and write the owned tables in [`values`], and hand back a
//! [`Policy`].

pub mod model;
pub mod outcome;
pub mod policy;
pub mod values;

#[cfg(test)]
pub(crate) mod toy;

pub use model::{ActionOf, Environment, MdpState, StateSpace, TransitionModel};
pub use outcome::{Outcome, Transition};
pub use policy::Policy;
pub use values::{ValueTable, q_value};
