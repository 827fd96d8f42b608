//! The Portal Library.
//!
//! Domain types shared between the server and its tooling: collection
//! visibility, dataset metadata, the processing status state machine and
//! the wire types of the HTTP API.

#![deny(
    asm_sub_register,
    deprecated,
    missing_abi,
    unsafe_code,
    unused_macros,
    unused_must_use,
    unused_unsafe
)]
#![deny(clippy::from_over_into, clippy::needless_question_mark)]
#![cfg_attr(
    not(debug_assertions),
    deny(unused_imports, unused_mut, unused_variables,)
)]

pub mod api;
pub mod collection;
pub mod dataset;
pub mod error;
pub mod status;

pub use error::{PortalError, PortalResult};
