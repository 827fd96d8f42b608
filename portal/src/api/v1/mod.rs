//! Version 1 of the data portal API.

pub mod collection;
pub mod dataset;
