//! Unit tests for the parcel registry.

pub(crate) mod support;
