//! Unit tests for the delivery context.

pub(crate) mod support;
