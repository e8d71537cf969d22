//! Unit tests for the transport context.

pub(crate) mod support;
