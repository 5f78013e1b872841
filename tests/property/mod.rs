//! Property-based tests

mod event_proptest;
mod registry_proptest;
