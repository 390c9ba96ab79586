//! Test utilities for SessionLite integration tests
//!
//! `SessionFixture` wraps a `SessionManager` with a manual clock so tests can
//! simulate request cycles and the passage of time without sleeping.

pub mod test_fixture;
