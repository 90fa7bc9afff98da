//! Unit tests for the marker registry.

mod service_tests;
