//! Unit tests for behaviors and the plan executor.

mod executor_tests;
mod support;
