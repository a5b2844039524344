//! Property-based tests for branch-group tree resolution.
//!
//! These tests use proptest to generate random path hierarchies and verify
//! that the resolution invariants hold for all possible inputs.
