//! Property-based tests for validation, regeneration and context invariants

mod regeneration_properties;
mod validation_properties;
