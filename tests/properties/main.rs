//! Property-based tests for the pure pipeline stages.

mod pipeline_props;
