//! Snapshot tests for published record shapes.

mod records;
