//! Library-level build tests against temporary source trees.

mod fixture;

mod build_tests;
mod failure_tests;
