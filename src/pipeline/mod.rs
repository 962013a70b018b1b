//! Normalization and classification pipeline.
//!
//! Every stage is a pure function of its input plus immutable tables:
//!
//! - [`cleaner`]: strip attribution lines, links, images and blockquotes
//! - [`placeholders`]: canonicalize placeholder dialects to `{{name}}`
//! - [`redactor`]: replace trailing worked examples with `{{input}}`
//! - [`classifier`]: keyword-driven group assignment
//! - [`commands`]: cheat-sheet page parsing
//! - [`assembler`]: stage composition, ids, timestamps and drop accounting

pub mod assembler;
pub mod classifier;
pub mod cleaner;
pub mod commands;
pub mod placeholders;
pub mod redactor;
pub mod types;

pub use assembler::{IdSource, RecordAssembler, SequentialIds, UuidIds};
pub use classifier::{Category, CategoryClassifier};
pub use commands::{Extraction, PageContext};
pub use redactor::{ExampleRedactor, RedactionRule};
pub use types::{
    CanonicalRecord, DropReason, DropStats, EntryOutcome, RawEntry, RecordType, SourceKind,
};
