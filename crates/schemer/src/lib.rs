//! Schemer: relational schema inference for loosely-typed tabular data.
//!
//! Schemer ingests delimited text files whose every cell is a string and
//! infers a normalized relational model: column types, unique keys,
//! foreign keys, many-to-many relationships hidden in delimiter-packed
//! text fields, and structurally duplicate tables worth merging.
//!
//! # Core Principles
//!
//! - **Two-phase execution**: rules analyze, analyses transform; a run
//!   can be saved and replayed without re-running any heuristic
//! - **Deterministic**: iteration orders and tie-breaks are fixed, so
//!   the same input and configuration always produce the same schema
//! - **Policy-resolved violations**: rows that break an inferred
//!   constraint are repaired by a configured policy, never a crash
//!
//! # Example
//!
//! ```no_run
//! use schemer::{Engine, InferenceConfig};
//!
//! let (mut database, _sources) =
//!     schemer::ingest::load_directory("data/", "inventory").unwrap();
//! let mut engine = Engine::new(InferenceConfig::default());
//! engine.analyze(&mut database).unwrap();
//!
//! println!("Tables: {}", database.len());
//! engine.record().save("analyses.json").unwrap();
//! ```

pub mod analysis;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod policy;
pub mod rules;
pub mod sql;
pub mod validate;

pub use analysis::{Analysis, AnalysisRecord};
pub use config::InferenceConfig;
pub use data::{Column, ColumnData, ColumnType, Constraint, Database, Table, Value};
pub use engine::Engine;
pub use error::{Result, SchemerError};
pub use policy::{RowPolicy, TablePolicy};
