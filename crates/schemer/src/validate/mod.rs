//! Validators: per-row correctness predicates.

pub mod validators;

pub use validators::{
    MultiValueReferenceValidator, ReferenceValidator, RowValidator, SharedColumns,
    TypeValidator, UniqueValidator,
};
