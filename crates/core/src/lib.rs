//! `loangate-core`: identifiers and error primitives shared by every crate.
//!
//! This crate has no knowledge of HTTP, identity providers or policies.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{LoanId, SubjectId};
