//! `formlane-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! typed identifiers, the resource records shared by the store and the
//! authorization engine, and the domain error model.

pub mod error;
pub mod id;
pub mod record;

pub use error::{DomainError, DomainResult};
pub use id::{AnswerId, FormId, QuestionId, TemplateId, UserId};
pub use record::{
    AccountRole, AnswerRecord, FormRecord, QuestionRecord, TemplateRecord, UserRecord,
};
