//! Read contract between policy evaluators and whatever persistence backs
//! them.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use formlane_core::{
    AnswerId, AnswerRecord, FormId, FormRecord, QuestionId, QuestionRecord, TemplateId,
    TemplateRecord,
};

/// Fault raised by a store backend.
///
/// This is the only error type allowed to cross into the authorization
/// engine, and the engine converts it into a denial rather than propagating
/// it further.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend failed (I/O, connection, serialization...).
    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Read-only resource lookup used by policy evaluators.
///
/// A `template` record carries its owner, public flag and full ACL; the
/// dependent records carry enough of the ownership chain to resolve the
/// owning template in one or two hops.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn template(&self, id: TemplateId) -> Result<Option<TemplateRecord>, StoreError>;

    async fn question(&self, id: QuestionId) -> Result<Option<QuestionRecord>, StoreError>;

    async fn form(&self, id: FormId) -> Result<Option<FormRecord>, StoreError>;

    async fn answer(&self, id: AnswerId) -> Result<Option<AnswerRecord>, StoreError>;
}

#[async_trait]
impl<S> ResourceStore for Arc<S>
where
    S: ResourceStore + ?Sized,
{
    async fn template(&self, id: TemplateId) -> Result<Option<TemplateRecord>, StoreError> {
        (**self).template(id).await
    }

    async fn question(&self, id: QuestionId) -> Result<Option<QuestionRecord>, StoreError> {
        (**self).question(id).await
    }

    async fn form(&self, id: FormId) -> Result<Option<FormRecord>, StoreError> {
        (**self).form(id).await
    }

    async fn answer(&self, id: AnswerId) -> Result<Option<AnswerRecord>, StoreError> {
        (**self).answer(id).await
    }
}
