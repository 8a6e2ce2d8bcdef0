//! In-memory store for tests and dev.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use formlane_core::{
    AnswerId, AnswerRecord, DomainError, DomainResult, FormId, FormRecord, QuestionId,
    QuestionRecord, TemplateId, TemplateRecord, UserId, UserRecord,
};

use crate::contract::{ResourceStore, StoreError};

/// In-memory resource store.
///
/// The read-side implements [`ResourceStore`]; the write-side is inherent
/// so that the authorization engine can only ever see the read contract.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<UserId, UserRecord>>,
    templates: RwLock<HashMap<TemplateId, TemplateRecord>>,
    questions: RwLock<HashMap<QuestionId, QuestionRecord>>,
    forms: RwLock<HashMap<FormId, FormRecord>>,
    answers: RwLock<HashMap<AnswerId, AnswerRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, record: UserRecord) {
        if let Ok(mut map) = self.users.write() {
            map.insert(record.id, record);
        }
    }

    pub fn user(&self, id: UserId) -> Option<UserRecord> {
        self.users.read().ok()?.get(&id).cloned()
    }

    pub fn insert_template(&self, record: TemplateRecord) {
        if let Ok(mut map) = self.templates.write() {
            map.insert(record.id, record);
        }
    }

    pub fn remove_template(&self, id: TemplateId) -> DomainResult<()> {
        let mut map = self.templates.write().map_err(|_| DomainError::not_found())?;
        map.remove(&id).map(|_| ()).ok_or(DomainError::NotFound)
    }

    /// Update the mutable template fields. Ownership is immutable
    /// post-creation and deliberately not updatable here.
    pub fn update_template(
        &self,
        id: TemplateId,
        title: Option<String>,
        is_public: Option<bool>,
    ) -> DomainResult<()> {
        let mut map = self.templates.write().map_err(|_| DomainError::not_found())?;
        let template = map.get_mut(&id).ok_or(DomainError::NotFound)?;
        if let Some(title) = title {
            template.title = title;
        }
        if let Some(is_public) = is_public {
            template.is_public = is_public;
        }
        Ok(())
    }

    pub fn insert_question(&self, record: QuestionRecord) {
        if let Ok(mut map) = self.questions.write() {
            map.insert(record.id, record);
        }
    }

    pub fn remove_question(&self, id: QuestionId) -> DomainResult<()> {
        let mut map = self.questions.write().map_err(|_| DomainError::not_found())?;
        map.remove(&id).map(|_| ()).ok_or(DomainError::NotFound)
    }

    pub fn update_question(&self, id: QuestionId, title: String) -> DomainResult<()> {
        let mut map = self.questions.write().map_err(|_| DomainError::not_found())?;
        let question = map.get_mut(&id).ok_or(DomainError::NotFound)?;
        question.title = title;
        Ok(())
    }

    /// Re-number the questions of one template following `order`. Ids that
    /// do not belong to the template are ignored.
    pub fn reorder_questions(
        &self,
        template_id: TemplateId,
        order: &[QuestionId],
    ) -> DomainResult<()> {
        let mut map = self.questions.write().map_err(|_| DomainError::not_found())?;
        for (position, id) in order.iter().enumerate() {
            if let Some(question) = map.get_mut(id) {
                if question.template_id == template_id {
                    question.position = position as u32;
                }
            }
        }
        Ok(())
    }

    pub fn insert_form(&self, record: FormRecord) {
        if let Ok(mut map) = self.forms.write() {
            map.insert(record.id, record);
        }
    }

    pub fn remove_form(&self, id: FormId) -> DomainResult<()> {
        let mut map = self.forms.write().map_err(|_| DomainError::not_found())?;
        map.remove(&id).map(|_| ()).ok_or(DomainError::NotFound)
    }

    pub fn insert_answer(&self, record: AnswerRecord) {
        if let Ok(mut map) = self.answers.write() {
            map.insert(record.id, record);
        }
    }

    pub fn remove_answer(&self, id: AnswerId) -> DomainResult<()> {
        let mut map = self.answers.write().map_err(|_| DomainError::not_found())?;
        map.remove(&id).map(|_| ()).ok_or(DomainError::NotFound)
    }

    pub fn update_answer(&self, id: AnswerId, value: String) -> DomainResult<()> {
        let mut map = self.answers.write().map_err(|_| DomainError::not_found())?;
        let answer = map.get_mut(&id).ok_or(DomainError::NotFound)?;
        answer.value = value;
        Ok(())
    }

    /// Grant a user explicit access to a template.
    ///
    /// ACL entries are unique per (template, user); granting twice is a
    /// conflict so callers can surface it instead of silently no-oping.
    pub fn grant_access(&self, template_id: TemplateId, user_id: UserId) -> DomainResult<()> {
        let mut map = self.templates.write().map_err(|_| DomainError::not_found())?;
        let template = map.get_mut(&template_id).ok_or(DomainError::NotFound)?;
        if !template.access.insert(user_id) {
            return Err(DomainError::conflict(format!(
                "user {user_id} already has access to template {template_id}"
            )));
        }
        Ok(())
    }

    /// Revoke a user's explicit access to a template.
    ///
    /// Takes effect on the next access check; decisions are never cached.
    pub fn revoke_access(&self, template_id: TemplateId, user_id: UserId) -> DomainResult<()> {
        let mut map = self.templates.write().map_err(|_| DomainError::not_found())?;
        let template = map.get_mut(&template_id).ok_or(DomainError::NotFound)?;
        if !template.access.remove(&user_id) {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }

    pub fn templates_by_owner(&self, owner_id: UserId) -> Vec<TemplateRecord> {
        let map = match self.templates.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        map.values().filter(|t| t.owner_id == owner_id).cloned().collect()
    }

    pub fn questions_by_template(&self, template_id: TemplateId) -> Vec<QuestionRecord> {
        let map = match self.questions.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        map.values().filter(|q| q.template_id == template_id).cloned().collect()
    }

    pub fn forms_by_user(&self, user_id: UserId) -> Vec<FormRecord> {
        let map = match self.forms.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        map.values().filter(|f| f.user_id == user_id).cloned().collect()
    }

    pub fn forms_by_template(&self, template_id: TemplateId) -> Vec<FormRecord> {
        let map = match self.forms.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        map.values().filter(|f| f.template_id == template_id).cloned().collect()
    }
}

#[async_trait]
impl ResourceStore for InMemoryStore {
    async fn template(&self, id: TemplateId) -> Result<Option<TemplateRecord>, StoreError> {
        let map = self
            .templates
            .read()
            .map_err(|_| StoreError::backend("poisoned template lock"))?;
        Ok(map.get(&id).cloned())
    }

    async fn question(&self, id: QuestionId) -> Result<Option<QuestionRecord>, StoreError> {
        let map = self
            .questions
            .read()
            .map_err(|_| StoreError::backend("poisoned question lock"))?;
        Ok(map.get(&id).cloned())
    }

    async fn form(&self, id: FormId) -> Result<Option<FormRecord>, StoreError> {
        let map = self
            .forms
            .read()
            .map_err(|_| StoreError::backend("poisoned form lock"))?;
        Ok(map.get(&id).cloned())
    }

    async fn answer(&self, id: AnswerId) -> Result<Option<AnswerRecord>, StoreError> {
        let map = self
            .answers
            .read()
            .map_err(|_| StoreError::backend("poisoned answer lock"))?;
        Ok(map.get(&id).cloned())
    }
}
