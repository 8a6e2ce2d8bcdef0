//! End-to-end decision scenarios against the in-memory store.

use std::sync::Arc;

use formlane_authz::{
    AccessChecker, Action, CheckRequest, Decision, DenialKind, Identity, ResourceKind, RoleToken,
};
use formlane_core::{
    AnswerId, AnswerRecord, FormId, FormRecord, QuestionId, QuestionRecord, TemplateId,
    TemplateRecord, UserId,
};
use formlane_store::InMemoryStore;

struct Fixture {
    store: Arc<InMemoryStore>,
    checker: AccessChecker,
    template_id: TemplateId,
    owner: UserId,
    member: UserId,
}

fn fixture(is_public: bool) -> Fixture {
    let store = Arc::new(InMemoryStore::new());
    let owner = UserId::new();
    let member = UserId::new();
    let template_id = TemplateId::new();

    let mut template = TemplateRecord::new(template_id, owner, is_public);
    template.access.insert(member);
    store.insert_template(template);

    let checker = AccessChecker::new(store.clone());
    Fixture {
        store,
        checker,
        template_id,
        owner,
        member,
    }
}

async fn check(
    f: &Fixture,
    kind: ResourceKind,
    id: uuid::Uuid,
    user: Option<&Identity>,
    action: Action,
) -> Decision {
    f.checker
        .check_access(CheckRequest {
            kind,
            resource_id: Some(id),
            user,
            action,
        })
        .await
}

#[tokio::test]
async fn admin_is_granted_everywhere() {
    let f = fixture(false);
    let admin = Identity::admin(UserId::new());

    for (kind, action) in [
        (ResourceKind::Template, Action::Delete),
        (ResourceKind::Template, Action::ManageAccess),
        (ResourceKind::Question, Action::Reorder),
        (ResourceKind::Form, Action::ReadAll),
        (ResourceKind::UserForms, Action::Read),
    ] {
        let decision = check(&f, kind, uuid::Uuid::now_v7(), Some(&admin), action).await;
        assert!(decision.access, "{kind:?}/{action:?}");
        assert_eq!(decision.role, Some(RoleToken::Admin));
    }
}

#[tokio::test]
async fn anonymous_read_follows_visibility() {
    let public = fixture(true);
    let decision = check(
        &public,
        ResourceKind::Template,
        *public.template_id.as_uuid(),
        None,
        Action::Read,
    )
    .await;
    assert!(decision.access);
    assert_eq!(decision.role, Some(RoleToken::Any));

    let private = fixture(false);
    let decision = check(
        &private,
        ResourceKind::Template,
        *private.template_id.as_uuid(),
        None,
        Action::Read,
    )
    .await;
    assert!(!decision.access);
    assert_eq!(decision.denial, Some(DenialKind::Unauthorized));
}

#[tokio::test]
async fn owner_precedes_acl_even_when_both_apply() {
    let f = fixture(false);
    // Put the owner on their own ACL as well; the grade must stay `owner`.
    f.store.grant_access(f.template_id, f.owner).unwrap();

    let owner = Identity::user(f.owner);
    for action in [Action::Read, Action::Update, Action::Delete, Action::ManageAccess] {
        let decision = check(
            &f,
            ResourceKind::Template,
            *f.template_id.as_uuid(),
            Some(&owner),
            action,
        )
        .await;
        assert!(decision.access, "{action:?}");
        assert_eq!(decision.role, Some(RoleToken::Owner));
    }
}

#[tokio::test]
async fn revoking_an_acl_entry_takes_effect_immediately() {
    let f = fixture(false);
    let member = Identity::user(f.member);

    let before = check(
        &f,
        ResourceKind::Template,
        *f.template_id.as_uuid(),
        Some(&member),
        Action::Read,
    )
    .await;
    assert!(before.access);
    assert_eq!(before.role, Some(RoleToken::Acl));

    f.store.revoke_access(f.template_id, f.member).unwrap();

    // No caching: the very next check must see the revocation.
    let after = check(
        &f,
        ResourceKind::Template,
        *f.template_id.as_uuid(),
        Some(&member),
        Action::Read,
    )
    .await;
    assert!(!after.access);
}

#[tokio::test]
async fn delegation_matches_the_direct_template_decision() {
    let f = fixture(false);

    let question_id = QuestionId::new();
    f.store
        .insert_question(QuestionRecord::new(question_id, f.template_id, "q1"));

    let form_id = FormId::new();
    f.store
        .insert_form(FormRecord::new(form_id, f.template_id, UserId::new()));

    let answer_id = AnswerId::new();
    f.store
        .insert_answer(AnswerRecord::new(answer_id, form_id, "yes"));

    let member = Identity::user(f.member);

    let direct = check(
        &f,
        ResourceKind::Template,
        *f.template_id.as_uuid(),
        Some(&member),
        Action::Read,
    )
    .await;

    let via_question = check(
        &f,
        ResourceKind::Question,
        *question_id.as_uuid(),
        Some(&member),
        Action::Update,
    )
    .await;
    // Same grade, different action: `acl` is not enough for update.
    assert!(!via_question.access);

    let via_form = check(
        &f,
        ResourceKind::Form,
        *form_id.as_uuid(),
        Some(&member),
        Action::Read,
    )
    .await;
    assert_eq!(via_form.access, direct.access);
    assert_eq!(via_form.role, direct.role);

    let via_answer = check(
        &f,
        ResourceKind::Answer,
        *answer_id.as_uuid(),
        Some(&member),
        Action::Read,
    )
    .await;
    assert_eq!(via_answer.access, direct.access);
    assert_eq!(via_answer.role, direct.role);
}

#[tokio::test]
async fn broken_ownership_chain_short_circuits() {
    let f = fixture(false);
    let user = Identity::user(UserId::new());

    // Question pointing at nothing: the question exists, its template is gone.
    let question_id = QuestionId::new();
    f.store
        .insert_question(QuestionRecord::new(question_id, TemplateId::new(), "orphan"));
    let decision = check(
        &f,
        ResourceKind::Question,
        *question_id.as_uuid(),
        Some(&user),
        Action::Update,
    )
    .await;
    assert_eq!(decision.reason.as_deref(), Some("Template not found"));

    // Answer whose form is missing stops at the form hop.
    let answer_id = AnswerId::new();
    f.store
        .insert_answer(AnswerRecord::new(answer_id, FormId::new(), "stranded"));
    let decision = check(
        &f,
        ResourceKind::Answer,
        *answer_id.as_uuid(),
        Some(&user),
        Action::Read,
    )
    .await;
    assert_eq!(decision.reason.as_deref(), Some("Form not found"));

    // Unknown answer id stops at the first hop.
    let decision = check(
        &f,
        ResourceKind::Answer,
        uuid::Uuid::now_v7(),
        Some(&user),
        Action::Read,
    )
    .await;
    assert_eq!(decision.reason.as_deref(), Some("Answer not found"));
}
