//! End-to-end access control over the HTTP surface.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use formlane_api::app::build_app;
use formlane_core::{
    AccountRole, FormRecord, QuestionRecord, TemplateRecord, UserRecord,
    FormId, QuestionId, TemplateId, UserId,
};
use formlane_store::InMemoryStore;

struct Account {
    id: UserId,
    role: AccountRole,
}

impl Account {
    fn user() -> Self {
        Self { id: UserId::new(), role: AccountRole::User }
    }

    fn admin() -> Self {
        Self { id: UserId::new(), role: AccountRole::Admin }
    }
}

struct Fixture {
    store: Arc<InMemoryStore>,
    owner: Account,
    member: Account,
    stranger: Account,
    admin: Account,
    public_template: TemplateId,
    private_template: TemplateId,
}

impl Fixture {
    fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let owner = Account::user();
        let member = Account::user();
        let stranger = Account::user();
        let admin = Account::admin();

        for account in [&owner, &member, &stranger, &admin] {
            store.insert_user(UserRecord { id: account.id, role: account.role });
        }

        let public_template = TemplateId::new();
        store.insert_template(
            TemplateRecord::new(public_template, owner.id, true).titled("Public survey"),
        );

        let private_template = TemplateId::new();
        store.insert_template(
            TemplateRecord::new(private_template, owner.id, false).titled("Private survey"),
        );

        Self { store, owner, member, stranger, admin, public_template, private_template }
    }

    fn app(&self) -> Router {
        build_app(self.store.clone())
    }

    fn grant_member(&self) {
        self.store
            .grant_access(self.private_template, self.member.id)
            .unwrap();
    }
}

async fn send(
    app: Router,
    method: &str,
    uri: &str,
    caller: Option<&Account>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(account) = caller {
        builder = builder.header("x-user-id", account.id.to_string()).header(
            "x-user-role",
            match account.role {
                AccountRole::Admin => "ADMIN",
                AccountRole::User => "USER",
            },
        );
    }

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn anonymous_sees_public_templates_only() {
    let fx = Fixture::new();

    let (status, body) = send(
        fx.app(),
        "GET",
        &format!("/templates/{}", fx.public_template),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Public survey");

    let (status, body) = send(
        fx.app(),
        "GET",
        &format!("/templates/{}", fx.private_template),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Unauthorized");
}

#[tokio::test]
async fn unknown_template_is_not_found() {
    let fx = Fixture::new();

    let (status, body) = send(
        fx.app(),
        "GET",
        &format!("/templates/{}", TemplateId::new()),
        Some(&fx.stranger),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Template not found");
}

#[tokio::test]
async fn acl_grant_opens_reads_but_not_writes() {
    let fx = Fixture::new();
    let uri = format!("/templates/{}", fx.private_template);

    let (status, _) = send(fx.app(), "GET", &uri, Some(&fx.member), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        fx.app(),
        "POST",
        &format!("/templates/{}/access", fx.private_template),
        Some(&fx.owner),
        Some(json!({ "userId": fx.member.id })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(fx.app(), "GET", &uri, Some(&fx.member), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        fx.app(),
        "PUT",
        &uri,
        Some(&fx.member),
        Some(json!({ "title": "hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn revocation_takes_effect_on_next_request() {
    let fx = Fixture::new();
    fx.grant_member();
    let uri = format!("/templates/{}", fx.private_template);

    let (status, _) = send(fx.app(), "GET", &uri, Some(&fx.member), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        fx.app(),
        "DELETE",
        &format!("/templates/{}/access/{}", fx.private_template, fx.member.id),
        Some(&fx.owner),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(fx.app(), "GET", &uri, Some(&fx.member), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn submitter_reads_own_form_and_template_owner_lists_submissions() {
    let fx = Fixture::new();
    fx.grant_member();

    let (status, body) = send(
        fx.app(),
        "POST",
        "/forms",
        Some(&fx.member),
        Some(json!({ "templateId": fx.private_template })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let form_id = body["id"].as_str().unwrap().to_string();

    // The submitter keeps read access even though forms are not ACL-scoped.
    let (status, _) = send(
        fx.app(),
        "GET",
        &format!("/forms/{form_id}"),
        Some(&fx.member),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        fx.app(),
        "GET",
        &format!("/forms/{form_id}"),
        Some(&fx.stranger),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        fx.app(),
        "GET",
        &format!("/templates/{}/forms", fx.private_template),
        Some(&fx.owner),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn stranger_cannot_submit_to_private_template() {
    let fx = Fixture::new();

    let (status, _) = send(
        fx.app(),
        "POST",
        "/forms",
        Some(&fx.stranger),
        Some(json!({ "templateId": fx.private_template })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn bulk_question_update_requires_rights_on_every_template() {
    let fx = Fixture::new();

    let other = Account::user();
    fx.store.insert_user(UserRecord { id: other.id, role: other.role });
    let other_template = TemplateId::new();
    fx.store
        .insert_template(TemplateRecord::new(other_template, other.id, false));

    let mine = QuestionRecord::new(QuestionId::new(), fx.private_template, "Mine");
    let theirs = QuestionRecord::new(QuestionId::new(), other_template, "Theirs");
    fx.store.insert_question(mine.clone());
    fx.store.insert_question(theirs.clone());

    let (status, _) = send(
        fx.app(),
        "PUT",
        "/questions",
        Some(&fx.owner),
        Some(json!({
            "questions": [
                { "id": mine.id, "title": "Mine v2" },
                { "id": theirs.id, "title": "Theirs v2" },
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        fx.app(),
        "PUT",
        "/questions",
        Some(&fx.owner),
        Some(json!({
            "questions": [{ "id": mine.id, "title": "Mine v2" }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn admin_bypasses_ownership_everywhere() {
    let fx = Fixture::new();

    let (status, _) = send(
        fx.app(),
        "GET",
        &format!("/templates/{}", fx.private_template),
        Some(&fx.admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        fx.app(),
        "DELETE",
        &format!("/templates/{}", fx.private_template),
        Some(&fx.admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn me_routes_scope_to_the_caller() {
    let fx = Fixture::new();
    let form = FormRecord::new(FormId::new(), fx.public_template, fx.member.id);
    fx.store.insert_form(form);

    let (status, body) = send(fx.app(), "GET", "/me/templates", Some(&fx.owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = send(fx.app(), "GET", "/me/forms", Some(&fx.member), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(fx.app(), "GET", "/me/forms", None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
