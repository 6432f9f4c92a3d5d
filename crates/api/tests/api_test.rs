//! Integration tests for API endpoints.
//!
//! Requests go through the full router (identity, validation, fault
//! boundary, CORS) backed by the in-memory store. Store failures are
//! simulated with the automocked `Store`.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use common::AppError;
use domain::{Landlord, Property, Role, SubscriptionTier, User};
use rentdesk_api::{
    auth::TokenService,
    create_router,
    store::{MemoryStore, MockStore, Store},
    ApiConfig, AppState,
};

const EMAIL_TAKEN: &str = "This email address is already registered.";
const OWNER_ROLE_RESERVED: &str = "Only the account owner can assign the owner role.";

// =============================================================================
// Helpers
// =============================================================================

fn config() -> ApiConfig {
    ApiConfig {
        cors_allowed_origins: Vec::new(),
        ..ApiConfig::default()
    }
}

fn app_with(store: Arc<dyn Store>, config: ApiConfig) -> Router {
    create_router(AppState::new(store, config))
}

fn token_for(user: &User) -> String {
    TokenService::new(config().jwt)
        .issue(user)
        .unwrap()
        .access_token
}

struct Response {
    status: StatusCode,
    headers: HeaderMap,
    json: Value,
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
    origin: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    if let Some(origin) = origin {
        builder = builder.header(header::ORIGIN, origin);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Response {
        status,
        headers,
        json,
    }
}

async fn get(app: &Router, uri: &str, token: Option<&str>) -> Response {
    send(app, Method::GET, uri, token, None, None).await
}

async fn post(app: &Router, uri: &str, token: Option<&str>, body: Value) -> Response {
    send(app, Method::POST, uri, token, Some(body), None).await
}

async fn put(app: &Router, uri: &str, token: Option<&str>, body: Value) -> Response {
    send(app, Method::PUT, uri, token, Some(body), None).await
}

/// Seeded tenant: landlord, one user with `role`, and that user's token.
struct Tenant {
    landlord: Landlord,
    user: User,
    token: String,
}

async fn seed_tenant(store: &MemoryStore, tier: SubscriptionTier, role: Role) -> Tenant {
    let suffix = Uuid::new_v4().simple().to_string();
    let landlord = store
        .save_landlord(Landlord::on_trial(
            format!("Landlord {}", suffix),
            format!("billing-{}@x.com", suffix),
            tier,
            Utc::now(),
        ))
        .await
        .unwrap();
    let user = store
        .save_user(User::new(
            Some(landlord.id),
            "Test".to_string(),
            "User".to_string(),
            format!("{}-{}@x.com", role, suffix),
            role,
            String::new(),
        ))
        .await
        .unwrap();
    let token = token_for(&user);
    Tenant {
        landlord,
        user,
        token,
    }
}

async fn seed_super_admin(store: &MemoryStore) -> String {
    let user = store
        .save_user(User::new(
            None,
            "Super".to_string(),
            "Admin".to_string(),
            "root@x.com".to_string(),
            Role::SuperAdmin,
            String::new(),
        ))
        .await
        .unwrap();
    token_for(&user)
}

async fn seed_property(store: &MemoryStore, landlord_id: Uuid, name: &str) -> Property {
    let now = Utc::now();
    store
        .save_property(Property {
            id: Uuid::new_v4(),
            landlord_id,
            name: name.to_string(),
            address: "1 Main Street".to_string(),
            city: None,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap()
}

fn memory_app() -> (Arc<MemoryStore>, Router) {
    let store = Arc::new(MemoryStore::new());
    let app = app_with(store.clone(), config());
    (store, app)
}

// =============================================================================
// Identity
// =============================================================================

#[tokio::test]
async fn test_anonymous_request_to_protected_route_is_401() {
    let (_, app) = memory_app();

    let response = get(&app, "/properties", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json["error"]["code"], "UNAUTHORIZED");

    let response = get(&app, "/properties", Some("not-a-jwt")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_is_public() {
    let (_, app) = memory_app();

    let response = get(&app, "/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["status"], "healthy");
}

#[tokio::test]
async fn test_register_then_login_then_me() {
    let (_, app) = memory_app();

    let response = post(
        &app,
        "/auth/register",
        None,
        json!({
            "company_name": "Acme Rentals",
            "email": "billing@acme.test",
            "owner": {
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@acme.test",
                "password": "correct-horse"
            }
        }),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert!(response.json["token"]["access_token"].is_string());

    let response = post(
        &app,
        "/auth/login",
        None,
        json!({"email": "ada@acme.test", "password": "correct-horse"}),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["token_type"], "Bearer");
    let token = response.json["access_token"].as_str().unwrap().to_string();

    let response = get(&app, "/auth/me", Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["email"], "ada@acme.test");
    assert_eq!(response.json["full_name"], "Ada Lovelace");
}

#[tokio::test]
async fn test_login_with_wrong_password_is_rejected() {
    let (_, app) = memory_app();

    let response = post(
        &app,
        "/auth/login",
        None,
        json!({"email": "nobody@acme.test", "password": "whatever-it-is"}),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json["error"]["code"], "INVALID_CREDENTIALS");
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_missing_required_fields_are_all_reported() {
    let (store, app) = memory_app();
    let tenant = seed_tenant(&store, SubscriptionTier::Basic, Role::Owner).await;

    let response = post(&app, "/properties", Some(&tenant.token), json!({})).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json["error"]["code"], "VALIDATION_ERROR");
    assert!(response.json["errors"]["name"].is_array());
    assert!(response.json["errors"]["address"].is_array());
}

#[tokio::test]
async fn test_value_outside_list_is_rejected() {
    let (store, app) = memory_app();
    let tenant = seed_tenant(&store, SubscriptionTier::Pro, Role::Owner).await;

    let response = post(
        &app,
        "/users",
        Some(&tenant.token),
        json!({
            "first_name": "Sam",
            "last_name": "Doe",
            "email": "sam@x.com",
            "role": "janitor",
            "password": "long-enough"
        }),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.json["errors"]["role"].is_array());
    assert!(response.json["errors"].get("email").is_none());
}

#[tokio::test]
async fn test_malformed_body_is_reported_on_body() {
    let (store, app) = memory_app();
    let tenant = seed_tenant(&store, SubscriptionTier::Basic, Role::Owner).await;

    let response = post(
        &app,
        "/properties",
        Some(&tenant.token),
        json!({"name": 42, "address": "1 Main Street"}),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.json["errors"]["body"].is_array());
}

#[tokio::test]
async fn test_taken_owner_email_reports_nested_key() {
    let (store, app) = memory_app();
    store
        .save_user(User::new(
            None,
            "Existing".to_string(),
            "User".to_string(),
            "taken@x.com".to_string(),
            Role::SuperAdmin,
            String::new(),
        ))
        .await
        .unwrap();

    let response = post(
        &app,
        "/auth/register",
        None,
        json!({
            "company_name": "Acme",
            "email": "acme@x.com",
            "owner": {
                "first_name": "A",
                "last_name": "B",
                "email": "taken@x.com",
                "mobile": "123"
            }
        }),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json["errors"]["owner.email"][0], EMAIL_TAKEN);
}

#[tokio::test]
async fn test_template_landlord_id_depends_on_caller() {
    let (store, app) = memory_app();
    let admin_token = seed_super_admin(&store).await;
    let tenant = seed_tenant(&store, SubscriptionTier::Pro, Role::Owner).await;
    let template = json!({
        "name": "Receipt",
        "type": "payment_receipt",
        "body": "<p>Received {{ amount }}</p>"
    });

    let response = post(&app, "/document-templates", Some(&admin_token), template.clone()).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.json["errors"]["landlord_id"].is_array());

    let response = post(&app, "/document-templates", Some(&tenant.token), template).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json["landlord_id"], tenant.landlord.id.to_string());
    assert_eq!(response.json["variables"], json!(["amount"]));

    let mut named = json!({
        "landlord_id": tenant.landlord.id,
        "name": "Notice",
        "type": "late_payment_notice",
        "body": "<p>Pay up</p>"
    });
    let response = post(&app, "/document-templates", Some(&admin_token), named.clone()).await;
    assert_eq!(response.status, StatusCode::CREATED);

    named["landlord_id"] = json!(Uuid::new_v4());
    let response = post(&app, "/document-templates", Some(&admin_token), named).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.json["errors"]["landlord_id"].is_array());
}

#[tokio::test]
async fn test_render_reports_missing_values() {
    let (store, app) = memory_app();
    let tenant = seed_tenant(&store, SubscriptionTier::Pro, Role::Owner).await;

    let created = post(
        &app,
        "/document-templates",
        Some(&tenant.token),
        json!({
            "name": "Receipt",
            "type": "payment_receipt",
            "body": "<p>{{ tenant }} paid {{ amount }}</p>"
        }),
    )
    .await;
    let uri = format!("/document-templates/{}/render", created.json["id"].as_str().unwrap());

    let response = post(&app, &uri, Some(&tenant.token), json!({"values": {"tenant": "Ada"}})).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.json["errors"]["values.amount"].is_array());

    let response = post(
        &app,
        &uri,
        Some(&tenant.token),
        json!({"values": {"tenant": "Ada", "amount": "100"}}),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["html"], "<p>Ada paid 100</p>");

    let response = post(
        &app,
        &uri,
        Some(&tenant.token),
        json!({"values": {"tenant": "<img src=x onerror=alert(1)>", "amount": "100"}}),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json["html"],
        "<p>&lt;img src=x onerror=alert(1)&gt; paid 100</p>"
    );
}

// =============================================================================
// Authorization & tenant scoping
// =============================================================================

#[tokio::test]
async fn test_manager_cannot_create_users() {
    let (store, app) = memory_app();
    let tenant = seed_tenant(&store, SubscriptionTier::Pro, Role::Manager).await;

    let response = post(&app, "/users", Some(&tenant.token), json!({})).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(response.json.get("errors").is_none());
}

#[tokio::test]
async fn test_foreign_record_is_not_found() {
    let (store, app) = memory_app();
    let mine = seed_tenant(&store, SubscriptionTier::Basic, Role::Owner).await;
    let theirs = seed_tenant(&store, SubscriptionTier::Basic, Role::Owner).await;
    let property = seed_property(&store, theirs.landlord.id, "Elsewhere").await;

    let uri = format!("/properties/{}", property.id);
    assert_eq!(get(&app, &uri, Some(&mine.token)).await.status, StatusCode::NOT_FOUND);
    assert_eq!(get(&app, &uri, Some(&theirs.token)).await.status, StatusCode::OK);

    let listed = get(&app, "/properties", Some(&mine.token)).await;
    assert_eq!(listed.json["meta"]["total"], 0);
}

#[tokio::test]
async fn test_tier_limit_blocks_creation() {
    let (store, app) = memory_app();
    let tenant = seed_tenant(&store, SubscriptionTier::Basic, Role::Owner).await;
    for n in 0..3 {
        seed_property(&store, tenant.landlord.id, &format!("Block {}", n)).await;
    }

    let response = post(
        &app,
        "/properties",
        Some(&tenant.token),
        json!({"name": "Block 4", "address": "4 Main Street"}),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.json["errors"]["subscription_tier"].is_array());
}

#[tokio::test]
async fn test_deactivated_user_is_forbidden() {
    let (store, app) = memory_app();
    let tenant = seed_tenant(&store, SubscriptionTier::Basic, Role::Owner).await;
    let mut user = tenant.user.clone();
    user.is_active = false;
    store.save_user(user).await.unwrap();

    let response = post(
        &app,
        "/properties",
        Some(&tenant.token),
        json!({"name": "Cedar Court", "address": "12 Hamra Street"}),
    )
    .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_cannot_change_owner_password_or_role() {
    let (store, app) = memory_app();
    let admin = seed_tenant(&store, SubscriptionTier::Pro, Role::Admin).await;
    let owner = store
        .save_user(User::new(
            Some(admin.landlord.id),
            "Olive".to_string(),
            "Owner".to_string(),
            "olive@x.com".to_string(),
            Role::Owner,
            "original-hash".to_string(),
        ))
        .await
        .unwrap();

    let response = put(
        &app,
        &format!("/users/{}", owner.id),
        Some(&admin.token),
        json!({"password": "hijacked-pass", "role": "staff"}),
    )
    .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let unchanged = store.find_user(owner.id).await.unwrap().unwrap();
    assert_eq!(unchanged.role, Role::Owner);
    assert_eq!(unchanged.password_hash, "original-hash");

    // Contact details stay editable
    let response = put(
        &app,
        &format!("/users/{}", owner.id),
        Some(&admin.token),
        json!({"mobile": "555-0100"}),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_cannot_promote_self_to_owner() {
    let (store, app) = memory_app();
    let admin = seed_tenant(&store, SubscriptionTier::Pro, Role::Admin).await;

    let response = put(
        &app,
        &format!("/users/{}", admin.user.id),
        Some(&admin.token),
        json!({"role": "owner"}),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json["errors"]["role"][0], OWNER_ROLE_RESERVED);

    let unchanged = store.find_user(admin.user.id).await.unwrap().unwrap();
    assert_eq!(unchanged.role, Role::Admin);
}

#[tokio::test]
async fn test_only_owner_can_create_owner() {
    let (store, app) = memory_app();
    let admin = seed_tenant(&store, SubscriptionTier::Pro, Role::Admin).await;
    let body = json!({
        "first_name": "Second",
        "last_name": "Owner",
        "email": "second-owner@x.com",
        "role": "owner",
        "password": "long-enough"
    });

    let response = post(&app, "/users", Some(&admin.token), body.clone()).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json["errors"]["role"][0], OWNER_ROLE_RESERVED);
    assert!(store
        .find_user_by_email("second-owner@x.com")
        .await
        .unwrap()
        .is_none());

    let owner = seed_tenant(&store, SubscriptionTier::Pro, Role::Owner).await;
    let response = post(&app, "/users", Some(&owner.token), body).await;
    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_suspended_landlord_locks_out_its_users() {
    let (store, app) = memory_app();
    let root = seed_super_admin(&store).await;
    let tenant = seed_tenant(&store, SubscriptionTier::Basic, Role::Owner).await;

    let response = put(
        &app,
        &format!("/landlords/{}", tenant.landlord.id),
        Some(&root),
        json!({"is_active": false}),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = post(
        &app,
        "/properties",
        Some(&tenant.token),
        json!({"name": "Cedar Court", "address": "12 Hamra Street"}),
    )
    .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_suspended_landlord_owner_cannot_login() {
    let (store, app) = memory_app();
    let root = seed_super_admin(&store).await;

    let response = post(
        &app,
        "/auth/register",
        None,
        json!({
            "company_name": "Acme Rentals",
            "email": "billing@acme.test",
            "owner": {
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@acme.test",
                "password": "correct-horse"
            }
        }),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let landlord_id = response.json["landlord"]["id"].as_str().unwrap().to_string();

    let response = put(
        &app,
        &format!("/landlords/{}", landlord_id),
        Some(&root),
        json!({"is_active": false}),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = post(
        &app,
        "/auth/login",
        None,
        json!({"email": "ada@acme.test", "password": "correct-horse"}),
    )
    .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_email_of_another_user_is_rejected_case_insensitively() {
    let (store, app) = memory_app();
    let owner = seed_tenant(&store, SubscriptionTier::Pro, Role::Owner).await;
    let staff = seed_tenant(&store, SubscriptionTier::Pro, Role::Staff).await;

    let response = put(
        &app,
        &format!("/users/{}", owner.user.id),
        Some(&owner.token),
        json!({"email": staff.user.email.to_uppercase()}),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json["errors"]["email"][0], EMAIL_TAKEN);
}

#[tokio::test]
async fn test_failed_owner_save_leaves_no_landlord() {
    let mut store = MockStore::new();
    store.expect_exists().returning(|_| Ok(false));
    store.expect_save_landlord().never();
    store
        .expect_save_landlord_with_owner()
        .returning(|_, _| Err(AppError::invalid("email", EMAIL_TAKEN)));
    let app = app_with(Arc::new(store), config());

    let response = post(
        &app,
        "/auth/register",
        None,
        json!({
            "company_name": "Acme Rentals",
            "email": "billing@acme.test",
            "owner": {
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@acme.test",
                "password": "correct-horse"
            }
        }),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json["errors"]["owner.email"][0], EMAIL_TAKEN);
}

// =============================================================================
// CORS & faults
// =============================================================================

#[tokio::test]
async fn test_cors_allows_localhost_and_rejects_unknown_origin() {
    let (_, app) = memory_app();

    let allowed = send(&app, Method::GET, "/health", None, None, Some("http://localhost:5173")).await;
    assert_eq!(
        allowed.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
    assert_eq!(allowed.headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");

    let rejected = send(&app, Method::GET, "/health", None, None, Some("http://evil.example.com")).await;
    assert!(rejected.headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn test_store_failure_renders_fault_with_cors() {
    let mut store = MockStore::new();
    store
        .expect_find_user_by_email()
        .returning(|_| Err(AppError::internal("connection refused")));
    let app = app_with(Arc::new(store), config());

    let response = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": "ada@acme.test", "password": "correct-horse"})),
        Some("http://localhost:5173"),
    )
    .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json["message"], "Server Error");
    assert_ne!(response.json["error"], "connection refused");
    assert!(response.json.get("exception").is_none());
    assert!(response.json["timestamp"].is_string());
    assert_eq!(
        response.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
}

#[tokio::test]
async fn test_panic_is_rendered_with_detail_in_debug() {
    let mut store = MockStore::new();
    store
        .expect_find_user_by_email()
        .returning(|_| panic!("store exploded"));
    let app = app_with(
        Arc::new(store),
        ApiConfig {
            debug: true,
            ..config()
        },
    );

    let response = post(
        &app,
        "/auth/login",
        None,
        json!({"email": "ada@acme.test", "password": "correct-horse"}),
    )
    .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json["error"], "store exploded");
    assert_eq!(response.json["exception"], "panic");
}
