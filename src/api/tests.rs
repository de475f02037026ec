use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use std::sync::Arc;
use tower::ServiceExt;

use super::create_router;
use crate::auth::password::{hash_password, verify_password};
use crate::config::Config;
use crate::db::{memory_store, sample_vehicle, AccountProfile, AccountType, NewAccount};
use crate::AppState;

const PASSWORD: &str = "Str0ng!Pass123";

async fn test_state() -> Arc<AppState> {
    let mut config = Config::default();
    config.auth.token_secret = Some("router-test-secret".to_string());
    Arc::new(AppState::new(config, memory_store().await).unwrap())
}

fn app(state: &Arc<AppState>) -> Router {
    create_router(state.clone())
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

fn session_set(response: &Response) -> Option<String> {
    set_cookies(response)
        .into_iter()
        .find(|c| c.starts_with("jwt=") && !c.contains("Max-Age=0"))
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

/// Insert an account and return its id and a cookie header for it.
async fn account_with_cookie(state: &AppState, email: &str, role: AccountType) -> (i64, String) {
    let account_id = state
        .store
        .insert_account(&NewAccount {
            first_name: "Happy".to_string(),
            last_name: "Tester".to_string(),
            email: email.to_string(),
            password_hash: hash_password(PASSWORD).unwrap(),
            account_type: role,
        })
        .await
        .unwrap();
    let account = state.store.find_account_by_id(account_id).await.unwrap().unwrap();
    let token = state.tokens.issue(&AccountProfile::from(account)).unwrap();
    (account_id, format!("jwt={}", token))
}

async fn classification_count(state: &AppState) -> usize {
    state.store.list_classifications().await.unwrap().len()
}

#[tokio::test]
async fn test_register_new_account() {
    let state = test_state().await;
    let app = app(&state);

    let response = send(
        &app,
        post_form(
            "/account/register",
            "account_firstname=Ana&account_lastname=Lee&account_email=ana%40example.com&account_password=Str0ng%21Pass123",
            None,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_text(response).await;
    assert!(body.contains("registered Ana"));

    let account = state.store.find_account_by_email("ana@example.com").await.unwrap().unwrap();
    assert_eq!(account.account_type, AccountType::Client);
    assert_ne!(account.account_password, PASSWORD);
    assert!(verify_password(PASSWORD, &account.account_password));
}

#[tokio::test]
async fn test_register_duplicate_email_is_rejected() {
    let state = test_state().await;
    let app = app(&state);
    account_with_cookie(&state, "ana@example.com", AccountType::Client).await;

    let response = send(
        &app,
        post_form(
            "/account/register",
            "account_firstname=Ana&account_lastname=Lee&account_email=ana%40example.com&account_password=Str0ng%21Pass123",
            None,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_text(response).await;
    assert!(body.contains("Email exists. Please log in or use different email"));
    // Sticky name survives, password does not
    assert!(body.contains(r#"value="Ana""#));
    assert!(!body.contains(PASSWORD));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM account")
        .fetch_one(state.store.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let state = test_state().await;
    let app = app(&state);
    account_with_cookie(&state, "ana@example.com", AccountType::Client).await;

    let wrong_password = send(
        &app,
        post_form(
            "/account/login",
            "account_email=ana%40example.com&account_password=Wrong%21Pass123",
            None,
        ),
    )
    .await;
    let unknown_email = send(
        &app,
        post_form(
            "/account/login",
            "account_email=nobody%40example.com&account_password=Wrong%21Pass123",
            None,
        ),
    )
    .await;

    for response in [wrong_password, unknown_email] {
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(session_set(&response).is_none());
        let body = body_text(response).await;
        assert!(body.contains("Invalid email or password."));
    }
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let state = test_state().await;
    let app = app(&state);
    account_with_cookie(&state, "ana@example.com", AccountType::Client).await;

    let response = send(
        &app,
        post_form(
            "/account/login",
            "account_email=Ana%40Example.com&account_password=Str0ng%21Pass123",
            None,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/account/");
    let cookie = session_set(&response).expect("session cookie");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Max-Age=3600"));
    assert!(!cookie.contains("Secure"));

    let token = cookie
        .trim_start_matches("jwt=")
        .split(';')
        .next()
        .unwrap()
        .to_string();
    let claims = state.tokens.verify(&token).unwrap();
    assert_eq!(claims.email, "ana@example.com");
    assert_eq!(claims.role, AccountType::Client);
}

#[tokio::test]
async fn test_staff_view_redirects_anonymous() {
    let state = test_state().await;
    let app = app(&state);

    let response = send(&app, get("/inv/add-inventory", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/account/login");
    assert!(set_cookies(&response).iter().any(|c| c.starts_with("notice=")));

    let response = send(&app, get("/account/", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/account/login");
}

#[tokio::test]
async fn test_staff_action_forbidden_without_role() {
    let state = test_state().await;
    let app = app(&state);

    let response = send(
        &app,
        post_form("/inv/add-classification", "classification_name=Truck", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_text(response).await;
    assert!(body.contains("Please log in with proper permissions."));

    let (_, client) = account_with_cookie(&state, "client@example.com", AccountType::Client).await;
    let response = send(
        &app,
        post_form("/inv/add-classification", "classification_name=Truck", Some(&client)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, get("/inv/add-classification", Some(&client))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    assert_eq!(classification_count(&state).await, 0);
}

#[tokio::test]
async fn test_add_classification_validation() {
    let state = test_state().await;
    let app = app(&state);
    let (_, employee) = account_with_cookie(&state, "happy@example.com", AccountType::Employee).await;

    let response = send(
        &app,
        post_form("/inv/add-classification", "classification_name=Sports+Car", Some(&employee)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_text(response).await;
    assert!(body.contains("cannot contain spaces or special characters"));
    assert!(body.contains(r#"value="Sports Car""#));
    assert_eq!(classification_count(&state).await, 0);

    let response = send(
        &app,
        post_form("/inv/add-classification", "classification_name=Truck", Some(&employee)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/inv/");
    assert!(state.store.classification_name_exists("Truck").await.unwrap());
}

#[tokio::test]
async fn test_add_and_list_inventory() {
    let state = test_state().await;
    let app = app(&state);
    let (_, employee) = account_with_cookie(&state, "happy@example.com", AccountType::Employee).await;
    let sport = state.store.insert_classification("Sport").await.unwrap();

    let body = format!(
        "classification_id={}&inv_make=Chevy&inv_model=Camaro&inv_year=2018&inv_description=Fast&inv_image=%2Fimages%2Fvehicles%2Fcamaro.jpg&inv_thumbnail=%2Fimages%2Fvehicles%2Fcamaro-tn.jpg&inv_price=25000&inv_miles=101222&inv_color=Black",
        sport.classification_id
    );
    let response = send(&app, post_form("/inv/add-inventory", &body, Some(&employee))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let uri = format!("/inv/getInventory/{}", sport.classification_id);
    let response = send(&app, get(&uri, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let items: Vec<serde_json::Value> = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["inv_make"], "Chevy");

    let uri = format!("/inv/type/{}", sport.classification_id);
    let body = body_text(send(&app, get(&uri, None)).await).await;
    assert!(body.contains("Chevy Camaro"));
    assert!(body.contains("25,000"));
}

#[tokio::test]
async fn test_invalid_vehicle_keeps_input() {
    let state = test_state().await;
    let app = app(&state);
    let (_, employee) = account_with_cookie(&state, "happy@example.com", AccountType::Employee).await;

    let response = send(
        &app,
        post_form("/inv/add-inventory", "inv_make=Chevy&inv_year=1850", Some(&employee)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_text(response).await;
    assert!(body.contains("Valid year required."));
    assert!(body.contains("Classification is required."));
    assert!(body.contains(r#"value="Chevy""#));
    assert!(state.store.latest_vehicles(5).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_profile_update_round_trip() {
    let state = test_state().await;
    let app = app(&state);
    let (id, cookie) = account_with_cookie(&state, "ana@example.com", AccountType::Client).await;
    let original_hash = state
        .store
        .find_account_by_id(id)
        .await
        .unwrap()
        .unwrap()
        .account_password;

    let body = format!(
        "account_id={}&account_firstname=Anna&account_lastname=Leigh&account_email=anna%40example.com",
        id
    );
    let response = send(&app, post_form("/account/update", &body, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/account/");
    assert!(session_set(&response).is_some());

    let account = state.store.find_account_by_email("anna@example.com").await.unwrap().unwrap();
    assert_eq!(account.account_id, id);
    assert_eq!(account.account_firstname, "Anna");
    assert_eq!(account.account_lastname, "Leigh");
    assert_eq!(account.account_password, original_hash);
}

#[tokio::test]
async fn test_profile_update_of_another_account_is_forbidden() {
    let state = test_state().await;
    let app = app(&state);
    let (_, cookie) = account_with_cookie(&state, "ana@example.com", AccountType::Client).await;
    let (other, _) = account_with_cookie(&state, "bob@example.com", AccountType::Client).await;

    let body = format!(
        "account_id={}&account_firstname=Evil&account_lastname=Eve&account_email=eve%40example.com",
        other
    );
    let response = send(&app, post_form("/account/update", &body, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let account = state.store.find_account_by_id(other).await.unwrap().unwrap();
    assert_eq!(account.account_email, "bob@example.com");
}

#[tokio::test]
async fn test_password_update() {
    let state = test_state().await;
    let app = app(&state);
    let (id, cookie) = account_with_cookie(&state, "ana@example.com", AccountType::Client).await;

    let weak = format!("account_id={}&account_password=short", id);
    let response = send(&app, post_form("/account/update-password", &weak, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_text(response).await;
    assert!(body.contains("Password must be at least 8 characters"));

    let strong = format!("account_id={}&account_password=NewPassw0rd", id);
    let response = send(&app, post_form("/account/update-password", &strong, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/account/");

    let account = state.store.find_account_by_id(id).await.unwrap().unwrap();
    assert!(verify_password("NewPassw0rd", &account.account_password));
}

#[tokio::test]
async fn test_invalid_token_clears_cookie() {
    let state = test_state().await;
    let app = app(&state);

    let response = send(&app, get("/", Some("jwt=not.a.token"))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/account/login");

    let cookies = set_cookies(&response);
    assert!(cookies.iter().any(|c| c.starts_with("jwt=") && c.contains("Max-Age=0")));
    assert!(cookies.iter().any(|c| c.starts_with("notice=")));
}

#[tokio::test]
async fn test_delete_classification_requires_admin_and_empty() {
    let state = test_state().await;
    let app = app(&state);
    let (_, employee) = account_with_cookie(&state, "happy@example.com", AccountType::Employee).await;
    let (_, admin) = account_with_cookie(&state, "admin@example.com", AccountType::Admin).await;
    let sport = state.store.insert_classification("Sport").await.unwrap();
    state
        .store
        .insert_vehicle(&sample_vehicle(sport.classification_id))
        .await
        .unwrap();
    let body = format!("classification_id={}", sport.classification_id);

    let response = send(&app, post_form("/inv/delete-classification", &body, Some(&employee))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/account/login");

    let response = send(&app, post_form("/inv/delete-classification", &body, Some(&admin))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let text = body_text(response).await;
    assert!(text.contains("still has vehicles assigned"));
    assert_eq!(classification_count(&state).await, 1);

    let empty = state.store.insert_classification("Empty").await.unwrap();
    let body = format!("classification_id={}", empty.classification_id);
    let response = send(&app, post_form("/inv/delete-classification", &body, Some(&admin))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/inv/");
    assert!(state.store.find_classification(empty.classification_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_logout_clears_session() {
    let state = test_state().await;
    let app = app(&state);
    let (_, cookie) = account_with_cookie(&state, "ana@example.com", AccountType::Client).await;

    let response = send(&app, get("/account/logout", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    let cookies = set_cookies(&response);
    assert!(cookies.iter().any(|c| c.starts_with("jwt=") && c.contains("Max-Age=0")));
}

#[tokio::test]
async fn test_flash_notice_shown_once() {
    let state = test_state().await;
    let app = app(&state);

    let response = send(&app, get("/", Some("notice=Welcome%20back"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookies(&response)
        .iter()
        .any(|c| c.starts_with("notice=") && c.contains("Max-Age=0")));
    let body = body_text(response).await;
    assert!(body.contains("Welcome back"));
}

#[tokio::test]
async fn test_missing_vehicle_and_error_route() {
    let state = test_state().await;
    let app = app(&state);

    let response = send(&app, get("/inv/detail/999", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, get("/inv/trigger-error", None)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_text(response).await;
    assert!(!body.contains("Intentional"));
}

#[tokio::test]
async fn test_edit_and_delete_vehicle() {
    let state = test_state().await;
    let app = app(&state);
    let (_, employee) = account_with_cookie(&state, "happy@example.com", AccountType::Employee).await;
    let (_, client) = account_with_cookie(&state, "client@example.com", AccountType::Client).await;
    let sport = state.store.insert_classification("Sport").await.unwrap();
    let inv_id = state
        .store
        .insert_vehicle(&sample_vehicle(sport.classification_id))
        .await
        .unwrap();

    let response = send(&app, get(&format!("/inv/edit/{}", inv_id), Some(&employee))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Edit Chevy Camaro"));
    assert!(body.contains(r#"value="2018""#));
    assert!(body.contains(&format!(r#"name="inv_id" value="{}""#, inv_id)));

    let update = format!(
        "inv_id={}&classification_id={}&inv_make=Chevy&inv_model=Camaro&inv_year=2019&inv_description=Fast&inv_image=%2Fimages%2Fvehicles%2Fcamaro.jpg&inv_thumbnail=%2Fimages%2Fvehicles%2Fcamaro-tn.jpg&inv_price=24000&inv_miles=101222&inv_color=Black",
        inv_id, sport.classification_id
    );
    let response = send(&app, post_form("/inv/update", &update, Some(&client))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, post_form("/inv/update", &update, Some(&employee))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/inv/");
    let item = state.store.find_vehicle(inv_id).await.unwrap().unwrap();
    assert_eq!(item.inv_year, 2019);
    assert_eq!(item.inv_price, 24000.0);

    let response = send(&app, get(&format!("/inv/delete/{}", inv_id), Some(&employee))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains(r#"value="2019""#));

    let delete = format!("inv_id={}", inv_id);
    let response = send(&app, post_form("/inv/delete", &delete, Some(&client))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(state.store.find_vehicle(inv_id).await.unwrap().is_some());

    let response = send(&app, post_form("/inv/delete", &delete, Some(&employee))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/inv/");
    assert!(state.store.find_vehicle(inv_id).await.unwrap().is_none());

    let response = send(&app, get(&format!("/inv/edit/{}", inv_id), Some(&employee))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_lost_race_is_conflict() {
    let state = test_state().await;
    let app = app(&state);
    // Another registration of the same email lands between validation and insert
    sqlx::query(
        "CREATE TRIGGER concurrent_registration BEFORE INSERT ON account
         WHEN NEW.account_firstname <> 'Early'
         BEGIN
             INSERT INTO account (account_firstname, account_lastname, account_email, account_password)
             VALUES ('Early', 'Bird', NEW.account_email, 'hash');
         END",
    )
    .execute(state.store.pool())
    .await
    .unwrap();

    let response = send(
        &app,
        post_form(
            "/account/register",
            "account_firstname=Ana&account_lastname=Lee&account_email=ana%40example.com&account_password=Str0ng%21Pass123",
            None,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_text(response).await;
    assert!(body.contains("Sorry, the registration failed."));
    assert!(!body.contains(r#"value="Ana""#));
}

#[tokio::test]
async fn test_profile_update_to_taken_email() {
    let state = test_state().await;
    let app = app(&state);
    let (id, cookie) = account_with_cookie(&state, "ana@example.com", AccountType::Client).await;
    account_with_cookie(&state, "bob@example.com", AccountType::Client).await;

    let body = format!(
        "account_id={}&account_firstname=Anna&account_lastname=Lee&account_email=Bob%40Example.com",
        id
    );
    let response = send(&app, post_form("/account/update", &body, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(session_set(&response).is_none());
    let text = body_text(response).await;
    assert!(text.contains("Email exists. Please use a different email."));
    assert!(text.contains(r#"value="Anna""#));

    let account = state.store.find_account_by_id(id).await.unwrap().unwrap();
    assert_eq!(account.account_email, "ana@example.com");
    assert_eq!(account.account_firstname, "Happy");

    // Keeping one's own email is not a conflict
    let body = format!(
        "account_id={}&account_firstname=Anna&account_lastname=Lee&account_email=ana%40example.com",
        id
    );
    let response = send(&app, post_form("/account/update", &body, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_expired_token_clears_cookie() {
    let state = test_state().await;
    let app = app(&state);
    let (id, _) = account_with_cookie(&state, "ana@example.com", AccountType::Client).await;
    let account = state.store.find_account_by_id(id).await.unwrap().unwrap();
    let issued_at = chrono::Utc::now().timestamp() - crate::auth::token::TOKEN_TTL_SECS - 60;
    let token = state
        .tokens
        .issue_at(&AccountProfile::from(account), issued_at)
        .unwrap();

    let response = send(&app, get("/account/", Some(&format!("jwt={}", token)))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/account/login");
    let cookies = set_cookies(&response);
    assert!(cookies.iter().any(|c| c.starts_with("jwt=") && c.contains("Max-Age=0")));
    assert!(cookies.iter().any(|c| c.starts_with("notice=")));
}

#[tokio::test]
async fn test_delete_classification_lost_race_is_conflict() {
    let state = test_state().await;
    let app = app(&state);
    let (_, admin) = account_with_cookie(&state, "admin@example.com", AccountType::Admin).await;
    let sport = state.store.insert_classification("Sport").await.unwrap();
    // A vehicle is filed under the classification between the check and the delete
    sqlx::query(
        "CREATE TRIGGER concurrent_vehicle BEFORE DELETE ON classification
         BEGIN
             INSERT INTO inventory (inv_make, inv_model, inv_year, inv_description, inv_image,
                                    inv_thumbnail, inv_price, inv_miles, inv_color, classification_id)
             VALUES ('Late', 'Arrival', 2020, 'Filed mid-delete', '/a.jpg', '/a-tn.jpg', 1, 0, 'Red',
                     OLD.classification_id);
         END",
    )
    .execute(state.store.pool())
    .await
    .unwrap();

    let body = format!("classification_id={}", sport.classification_id);
    let response = send(&app, post_form("/inv/delete-classification", &body, Some(&admin))).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let text = body_text(response).await;
    assert!(text.contains("still has vehicles assigned"));
    assert!(state.store.find_classification(sport.classification_id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_classification_store_failure_renders_form() {
    let state = test_state().await;
    let app = app(&state);
    let (_, admin) = account_with_cookie(&state, "admin@example.com", AccountType::Admin).await;
    let sport = state.store.insert_classification("Sport").await.unwrap();
    sqlx::query("DROP TABLE inventory")
        .execute(state.store.pool())
        .await
        .unwrap();

    let body = format!("classification_id={}", sport.classification_id);
    let response = send(&app, post_form("/inv/delete-classification", &body, Some(&admin))).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = body_text(response).await;
    assert!(text.contains("Sorry, the delete failed."));
    assert!(text.contains("Sport"));
    assert!(state.store.find_classification(sport.classification_id).await.unwrap().is_some());
}
