//! Servers breaking one part of the contract fail the matching case

use actix_web::http::{Method, StatusCode};
use authflow::error::CheckError;
use authflow::suite::{AUTH_HEADER, Context, Outcome, Suite};

use super::fixture::{self, Quirks};

#[actix_web::test]
async fn test_case_sensitive_username_fails_login() {
    let server = fixture::spawn(Quirks {
        case_sensitive_username: true,
        ..Quirks::default()
    });
    let ctx = Context::new(server.config());

    let report = Suite::auth_flow().run(&ctx).await;

    assert!(!report.is_success());
    assert!(matches!(
        report.case("login").unwrap().outcome,
        Outcome::Failed(CheckError::UnexpectedStatus { expected, actual, .. })
            if expected == StatusCode::OK && actual == StatusCode::UNAUTHORIZED
    ));
    // nothing was saved, so the cases relying on it cannot run
    assert!(matches!(
        report.case("profile").unwrap().outcome,
        Outcome::Failed(CheckError::MissingState(ref key)) if key == AUTH_HEADER
    ));
    // the token cases log in with the exact username and still pass
    assert!(matches!(report.case("status").unwrap().outcome, Outcome::Passed));
    assert!(matches!(report.case("tokens").unwrap().outcome, Outcome::Passed));
    assert!(matches!(report.case("delete_tokens").unwrap().outcome, Outcome::Passed));
}

#[actix_web::test]
async fn test_bulk_delete_sparing_caller_fails_delete_tokens() {
    let server = fixture::spawn(Quirks {
        keep_caller_on_delete_all: true,
        ..Quirks::default()
    });
    let ctx = Context::new(server.config());

    let report = Suite::auth_flow().run(&ctx).await;

    assert_eq!(report.failed(), 1, "only delete_tokens should fail:\n{}", report);
    assert!(matches!(
        report.case("delete_tokens").unwrap().outcome,
        Outcome::Failed(CheckError::UnexpectedStatus { expected, actual, .. })
            if expected == StatusCode::UNAUTHORIZED && actual == StatusCode::OK
    ));
}

#[actix_web::test]
async fn test_status_without_html_rendering_fails_status() {
    let server = fixture::spawn(Quirks {
        plain_status: true,
        ..Quirks::default()
    });
    let ctx = Context::new(server.config());

    let report = Suite::auth_flow().run(&ctx).await;

    assert_eq!(report.failed(), 1, "only status should fail:\n{}", report);
    assert!(matches!(
        report.case("status").unwrap().outcome,
        Outcome::Failed(CheckError::Assertion(_))
    ));
}

#[actix_web::test]
async fn test_unreachable_server_fails_every_case() {
    // bind then drop to get a port nobody listens on
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let mut config = authflow::AppConfig::default();
    config.target.base_url = format!("http://127.0.0.1:{}", port);
    config.target.timeout = 2;
    let ctx = Context::new(config);

    let report = Suite::auth_flow().run(&ctx).await;

    assert_eq!(report.failed(), 7);
    assert_eq!(report.skipped(), 1);
    assert!(matches!(
        report.case("status").unwrap().outcome,
        Outcome::Failed(CheckError::Transport { .. })
    ));
}

#[actix_web::test]
async fn test_repeated_single_delete_accepted_fails_delete_tokens() {
    let server = fixture::spawn(Quirks {
        idempotent_single_delete: true,
        ..Quirks::default()
    });
    let ctx = Context::new(server.config());

    let report = Suite::auth_flow().run(&ctx).await;

    assert_eq!(report.failed(), 1, "only delete_tokens should fail:\n{}", report);
    assert!(matches!(
        report.case("delete_tokens").unwrap().outcome,
        Outcome::Failed(CheckError::UnexpectedStatus { ref method, expected, actual, .. })
            if *method == Method::DELETE
                && expected == StatusCode::UNAUTHORIZED
                && actual == StatusCode::NO_CONTENT
    ));
}

#[actix_web::test]
async fn test_not_found_on_invalid_delete_fails_delete_tokens() {
    let server = fixture::spawn(Quirks {
        not_found_on_invalid_delete: true,
        ..Quirks::default()
    });
    let ctx = Context::new(server.config());

    let report = Suite::auth_flow().run(&ctx).await;

    // GET on the same invalid id must still answer 404, so tokens passes
    assert!(matches!(report.case("tokens").unwrap().outcome, Outcome::Passed));
    assert_eq!(report.failed(), 1, "only delete_tokens should fail:\n{}", report);
    assert!(matches!(
        report.case("delete_tokens").unwrap().outcome,
        Outcome::Failed(CheckError::UnexpectedStatus { ref path, expected, actual, .. })
            if path == "/auth/tokens/0"
                && expected == StatusCode::UNAUTHORIZED
                && actual == StatusCode::NOT_FOUND
    ));
}

#[actix_web::test]
async fn test_login_advertising_get_fails_specifications() {
    let server = fixture::spawn(Quirks {
        login_allows_get: true,
        ..Quirks::default()
    });
    let ctx = Context::new(server.config());

    let report = Suite::auth_flow().run(&ctx).await;

    assert_eq!(report.failed(), 1, "only specifications should fail:\n{}", report);
    assert!(matches!(
        report.case("specifications").unwrap().outcome,
        Outcome::Failed(CheckError::Assertion(ref message)) if message.contains("/auth/login")
    ));
}
