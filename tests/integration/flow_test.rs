//! The full authentication flow against a compliant server

use authflow::auth::AuthHeader;
use authflow::error::CheckError;
use authflow::suite::{AUTH_HEADER, Context, Outcome, Suite, TOKEN_ID, TOKENS_HEADER};
use serde_json::Value;

use super::fixture::{self, Quirks};

/// Every case passes; admin users is skipped while its backend is off
#[actix_web::test]
async fn test_complete_flow_passes() {
    let server = fixture::spawn(Quirks::default());
    let ctx = Context::new(server.config());

    let report = Suite::auth_flow().run(&ctx).await;

    assert!(report.is_success(), "flow should pass:\n{}", report);
    assert_eq!(report.passed(), 7);
    assert_eq!(report.skipped(), 1);
    assert!(matches!(
        report.case("admin_users").unwrap().outcome,
        Outcome::Skipped(_)
    ));
}

/// With the admin backend available the admin case runs too
#[actix_web::test]
async fn test_complete_flow_with_admin_backend() {
    let server = fixture::spawn(Quirks::default());
    let ctx = Context::new(server.config_with_admin());

    let report = Suite::auth_flow().run(&ctx).await;

    assert!(report.is_success(), "flow should pass:\n{}", report);
    assert_eq!(report.passed(), 8);
    assert_eq!(report.skipped(), 0);
}

/// State saved along the way is what later cases consume
#[actix_web::test]
async fn test_flow_saves_state_for_later_cases() {
    let server = fixture::spawn(Quirks::default());
    let ctx = Context::new(server.config());

    let report = Suite::auth_flow().run(&ctx).await;
    assert!(report.is_success(), "flow should pass:\n{}", report);

    let auth: AuthHeader = ctx.store.get(AUTH_HEADER).unwrap();
    let tokens: AuthHeader = ctx.store.get(TOKENS_HEADER).unwrap();
    let token_id: Value = ctx.store.get(TOKEN_ID).unwrap();

    assert!(auth.value.starts_with("Bearer "));
    assert_ne!(auth, tokens, "the token cases log in afresh");
    assert!(token_id.is_string());

    // the header saved by the tokens case is read-only
    assert!(matches!(
        ctx.store.save(TOKENS_HEADER, &auth, false),
        Err(CheckError::ReadOnly(_))
    ));
}

/// Bulk deletion leaves no token of the default user behind
#[actix_web::test]
async fn test_flow_leaves_no_tokens_behind() {
    let server = fixture::spawn(Quirks::default());
    let ctx = Context::new(server.config());

    let report = Suite::auth_flow().run(&ctx).await;
    assert!(report.is_success(), "flow should pass:\n{}", report);

    assert_eq!(server.backend.token_count(), 0);
}

/// Cases picked out of the flow fail on missing state instead of panicking
#[actix_web::test]
async fn test_selected_cases_need_earlier_state() {
    let server = fixture::spawn(Quirks::default());
    let ctx = Context::new(server.config());

    let suite = Suite::auth_flow()
        .only(&["status".to_string(), "profile".to_string(), "delete_tokens".to_string()])
        .unwrap();
    let report = suite.run(&ctx).await;

    assert!(matches!(report.case("status").unwrap().outcome, Outcome::Passed));
    assert!(matches!(
        report.case("profile").unwrap().outcome,
        Outcome::Failed(CheckError::MissingState(ref key)) if key == AUTH_HEADER
    ));
    assert!(matches!(
        report.case("delete_tokens").unwrap().outcome,
        Outcome::Failed(CheckError::MissingState(ref key)) if key == TOKENS_HEADER
    ));
}

/// Running the token cases twice on one store trips over the read-only header
#[actix_web::test]
async fn test_tokens_case_cannot_run_twice_on_one_store() {
    let server = fixture::spawn(Quirks::default());
    let ctx = Context::new(server.config());
    let suite = Suite::auth_flow().only(&["tokens".to_string()]).unwrap();

    let first = suite.run(&ctx).await;
    assert!(first.is_success(), "first run should pass:\n{}", first);

    let second = suite.run(&ctx).await;
    assert!(matches!(
        second.case("tokens").unwrap().outcome,
        Outcome::Failed(CheckError::ReadOnly(_))
    ));
}
