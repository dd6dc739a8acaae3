use crate::errors::ServerError;
use crate::tests::utils::*;

#[test]
fn login_page_renders_both_modes() {
    let t = test_app();

    let resp = get(&t.app, "/login", None);
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("Welcome Back"));
    assert!(body.contains("/auth/oauth/google"));
    assert!(body.contains("/auth/oauth/github"));

    let body = body_string(get(&t.app, "/login?mode=signup", None));
    assert!(body.contains("Join Commisafe"));
    assert!(body.contains("confirm_password"));
}

#[test]
fn login_page_sends_signed_in_users_to_dashboard() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);

    let resp = get(&t.app, "/login", Some(&cookie));
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/dashboard");
}

#[test]
fn password_sign_in_sets_session_cookie() {
    let t = test_app();

    let resp = post(
        &t.app,
        "/auth/sign-in",
        None,
        &format!("email=team%40brand.co&password={PASSWORD}"),
    );
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/dashboard");

    let raw = set_cookies(&resp);
    let session = raw
        .iter()
        .find(|c| c.starts_with("session="))
        .expect("session cookie");
    assert!(session.contains("HttpOnly"));
    assert!(session.contains("Path=/"));

    let cookie = cookie_pair(&resp, "session").unwrap();
    let body = body_string(get(&t.app, "/dashboard", Some(&cookie)));
    assert!(body.contains("Brand Dashboard"));
}

#[test]
fn wrong_password_shows_provider_message() {
    let t = test_app();

    let resp = post(
        &t.app,
        "/auth/sign-in",
        None,
        "email=team%40brand.co&password=nope",
    );
    assert_eq!(resp.status(), 401);
    assert!(set_cookies(&resp).is_empty());

    let body = body_string(resp);
    assert!(body.contains("Invalid login credentials"));
    // The email is echoed back into the form.
    assert!(body.contains("team@brand.co"));
}

#[test]
fn empty_credentials_are_rejected_before_the_provider() {
    let t = test_app();
    let resp = post(&t.app, "/auth/sign-in", None, "email=&password=");
    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("Email and password are required"));
}

#[test]
fn sign_up_requires_matching_passwords() {
    let t = test_app();

    let resp = post(
        &t.app,
        "/auth/sign-up",
        None,
        "email=new%40brand.co&password=abc123&confirm_password=abc124&user_type=brand",
    );
    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("Passwords do not match"));
}

#[test]
fn sign_up_as_influencer_signs_in_with_that_role() {
    let t = test_app();

    let resp = post(
        &t.app,
        "/auth/sign-up",
        None,
        "email=sam%40example.com&password=abc123&confirm_password=abc123&user_type=influencer",
    );
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/dashboard");

    let cookie = cookie_pair(&resp, "session").unwrap();
    let body = body_string(get(&t.app, "/dashboard", Some(&cookie)));
    assert!(body.contains("Influencer Dashboard"));
}

#[test]
fn sign_up_awaiting_confirmation_points_back_to_sign_in() {
    let t = test_app();

    let resp = post(
        &t.app,
        "/auth/sign-up",
        None,
        "email=confirm%40brand.co&password=abc123&confirm_password=abc123&user_type=brand",
    );
    assert_eq!(resp.status(), 302);
    assert_eq!(
        location(&resp),
        "/login?mode=signin&notice=Please+check+your+email+to+verify+your+account."
    );
    assert!(cookie_pair(&resp, "session").is_none());
}

#[test]
fn sign_up_error_is_shown_on_the_form() {
    let t = test_app();
    let resp = post(
        &t.app,
        "/auth/sign-up",
        None,
        "email=taken%40brand.co&password=abc123&confirm_password=abc123&user_type=brand",
    );
    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("User already registered"));
}

#[test]
fn oauth_start_redirects_with_pkce_cookie() {
    let t = test_app();

    let resp = get(&t.app, "/auth/oauth/github", None);
    assert_eq!(resp.status(), 302);

    let loc = location(&resp);
    assert!(loc.starts_with("https://auth.test/authorize?provider=github"));
    assert!(loc.contains("redirect_to=http://127.0.0.1:3000/auth/callback"));

    let pkce = set_cookies(&resp)
        .into_iter()
        .find(|c| c.starts_with("pkce_verifier="))
        .expect("pkce cookie");
    assert!(pkce.contains("Path=/auth"));
    assert!(pkce.contains("Max-Age=600"));
}

#[test]
fn unknown_oauth_provider_is_not_found() {
    let t = test_app();
    let err = handle_err(&t.app, "/auth/oauth/myspace", None);
    assert!(matches!(err, ServerError::NotFound));
}

#[test]
fn oauth_callback_exchanges_code_for_session() {
    let t = test_app();

    let start = get(&t.app, "/auth/oauth/google", None);
    let verifier = cookie_pair(&start, "pkce_verifier").unwrap();

    let resp = get(&t.app, "/auth/callback?code=good-code", Some(&verifier));
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/dashboard");
    assert!(cookie_pair(&resp, "session").is_some());

    // The verifier is single use.
    let cleared = set_cookies(&resp)
        .into_iter()
        .find(|c| c.starts_with("pkce_verifier="))
        .unwrap();
    assert!(cleared.contains("Max-Age=0"));
}

#[test]
fn oauth_callback_without_verifier_asks_to_retry() {
    let t = test_app();
    let resp = get(&t.app, "/auth/callback?code=good-code", None);
    assert_eq!(resp.status(), 302);
    assert!(location(&resp).starts_with("/login?error=Your+sign-in+attempt+expired"));
}

#[test]
fn oauth_callback_passes_provider_errors_to_login() {
    let t = test_app();

    let resp = get(
        &t.app,
        "/auth/callback?error=access_denied&error_description=User+cancelled",
        None,
    );
    assert_eq!(location(&resp), "/login?error=User+cancelled");

    let resp = get(&t.app, "/auth/callback?code=expired", Some("pkce_verifier=abc"));
    assert_eq!(location(&resp), "/login?error=invalid+flow+state");
}

#[test]
fn oauth_callback_without_code_is_bad_request() {
    let t = test_app();
    let err = handle_err(&t.app, "/auth/callback", None);
    assert!(matches!(err, ServerError::BadRequest(_)));
}

#[test]
fn sign_out_revokes_local_and_provider_session() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);

    let resp = post(&t.app, "/auth/sign-out", Some(&cookie), "");
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/?notice=You+have+been+signed+out.");
    assert!(set_cookies(&resp)
        .iter()
        .any(|c| c.starts_with("session=;") && c.contains("Max-Age=0")));

    assert_eq!(
        t.signed_out.lock().unwrap().as_slice(),
        &[format!("access-{BRAND_ID}")]
    );

    let resp = get(&t.app, "/dashboard", Some(&cookie));
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/login");
}

#[test]
fn me_reports_provider_profile() {
    let t = test_app();
    let cookie = influencer_cookie(&t.app, "alex@influencer.com");

    let resp = get(&t.app, "/api/me", Some(&cookie));
    assert_eq!(resp.status(), 200);

    let json: serde_json::Value = serde_json::from_str(&body_string(resp)).unwrap();
    assert_eq!(json["role"], "influencer");
    assert_eq!(json["email"], "alex@influencer.com");
    assert_eq!(json["full_name"], "alex");
}

#[test]
fn me_requires_a_session() {
    let t = test_app();
    let err = handle_err(&t.app, "/api/me", Some("session=forged"));
    assert!(matches!(err, ServerError::Unauthorized(_)));
}

#[test]
fn expired_access_token_is_refreshed_once() {
    let t = test_app();
    let mut user = session_user("team@brand.co", crate::domain::Role::Brand);
    user.access_token = "stale-access".into();
    user.token_expires_at = Some(now_unix() - 10);
    let cookie = login_with(&t.app, user);

    let resp = get(&t.app, "/dashboard", Some(&cookie));
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("Brand Dashboard"));
    assert_eq!(
        t.refreshed.lock().unwrap().as_slice(),
        &["refresh-team@brand.co".to_string()]
    );

    let stored = stored_session(&t.app, &cookie).expect("session still live");
    assert_eq!(stored.access_token, format!("access-{BRAND_ID}"));
    assert!(stored.token_expires_at.unwrap() > now_unix() + 3000);

    // Fresh token, no second round trip.
    let resp = get(&t.app, "/dashboard", Some(&cookie));
    assert_eq!(resp.status(), 200);
    assert_eq!(t.refreshed.lock().unwrap().len(), 1);
}

#[test]
fn rejected_refresh_ends_the_session() {
    let t = test_app();
    let mut user = session_user("team@brand.co", crate::domain::Role::Brand);
    user.refresh_token = Some("refresh-revoked".into());
    user.token_expires_at = Some(now_unix() - 10);
    let cookie = login_with(&t.app, user);

    let resp = get(&t.app, "/dashboard", Some(&cookie));
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/login");
    assert!(stored_session(&t.app, &cookie).is_none());
}

#[test]
fn expired_token_without_refresh_token_ends_the_session() {
    let t = test_app();
    let mut user = session_user("team@brand.co", crate::domain::Role::Brand);
    user.refresh_token = None;
    user.token_expires_at = Some(now_unix() - 10);
    let cookie = login_with(&t.app, user);

    let err = handle_err(&t.app, "/dashboard", Some(&cookie));
    assert!(matches!(err, ServerError::Unauthorized(_)));
    assert!(t.refreshed.lock().unwrap().is_empty());
}

#[test]
fn sign_in_stores_email_lowercased() {
    let t = test_app();

    let resp = post(
        &t.app,
        "/auth/sign-in",
        None,
        &format!("email=Alex%40Influencer.com&password={PASSWORD}"),
    );
    assert_eq!(resp.status(), 302);
    let cookie = cookie_pair(&resp, "session").unwrap();

    let stored = stored_session(&t.app, &cookie).expect("session");
    assert_eq!(stored.email, "alex@influencer.com");
    assert_eq!(stored.role, crate::domain::Role::Influencer);

    let body = body_string(get(&t.app, "/dashboard", Some(&cookie)));
    assert!(body.contains("Summer Collection Promotion"));
}
