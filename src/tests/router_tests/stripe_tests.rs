use url::form_urlencoded::byte_serialize;

use crate::domain::Role;
use crate::payments::ConnectState;
use crate::tests::utils::*;

fn encoded_state(user_id: &str, role: Role) -> String {
    let raw = ConnectState {
        user_id: user_id.into(),
        user_type: role,
    }
    .encode();
    byte_serialize(raw.as_bytes()).collect()
}

#[test]
fn connect_redirects_to_authorize_page() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);

    let resp = get(&t.app, "/stripe/connect", Some(&cookie));
    assert_eq!(resp.status(), 302);

    let loc = location(&resp);
    assert!(loc.starts_with("https://connect.stripe.com/oauth/authorize?"));
    assert!(loc.contains("response_type=code"));
    assert!(loc.contains("scope=read_write"));
    assert!(loc.contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A3000%2Fstripe%2Fcallback"));
    assert!(loc.contains("state="));
}

#[test]
fn connect_needs_a_session() {
    let t = test_app();
    let resp = get(&t.app, "/stripe/connect", None);
    assert_eq!(location(&resp), "/login");
}

#[test]
fn callback_completes_connection() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);
    let state = encoded_state(BRAND_ID, Role::Brand);

    let resp = get(
        &t.app,
        &format!("/stripe/callback?code=ac_123&state={state}"),
        Some(&cookie),
    );
    assert_eq!(resp.status(), 302);
    assert_eq!(
        location(&resp),
        "/dashboard?notice=Stripe+account+connected+successfully"
    );
    assert_eq!(
        t.payment_calls.lock().unwrap().as_slice(),
        &[format!("connect:ac_123:{BRAND_ID}")]
    );
}

#[test]
fn callback_failure_is_reported_on_dashboard() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);
    let state = encoded_state(BRAND_ID, Role::Brand);

    let resp = get(
        &t.app,
        &format!("/stripe/callback?code=bad_code&state={state}"),
        Some(&cookie),
    );
    assert_eq!(
        location(&resp),
        "/dashboard?error=Failed+to+connect+Stripe+account"
    );
}

#[test]
fn callback_rejects_state_from_another_user() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);
    let state = encoded_state("someone-else", Role::Brand);

    let resp = get(
        &t.app,
        &format!("/stripe/callback?code=ac_123&state={state}"),
        Some(&cookie),
    );
    assert_eq!(resp.status(), 403);
    assert!(t.payment_calls.lock().unwrap().is_empty());
}

#[test]
fn callback_rejects_garbage_state() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);

    let resp = get(
        &t.app,
        "/stripe/callback?code=ac_123&state=not*base64!",
        Some(&cookie),
    );
    assert_eq!(resp.status(), 400);

    let resp = get(&t.app, "/stripe/callback?code=ac_123", Some(&cookie));
    assert_eq!(resp.status(), 400);
}

#[test]
fn declined_authorization_returns_to_dashboard() {
    let t = test_app();
    let cookie = influencer_cookie(&t.app, "alex@influencer.com");

    let resp = get(
        &t.app,
        "/stripe/callback?error=access_denied&error_description=The+user+denied+your+request",
        Some(&cookie),
    );
    assert_eq!(
        location(&resp),
        "/dashboard?error=The+user+denied+your+request"
    );
}

#[test]
fn create_account_follows_onboarding_link() {
    let t = test_app();
    let cookie = influencer_cookie(&t.app, "alex@influencer.com");

    let resp = post(&t.app, "/stripe/connect/account", Some(&cookie), "");
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "https://connect.stripe.com/setup/abc");
    assert_eq!(
        t.payment_calls.lock().unwrap().as_slice(),
        &["account:user-alex@influencer.com".to_string()]
    );
}

#[test]
fn brand_funds_payout() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);

    let resp = post(
        &t.app,
        "/payouts",
        Some(&cookie),
        "connected_account_id=acct_42&amount=2500",
    );
    assert_eq!(location(&resp), "/dashboard?notice=Payout+created");
    assert_eq!(
        t.payment_calls.lock().unwrap().as_slice(),
        &["intent:2500:acct_42".to_string()]
    );
}

#[test]
fn payout_input_is_checked() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);

    let resp = post(
        &t.app,
        "/payouts",
        Some(&cookie),
        "connected_account_id=acct_42&amount=12.50",
    );
    assert_eq!(
        location(&resp),
        "/dashboard?error=Enter+a+payout+amount+in+cents"
    );

    let resp = post(&t.app, "/payouts", Some(&cookie), "connected_account_id=&amount=100");
    assert_eq!(
        location(&resp),
        "/dashboard?error=Enter+the+connected+account+to+pay"
    );

    let resp = post(
        &t.app,
        "/payouts",
        Some(&cookie),
        "connected_account_id=bad_acct&amount=100",
    );
    assert_eq!(location(&resp), "/dashboard?error=Failed+to+create+payout");
}

#[test]
fn influencers_cannot_fund_payouts() {
    let t = test_app();
    let cookie = influencer_cookie(&t.app, "alex@influencer.com");

    let resp = post(
        &t.app,
        "/payouts",
        Some(&cookie),
        "connected_account_id=acct_42&amount=100",
    );
    assert_eq!(resp.status(), 403);
    assert!(t.payment_calls.lock().unwrap().is_empty());
}
