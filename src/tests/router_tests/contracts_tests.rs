use chrono::{Duration, Utc};

use crate::auth::SessionUser;
use crate::domain::{ContractStatus, Role};
use crate::tests::utils::*;

fn new_contract_form(campaign: &str) -> String {
    let today = Utc::now().date_naive();
    let start = today + Duration::days(1);
    let end = today + Duration::days(31);
    format!(
        "influencer_email=Nia%40Creators.io&campaign_name={campaign}\
         &commission_percentage=12.5&start_date={start}&end_date={end}&max_budget=5000"
    )
}

fn brand_viewer() -> SessionUser {
    SessionUser {
        user_id: BRAND_ID.into(),
        email: "team@brand.co".into(),
        role: Role::Brand,
        access_token: format!("access-{BRAND_ID}"),
        refresh_token: None,
        token_expires_at: None,
    }
}

#[test]
fn new_contract_form_has_defaults() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);

    let resp = get(&t.app, "/contracts/new", Some(&cookie));
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("Create New Contract"));
    assert!(body.contains(r#"action="/contracts""#));
    assert!(body.contains(&Utc::now().date_naive().to_string()));
}

#[test]
fn influencers_cannot_manage_contracts() {
    let t = test_app();
    let cookie = influencer_cookie(&t.app, "samantha@influencer.com");

    let resp = get(&t.app, "/contracts/new", Some(&cookie));
    assert_eq!(resp.status(), 403);
    assert!(body_string(resp).contains("Only brands can manage contracts"));

    let resp = post(&t.app, "/contracts", Some(&cookie), &new_contract_form("Nope"));
    assert_eq!(resp.status(), 403);

    let resp = post(&t.app, "/contracts/2/delete", Some(&cookie), "");
    assert_eq!(resp.status(), 403);
}

#[test]
fn invalid_create_rerenders_form_with_errors() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);

    let resp = post(
        &t.app,
        "/contracts",
        Some(&cookie),
        "influencer_email=not-an-email&campaign_name=ab&commission_percentage=0\
         &start_date=2020-01-01&end_date=2019-12-31&max_budget=0",
    );
    assert_eq!(resp.status(), 422);

    let body = body_string(resp);
    assert!(body.contains("Please enter a valid email address."));
    assert!(body.contains("Campaign name must be at least 3 characters."));
    assert!(body.contains("Commission must be at least 1%."));
    assert!(body.contains("Start date cannot be in the past."));
    assert!(body.contains("End date must be after start date."));
    assert!(body.contains("Budget must be greater than 0."));
    // Input survives the round trip.
    assert!(body.contains("not-an-email"));

    let all = t.app.contracts.list(&brand_viewer()).unwrap();
    assert_eq!(all.len(), 6);
}

#[test]
fn valid_create_adds_pending_contract() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);

    let resp = post(
        &t.app,
        "/contracts",
        Some(&cookie),
        &new_contract_form("Launch+Party"),
    );
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/dashboard?notice=Contract+created");

    let created = t.app.contracts.get(&brand_viewer(), "7").unwrap();
    assert_eq!(created.campaign_name, "Launch Party");
    assert_eq!(created.influencer_email, "nia@creators.io");
    assert_eq!(created.influencer_name, "nia");
    assert_eq!(created.status, ContractStatus::Pending);
    assert_eq!(created.brand_id.as_deref(), Some(BRAND_ID));

    let body = body_string(get(&t.app, "/dashboard?q=launch", Some(&cookie)));
    assert!(body.contains("Launch Party"));
}

#[test]
fn edit_form_locks_email() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);

    let resp = get(&t.app, "/contracts/2/edit", Some(&cookie));
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("Edit Contract"));
    assert!(body.contains(r#"action="/contracts/2""#));
    assert!(body.contains("samantha@influencer.com"));
    assert!(body.contains("readonly"));
}

#[test]
fn completed_contracts_cannot_be_edited() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);

    let resp = get(&t.app, "/contracts/4/edit", Some(&cookie));
    assert_eq!(resp.status(), 403);
    assert!(body_string(resp).contains("Completed contracts cannot be edited"));
}

#[test]
fn update_keeps_original_email() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);

    let resp = post(
        &t.app,
        "/contracts/2",
        Some(&cookie),
        "influencer_email=someone%40else.com&campaign_name=Fall+Fashion+Relaunch\
         &commission_percentage=14&start_date=2023-09-01&end_date=2023-12-15&max_budget=9000",
    );
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/dashboard?notice=Contract+updated");

    let updated = t.app.contracts.get(&brand_viewer(), "2").unwrap();
    assert_eq!(updated.campaign_name, "Fall Fashion Relaunch");
    assert_eq!(updated.influencer_email, "samantha@influencer.com");
    assert_eq!(updated.commission, 14.0);
    assert_eq!(updated.max_budget, Some(9000.0));
}

#[test]
fn missing_contract_is_not_found() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);
    let resp = get(&t.app, "/contracts/999/edit", Some(&cookie));
    assert_eq!(resp.status(), 404);
}

#[test]
fn delete_pending_returns_to_same_view() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);

    let resp = post(
        &t.app,
        "/contracts/2/delete?status=pending&page=1",
        Some(&cookie),
        "",
    );
    assert_eq!(resp.status(), 302);
    assert_eq!(
        location(&resp),
        "/dashboard?status=pending&notice=Contract+deleted"
    );

    let body = body_string(get(&t.app, "/dashboard?status=pending", Some(&cookie)));
    assert!(!body.contains("Fall Fashion Launch"));
    assert!(body.contains("Holiday Special"));
}

#[test]
fn only_pending_contracts_can_be_deleted() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);

    let resp = post(&t.app, "/contracts/1/delete", Some(&cookie), "");
    assert_eq!(resp.status(), 403);
    assert!(t.app.contracts.get(&brand_viewer(), "1").is_ok());
}

#[test]
fn invited_influencer_accepts_pending_contract() {
    let t = test_app();
    let cookie = influencer_cookie(&t.app, "samantha@influencer.com");

    let resp = post(&t.app, "/contracts/2/accept", Some(&cookie), "");
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/dashboard?notice=Contract+accepted");

    let accepted = t.app.contracts.get(&brand_viewer(), "2").unwrap();
    assert_eq!(accepted.status, ContractStatus::Active);

    // Already active now.
    let resp = post(&t.app, "/contracts/2/accept", Some(&cookie), "");
    assert_eq!(resp.status(), 403);
}

#[test]
fn accept_is_limited_to_the_invited_influencer() {
    let t = test_app();

    let brand = brand_cookie(&t.app);
    let resp = post(&t.app, "/contracts/3/accept", Some(&brand), "");
    assert_eq!(resp.status(), 403);

    // Someone else's contract is invisible, not forbidden.
    let other = influencer_cookie(&t.app, "alex@influencer.com");
    let resp = post(&t.app, "/contracts/3/accept", Some(&other), "");
    assert_eq!(resp.status(), 404);
}

#[test]
fn export_returns_workbook() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);

    let resp = get(
        &t.app,
        "/contracts/export.xlsx?status=completed",
        Some(&cookie),
    );
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert!(resp
        .headers()
        .get("Content-Disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .contains("contracts.xlsx"));
}
