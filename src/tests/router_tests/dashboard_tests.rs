use crate::errors::ServerError;
use crate::tests::utils::*;

fn position(body: &str, needle: &str) -> usize {
    body.find(needle)
        .unwrap_or_else(|| panic!("{needle:?} not on the page"))
}

#[test]
fn dashboard_requires_sign_in() {
    let t = test_app();

    let err = handle_err(&t.app, "/dashboard", None);
    assert!(matches!(err, ServerError::Unauthorized(_)));

    let resp = get(&t.app, "/dashboard", None);
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/login");
}

#[test]
fn brand_sees_first_page_newest_first() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);

    let resp = get(&t.app, "/dashboard", Some(&cookie));
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);

    assert!(body.contains("Brand Dashboard"));
    assert!(body.contains("Your Campaigns &amp; Contracts"));
    assert!(body.contains("Create New Contract"));

    // Six contracts, five per page, start date descending.
    assert!(position(&body, "Holiday Special") < position(&body, "Fall Fashion Launch"));
    assert!(position(&body, "Fall Fashion Launch") < position(&body, "Spring Collection"));
    assert!(!body.contains("Fitness Challenge"));

    let body = body_string(get(&t.app, "/dashboard?page=2", Some(&cookie)));
    assert!(body.contains("Fitness Challenge"));
    assert!(!body.contains("Holiday Special"));
}

#[test]
fn status_filter_and_ascending_sort() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);

    let body = body_string(get(
        &t.app,
        "/dashboard?status=pending&sort=start_date&dir=asc",
        Some(&cookie),
    ));

    assert!(position(&body, "Fall Fashion Launch") < position(&body, "Holiday Special"));
    assert!(!body.contains("Summer Collection Promotion"));
    assert!(!body.contains("Tech Gadget Promotion"));
}

#[test]
fn search_matches_campaign_and_influencer() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);

    let body = body_string(get(&t.app, "/dashboard?q=emma", Some(&cookie)));
    assert!(body.contains("Spring Collection"));
    assert!(!body.contains("Holiday Special"));

    let body = body_string(get(&t.app, "/dashboard?q=zzz", Some(&cookie)));
    assert!(body.contains("No contracts found matching your filters"));
}

#[test]
fn stats_cover_every_visible_contract() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);

    // Filtering the table leaves the payout totals alone.
    let body = body_string(get(&t.app, "/dashboard?q=zzz", Some(&cookie)));
    assert!(body.contains("Total Paid"));
    assert!(body.contains("$16,275.00"));
}

#[test]
fn influencer_only_sees_own_contracts() {
    let t = test_app();
    let cookie = influencer_cookie(&t.app, "alex@influencer.com");

    let body = body_string(get(&t.app, "/dashboard", Some(&cookie)));
    assert!(body.contains("Influencer Dashboard"));
    assert!(body.contains("Summer Collection Promotion"));
    assert!(!body.contains("Fall Fashion Launch"));
    assert!(!body.contains("Create New Contract"));
}

#[test]
fn expanded_and_selected_rows_render_details() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);

    let body = body_string(get(&t.app, "/dashboard?expanded=3", Some(&cookie)));
    assert!(body.contains("Campaign Details"));
    assert!(body.contains("Payout Information"));

    let body = body_string(get(&t.app, "/dashboard?selected=3", Some(&cookie)));
    assert!(body.contains("Close"));
}

#[test]
fn notices_from_the_query_are_shown() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);

    let body = body_string(get(
        &t.app,
        "/dashboard?notice=Contract+created",
        Some(&cookie),
    ));
    assert!(body.contains("Contract created"));
}

#[test]
fn payout_account_status_is_shown() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);

    let body = body_string(get(&t.app, "/dashboard", Some(&cookie)));
    assert!(body.contains("Not Connected"));
    assert!(body.contains("/stripe/connect"));
}

#[test]
fn unknown_routes_are_not_found() {
    let t = test_app();
    let resp = get(&t.app, "/nope", None);
    assert_eq!(resp.status(), 404);
}

#[test]
fn connected_account_hides_connect_link() {
    let t = connected_app();
    let cookie = brand_cookie(&t.app);

    let body = body_string(get(&t.app, "/dashboard", Some(&cookie)));
    assert!(body.contains("✅ Connected"));
    assert!(!body.contains("Connect with Stripe"));
}

#[test]
fn influencer_stats_use_earning_labels() {
    let t = test_app();
    let cookie = influencer_cookie(&t.app, "alex@influencer.com");

    let body = body_string(get(&t.app, "/dashboard", Some(&cookie)));
    assert!(body.contains("Incoming Commissions"));
    assert!(body.contains("From 1 active contracts"));
    assert!(body.contains("$3,675.00"));
    assert!(body.contains("Total Earned"));
    assert!(!body.contains("Pending Payouts"));
}

#[test]
fn largest_page_number_renders_empty_table() {
    let t = test_app();
    let cookie = brand_cookie(&t.app);

    let resp = get(
        &t.app,
        &format!("/dashboard?page={}", usize::MAX),
        Some(&cookie),
    );
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("No contracts found matching your filters"));
    // Next clamps to the last real page.
    assert!(body.contains(r#"href="/dashboard?page=2""#));
}

#[test]
fn failed_load_keeps_filters_and_shows_notice() {
    let t = unreachable_store_app();
    let cookie = brand_cookie(&t.app);

    let resp = get(
        &t.app,
        "/dashboard?q=summer&status=active&sort=start_date&dir=asc",
        Some(&cookie),
    );
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("Failed to load contracts"));
    assert!(body.contains(r#"name="q" value="summer""#));
    assert!(body.contains(r#"option value="active" selected"#));
    assert!(!body.contains(r#"option value="all" selected"#));
    assert!(body.contains(r#"name="dir" value="asc""#));
    assert!(body.contains("No contracts found matching your filters"));
}
