mod auth_tests;
mod contracts_tests;
mod dashboard_tests;
mod stripe_tests;
