// templates/pages/home.rs

use crate::auth::SessionUser;
use crate::templates::{card, desktop_layout, notice_banner, Notice};
use maud::{html, Markup};

pub fn home_page(viewer: Option<&SessionUser>, notice: Option<&Notice>) -> Markup {
    desktop_layout(
        "Home",
        viewer,
        html! {
            main class="container" {
                (notice_banner(notice))

                section class="hero" {
                    h1 {
                        "Trustless Commission"
                        span class="block" { "Management Platform" }
                    }
                    p class="lead" {
                        "Automate influencer-brand partnerships with secure, transparent "
                        "commission payouts. Built on Stripe Connect."
                    }
                    @if viewer.is_some() {
                        a href="/dashboard" class="btn btn-primary" { "Go to Dashboard" }
                    } @else {
                        a href="/login?mode=signup" class="btn btn-primary" { "Start Free Trial" }
                        " "
                        a href="/login?mode=signin" class="btn" { "Sign In" }
                    }
                }

                section class="features" {
                    (card("For brands", html! {
                        p { "Create commission contracts, track sales and fund payouts to creators." }
                    }))
                    (card("For influencers", html! {
                        p { "Accept offers, follow your earnings and get paid straight to your account." }
                    }))
                    (card("Secure payouts", html! {
                        p { "Connect a Stripe account once; payouts run through it automatically." }
                    }))
                }
            }
        },
    )
}
