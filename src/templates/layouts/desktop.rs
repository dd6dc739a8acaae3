use maud::{html, Markup, DOCTYPE};

use crate::auth::SessionUser;

pub fn desktop_layout(title: &str, viewer: Option<&SessionUser>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · Commisafe" }
                link rel="icon" href="/static/favicon/favicon.ico";
                link rel="stylesheet" href="/static/main.css";
            }
            body {
              header class="flex items-center justify-between px-6 py-3 shadow" {
                  a href="/" class="brand" { "Commisafe" }
                  nav {
                      ul {
                          li { a href="/" { "Home" } }
                          @if viewer.is_some() {
                              li { a href="/dashboard" { "Dashboard" } }
                          }
                      }
                  }

                  @match viewer {
                      Some(user) => {
                          div class="session" {
                              span class="session-email" { (user.email) }
                              " "
                              span class="session-role" { "(" (user.role.as_str()) ")" }
                              form action="/auth/sign-out" method="post" class="inline-form" {
                                  button type="submit" class="btn btn-link" { "Sign out" }
                              }
                          }
                      }
                      None => {
                          a href="/login" class="text-base font-medium" { "Sign in" }
                      }
                  }
              }
                (content)
            }
        }
    }
}
