use crate::domain::Role;
use crate::templates::{desktop_layout, notice_banner, Notice};
use maud::{html, Markup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    SignUp,
}

impl AuthMode {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("signup") => AuthMode::SignUp,
            _ => AuthMode::SignIn,
        }
    }
}

/// Values echoed back into the form after a failed attempt.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub user_type: Role,
}

pub fn login_page(mode: AuthMode, form: &LoginForm, notice: Option<&Notice>) -> Markup {
    let (title, lead) = match mode {
        AuthMode::SignIn => ("Welcome Back", "Sign in to your account to continue"),
        AuthMode::SignUp => (
            "Join Commisafe",
            "Create your account and start earning commissions",
        ),
    };

    desktop_layout(
        if mode == AuthMode::SignIn { "Sign in" } else { "Sign up" },
        None,
        html! {
            main class="container narrow" {
                (notice_banner(notice))

                h1 { (title) }
                p class="lead" { (lead) }

                div class="oauth-buttons" {
                    a href="/auth/oauth/google" class="btn btn-outline" { "Continue with Google" }
                    a href="/auth/oauth/github" class="btn btn-outline" { "Continue with GitHub" }
                }

                p class="divider" { "Or continue with email" }

                @match mode {
                    AuthMode::SignIn => {
                        form action="/auth/sign-in" method="post" {
                            label for="email" { "Email" }
                            input type="email" id="email" name="email" required
                                placeholder="Enter your email" value=(form.email);
                            label for="password" { "Password" }
                            input type="password" id="password" name="password" required
                                placeholder="Enter your password";
                            button type="submit" class="btn btn-primary" { "Sign In" }
                        }
                        p { "Don't have an account? " a href="/login?mode=signup" { "Sign up" } }
                    }
                    AuthMode::SignUp => {
                        form action="/auth/sign-up" method="post" {
                            fieldset {
                                legend { "I am a:" }
                                @for role in [Role::Brand, Role::Influencer] {
                                    label {
                                        input type="radio" name="user_type" value=(role.as_str())
                                            checked[form.user_type == role];
                                        @if role == Role::Brand { " Brand" } @else { " Influencer" }
                                    }
                                }
                            }
                            label for="email" { "Email" }
                            input type="email" id="email" name="email" required
                                placeholder="Enter your email" value=(form.email);
                            label for="password" { "Password" }
                            input type="password" id="password" name="password" required
                                placeholder="Enter your password";
                            label for="confirm_password" { "Confirm Password" }
                            input type="password" id="confirm_password" name="confirm_password" required
                                placeholder="Confirm your password";
                            button type="submit" class="btn btn-primary" { "Create Account" }
                        }
                        p { "Already have an account? " a href="/login?mode=signin" { "Sign in" } }
                    }
                }
            }
        },
    )
}
