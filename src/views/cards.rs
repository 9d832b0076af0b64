//! Static cards: login card, profile card and their social links.

use crate::navigation::Route;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SocialLink {
    pub network: &'static str,
    pub icon: &'static str,
    pub href: &'static str,
}

pub fn social_buttons() -> Vec<SocialLink> {
    ["instagram", "linkedin", "twitter"]
        .into_iter()
        .map(|network| SocialLink {
            network,
            icon: match network {
                "instagram" => "fab fa-instagram",
                "linkedin" => "fab fa-linkedin",
                _ => "fab fa-twitter",
            },
            href: "#",
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCardView {
    pub heading: &'static str,
    pub welcome: &'static str,
    pub username_placeholder: &'static str,
    pub password_placeholder: &'static str,
    pub forgot_password: &'static str,
    pub forgot_password_href: String,
    pub submit: &'static str,
    pub social: Vec<SocialLink>,
    pub signup_prompt: &'static str,
    pub signup_label: &'static str,
    pub signup_href: String,
}

pub fn login_card() -> LoginCardView {
    LoginCardView {
        heading: "LOGIN",
        welcome: "Welcome to the private area. Please provide your login credentials to proceed.",
        username_placeholder: "myUser",
        password_placeholder: "********",
        forgot_password: "Forgot Password?",
        forgot_password_href: Route::PasswordReset.path(),
        submit: "LOGIN",
        social: social_buttons(),
        signup_prompt: "Not an account?",
        signup_label: "Sign up",
        signup_href: Route::SignUp.path(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCardView {
    pub image: &'static str,
    pub name: &'static str,
    pub role: &'static str,
    pub tagline: &'static str,
    pub social: Vec<SocialLink>,
}

pub fn profile_card() -> ProfileCardView {
    ProfileCardView {
        image: "/th.jpeg",
        name: "I am David Oludoyin",
        role: "A Front-end developer",
        tagline: "Follow me on social media",
        social: social_buttons(),
    }
}
