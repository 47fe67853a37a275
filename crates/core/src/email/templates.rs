//! Email templates for credential lifecycle notifications.
//!
//! Each template renders a subject plus paired HTML and plain-text bodies.
//! All user-supplied values are passed through [`html_escape`] before they
//! reach the HTML body.

use crate::email::html_escape;

/// A renderable email.
pub trait EmailTemplate {
    fn subject(&self) -> String;
    fn body_html(&self) -> String;
    fn body_text(&self) -> String;
}

/// Six-digit code proving control of a member's email address.
pub struct VerificationEmailTemplate<'a> {
    pub code: &'a str,
}

impl EmailTemplate for VerificationEmailTemplate<'_> {
    fn subject(&self) -> String {
        "Verify your email".to_string()
    }

    fn body_html(&self) -> String {
        let code = html_escape(self.code);
        format!(
            r#"<p style="font-size:1.1em;">Your verification code is: <b>{code}</b></p>
<p style="color:#888; font-size:0.95em;">If you did not request this, please ignore this email.</p>"#
        )
    }

    fn body_text(&self) -> String {
        format!("Your verification code is: {}", self.code)
    }
}

/// Six-digit code authorizing a member password reset.
pub struct PasswordResetEmailTemplate<'a> {
    pub code: &'a str,
}

impl EmailTemplate for PasswordResetEmailTemplate<'_> {
    fn subject(&self) -> String {
        "Your password reset code".to_string()
    }

    fn body_html(&self) -> String {
        let code = html_escape(self.code);
        format!(
            r#"<p style="font-size:1.1em;">Your password reset code is: <b>{code}</b></p>
<p style="color:#888; font-size:0.95em;">This code expires in 15 minutes. If you did not request a reset, you can ignore this email.</p>"#
        )
    }

    fn body_text(&self) -> String {
        format!(
            "Your password reset code is: {}\nThis code expires in 15 minutes.",
            self.code
        )
    }
}

/// Invitation carrying an admin's default password and onboarding link.
pub struct AdminInvitationEmailTemplate<'a> {
    pub name: &'a str,
    pub default_password: &'a str,
    /// Full onboarding URL including the one-time token.
    pub onboarding_url: &'a str,
}

impl EmailTemplate for AdminInvitationEmailTemplate<'_> {
    fn subject(&self) -> String {
        "Admin access granted".to_string()
    }

    fn body_html(&self) -> String {
        let name = html_escape(self.name);
        let password = html_escape(self.default_password);
        let url = html_escape(self.onboarding_url);
        format!(
            r#"<h2 style="margin:0 0 16px;">You&#x27;ve been invited as an administrator</h2>
<p>Hello {name},</p>
<p>An administrator account has been created for you. Sign in once with the
default password below, then choose your own password.</p>
<p>Default password: <b>{password}</b></p>
<p><a href="{url}" style="display:inline-block; padding:12px 30px; border-radius:25px; font-weight:600;">Open admin panel</a></p>
<p style="color:#888; font-size:0.95em;">This invitation link is valid for 30 minutes and can be used once.</p>"#
        )
    }

    fn body_text(&self) -> String {
        format!(
            "Hello {},\n\nAn administrator account has been created for you.\n\
             Default password: {}\n\
             Sign in here within 30 minutes: {}\n\n\
             The link can be used once; you will be asked to choose your own password.",
            self.name, self.default_password, self.onboarding_url
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn verification_template_contains_code() {
        let template = VerificationEmailTemplate { code: "123456" };
        assert!(template.body_html().contains("123456"));
        assert!(template.body_text().contains("123456"));
    }

    #[test]
    fn reset_template_mentions_expiry() {
        let template = PasswordResetEmailTemplate { code: "654321" };
        assert!(template.body_html().contains("15 minutes"));
        assert!(template.body_text().contains("654321"));
    }

    #[test]
    fn invitation_template_contains_link_and_password() {
        let template = AdminInvitationEmailTemplate {
            name: "Bob",
            default_password: "Chang3me!",
            onboarding_url: "https://admin.example.org/login?token=abc&email=bob%40example.com",
        };
        let html = template.body_html();
        assert!(html.contains("Chang3me!"));
        assert!(html.contains("token=abc"));
        assert!(template.body_text().contains("30 minutes"));
    }

    #[test]
    fn html_bodies_escape_user_input() {
        let template = AdminInvitationEmailTemplate {
            name: "<script>alert(1)</script>",
            default_password: "p&ss",
            onboarding_url: "https://admin.example.org/login",
        };
        let html = template.body_html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("p&amp;ss"));
    }
}
