//! Message bodies.

use super::MailMessage;

/// The welcome message carrying the activation link.
pub fn activation(username: &str, email: &str, activation_url: &str) -> MailMessage {
    MailMessage {
        to_email: email.to_string(),
        to_name: username.to_string(),
        subject: "Finish registration with Glimpze".to_string(),
        html: format!(
            "<!doctype html>\n<html>\n<body>\n\
             <p>Hi {username},</p>\n\
             <p>Thanks for signing up for Glimpze. Activate your account by \
             following <a href=\"{activation_url}\">this link</a>.</p>\n\
             <p>If you didn't sign up, you can ignore this email.</p>\n\
             </body>\n</html>\n"
        ),
    }
}
