//! Message templates sent through the notification port.

use crate::domain::account::models::Account;
use crate::domain::account::models::Notification;

/// Append a secret token to a link as the `token` query parameter.
pub fn link_with_token(base: &str, token: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}token={}", base, separator, token)
}

pub fn verification(from: &str, account: &Account, verify_link: &str, token: &str) -> Notification {
    let link = link_with_token(verify_link, token);

    Notification {
        from: from.to_string(),
        to: account.email.as_str().to_string(),
        subject: "Verify your email!".to_string(),
        html_body: format!(
            "Dear <b>{}</b>, please finish your account validation by clicking the following link: <a href='{}'>Verify Email</a>",
            account.username, link
        ),
    }
}

pub fn welcome(from: &str, account: &Account) -> Notification {
    Notification {
        from: from.to_string(),
        to: account.email.as_str().to_string(),
        subject: format!("Welcome! {}", account.username),
        html_body: format!(
            "Dear <b>{}</b>, you are already verified! Welcome to our system!",
            account.username
        ),
    }
}

pub fn password_reset(
    from: &str,
    account: &Account,
    reset_link: &str,
    token: &str,
) -> Notification {
    let link = link_with_token(reset_link, token);

    Notification {
        from: from.to_string(),
        to: account.email.as_str().to_string(),
        subject: "Reset your password!".to_string(),
        html_body: format!(
            "Dear <b>{}</b>,<br><br>Please click the following link to reset your password:<br><a href='{}'>Reset Password</a><br><br>If you did not request this, please ignore this email.",
            account.username, link
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_with_token() {
        assert_eq!(
            link_with_token("https://x.com/api/v1/verify", "abc"),
            "https://x.com/api/v1/verify?token=abc"
        );
        assert_eq!(
            link_with_token("https://x.com/reset?lang=en", "abc"),
            "https://x.com/reset?lang=en&token=abc"
        );
    }
}
