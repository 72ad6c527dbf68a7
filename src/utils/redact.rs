pub const REDACTED: &str = "[redacted]";

/// Replaces every occurrence of `secret` in `text`. Empty secrets leave the
/// text untouched.
pub fn redact_secret(text: &str, secret: &str) -> String {
    if secret.is_empty() {
        return text.to_string();
    }
    text.replace(secret, REDACTED)
}
