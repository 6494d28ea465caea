/// Minimal JWT shape check: non-blank and exactly three `.`-separated
/// segments. Signatures and expiry are not inspected.
pub fn is_well_formed(token: &str) -> bool {
    !token.trim().is_empty() && token.split('.').count() == 3
}
