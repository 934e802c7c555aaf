/// strips the `\x01` delimiters of a CTCP message, returns `None` for
/// ordinary text
pub fn ctcp_body(text: &str) -> Option<&str> {
    text.strip_prefix('\u{0001}')
        .map(|t| t.strip_suffix('\u{0001}').unwrap_or(t))
}

pub fn is_ctcp(text: &str) -> bool {
    ctcp_body(text).is_some()
}

/// splits a comma separated target list such as `#a,#b`
pub fn split_targets(param: &str) -> impl Iterator<Item = &str> {
    param.split(',').filter(|t| !t.is_empty())
}

#[test]
fn ctcp() {
    assert_eq!(ctcp_body("\u{0001}ACTION waves\u{0001}"), Some("ACTION waves"));
    assert_eq!(ctcp_body("\u{0001}VERSION"), Some("VERSION"));
    assert_eq!(ctcp_body("hello"), None);
}
