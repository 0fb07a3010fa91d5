/// Normalize a URL path for funnel grouping: drop query and fragment, collapse
/// repeated slashes, strip trailing slashes. Empty paths become `/`.
pub fn normalize_path(raw: &str) -> String {
    let without_query = match raw.find(['?', '#']) {
        Some(idx) => &raw[..idx],
        None => raw,
    };

    let mut out = String::with_capacity(without_query.len());
    let mut prev_slash = false;
    for ch in without_query.chars() {
        if ch == '/' {
            if !prev_slash {
                out.push(ch);
            }
            prev_slash = true;
        } else {
            out.push(ch);
            prev_slash = false;
        }
    }

    let trimmed = out.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}
