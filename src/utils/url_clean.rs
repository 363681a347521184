use url::Url;

/// Strip the query string and fragment from a URL, keeping scheme, host and
/// path. CRM imports choke on UTM-tagged links, so `https://a.com?utm=x`
/// becomes `https://a.com`.
///
/// Strings that do not parse as absolute URLs are returned unchanged rather
/// than treated as errors; the column regularly carries garbage.
pub fn clean_url(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    match Url::parse(raw) {
        // Truncate the original text instead of re-serializing the parsed
        // URL: `Url::to_string` appends a trailing slash to bare hosts,
        // which would rewrite values that had no query at all.
        Ok(_) => match raw.find(['?', '#']) {
            Some(pos) => raw[..pos].to_string(),
            None => raw.to_string(),
        },
        Err(_) => raw.to_string(),
    }
}
