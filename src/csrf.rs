//! Anti-forgery token accessor
//!
//! Cookie first, then the hidden form input, else empty.

use percent_encoding::percent_decode_str;
use wasm_bindgen::JsCast;

use crate::config::BoardConfig;

/// Find `name` in a `document.cookie` style string
pub fn token_from_cookies(cookies: &str, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix(prefix.as_str()))
        .map(|raw| percent_decode_str(raw).decode_utf8_lossy().into_owned())
        .filter(|token| !token.is_empty())
}

/// Current session token
pub fn csrf_token(config: &BoardConfig) -> String {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return String::new();
    };

    let cookies = document
        .dyn_ref::<web_sys::HtmlDocument>()
        .and_then(|d| d.cookie().ok())
        .unwrap_or_default();
    if let Some(token) = token_from_cookies(&cookies, &config.csrf_cookie) {
        return token;
    }

    let selector = format!("input[name={}]", config.csrf_input);
    document
        .query_selector(&selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_cookies() {
        let cookies = "sessionid=abc; csrftoken=tok%2B123; theme=dark";
        assert_eq!(token_from_cookies(cookies, "csrftoken").as_deref(), Some("tok+123"));
        assert_eq!(token_from_cookies(cookies, "missing"), None);
    }

    #[test]
    fn test_prefix_does_not_match_longer_name() {
        let cookies = "xcsrftoken=nope; csrftoken=yes";
        assert_eq!(token_from_cookies(cookies, "csrftoken").as_deref(), Some("yes"));
        assert_eq!(token_from_cookies("csrftoken=", "csrftoken"), None);
    }
}
