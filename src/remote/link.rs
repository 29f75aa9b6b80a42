//! `Link` header cursor extraction
//!
//! Sentry paginates with a header shaped like:
//!
//! ```text
//! <https://sentry.io/api/0/...&cursor=0:0:1>; rel="previous"; results="false"; cursor="0:0:1",
//! <https://sentry.io/api/0/...&cursor=0:100:0>; rel="next"; results="true"; cursor="0:100:0"
//! ```
//!
//! Only the `next` entry matters, and only when it claims more results.

use lazy_regex::regex;

/// Cursor for the next page, if the header advertises one with results
pub fn next_cursor(header: &str) -> Option<String> {
    let re = regex!(r#"rel="(?P<rel>[^"]*)"\s*;\s*results="(?P<results>[^"]*)"\s*;\s*cursor="(?P<cursor>[^"]*)""#);

    re.captures_iter(header)
        .find(|caps| &caps["rel"] == "next")
        .filter(|caps| &caps["results"] == "true")
        .map(|caps| caps["cursor"].to_string())
        .filter(|cursor| !cursor.is_empty())
}
