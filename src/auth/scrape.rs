// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extraction of values embedded in the login pages.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::AuthError;

// Tried in order; the login page has shipped each of these layouts.
static CSRF_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"name="_csrf"\s+value="([^"]+)""#,
        r#""csrf":"([^"]+)""#,
        r#"window\.guardian\.csrfToken\s*=\s*["']([^"']+)["']"#,
        r#"var\s+csrfToken\s*=\s*["']([^"']+)["']"#,
        r#"csrfToken["']?\s*:\s*["']([^"']+)["']"#,
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("CSRF pattern is valid"))
    .collect()
});

static WA_FIELD: LazyLock<Regex> = LazyLock::new(|| hidden_field("wa"));
static WRESULT_FIELD: LazyLock<Regex> = LazyLock::new(|| hidden_field("wresult"));
static WCTX_FIELD: LazyLock<Regex> = LazyLock::new(|| hidden_field("wctx"));

fn hidden_field(name: &str) -> Regex {
    Regex::new(&format!(r#"name="{name}"\s+value="([^"]+)""#)).expect("field pattern is valid")
}

/// Finds the CSRF token on the login page.
pub(crate) fn find_csrf_token(html: &str) -> Option<String> {
    CSRF_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(html))
        .map(|captures| captures[1].to_string())
}

/// The WS-Federation form returned by a successful credential submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WsFedForm {
    pub(crate) wa: String,
    pub(crate) wresult: String,
    pub(crate) wctx: String,
}

impl WsFedForm {
    /// Extracts the three hidden fields, HTML-entity decoded.
    pub(crate) fn parse(html: &str) -> Result<Self, AuthError> {
        Ok(Self {
            wa: capture_field(&WA_FIELD, html, "wa")?,
            wresult: capture_field(&WRESULT_FIELD, html, "wresult")?,
            wctx: capture_field(&WCTX_FIELD, html, "wctx")?,
        })
    }
}

fn capture_field(pattern: &Regex, html: &str, field: &'static str) -> Result<String, AuthError> {
    pattern
        .captures(html)
        .map(|captures| html_escape::decode_html_entities(&captures[1]).into_owned())
        .ok_or(AuthError::LoginResponseParse { field })
}
