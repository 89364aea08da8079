// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The seven-step login handshake.

use std::fmt::Write as _;
use std::time::Duration;

use reqwest::header::{LOCATION, ORIGIN, REFERER};
use reqwest::redirect::Policy;
use reqwest::{Client, Response, StatusCode, Url};
use serde_json::json;

use super::pkce::{Pkce, random_token};
use super::scrape::{WsFedForm, find_csrf_token};
use super::{
    AUDIENCE, AUTH0_CLIENT_AUTHORIZE, AUTH0_CLIENT_CHALLENGE, AUTH0_CLIENT_LOGIN,
    AUTH0_CLIENT_SWIFT, BROWSER_USER_AGENT, CLIENT_ID, Credentials, REDIRECT_URI, SCOPE,
    TokenResponse, Tokens,
};
use crate::error::AuthError;

/// Redirects followed after `/authorize/resume` before giving up.
const MAX_REDIRECT_HOPS: usize = 4;

const TENANT: &str = "pdpauth-a1";
const CONNECTION: &str = "CLUBPanasonic-Authentication";
const RESUME_PATH: &str = "/authorize/resume";
const COOKIE_ATTACH_MARKER: &str = "cookie/attachContentToken";

/// What a redirect in the resume chain points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RedirectShape {
    /// Carries the authorization code.
    Code,
    /// Cross-domain cookie attachment.
    CookieAttach,
    /// Back to the authorization endpoint.
    Authorize,
    Unrecognized,
}

impl RedirectShape {
    fn of(location: &Url) -> Self {
        if location.as_str().contains(COOKIE_ATTACH_MARKER) {
            Self::CookieAttach
        } else if query_value(location, "code").is_some() {
            Self::Code
        } else if location.path().starts_with("/authorize") {
            Self::Authorize
        } else {
            Self::Unrecognized
        }
    }
}

/// One login attempt.
///
/// Owns a dedicated HTTP client with its own cookie jar and automatic
/// redirects disabled, so nothing leaks from one attempt into the next.
#[derive(Debug)]
pub(crate) struct AuthFlow<'a> {
    http: Client,
    base: Url,
    credentials: &'a Credentials,
    pkce: Pkce,
    state: String,
}

impl<'a> AuthFlow<'a> {
    pub(crate) fn new(
        auth_base_url: &str,
        timeout: Duration,
        credentials: &'a Credentials,
    ) -> Result<Self, AuthError> {
        let base = Url::parse(auth_base_url)
            .map_err(|e| AuthError::InvalidUrl(format!("{auth_base_url}: {e}")))?;

        let http = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base,
            credentials,
            pkce: Pkce::generate(),
            state: random_token(),
        })
    }

    /// Runs every step and returns the issued tokens.
    pub(crate) async fn run(self) -> Result<Tokens, AuthError> {
        let state = self.authorize().await?;
        let csrf = self.fetch_login_page(&state).await?;
        self.challenge(&state).await?;
        let form = self.submit_credentials(&state, &csrf).await?;
        let resume_state = self.submit_callback(&form).await?;
        let code = self.follow_resume(&resume_state).await?;
        self.exchange_code(&code).await
    }

    /// Step 1: PKCE authorization request. Returns the confirmed state.
    async fn authorize(&self) -> Result<String, AuthError> {
        tracing::debug!("Auth step 1: authorization request");

        let url = self.endpoint("/authorize")?;
        let response = self
            .http
            .get(url.clone())
            .query(&[
                ("code_challenge_method", "S256"),
                ("scope", SCOPE),
                ("redirect_uri", REDIRECT_URI),
                ("code_challenge", self.pkce.challenge.as_str()),
                ("client_id", CLIENT_ID),
                ("audience", AUDIENCE),
                ("response_type", "code"),
                ("state", self.state.as_str()),
                ("auth0Client", AUTH0_CLIENT_AUTHORIZE),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_redirection() {
            return Err(AuthError::Authorization(format!(
                "expected redirect, got HTTP {}",
                status.as_u16()
            )));
        }

        let location = location(&url, &response)
            .ok_or_else(|| AuthError::Authorization("redirect without Location".to_string()))?;

        query_value(&location, "state")
            .ok_or_else(|| AuthError::Authorization(format!("no state in redirect to {location}")))
    }

    /// Step 2: login page. Returns the CSRF token, or a generated one.
    async fn fetch_login_page(&self, state: &str) -> Result<String, AuthError> {
        tracing::debug!("Auth step 2: login page");

        // The app encodes these three before the query string is built, so
        // they reach the server encoded twice.
        let scope = urlencoding::encode(SCOPE);
        let redirect_uri = urlencoding::encode(REDIRECT_URI);
        let audience = urlencoding::encode(AUDIENCE);

        let response = self
            .http
            .get(self.endpoint("/login")?)
            .query(&[
                ("state", state),
                ("client", CLIENT_ID),
                ("protocol", "oauth2"),
                ("code_challenge_method", "S256"),
                ("scope", &*scope),
                ("redirect_uri", &*redirect_uri),
                ("code_challenge", self.pkce.challenge.as_str()),
                ("audience", &*audience),
                ("response_type", "code"),
                ("auth0Client", AUTH0_CLIENT_SWIFT),
            ])
            .send()
            .await?;

        let html = response.text().await?;

        match find_csrf_token(&html) {
            Some(token) => Ok(token),
            None => {
                tracing::warn!("No CSRF token on login page, using a generated value");
                Ok(random_token())
            }
        }
    }

    /// Step 3: username/password challenge.
    async fn challenge(&self, state: &str) -> Result<(), AuthError> {
        tracing::debug!("Auth step 3: challenge");

        let response = self
            .http
            .post(self.endpoint("/usernamepassword/challenge")?)
            .header("Auth0-Client", AUTH0_CLIENT_CHALLENGE)
            .header(ORIGIN, self.origin())
            .header(REFERER, self.referer())
            .json(&json!({ "state": state }))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AuthError::Challenge {
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    /// Step 4: credential submission. Returns the WS-Federation form.
    async fn submit_credentials(&self, state: &str, csrf: &str) -> Result<WsFedForm, AuthError> {
        tracing::debug!("Auth step 4: credential submission");

        let body = json!({
            "client_id": CLIENT_ID,
            "redirect_uri": REDIRECT_URI,
            "tenant": TENANT,
            "response_type": "code",
            "scope": SCOPE,
            "audience": AUDIENCE,
            "_csrf": csrf,
            "state": state,
            "_intstate": "deprecated",
            "username": hex_encode(self.credentials.username()),
            "password": self.credentials.password(),
            "captcha": null,
            "connection": CONNECTION,
        });

        let response = self
            .http
            .post(self.endpoint("/usernamepassword/login")?)
            .header("Auth0-Client", AUTH0_CLIENT_LOGIN)
            .header(ORIGIN, self.origin())
            .header(REFERER, self.referer())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let html = response.text().await?;

        tracing::debug!(status = status.as_u16(), "Login response received");

        if status != StatusCode::OK {
            return Err(AuthError::InvalidCredentials {
                status: status.as_u16(),
                body: html,
            });
        }

        WsFedForm::parse(&html)
    }

    /// Step 5: WS-Federation callback. Returns the resume state.
    async fn submit_callback(&self, form: &WsFedForm) -> Result<String, AuthError> {
        tracing::debug!("Auth step 5: login callback");

        let url = self.endpoint("/login/callback")?;
        let response = self
            .http
            .post(url.clone())
            .header(ORIGIN, "null")
            .header(REFERER, self.referer())
            .form(&[
                ("wa", form.wa.as_str()),
                ("wresult", form.wresult.as_str()),
                ("wctx", form.wctx.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_redirection() {
            return Err(AuthError::CallbackFailed {
                status: status.as_u16(),
            });
        }

        let location = location(&url, &response)
            .ok_or_else(|| AuthError::UnexpectedRedirect("missing Location header".to_string()))?;

        if !location.path().starts_with(RESUME_PATH) {
            return Err(AuthError::UnexpectedRedirect(location.to_string()));
        }

        query_value(&location, "state").ok_or_else(|| AuthError::UnexpectedRedirect(location.to_string()))
    }

    /// Step 6: walk the redirect chain from the resume endpoint to the code.
    async fn follow_resume(&self, resume_state: &str) -> Result<String, AuthError> {
        tracing::debug!("Auth step 6: resolving authorization code");

        let mut current = self.endpoint(RESUME_PATH)?;
        let mut response = self
            .http
            .get(current.clone())
            .query(&[("state", resume_state)])
            .send()
            .await?;
        let mut hops = 0;

        loop {
            let status = response.status();
            if !status.is_redirection() {
                return Err(AuthError::AuthorizationCodeMissing(format!(
                    "{} answered HTTP {}",
                    current.path(),
                    status.as_u16()
                )));
            }

            let Some(next) = location(&current, &response) else {
                return Err(AuthError::AuthorizationCodeMissing(format!(
                    "{} redirected without Location",
                    current.path()
                )));
            };

            match RedirectShape::of(&next) {
                RedirectShape::Code => {
                    tracing::debug!(hops, "Authorization code received");
                    return query_value(&next, "code")
                        .ok_or_else(|| AuthError::AuthorizationCodeMissing(next.to_string()));
                }
                RedirectShape::Unrecognized => {
                    tracing::warn!(location = %next, "Unrecognized redirect while resolving authorization code");
                    return Err(AuthError::AuthorizationCodeMissing(next.to_string()));
                }
                shape @ (RedirectShape::CookieAttach | RedirectShape::Authorize) => {
                    hops += 1;
                    if hops > MAX_REDIRECT_HOPS {
                        return Err(AuthError::TooManyRedirects {
                            hops: MAX_REDIRECT_HOPS,
                        });
                    }
                    tracing::debug!(hop = hops, ?shape, path = next.path(), "Following redirect");
                    response = self.http.get(next.clone()).send().await?;
                    current = next;
                }
            }
        }
    }

    /// Step 7: exchange the code for tokens.
    async fn exchange_code(&self, code: &str) -> Result<Tokens, AuthError> {
        tracing::debug!("Auth step 7: token exchange");

        let body = json!({
            "redirect_uri": REDIRECT_URI,
            "client_id": CLIENT_ID,
            "code": code,
            "grant_type": "authorization_code",
            "code_verifier": self.pkce.verifier,
        });

        let response = self
            .http
            .post(self.endpoint("/oauth/token")?)
            .header("Auth0-Client", AUTH0_CLIENT_SWIFT)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status != StatusCode::OK {
            return Err(AuthError::TokenExchange(format!(
                "HTTP {}: {text}",
                status.as_u16()
            )));
        }

        let parsed: TokenResponse = serde_json::from_str(&text)
            .map_err(|e| AuthError::TokenExchange(format!("invalid token response: {e}")))?;

        match parsed {
            TokenResponse {
                access_token: Some(access_token),
                refresh_token: Some(refresh_token),
                id_token: Some(id_token),
                expires_in: Some(expires_in),
            } => Ok(Tokens {
                access_token,
                refresh_token,
                id_token: Some(id_token),
                expires_in: Some(expires_in),
            }),
            _ => Err(AuthError::TokenExchange(
                "token response is missing required fields".to_string(),
            )),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        self.base
            .join(path)
            .map_err(|e| AuthError::InvalidUrl(format!("{path}: {e}")))
    }

    fn origin(&self) -> String {
        self.base.origin().ascii_serialization()
    }

    fn referer(&self) -> String {
        format!("{}/", self.origin())
    }
}

/// Resolves the `Location` header of a redirect against the request URL.
fn location(current: &Url, response: &Response) -> Option<Url> {
    let raw = response.headers().get(LOCATION)?.to_str().ok()?;
    current.join(raw).ok()
}

fn query_value(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

fn hex_encode(value: &str) -> String {
    value
        .bytes()
        .fold(String::with_capacity(value.len() * 2), |mut out, byte| {
            let _ = write!(out, "{byte:02x}");
            out
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn username_is_hex_encoded() {
        assert_eq!(hex_encode("a@b.jp"), "6140622e6a70");
        assert_eq!(hex_encode(""), "");
    }

    #[test]
    fn redirect_with_code_on_custom_scheme() {
        let next = url(
            "com.panasonic.jp.SmartRAC://auth.digital.panasonic.com/ios/com.panasonic.jp.SmartRAC/callback?code=abc&state=s",
        );
        assert_eq!(RedirectShape::of(&next), RedirectShape::Code);
        assert_eq!(query_value(&next, "code").as_deref(), Some("abc"));
    }

    #[test]
    fn redirect_shapes() {
        assert_eq!(
            RedirectShape::of(&url("https://club.panasonic.jp/cookie/attachContentToken?t=1")),
            RedirectShape::CookieAttach
        );
        assert_eq!(
            RedirectShape::of(&url("https://club.panasonic.jp/cookie/attachContentToken?code=c1&t=1")),
            RedirectShape::CookieAttach
        );
        assert_eq!(
            RedirectShape::of(&url("https://auth.digital.panasonic.com/authorize?client_id=x")),
            RedirectShape::Authorize
        );
        assert_eq!(
            RedirectShape::of(&url("https://auth.digital.panasonic.com/u/mfa")),
            RedirectShape::Unrecognized
        );
    }

    #[test]
    fn relative_location_is_resolved() {
        let base = url("https://auth.digital.panasonic.com/login/callback");
        let next = base.join("/authorize/resume?state=r%2B1").unwrap();
        assert_eq!(next.path(), RESUME_PATH);
        assert_eq!(query_value(&next, "state").as_deref(), Some("r+1"));
    }

    #[test]
    fn rejects_invalid_base_url() {
        let credentials = Credentials::new("u", "p");
        let err = AuthFlow::new("not a url", Duration::from_secs(5), &credentials).unwrap_err();
        assert!(matches!(err, AuthError::InvalidUrl(_)));
    }

    #[test]
    fn each_attempt_has_fresh_pkce_and_state() {
        let credentials = Credentials::new("u", "p");
        let first = AuthFlow::new("https://auth.example", Duration::from_secs(5), &credentials).unwrap();
        let second = AuthFlow::new("https://auth.example", Duration::from_secs(5), &credentials).unwrap();
        assert_ne!(first.state, second.state);
        assert_ne!(first.pkce.verifier, second.pkce.verifier);
        assert_eq!(first.referer(), "https://auth.example/");
    }
}
