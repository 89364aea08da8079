// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client for the Eolia device API.

use std::time::{Duration, Instant};

use chrono::Utc;
use parking_lot::RwLock;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;

use super::{ClientConfig, DeviceApi};
use crate::auth::{AuthFlow, Credentials, Tokens, refresh_tokens};
use crate::command::UpdateDeviceRequest;
use crate::error::{Error, ParseError, ProtocolError, Result};
use crate::response::{Appliance, DeviceStatus, DevicesResponse, ProductFunctions};
use crate::types::eolia_timestamp;

// The app really sends "Json" capitalized.
const API_CONTENT_TYPE: &str = "application/Json; charset=UTF-8";
const API_USER_AGENT: &str = "%E3%82%A8%E3%82%AA%E3%83%AA%E3%82%A2/81 CFNetwork/3826.600.31 Darwin/24.6.0";

/// Error code the API returns when another controller holds the appliance.
const LOCKED_ERROR_CODE: &str = "EOLIA-4008";

/// Access tokens this close to expiry are refreshed before use.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct Session {
    tokens: Tokens,
    expires_at: Option<Instant>,
}

impl Session {
    fn new(tokens: Tokens) -> Self {
        let expires_at = tokens
            .expires_in
            .map(|secs| Instant::now() + Duration::from_secs(secs));
        Self { tokens, expires_at }
    }

    fn expires_soon(&self) -> bool {
        self.expires_at
            .is_some_and(|at| at.saturating_duration_since(Instant::now()) <= REFRESH_MARGIN)
    }
}

/// Client for the Eolia cloud.
///
/// Owns the login session and performs device API calls with it. Share one
/// client behind an [`Arc`](std::sync::Arc) across all appliances of an
/// account.
///
/// Expired sessions are handled transparently: a token close to expiry is
/// refreshed before a call, and a `401` triggers one refresh and one retry.
/// When the refresh token is rejected and credentials are available, the
/// full login is run again.
///
/// Device calls return `Ok(None)` when the API answers with anything other
/// than `200` or the request times out; the status and body are logged.
///
/// # Examples
///
/// ```no_run
/// use eolia_lib::auth::Credentials;
/// use eolia_lib::protocol::{ClientConfig, EoliaClient};
///
/// # async fn example() -> eolia_lib::Result<()> {
/// let client = EoliaClient::login(ClientConfig::new(), Credentials::from_env()?).await?;
///
/// for appliance in client.list_devices().await?.unwrap_or_default() {
///     let status = client.get_status(&appliance.appliance_id).await?;
///     println!("{}: {:?}", appliance.display_name(), status.and_then(|s| s.inside_temp));
/// }
/// # Ok(())
/// # }
/// ```
pub struct EoliaClient {
    config: ClientConfig,
    http: Client,
    credentials: Option<Credentials>,
    session: RwLock<Option<Session>>,
    refresh_lock: Mutex<()>,
}

impl EoliaClient {
    /// Creates a client that will log in with the given credentials.
    ///
    /// No request is made until [`authenticate`](Self::authenticate) is called.
    ///
    /// # Errors
    ///
    /// Returns error if the API base URL is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: ClientConfig, credentials: Credentials) -> Result<Self> {
        let mut client = Self::build(config)?;
        client.credentials = Some(credentials);
        Ok(client)
    }

    /// Creates a client from previously issued tokens, skipping the login.
    ///
    /// # Errors
    ///
    /// Returns error if the API base URL is invalid or the HTTP client
    /// cannot be created.
    pub fn from_tokens(
        config: ClientConfig,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Result<Self> {
        let client = Self::build(config)?;
        client.store(Tokens {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            id_token: None,
            expires_in: None,
        });
        Ok(client)
    }

    /// Creates a client and logs in.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] if any login step fails.
    pub async fn login(config: ClientConfig, credentials: Credentials) -> Result<Self> {
        let client = Self::new(config, credentials)?;
        client.authenticate().await?;
        Ok(client)
    }

    /// Adds credentials used to log in again when the refresh token is rejected.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    fn build(config: ClientConfig) -> Result<Self> {
        reqwest::Url::parse(config.api_base_url()).map_err(|e| {
            ProtocolError::InvalidAddress(format!("{}: {e}", config.api_base_url()))
        })?;

        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(Self {
            config,
            http,
            credentials: None,
            session: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns true if an access token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_some()
    }

    /// Returns the current tokens, for persistence by the host.
    #[must_use]
    pub fn tokens(&self) -> Option<Tokens> {
        self.session.read().as_ref().map(|s| s.tokens.clone())
    }

    /// Runs the full login flow and stores the issued tokens.
    ///
    /// Each call starts from scratch with a fresh cookie jar.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredentials`] if the client has no
    /// credentials, or [`Error::Authentication`] naming the failed step.
    pub async fn authenticate(&self) -> Result<()> {
        let credentials = self.credentials.as_ref().ok_or(Error::MissingCredentials)?;

        tracing::debug!(username = credentials.username(), "Starting login");

        let flow = AuthFlow::new(self.config.auth_base_url(), self.config.timeout(), credentials)?;
        let tokens = flow.run().await.inspect_err(|e| {
            tracing::warn!(error = %e, "Login failed");
        })?;

        tracing::info!("Login succeeded");
        self.store(tokens);
        Ok(())
    }

    /// Exchanges the refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] if there is no session, or
    /// [`Error::TokenRefresh`] if the identity service rejects the refresh.
    pub async fn refresh(&self) -> Result<()> {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_session().await
    }

    async fn refresh_session(&self) -> Result<()> {
        let refresh_token = self
            .session
            .read()
            .as_ref()
            .map(|s| s.tokens.refresh_token.clone())
            .ok_or(Error::NotAuthenticated)?;

        let tokens = refresh_tokens(&self.http, &self.config.token_url(), &refresh_token).await?;
        self.store(tokens);
        tracing::debug!("Access token refreshed");
        Ok(())
    }

    fn store(&self, tokens: Tokens) {
        *self.session.write() = Some(Session::new(tokens));
    }

    fn access_token(&self) -> Result<String> {
        self.session
            .read()
            .as_ref()
            .map(|s| s.tokens.access_token.clone())
            .ok_or(Error::NotAuthenticated)
    }

    fn can_recover(&self) -> bool {
        self.credentials.is_some()
            || self
                .session
                .read()
                .as_ref()
                .is_some_and(|s| !s.tokens.refresh_token.is_empty())
    }

    async fn refresh_if_expiring(&self) {
        let expiring = self.session.read().as_ref().is_some_and(Session::expires_soon);
        if !expiring {
            return;
        }

        let _guard = self.refresh_lock.lock().await;
        let still_expiring = self.session.read().as_ref().is_some_and(Session::expires_soon);
        if still_expiring && let Err(e) = self.refresh_session().await {
            tracing::warn!(error = %e, "Proactive token refresh failed");
        }
    }

    /// Restores a usable session after the API rejected `rejected_token`.
    async fn recover_session(&self, rejected_token: &str) -> Result<()> {
        let _guard = self.refresh_lock.lock().await;

        // Another caller already replaced the token while we waited.
        if self.access_token().is_ok_and(|current| current != rejected_token) {
            return Ok(());
        }

        match self.refresh_session().await {
            Ok(()) => Ok(()),
            Err(e) if self.credentials.is_some() => {
                tracing::warn!(error = %e, "Token refresh failed, logging in again");
                self.authenticate().await
            }
            Err(e) => Err(e),
        }
    }

    /// Sends an authorized request, refreshing and retrying once on `401`.
    async fn send(&self, method: Method, url: &str, body: Option<&[u8]>) -> Result<Response> {
        self.refresh_if_expiring().await;

        let token = self.access_token()?;
        let response = self
            .request(method.clone(), url, &token, body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if response.status() != StatusCode::UNAUTHORIZED || !self.can_recover() {
            return Ok(response);
        }

        tracing::debug!(url, "Access token rejected, refreshing");
        self.recover_session(&token).await?;

        let token = self.access_token()?;
        self.request(method, url, &token, body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))
    }

    fn request(&self, method: Method, url: &str, token: &str, body: Option<&[u8]>) -> RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(CONTENT_TYPE, API_CONTENT_TYPE)
            .header(ACCEPT, "application/json")
            .header("X-Eolia-Date", eolia_timestamp(Utc::now()))
            .header(USER_AGENT, API_USER_AGENT);

        match body {
            Some(body) => builder.body(body.to_vec()),
            None => builder,
        }
    }

    fn transport_error(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            let millis = u64::try_from(self.config.timeout().as_millis()).unwrap_or(u64::MAX);
            ProtocolError::Timeout(millis).into()
        } else {
            ProtocolError::Http(error).into()
        }
    }

    /// Sends a request and returns the status and body, or `None` on timeout.
    async fn exchange(
        &self,
        method: Method,
        url: &str,
        body: Option<&[u8]>,
    ) -> Result<Option<(StatusCode, String)>> {
        let response = match self.send(method, url, body).await {
            Ok(response) => response,
            Err(Error::Protocol(ProtocolError::Timeout(ms))) => {
                tracing::warn!(url, timeout_ms = ms, "Request timed out");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let status = response.status();
        let text = response.text().await.map_err(ProtocolError::Http)?;
        Ok(Some((status, text)))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        tracing::debug!(url, "GET");

        let Some((status, body)) = self.exchange(Method::GET, url, None).await? else {
            return Ok(None);
        };

        if status != StatusCode::OK {
            tracing::warn!(url, status = status.as_u16(), body = %body, "Request failed");
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&body).map_err(ParseError::Json)?))
    }

    fn status_url(&self, appliance_id: &str) -> String {
        format!(
            "{}/eolia/v6/devices/{}/status",
            self.config.api_base_url(),
            urlencoding::encode(appliance_id)
        )
    }

    /// Lists the appliances registered to the account.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, an unrecoverable `401`, or a
    /// malformed body.
    pub async fn list_devices(&self) -> Result<Option<Vec<Appliance>>> {
        let url = format!("{}/eolia/v6/devices", self.config.api_base_url());
        let devices: Option<DevicesResponse> = self.get_json(&url).await?;
        Ok(devices.map(|d| d.ac_list))
    }

    /// Fetches the current status of an appliance.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, an unrecoverable `401`, or a
    /// malformed body.
    pub async fn get_status(&self, appliance_id: &str) -> Result<Option<DeviceStatus>> {
        self.get_json(&self.status_url(appliance_id)).await
    }

    /// Fetches the optional features supported by a product model.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, an unrecoverable `401`, or a
    /// malformed body.
    pub async fn get_product_functions(&self, product_code: &str) -> Result<Option<ProductFunctions>> {
        let url = format!(
            "{}/eolia/v6/products/{}/functions",
            self.config.api_base_url(),
            urlencoding::encode(product_code)
        );
        self.get_json(&url).await
    }

    /// Writes a status update and returns the resulting status.
    ///
    /// A request without an operation token gets one from a fresh status
    /// read, or an empty token if that read yields nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceLocked`] when another controller holds the
    /// appliance, or error on transport failure or a malformed body.
    pub async fn put_status(
        &self,
        appliance_id: &str,
        request: &UpdateDeviceRequest,
    ) -> Result<Option<DeviceStatus>> {
        let mut payload = request.clone();
        if payload.operation_token.is_none() {
            tracing::debug!(appliance_id, "No operation token, reading current status");
            let token = self
                .get_status(appliance_id)
                .await?
                .and_then(|status| status.operation_token);
            payload.operation_token = Some(token.unwrap_or_default());
        }

        let url = self.status_url(appliance_id);
        let body = serde_json::to_vec(&payload).map_err(ParseError::Json)?;

        tracing::debug!(url, "PUT");

        let Some((status, text)) = self.exchange(Method::PUT, &url, Some(&body)).await? else {
            return Ok(None);
        };

        if status == StatusCode::OK {
            return Ok(Some(serde_json::from_str(&text).map_err(ParseError::Json)?));
        }

        if is_lock_conflict(status, &text) {
            tracing::warn!(appliance_id, "Appliance is locked by another controller");
            return Err(Error::DeviceLocked {
                appliance_id: appliance_id.to_string(),
            });
        }

        tracing::warn!(url, status = status.as_u16(), body = %text, "Update failed");
        Ok(None)
    }
}

impl std::fmt::Debug for EoliaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EoliaClient")
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl DeviceApi for EoliaClient {
    async fn get_status(&self, appliance_id: &str) -> Result<Option<DeviceStatus>> {
        Self::get_status(self, appliance_id).await
    }

    async fn put_status(
        &self,
        appliance_id: &str,
        request: &UpdateDeviceRequest,
    ) -> Result<Option<DeviceStatus>> {
        Self::put_status(self, appliance_id, request).await
    }
}

/// Returns true if a failed write means "locked by another controller".
fn is_lock_conflict(status: StatusCode, body: &str) -> bool {
    status == StatusCode::CONFLICT
        || serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| value.get("code")?.as_str().map(|code| code == LOCKED_ERROR_CODE))
            .unwrap_or(false)
}
