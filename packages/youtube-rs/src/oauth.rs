//! OAuth2 grants against Google's token endpoint.
//!
//! Covers the two grants the uploader needs: exchanging an authorization
//! code after the consent screen, and refreshing an expired access token.

use chrono::{Duration, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::credentials::{ClientSecrets, Credentials};
use crate::error::{Result, YoutubeError};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
    refresh_token: Option<String>,
    scope: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OAuthClient {
    http: Client,
    secrets: ClientSecrets,
    scopes: Vec<String>,
    redirect_uri: String,
}

impl OAuthClient {
    pub fn new(secrets: ClientSecrets, scopes: Vec<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            secrets,
            scopes,
            redirect_uri: redirect_uri.into(),
        }
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Consent screen URL. The user is sent here and comes back to
    /// `redirect_uri` with `code` and `state` query parameters.
    pub fn authorization_url(&self, state: &str) -> Result<String> {
        let mut url = Url::parse(&self.secrets.auth_uri)
            .map_err(|e| YoutubeError::Config(format!("Invalid auth_uri: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.secrets.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.scopes.join(" "))
            .append_pair("state", state)
            .append_pair("access_type", "offline")
            .append_pair("include_granted_scopes", "true")
            .append_pair("prompt", "consent");
        Ok(url.to_string())
    }

    /// Trade an authorization code for a fresh credential set.
    pub async fn exchange_code(&self, code: &str) -> Result<Credentials> {
        let params = [
            ("code", code),
            ("client_id", self.secrets.client_id.as_str()),
            ("client_secret", self.secrets.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];
        let token = self.request_token(&self.secrets.token_uri, &params).await?;

        let scopes = match token.scope {
            Some(scope) => scope.split_whitespace().map(str::to_string).collect(),
            None => self.scopes.clone(),
        };

        Ok(Credentials {
            token: Some(token.access_token),
            refresh_token: token.refresh_token,
            token_uri: self.secrets.token_uri.clone(),
            client_id: self.secrets.client_id.clone(),
            client_secret: self.secrets.client_secret.clone(),
            scopes,
            expiry: token
                .expires_in
                .map(|secs| Utc::now() + Duration::seconds(secs)),
        })
    }

    /// Obtain a new access token with the credentials' refresh token.
    ///
    /// The client id and secret stored in the credentials take precedence;
    /// the configured client secrets fill in when they are blank.
    pub async fn refresh(&self, credentials: &mut Credentials) -> Result<()> {
        let refresh_token = credentials
            .refresh_token
            .clone()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| YoutubeError::Auth("credentials carry no refresh token".into()))?;

        if credentials.client_id.is_empty() {
            credentials.client_id = self.secrets.client_id.clone();
        }
        if credentials.client_secret.is_empty() {
            credentials.client_secret = self.secrets.client_secret.clone();
        }

        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
        ];
        let token = self.request_token(&credentials.token_uri, &params).await?;

        credentials.token = Some(token.access_token);
        credentials.expiry = token
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs));
        if let Some(rotated) = token.refresh_token {
            credentials.refresh_token = Some(rotated);
        }

        debug!(expiry = ?credentials.expiry, "Refreshed YouTube access token");
        Ok(())
    }

    async fn request_token(&self, token_uri: &str, params: &[(&str, &str)]) -> Result<TokenResponse> {
        let response = self
            .http
            .post(token_uri)
            .form(params)
            .send()
            .await
            .map_err(|e| YoutubeError::Network(format!("Token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(YoutubeError::Auth(format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| YoutubeError::Parse(format!("Invalid token response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OAuthClient {
        let secrets = ClientSecrets {
            client_id: "id.apps.googleusercontent.com".into(),
            client_secret: "secret".into(),
            auth_uri: "https://accounts.google.com/o/oauth2/auth".into(),
            token_uri: "https://oauth2.googleapis.com/token".into(),
            redirect_uris: vec![],
        };
        OAuthClient::new(
            secrets,
            vec!["https://www.googleapis.com/auth/youtube.upload".into()],
            "http://localhost:8000/uploads/auth/youtube/callback",
        )
    }

    #[test]
    fn authorization_url_requests_offline_access() {
        let url = Url::parse(&client().authorization_url("xyz").unwrap()).unwrap();
        let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("accounts.google.com"));
        assert_eq!(pairs["state"], "xyz");
        assert_eq!(pairs["access_type"], "offline");
        assert_eq!(pairs["response_type"], "code");
        assert_eq!(
            pairs["scope"],
            "https://www.googleapis.com/auth/youtube.upload"
        );
        assert_eq!(
            pairs["redirect_uri"],
            "http://localhost:8000/uploads/auth/youtube/callback"
        );
    }

    #[tokio::test]
    async fn refresh_without_refresh_token_fails_fast() {
        let mut creds = Credentials {
            token: None,
            refresh_token: None,
            token_uri: "http://127.0.0.1:9/token".into(),
            client_id: String::new(),
            client_secret: String::new(),
            scopes: vec![],
            expiry: None,
        };

        let err = client().refresh(&mut creds).await.unwrap_err();
        assert!(matches!(err, YoutubeError::Auth(_)));
    }
}
