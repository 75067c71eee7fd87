//! OAuth2 credentials for the Google Slides and Drive APIs.
//!
//! A credential is loaded from a JSON cache file, refreshed when it has
//! expired, and otherwise obtained through the installed-app flow: the user
//! authorizes in a browser and Google redirects back to a one-shot listener
//! on the loopback interface.

use crate::http;
use chrono::{DateTime, Duration, Utc};
use deck_core::{Error, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::{Ipv4Addr, TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use url::Url;

pub const PRESENTATIONS_SCOPE: &str = "https://www.googleapis.com/auth/presentations";
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

/// Scopes requested by the uploader.
pub const SCOPES: &[&str] = &[PRESENTATIONS_SCOPE, DRIVE_SCOPE];

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens expiring within this many seconds are treated as expired.
const EXPIRY_SKEW_SECS: i64 = 60;

/// Authorized-user credential, as persisted in the token cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    /// Bearer access token.
    pub token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,

    #[serde(default)]
    pub scopes: Vec<String>,

    /// Access token expiry; unknown expiry is treated as valid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl Credential {
    /// Whether the access token can be used at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.token.is_empty() {
            return false;
        }
        match self.expiry {
            Some(expiry) => expiry - Duration::seconds(EXPIRY_SKEW_SECS) > now,
            None => true,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Whether a refresh token is available.
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// OAuth client registration, read from the JSON file downloaded from the
/// Google Cloud console.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The console wraps the registration in `installed` (desktop apps) or
/// `web` (web apps).
#[derive(Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

impl ClientSecret {
    /// Load the client secret file; a missing file is `MissingClientSecret`.
    pub fn load(path: &Path) -> Result<Self> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::MissingClientSecret(path.to_path_buf()))
            }
            Err(e) => return Err(Error::IoError(e)),
        };
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: ClientSecretFile = serde_json::from_str(json)
            .map_err(|e| Error::SerializationError(format!("Invalid client secret file: {}", e)))?;

        file.installed.or(file.web).ok_or_else(|| {
            Error::SerializationError(
                "Client secret file has neither an \"installed\" nor a \"web\" section".into(),
            )
        })
    }
}

/// JSON file holding the credential between runs.
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached credential. A missing or unreadable cache yields
    /// `None`; the caller then negotiates a fresh credential.
    pub fn load(&self) -> Option<Credential> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No token cache at {}", self.path.display());
                return None;
            }
            Err(e) => {
                log::warn!("Ignoring unreadable token cache {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&json) {
            Ok(credential) => Some(credential),
            Err(e) => {
                log::warn!("Ignoring corrupt token cache {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Overwrite the cache with `credential`.
    pub fn store(&self, credential: &Credential) -> Result<()> {
        let json = serde_json::to_string_pretty(credential)
            .map_err(|e| Error::SerializationError(e.to_string()))?;
        fs::write(&self.path, json)?;
        log::debug!("Saved credential to {}", self.path.display());
        Ok(())
    }
}

/// Authorization code returned by the consent screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationCode {
    pub code: String,
    /// Redirect URI the code was issued for; the token exchange must repeat it.
    pub redirect_uri: String,
}

/// Token endpoint operations.
pub trait TokenExchange {
    /// Trade an authorization code for a credential.
    fn exchange_code(
        &self,
        secret: &ClientSecret,
        grant: &AuthorizationCode,
        scopes: &[&str],
    ) -> Result<Credential>;

    /// Obtain a new access token with the credential's refresh token.
    fn refresh(&self, credential: &Credential) -> Result<Credential>;
}

/// The interactive consent step.
pub trait InteractiveAuthorizer {
    fn authorize(&self, secret: &ClientSecret, scopes: &[&str]) -> Result<AuthorizationCode>;
}

/// Anything that can hand out a usable credential.
pub trait CredentialProvider {
    /// Fails with `AuthRequired` when no cached or refreshable credential
    /// exists and the provider cannot ask the user.
    fn acquire(&self) -> Result<Credential>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

impl TokenResponse {
    fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expires_in.map(|secs| Utc::now() + Duration::seconds(secs))
    }

    /// Credential from an authorization code grant. Granted scopes win over
    /// the requested ones when the server reports them.
    fn into_credential(self, secret: &ClientSecret, requested: &[&str]) -> Credential {
        let scopes = match &self.scope {
            Some(granted) => granted.split_whitespace().map(str::to_string).collect(),
            None => requested.iter().map(|s| s.to_string()).collect(),
        };

        Credential {
            expiry: self.expiry(),
            token: self.access_token,
            refresh_token: self.refresh_token,
            token_uri: secret.token_uri.clone(),
            client_id: secret.client_id.clone(),
            client_secret: secret.client_secret.clone(),
            scopes,
        }
    }

    /// `credential` with the refreshed access token applied.
    fn refreshed(self, credential: &Credential) -> Credential {
        Credential {
            expiry: self.expiry(),
            token: self.access_token,
            // Google usually omits the refresh token on refresh
            refresh_token: self
                .refresh_token
                .or_else(|| credential.refresh_token.clone()),
            ..credential.clone()
        }
    }
}

/// Token endpoint client.
pub struct OAuthClient {
    http: Client,
}

impl OAuthClient {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    fn post_form(&self, token_uri: &str, form: &[(&str, &str)]) -> Result<TokenResponse> {
        let response = http::send(self.http.post(token_uri).form(form)).map_err(|e| match e {
            Error::ApiError { status, message } => {
                Error::AuthError(format!("{} (HTTP {})", message, status))
            }
            other => other,
        })?;
        http::read_json(response)
    }
}

impl TokenExchange for OAuthClient {
    fn exchange_code(
        &self,
        secret: &ClientSecret,
        grant: &AuthorizationCode,
        scopes: &[&str],
    ) -> Result<Credential> {
        log::info!("Exchanging authorization code");
        let response = self.post_form(
            &secret.token_uri,
            &[
                ("grant_type", "authorization_code"),
                ("code", grant.code.as_str()),
                ("client_id", secret.client_id.as_str()),
                ("client_secret", secret.client_secret.as_str()),
                ("redirect_uri", grant.redirect_uri.as_str()),
            ],
        )?;

        Ok(response.into_credential(secret, scopes))
    }

    fn refresh(&self, credential: &Credential) -> Result<Credential> {
        let refresh_token = credential
            .refresh_token
            .as_deref()
            .ok_or_else(|| Error::AuthError("Credential has no refresh token".into()))?;

        log::info!("Refreshing expired access token");
        let response = self.post_form(
            &credential.token_uri,
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", credential.client_id.as_str()),
                ("client_secret", credential.client_secret.as_str()),
            ],
        )?;

        Ok(response.refreshed(credential))
    }
}

/// Build the consent screen URL.
pub fn authorization_url(
    secret: &ClientSecret,
    scopes: &[&str],
    redirect_uri: &str,
) -> Result<Url> {
    let scope = scopes.join(" ");
    Url::parse_with_params(
        &secret.auth_uri,
        &[
            ("response_type", "code"),
            ("client_id", secret.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("scope", scope.as_str()),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ],
    )
    .map_err(|e| Error::AuthError(format!("Invalid auth_uri {}: {}", secret.auth_uri, e)))
}

/// Interpret the request target the browser was redirected to.
///
/// `Ok(Some(code))` on success, `Err` when the user denied access, and
/// `Ok(None)` for unrelated requests such as `/favicon.ico`.
pub fn parse_redirect_target(target: &str) -> Result<Option<String>> {
    let url = Url::parse("http://127.0.0.1")
        .and_then(|base| base.join(target))
        .map_err(|e| Error::AuthError(format!("Malformed redirect {}: {}", target, e)))?;

    let mut error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => return Ok(Some(value.into_owned())),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    match error {
        Some(error) => Err(Error::AuthError(format!("Authorization denied: {}", error))),
        None => Ok(None),
    }
}

const SUCCESS_PAGE: &str =
    "The authentication flow has completed. You may close this window.";

/// Installed-app flow with a one-shot HTTP listener on 127.0.0.1.
#[derive(Debug, Default)]
pub struct LoopbackAuthorizer;

impl LoopbackAuthorizer {
    pub fn new() -> Self {
        Self
    }

    /// Read one request and answer it; returns the request target.
    fn read_request(stream: &TcpStream) -> Result<String> {
        let mut request_line = String::new();
        BufReader::new(stream).read_line(&mut request_line)?;

        // "GET /?code=... HTTP/1.1"
        let target = request_line
            .split_whitespace()
            .nth(1)
            .unwrap_or("/")
            .to_string();
        Ok(target)
    }

    fn respond(mut stream: &TcpStream, status: &str, body: &str) -> Result<()> {
        write!(
            stream,
            "HTTP/1.1 {}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )?;
        stream.flush()?;
        Ok(())
    }
}

impl InteractiveAuthorizer for LoopbackAuthorizer {
    fn authorize(&self, secret: &ClientSecret, scopes: &[&str]) -> Result<AuthorizationCode> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?;
        let port = listener.local_addr()?.port();
        let redirect_uri = format!("http://127.0.0.1:{}/", port);

        let url = authorization_url(secret, scopes, &redirect_uri)?;
        println!("Please visit this URL to authorize this application:\n{}", url);

        for stream in listener.incoming() {
            let stream = stream?;
            let target = Self::read_request(&stream)?;

            match parse_redirect_target(&target) {
                Ok(Some(code)) => {
                    Self::respond(&stream, "200 OK", SUCCESS_PAGE)?;
                    return Ok(AuthorizationCode { code, redirect_uri });
                }
                Ok(None) => {
                    log::debug!("Ignoring request for {}", target);
                    Self::respond(&stream, "404 Not Found", "")?;
                }
                Err(e) => {
                    Self::respond(&stream, "200 OK", &e.to_string())?;
                    return Err(e);
                }
            }
        }

        Err(Error::AuthError("Loopback listener closed before authorization".into()))
    }
}

/// Credential provider backed by the token cache, with refresh and an
/// optional interactive fallback.
pub struct CachedCredentialProvider {
    cache: TokenCache,
    client_secret_path: PathBuf,
    exchange: Box<dyn TokenExchange>,
    authorizer: Option<Box<dyn InteractiveAuthorizer>>,
}

impl CachedCredentialProvider {
    /// Create a provider that never prompts the user.
    pub fn new(
        cache: TokenCache,
        client_secret_path: impl Into<PathBuf>,
        exchange: Box<dyn TokenExchange>,
    ) -> Self {
        Self {
            cache,
            client_secret_path: client_secret_path.into(),
            exchange,
            authorizer: None,
        }
    }

    /// Allow falling back to interactive authorization.
    pub fn with_authorizer(mut self, authorizer: Box<dyn InteractiveAuthorizer>) -> Self {
        self.authorizer = Some(authorizer);
        self
    }

    fn authorize_interactively(&self) -> Result<Credential> {
        let secret = ClientSecret::load(&self.client_secret_path)?;

        let authorizer = self.authorizer.as_ref().ok_or_else(|| {
            Error::AuthRequired(format!(
                "no usable credential in {} and interactive authorization is disabled",
                self.cache.path().display()
            ))
        })?;

        let grant = authorizer.authorize(&secret, SCOPES)?;
        self.exchange.exchange_code(&secret, &grant, SCOPES)
    }
}

impl CredentialProvider for CachedCredentialProvider {
    fn acquire(&self) -> Result<Credential> {
        let cached = self.cache.load();

        if let Some(credential) = &cached {
            if credential.is_valid() {
                log::info!("Using cached credential from {}", self.cache.path().display());
                return Ok(credential.clone());
            }
        }

        let credential = match cached {
            Some(expired) if expired.can_refresh() => self.exchange.refresh(&expired)?,
            _ => self.authorize_interactively()?,
        };

        self.cache.store(&credential)?;
        Ok(credential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use tempfile::TempDir;

    const SECRET_JSON: &str = r#"{
        "installed": {
            "client_id": "client-123.apps.googleusercontent.com",
            "project_id": "deck",
            "auth_uri": "https://accounts.google.com/o/oauth2/auth",
            "token_uri": "https://oauth2.googleapis.com/token",
            "client_secret": "shh",
            "redirect_uris": ["http://localhost"]
        }
    }"#;

    fn credential(token: &str, expiry: Option<DateTime<Utc>>, refresh: Option<&str>) -> Credential {
        Credential {
            token: token.into(),
            refresh_token: refresh.map(str::to_string),
            token_uri: DEFAULT_TOKEN_URI.into(),
            client_id: "client-123".into(),
            client_secret: "shh".into(),
            scopes: SCOPES.iter().map(|s| s.to_string()).collect(),
            expiry,
        }
    }

    #[derive(Default)]
    struct FakeExchange {
        calls: RefCell<Vec<String>>,
        reject_refresh: bool,
    }

    impl TokenExchange for Rc<FakeExchange> {
        fn exchange_code(
            &self,
            secret: &ClientSecret,
            grant: &AuthorizationCode,
            _scopes: &[&str],
        ) -> Result<Credential> {
            self.calls.borrow_mut().push(format!("code:{}", grant.code));
            let mut fresh = credential("from-code", None, Some("refresh-new"));
            fresh.client_id = secret.client_id.clone();
            Ok(fresh)
        }

        fn refresh(&self, credential: &Credential) -> Result<Credential> {
            self.calls.borrow_mut().push("refresh".into());
            if self.reject_refresh {
                return Err(Error::AuthError("invalid_grant (HTTP 400)".into()));
            }
            Ok(Credential {
                token: "refreshed".into(),
                expiry: Some(Utc::now() + Duration::hours(1)),
                ..credential.clone()
            })
        }
    }

    #[derive(Default)]
    struct FakeAuthorizer {
        prompts: Rc<Cell<usize>>,
    }

    impl InteractiveAuthorizer for FakeAuthorizer {
        fn authorize(&self, _secret: &ClientSecret, scopes: &[&str]) -> Result<AuthorizationCode> {
            assert_eq!(scopes, SCOPES);
            self.prompts.set(self.prompts.get() + 1);
            Ok(AuthorizationCode {
                code: "abc".into(),
                redirect_uri: "http://127.0.0.1:1/".into(),
            })
        }
    }

    fn fake_exchange() -> Rc<FakeExchange> {
        Rc::new(FakeExchange::default())
    }

    fn provider(dir: &TempDir, exchange: &Rc<FakeExchange>) -> CachedCredentialProvider {
        CachedCredentialProvider::new(
            TokenCache::new(dir.path().join("token.json")),
            dir.path().join("credentials.json"),
            Box::new(Rc::clone(exchange)),
        )
    }

    #[test]
    fn test_credential_validity() {
        let now = Utc::now();
        assert!(credential("t", None, None).is_valid_at(now));
        assert!(credential("t", Some(now + Duration::hours(1)), None).is_valid_at(now));
        assert!(!credential("t", Some(now - Duration::hours(1)), None).is_valid_at(now));
        // Inside the skew window counts as expired
        assert!(!credential("t", Some(now + Duration::seconds(30)), None).is_valid_at(now));
        assert!(!credential("", None, None).is_valid_at(now));
    }

    #[test]
    fn test_can_refresh() {
        assert!(credential("t", None, Some("r")).can_refresh());
        assert!(!credential("t", None, Some("")).can_refresh());
        assert!(!credential("t", None, None).can_refresh());
    }

    #[test]
    fn test_client_secret_installed_and_web() {
        let secret = ClientSecret::from_json(SECRET_JSON).unwrap();
        assert_eq!(secret.client_id, "client-123.apps.googleusercontent.com");
        assert_eq!(secret.token_uri, DEFAULT_TOKEN_URI);

        let web = ClientSecret::from_json(r#"{"web": {"client_id": "w", "client_secret": "s"}}"#)
            .unwrap();
        assert_eq!(web.auth_uri, DEFAULT_AUTH_URI);

        assert!(ClientSecret::from_json(r#"{"other": {}}"#).is_err());
    }

    #[test]
    fn test_client_secret_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        assert!(matches!(
            ClientSecret::load(&path),
            Err(Error::MissingClientSecret(p)) if p == path
        ));
    }

    #[test]
    fn test_token_cache_round_trip_and_corruption() {
        let dir = TempDir::new().unwrap();
        let cache = TokenCache::new(dir.path().join("token.json"));
        assert_eq!(cache.load(), None);

        let stored = credential("t", Some(Utc::now()), Some("r"));
        cache.store(&stored).unwrap();
        assert_eq!(cache.load(), Some(stored));

        fs::write(cache.path(), "not json").unwrap();
        assert_eq!(cache.load(), None);
    }

    #[test]
    fn test_authorization_url() {
        let secret = ClientSecret::from_json(SECRET_JSON).unwrap();
        let url = authorization_url(&secret, SCOPES, "http://127.0.0.1:8080/").unwrap();

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(url.as_str().starts_with(DEFAULT_AUTH_URI));
        assert!(pairs.contains(&("response_type".into(), "code".into())));
        assert!(pairs.contains(&("redirect_uri".into(), "http://127.0.0.1:8080/".into())));
        assert!(pairs.contains(&("access_type".into(), "offline".into())));
        assert!(pairs.contains(&("scope".into(), SCOPES.join(" "))));
    }

    #[test]
    fn test_parse_redirect_target() {
        assert_eq!(
            parse_redirect_target("/?state=x&code=4%2F0Ab&scope=a").unwrap(),
            Some("4/0Ab".to_string())
        );
        assert_eq!(parse_redirect_target("/favicon.ico").unwrap(), None);
        assert!(matches!(
            parse_redirect_target("/?error=access_denied"),
            Err(Error::AuthError(_))
        ));
    }

    #[test]
    fn test_acquire_uses_valid_cache() {
        let dir = TempDir::new().unwrap();
        let exchange = fake_exchange();
        let provider = provider(&dir, &exchange);
        let cached = credential("cached", Some(Utc::now() + Duration::hours(1)), None);
        TokenCache::new(dir.path().join("token.json")).store(&cached).unwrap();

        assert_eq!(provider.acquire().unwrap(), cached);
        assert!(exchange.calls.borrow().is_empty());
    }

    #[test]
    fn test_acquire_refreshes_and_persists() {
        let dir = TempDir::new().unwrap();
        let exchange = fake_exchange();
        let provider = provider(&dir, &exchange);
        let cache = TokenCache::new(dir.path().join("token.json"));
        cache
            .store(&credential("old", Some(Utc::now() - Duration::hours(1)), Some("r")))
            .unwrap();

        let acquired = provider.acquire().unwrap();
        assert_eq!(acquired.token, "refreshed");
        assert_eq!(exchange.calls.borrow().as_slice(), ["refresh"]);
        assert_eq!(cache.load().unwrap().token, "refreshed");
    }

    #[test]
    fn test_acquire_without_secret_fails_before_prompting() {
        let dir = TempDir::new().unwrap();
        let provider =
            provider(&dir, &fake_exchange()).with_authorizer(Box::new(FakeAuthorizer::default()));

        assert!(matches!(provider.acquire(), Err(Error::MissingClientSecret(_))));
    }

    #[test]
    fn test_acquire_non_interactive_requires_auth() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("credentials.json"), SECRET_JSON).unwrap();
        let provider = provider(&dir, &fake_exchange());

        assert!(matches!(provider.acquire(), Err(Error::AuthRequired(_))));
        assert!(!dir.path().join("token.json").exists());
    }

    #[test]
    fn test_acquire_interactive_exchanges_code_and_persists() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("credentials.json"), SECRET_JSON).unwrap();
        let exchange = fake_exchange();
        let provider =
            provider(&dir, &exchange).with_authorizer(Box::new(FakeAuthorizer::default()));

        let acquired = provider.acquire().unwrap();
        assert_eq!(acquired.token, "from-code");
        assert_eq!(acquired.client_id, "client-123.apps.googleusercontent.com");
        assert_eq!(exchange.calls.borrow().as_slice(), ["code:abc"]);

        let cached = TokenCache::new(dir.path().join("token.json")).load().unwrap();
        assert_eq!(cached, acquired);
    }

    #[test]
    fn test_expired_without_refresh_token_reauthorizes() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("credentials.json"), SECRET_JSON).unwrap();
        TokenCache::new(dir.path().join("token.json"))
            .store(&credential("old", Some(Utc::now() - Duration::hours(1)), None))
            .unwrap();
        let exchange = fake_exchange();
        let provider =
            provider(&dir, &exchange).with_authorizer(Box::new(FakeAuthorizer::default()));

        assert_eq!(provider.acquire().unwrap().token, "from-code");
        assert_eq!(exchange.calls.borrow().as_slice(), ["code:abc"]);
    }

    #[test]
    fn test_refresh_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("credentials.json"), SECRET_JSON).unwrap();
        let cache_path = dir.path().join("token.json");
        TokenCache::new(&cache_path)
            .store(&credential("old", Some(Utc::now() - Duration::hours(1)), Some("r")))
            .unwrap();
        let before = fs::read_to_string(&cache_path).unwrap();

        let exchange = Rc::new(FakeExchange {
            reject_refresh: true,
            ..FakeExchange::default()
        });
        let authorizer = FakeAuthorizer::default();
        let prompts = Rc::clone(&authorizer.prompts);
        let provider = provider(&dir, &exchange).with_authorizer(Box::new(authorizer));

        assert!(matches!(provider.acquire(), Err(Error::AuthError(_))));
        assert_eq!(exchange.calls.borrow().as_slice(), ["refresh"]);
        assert_eq!(prompts.get(), 0);
        assert_eq!(fs::read_to_string(&cache_path).unwrap(), before);
    }

    #[test]
    fn test_refreshed_keeps_old_refresh_token() {
        let old = credential("old", Some(Utc::now() - Duration::hours(1)), Some("r-old"));
        let response: TokenResponse =
            serde_json::from_str(r#"{"access_token": "new", "expires_in": 3600}"#).unwrap();

        let refreshed = response.refreshed(&old);
        assert_eq!(refreshed.token, "new");
        assert_eq!(refreshed.refresh_token.as_deref(), Some("r-old"));
        assert_eq!(refreshed.scopes, old.scopes);
        assert!(refreshed.is_valid());
    }

    #[test]
    fn test_refreshed_takes_rotated_refresh_token() {
        let old = credential("old", None, Some("r-old"));
        let response: TokenResponse =
            serde_json::from_str(r#"{"access_token": "new", "refresh_token": "r-new"}"#).unwrap();

        let refreshed = response.refreshed(&old);
        assert_eq!(refreshed.refresh_token.as_deref(), Some("r-new"));
        assert_eq!(refreshed.expiry, None);
    }

    #[test]
    fn test_code_grant_credential_scopes() {
        let secret = ClientSecret::from_json(SECRET_JSON).unwrap();

        let response: TokenResponse = serde_json::from_str(
            r#"{"access_token": "a", "refresh_token": "r", "scope": "https://www.googleapis.com/auth/drive"}"#,
        )
        .unwrap();
        let granted = response.into_credential(&secret, SCOPES);
        assert_eq!(granted.scopes, vec![DRIVE_SCOPE.to_string()]);
        assert_eq!(granted.refresh_token.as_deref(), Some("r"));
        assert_eq!(granted.client_id, secret.client_id);
        assert_eq!(granted.token_uri, secret.token_uri);

        let response: TokenResponse = serde_json::from_str(r#"{"access_token": "a"}"#).unwrap();
        let requested = response.into_credential(&secret, SCOPES);
        assert_eq!(requested.scopes, SCOPES);
        assert_eq!(requested.refresh_token, None);
    }
}
