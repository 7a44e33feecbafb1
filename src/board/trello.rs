//! Trello REST client.
//!
//! Every request carries the application key and token as query
//! parameters. A 401 or 403 answer is an authorization failure; a 404 on a
//! lookup means "not found"; anything else unexpected is a remote error.

use super::{Board, BoardList, BoardService, Card};
use crate::error::{CardsError, Result};
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

/// Public Trello API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.trello.com";

/// Connection settings for [`TrelloClient`].
#[derive(Debug, Clone)]
pub struct TrelloSettings {
    /// Base URL without the `/1` version prefix.
    pub base_url: String,
    /// Timeout applied to each request.
    pub request_timeout: Duration,
    /// Maximum number of boards a name search returns.
    pub search_limit: u32,
}

impl Default for TrelloSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            search_limit: 10,
        }
    }
}

/// Blocking client for the Trello REST API.
#[derive(Debug)]
pub struct TrelloClient {
    http: Client,
    base_url: String,
    key: String,
    token: String,
    search_limit: u32,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    boards: Vec<Board>,
}

#[derive(Deserialize)]
struct Member {
    #[serde(default)]
    username: String,
}

impl TrelloClient {
    /// Create a client.
    ///
    /// Fails with a configuration error if the key or token is empty. The
    /// credentials are not checked against the service; call
    /// [`TrelloClient::authorize`] for that.
    pub fn new(key: &str, token: &str, settings: TrelloSettings) -> Result<Self> {
        let key = key.trim();
        let token = token.trim();

        if key.is_empty() {
            return Err(CardsError::ConfigError(
                "application key is missing or empty (set `key`, TRELLO_KEY or --key)".to_string(),
            ));
        }
        if token.is_empty() {
            return Err(CardsError::ConfigError(
                "token is missing or empty (set `token`, TRELLO_TOKEN or --token)".to_string(),
            ));
        }

        let http = Client::builder()
            .timeout(settings.request_timeout)
            .user_agent(concat!("commitcards/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CardsError::RemoteError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            key: key.to_string(),
            token: token.to_string(),
            search_limit: settings.search_limit,
        })
    }

    /// Check the credentials by fetching the token's member.
    ///
    /// Returns the member's username.
    pub fn authorize(&self) -> Result<String> {
        let member: Member = self
            .get_json("members/me", &[("fields", "username")])?
            .ok_or_else(|| {
                CardsError::AuthorizationError("token does not belong to any member".to_string())
            })?;
        info!(user = %member.username, "Authorized with Trello");
        Ok(member.username)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/1/{}", self.base_url, path)
    }

    /// Send a request. Returns `Ok(None)` on 404.
    fn send(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Option<Response>> {
        debug!(%method, path, "Trello request");

        let response = self
            .http
            .request(method.clone(), self.url(path))
            .query(&[("key", self.key.as_str()), ("token", self.token.as_str())])
            .query(params)
            .send()
            .map_err(|e| CardsError::RemoteError(format!("{} /1/{}: {}", method, path, e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(Some(response));
        }

        let body = response.text().unwrap_or_default();
        match status {
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(CardsError::AuthorizationError(format!(
                    "Trello answered {}: {}",
                    status,
                    body.trim()
                )))
            }
            _ => Err(CardsError::RemoteError(format!(
                "{} /1/{} returned {}: {}",
                method,
                path,
                status,
                body.trim()
            ))),
        }
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Option<T>> {
        match self.send(Method::GET, path, params)? {
            Some(response) => response.json::<T>().map(Some).map_err(|e| {
                CardsError::RemoteError(format!("invalid response from /1/{}: {}", path, e))
            }),
            None => Ok(None),
        }
    }

    /// Send a write request; a 404 means the target vanished.
    fn write(&self, method: Method, path: &str, params: &[(&str, &str)]) -> Result<()> {
        match self.send(method, path, params)? {
            Some(_) => Ok(()),
            None => Err(CardsError::RemoteError(format!("/1/{} not found", path))),
        }
    }
}

impl BoardService for TrelloClient {
    fn search_board(&self, name: &str) -> Result<Option<Board>> {
        let limit = self.search_limit.to_string();
        let found: Option<SearchResponse> = self.get_json(
            "search",
            &[
                ("query", name),
                ("modelTypes", "boards"),
                ("board_fields", "name"),
                ("boards_limit", limit.as_str()),
            ],
        )?;
        Ok(found.and_then(|found| found.boards.into_iter().next()))
    }

    fn find_card_by_short_id(&self, board: &Board, short_id: u64) -> Result<Option<Card>> {
        self.get_json(
            &format!("boards/{}/cards/{}", board.id, short_id),
            &[("fields", "idShort,name")],
        )
    }

    fn add_comment(&self, card: &Card, text: &str) -> Result<()> {
        self.write(
            Method::POST,
            &format!("cards/{}/actions/comments", card.id),
            &[("text", text)],
        )
    }

    fn lists_for_board(&self, board: &Board) -> Result<Vec<BoardList>> {
        let lists: Option<Vec<BoardList>> = self.get_json(
            &format!("boards/{}/lists", board.id),
            &[("filter", "open"), ("fields", "name")],
        )?;
        lists.ok_or_else(|| CardsError::RemoteError(format!("board '{}' not found", board.name)))
    }

    fn move_card(&self, card: &Card, list: &BoardList) -> Result<()> {
        self.write(
            Method::PUT,
            &format!("cards/{}", card.id),
            &[("idList", list.id.as_str())],
        )
    }
}
