//! HTTP game-state backend.
//!
//! Endpoints, relative to the base URL:
//! - `GET    /getGameState/{user}/{game}` answers `{ success, gameState }`
//! - `POST   /saveGameState` with `{ userId, gameType, gameState }`
//! - `DELETE /clearGameState/{user}/{game}`
//! - `DELETE /clearAllGameStates/{user}`

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{Result, SnapshotStore, StoreError};
use crate::snapshot::Snapshot;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub struct RemoteStore {
    base_url: String,
    user_id: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveRequest<'a> {
    user_id: &'a str,
    game_type: &'a str,
    game_state: &'a Snapshot,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoadResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    game_state: serde_json::Value,
}

impl RemoteStore {
    pub fn new(base_url: &str, user_id: &str) -> Result<Self> {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            base_url: base.trim_end_matches('/').to_string(),
            user_id: user_id.to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl SnapshotStore for RemoteStore {
    fn name(&self) -> &str {
        "remote"
    }

    #[instrument(skip(self))]
    async fn load(&self, key: &str) -> Result<Option<Snapshot>> {
        let response = self
            .client
            .get(self.url(&format!("getGameState/{}/{}", self.user_id, key)))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = ensure_success(response).await?;

        let body: LoadResponse = response.json().await?;
        if !body.success {
            tracing::debug!("Backend reported no saved state for {}", key);
            return Ok(None);
        }
        Ok(Snapshot::from_value(body.game_state))
    }

    #[instrument(skip(self, snapshot))]
    async fn save(&self, key: &str, snapshot: &Snapshot) -> Result<()> {
        let body = SaveRequest {
            user_id: &self.user_id,
            game_type: key,
            game_state: snapshot,
        };
        let response = self
            .client
            .post(self.url("saveGameState"))
            .json(&body)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear(&self, key: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("clearGameState/{}/{}", self.user_id, key)))
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear_all(&self) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("clearAllGameStates/{}", self.user_id)))
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuizItem;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn snapshot() -> Snapshot {
        Snapshot {
            remaining_items: vec![QuizItem::new("β", "beta"), QuizItem::new("beta", "β")],
            streak: 3,
            best_streak: 4,
            correct_count: 6,
            log: vec!["✅ Correct! Streak: 3".to_string()],
        }
    }

    #[tokio::test]
    async fn load_existing_state() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/getGameState/user-1/alphabetGame"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "gameState": {
                    "remainingItems": [["β", "beta"], ["beta", "β"]],
                    "streak": 3,
                    "bestStreak": 4,
                    "correctCount": 6,
                    "log": ["✅ Correct! Streak: 3"]
                }
            })))
            .mount(&server)
            .await;

        let store = RemoteStore::new(&server.uri(), "user-1").unwrap();
        let loaded = store.load("alphabetGame").await.unwrap();
        assert_eq!(loaded, Some(snapshot()));
    }

    #[tokio::test]
    async fn load_not_found_is_no_session() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/getGameState/user-1/numbersGame"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let store = RemoteStore::new(&server.uri(), "user-1").unwrap();
        assert!(store.load("numbersGame").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn load_null_or_empty_state_is_no_session() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/getGameState/user-1/namesGame"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "gameState": null
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/getGameState/user-1/toBeGame"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "gameState": { "remainingItems": [] }
            })))
            .mount(&server)
            .await;

        let store = RemoteStore::new(&server.uri(), "user-1").unwrap();
        assert!(store.load("namesGame").await.unwrap().is_none());
        assert!(store.load("toBeGame").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn load_server_error_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/getGameState/user-1/weekdaysGame"))
            .respond_with(ResponseTemplate::new(500).set_body_string("database offline"))
            .mount(&server)
            .await;

        let store = RemoteStore::new(&server.uri(), "user-1").unwrap();
        let err = store.load("weekdaysGame").await.unwrap_err();
        assert!(matches!(err, StoreError::Status { status: 500, .. }));
        assert!(err.to_string().contains("database offline"));
    }

    #[tokio::test]
    async fn save_posts_wrapped_state() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/saveGameState"))
            .and(body_json(serde_json::json!({
                "userId": "user-1",
                "gameType": "alphabetGame",
                "gameState": {
                    "remainingItems": [["β", "beta"], ["beta", "β"]],
                    "streak": 3,
                    "bestStreak": 4,
                    "correctCount": 6,
                    "log": ["✅ Correct! Streak: 3"]
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let store = RemoteStore::new(&server.uri(), "user-1").unwrap();
        store.save("alphabetGame", &snapshot()).await.unwrap();
    }

    #[tokio::test]
    async fn clear_endpoints() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/clearGameState/user-1/alphabetGame"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/clearAllGameStates/user-1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let store = RemoteStore::new(&format!("{}/", server.uri()), "user-1").unwrap();
        store.clear("alphabetGame").await.unwrap();
        store.clear_all().await.unwrap();
    }
}
