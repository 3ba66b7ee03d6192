use serde::Deserialize;
use tracing::info;

use crate::error::AppError;

/// Room directory client. The directory is a plain HTTP collaborator:
/// it lists rooms and mints new ones.
pub(crate) struct RoomDirectory {
    http: reqwest::Client,
    base: String,
}

#[derive(Deserialize)]
struct GenRoomResponse {
    status: i64,
    name: Option<String>,
    message: Option<String>,
}

impl RoomDirectory {
    pub(crate) fn new(base: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// `GET /api/rooms`: names of all currently open rooms.
    pub(crate) async fn list_rooms(&self) -> Result<Vec<String>, AppError> {
        let url = format!("{}/api/rooms", self.base);
        let rooms: Vec<String> = self.http.get(&url).send().await?.json().await?;
        Ok(rooms)
    }

    /// `GET /api/gen-room`: ask the directory for a fresh room. A non-zero
    /// status carries a server-supplied message (e.g. rooms at capacity)
    /// which is surfaced verbatim.
    pub(crate) async fn gen_room(&self) -> Result<String, AppError> {
        let url = format!("{}/api/gen-room", self.base);
        // Failure still has a JSON body, so don't gate on the HTTP status.
        let resp: GenRoomResponse = self.http.get(&url).send().await?.json().await?;
        match (resp.status, resp.name) {
            (0, Some(name)) => {
                info!(room = %name, "room created");
                Ok(name)
            }
            (0, None) => Err(AppError::RoomRejected(
                "directory returned no room name".to_string(),
            )),
            (_, _) => Err(AppError::RoomRejected(
                resp.message
                    .unwrap_or_else(|| "unspecified directory error".to_string()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_list_rooms() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/rooms"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(vec!["roomForAll", "x7Ab2q"]),
            )
            .mount(&server)
            .await;

        let dir = RoomDirectory::new(&server.uri());
        let rooms = dir.list_rooms().await.unwrap();
        assert_eq!(rooms, vec!["roomForAll", "x7Ab2q"]);
    }

    #[tokio::test]
    async fn test_list_rooms_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/rooms"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<String>::new()))
            .mount(&server)
            .await;

        let dir = RoomDirectory::new(&server.uri());
        assert!(dir.list_rooms().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_gen_room_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/gen-room"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": 0,
                "name": "k3Pv9z",
            })))
            .mount(&server)
            .await;

        let dir = RoomDirectory::new(&server.uri());
        assert_eq!(dir.gen_room().await.unwrap(), "k3Pv9z");
    }

    #[tokio::test]
    async fn test_gen_room_capacity_message_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/gen-room"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "status": 1,
                "message": "Rooms at capacity.",
            })))
            .mount(&server)
            .await;

        let dir = RoomDirectory::new(&server.uri());
        let err = dir.gen_room().await.unwrap_err();
        match err {
            AppError::RoomRejected(msg) => assert_eq!(msg, "Rooms at capacity."),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_gen_room_unreachable_is_directory_error() {
        // Nothing listens here.
        let dir = RoomDirectory::new("http://127.0.0.1:1");
        assert!(matches!(
            dir.gen_room().await,
            Err(AppError::Directory(_))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let dir = RoomDirectory::new("http://example.invalid/");
        assert_eq!(dir.base, "http://example.invalid");
    }
}
