//! The single-record profile/settings stub.
//!
//! One global profile record and one language setting, held in memory
//! for the lifetime of the accept loop and handed to it as an explicit
//! [`StubState`] rather than a process-wide global. No auth, no
//! durability; validation stops at field presence.

use std::io::Read;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tiny_http::{Header, Method, Response, Server};
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("unable to start the profile stub: {0}")]
    Bind(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProfileRecord {
    pub weight: String,
    #[serde(rename = "activityLevel")]
    pub activity_level: String,
    pub climate: String,
    #[serde(rename = "dailyGoal")]
    pub daily_goal: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LanguageSettings {
    pub language: String,
}

impl Default for LanguageSettings {
    fn default() -> Self {
        Self {
            language: "English".to_string(),
        }
    }
}

/// Everything the stub remembers. Dies with the accept loop.
#[derive(Default)]
pub struct StubState {
    pub profile: Option<ProfileRecord>,
    pub settings: LanguageSettings,
}

/// Routes one request against the in-memory state and produces a status
/// code plus JSON body.
pub fn handle(state: &mut StubState, method: &Method, url: &str, body: &str) -> (u16, Value) {
    match (method, url) {
        (Method::Get, "/profile") => match &state.profile {
            Some(profile) => (200, json!(profile)),
            None => (404, json!({ "error": "Profile not found" })),
        },

        (Method::Post, "/profile") => match serde_json::from_str::<ProfileRecord>(body) {
            Ok(profile) => {
                state.profile = Some(profile);
                (200, json!({ "message": "Profile saved successfully" }))
            }
            Err(_) => (400, json!({ "error": "Missing required fields" })),
        },

        (Method::Get, "/settings") => (200, json!(state.settings)),

        (Method::Post, "/settings") => match serde_json::from_str::<LanguageSettings>(body) {
            Ok(update) => {
                state.settings = update;
                (200, json!({ "success": true, "language": state.settings.language }))
            }
            Err(_) => (400, json!({ "error": "Missing required fields" })),
        },

        _ => (404, json!({ "error": "Not found" })),
    }
}

/// Runs the stub until the process dies. Blocking; callers on a runtime
/// should wrap this in `spawn_blocking`.
pub fn run(addr: &str, mut state: StubState) -> Result<(), ServerError> {
    let server = Server::http(addr).map_err(|err| ServerError::Bind(err.to_string()))?;
    info!("profile stub listening on http://{addr}");

    let json_header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .expect("static header");

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let mut body = String::new();
        if let Err(err) = request.as_reader().read_to_string(&mut body) {
            warn!(%err, "failed to read request body");
            body.clear();
        }

        let (status, payload) = handle(&mut state, &method, &url, &body);
        info!(%method, %url, status, "handled request");

        let response = Response::from_string(payload.to_string())
            .with_status_code(status)
            .with_header(json_header.clone());
        if let Err(err) = request.respond(response) {
            warn!(%err, "failed to respond");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> String {
        json!({
            "weight": "70",
            "activityLevel": "Very Active",
            "climate": "Tropical",
            "dailyGoal": 4583
        })
        .to_string()
    }

    #[test]
    fn profile_is_missing_until_posted() {
        let mut state = StubState::default();

        let (status, body) = handle(&mut state, &Method::Get, "/profile", "");
        assert_eq!(status, 404);
        assert_eq!(body["error"], "Profile not found");

        let (status, _) = handle(&mut state, &Method::Post, "/profile", &sample_profile());
        assert_eq!(status, 200);

        let (status, body) = handle(&mut state, &Method::Get, "/profile", "");
        assert_eq!(status, 200);
        assert_eq!(body["dailyGoal"], 4583);
        assert_eq!(body["activityLevel"], "Very Active");
    }

    #[test]
    fn profile_post_checks_field_presence() {
        let mut state = StubState::default();
        let incomplete = json!({ "weight": "70", "climate": "Cold" }).to_string();

        let (status, body) = handle(&mut state, &Method::Post, "/profile", &incomplete);
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Missing required fields");
        assert!(state.profile.is_none());
    }

    #[test]
    fn settings_default_to_english() {
        let mut state = StubState::default();
        let (status, body) = handle(&mut state, &Method::Get, "/settings", "");
        assert_eq!(status, 200);
        assert_eq!(body["language"], "English");
    }

    #[test]
    fn settings_can_be_replaced() {
        let mut state = StubState::default();
        let update = json!({ "language": "Lithuanian" }).to_string();

        let (status, body) = handle(&mut state, &Method::Post, "/settings", &update);
        assert_eq!(status, 200);
        assert_eq!(body["success"], true);
        assert_eq!(state.settings.language, "Lithuanian");
    }

    #[test]
    fn unknown_routes_are_not_found() {
        let mut state = StubState::default();
        let (status, _) = handle(&mut state, &Method::Get, "/nope", "");
        assert_eq!(status, 404);
        let (status, _) = handle(&mut state, &Method::Delete, "/profile", "");
        assert_eq!(status, 404);
    }
}
