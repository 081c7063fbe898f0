//! Session lifecycle: registration, the end-of-session report, demo seeding
//! and the event records sent while a session is open.

use std::time::Duration;

use podwave_proto::client::ApiClient;
use podwave_proto::protocol::{EpisodeId, EventRecord, EventType, SessionReport};
use tracing::{debug, info};

use crate::app_state::{AppState, Session, User};
use crate::error::PodwaveError;

pub const DEMO_USERS: [&str; 3] = ["Ana Garcia", "Carlos Lopez", "Maria Fernandez"];
pub const DEMO_DNI: &str = "00000000X";

/// Trim both fields; either one empty is a validation failure.
pub fn validate_registration(name: &str, dni: &str) -> Result<(String, String), PodwaveError> {
    let name = name.trim();
    let dni = dni.trim();
    if name.is_empty() || dni.is_empty() {
        return Err(PodwaveError::Validation("Name and ID are required"));
    }
    Ok((name.to_string(), dni.to_string()))
}

/// Register a user and open a session for them.
pub async fn register(client: &ApiClient, name: &str, dni: &str) -> Result<(User, Session), PodwaveError> {
    let registered = client.register(name, dni).await?;
    let user = User {
        id: registered.user_id,
        name: registered.name,
    };
    let started = client.start_session(user.id).await?;
    info!("session {} opened for user {}", started.session_id, user.id);
    Ok((
        user,
        Session {
            id: started.session_id,
        },
    ))
}

pub async fn end_session(client: &ApiClient, report: &SessionReport) -> Result<(), PodwaveError> {
    client.end_session(report).await?;
    info!("session {} closed", report.session_id);
    Ok(())
}

/// Quit-time report: bounded by `grace`, every failure discarded.
pub async fn flush_on_exit(client: &ApiClient, report: Option<SessionReport>, grace: Duration) {
    let Some(report) = report else {
        return;
    };
    match tokio::time::timeout(grace, client.end_session(&report)).await {
        Ok(Ok(())) => debug!("exit report for session {} delivered", report.session_id),
        Ok(Err(e)) => debug!("exit report dropped: {}", e),
        Err(_) => debug!("exit report dropped after {:?}", grace),
    }
}

/// Register each demo user and open a session for them. Failures are
/// skipped; returns how many users got a session.
pub async fn seed_demo_users(client: &ApiClient) -> usize {
    let mut seeded = 0;
    for name in DEMO_USERS {
        let result = async {
            let user = client.register(name, DEMO_DNI).await?;
            client.start_session(user.user_id).await
        }
        .await;
        match result {
            Ok(_) => seeded += 1,
            Err(e) => debug!("seed {}: {}", name, e),
        }
    }
    seeded
}

/// Event for the open session, or `None` when there is no session.
pub fn event_record(
    state: &AppState,
    event_type: EventType,
    episode_id: Option<EpisodeId>,
    payload: serde_json::Value,
) -> Option<EventRecord> {
    let session = state.session?;
    Some(EventRecord {
        session_id: session.id,
        event_type,
        episode_id,
        screen_name: state.active_screen.name().to_string(),
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use podwave_proto::protocol::SessionId;
    use serde_json::json;
    use tokio::sync::mpsc;

    #[test]
    fn test_validation_trims_fields() {
        assert_eq!(
            validate_registration("  Ana ", " 123X ").unwrap(),
            ("Ana".to_string(), "123X".to_string())
        );
        assert!(matches!(
            validate_registration("   ", "123X"),
            Err(PodwaveError::Validation(_))
        ));
        assert!(matches!(
            validate_registration("Ana", ""),
            Err(PodwaveError::Validation(_))
        ));
    }

    #[test]
    fn test_no_event_without_session() {
        let (tx, _rx) = mpsc::channel(1);
        let mut state = AppState::new(Vec::new(), Theme::Dark, tx);
        assert!(event_record(&state, EventType::ScreenView, None, json!({})).is_none());

        state.session = Some(Session { id: SessionId(4) });
        let ev = event_record(&state, EventType::PlayEpisode, Some(EpisodeId(2)), json!({"episodeId": 2}))
            .unwrap();
        assert_eq!(ev.session_id, SessionId(4));
        assert_eq!(ev.screen_name, "home");
        assert_eq!(ev.episode_id, Some(EpisodeId(2)));
    }
}
