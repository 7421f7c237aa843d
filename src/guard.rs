//! Response guard: reports failed API calls and signs the user out on 401.

use axum::{body::Bytes, http::StatusCode};
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    navigation::Navigator,
    notify::{Notification, Notifier},
    routes::RouteName,
    session::SessionStore,
};

/// The parts of an HTTP response the guard looks at.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub status_text: String,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body: body.into(),
        }
    }

    pub fn with_status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = text.into();
        self
    }

    /// Reads the whole body. A body that fails to arrive is treated as empty,
    /// which the guard then reports with the status text.
    pub async fn from_reqwest(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.bytes().await.unwrap_or_else(|e| {
            debug!("error response body unreadable: {}", e);
            Bytes::new()
        });
        Self::new(status, body)
    }

    pub fn parse_body(&self) -> ParsedBody {
        match serde_json::from_slice(&self.body) {
            Ok(value) => ParsedBody::Json(value),
            Err(_) => ParsedBody::Unparseable,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedBody {
    Json(Value),
    Unparseable,
}

impl ParsedBody {
    /// The `message` field of an object body, if it carries one. A `null`
    /// message is present but empty.
    pub fn message(&self) -> Option<String> {
        let ParsedBody::Json(Value::Object(map)) = self else {
            return None;
        };
        match map.get("message")? {
            Value::Null => Some(String::new()),
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// What the guard did with one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardOutcome {
    pub notification: Notification,
    pub redirected: bool,
}

pub struct ResponseGuard<N, V> {
    session: SessionStore,
    notifier: N,
    navigator: V,
}

impl<N: Notifier, V: Navigator> ResponseGuard<N, V> {
    pub fn new(session: SessionStore, notifier: N, navigator: V) -> Self {
        Self {
            session,
            notifier,
            navigator,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Emits one error notification for `response`. On 401 the session is
    /// cleared and the console is sent to the login page, whatever the body.
    pub fn handle(&self, response: &ApiResponse) -> GuardOutcome {
        let message = match response.parse_body().message() {
            Some(message) => message,
            None if response.status_text.is_empty() => response
                .status
                .canonical_reason()
                .unwrap_or_default()
                .to_string(),
            None => response.status_text.clone(),
        };

        let notification = Notification::error(response.status.as_u16(), message);
        self.notifier.notify(notification.clone());

        let redirected = response.status == StatusCode::UNAUTHORIZED;
        if redirected {
            info!("unauthorized response, signing out");
            self.session.reset();
            self.navigator.push(RouteName::Login);
        }

        GuardOutcome {
            notification,
            redirected,
        }
    }

    pub async fn handle_reqwest(&self, response: reqwest::Response) -> GuardOutcome {
        let response = ApiResponse::from_reqwest(response).await;
        self.handle(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Identity, Session};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        notes: Mutex<Vec<Notification>>,
        pushes: Mutex<Vec<RouteName>>,
    }

    impl Notifier for Recorder {
        fn notify(&self, n: Notification) {
            self.notes.lock().unwrap().push(n);
        }
    }

    impl Navigator for Recorder {
        fn push(&self, route: RouteName) {
            self.pushes.lock().unwrap().push(route);
        }
    }

    fn guard() -> (ResponseGuard<Arc<Recorder>, Arc<Recorder>>, Arc<Recorder>) {
        let rec = Arc::new(Recorder::default());
        let session = SessionStore::new();
        session.set(Identity {
            name: "alice".into(),
            is_admin: false,
            email: "a@x.io".into(),
        });
        (ResponseGuard::new(session, rec.clone(), rec.clone()), rec)
    }

    #[test]
    fn test_unauthorized_with_garbage_body() {
        let (guard, rec) = guard();
        let resp = ApiResponse::new(StatusCode::UNAUTHORIZED, "<html>nope")
            .with_status_text("Unauthorized");

        let outcome = guard.handle(&resp);

        assert_eq!(outcome.notification, Notification::error(401, "Unauthorized"));
        assert!(outcome.redirected);
        assert_eq!(guard.session().snapshot(), Session::default());
        assert_eq!(*rec.pushes.lock().unwrap(), vec![RouteName::Login]);
        assert_eq!(rec.notes.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_unauthorized_with_message_body() {
        let (guard, rec) = guard();
        let resp = ApiResponse::new(StatusCode::UNAUTHORIZED, r#"{"message":"session expired"}"#);

        let outcome = guard.handle(&resp);

        assert_eq!(outcome.notification.message, "session expired");
        assert!(!guard.session().is_authenticated());
        assert_eq!(rec.pushes.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_server_error_uses_body_message() {
        let (guard, rec) = guard();
        let before = guard.session().snapshot();
        let resp = ApiResponse::new(StatusCode::INTERNAL_SERVER_ERROR, r#"{"message":"db down"}"#)
            .with_status_text("Server Error");

        let outcome = guard.handle(&resp);

        assert_eq!(outcome.notification, Notification::error(500, "db down"));
        assert!(!outcome.redirected);
        assert_eq!(guard.session().snapshot(), before);
        assert!(rec.pushes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_falls_back_to_status_text() {
        let (guard, _) = guard();
        for body in ["", "not json", r#"{"error":"x"}"#, r#"["message"]"#] {
            let resp = ApiResponse::new(StatusCode::BAD_REQUEST, body).with_status_text("Bad Thing");
            assert_eq!(guard.handle(&resp).notification.message, "Bad Thing", "body {body:?}");
        }
    }

    #[test]
    fn test_empty_status_text_uses_reason_phrase() {
        let (guard, _) = guard();
        let resp = ApiResponse::new(StatusCode::NOT_FOUND, "").with_status_text("");
        assert_eq!(guard.handle(&resp).notification.message, "Not Found");
    }

    #[test]
    fn test_null_message_is_empty() {
        let (guard, _) = guard();
        let resp = ApiResponse::new(StatusCode::BAD_REQUEST, r#"{"message":null}"#)
            .with_status_text("Bad Thing");
        assert_eq!(guard.handle(&resp).notification.message, "");
    }

    #[test]
    fn test_non_string_message_rendered() {
        let (guard, _) = guard();
        let resp = ApiResponse::new(StatusCode::BAD_REQUEST, r#"{"message":{"field":"email"}}"#);
        assert_eq!(guard.handle(&resp).notification.message, r#"{"field":"email"}"#);
    }

    #[test]
    fn test_repeated_unauthorized_is_idempotent() {
        let (guard, rec) = guard();
        let resp = ApiResponse::new(StatusCode::UNAUTHORIZED, "");
        guard.handle(&resp);
        guard.handle(&resp);
        assert!(guard.session().snapshot().is_empty());
        assert_eq!(rec.pushes.lock().unwrap().len(), 2);
    }
}
