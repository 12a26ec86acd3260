//! Admin credential submission, shared by the console prompt and the chat
//! login overlay.

use std::io;

use tracing::{info, warn};

use crate::admin::backend::AdminBackend;
use crate::admin::prompt::ConsoleIo;

pub const INVALID_CREDENTIALS_NOTICE: &str = "Invalid credentials. Please try again.";
pub const LOGIN_FAILED_NOTICE: &str = "Login failed. Please try again.";
pub const MISSING_FIELDS_NOTICE: &str = "Email and password are required.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated,
    Rejected,
    Failed,
}

impl LoginOutcome {
    pub fn notice(self) -> Option<&'static str> {
        match self {
            LoginOutcome::Authenticated => None,
            LoginOutcome::Rejected => Some(INVALID_CREDENTIALS_NOTICE),
            LoginOutcome::Failed => Some(LOGIN_FAILED_NOTICE),
        }
    }
}

pub async fn submit_login<B>(backend: &B, email: &str, password: &str) -> LoginOutcome
where
    B: AdminBackend + ?Sized,
{
    match backend.login(email.trim(), password).await {
        Ok(true) => {
            info!("admin login accepted");
            LoginOutcome::Authenticated
        }
        Ok(false) => LoginOutcome::Rejected,
        Err(err) => {
            warn!(error = %err, "admin login request failed");
            LoginOutcome::Failed
        }
    }
}

/// Prompt until the backend accepts the credentials. Returns `false` when
/// the user cancels either field.
pub async fn login_prompt<B>(
    backend: &B,
    io: &mut dyn ConsoleIo,
    email_hint: Option<&str>,
) -> io::Result<bool>
where
    B: AdminBackend + ?Sized,
{
    let mut email_prefill = email_hint.unwrap_or_default().to_string();
    io.say("Admin login");
    loop {
        let Some(email) = io.read_line("Email: ", &email_prefill)? else {
            return Ok(false);
        };
        let Some(password) = io.read_secret("Password: ")? else {
            return Ok(false);
        };
        if email.trim().is_empty() || password.is_empty() {
            io.say(MISSING_FIELDS_NOTICE);
            continue;
        }

        let outcome = submit_login(backend, &email, &password).await;
        match outcome.notice() {
            None => return Ok(true),
            Some(notice) => {
                io.say(notice);
                email_prefill = email;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::backend::Mutation;
    use crate::admin::prompt::ScriptedIo;
    use crate::api::{ApiError, MutationResponse};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use serde_json::Value;
    use std::sync::Mutex;

    /// Accepts one password; `None` simulates an unreachable backend.
    struct FakeLogin {
        password: Option<&'static str>,
        attempts: Mutex<Vec<(String, String)>>,
    }

    impl FakeLogin {
        fn accepting(password: &'static str) -> Self {
            Self {
                password: Some(password),
                attempts: Mutex::new(Vec::new()),
            }
        }

        fn unreachable() -> Self {
            Self {
                password: None,
                attempts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AdminBackend for FakeLogin {
        async fn fetch(&self, _endpoint: &str) -> Result<Value, ApiError> {
            Ok(Value::Null)
        }

        async fn mutate(&self, _mutation: Mutation) -> Result<MutationResponse, ApiError> {
            Ok(MutationResponse::default())
        }

        async fn login(&self, email: &str, password: &str) -> Result<bool, ApiError> {
            self.attempts
                .lock()
                .unwrap()
                .push((email.to_string(), password.to_string()));
            match self.password {
                Some(expected) => Ok(password == expected),
                None => Err(ApiError::Status {
                    status: StatusCode::BAD_GATEWAY,
                    body: String::new(),
                }),
            }
        }

        async fn logout(&self) -> Result<(), ApiError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn retries_after_invalid_credentials() {
        let backend = FakeLogin::accepting("open-sesame");
        let mut io = ScriptedIo::new(["admin@rex.test", "wrong", "=", "open-sesame"]);

        assert!(login_prompt(&backend, &mut io, None).await.unwrap());
        assert!(io.printed(INVALID_CREDENTIALS_NOTICE));

        let attempts = backend.attempts.lock().unwrap();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[1].0, "admin@rex.test");
    }

    #[tokio::test]
    async fn transport_failure_has_its_own_notice() {
        let backend = FakeLogin::unreachable();
        let mut io = ScriptedIo::new(["admin@rex.test", "pw"]).then_cancel();

        assert!(!login_prompt(&backend, &mut io, None).await.unwrap());
        assert!(io.printed(LOGIN_FAILED_NOTICE));
        assert!(!io.printed(INVALID_CREDENTIALS_NOTICE));
    }

    #[tokio::test]
    async fn blank_fields_are_not_submitted() {
        let backend = FakeLogin::accepting("pw");
        let mut io = ScriptedIo::new(["=", "", "=", "pw"]);

        assert!(login_prompt(&backend, &mut io, Some("admin@rex.test"))
            .await
            .unwrap());
        assert!(io.printed(MISSING_FIELDS_NOTICE));
        assert_eq!(backend.attempts.lock().unwrap().len(), 1);
    }

    #[test]
    fn outcomes_map_to_notices() {
        assert_eq!(LoginOutcome::Authenticated.notice(), None);
        assert_eq!(
            LoginOutcome::Rejected.notice(),
            Some("Invalid credentials. Please try again.")
        );
    }
}
