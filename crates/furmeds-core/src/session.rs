//! Session and preference context
//!
//! [`SessionContext`] is the one place the signed-in credential, the
//! language and the theme live. It is loaded once at start-up and writes
//! every change straight through to [`Storage`]. Components that need it
//! (the API client, the auth service) receive a clone.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{FurMedsError, ValidationError};
use crate::storage::Storage;

const SESSION_KEY: &str = "user";
const LANGUAGE_KEY: &str = "language";
const THEME_KEY: &str = "theme";

/// Signed-in user as returned by the authentication provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_uid: String,
    pub email: String,
    /// Bearer credential sent to the backend
    pub id_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix timestamp after which the token is rejected
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl Session {
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    De,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::De];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::De => "German",
        }
    }

    pub fn shorthand(&self) -> &'static str {
        match self {
            Language::En => "ENG",
            Language::De => "GER",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|l| {
                let s = s.trim();
                s.eq_ignore_ascii_case(l.code())
                    || s.eq_ignore_ascii_case(l.name())
                    || s.eq_ignore_ascii_case(l.shorthand())
            })
            .ok_or_else(|| ValidationError::InvalidChoice {
                field: "language",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the device preference
    #[default]
    System,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        };
        f.write_str(s)
    }
}

impl FromStr for Theme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            _ => Err(ValidationError::InvalidChoice {
                field: "theme",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    session: Option<Session>,
    language: Language,
    theme: Theme,
}

/// Shared session and preference context
#[derive(Clone)]
pub struct SessionContext {
    storage: Option<Storage>,
    state: Arc<RwLock<SessionState>>,
}

impl SessionContext {
    /// Load the persisted session and preferences.
    pub fn load(storage: Storage) -> Result<Self, FurMedsError> {
        let state = SessionState {
            session: storage.get(SESSION_KEY)?,
            language: storage.get(LANGUAGE_KEY)?.unwrap_or_default(),
            theme: storage.get(THEME_KEY)?.unwrap_or_default(),
        };
        info!(
            signed_in = state.session.is_some(),
            language = state.language.code(),
            theme = %state.theme,
            "Loaded session context"
        );

        Ok(Self {
            storage: Some(storage),
            state: Arc::new(RwLock::new(state)),
        })
    }

    /// Context that is never persisted
    pub fn ephemeral() -> Self {
        Self {
            storage: None,
            state: Arc::new(RwLock::new(SessionState::default())),
        }
    }

    pub fn session(&self) -> Option<Session> {
        self.state.read().session.clone()
    }

    /// Bearer credential for backend requests, if signed in
    pub fn access_token(&self) -> Option<String> {
        self.state.read().session.as_ref().map(|s| s.id_token.clone())
    }

    pub fn user_uid(&self) -> Option<String> {
        self.state.read().session.as_ref().map(|s| s.user_uid.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.state.read().session.is_some()
    }

    pub fn set_session(&self, session: Session) -> Result<(), FurMedsError> {
        if let Some(storage) = &self.storage {
            storage.put(SESSION_KEY, &session)?;
        }
        debug!(user_uid = %session.user_uid, "Session stored");
        self.state.write().session = Some(session);
        Ok(())
    }

    pub fn clear_session(&self) -> Result<(), FurMedsError> {
        if let Some(storage) = &self.storage {
            storage.remove(SESSION_KEY)?;
        }
        debug!("Session cleared");
        self.state.write().session = None;
        Ok(())
    }

    pub fn language(&self) -> Language {
        self.state.read().language
    }

    pub fn set_language(&self, language: Language) -> Result<(), FurMedsError> {
        if let Some(storage) = &self.storage {
            storage.put(LANGUAGE_KEY, &language)?;
        }
        self.state.write().language = language;
        Ok(())
    }

    pub fn theme(&self) -> Theme {
        self.state.read().theme
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), FurMedsError> {
        if let Some(storage) = &self.storage {
            storage.put(THEME_KEY, &theme)?;
        }
        self.state.write().theme = theme;
        Ok(())
    }
}
