//! Small per-user settings kept next to the collections: the color theme
//! and the signed-in session.

use crate::error::{HireError, Result};
use crate::store::keys;
use crate::store::tiered::{TierKind, TieredStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = HireError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(HireError::Store(format!("Unknown theme: {}", other))),
        }
    }
}

/// Stored theme; anything unreadable counts as light.
pub fn load_theme(kv: &TieredStore) -> Theme {
    kv.get(keys::THEME)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default()
}

pub fn save_theme(kv: &TieredStore, theme: Theme) -> bool {
    kv.set(keys::THEME, theme.as_str())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub email: String,
    pub name: String,
    pub role: String,
    pub login_time: DateTime<Utc>,
}

/// Store the session in the session tier, or in the durable tier when the
/// user asked to be remembered. The other tier's copy is removed.
pub fn save_session(kv: &TieredStore, session: &AuthSession, remember: bool) -> Result<bool> {
    let raw = serde_json::to_string(session)?;
    let (target, other) = if remember {
        (TierKind::Durable, TierKind::Session)
    } else {
        (TierKind::Session, TierKind::Durable)
    };
    kv.remove_in(other, keys::AUTH_SESSION);
    if kv.set_in(target, keys::AUTH_SESSION, &raw) {
        return Ok(true);
    }
    warn!(tier = %target, "session tier unavailable, keeping session in memory");
    Ok(kv.set_in(TierKind::Memory, keys::AUTH_SESSION, &raw))
}

/// The current session: session tier first, then durable, then memory.
pub fn load_session(kv: &TieredStore) -> Option<AuthSession> {
    [TierKind::Session, TierKind::Durable, TierKind::Memory]
        .into_iter()
        .filter_map(|tier| kv.get_in(tier, keys::AUTH_SESSION))
        .find_map(|raw| serde_json::from_str(&raw).ok())
}

pub fn clear_session(kv: &TieredStore) {
    kv.remove(keys::AUTH_SESSION);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::backend::KvBackend;
    use crate::store::mem_backend::MemKvBackend;
    use crate::store::tiered::Tier;

    fn setup() -> (MemKvBackend, MemKvBackend, TieredStore) {
        let durable = MemKvBackend::new();
        let session = MemKvBackend::new();
        let kv = TieredStore::new(vec![
            Tier::new(TierKind::Durable, durable.clone()),
            Tier::new(TierKind::Session, session.clone()),
        ]);
        (durable, session, kv)
    }

    fn session() -> AuthSession {
        AuthSession {
            email: "admin@example.com".to_string(),
            name: "Admin".to_string(),
            role: "admin".to_string(),
            login_time: DateTime::parse_from_rfc3339("2026-03-01T09:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn test_theme_defaults_to_light() {
        let (_d, _s, kv) = setup();
        assert_eq!(load_theme(&kv), Theme::Light);
    }

    #[test]
    fn test_theme_round_trip() {
        let (durable, _s, kv) = setup();
        assert!(save_theme(&kv, Theme::Dark));
        assert_eq!(load_theme(&kv), Theme::Dark);
        assert_eq!(durable.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_unknown_theme_reads_as_light() {
        let (durable, _s, kv) = setup();
        durable.insert_raw("theme", "sepia");
        assert_eq!(load_theme(&kv), Theme::Light);
    }

    #[test]
    fn test_session_goes_to_session_tier_by_default() {
        let (durable, session_tier, kv) = setup();
        save_session(&kv, &session(), false).unwrap();

        assert!(session_tier.get("auth_session").unwrap().is_some());
        assert!(durable.get("auth_session").unwrap().is_none());
        assert_eq!(load_session(&kv), Some(session()));
    }

    #[test]
    fn test_remembered_session_is_durable() {
        let (durable, session_tier, kv) = setup();
        save_session(&kv, &session(), false).unwrap();
        save_session(&kv, &session(), true).unwrap();

        assert!(durable.get("auth_session").unwrap().is_some());
        assert!(session_tier.get("auth_session").unwrap().is_none());
        assert_eq!(load_session(&kv), Some(session()));
    }

    #[test]
    fn test_session_wire_format() {
        let json = serde_json::to_value(session()).unwrap();
        assert_eq!(json["loginTime"], "2026-03-01T09:00:00Z");
        assert_eq!(json["email"], "admin@example.com");
    }

    #[test]
    fn test_clear_session_removes_every_copy() {
        let (durable, session_tier, kv) = setup();
        save_session(&kv, &session(), true).unwrap();
        session_tier.insert_raw("auth_session", "{}");

        clear_session(&kv);

        assert!(durable.get("auth_session").unwrap().is_none());
        assert!(session_tier.get("auth_session").unwrap().is_none());
        assert_eq!(load_session(&kv), None);
    }
}
