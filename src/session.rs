// Server-side login sessions keyed by an opaque token carried in a signed cookie.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Name of the session cookie.
pub const COOKIE_NAME: &str = "dockboard.sid";

/// Longest session lifetime a store will hand out.
pub const MAX_SESSION_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Copy)]
struct SessionEntry {
    authenticated: bool,
    expires_at: Instant,
}

pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    ttl: Duration,
}

impl SessionStore {
    /// `ttl` is capped at [`MAX_SESSION_TTL`].
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: ttl.min(MAX_SESSION_TTL),
        }
    }

    /// Start an authenticated session and return its token.
    pub async fn create(&self) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let now = Instant::now();
        let entry = SessionEntry {
            authenticated: true,
            // An unrepresentable expiry fails closed.
            expires_at: now.checked_add(self.ttl).unwrap_or(now),
        };
        self.sessions.write().await.insert(token.clone(), entry);
        token
    }

    pub async fn is_authenticated(&self, token: &str) -> bool {
        self.sessions
            .read()
            .await
            .get(token)
            .is_some_and(|e| e.authenticated && e.expires_at > Instant::now())
    }

    pub async fn destroy(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    /// Drop expired sessions; returns how many were removed.
    pub async fn prune_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, e| e.expires_at > now);
        before - sessions.len()
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

/// Periodically prunes expired sessions until `shutdown_rx` fires.
pub fn spawn_pruner(
    store: Arc<SessionStore>,
    every: Duration,
    mut shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(every);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let removed = store.prune_expired().await;
                    if removed > 0 {
                        let remaining = store.len().await;
                        tracing::debug!(removed, remaining, "pruned expired sessions");
                    }
                }
                _ = &mut shutdown_rx => break,
            }
        }
        tracing::debug!("Session pruner shutting down");
    })
}

fn keyed_mac(secret: &str, token: &str) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC takes keys of any length");
    mac.update(token.as_bytes());
    mac
}

/// Cookie value for `token`: `token.hex(HMAC-SHA256(secret, token))`.
pub fn sign(secret: &str, token: &str) -> String {
    let tag = keyed_mac(secret, token).finalize().into_bytes();
    format!("{}.{}", token, hex::encode(tag))
}

/// Token from a signed cookie value, or `None` if the signature does not match.
pub fn verify<'a>(secret: &str, value: &'a str) -> Option<&'a str> {
    let (token, sig) = value.rsplit_once('.')?;
    let tag = hex::decode(sig).ok()?;
    // verify_slice compares in constant time.
    keyed_mac(secret, token).verify_slice(&tag).ok()?;
    Some(token)
}

/// Session token from a `Cookie` request header, verified against `secret`.
pub fn token_from_cookie_header<'a>(header: &'a str, secret: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == COOKIE_NAME)
        .and_then(|(_, value)| verify(secret, value))
}

/// `Set-Cookie` value establishing the session.
pub fn set_cookie(secret: &str, token: &str, ttl: Duration) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        COOKIE_NAME,
        sign(secret, token),
        ttl.as_secs()
    )
}

/// `Set-Cookie` value removing the session cookie.
pub fn clear_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", COOKIE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[tokio::test]
    async fn created_session_is_authenticated_until_destroyed() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create().await;
        assert!(store.is_authenticated(&token).await);
        assert!(!store.is_authenticated("nope").await);
        store.destroy(&token).await;
        assert!(!store.is_authenticated(&token).await);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn expired_session_is_rejected_and_pruned() {
        let store = SessionStore::new(Duration::ZERO);
        let token = store.create().await;
        assert!(!store.is_authenticated(&token).await);
        assert_eq!(store.prune_expired().await, 1);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn tokens_are_unique() {
        let store = SessionStore::new(Duration::from_secs(60));
        let a = store.create().await;
        let b = store.create().await;
        assert_ne!(a, b);
        assert_eq!(store.len().await, 2);
    }

    #[test]
    fn signed_value_verifies_with_same_secret_only() {
        let value = sign(SECRET, "tok");
        assert_eq!(verify(SECRET, &value), Some("tok"));
        assert_eq!(verify("another-secret-another-secret-xx", &value), None);
        assert_eq!(verify(SECRET, "tok"), None);
        assert_eq!(verify(SECRET, "tok.deadbeef"), None);
        assert_eq!(verify(SECRET, "tok.not-hex"), None);
    }

    #[test]
    fn signature_is_hmac_sha256() {
        // RFC 4231 test case 2.
        let value = sign("Jefe", "what do ya want for nothing?");
        assert_eq!(
            value,
            "what do ya want for nothing?.\
             5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[tokio::test]
    async fn oversized_ttl_is_capped() {
        let store = SessionStore::new(Duration::MAX);
        assert_eq!(store.ttl(), MAX_SESSION_TTL);
        let token = store.create().await;
        assert!(store.is_authenticated(&token).await);
    }

    #[test]
    fn cookie_header_parsing() {
        let header = format!("theme=dark; {}={}; other=1", COOKIE_NAME, sign(SECRET, "abc"));
        assert_eq!(token_from_cookie_header(&header, SECRET), Some("abc"));
        assert_eq!(token_from_cookie_header("theme=dark", SECRET), None);
    }

    #[test]
    fn set_cookie_carries_flags() {
        let c = set_cookie(SECRET, "abc", Duration::from_secs(3600));
        assert!(c.starts_with("dockboard.sid=abc."));
        assert!(c.contains("HttpOnly"));
        assert!(c.contains("Max-Age=3600"));
        assert!(clear_cookie().contains("Max-Age=0"));
    }
}
