//! Transient status-line messages (save confirmations, parse warnings,
//! clipboard errors) shown for a few seconds and then cleared.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub expires_at_ms: u64,
}

impl StatusMessage {
    pub fn new(text: impl Into<String>, level: StatusLevel, now_ms: u64, ttl_ms: u64) -> Self {
        Self { text: text.into(), level, expires_at_ms: now_ms.saturating_add(ttl_ms) }
    }

    pub fn info(text: impl Into<String>, now_ms: u64) -> Self {
        Self::new(text, StatusLevel::Info, now_ms, 3_000)
    }

    pub fn warn(text: impl Into<String>, now_ms: u64) -> Self {
        Self::new(text, StatusLevel::Warn, now_ms, 5_000)
    }

    pub fn error(text: impl Into<String>, now_ms: u64) -> Self {
        Self::new(text, StatusLevel::Error, now_ms, 6_000)
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_expires_after_ttl() {
        let m = StatusMessage::info("saved", 1_000);
        assert!(!m.is_expired(3_500));
        assert!(m.is_expired(4_000));
    }

    #[test]
    fn error_has_longer_ttl_than_info() {
        let info = StatusMessage::info("x", 0);
        let err = StatusMessage::error("x", 0);
        assert!(err.expires_at_ms > info.expires_at_ms);
    }
}
