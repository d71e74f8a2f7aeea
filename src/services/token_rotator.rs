use std::sync::{Mutex, PoisonError};
use chrono::{DateTime, Duration, Utc};
use crate::config::constants::GITHUB_DEFAULT_RATE_LIMIT;

#[derive(Debug, Clone)]
struct TokenState {
    token: String,
    remaining: u32,
    reset_at: Option<DateTime<Utc>>,
    last_used: Option<DateTime<Utc>>,
    blocked: bool,
}

/// Spreads GitHub requests over several tokens, preferring the one with the most quota left.
pub struct TokenRotator {
    tokens: Mutex<Vec<TokenState>>,
}

impl TokenRotator {
    pub fn new(tokens: Vec<String>) -> Self {
        let states: Vec<TokenState> = tokens
            .into_iter()
            .filter(|t| !t.trim().is_empty())
            .map(|token| TokenState {
                token,
                remaining: GITHUB_DEFAULT_RATE_LIMIT,
                reset_at: None,
                last_used: None,
                blocked: false,
            })
            .collect();

        if states.is_empty() {
            log::warn!("⚠️ No GitHub tokens configured - unauthenticated rate limits apply");
        } else {
            log::info!("🔑 Token rotator initialized with {} tokens", states.len());
        }

        Self { tokens: Mutex::new(states) }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.lock().unwrap_or_else(PoisonError::into_inner).is_empty()
    }

    pub fn next_token(&self) -> Option<String> {
        self.next_token_at(Utc::now())
    }

    pub(crate) fn next_token_at(&self, now: DateTime<Utc>) -> Option<String> {
        let mut tokens = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);

        for state in tokens.iter_mut() {
            if state.reset_at.is_some_and(|reset| now >= reset) {
                state.remaining = GITHUB_DEFAULT_RATE_LIMIT;
                state.reset_at = None;
                if state.blocked {
                    log::info!("🔓 Rate limit reset for token ending in ...{}", suffix(&state.token));
                }
                state.blocked = false;
            }
        }

        // Idle tokens get up to 100 bonus points so load spreads even when quotas are equal.
        let priority = |state: &TokenState| {
            let idle_bonus = state
                .last_used
                .map_or(100, |used| (now - used).num_minutes().clamp(0, 100));
            i64::from(state.remaining) + idle_bonus
        };

        let best = tokens
            .iter_mut()
            .filter(|state| !state.blocked)
            .max_by_key(|state| priority(&**state))?;

        best.last_used = Some(now);
        log::debug!("Selected token ending in ...{} ({} remaining)", suffix(&best.token), best.remaining);
        Some(best.token.clone())
    }

    /// Feeds back the `x-ratelimit-*` headers of a response made with `token`.
    pub fn record_rate_limit(&self, token: &str, remaining: u32, reset_at: Option<DateTime<Utc>>) {
        let mut tokens = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(state) = tokens.iter_mut().find(|s| s.token == token) {
            state.remaining = remaining;
            state.reset_at = reset_at.or(state.reset_at);
            if remaining == 0 {
                state.blocked = true;
                log::warn!("⛔ Token ending in ...{} exhausted", suffix(token));
            }
        }
    }

    /// Blocks `token` until `reset_at` (one hour when GitHub did not say).
    pub fn mark_exhausted(&self, token: &str, reset_at: Option<DateTime<Utc>>) {
        let mut tokens = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(state) = tokens.iter_mut().find(|s| s.token == token) {
            state.remaining = 0;
            state.blocked = true;
            state.reset_at = Some(reset_at.unwrap_or_else(|| Utc::now() + Duration::hours(1)));
            log::warn!("⛔ Token ending in ...{} rate limited", suffix(token));
        }
    }

    /// Sum of remaining requests over unblocked tokens, and the total token count.
    pub fn total_capacity(&self) -> (u32, usize) {
        let tokens = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        let remaining = tokens
            .iter()
            .filter(|s| !s.blocked)
            .map(|s| s.remaining)
            .sum();
        (remaining, tokens.len())
    }
}

fn suffix(token: &str) -> &str {
    let start = token.len().saturating_sub(4);
    token.get(start..).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotator() -> TokenRotator {
        TokenRotator::new(vec!["ghp_aaaa".to_string(), "ghp_bbbb".to_string()])
    }

    #[test]
    fn prefers_token_with_most_quota() {
        let rotator = rotator();
        rotator.record_rate_limit("ghp_aaaa", 10, None);
        assert_eq!(rotator.next_token().as_deref(), Some("ghp_bbbb"));
    }

    #[test]
    fn skips_blocked_tokens_until_reset() {
        let rotator = rotator();
        let now = Utc::now();
        rotator.mark_exhausted("ghp_bbbb", Some(now + Duration::minutes(30)));

        assert_eq!(rotator.next_token_at(now).as_deref(), Some("ghp_aaaa"));
        rotator.mark_exhausted("ghp_aaaa", Some(now + Duration::minutes(60)));
        assert_eq!(rotator.next_token_at(now), None);

        assert_eq!(rotator.next_token_at(now + Duration::minutes(31)).as_deref(), Some("ghp_bbbb"));
    }

    #[test]
    fn zero_remaining_blocks_the_token() {
        let rotator = rotator();
        rotator.record_rate_limit("ghp_aaaa", 0, Some(Utc::now() + Duration::minutes(5)));
        assert_eq!(rotator.total_capacity(), (GITHUB_DEFAULT_RATE_LIMIT, 2));
    }

    #[test]
    fn empty_rotator_has_nothing_to_offer() {
        let rotator = TokenRotator::new(vec![" ".to_string()]);
        assert!(rotator.is_empty());
        assert_eq!(rotator.next_token(), None);
    }

    #[test]
    fn suffix_handles_short_tokens() {
        assert_eq!(suffix("abc"), "abc");
        assert_eq!(suffix("ghp_123456"), "3456");
    }
}
