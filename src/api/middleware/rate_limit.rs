use std::{
    collections::HashMap,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::{AppError, Result};

/// Fixed-window request counter, keyed by client IP. One instance per route
/// group (general API, auth, resource creation), shared across requests.
#[derive(Clone)]
pub struct RateLimiter {
    max: u32,
    window: Duration,
    message: &'static str,
    enabled: bool,
    hits: Arc<Mutex<HashMap<IpAddr, Window>>>,
}

struct Window {
    started_at: Instant,
    count: u32,
}

impl RateLimiter {
    pub fn new(max: u32, window: Duration, message: &'static str, enabled: bool) -> Self {
        Self {
            max,
            window,
            message,
            enabled,
            hits: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Records a hit for `ip` and reports whether it is still within budget.
    pub fn check(&self, ip: IpAddr) -> bool {
        if !self.enabled {
            return true;
        }

        let now = Instant::now();
        let mut hits = self.hits.lock().expect("rate limiter lock poisoned");

        let window = hits.entry(ip).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if now.duration_since(window.started_at) >= self.window {
            window.started_at = now;
            window.count = 0;
        }

        window.count += 1;
        window.count <= self.max
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if !limiter.check(ip) {
        tracing::warn!(target: "security", %ip, "Rate limit exceeded");
        return Err(AppError::TooManyRequests(limiter.message().to_string()));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_after_window_budget_is_spent() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60), "slow down", true);
        let ip = IpAddr::V4(Ipv4Addr::LOCALHOST);

        assert!(limiter.check(ip));
        assert!(limiter.check(ip));
        assert!(limiter.check(ip));
        assert!(!limiter.check(ip));
    }

    #[test]
    fn counters_are_per_ip() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60), "slow down", true);
        let a = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let b = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

        assert!(limiter.check(a));
        assert!(!limiter.check(a));
        assert!(limiter.check(b));
    }

    #[test]
    fn disabled_limiter_always_passes() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60), "slow down", false);
        let ip = IpAddr::V4(Ipv4Addr::LOCALHOST);

        for _ in 0..10 {
            assert!(limiter.check(ip));
        }
    }
}
