use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, State};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;

/// Entries beyond this many trigger a sweep of finished windows.
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter per client address.
///
/// State is process-local; every replica enforces its own window.
#[derive(Clone)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Arc<Mutex<HashMap<IpAddr, Window>>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        RateLimiter {
            max_requests,
            window,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Count one request against `addr`. Returns false once the window is full.
    pub fn try_acquire(&self, addr: IpAddr) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap();

        if windows.len() > PRUNE_THRESHOLD {
            let window = self.window;
            windows.retain(|_, w| now.duration_since(w.started) < window);
        }

        let window = windows.entry(addr).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(window.started) >= self.window {
            window.started = now;
            window.count = 0;
        }

        if window.count >= self.max_requests {
            return false;
        }
        window.count += 1;
        true
    }
}

/// Middleware rejecting clients that exceed the request budget.
pub async fn throttle<B>(
    State(limiter): State<RateLimiter>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<B>,
    next: Next<B>,
) -> Result<Response, ApiError> {
    if !limiter.try_acquire(addr.ip()) {
        return Err(ApiError::RateLimited);
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(n: u8) -> IpAddr {
        IpAddr::from([127, 0, 0, n])
    }

    #[test]
    fn allows_up_to_the_budget_then_refuses() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));

        assert!(limiter.try_acquire(client(1)));
        assert!(limiter.try_acquire(client(1)));
        assert!(limiter.try_acquire(client(1)));
        assert!(!limiter.try_acquire(client(1)));
        assert!(!limiter.try_acquire(client(1)));
    }

    #[test]
    fn budgets_are_per_client() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));

        assert!(limiter.try_acquire(client(1)));
        assert!(!limiter.try_acquire(client(1)));
        assert!(limiter.try_acquire(client(2)));
    }

    #[test]
    fn window_rollover_resets_the_count() {
        let limiter = RateLimiter::new(1, Duration::from_millis(20));

        assert!(limiter.try_acquire(client(1)));
        assert!(!limiter.try_acquire(client(1)));

        std::thread::sleep(Duration::from_millis(25));
        assert!(limiter.try_acquire(client(1)));
    }
}
