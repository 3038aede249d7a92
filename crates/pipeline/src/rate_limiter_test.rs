//! Tests for the reconnect gate

use super::*;
use crate::clock::ManualClock;

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

fn policy() -> BackoffPolicy {
    BackoffPolicy {
        delay_base: secs(1),
        delay_mult: 2.0,
        delay_max: secs(4),
        ok_duration: secs(60),
    }
}

#[tokio::test]
async fn test_first_reconnect_sleeps_base_delay() {
    let clock = ManualClock::new();
    let shutdown = ShutdownFlag::new();
    let mut limiter = RateLimiter::new(policy(), 10, secs(3600));

    limiter.record_attempt(clock.now());
    let decision = limiter.await_reconnect(&clock, &shutdown).await;

    assert_eq!(decision, ReconnectDecision::Proceed);
    assert_eq!(clock.elapsed(), secs(1));
    assert_eq!(limiter.current_delay(), secs(2));
}

#[tokio::test]
async fn test_sleep_is_sliced() {
    let clock = ManualClock::new();
    let shutdown = ShutdownFlag::new();
    let mut limiter = RateLimiter::new(policy(), 10, secs(3600));

    limiter.record_attempt(clock.now());
    limiter.await_reconnect(&clock, &shutdown).await;

    let sleeps = clock.sleeps();
    assert_eq!(sleeps.len(), 4);
    assert!(sleeps.iter().all(|s| *s <= SHUTDOWN_POLL_INTERVAL));
}

#[tokio::test]
async fn test_delays_grow_across_quick_failures() {
    let clock = ManualClock::new();
    let shutdown = ShutdownFlag::new();
    let mut limiter = RateLimiter::new(policy(), 100, secs(3600));
    let mut delays = Vec::new();

    for _ in 0..5 {
        limiter.record_attempt(clock.now());
        let before = clock.elapsed();
        assert_eq!(
            limiter.await_reconnect(&clock, &shutdown).await,
            ReconnectDecision::Proceed
        );
        delays.push(clock.elapsed() - before);
    }

    assert_eq!(delays, vec![secs(1), secs(2), secs(4), secs(4), secs(4)]);
}

#[tokio::test]
async fn test_stable_connection_resets_delay() {
    let clock = ManualClock::new();
    let shutdown = ShutdownFlag::new();
    let mut limiter = RateLimiter::new(policy(), 100, secs(3600));

    for _ in 0..3 {
        limiter.record_attempt(clock.now());
        limiter.await_reconnect(&clock, &shutdown).await;
    }
    assert_eq!(limiter.current_delay(), secs(4));

    // connection stays up past ok_duration
    limiter.record_attempt(clock.now());
    clock.advance(secs(61));

    let before = clock.elapsed();
    limiter.await_reconnect(&clock, &shutdown).await;
    assert_eq!(clock.elapsed() - before, secs(1));
}

#[tokio::test]
async fn test_veto_when_log_full_inside_window() {
    let clock = ManualClock::new();
    let shutdown = ShutdownFlag::new();
    let mut limiter = RateLimiter::new(policy(), 3, secs(60));

    for _ in 0..3 {
        limiter.record_attempt(clock.now());
        clock.advance(secs(5));
    }

    let decision = limiter.await_reconnect(&clock, &shutdown).await;
    assert_eq!(
        decision,
        ReconnectDecision::Vetoed {
            attempts: 3,
            window: secs(60)
        }
    );
    // vetoed without sleeping
    assert!(clock.sleeps().is_empty());
}

#[tokio::test]
async fn test_shutdown_during_sleep() {
    let clock = ManualClock::new();
    let shutdown = ShutdownFlag::new();
    let mut limiter = RateLimiter::new(
        BackoffPolicy {
            delay_base: secs(30),
            delay_max: secs(60),
            ..policy()
        },
        10,
        secs(3600),
    );
    clock.shutdown_at(secs(2), shutdown.clone());

    limiter.record_attempt(clock.now());
    let decision = limiter.await_reconnect(&clock, &shutdown).await;

    assert_eq!(decision, ReconnectDecision::Shutdown);
    // noticed within one poll slice of the request
    assert!(clock.elapsed() <= secs(2) + SHUTDOWN_POLL_INTERVAL);
    assert_eq!(limiter.current_delay(), secs(30));
}

#[tokio::test]
async fn test_shutdown_already_set() {
    let clock = ManualClock::new();
    let shutdown = ShutdownFlag::new();
    shutdown.trigger();
    let mut limiter = RateLimiter::new(policy(), 10, secs(3600));

    limiter.record_attempt(clock.now());
    assert_eq!(
        limiter.await_reconnect(&clock, &shutdown).await,
        ReconnectDecision::Shutdown
    );
    assert!(clock.sleeps().is_empty());
}
