use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

/// Upper bound for `TOKEN_TTL_MINUTES`: one year.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365;

/// Knobs for the simulated backend behaviour.
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub login_delay: Duration,
    pub register_delay: Duration,
    pub token_ttl_minutes: i64,
    /// Probability in `[0, 1]` that a refresh is answered with "expired".
    pub refresh_failure_rate: f64,
    pub refresh_failure_seed: Option<u64>,
    /// Reject malformed refresh tokens instead of falling back to the first user.
    pub refresh_strict: bool,
    pub expose_debug_routes: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mock: MockConfig,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            login_delay: Duration::from_millis(1000),
            register_delay: Duration::from_millis(1500),
            token_ttl_minutes: 60,
            refresh_failure_rate: 0.2,
            refresh_failure_seed: None,
            refresh_strict: false,
            expose_debug_routes: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = MockConfig::default();
        let mock = MockConfig {
            login_delay: Duration::from_millis(env_or(
                "LOGIN_DELAY_MS",
                defaults.login_delay.as_millis() as u64,
            )?),
            register_delay: Duration::from_millis(env_or(
                "REGISTER_DELAY_MS",
                defaults.register_delay.as_millis() as u64,
            )?),
            token_ttl_minutes: checked_token_ttl(env_or(
                "TOKEN_TTL_MINUTES",
                defaults.token_ttl_minutes,
            )?)?,
            refresh_failure_rate: env_or("REFRESH_FAILURE_RATE", defaults.refresh_failure_rate)?
                .clamp(0.0, 1.0),
            refresh_failure_seed: env_opt("REFRESH_FAILURE_SEED")?,
            refresh_strict: env_or("REFRESH_STRICT", defaults.refresh_strict)?,
            expose_debug_routes: env_or("EXPOSE_DEBUG_ROUTES", defaults.expose_debug_routes)?,
        };
        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("APP_PORT", 8080)?,
            mock,
        })
    }
}

fn checked_token_ttl(minutes: i64) -> anyhow::Result<i64> {
    anyhow::ensure!(
        (1..=MAX_TOKEN_TTL_MINUTES).contains(&minutes),
        "invalid value for TOKEN_TTL_MINUTES: {minutes} (expected 1..={MAX_TOKEN_TTL_MINUTES})"
    );
    Ok(minutes)
}

fn env_opt<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => {
            let value = raw
                .trim()
                .parse::<T>()
                .with_context(|| format!("invalid value for {key}: {raw:?}"))?;
            Ok(Some(value))
        }
        Err(_) => Ok(None),
    }
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    Ok(env_opt(key)?.unwrap_or(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_fixture_server() {
        let cfg = MockConfig::default();
        assert_eq!(cfg.login_delay, Duration::from_millis(1000));
        assert_eq!(cfg.register_delay, Duration::from_millis(1500));
        assert_eq!(cfg.token_ttl_minutes, 60);
        assert!((cfg.refresh_failure_rate - 0.2).abs() < f64::EPSILON);
        assert!(!cfg.refresh_strict);
        assert!(cfg.expose_debug_routes);
    }

    #[test]
    fn env_or_rejects_garbage() {
        std::env::set_var("MOCK_AUTH_TEST_GARBAGE", "not-a-number");
        let err = env_or::<u64>("MOCK_AUTH_TEST_GARBAGE", 1).unwrap_err();
        assert!(err.to_string().contains("MOCK_AUTH_TEST_GARBAGE"));
        std::env::remove_var("MOCK_AUTH_TEST_GARBAGE");
    }

    #[test]
    fn token_ttl_out_of_range_is_rejected() {
        for minutes in [0, -5, MAX_TOKEN_TTL_MINUTES + 1, 100_000_000_000] {
            let err = checked_token_ttl(minutes).unwrap_err();
            assert!(err.to_string().contains("TOKEN_TTL_MINUTES"), "{minutes}");
        }
        assert_eq!(checked_token_ttl(60).unwrap(), 60);
        assert_eq!(
            checked_token_ttl(MAX_TOKEN_TTL_MINUTES).unwrap(),
            MAX_TOKEN_TTL_MINUTES
        );
    }

    #[test]
    fn env_or_falls_back_when_unset() {
        assert_eq!(env_or::<u16>("MOCK_AUTH_TEST_UNSET_PORT", 8080).unwrap(), 8080);
    }
}
