/// 서비스 설정
/// 시작 시 환경 변수에서 한 번 읽어들인다.
// region:    --- Imports
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

// endregion: --- Imports

// region:    --- Config Error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
// endregion: --- Config Error

// region:    --- Config
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub seed_categories: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// 세션 유효 기간(초)
    pub ttl_secs: i64,
    pub sweep_interval: Duration,
    pub secure_cookie: bool,
}

impl Config {
    /// 환경 변수에서 설정 읽기
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 키 조회 함수로부터 설정 생성
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let url = lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://auctions.db".to_string());
        let max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5u32)?;
        let ttl_secs = parse_or(&lookup, "SESSION_TTL_SECS", 14 * 24 * 60 * 60i64)?;
        let sweep_secs = parse_or(&lookup, "SESSION_SWEEP_INTERVAL_SECS", 60u64)?;
        let secure_cookie = parse_or(&lookup, "SESSION_COOKIE_SECURE", false)?;
        let seed_categories = lookup("SEED_CATEGORIES")
            .map(|raw| split_names(&raw))
            .unwrap_or_else(|| split_names("Electronics,Fashion,Home,Toys"));

        if ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                key: "SESSION_TTL_SECS",
                value: ttl_secs.to_string(),
            });
        }

        Ok(Self {
            bind_addr,
            database: DatabaseConfig {
                url,
                max_connections,
            },
            session: SessionConfig {
                ttl_secs,
                sweep_interval: Duration::from_secs(sweep_secs.max(1)),
                secure_cookie,
            },
            seed_categories,
        })
    }
}

impl DatabaseConfig {
    /// 테스트용 인메모리 데이터베이스 설정
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:")
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn split_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
// endregion: --- Config

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    /// 기본값 테스트
    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.database.url, "sqlite://auctions.db");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.session.ttl_secs, 1_209_600);
        assert_eq!(config.session.sweep_interval, Duration::from_secs(60));
        assert!(!config.session.secure_cookie);
        assert_eq!(
            config.seed_categories,
            vec!["Electronics", "Fashion", "Home", "Toys"]
        );
    }

    /// 환경 변수 덮어쓰기 테스트
    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("SESSION_COOKIE_SECURE", "true"),
            ("SEED_CATEGORIES", " Books, ,Garden "),
        ]))
        .unwrap();
        assert!(config.database.is_in_memory());
        assert!(config.session.secure_cookie);
        assert_eq!(config.seed_categories, vec!["Books", "Garden"]);
    }

    /// 잘못된 값 테스트
    #[test]
    fn test_invalid_value() {
        let err = Config::from_lookup(lookup_from(&[("DATABASE_MAX_CONNECTIONS", "many")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                ..
            }
        ));

        let err = Config::from_lookup(lookup_from(&[("SESSION_TTL_SECS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SESSION_TTL_SECS", .. }));
    }
}
