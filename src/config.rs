//! Environment-driven configuration for the retention sweeper.
//!
//! The whole configuration surface is four environment variables:
//!
//! | Key | Required | Format | Default |
//! |---|---|---|---|
//! | `BUCKET` | yes | string | none |
//! | `PREFIXES` | yes | comma-separated strings | `""` |
//! | `TTL_SECONDS` | no | integer string | `"3600"` |
//! | `DRY_RUN` | no | `"1"` / `"true"` | off |

use chrono::{DateTime, Duration, Utc};

use crate::error::{SweepError, SweepResult};

/// Fallback TTL when `TTL_SECONDS` is absent.
pub const DEFAULT_TTL_SECONDS: i64 = 3_600;

/// Everything one sweep invocation needs, resolved up front and passed by
/// reference into the sweep. No process-wide mutable state.
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// Bucket the sweep operates on.
    pub bucket: String,
    /// Key prefixes to sweep, in configured order. Duplicates are kept;
    /// overlapping prefixes will double-count the objects under both.
    pub prefixes: Vec<String>,
    /// Age threshold in seconds beyond which objects are deleted.
    pub ttl_seconds: i64,
    /// When set, log would-be deletions instead of issuing delete calls.
    pub dry_run: bool,
}

impl SweeperConfig {
    /// Load the configuration from the environment.
    ///
    /// Fails with [`SweepError::Config`] when `BUCKET` is empty or absent,
    /// or when `PREFIXES` parses to an empty list; a non-integer
    /// `TTL_SECONDS` propagates as [`SweepError::Conversion`].
    pub fn from_env() -> SweepResult<Self> {
        let bucket = std::env::var("BUCKET").unwrap_or_default();
        let prefixes = parse_prefixes(&std::env::var("PREFIXES").unwrap_or_default());
        let ttl_seconds = std::env::var("TTL_SECONDS")
            .unwrap_or_else(|_| DEFAULT_TTL_SECONDS.to_string())
            .parse()?;
        let dry_run = std::env::var("DRY_RUN")
            .is_ok_and(|value| value == "1" || value.eq_ignore_ascii_case("true"));

        if bucket.is_empty() {
            return Err(SweepError::Config("BUCKET must be set".to_string()));
        }
        if prefixes.is_empty() {
            return Err(SweepError::Config(
                "PREFIXES must name at least one prefix".to_string(),
            ));
        }

        Ok(Self {
            bucket,
            prefixes,
            ttl_seconds,
            dry_run,
        })
    }

    /// Retention boundary for a run starting at `now`. Objects whose
    /// last-modified instant is at or before this are deleted.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::seconds(self.ttl_seconds)
    }
}

/// Split a comma-separated prefix list, trimming whitespace and dropping
/// empty pieces while preserving order.
fn parse_prefixes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("app/,debug/", vec!["app/", "debug/"])]
    #[case(" app/ ,  debug/ ", vec!["app/", "debug/"])]
    #[case("app/,,debug/,", vec!["app/", "debug/"])]
    #[case("app/,app/", vec!["app/", "app/"])]
    #[case("", vec![])]
    #[case("  ,  ", vec![])]
    fn parses_prefix_lists(#[case] raw: &str, #[case] expected: Vec<&str>) {
        assert_eq!(parse_prefixes(raw), expected);
    }

    #[test]
    fn loads_configuration_from_the_environment() {
        temp_env::with_vars(
            [
                ("BUCKET", Some("logs")),
                ("PREFIXES", Some("app/,debug/")),
                ("TTL_SECONDS", Some("60")),
                ("DRY_RUN", None),
            ],
            || {
                let config = SweeperConfig::from_env().unwrap();
                assert_eq!(config.bucket, "logs");
                assert_eq!(config.prefixes, vec!["app/", "debug/"]);
                assert_eq!(config.ttl_seconds, 60);
                assert!(!config.dry_run);
            },
        );
    }

    #[test]
    fn ttl_defaults_to_one_hour() {
        temp_env::with_vars(
            [
                ("BUCKET", Some("logs")),
                ("PREFIXES", Some("app/")),
                ("TTL_SECONDS", None),
            ],
            || {
                let config = SweeperConfig::from_env().unwrap();
                assert_eq!(config.ttl_seconds, DEFAULT_TTL_SECONDS);
            },
        );
    }

    #[test]
    fn missing_bucket_is_a_config_error() {
        temp_env::with_vars([("BUCKET", None), ("PREFIXES", Some("app/"))], || {
            let err = SweeperConfig::from_env().unwrap_err();
            assert!(matches!(err, SweepError::Config(_)));
        });
    }

    #[test]
    fn empty_prefix_list_is_a_config_error() {
        temp_env::with_vars([("BUCKET", Some("logs")), ("PREFIXES", Some(""))], || {
            let err = SweeperConfig::from_env().unwrap_err();
            assert!(matches!(err, SweepError::Config(_)));
        });
    }

    #[test]
    fn non_numeric_ttl_is_a_conversion_error() {
        temp_env::with_vars(
            [
                ("BUCKET", Some("logs")),
                ("PREFIXES", Some("app/")),
                ("TTL_SECONDS", Some("not-a-number")),
            ],
            || {
                let err = SweeperConfig::from_env().unwrap_err();
                assert!(matches!(err, SweepError::Conversion(_)));
            },
        );
    }

    #[test]
    fn dry_run_accepts_truthy_values() {
        temp_env::with_vars(
            [
                ("BUCKET", Some("logs")),
                ("PREFIXES", Some("app/")),
                ("DRY_RUN", Some("true")),
            ],
            || {
                assert!(SweeperConfig::from_env().unwrap().dry_run);
            },
        );
    }

    #[test]
    fn cutoff_subtracts_the_ttl() {
        let config = SweeperConfig {
            bucket: "logs".to_string(),
            prefixes: vec!["app/".to_string()],
            ttl_seconds: 60,
            dry_run: false,
        };
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 1, 0).unwrap();
        assert_eq!(
            config.cutoff(now),
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
        );
    }
}
