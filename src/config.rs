//! Decoder configuration.

use std::fmt;
use std::str::FromStr;

/// How the header's declared record count relates to the records actually decoded.
///
/// Real logs have been seen with one more record than the header declares,
/// so the count is advisory unless a caller opts into something stricter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountPolicy {
    /// Decode until the stream ends; log a mismatch at warn level.
    #[default]
    Advisory,

    /// Decode until the stream ends; a mismatch is an error.
    Strict,

    /// Stop after the declared number of records, ignoring trailing bytes.
    Declared,
}

impl FromStr for CountPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "advisory" => Ok(CountPolicy::Advisory),
            "strict" => Ok(CountPolicy::Strict),
            "declared" => Ok(CountPolicy::Declared),
            other => Err(format!(
                "unknown count policy '{}' (expected advisory, strict or declared)",
                other
            )),
        }
    }
}

impl fmt::Display for CountPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CountPolicy::Advisory => "advisory",
            CountPolicy::Strict => "strict",
            CountPolicy::Declared => "declared",
        };
        f.write_str(name)
    }
}

/// Options for [`LogReader`](crate::LogReader).
#[derive(Debug, Clone, Copy, Default)]
pub struct DecoderConfig {
    pub count_policy: CountPolicy,
}

impl DecoderConfig {
    pub fn with_count_policy(count_policy: CountPolicy) -> Self {
        DecoderConfig { count_policy }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_advisory() {
        assert_eq!(DecoderConfig::default().count_policy, CountPolicy::Advisory);
    }

    #[test]
    fn test_parse_policies() {
        assert_eq!("advisory".parse::<CountPolicy>(), Ok(CountPolicy::Advisory));
        assert_eq!(" Strict ".parse::<CountPolicy>(), Ok(CountPolicy::Strict));
        assert_eq!("DECLARED".parse::<CountPolicy>(), Ok(CountPolicy::Declared));
        assert!("lenient".parse::<CountPolicy>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for policy in [CountPolicy::Advisory, CountPolicy::Strict, CountPolicy::Declared] {
            assert_eq!(policy.to_string().parse::<CountPolicy>(), Ok(policy));
        }
    }
}
