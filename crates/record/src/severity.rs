//! Severity levels
//!
//! Syslog-style severities: 0 is most severe, 7 least. A record's
//! `priority` field carries one of these values; the stdout threshold
//! drops records whose priority is numerically larger than the
//! configured level.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Record severity, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    Emergency = 0,
    Alert = 1,
    Critical = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    Info = 6,
    Debug = 7,
}

impl Severity {
    /// Numeric priority of this level
    #[inline]
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Map a numeric priority back onto a level
    pub fn from_value(value: u64) -> Option<Self> {
        match value {
            0 => Some(Self::Emergency),
            1 => Some(Self::Alert),
            2 => Some(Self::Critical),
            3 => Some(Self::Error),
            4 => Some(Self::Warning),
            5 => Some(Self::Notice),
            6 => Some(Self::Info),
            7 => Some(Self::Debug),
            _ => None,
        }
    }

    /// Lowercase level name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Emergency => "emergency",
            Self::Alert => "alert",
            Self::Critical => "critical",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Notice => "notice",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }

    /// True when a record with the given priority passes this threshold
    ///
    /// Larger numeric priority = less severe; records strictly less
    /// severe than the threshold are dropped.
    #[inline]
    pub fn permits(self, priority: u64) -> bool {
        priority <= u64::from(self.value())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unparseable severity specs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid severity level '{0}'")]
pub struct SeverityError(pub String);

impl FromStr for Severity {
    type Err = SeverityError;

    /// Parse a named level (case-insensitive) or a numeric priority 0-7
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(value) = s.parse::<u64>() {
            return Self::from_value(value).ok_or_else(|| SeverityError(s.to_string()));
        }
        match s.to_ascii_lowercase().as_str() {
            "emergency" => Ok(Self::Emergency),
            "alert" => Ok(Self::Alert),
            "critical" => Ok(Self::Critical),
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            "notice" => Ok(Self::Notice),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            _ => Err(SeverityError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values() {
        assert_eq!(Severity::Emergency.value(), 0);
        assert_eq!(Severity::Notice.value(), 5);
        assert_eq!(Severity::Debug.value(), 7);
    }

    #[test]
    fn test_from_value_roundtrip() {
        for v in 0..=7u64 {
            let level = Severity::from_value(v).unwrap();
            assert_eq!(u64::from(level.value()), v);
        }
        assert_eq!(Severity::from_value(8), None);
    }

    #[test]
    fn test_parse_named() {
        assert_eq!("debug".parse::<Severity>().unwrap(), Severity::Debug);
        assert_eq!("NOTICE".parse::<Severity>().unwrap(), Severity::Notice);
        assert_eq!("Warning".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!("emergency".parse::<Severity>().unwrap(), Severity::Emergency);
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!("0".parse::<Severity>().unwrap(), Severity::Emergency);
        assert_eq!("5".parse::<Severity>().unwrap(), Severity::Notice);
        assert_eq!("7".parse::<Severity>().unwrap(), Severity::Debug);
    }

    #[test]
    fn test_parse_invalid() {
        assert!("verbose".parse::<Severity>().is_err());
        assert!("8".parse::<Severity>().is_err());
        assert!("-1".parse::<Severity>().is_err());
        assert!("".parse::<Severity>().is_err());
    }

    #[test]
    fn test_permits() {
        let threshold = Severity::Notice; // 5
        assert!(threshold.permits(0));
        assert!(threshold.permits(5));
        assert!(!threshold.permits(6));
        assert!(!threshold.permits(7));
    }

    #[test]
    fn test_permits_monotonic() {
        // If a less severe record passes, every more severe one does too.
        for t in 0..=7u64 {
            let threshold = Severity::from_value(t).unwrap();
            for p2 in 0..=7u64 {
                if threshold.permits(p2) {
                    for p1 in 0..p2 {
                        assert!(threshold.permits(p1));
                    }
                }
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Severity::Critical.to_string(), "critical");
    }
}
