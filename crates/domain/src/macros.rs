//! Macro for implementing Display, FromStr and `as_str` for status enums
//!
//! Upstream status fields arrive as lowercase strings (`"pending"`,
//! `"completed"`, ...). This macro keeps the mapping between variants and
//! their wire representation in one place.
//!
//! # Example
//!
//! ```rust
//! use adsync_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum ImportStatus {
//!     Queued,
//!     Running,
//!     Done,
//! }
//!
//! impl_domain_status_conversions!(ImportStatus {
//!     Queued => "queued",
//!     Running => "running",
//!     Done => "done",
//! });
//!
//! assert_eq!(ImportStatus::Running.as_str(), "running");
//! assert_eq!("DONE".parse::<ImportStatus>(), Ok(ImportStatus::Done));
//! ```

/// Implements `as_str`, Display and FromStr for status enums
///
/// - `as_str`: the canonical lowercase wire string
/// - Display: writes `as_str`
/// - FromStr: case-insensitive parse, error names the enum and the input
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical wire representation of this status.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
