//! Macro for implementing Display and FromStr for status enums
//!
//! Priorities, event statuses and failure reasons all cross the HTTP boundary
//! as lowercase strings. This macro keeps their conversions in one place.
//!
//! # Example
//!
//! ```rust
//! use slotwise_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum RsvpStatus {
//!     Accepted,
//!     Declined,
//! }
//!
//! impl_domain_status_conversions!(RsvpStatus {
//!     Accepted => "accepted",
//!     Declined => "declined",
//! });
//! ```

/// Implements Display and FromStr traits for status enums
///
/// - Display: writes the mapped lowercase string
/// - FromStr: case-insensitive parse, error message names the enum
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
