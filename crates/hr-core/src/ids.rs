//! Strongly typed equipment identifiers.
//!
//! Unit ids in a haul table are free-form strings (`"HT-101"`, `"EX05"`).
//! Wrapping them keeps a hauling unit from being passed where a loading unit
//! is expected, which matters because the leaderboard is keyed by loader.

use std::fmt;

/// Generate a typed id wrapper around an owned string.
macro_rules! unit_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub String);

        impl $name {
            /// Sentinel used when the source cell is absent or blank.
            pub const UNKNOWN: &'static str = "-";

            /// Build from a raw cell, falling back to [`Self::UNKNOWN`] when the
            /// value is missing or whitespace-only.
            pub fn from_raw(raw: Option<&str>) -> Self {
                match raw.map(str::trim) {
                    Some(s) if !s.is_empty() => Self(s.to_owned()),
                    _ => Self::unknown(),
                }
            }

            pub fn unknown() -> Self {
                Self(Self::UNKNOWN.to_owned())
            }

            #[inline]
            pub fn is_unknown(&self) -> bool {
                self.0 == Self::UNKNOWN
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            /// Returns the sentinel so unset ids are visibly unknown.
            fn default() -> Self {
                Self::unknown()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::from_raw(Some(s))
            }
        }
    };
}

unit_id! {
    /// The hauling unit (truck) that carried the load.
    pub struct HaulUnit;
}

unit_id! {
    /// The loading unit (shovel, excavator, wheel loader) that filled the truck.
    /// Leaderboard key.
    pub struct LoadUnit;
}
