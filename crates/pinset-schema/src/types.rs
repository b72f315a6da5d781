//! String newtypes for names and digests. Each serializes as a bare string
//! and compares directly against `str`, `&str` and `String`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

macro_rules! string_newtype {
    (@eq $name:ident, $($other:ty),+) => {
        $(
            impl PartialEq<$other> for $name {
                fn eq(&self, other: &$other) -> bool {
                    self.as_str() == AsRef::<str>::as_ref(other)
                }
            }
        )+
    };
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap `s` as-is. No trimming or checks.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        string_newtype!(@eq $name, str, String, &str);

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

string_newtype!(
    /// Case-sensitive requirement or package name. Ordering is byte-wise ordinal,
    /// which is the order a resolved set is emitted in.
    PackageName
);

impl PackageName {
    /// Trimmed name, or `None` when nothing but whitespace was given.
    pub fn parse_trimmed(raw: &str) -> Option<Self> {
        let name = raw.trim();
        (!name.is_empty()).then(|| Self::new(name))
    }
}

string_newtype!(
    /// Full 64-character hex blake3 digest of a resolved set.
    SetDigest
);

string_newtype!(
    /// Truncated 12-character prefix of a [`SetDigest`], used for display.
    ShortDigest
);
