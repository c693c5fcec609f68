use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Ids in stored books are arbitrary strings ("c1", "act-1700000000"), so these
// wrap a String rather than a Uuid. Freshly minted ids are still UUIDv4.
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn from_string(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Book structure IDs
define_id!(BookId);
define_id!(VersionId);
define_id!(ChapterId);

// Planning board IDs
define_id!(NodeId);
define_id!(TimelineEventId);

// World entity IDs referenced from scene payloads
define_id!(CharacterId);
define_id!(LocationId);
define_id!(ObjectId);
define_id!(LoreId);

// Asset IDs
define_id!(AssetId);
