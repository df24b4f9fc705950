//! Strongly-typed identifiers and the identifier-generation capability.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source of globally unique identifiers.
///
/// Passed explicitly to factories that need fresh ids, so tests can supply a
/// deterministic sequence.
pub trait IdGenerator {
    fn next_uuid(&self) -> Uuid;
}

impl<G: IdGenerator + ?Sized> IdGenerator for &G {
    fn next_uuid(&self) -> Uuid {
        (**self).next_uuid()
    }
}

/// Time-ordered UUIDv7 generator.
#[derive(Debug, Default, Copy, Clone)]
pub struct UuidV7Generator;

impl IdGenerator for UuidV7Generator {
    fn next_uuid(&self) -> Uuid {
        Uuid::now_v7()
    }
}

/// Identifier of an aggregate stream, independent of the aggregate's own id type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateId(Uuid);

/// Implements the standard surface for a `struct Foo(Uuid)` identifier newtype.
#[macro_export]
macro_rules! impl_uuid_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Draw a fresh identifier from `ids`.
            pub fn generate(ids: &impl $crate::IdGenerator) -> Self {
                Self(ids.next_uuid())
            }

            pub fn from_uuid(uuid: ::uuid::Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &::uuid::Uuid {
                &self.0
            }

            /// The nil UUID stands for a missing identifier.
            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }
        }

        impl ::core::fmt::Display for $t {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<::uuid::Uuid> for $t {
            fn from(value: ::uuid::Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$t> for ::uuid::Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl ::core::str::FromStr for $t {
            type Err = $crate::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = <::uuid::Uuid as ::core::str::FromStr>::from_str(s).map_err(|e| {
                    $crate::DomainError::invalid_argument(format!("{}: {}", $name, e))
                })?;
                Ok(Self(uuid))
            }
        }
    };
}

impl_uuid_newtype!(AggregateId, "AggregateId");
