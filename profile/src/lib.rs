//! Player profile resolution for the specter NPC library.
//!
//! An NPC is spawned under a real-looking player identity: a name, a unique
//! id, and (usually) a signed texture blob. This crate models that identity
//! and the asynchronous lookup that fills it in, plus the TTL cache that
//! keeps repeat lookups off the wire.
//!
//! # Design Principles
//!
//! - **Keys are validated at construction** - a [`Profile`] always carries exactly one
//!   non-empty key half; malformed input fails immediately, never at resolve time.
//! - **Resolution is a future** - lookups do I/O; the tick thread gets the synchronous
//!   `from_cache` accessors instead.
//! - **Failures stay loud** - an unresolvable profile fails the future; there is no
//!   silent fallback identity.
//!
//! # Example
//!
//! ```
//! use futures::executor::block_on;
//! use profile::{CachedResolver, Profile, ProfileResolver, ResolvedProfile, StaticResolver};
//! use uuid::Uuid;
//!
//! let steve = ResolvedProfile::new("steve", Uuid::from_u128(7)).unwrap();
//! let resolver = CachedResolver::new(StaticResolver::new([steve]));
//!
//! let resolved = block_on(resolver.resolve(&Profile::by_name("steve").unwrap())).unwrap();
//! assert_eq!(resolved.unique_id(), Uuid::from_u128(7));
//! assert!(resolver.from_cache_by_name("steve").is_some());
//! ```

mod cache;
mod error;
mod model;
mod resolver;

pub use cache::{CachedResolver, DEFAULT_TTL};
pub use error::{ResolveError, ResolveResult};
pub use model::{Profile, ProfileProperty, ResolvedProfile};
pub use resolver::{ProfileResolver, StaticResolver};
