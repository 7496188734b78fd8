//! The resolver seam and the in-memory implementation.

use futures::future::{self, BoxFuture, FutureExt};

use crate::error::{ResolveError, ResolveResult};
use crate::model::{Profile, ResolvedProfile};

/// Asynchronous profile lookup.
///
/// Resolution involves I/O on real deployments (an HTTP fetch against the
/// session service), so the result is a future and must never be awaited on
/// the tick thread. Failures surface through the future, never as a silent
/// default profile.
pub trait ProfileResolver: Send + Sync {
    fn resolve(&self, profile: &Profile) -> BoxFuture<'static, ResolveResult<ResolvedProfile>>;
}

/// Resolver backed by a fixed in-memory table.
///
/// Useful for offline servers and tests, where every resolvable profile is
/// known up front.
#[derive(Debug, Default)]
pub struct StaticResolver {
    profiles: Vec<ResolvedProfile>,
}

impl StaticResolver {
    #[must_use]
    pub fn new(profiles: impl IntoIterator<Item = ResolvedProfile>) -> Self {
        Self {
            profiles: profiles.into_iter().collect(),
        }
    }
}

impl ProfileResolver for StaticResolver {
    fn resolve(&self, profile: &Profile) -> BoxFuture<'static, ResolveResult<ResolvedProfile>> {
        let result = self
            .profiles
            .iter()
            .find(|candidate| candidate.matches(profile))
            .cloned()
            .ok_or_else(|| ResolveError::NotFound {
                key: profile.to_string(),
            });
        future::ready(result).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use uuid::Uuid;

    fn steve() -> ResolvedProfile {
        ResolvedProfile::new("steve", Uuid::from_u128(7)).unwrap()
    }

    #[test]
    fn resolves_by_name_and_id() {
        let resolver = StaticResolver::new([steve()]);

        let by_name = block_on(resolver.resolve(&Profile::by_name("steve").unwrap())).unwrap();
        assert_eq!(by_name.unique_id(), Uuid::from_u128(7));

        let by_id = block_on(resolver.resolve(&Profile::by_id(Uuid::from_u128(7)))).unwrap();
        assert_eq!(by_id.name(), "steve");
    }

    #[test]
    fn unknown_key_fails_the_future() {
        let resolver = StaticResolver::new([steve()]);
        let err = block_on(resolver.resolve(&Profile::by_name("alex").unwrap())).unwrap_err();
        assert_eq!(
            err,
            ResolveError::NotFound {
                key: "name alex".into()
            }
        );
    }
}
