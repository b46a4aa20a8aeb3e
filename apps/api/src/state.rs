use std::sync::Arc;

use crate::artifacts::repository::ArtifactRepository;
use crate::auth::cookie::CookiePolicy;
use crate::auth::token::IdentityVerifier;
use crate::likes::aggregator::LikeAggregator;
use crate::store::{ArtifactStore, LikeStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub artifacts: ArtifactRepository,
    pub likes: LikeAggregator,
    pub verifier: Arc<IdentityVerifier>,
    pub cookies: CookiePolicy,
}

impl AppState {
    /// Wires both services to one store handle.
    pub fn new<S>(store: Arc<S>, verifier: IdentityVerifier, cookies: CookiePolicy) -> Self
    where
        S: ArtifactStore + LikeStore + 'static,
    {
        let artifact_store: Arc<dyn ArtifactStore> = store.clone();
        let like_store: Arc<dyn LikeStore> = store;
        AppState {
            artifacts: ArtifactRepository::new(artifact_store.clone()),
            likes: LikeAggregator::new(artifact_store, like_store),
            verifier: Arc::new(verifier),
            cookies,
        }
    }
}
