//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, LinkService, ResolveService, UserService};
use crate::domain::repositories::{LinkRepository, UserRepository};

/// Application state shared across requests.
///
/// Services are built once over the repository trait objects, so the same
/// state works over PostgreSQL or the in-memory store. `base_url` is the
/// public prefix rendered into `short_url` fields.
#[derive(Clone)]
pub struct AppState {
    pub base_url: String,
    pub auth_service: Arc<AuthService>,
    pub link_service: Arc<LinkService>,
    pub resolve_service: Arc<ResolveService>,
    pub user_service: Arc<UserService>,
    pub link_repository: Arc<dyn LinkRepository>,
    pub user_repository: Arc<dyn UserRepository>,
}

impl AppState {
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        user_repository: Arc<dyn UserRepository>,
        auth_service: Arc<AuthService>,
        base_url: String,
    ) -> Self {
        let link_service = Arc::new(LinkService::new(link_repository.clone()));
        let resolve_service = Arc::new(ResolveService::new(link_repository.clone()));
        let user_service = Arc::new(UserService::new(
            user_repository.clone(),
            auth_service.clone(),
        ));

        Self {
            base_url,
            auth_service,
            link_service,
            resolve_service,
            user_service,
            link_repository,
            user_repository,
        }
    }
}
