//! HTTP middlewares for access control.

use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::Response,
};
use tokio::sync::OnceCell;

use crate::access::CollectionPermission;
use crate::database::entity::collection::CollectionModel;
use crate::database::entity::dataset::DatasetModel;
use crate::database::PortalDatabase;
use crate::error::ServerResult;
use crate::{RequestState, State};
use portal::collection::Visibility;
use portal_token::util::parse_authorization_header;
use portal_token::Token;

/// Auth state.
#[derive(Debug)]
pub struct AuthState {
    /// The JWT token.
    pub token: OnceCell<Token>,
}

impl AuthState {
    /// Returns an auth state with no authenticated user.
    pub fn new() -> Self {
        Self {
            token: OnceCell::new(),
        }
    }

    /// Returns the username if it exists.
    ///
    /// Currently it's the `sub` claim of the JWT.
    pub fn username(&self) -> Option<&str> {
        self.token.get().and_then(|token| token.sub())
    }

    /// Finds and performs authorization for a dataset.
    ///
    /// Errors are masked so that a missing dataset is indistinguishable
    /// from one the requester may not access.
    pub async fn auth_dataset<D, F, T>(&self, database: &D, dataset_id: &str, f: F) -> ServerResult<T>
    where
        D: PortalDatabase,
        F: FnOnce(DatasetModel, CollectionModel, &CollectionPermission) -> ServerResult<T>,
    {
        let (dataset, collection) = database
            .find_dataset_and_collection(dataset_id)
            .await
            .map_err(|e| e.into_no_discovery_permissions())?;

        let permission = CollectionPermission::for_requester(&collection, self.username());

        f(dataset, collection, &permission).map_err(|e| e.into_no_discovery_permissions())
    }

    /// Finds and performs authorization for a collection revision.
    ///
    /// The existence of PRIVATE revisions is only revealed to their owners.
    pub async fn auth_collection<D, F, T>(
        &self,
        database: &D,
        collection_id: &str,
        visibility: Visibility,
        f: F,
    ) -> ServerResult<T>
    where
        D: PortalDatabase,
        F: FnOnce(CollectionModel, &CollectionPermission) -> ServerResult<T>,
    {
        let mask = |e: crate::error::ServerError| match visibility {
            Visibility::Private => e.into_no_discovery_permissions(),
            Visibility::Public => e,
        };

        let collection = database
            .find_collection(collection_id, visibility)
            .await
            .map_err(mask)?;

        let permission = CollectionPermission::for_requester(&collection, self.username());

        f(collection, &permission).map_err(mask)
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}

/// Performs auth.
pub(crate) async fn apply_auth(
    Extension(state): Extension<State>,
    Extension(req_state): Extension<RequestState>,
    req: Request,
    next: Next,
) -> Response {
    let jwt = &state.config.jwt;

    let token: Option<Token> = req
        .headers()
        .get("Authorization")
        .and_then(|bytes| bytes.to_str().ok())
        .and_then(parse_authorization_header)
        .and_then(|encoded| {
            let res_token = Token::from_jwt(
                &encoded,
                &jwt.signing,
                &jwt.token_bound_issuer,
                &jwt.token_bound_audiences,
            );
            if let Err(e) = &res_token {
                tracing::debug!("Ignoring bad JWT token: {}", e);
            }
            res_token.ok()
        });

    if let Some(token) = token {
        if req_state.auth.token.set(token).is_ok() {
            tracing::trace!("Added valid token");
        }
    }

    next.run(req).await
}
