//! Generic CRUD service for any [`Entity`].

use std::marker::PhantomData;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use techvault_core::error::{VaultError, VaultResult};
use techvault_core::http::{HttpRequest, Transport};
use techvault_core::storage::KeyValueStore;
use techvault_core::{Entity, EntityId, ListQuery};
use tracing::debug;
use uuid::Uuid;

use crate::client::ApiClient;

/// List endpoints answer either with a bare array or with a DRF page.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum Listing<E> {
    Bare(Vec<E>),
    Page {
        results: Vec<E>,
        #[serde(default)]
        next: Option<String>,
    },
}

/// Upper bound on pages followed for one listing.
const MAX_PAGES: u32 = 1000;

/// REST calls for one entity type: list, get, create, update, delete.
///
/// Entity-specific sub-resources live in inherent impls next to each
/// entity (see the sibling modules).
pub struct EntityService<T: Transport, S: KeyValueStore, E: Entity> {
    pub(crate) client: ApiClient<T, S>,
    _entity: PhantomData<fn() -> E>,
}

impl<T: Transport, S: KeyValueStore, E: Entity> Clone for EntityService<T, S, E> {
    fn clone(&self) -> Self {
        Self::new(self.client.clone())
    }
}

impl<T: Transport, S: KeyValueStore, E: Entity> EntityService<T, S, E> {
    pub fn new(client: ApiClient<T, S>) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }

    pub async fn list(&self, query: &ListQuery) -> VaultResult<Vec<E>> {
        let mut request = HttpRequest::get(E::PATH);
        request.query = query.pairs();
        self.fetch_list(request).await
    }

    pub async fn get(&self, id: EntityId) -> VaultResult<E> {
        self.client
            .get(&E::detail_path(id))
            .await
            .map_err(|e| not_found::<E>(e, id))
    }

    pub async fn create(&self, input: &E::Create) -> VaultResult<E> {
        self.client.post(E::PATH, input).await
    }

    /// Partial update (PATCH): only the fields set in `input` change.
    pub async fn update(&self, id: EntityId, input: &E::Update) -> VaultResult<E> {
        self.client
            .patch(&E::detail_path(id), input)
            .await
            .map_err(|e| not_found::<E>(e, id))
    }

    pub async fn delete(&self, id: EntityId) -> VaultResult<()> {
        self.client
            .delete(&E::detail_path(id))
            .await
            .map_err(|e| not_found::<E>(e, id))
    }

    /// Collection-level filter action, e.g. `by_organization/?organization=3`.
    pub(crate) async fn list_action(
        &self,
        action: &str,
        param: &str,
        id: EntityId,
    ) -> VaultResult<Vec<E>> {
        let request = HttpRequest::get(E::action_path(action)).with_query(param, id);
        self.fetch_list(request).await
    }

    /// Fetch a listing, following `next` page by page until the server
    /// reports none. A request that names a `page` gets only that page.
    pub(crate) async fn fetch_list<R: DeserializeOwned>(
        &self,
        request: HttpRequest,
    ) -> VaultResult<Vec<R>> {
        let single_page = request.query.iter().any(|(key, _)| key == "page");
        let mut items = Vec::new();
        let mut page: u32 = 1;
        let mut current = request.clone();
        loop {
            match self.client.send_json::<Listing<R>>(current).await? {
                Listing::Bare(results) => {
                    items.extend(results);
                    return Ok(items);
                }
                Listing::Page { results, next } => {
                    items.extend(results);
                    if next.is_none() || single_page {
                        return Ok(items);
                    }
                }
            }

            page += 1;
            if page > MAX_PAGES {
                return Err(VaultError::Decode(format!(
                    "{} listing did not end after {MAX_PAGES} pages",
                    request.path
                )));
            }
            debug!(path = %request.path, page, "Fetching next page");
            current = request.clone();
            current.request_id = Uuid::new_v4();
            current.query.push(("page".to_string(), page.to_string()));
        }
    }
}

/// Give a bare 404 the entity name and id the caller asked for.
pub(crate) fn not_found<E: Entity>(err: VaultError, id: EntityId) -> VaultError {
    match err {
        VaultError::NotFoundMessage { .. } => VaultError::NotFound {
            entity: E::NAME.to_string(),
            id: id.to_string(),
        },
        other => other,
    }
}
