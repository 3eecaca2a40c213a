//! Request-level document assembly for the API doc aggregator
//!
//! [`DocumentAssembler`] answers one documentation request for one caller. It
//! enumerates the services the caller can see, fetches each service's fragment
//! from the registry, normalizes and permission-filters the fragment's paths,
//! and folds everything into a single OpenAPI document seeded with the fixed
//! security schemes and default components.
//!
//! Whole-system documents are memoized per access profile in a
//! [`ResponseCache`]; single-service documents are always rebuilt.

mod cache;
mod collaborators;
mod defaults;
mod directory;
mod events;
mod listing;
mod policy;

pub use cache::{CacheEntry, CacheKey, Generation, ResponseCache};
pub use collaborators::{Authorizer, ServiceHandle, ServiceRegistry};
pub use defaults::{own_fragment, AggregatorService};
pub use directory::{DirectoryRegistry, FileService};
pub use events::{CacheEvent, Invalidation, CACHE_CLEARED, CACHE_REBUILT};
pub use listing::ServiceEntry;
pub use policy::PolicyAuthorizer;

use apidoc_aggregator_common::{AccessProfile, ApiDocError, Result, Settings, VerbMask};
use apidoc_aggregator_compose::{
    ComposedDocument, DocumentScope, Fragment, FragmentMerger, OperationFilter, PathItem,
    PathNormalizer, Tag,
};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

/// One documentation request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocRequest {
    /// Named service for a single-service document; `None` for the whole system
    pub service: Option<String>,

    /// Return the visible services as `{name, label, type}` entries instead
    pub as_resources: bool,

    /// Return the addressable resource paths instead
    pub as_access_list: bool,

    /// Skip cached documents and re-fetch fragments
    pub force_refresh: bool,
}

impl DocRequest {
    pub fn whole_system() -> Self {
        Self::default()
    }

    pub fn service(name: impl Into<String>) -> Self {
        Self {
            service: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Result of a documentation request
#[derive(Debug, Clone, PartialEq)]
pub enum DocResponse {
    Document(Arc<ComposedDocument>),
    /// `as_resources` / `as_access_list` views
    Listing(Value),
}

/// Builds permission-filtered documents from registry fragments
pub struct DocumentAssembler<R, A> {
    registry: R,
    authorizer: A,
    settings: Settings,
    cache: Arc<ResponseCache>,
}

impl<R: ServiceRegistry, A: Authorizer> DocumentAssembler<R, A> {
    /// Create an assembler with its own empty cache
    pub fn new(registry: R, authorizer: A, settings: Settings) -> Self {
        Self::with_cache(registry, authorizer, settings, Arc::new(ResponseCache::new()))
    }

    /// Create an assembler sharing an existing cache
    pub fn with_cache(
        registry: R,
        authorizer: A,
        settings: Settings,
        cache: Arc<ResponseCache>,
    ) -> Self {
        Self {
            registry,
            authorizer,
            settings,
            cache,
        }
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Answer one request for one caller
    pub fn handle(&self, profile: &AccessProfile, request: &DocRequest) -> Result<DocResponse> {
        if let Some(service) = request.service.as_deref() {
            return self
                .single_service(profile, service, request.force_refresh)
                .map(DocResponse::Document);
        }

        let wrapper = &self.settings.resource_wrapper;
        if request.as_access_list {
            return Ok(DocResponse::Listing(listing::access_list(
                &self.registry,
                &self.authorizer,
                profile,
                wrapper,
            )));
        }
        if request.as_resources {
            return Ok(DocResponse::Listing(listing::service_resources(
                &self.registry,
                &self.authorizer,
                profile,
                wrapper,
            )));
        }

        Ok(DocResponse::Document(
            self.whole_system(profile, request.force_refresh),
        ))
    }

    /// Document covering every service the caller can see
    ///
    /// Never fails: a service whose fragment cannot be fetched is logged and
    /// left out.
    pub fn whole_system(&self, profile: &AccessProfile, refresh: bool) -> Arc<ComposedDocument> {
        let is_administrator = self.authorizer.is_administrator(profile);
        let key = CacheKey::for_caller(profile, is_administrator);

        if let Some(key) = key.filter(|_| !refresh) {
            if let Some(document) = self.cache.get(&key) {
                tracing::debug!(key = ?key, "API doc cache hit");
                return document;
            }
        }

        let generation = key.map(|key| self.cache.generation(&key));
        tracing::info!(key = ?key, refresh, "Building API doc cache");

        let mut document = defaults::base_document(
            &self.settings,
            defaults::system_info(&self.settings),
            self.settings.base_path.clone(),
        );

        let services = listing::visible_services(&self.registry, &self.authorizer, profile);
        for name in &services {
            let Some(handle) = self.registry.resolve(name) else {
                tracing::warn!(service = %name, "Service listed but not resolvable, skipping");
                continue;
            };

            let fragment = match handle.api_doc(refresh) {
                Ok(Some(fragment)) if !fragment.is_empty() => fragment,
                Ok(_) => {
                    tracing::debug!(service = %name, "No API doc published, skipping");
                    continue;
                }
                Err(e) => {
                    tracing::warn!(service = %name, error = %e, "Failed to build API doc info, skipping");
                    continue;
                }
            };

            self.merge_service(
                &mut document,
                profile,
                is_administrator,
                handle.as_ref(),
                fragment,
                DocumentScope::WholeSystem,
            );
        }

        tracing::info!(
            services = services.len(),
            paths = document.paths.len(),
            tags = document.tags.len(),
            "API doc cache build complete"
        );

        match key.zip(generation) {
            Some((key, generation)) => self.cache.put_if_current(key, document, generation),
            None => Arc::new(document),
        }
    }

    /// Document for one named service
    ///
    /// Fails with `Forbidden` when the caller holds no grant on the service,
    /// `NotFound` when the registry does not know it, and
    /// `ServiceUnavailable` when it publishes no documentation.
    pub fn single_service(
        &self,
        profile: &AccessProfile,
        service_name: &str,
        refresh: bool,
    ) -> Result<Arc<ComposedDocument>> {
        let is_administrator = self.authorizer.is_administrator(profile);
        if !is_administrator && !self.authorizer.allows_service_access(profile, service_name) {
            return Err(ApiDocError::Forbidden(service_name.to_string()));
        }

        let handle = self
            .registry
            .resolve(service_name)
            .ok_or_else(|| ApiDocError::NotFound(service_name.to_string()))?;

        let fragment = handle
            .api_doc(refresh)?
            .filter(|fragment| !fragment.is_empty())
            .ok_or_else(|| ApiDocError::ServiceUnavailable(service_name.to_string()))?;

        let name = handle.name();
        let mut document = defaults::base_document(
            &self.settings,
            defaults::service_info(&self.settings, handle.label(), handle.description()),
            self.settings.service_url(&name),
        );

        self.merge_service(
            &mut document,
            profile,
            is_administrator,
            handle.as_ref(),
            fragment,
            DocumentScope::SingleService,
        );

        Ok(Arc::new(document))
    }

    /// Filter one fragment for the caller and fold it into `document`
    fn merge_service(
        &self,
        document: &mut ComposedDocument,
        profile: &AccessProfile,
        is_administrator: bool,
        handle: &dyn ServiceHandle,
        mut fragment: Fragment,
        scope: DocumentScope,
    ) {
        let name = handle.name();
        let paths = std::mem::take(&mut fragment.paths);
        let filtered = self.filter_service_paths(profile, is_administrator, &name, paths, scope);

        FragmentMerger::merge_fragment(document, &name, filtered, fragment.component_sets());

        if !document.tags.iter().any(|tag| tag.name == name) {
            let description = handle.description();
            document.tags.push(Tag {
                name,
                description: Some(description).filter(|d| !d.is_empty()),
            });
        }
    }

    /// Permission-filter every path of one fragment, rewriting keys as needed
    fn filter_service_paths(
        &self,
        profile: &AccessProfile,
        is_administrator: bool,
        service_name: &str,
        paths: IndexMap<String, PathItem>,
        scope: DocumentScope,
    ) -> IndexMap<String, PathItem> {
        let prefix = scope == DocumentScope::WholeSystem
            && PathNormalizer::needs_service_name_prefix(service_name, paths.keys());

        let mut filtered: IndexMap<String, PathItem> = IndexMap::new();
        for (raw_path, item) in paths {
            let mask = if is_administrator {
                VerbMask::ALL
            } else {
                let resource = PathNormalizer::resource_path(service_name, &raw_path);
                self.authorizer
                    .service_permissions(profile, service_name, &resource)
            };

            let filter = OperationFilter::new(service_name, mask, is_administrator, scope);
            let item = filter.filter_path_item(item);
            if item.is_empty() {
                continue;
            }

            let key = if prefix {
                PathNormalizer::with_service_prefix(service_name, &raw_path)
            } else {
                raw_path
            };

            // Raw keys can collide once prefixed (`/_table` and `_table`)
            let target = filtered.entry(key).or_default();
            for (verb, entry) in item {
                target.entry(verb).or_insert(entry);
            }
        }
        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{MockAuthorizer, MockServiceHandle, MockServiceRegistry};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    fn handle(name: &str, fragment: Option<Value>) -> Arc<dyn ServiceHandle> {
        let mut mock = MockServiceHandle::new();
        let service = name.to_string();
        mock.expect_name().returning(move || service.clone());
        let label = format!("{} label", name);
        mock.expect_label().returning(move || label.clone());
        let description = format!("{} description", name);
        mock.expect_description()
            .returning(move || description.clone());
        mock.expect_service_type()
            .returning(|| "test".to_string());
        mock.expect_api_doc().returning(move |_| match &fragment {
            Some(value) => Ok(Some(serde_json::from_value(value.clone()).unwrap())),
            None => Ok(None),
        });
        Arc::new(mock)
    }

    fn failing_handle(name: &str) -> Arc<dyn ServiceHandle> {
        let mut mock = MockServiceHandle::new();
        let service = name.to_string();
        mock.expect_name().returning(move || service.clone());
        let service = name.to_string();
        mock.expect_api_doc().returning(move |_| {
            Err(ApiDocError::Fetch {
                service: service.clone(),
                reason: "connection refused".to_string(),
            })
        });
        Arc::new(mock)
    }

    fn registry(fragments: Vec<(&str, Option<Value>)>) -> MockServiceRegistry {
        let names: Vec<String> = fragments.iter().map(|(n, _)| n.to_string()).collect();
        let fragments: HashMap<String, Option<Value>> = fragments
            .into_iter()
            .map(|(n, f)| (n.to_string(), f))
            .collect();

        let mut mock = MockServiceRegistry::new();
        mock.expect_list_visible_service_names()
            .returning(move |_| names.clone());
        mock.expect_resolve().returning(move |name| {
            fragments
                .get(name)
                .map(|fragment| handle(name, fragment.clone()))
        });
        mock
    }

    /// Non-admin caller with `mask` on every resource of every service
    fn role_authorizer(mask: VerbMask) -> MockAuthorizer {
        let mut mock = MockAuthorizer::new();
        mock.expect_is_administrator()
            .returning(|profile| profile.is_administrator);
        mock.expect_allows_service_access()
            .returning(move |_, _| !mask.is_empty());
        mock.expect_service_permissions()
            .returning(move |_, _, _| mask);
        mock
    }

    fn db_fragment() -> Value {
        json!({
            "paths": {
                "/db": { "get": { "responses": { "200": { "description": "ok" } } } },
                "/db/_table": {
                    "get": { "responses": { "200": { "description": "ok" } } },
                    "post": { "responses": { "201": { "description": "created" } } },
                    "parameters": [ { "name": "filter", "in": "query" } ]
                }
            },
            "components": {
                "schemas": { "Record": { "type": "object" } },
                "responses": { "Error": { "description": "db error" } }
            }
        })
    }

    fn files_fragment() -> Value {
        json!({
            "paths": {
                "/": { "get": { "tags": ["storage"] } },
                "/{path}": { "delete": {} }
            }
        })
    }

    fn document(response: DocResponse) -> Arc<ComposedDocument> {
        match response {
            DocResponse::Document(document) => document,
            other => panic!("expected document, got {:?}", other),
        }
    }

    #[test]
    fn test_whole_system_filters_by_mask() {
        let assembler = DocumentAssembler::new(
            registry(vec![("db", Some(db_fragment())), ("files", Some(files_fragment()))]),
            role_authorizer(VerbMask::GET),
            Settings::default(),
        );

        let doc = assembler.whole_system(&AccessProfile::role(1), false);

        assert!(doc.operation("/db/_table", "get").is_some());
        assert!(doc.operation("/db/_table", "post").is_none());
        assert!(doc.paths["/db/_table"].contains_key("parameters"));
        assert!(doc.operation("/files", "get").is_some());
        assert!(!doc.paths.contains_key("/files/{path}"));

        let op = doc.operation("/files", "get").unwrap();
        assert_eq!(op.tag_names(), ["files"]);

        let tags: Vec<&str> = doc.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tags, vec!["db", "files"]);
        assert_eq!(doc.servers[0].url, "/api/v2");
    }

    #[test]
    fn test_administrator_sees_everything() {
        let mut authorizer = MockAuthorizer::new();
        authorizer.expect_is_administrator().returning(|_| true);
        authorizer.expect_service_permissions().never();

        let assembler = DocumentAssembler::new(
            registry(vec![("db", Some(db_fragment())), ("files", Some(files_fragment()))]),
            authorizer,
            Settings::default(),
        );

        let doc = assembler.whole_system(&AccessProfile::administrator(), false);
        assert!(doc.operation("/db/_table", "post").is_some());
        assert!(doc.operation("/files/{path}", "delete").is_some());
    }

    #[test]
    fn test_failing_and_empty_services_are_skipped() {
        let mut registry = MockServiceRegistry::new();
        registry
            .expect_list_visible_service_names()
            .returning(|_| vec!["broken".into(), "cache".into(), "db".into()]);
        registry.expect_resolve().returning(|name| match name {
            "broken" => Some(failing_handle("broken")),
            "cache" => Some(handle("cache", None)),
            "db" => Some(handle("db", Some(db_fragment()))),
            _ => None,
        });

        let assembler =
            DocumentAssembler::new(registry, role_authorizer(VerbMask::ALL), Settings::default());

        let doc = assembler.whole_system(&AccessProfile::role(1), false);
        let tags: Vec<&str> = doc.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tags, vec!["db"]);
        assert!(doc.paths.contains_key("/db"));
    }

    #[test]
    fn test_system_error_response_survives_service_override() {
        let assembler = DocumentAssembler::new(
            registry(vec![("db", Some(db_fragment()))]),
            role_authorizer(VerbMask::ALL),
            Settings::default(),
        );

        let doc = assembler.whole_system(&AccessProfile::role(1), false);
        assert_eq!(
            doc.component("responses", "Error").unwrap()["description"],
            "Error Response"
        );
        assert!(doc.component("schemas", "Record").is_some());

        let default = &doc.operation("/db", "get").unwrap().responses.as_ref().unwrap()["default"];
        assert_eq!(default["$ref"], "#/components/responses/Error");
    }

    #[test]
    fn test_whole_system_is_cached_per_role() {
        let mut registry = MockServiceRegistry::new();
        registry
            .expect_list_visible_service_names()
            .times(1)
            .returning(|_| vec!["db".into()]);
        registry
            .expect_resolve()
            .returning(|name| Some(handle(name, Some(db_fragment()))));

        let assembler =
            DocumentAssembler::new(registry, role_authorizer(VerbMask::GET), Settings::default());

        let first = assembler.whole_system(&AccessProfile::role(1), false);
        let second = assembler.whole_system(&AccessProfile::role(1), false);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(assembler.cache().len(), 1);
    }

    #[test]
    fn test_role_invalidation_rebuilds_with_new_permissions() {
        let mask = Arc::new(AtomicU32::new(VerbMask::GET.bits()));
        let current = Arc::clone(&mask);

        let mut authorizer = MockAuthorizer::new();
        authorizer.expect_is_administrator().returning(|_| false);
        authorizer
            .expect_allows_service_access()
            .returning(|_, _| true);
        authorizer
            .expect_service_permissions()
            .returning(move |_, _, _| VerbMask::from_bits(current.load(Ordering::SeqCst)));

        let assembler = DocumentAssembler::new(
            registry(vec![("db", Some(db_fragment()))]),
            authorizer,
            Settings::default(),
        );
        let caller = AccessProfile::role(7);

        let before = assembler.whole_system(&caller, false);
        assert!(before.operation("/db/_table", "post").is_none());

        mask.store((VerbMask::GET | VerbMask::POST).bits(), Ordering::SeqCst);
        let stale = assembler.whole_system(&caller, false);
        assert!(stale.operation("/db/_table", "post").is_none());

        assembler.cache().handle_event(&CacheEvent::RoleModified(7));
        let after = assembler.whole_system(&caller, false);
        assert!(after.operation("/db/_table", "post").is_some());
    }

    #[test]
    fn test_invalidation_during_build_is_not_cached() {
        let cache = Arc::new(ResponseCache::new());
        let mask = Arc::new(AtomicU32::new(VerbMask::GET.bits()));
        let fired = Arc::new(AtomicBool::new(false));

        let mut authorizer = MockAuthorizer::new();
        authorizer.expect_is_administrator().returning(|_| false);
        authorizer
            .expect_allows_service_access()
            .returning(|_, _| true);
        {
            let cache = Arc::clone(&cache);
            let mask = Arc::clone(&mask);
            authorizer
                .expect_service_permissions()
                .returning(move |_, _, _| {
                    let current = VerbMask::from_bits(mask.load(Ordering::SeqCst));
                    if !fired.swap(true, Ordering::SeqCst) {
                        // Role grants widen while the first build is still running
                        mask.store((VerbMask::GET | VerbMask::POST).bits(), Ordering::SeqCst);
                        cache.handle_event(&CacheEvent::RoleModified(7));
                    }
                    current
                });
        }

        let assembler = DocumentAssembler::with_cache(
            registry(vec![("db", Some(db_fragment()))]),
            authorizer,
            Settings::default(),
            Arc::clone(&cache),
        );
        let caller = AccessProfile::role(7);

        assembler.whole_system(&caller, false);
        assert!(cache.is_empty());

        let next = assembler.whole_system(&caller, false);
        assert!(next.operation("/db/_table", "post").is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_service_with_nothing_visible_still_tagged() {
        let mut authorizer = MockAuthorizer::new();
        authorizer.expect_is_administrator().returning(|_| false);
        authorizer
            .expect_allows_service_access()
            .returning(|_, _| true);
        authorizer
            .expect_service_permissions()
            .returning(|_, service, _| {
                if service == "db" {
                    VerbMask::GET
                } else {
                    VerbMask::NONE
                }
            });

        let assembler = DocumentAssembler::new(
            registry(vec![("db", Some(db_fragment())), ("files", Some(files_fragment()))]),
            authorizer,
            Settings::default(),
        );

        let doc = assembler.whole_system(&AccessProfile::role(1), false);
        let tags: Vec<&str> = doc.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tags, vec!["db", "files"]);
        assert!(!doc.paths.keys().any(|path| path.starts_with("/files")));
    }

    #[test]
    fn test_colliding_prefixed_keys_keep_first_entry() {
        let fragment = json!({
            "paths": {
                "/_table": { "get": { "operationId": "first" } },
                "_table": {
                    "get": { "operationId": "second" },
                    "post": { "operationId": "create" }
                }
            }
        });
        let mut authorizer = MockAuthorizer::new();
        authorizer.expect_is_administrator().returning(|_| true);

        let assembler = DocumentAssembler::new(
            registry(vec![("db", Some(fragment))]),
            authorizer,
            Settings::default(),
        );

        let doc = assembler.whole_system(&AccessProfile::administrator(), false);
        let item = &doc.paths["/db/_table"];
        assert_eq!(item.len(), 2);
        assert_eq!(
            doc.operation("/db/_table", "get")
                .and_then(|op| op.operation_id.as_deref()),
            Some("first")
        );
        assert!(doc.operation("/db/_table", "post").is_some());
    }

    #[test]
    fn test_force_refresh_bypasses_cache() {
        let mut registry = MockServiceRegistry::new();
        registry
            .expect_list_visible_service_names()
            .times(2)
            .returning(|_| vec!["db".into()]);
        registry
            .expect_resolve()
            .returning(|name| Some(handle(name, Some(db_fragment()))));

        let assembler =
            DocumentAssembler::new(registry, role_authorizer(VerbMask::GET), Settings::default());

        let request = DocRequest {
            force_refresh: true,
            ..DocRequest::whole_system()
        };
        assembler.whole_system(&AccessProfile::role(1), false);
        document(assembler.handle(&AccessProfile::role(1), &request).unwrap());
        assert_eq!(assembler.cache().len(), 1);
    }

    #[test]
    fn test_anonymous_caller_is_not_cached() {
        let assembler = DocumentAssembler::new(
            registry(vec![("db", Some(db_fragment()))]),
            role_authorizer(VerbMask::GET),
            Settings::default(),
        );

        assembler.whole_system(&AccessProfile::anonymous(), false);
        assert!(assembler.cache().is_empty());
    }

    #[test]
    fn test_single_service_forbidden() {
        let assembler = DocumentAssembler::new(
            registry(vec![("db", Some(db_fragment()))]),
            role_authorizer(VerbMask::NONE),
            Settings::default(),
        );

        let result = assembler.handle(&AccessProfile::role(1), &DocRequest::service("db"));
        assert!(matches!(result, Err(ApiDocError::Forbidden(name)) if name == "db"));
    }

    #[test]
    fn test_single_service_unavailable() {
        let assembler = DocumentAssembler::new(
            registry(vec![("cache", None)]),
            role_authorizer(VerbMask::GET),
            Settings::default(),
        );

        let result = assembler.single_service(&AccessProfile::role(1), "cache", false);
        assert!(matches!(result, Err(ApiDocError::ServiceUnavailable(_))));
    }

    #[test]
    fn test_single_service_not_found() {
        let assembler = DocumentAssembler::new(
            registry(vec![]),
            role_authorizer(VerbMask::GET),
            Settings::default(),
        );

        let result = assembler.single_service(&AccessProfile::role(1), "mail", false);
        assert!(matches!(result, Err(ApiDocError::NotFound(_))));
    }

    #[test]
    fn test_single_service_document() {
        let assembler = DocumentAssembler::new(
            registry(vec![("files", Some(files_fragment()))]),
            role_authorizer(VerbMask::GET),
            Settings::default(),
        );

        let doc = assembler
            .single_service(&AccessProfile::role(1), "files", false)
            .unwrap();

        assert_eq!(doc.info.title, "files label");
        assert_eq!(doc.info.description.as_deref(), Some("files description"));
        assert_eq!(doc.servers[0].url, "/api/v2/files");
        assert!(doc.paths.contains_key("/"));
        assert_eq!(doc.operation("/", "get").unwrap().tag_names(), ["storage", "files"]);
        assert!(assembler.cache().is_empty());
    }

    #[test]
    fn test_listing_views() {
        let mut authorizer = MockAuthorizer::new();
        authorizer.expect_is_administrator().returning(|_| false);
        authorizer
            .expect_allows_service_access()
            .returning(|_, service| service == "db");

        let assembler = DocumentAssembler::new(
            registry(vec![("db", Some(db_fragment())), ("files", Some(files_fragment()))]),
            authorizer,
            Settings::default(),
        );
        let caller = AccessProfile::role(1);

        let resources = assembler
            .handle(
                &caller,
                &DocRequest {
                    as_resources: true,
                    ..DocRequest::default()
                },
            )
            .unwrap();
        assert_eq!(
            resources,
            DocResponse::Listing(json!({
                "resource": [ { "name": "db", "label": "db label", "type": "test" } ]
            }))
        );

        let access = assembler
            .handle(
                &caller,
                &DocRequest {
                    as_access_list: true,
                    ..DocRequest::default()
                },
            )
            .unwrap();
        assert_eq!(
            access,
            DocResponse::Listing(json!({ "resource": ["", "*", "db"] }))
        );
        assert!(assembler.cache().is_empty());
    }

    #[test]
    fn test_access_list_empty_without_grants() {
        let assembler = DocumentAssembler::new(
            registry(vec![("db", Some(db_fragment()))]),
            role_authorizer(VerbMask::NONE),
            Settings::default(),
        );

        let access = assembler
            .handle(
                &AccessProfile::role(1),
                &DocRequest {
                    as_access_list: true,
                    ..DocRequest::default()
                },
            )
            .unwrap();
        assert_eq!(access, DocResponse::Listing(json!({ "resource": [] })));
    }
}
