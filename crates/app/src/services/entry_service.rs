//! Entry service: lifecycle of config entries.
//!
//! Creates entries from the config flow, restores persisted entries at
//! startup, unloads them, and routes state queries and service calls to the
//! integration. The device registry and the integration share one lock so
//! that setup, unload and service calls never interleave.

use std::collections::HashMap;

use tokio::sync::Mutex;

use reachy_mini_domain::config_entry::ConfigEntry;
use reachy_mini_domain::endpoint::DeviceKey;
use reachy_mini_domain::entity::{EntityDescriptor, EntityKind, EntitySnapshot, parse_unique_id};
use reachy_mini_domain::error::{NotFoundError, ReachyError};
use reachy_mini_domain::event::{Event, EventType};
use reachy_mini_domain::id::EntryId;
use reachy_mini_domain::service::Service;

use crate::ports::{ConfigEntryRepository, EventPublisher, Integration};
use crate::registry::DeviceRegistry;
use crate::services::config_flow::{self, FlowResult, FlowStep, UserInput};

/// Loaded state guarded by the lifecycle lock.
struct Lifecycle<I> {
    registry: DeviceRegistry,
    integration: I,
    loaded: HashMap<EntryId, DeviceKey>,
}

impl<I: Integration + Send + Sync> Lifecycle<I> {
    /// Register the entry's device key and set up its entities. The key is
    /// released again if the integration fails.
    async fn setup_entry(
        &mut self,
        entry: &ConfigEntry,
    ) -> Result<Vec<EntityDescriptor>, ReachyError> {
        let key = entry.device_key();
        self.registry.register(key.clone())?;

        match self.integration.setup(entry).await {
            Ok(descriptors) => {
                tracing::info!(
                    entry_id = %entry.entry_id,
                    device_key = %key,
                    integration = self.integration.name(),
                    entities = descriptors.len(),
                    "config entry set up"
                );
                self.loaded.insert(entry.entry_id, key);
                Ok(descriptors)
            }
            Err(err) => {
                self.registry.unregister(&key);
                Err(err)
            }
        }
    }

    fn ensure_loaded(&self, entry_id: EntryId) -> Result<(), ReachyError> {
        if self.loaded.contains_key(&entry_id) {
            Ok(())
        } else {
            Err(entry_not_found(entry_id))
        }
    }
}

fn entry_not_found(entry_id: EntryId) -> ReachyError {
    NotFoundError {
        entity: "ConfigEntry",
        id: entry_id.to_string(),
    }
    .into()
}

/// Application service owning the device registry and the integration.
pub struct EntryService<R, I, EP> {
    repo: R,
    events: EP,
    lifecycle: Mutex<Lifecycle<I>>,
}

impl<R, I, EP> EntryService<R, I, EP>
where
    R: ConfigEntryRepository + Send + Sync,
    I: Integration + Send + Sync,
    EP: EventPublisher + Send + Sync,
{
    pub fn new(repo: R, integration: I, events: EP) -> Self {
        Self {
            repo,
            events,
            lifecycle: Mutex::new(Lifecycle {
                registry: DeviceRegistry::new(),
                integration,
                loaded: HashMap::new(),
            }),
        }
    }

    /// Handle a submission of the `user` step.
    ///
    /// # Errors
    ///
    /// Returns a storage or integration error. Validation problems and
    /// duplicates are reported through the [`FlowResult`], not as errors.
    #[tracing::instrument(skip_all)]
    pub async fn submit_user_step(
        &self,
        input: Option<UserInput>,
    ) -> Result<FlowResult, ReachyError> {
        let mut lifecycle = self.lifecycle.lock().await;

        let endpoint = match config_flow::step_user(&lifecycle.registry, input) {
            FlowStep::ShowForm { errors } => return Ok(FlowResult::form(errors)),
            FlowStep::Abort { reason } => return Ok(FlowResult::Abort { reason }),
            FlowStep::Create { endpoint } => endpoint,
        };

        if let Some(stored) = self.repo.find_by_device_key(&endpoint.key()).await? {
            tracing::warn!(
                entry_id = %stored.entry_id,
                device_key = %endpoint.key(),
                "device stored but not loaded"
            );
            return Ok(FlowResult::already_configured());
        }

        tracing::info!(%endpoint, "setting up Reachy Mini");
        let entry = match self.repo.create(ConfigEntry::builder(endpoint).build()).await {
            Ok(entry) => entry,
            Err(ReachyError::Duplicate(err)) => {
                tracing::warn!(device_key = %err.device_key, "entry already stored");
                return Ok(FlowResult::already_configured());
            }
            Err(err) => return Err(err),
        };

        let entities = match lifecycle.setup_entry(&entry).await {
            Ok(entities) => entities,
            Err(err) => {
                if let Err(cleanup) = self.repo.delete(entry.entry_id).await {
                    tracing::error!(
                        entry_id = %entry.entry_id,
                        error = %cleanup,
                        "failed to delete entry after setup failure"
                    );
                }
                return Err(err);
            }
        };

        self.events
            .publish(Event::new(
                EventType::EntryCreated,
                Some(entry.entry_id),
                serde_json::json!({
                    "title": entry.title,
                    "device_key": entry.device_key(),
                }),
            ))
            .await?;

        Ok(FlowResult::CreateEntry { entry, entities })
    }

    /// Set up every persisted entry. Entries whose device key is already
    /// loaded are skipped. Returns the number of entries loaded.
    ///
    /// # Errors
    ///
    /// Returns a storage or integration error.
    #[tracing::instrument(skip_all)]
    pub async fn restore_entries(&self) -> Result<usize, ReachyError> {
        let entries = self.repo.get_all().await?;
        let mut lifecycle = self.lifecycle.lock().await;
        let mut restored = 0;

        for entry in entries {
            if lifecycle.loaded.contains_key(&entry.entry_id) {
                continue;
            }
            match lifecycle.setup_entry(&entry).await {
                Ok(_) => restored += 1,
                Err(ReachyError::Duplicate(err)) => {
                    tracing::warn!(
                        entry_id = %entry.entry_id,
                        device_key = %err.device_key,
                        "skipping stored entry for an already registered device"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        Ok(restored)
    }

    /// Unload and delete an entry, releasing its device key.
    ///
    /// Returns `false` when the integration refused to unload, in which case
    /// the entry stays loaded and stored. The key is only released once the
    /// entry is gone from storage; a failed delete sets the entry up again.
    ///
    /// # Errors
    ///
    /// Returns [`ReachyError::NotFound`] for an unknown entry, or a storage
    /// error.
    #[tracing::instrument(skip(self))]
    pub async fn unload_entry(&self, entry_id: EntryId) -> Result<bool, ReachyError> {
        let mut lifecycle = self.lifecycle.lock().await;

        let Some(key) = lifecycle.loaded.get(&entry_id).cloned() else {
            // Stored but never loaded (e.g. skipped at restore): just drop it.
            return if self.repo.delete(entry_id).await? {
                Ok(true)
            } else {
                Err(entry_not_found(entry_id))
            };
        };

        let entry = self.get_entry(entry_id).await?;
        if !lifecycle.integration.teardown(entry_id).await? {
            return Ok(false);
        }
        if let Err(err) = self.repo.delete(entry_id).await {
            tracing::error!(
                %entry_id,
                error = %err,
                "failed to delete config entry, reloading it"
            );
            if let Err(reload) = lifecycle.integration.setup(&entry).await {
                tracing::error!(%entry_id, error = %reload, "failed to reload config entry");
                lifecycle.registry.unregister(&key);
                lifecycle.loaded.remove(&entry_id);
            }
            return Err(err);
        }
        lifecycle.registry.unregister(&key);
        lifecycle.loaded.remove(&entry_id);
        tracing::info!(%entry_id, device_key = %key, "config entry unloaded");

        self.events
            .publish(Event::new(
                EventType::EntryRemoved,
                Some(entry_id),
                serde_json::json!({ "device_key": key }),
            ))
            .await?;

        Ok(true)
    }

    /// # Errors
    ///
    /// Returns a storage error.
    pub async fn list_entries(&self) -> Result<Vec<ConfigEntry>, ReachyError> {
        self.repo.get_all().await
    }

    /// # Errors
    ///
    /// Returns [`ReachyError::NotFound`] for an unknown entry, or a storage
    /// error.
    pub async fn get_entry(&self, entry_id: EntryId) -> Result<ConfigEntry, ReachyError> {
        self.repo
            .get_by_id(entry_id)
            .await?
            .ok_or_else(|| entry_not_found(entry_id))
    }

    /// Whether a loaded entry currently owns `key`.
    pub async fn is_registered(&self, key: &DeviceKey) -> bool {
        self.lifecycle.lock().await.registry.contains(key)
    }

    /// Refresh and return the snapshots of every entity of an entry.
    ///
    /// # Errors
    ///
    /// Returns [`ReachyError::NotFound`] when the entry is not loaded.
    pub async fn entity_states(
        &self,
        entry_id: EntryId,
    ) -> Result<Vec<EntitySnapshot>, ReachyError> {
        let lifecycle = self.lifecycle.lock().await;
        lifecycle.ensure_loaded(entry_id)?;
        lifecycle.integration.refresh(entry_id).await
    }

    /// Call `service` (`turn_on`, `turn_off`, `toggle`) on the entity with
    /// `unique_id` and publish the resulting state.
    ///
    /// # Errors
    ///
    /// Returns [`ReachyError::Validation`] for a malformed unique id or an
    /// unknown service, [`ReachyError::NotFound`] when the entry is not loaded.
    #[tracing::instrument(skip(self))]
    pub async fn call_service(
        &self,
        unique_id: &str,
        service: &str,
    ) -> Result<EntitySnapshot, ReachyError> {
        let (entry_id, kind) = parse_unique_id(unique_id)?;
        let service: Service = service.parse()?;

        let snapshot = {
            let lifecycle = self.lifecycle.lock().await;
            lifecycle.ensure_loaded(entry_id)?;
            lifecycle
                .integration
                .handle_service_call(entry_id, kind, service)
                .await?
        };

        self.events
            .publish(Event::new(
                EventType::StateChanged,
                Some(entry_id),
                serde_json::json!({
                    "unique_id": snapshot.unique_id,
                    "service": service,
                    "state": snapshot.state,
                }),
            ))
            .await?;

        Ok(snapshot)
    }

    /// A still image from the camera entity with `unique_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ReachyError::Validation`] for a malformed unique id,
    /// [`ReachyError::NotFound`] when the entry is not loaded.
    pub async fn camera_image(
        &self,
        unique_id: &str,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<Option<Vec<u8>>, ReachyError> {
        let (entry_id, kind) = resolve_camera(unique_id)?;
        let lifecycle = self.lifecycle.lock().await;
        lifecycle.ensure_loaded(entry_id)?;
        lifecycle
            .integration
            .camera_image(entry_id, kind, width, height)
            .await
    }

    /// The stream URL of the camera entity with `unique_id`.
    ///
    /// # Errors
    ///
    /// Same as [`camera_image`](Self::camera_image).
    pub async fn stream_source(&self, unique_id: &str) -> Result<Option<String>, ReachyError> {
        let (entry_id, kind) = resolve_camera(unique_id)?;
        let lifecycle = self.lifecycle.lock().await;
        lifecycle.ensure_loaded(entry_id)?;
        lifecycle.integration.stream_source(entry_id, kind).await
    }
}

fn resolve_camera(unique_id: &str) -> Result<(EntryId, EntityKind), ReachyError> {
    let (entry_id, kind) = parse_unique_id(unique_id)?;
    if kind != EntityKind::TeleopCamera {
        return Err(NotFoundError {
            entity: "Camera",
            id: unique_id.to_string(),
        }
        .into());
    }
    Ok((entry_id, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reachy_mini_domain::endpoint::derive_device_key;
    use reachy_mini_domain::entity::EntityState;
    use reachy_mini_domain::error::DuplicateDeviceError;
    use reachy_mini_domain::time::now;
    use std::collections::HashSet;
    use std::future::Future;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex as StdMutex};

    use crate::event_bus::InProcessEventBus;

    #[derive(Default)]
    struct InMemoryEntryRepo {
        store: StdMutex<HashMap<EntryId, ConfigEntry>>,
        fail_delete: AtomicBool,
    }

    impl ConfigEntryRepository for InMemoryEntryRepo {
        fn create(
            &self,
            entry: ConfigEntry,
        ) -> impl Future<Output = Result<ConfigEntry, ReachyError>> + Send {
            let mut store = self.store.lock().unwrap();
            let result = if store.values().any(|e| e.device_key() == entry.device_key()) {
                Err(DuplicateDeviceError {
                    device_key: entry.device_key(),
                }
                .into())
            } else {
                store.insert(entry.entry_id, entry.clone());
                Ok(entry)
            };
            async { result }
        }

        fn get_by_id(
            &self,
            entry_id: EntryId,
        ) -> impl Future<Output = Result<Option<ConfigEntry>, ReachyError>> + Send {
            let result = self.store.lock().unwrap().get(&entry_id).cloned();
            async { Ok(result) }
        }

        fn find_by_device_key(
            &self,
            device_key: &DeviceKey,
        ) -> impl Future<Output = Result<Option<ConfigEntry>, ReachyError>> + Send {
            let result = self
                .store
                .lock()
                .unwrap()
                .values()
                .find(|e| &e.device_key() == device_key)
                .cloned();
            async { Ok(result) }
        }

        fn get_all(&self) -> impl Future<Output = Result<Vec<ConfigEntry>, ReachyError>> + Send {
            let mut result: Vec<ConfigEntry> =
                self.store.lock().unwrap().values().cloned().collect();
            result.sort_by_key(|e| e.created_at);
            async { Ok(result) }
        }

        fn delete(
            &self,
            entry_id: EntryId,
        ) -> impl Future<Output = Result<bool, ReachyError>> + Send {
            let result = if self.fail_delete.load(Ordering::SeqCst) {
                Err(ReachyError::Storage("database is locked".into()))
            } else {
                Ok(self.store.lock().unwrap().remove(&entry_id).is_some())
            };
            async move { result }
        }
    }

    /// Integration that records loaded entries and keeps switch flags.
    #[derive(Default)]
    struct FakeIntegration {
        loaded: HashMap<EntryId, Vec<EntityDescriptor>>,
        switches: StdMutex<HashSet<(EntryId, EntityKind)>>,
        refuse_teardown: bool,
        fail_setup: bool,
    }

    impl FakeIntegration {
        fn descriptor(
            &self,
            entry_id: EntryId,
            kind: EntityKind,
        ) -> Result<EntityDescriptor, ReachyError> {
            self.loaded
                .get(&entry_id)
                .and_then(|all| all.iter().find(|d| d.kind == kind))
                .cloned()
                .ok_or_else(|| entry_not_found(entry_id))
        }
    }

    impl Integration for FakeIntegration {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn setup(
            &mut self,
            entry: &ConfigEntry,
        ) -> Result<Vec<EntityDescriptor>, ReachyError> {
            if self.fail_setup {
                return Err(ReachyError::Device("robot unreachable".into()));
            }
            let descriptors = EntityDescriptor::all_for(entry.entry_id, &entry.device_key());
            self.loaded.insert(entry.entry_id, descriptors.clone());
            Ok(descriptors)
        }

        async fn teardown(&mut self, entry_id: EntryId) -> Result<bool, ReachyError> {
            if self.refuse_teardown {
                return Ok(false);
            }
            Ok(self.loaded.remove(&entry_id).is_some())
        }

        async fn refresh(&self, entry_id: EntryId) -> Result<Vec<EntitySnapshot>, ReachyError> {
            let all = self.loaded.get(&entry_id).cloned().unwrap_or_default();
            Ok(all
                .into_iter()
                .map(|d| EntitySnapshot::new(d, EntityState::Unknown, now()))
                .collect())
        }

        async fn handle_service_call(
            &self,
            entry_id: EntryId,
            kind: EntityKind,
            service: Service,
        ) -> Result<EntitySnapshot, ReachyError> {
            let descriptor = self.descriptor(entry_id, kind)?;
            let mut switches = self.switches.lock().unwrap();
            let is_on = service.apply(switches.contains(&(entry_id, kind)));
            if is_on {
                switches.insert((entry_id, kind));
            } else {
                switches.remove(&(entry_id, kind));
            }
            Ok(EntitySnapshot::new(
                descriptor,
                EntityState::from_switch(is_on),
                now(),
            ))
        }

        async fn camera_image(
            &self,
            entry_id: EntryId,
            kind: EntityKind,
            _width: Option<u32>,
            _height: Option<u32>,
        ) -> Result<Option<Vec<u8>>, ReachyError> {
            self.descriptor(entry_id, kind)?;
            Ok(None)
        }

        async fn stream_source(
            &self,
            entry_id: EntryId,
            kind: EntityKind,
        ) -> Result<Option<String>, ReachyError> {
            self.descriptor(entry_id, kind)?;
            Ok(None)
        }
    }

    type TestService = EntryService<Arc<InMemoryEntryRepo>, FakeIntegration, InProcessEventBus>;

    fn make_service() -> (TestService, Arc<InMemoryEntryRepo>, InProcessEventBus) {
        let repo = Arc::new(InMemoryEntryRepo::default());
        let bus = InProcessEventBus::new(16);
        let svc = EntryService::new(Arc::clone(&repo), FakeIntegration::default(), bus.clone());
        (svc, repo, bus)
    }

    async fn create(svc: &TestService, host: &str, port: i64) -> FlowResult {
        svc.submit_user_step(Some(UserInput::new(host, Some(port))))
            .await
            .unwrap()
    }

    fn created_entry(result: FlowResult) -> (ConfigEntry, Vec<EntityDescriptor>) {
        match result {
            FlowResult::CreateEntry { entry, entities } => (entry, entities),
            other => panic!("expected create_entry, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn should_create_entry_with_six_entities() {
        let (svc, repo, _) = make_service();

        let (entry, entities) = created_entry(create(&svc, "10.0.0.5", 8000).await);
        assert_eq!(entry.title, "Reachy Mini (10.0.0.5)");
        assert_eq!(entities.len(), 6);
        assert!(svc.is_registered(&derive_device_key("10.0.0.5", 8000)).await);
        assert!(repo.get_by_id(entry.entry_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn should_abort_second_registration_of_same_device() {
        let (svc, repo, _) = make_service();

        created_entry(create(&svc, "10.0.0.5", 8000).await);
        let second = create(&svc, "10.0.0.5", 8000).await;
        assert_eq!(second, FlowResult::already_configured());

        let third = create(&svc, "10.0.0.5", 8001).await;
        let (entry, _) = created_entry(third);
        assert_eq!(entry.device_key().as_str(), "10.0.0.5:8001");
        assert_eq!(repo.get_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn should_return_form_errors_without_registering() {
        let (svc, repo, _) = make_service();

        let result = create(&svc, "10.0.0.5", 0).await;
        assert!(matches!(result, FlowResult::Form { ref errors, .. } if errors.contains_key("port")));
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_publish_entry_created_event() {
        let (svc, _, bus) = make_service();
        let mut rx = bus.subscribe();

        let (entry, _) = created_entry(create(&svc, "10.0.0.5", 8000).await);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type, EventType::EntryCreated);
        assert_eq!(event.entry_id, Some(entry.entry_id));
        assert_eq!(event.data["device_key"], "10.0.0.5:8000");
    }

    #[tokio::test]
    async fn should_release_key_when_entry_unloaded() {
        let (svc, repo, _) = make_service();
        let (entry, _) = created_entry(create(&svc, "10.0.0.5", 8000).await);

        assert!(svc.unload_entry(entry.entry_id).await.unwrap());
        assert!(!svc.is_registered(&entry.device_key()).await);
        assert!(repo.get_by_id(entry.entry_id).await.unwrap().is_none());

        created_entry(create(&svc, "10.0.0.5", 8000).await);
    }

    #[tokio::test]
    async fn should_keep_entry_when_teardown_refused() {
        let repo = Arc::new(InMemoryEntryRepo::default());
        let integration = FakeIntegration {
            refuse_teardown: true,
            ..FakeIntegration::default()
        };
        let svc = EntryService::new(Arc::clone(&repo), integration, InProcessEventBus::new(4));
        let (entry, _) = created_entry(create(&svc, "10.0.0.5", 8000).await);

        assert!(!svc.unload_entry(entry.entry_id).await.unwrap());
        assert!(svc.is_registered(&entry.device_key()).await);
        assert!(repo.get_by_id(entry.entry_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn should_return_not_found_when_unloading_unknown_entry() {
        let (svc, _, _) = make_service();
        let result = svc.unload_entry(EntryId::new()).await;
        assert!(matches!(result, Err(ReachyError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_restore_stored_entries_and_skip_duplicates() {
        let (svc, repo, _) = make_service();
        for host in ["10.0.0.5", "10.0.0.6"] {
            let endpoint =
                reachy_mini_domain::endpoint::DeviceEndpoint::new(host, 8000).unwrap();
            repo.create(ConfigEntry::builder(endpoint).build())
                .await
                .unwrap();
        }

        assert_eq!(svc.restore_entries().await.unwrap(), 2);
        assert!(svc.is_registered(&derive_device_key("10.0.0.6", 8000)).await);
        assert_eq!(svc.restore_entries().await.unwrap(), 0);

        let again = create(&svc, "10.0.0.6", 8000).await;
        assert_eq!(again, FlowResult::already_configured());
    }

    #[tokio::test]
    async fn should_list_snapshots_for_loaded_entry() {
        let (svc, _, _) = make_service();
        let (entry, _) = created_entry(create(&svc, "10.0.0.5", 8000).await);

        let states = svc.entity_states(entry.entry_id).await.unwrap();
        assert_eq!(states.len(), 6);
        assert!(matches!(
            svc.entity_states(EntryId::new()).await,
            Err(ReachyError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn should_call_service_and_publish_state_change() {
        let (svc, _, bus) = make_service();
        let (entry, _) = created_entry(create(&svc, "10.0.0.5", 8000).await);
        let mut rx = bus.subscribe();
        let unique_id = format!("{}_torque", entry.entry_id);

        let snapshot = svc.call_service(&unique_id, "toggle").await.unwrap();
        assert_eq!(snapshot.state, EntityState::On);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type, EventType::StateChanged);
        assert_eq!(event.data["unique_id"], unique_id.as_str());
        assert_eq!(event.data["state"], "on");
    }

    #[tokio::test]
    async fn should_reject_unknown_service_name() {
        let (svc, _, _) = make_service();
        let (entry, _) = created_entry(create(&svc, "10.0.0.5", 8000).await);
        let unique_id = format!("{}_torque", entry.entry_id);

        let result = svc.call_service(&unique_id, "reboot").await;
        assert!(matches!(result, Err(ReachyError::Validation(_))));
    }

    #[tokio::test]
    async fn should_only_serve_images_for_the_camera() {
        let (svc, _, _) = make_service();
        let (entry, _) = created_entry(create(&svc, "10.0.0.5", 8000).await);

        let camera = format!("{}_teleop_camera", entry.entry_id);
        assert_eq!(svc.camera_image(&camera, None, None).await.unwrap(), None);
        assert_eq!(svc.stream_source(&camera).await.unwrap(), None);

        let battery = format!("{}_battery", entry.entry_id);
        assert!(matches!(
            svc.camera_image(&battery, None, None).await,
            Err(ReachyError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn should_keep_entry_loaded_when_delete_fails() {
        let (svc, repo, _) = make_service();
        let (entry, _) = created_entry(create(&svc, "10.0.0.5", 8000).await);

        repo.fail_delete.store(true, Ordering::SeqCst);
        let result = svc.unload_entry(entry.entry_id).await;
        assert!(matches!(result, Err(ReachyError::Storage(_))));
        assert!(svc.is_registered(&entry.device_key()).await);
        assert!(repo.get_by_id(entry.entry_id).await.unwrap().is_some());
        assert_eq!(svc.entity_states(entry.entry_id).await.unwrap().len(), 6);

        repo.fail_delete.store(false, Ordering::SeqCst);
        assert!(svc.unload_entry(entry.entry_id).await.unwrap());
        assert!(!svc.is_registered(&entry.device_key()).await);
        created_entry(create(&svc, "10.0.0.5", 8000).await);
    }

    #[tokio::test]
    async fn should_abort_when_device_stored_but_not_loaded() {
        let (svc, repo, _) = make_service();
        let endpoint = reachy_mini_domain::endpoint::DeviceEndpoint::new("10.0.0.5", 8000).unwrap();
        repo.create(ConfigEntry::builder(endpoint).build())
            .await
            .unwrap();

        let result = create(&svc, "10.0.0.5", 8000).await;
        assert_eq!(result, FlowResult::already_configured());
        assert!(!svc.is_registered(&derive_device_key("10.0.0.5", 8000)).await);
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_return_setup_error_and_drop_entry_when_integration_fails() {
        let repo = Arc::new(InMemoryEntryRepo::default());
        let integration = FakeIntegration {
            fail_setup: true,
            ..FakeIntegration::default()
        };
        let svc = EntryService::new(Arc::clone(&repo), integration, InProcessEventBus::new(4));

        let result = svc
            .submit_user_step(Some(UserInput::new("10.0.0.5", Some(8000))))
            .await;
        assert!(matches!(result, Err(ReachyError::Device(_))));
        assert!(repo.get_all().await.unwrap().is_empty());
        assert!(!svc.is_registered(&derive_device_key("10.0.0.5", 8000)).await);
    }

    #[tokio::test]
    async fn should_keep_setup_error_when_cleanup_also_fails() {
        let repo = Arc::new(InMemoryEntryRepo::default());
        repo.fail_delete.store(true, Ordering::SeqCst);
        let integration = FakeIntegration {
            fail_setup: true,
            ..FakeIntegration::default()
        };
        let svc = EntryService::new(Arc::clone(&repo), integration, InProcessEventBus::new(4));

        let result = svc
            .submit_user_step(Some(UserInput::new("10.0.0.5", Some(8000))))
            .await;
        assert!(matches!(result, Err(ReachyError::Device(_))));
    }

    #[tokio::test]
    async fn should_create_only_once_for_concurrent_submissions() {
        let (svc, repo, _) = make_service();

        let (first, second) = tokio::join!(
            create(&svc, "10.0.0.5", 8000),
            create(&svc, "10.0.0.5", 8000)
        );

        let results = [first, second];
        let created = results
            .iter()
            .filter(|r| matches!(r, FlowResult::CreateEntry { .. }))
            .count();
        let aborted = results
            .iter()
            .filter(|r| **r == FlowResult::already_configured())
            .count();
        assert_eq!(created, 1);
        assert_eq!(aborted, 1);
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }
}
