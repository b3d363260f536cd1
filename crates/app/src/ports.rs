//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They live here (in `app`) so that both the use-case layer and the adapter
//! layer can depend on them without creating circular dependencies.

pub mod capability;
pub mod config_entry_repo;
pub mod event_bus;
pub mod integration;

pub use capability::{Readable, Streamable, Toggleable};
pub use config_entry_repo::ConfigEntryRepository;
pub use event_bus::EventPublisher;
pub use integration::Integration;
