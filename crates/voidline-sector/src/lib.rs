//! Persistence and live state for Voidline sectors.
//!
//! A sector is its seed plus a diff. The diff holds the destroyed asteroid
//! ids and the entities that diverged from generation; everything else is
//! regenerated on entry. `SectorCoordinator` owns the active sector, builds
//! it from definition plus diff and writes the diff back on exit.

pub mod context;
pub mod coordinator;
pub mod diff;
pub mod error;
pub mod live;
pub mod registry;
pub mod storage;
pub mod systems;

pub use context::{LoadDiagnostic, ResolutionContext};
pub use coordinator::{CoordinatorConfig, Procedural, SectorCoordinator, SectorDefinition};
pub use diff::SectorDiff;
pub use error::PersistError;
pub use live::LiveSector;
pub use registry::{
    EntityCodec, EntitySerializationRegistry, FieldMap, LoadedEntities, PersistedEntityRecord,
};
pub use storage::{DiffStorage, JsonDirDiffStorage, MemoryDiffStorage};
