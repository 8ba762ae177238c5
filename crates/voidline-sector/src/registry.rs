//! Type-name keyed save/load table for world bodies.
//!
//! A record is `{ "type": <name>, "fields": { ... } }`. Saving or loading a
//! type without a registered codec is a hard error: dropping a record would
//! quietly corrupt the sector on the next load.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use voidline_core::entities::{Body, Moon, Npc, Planet, Station};

use crate::context::ResolutionContext;
use crate::error::PersistError;

/// Plain key/value map produced by a saver.
pub type FieldMap = serde_json::Map<String, Value>;

/// One persisted entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedEntityRecord {
    #[serde(rename = "type")]
    pub type_name: String,
    pub fields: FieldMap,
}

pub type SaveFn = fn(&Body) -> Result<FieldMap, PersistError>;
pub type LoadFn = fn(&FieldMap, &mut ResolutionContext) -> Result<Body, PersistError>;

/// Save/load pair for one entity type.
#[derive(Debug, Clone, Copy)]
pub struct EntityCodec {
    pub save: SaveFn,
    pub load: LoadFn,
}

/// Result of [`EntitySerializationRegistry::load_all`].
#[derive(Debug)]
pub struct LoadedEntities {
    pub entities: Vec<Body>,
    pub context: ResolutionContext,
}

#[derive(Debug, Clone, Default)]
pub struct EntitySerializationRegistry {
    codecs: HashMap<String, EntityCodec>,
}

impl EntitySerializationRegistry {
    /// Registry with no codecs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with codecs for `Planet`, `Station`, `Moon` and `Npc`.
    pub fn with_default_codecs() -> Self {
        let mut registry = Self::new();
        registry.register(
            "Planet",
            EntityCodec {
                save: save_planet,
                load: load_planet,
            },
        );
        registry.register(
            "Station",
            EntityCodec {
                save: save_station,
                load: load_station,
            },
        );
        registry.register(
            "Moon",
            EntityCodec {
                save: save_moon,
                load: load_moon,
            },
        );
        registry.register(
            "Npc",
            EntityCodec {
                save: save_npc,
                load: load_npc,
            },
        );
        registry
    }

    /// Register or replace the codec for `type_name`. Returns the replaced codec.
    pub fn register(&mut self, type_name: impl Into<String>, codec: EntityCodec) -> Option<EntityCodec> {
        self.codecs.insert(type_name.into(), codec)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.codecs.contains_key(type_name)
    }

    fn codec(&self, type_name: &str) -> Result<&EntityCodec, PersistError> {
        self.codecs
            .get(type_name)
            .ok_or_else(|| PersistError::UnknownType {
                type_name: type_name.to_string(),
            })
    }

    pub fn save(&self, body: &Body) -> Result<PersistedEntityRecord, PersistError> {
        let type_name = body.type_name();
        let codec = self.codec(type_name)?;
        Ok(PersistedEntityRecord {
            type_name: type_name.to_string(),
            fields: (codec.save)(body)?,
        })
    }

    /// Save every body, failing on the first unregistered type.
    pub fn save_all<'a>(
        &self,
        bodies: impl IntoIterator<Item = &'a Body>,
    ) -> Result<Vec<PersistedEntityRecord>, PersistError> {
        bodies.into_iter().map(|body| self.save(body)).collect()
    }

    pub fn load(
        &self,
        record: &PersistedEntityRecord,
        context: &mut ResolutionContext,
    ) -> Result<Body, PersistError> {
        let codec = self.codec(&record.type_name)?;
        (codec.load)(&record.fields, context)
    }

    /// Load records in order through a caller-owned context. The caller is
    /// responsible for calling [`ResolutionContext::finish`].
    pub fn load_all_into(
        &self,
        records: &[PersistedEntityRecord],
        context: &mut ResolutionContext,
    ) -> Result<Vec<Body>, PersistError> {
        records
            .iter()
            .map(|record| self.load(record, context))
            .collect()
    }

    /// Load records in order with a fresh context and close it.
    pub fn load_all(&self, records: &[PersistedEntityRecord]) -> Result<LoadedEntities, PersistError> {
        let mut context = ResolutionContext::new();
        let entities = self.load_all_into(records, &mut context)?;
        context.finish();
        Ok(LoadedEntities { entities, context })
    }
}

// --- Default codecs ---

fn to_fields<T: Serialize>(type_name: &str, value: &T) -> Result<FieldMap, PersistError> {
    let value = serde_json::to_value(value).map_err(|source| PersistError::Malformed {
        type_name: type_name.to_string(),
        source,
    })?;
    match value {
        Value::Object(fields) => Ok(fields),
        _ => Err(PersistError::NotAnObject {
            type_name: type_name.to_string(),
        }),
    }
}

fn from_fields<T: DeserializeOwned>(type_name: &str, fields: &FieldMap) -> Result<T, PersistError> {
    serde_json::from_value(Value::Object(fields.clone())).map_err(|source| PersistError::Malformed {
        type_name: type_name.to_string(),
        source,
    })
}

fn mismatch(expected: &'static str, found: &Body) -> PersistError {
    PersistError::TypeMismatch {
        expected,
        found: found.type_name(),
    }
}

fn save_planet(body: &Body) -> Result<FieldMap, PersistError> {
    match body {
        Body::Planet(planet) => to_fields("Planet", planet),
        other => Err(mismatch("Planet", other)),
    }
}

fn load_planet(fields: &FieldMap, context: &mut ResolutionContext) -> Result<Body, PersistError> {
    let planet: Planet = from_fields("Planet", fields)?;
    context.register_planet(planet.clone());
    Ok(Body::Planet(planet))
}

fn save_station(body: &Body) -> Result<FieldMap, PersistError> {
    match body {
        Body::Station(station) => to_fields("Station", station),
        other => Err(mismatch("Station", other)),
    }
}

fn load_station(fields: &FieldMap, context: &mut ResolutionContext) -> Result<Body, PersistError> {
    let station: Station = from_fields("Station", fields)?;
    context.resolve_host(&station.host, &station.name);
    Ok(Body::Station(station))
}

fn save_moon(body: &Body) -> Result<FieldMap, PersistError> {
    match body {
        Body::Moon(moon) => to_fields("Moon", moon),
        other => Err(mismatch("Moon", other)),
    }
}

fn load_moon(fields: &FieldMap, context: &mut ResolutionContext) -> Result<Body, PersistError> {
    let moon: Moon = from_fields("Moon", fields)?;
    context.resolve_host(&moon.host, &moon.name);
    Ok(Body::Moon(moon))
}

fn save_npc(body: &Body) -> Result<FieldMap, PersistError> {
    match body {
        Body::Npc(npc) => to_fields("Npc", npc),
        other => Err(mismatch("Npc", other)),
    }
}

fn load_npc(fields: &FieldMap, _context: &mut ResolutionContext) -> Result<Body, PersistError> {
    from_fields::<Npc>("Npc", fields).map(Body::Npc)
}
