//! Load-time side channel for resolving cross-references.
//!
//! Stations and moons name their host planet. Records are loaded in file
//! order, so a station can arrive before its planet. The context then hands
//! out a provisional placeholder which the real planet later supersedes.
//! Every such event is logged and recorded as a [`LoadDiagnostic`]; nothing is
//! merged silently.

use voidline_core::entities::Planet;

/// Something noteworthy that happened while resolving references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadDiagnostic {
    /// A reference named a planet that was not loaded yet.
    PlaceholderCreated { planet: String, referenced_by: String },
    /// A real planet replaced the placeholder of the same name.
    PlaceholderSuperseded { planet: String },
    /// Two real planets share a name; the later one won.
    DuplicatePlanet { planet: String },
    /// No real planet ever arrived; the placeholder stays in use.
    ReferenceUnresolved {
        planet: String,
        referenced_by: Vec<String>,
    },
}

#[derive(Debug, Clone)]
struct PlanetEntry {
    planet: Planet,
    provisional: bool,
    referrers: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ResolutionContext {
    planets: Vec<PlanetEntry>,
    diagnostics: Vec<LoadDiagnostic>,
}

impl ResolutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fully defined planet. Replaces a placeholder or an earlier
    /// planet of the same name (last write wins).
    pub fn register_planet(&mut self, planet: Planet) {
        let Some(index) = self.planets.iter().position(|e| e.planet.name == planet.name) else {
            self.planets.push(PlanetEntry {
                planet,
                provisional: false,
                referrers: Vec::new(),
            });
            return;
        };

        let entry = &mut self.planets[index];
        let name = planet.name.clone();
        if entry.provisional {
            tracing::info!(planet = %name, "placeholder superseded by loaded planet");
            self.diagnostics
                .push(LoadDiagnostic::PlaceholderSuperseded { planet: name });
        } else {
            tracing::warn!(planet = %name, "duplicate planet name, keeping the later definition");
            self.diagnostics
                .push(LoadDiagnostic::DuplicatePlanet { planet: name });
        }
        entry.planet = planet;
        entry.provisional = false;
    }

    /// Look up `host`, creating a placeholder if it is not known yet.
    pub fn resolve_host(&mut self, host: &str, referenced_by: &str) -> &Planet {
        let index = match self.planets.iter().position(|e| e.planet.name == host) {
            Some(index) => index,
            None => {
                tracing::debug!(planet = host, referenced_by, "creating placeholder planet");
                self.diagnostics.push(LoadDiagnostic::PlaceholderCreated {
                    planet: host.to_string(),
                    referenced_by: referenced_by.to_string(),
                });
                self.planets.push(PlanetEntry {
                    planet: Planet::placeholder(host),
                    provisional: true,
                    referrers: Vec::new(),
                });
                self.planets.len() - 1
            }
        };
        let entry = &mut self.planets[index];
        entry.referrers.push(referenced_by.to_string());
        &entry.planet
    }

    /// Close the load pass: report placeholders nobody superseded.
    pub fn finish(&mut self) {
        for entry in self.planets.iter().filter(|e| e.provisional) {
            tracing::warn!(
                planet = %entry.planet.name,
                referenced_by = ?entry.referrers,
                "unresolved planet reference, using placeholder"
            );
            self.diagnostics.push(LoadDiagnostic::ReferenceUnresolved {
                planet: entry.planet.name.clone(),
                referenced_by: entry.referrers.clone(),
            });
        }
    }

    pub fn planet(&self, name: &str) -> Option<&Planet> {
        self.planets
            .iter()
            .find(|e| e.planet.name == name)
            .map(|e| &e.planet)
    }

    pub fn is_provisional(&self, name: &str) -> bool {
        self.planets
            .iter()
            .any(|e| e.planet.name == name && e.provisional)
    }

    pub fn planets(&self) -> impl Iterator<Item = &Planet> {
        self.planets.iter().map(|e| &e.planet)
    }

    pub fn diagnostics(&self) -> &[LoadDiagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<LoadDiagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}
