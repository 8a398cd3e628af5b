// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory participant identity registry: no authentication, just an
//! opaque id paired with a randomly assigned display name.

use dashmap::DashMap;
use rand::seq::SliceRandom;

use tripcast_core::ParticipantId;

/// Display names handed out to new participants, preferring one not
/// already in use before falling back to a numbered suffix.
const RANDOM_NAMES: &[&str] = &[
    "Wanderer", "Voyager", "Nomad", "Explorer", "Trekker", "Rover", "Globetrotter", "Drifter",
    "Pathfinder", "Navigator", "Rambler", "Pilgrim", "Scout", "Wayfarer", "Adventurer",
];

/// Maps participant ids to display names, assigned once at first lookup.
pub struct UserRegistry {
    users: DashMap<ParticipantId, String>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self { users: DashMap::new() }
    }

    /// Mints a brand new participant id with a freshly assigned name.
    pub fn create(&self) -> (ParticipantId, String) {
        let id = ParticipantId(uuid::Uuid::new_v4().to_string());
        let name = self.assign_name();
        self.users.insert(id.clone(), name.clone());
        (id, name)
    }

    /// Looks up a previously minted participant's display name.
    pub fn lookup(&self, id: &ParticipantId) -> Option<String> {
        self.users.get(id).map(|n| n.clone())
    }

    fn assign_name(&self) -> String {
        let taken: std::collections::HashSet<String> = self.users.iter().map(|e| e.value().clone()).collect();
        let available: Vec<&&str> = RANDOM_NAMES.iter().filter(|n| !taken.contains(**n)).collect();
        let mut rng = rand::thread_rng();
        match available.choose(&mut rng) {
            Some(name) => name.to_string(),
            None => {
                let base = RANDOM_NAMES.choose(&mut rng).unwrap();
                format!("{base}{}", rand::Rng::gen_range(&mut rng, 1..1000))
            }
        }
    }
}

impl Default for UserRegistry {
    fn default() -> Self {
        Self::new()
    }
}
