//! Local player profiles
//!
//! Persisted to storage as a JSON map of name -> profile. Each profile keeps
//! its best score and running totals; one profile at a time is "current".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::persistence::{Storage, load_json, save_json};

/// Longest accepted profile name, in characters
pub const MAX_NAME_LEN: usize = 20;

/// A single profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "username")]
    pub name: String,
    pub best_score: u64,
    pub total_games: u32,
    pub total_score: u64,
    /// Unix timestamp (ms)
    pub created_at: f64,
    /// Unix timestamp (ms) of the last login or finished run
    pub last_played: f64,
}

impl Profile {
    fn new(name: String, now: f64) -> Self {
        Self {
            name,
            best_score: 0,
            total_games: 0,
            total_score: 0,
            created_at: now,
            last_played: now,
        }
    }

    /// Mean score per finished run
    pub fn average_score(&self) -> u64 {
        if self.total_games == 0 {
            0
        } else {
            self.total_score / self.total_games as u64
        }
    }
}

/// Trim and truncate a typed name. `None` if nothing is left.
pub fn clean_name(name: &str) -> Option<String> {
    let name: String = name.trim().chars().take(MAX_NAME_LEN).collect();
    if name.is_empty() { None } else { Some(name) }
}

/// All profiles plus the signed-in one
pub struct ProfileStore<S: Storage> {
    storage: S,
    profiles: BTreeMap<String, Profile>,
    current: Option<String>,
}

impl<S: Storage> ProfileStore<S> {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "nexus_runner_profiles";

    /// Load profiles from `storage`. Missing or corrupt data gives an empty store.
    pub fn load(storage: S) -> Self {
        let profiles = match load_json::<BTreeMap<String, Profile>, _>(&storage, Self::STORAGE_KEY)
        {
            Ok(Some(profiles)) => {
                log::info!("Loaded {} profiles", profiles.len());
                profiles
            }
            Ok(None) => {
                log::info!("No profiles found, starting fresh");
                BTreeMap::new()
            }
            Err(e) => {
                log::warn!("Could not load profiles ({e}), starting fresh");
                BTreeMap::new()
            }
        };

        Self {
            storage,
            profiles,
            current: None,
        }
    }

    fn save(&mut self) {
        match save_json(&mut self.storage, Self::STORAGE_KEY, &self.profiles) {
            Ok(()) => log::debug!("Profiles saved ({} entries)", self.profiles.len()),
            Err(e) => log::warn!("Could not save profiles: {e}"),
        }
    }

    /// Sign in as `name`, creating the profile if needed.
    /// Returns false (and changes nothing) for a blank name.
    pub fn login(&mut self, name: &str, now: f64) -> bool {
        let Some(name) = clean_name(name) else {
            return false;
        };

        match self.profiles.get_mut(&name) {
            Some(profile) => profile.last_played = now,
            None => {
                log::info!("Creating profile '{}'", name);
                self.profiles
                    .insert(name.clone(), Profile::new(name.clone(), now));
            }
        }
        log::info!("Signed in as '{}'", name);
        self.current = Some(name);
        self.save();
        true
    }

    pub fn logout(&mut self) {
        if let Some(name) = self.current.take() {
            log::info!("Signed out '{}'", name);
        }
    }

    pub fn current(&self) -> Option<&Profile> {
        self.current.as_deref().and_then(|name| self.get(name))
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Record a finished run for the current profile.
    /// Returns true if it set a new best; false with nobody signed in.
    pub fn commit_run(&mut self, score: u64, now: f64) -> bool {
        let Some(profile) = self
            .current
            .as_ref()
            .and_then(|name| self.profiles.get_mut(name))
        else {
            return false;
        };

        let new_best = score > profile.best_score;
        if new_best {
            profile.best_score = score;
        }
        profile.total_games += 1;
        profile.total_score += score;
        profile.last_played = now;
        log::info!(
            "Run committed for '{}': {} (best {}{})",
            profile.name,
            score,
            profile.best_score,
            if new_best { ", new record" } else { "" }
        );

        self.save();
        new_best
    }

    /// Profiles by best score, most recently played first among ties
    pub fn list(&self) -> Vec<&Profile> {
        let mut list: Vec<&Profile> = self.profiles.values().collect();
        list.sort_by(|a, b| {
            b.best_score
                .cmp(&a.best_score)
                .then(b.last_played.total_cmp(&a.last_played))
        });
        list
    }

    /// Remove a profile. Signs out if it was the current one.
    pub fn delete(&mut self, name: &str) -> bool {
        if self.profiles.remove(name).is_none() {
            return false;
        }
        log::info!("Deleted profile '{}'", name);
        if self.current.as_deref() == Some(name) {
            self.logout();
        }
        self.save();
        true
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}

/// Format a timestamp relative to `now` for the profile list
pub fn format_last_played(timestamp: f64, now: f64) -> String {
    let diff_mins = (now - timestamp) / 60_000.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        if days == 1 {
            "Yesterday".to_string()
        } else {
            format!("{} days ago", days)
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}
