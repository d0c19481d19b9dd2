//! In-memory tournament store with optional JSON snapshots on disk.
//!
//! Every mutation runs against a copy under the write lock; the copy replaces
//! the stored tournament only after the operation and the snapshot write succeed.

use crate::models::{Tournament, TournamentError, TournamentId};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Tournament not found")]
    NotFound(TournamentId),
    #[error(transparent)]
    Tournament(#[from] TournamentError),
    #[error("Snapshot I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("Snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Tournament store lock poisoned")]
    Poisoned,
}

pub struct TournamentStore {
    tournaments: RwLock<HashMap<TournamentId, Tournament>>,
    data_dir: Option<PathBuf>,
}

impl TournamentStore {
    /// A store that never touches the disk.
    pub fn in_memory() -> Self {
        Self {
            tournaments: RwLock::new(HashMap::new()),
            data_dir: None,
        }
    }

    /// Open (creating if needed) a data directory and load every `<id>.json` in it.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let mut tournaments = HashMap::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let tournament: Tournament = serde_json::from_slice(&fs::read(&path)?)?;
            tournaments.insert(tournament.id, tournament);
        }
        log::info!("Loaded {} tournament(s) from {}", tournaments.len(), dir.display());
        Ok(Self {
            tournaments: RwLock::new(tournaments),
            data_dir: Some(dir.to_path_buf()),
        })
    }

    pub fn insert(&self, tournament: Tournament) -> Result<(), StoreError> {
        let mut guard = self.tournaments.write().map_err(|_| StoreError::Poisoned)?;
        self.persist(&tournament)?;
        guard.insert(tournament.id, tournament);
        Ok(())
    }

    /// A snapshot of the tournament.
    pub fn get(&self, id: TournamentId) -> Result<Tournament, StoreError> {
        let guard = self.tournaments.read().map_err(|_| StoreError::Poisoned)?;
        guard.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    /// All tournaments, oldest first.
    pub fn list(&self) -> Result<Vec<Tournament>, StoreError> {
        let guard = self.tournaments.read().map_err(|_| StoreError::Poisoned)?;
        let mut all: Vec<Tournament> = guard.values().cloned().collect();
        all.sort_by_key(|t| t.created_at);
        Ok(all)
    }

    /// Run `op` on a copy of the tournament and keep the copy only if `op` succeeds.
    pub fn update<R, F>(&self, id: TournamentId, op: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut Tournament) -> Result<R, TournamentError>,
    {
        let mut guard = self.tournaments.write().map_err(|_| StoreError::Poisoned)?;
        let mut working = guard.get(&id).cloned().ok_or(StoreError::NotFound(id))?;
        let out = op(&mut working)?;
        self.persist(&working)?;
        guard.insert(id, working);
        Ok(out)
    }

    /// Remove the tournament with all its teams, rounds, matches and boards.
    pub fn delete(&self, id: TournamentId) -> Result<(), StoreError> {
        let mut guard = self.tournaments.write().map_err(|_| StoreError::Poisoned)?;
        guard.remove(&id).ok_or(StoreError::NotFound(id))?;
        if let Some(path) = self.snapshot_path(id) {
            match fs::remove_file(&path) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e.into()),
                _ => {}
            }
        }
        log::info!("Tournament {} deleted", id);
        Ok(())
    }

    fn snapshot_path(&self, id: TournamentId) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(format!("{}.json", id)))
    }

    fn persist(&self, tournament: &Tournament) -> Result<(), StoreError> {
        if let Some(path) = self.snapshot_path(tournament.id) {
            fs::write(path, serde_json::to_vec_pretty(tournament)?)?;
        }
        Ok(())
    }
}
