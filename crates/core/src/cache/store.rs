//! Competition store: read-through TTL cache over durable artifact files.

use std::sync::Arc;
use std::time::Duration;

use super::files::ArtifactFiles;
use super::memory::{MemoryCache, TtlCache};
use crate::Error;
use crate::config::AppConfig;
use crate::model::{Artifact, ArtifactKind, Fixture, LadderEntry, validate_competition_id};

/// Prefix shared by every memory cache key this store owns.
pub const CACHE_NAMESPACE: &str = "ladderboard:";

/// Per-competition artifact store.
///
/// Memory entries are keyed `ladderboard:{type}:{competition_id}`. A read
/// never triggers a scrape; only `write` produces durable artifacts.
#[derive(Clone)]
pub struct CompetitionStore {
    files: ArtifactFiles,
    cache: Arc<dyn TtlCache<Artifact>>,
    ttl: Duration,
}

impl CompetitionStore {
    /// Build a store from configuration with a system-clock memory cache.
    pub fn new(config: &AppConfig) -> Self {
        let cache = Arc::new(MemoryCache::<Artifact>::new());
        Self::with_cache(ArtifactFiles::new(&config.data_dir), cache, config.cache_ttl())
    }

    /// Build a store over an explicit cache backend.
    pub fn with_cache(files: ArtifactFiles, cache: Arc<dyn TtlCache<Artifact>>, ttl: Duration) -> Self {
        Self { files, cache, ttl }
    }

    pub fn files(&self) -> &ArtifactFiles {
        &self.files
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn cache_key(kind: ArtifactKind, competition_id: &str) -> String {
        format!("{CACHE_NAMESPACE}{kind}:{competition_id}")
    }

    /// Read an artifact, memory first, then the durable file.
    ///
    /// A successful file read reseeds memory with a fresh TTL. Missing files,
    /// I/O errors and corrupt JSON all come back as `None`.
    pub async fn read(&self, competition_id: &str, kind: ArtifactKind) -> Option<Artifact> {
        if let Err(e) = validate_competition_id(competition_id) {
            tracing::warn!("refusing {} read: {}", kind, e);
            return None;
        }

        let key = Self::cache_key(kind, competition_id);
        if let Some(artifact) = self.cache.get(&key) {
            tracing::debug!("memory cache hit for {}", key);
            return Some(artifact);
        }

        let loaded = match kind {
            ArtifactKind::Ladder => self
                .files
                .read::<Vec<LadderEntry>>(kind, competition_id)
                .await
                .map(|v| v.map(Artifact::Ladder)),
            _ => self
                .files
                .read::<Vec<Fixture>>(kind, competition_id)
                .await
                .map(|v| v.map(Artifact::Fixtures)),
        };

        match loaded {
            Ok(Some(artifact)) => {
                tracing::debug!("loaded {} from disk ({} records)", key, artifact.len());
                self.cache.set(key, artifact.clone(), self.ttl);
                Some(artifact)
            }
            Ok(None) => {
                tracing::debug!("no durable artifact for {}", key);
                None
            }
            Err(e) => {
                tracing::warn!("treating {} as absent: {}", key, e);
                None
            }
        }
    }

    /// Current ladder snapshot for a competition.
    pub async fn read_ladder(&self, competition_id: &str) -> Option<Vec<LadderEntry>> {
        match self.read(competition_id, ArtifactKind::Ladder).await? {
            Artifact::Ladder(entries) => Some(entries),
            Artifact::Fixtures(_) => None,
        }
    }

    /// All fixtures, optionally truncated to `limit`.
    pub async fn read_fixtures(&self, competition_id: &str, limit: Option<usize>) -> Option<Vec<Fixture>> {
        self.read_fixture_list(competition_id, ArtifactKind::Fixtures, limit).await
    }

    /// Upcoming fixtures, optionally truncated to `limit`.
    pub async fn read_upcoming(&self, competition_id: &str, limit: Option<usize>) -> Option<Vec<Fixture>> {
        self.read_fixture_list(competition_id, ArtifactKind::Upcoming, limit).await
    }

    /// Recent results, optionally truncated to `limit`.
    pub async fn read_results(&self, competition_id: &str, limit: Option<usize>) -> Option<Vec<Fixture>> {
        self.read_fixture_list(competition_id, ArtifactKind::Results, limit).await
    }

    async fn read_fixture_list(
        &self, competition_id: &str, kind: ArtifactKind, limit: Option<usize>,
    ) -> Option<Vec<Fixture>> {
        let mut fixtures = match self.read(competition_id, kind).await? {
            Artifact::Fixtures(fixtures) => fixtures,
            Artifact::Ladder(_) => return None,
        };
        if let Some(limit) = limit {
            fixtures.truncate(limit);
        }
        Some(fixtures)
    }

    /// Persist an artifact, fully overwriting its durable file.
    ///
    /// Memory is left alone; the next read picks the new file up once the
    /// current entry (if any) is cleared or expires.
    pub async fn write(&self, competition_id: &str, kind: ArtifactKind, payload: &Artifact) -> Result<(), Error> {
        validate_competition_id(competition_id)?;

        match (kind, payload) {
            (ArtifactKind::Ladder, Artifact::Ladder(entries)) => {
                self.files.write(kind, competition_id, entries).await?;
            }
            (ArtifactKind::Fixtures | ArtifactKind::Upcoming | ArtifactKind::Results, Artifact::Fixtures(fixtures)) => {
                self.files.write(kind, competition_id, fixtures).await?;
            }
            _ => {
                return Err(Error::InvalidInput(format!("payload does not match artifact type {kind}")));
            }
        }

        Ok(())
    }

    /// Drop the four memory entries of one competition. Files are untouched.
    pub fn clear(&self, competition_id: &str) -> usize {
        let removed = ArtifactKind::ALL
            .iter()
            .filter(|kind| self.cache.delete(&Self::cache_key(**kind, competition_id)))
            .count();
        tracing::info!(competition = competition_id, removed, "cleared competition cache");
        removed
    }

    /// Drop every memory entry in this store's namespace. Files are untouched.
    pub fn clear_all(&self) -> usize {
        let removed = self.cache.delete_by_prefix(CACHE_NAMESPACE);
        tracing::info!(removed, "cleared all competition caches");
        removed
    }
}
