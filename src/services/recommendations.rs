use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::{collections::HashMap, sync::Arc};

use crate::{
    error::AppResult,
    models::{Emotion, RecommendationResult, SourceLabel, Track},
    services::catalog::CatalogClient,
};

/// Query used when an emotion has no mood terms, and by the generic fallback
const GENERIC_QUERY: &str = "popular";

/// Descriptive search words and catalog genres for one emotion
#[derive(Debug, Clone, PartialEq)]
pub struct MoodTerms {
    pub moods: Vec<String>,
    pub genres: Vec<String>,
}

impl MoodTerms {
    fn new(moods: &[&str], genres: &[&str]) -> Self {
        Self {
            moods: moods.iter().map(|s| s.to_string()).collect(),
            genres: genres.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Read-only Emotion → search vocabulary table
#[derive(Debug, Clone, PartialEq)]
pub struct MoodTable {
    entries: HashMap<Emotion, MoodTerms>,
}

impl Default for MoodTable {
    fn default() -> Self {
        let entries = HashMap::from([
            (
                Emotion::Happy,
                MoodTerms::new(
                    &["happy", "joy", "upbeat", "positive"],
                    &["pop", "dance", "disco", "reggaeton", "happy"],
                ),
            ),
            (
                Emotion::Sad,
                MoodTerms::new(
                    &["melancholic", "emotional", "heartfelt", "sad"],
                    &["acoustic", "blues", "piano", "melancholic", "sad"],
                ),
            ),
            (
                Emotion::Calm,
                MoodTerms::new(
                    &["relaxing", "peaceful", "calm", "soothing"],
                    &["ambient", "chill", "classical", "jazz", "meditation"],
                ),
            ),
            (
                Emotion::Energetic,
                MoodTerms::new(
                    &["energetic", "powerful", "intense", "pumping"],
                    &["rock", "electronic", "hip-hop", "metal", "workout"],
                ),
            ),
            (
                Emotion::Neutral,
                MoodTerms::new(
                    &["chill", "easy", "mellow", "smooth"],
                    &["indie", "alternative", "lounge", "folk", "latin"],
                ),
            ),
        ]);
        Self { entries }
    }
}

impl MoodTable {
    pub fn new(entries: HashMap<Emotion, MoodTerms>) -> Self {
        Self { entries }
    }

    pub fn get(&self, emotion: Emotion) -> Option<&MoodTerms> {
        self.entries.get(&emotion)
    }
}

/// Mood word and genre drawn once per engine invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreQuery {
    pub mood_term: String,
    pub genre_term: String,
}

/// Turns an emotion into a track list, escalating search → chart → generic
/// fallback until a strategy returns something
#[derive(Clone)]
pub struct RecommendationEngine {
    catalog: Arc<dyn CatalogClient>,
    moods: MoodTable,
    seed: Option<u64>,
}

impl RecommendationEngine {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self {
            catalog,
            moods: MoodTable::default(),
            seed: None,
        }
    }

    pub fn with_mood_table(mut self, moods: MoodTable) -> Self {
        self.moods = moods;
        self
    }

    /// Every invocation draws from a fresh RNG seeded with `seed`
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn catalog(&self) -> &Arc<dyn CatalogClient> {
        &self.catalog
    }

    /// Picks one mood term and one genre term uniformly at random
    pub fn draw_query<R: Rng + ?Sized>(&self, emotion: Emotion, rng: &mut R) -> GenreQuery {
        let (mood_term, genre_term) = match self.moods.get(emotion) {
            Some(terms) => (terms.moods.choose(rng), terms.genres.choose(rng)),
            None => (None, None),
        };

        GenreQuery {
            mood_term: mood_term.map_or(GENERIC_QUERY, String::as_str).to_string(),
            genre_term: genre_term.cloned().unwrap_or_default(),
        }
    }

    /// Draws a genre for `emotion`, or none at all
    pub fn draw_genre<R: Rng + ?Sized>(&self, emotion: Option<Emotion>, rng: &mut R) -> String {
        match emotion.and_then(|e| self.moods.get(e)) {
            Some(terms) => terms.genres.choose(rng).cloned().unwrap_or_default(),
            None => String::new(),
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Recommends tracks for an already-validated emotion
    pub async fn recommend(&self, emotion: Emotion, limit: usize) -> RecommendationResult {
        let query = self.draw_query(emotion, &mut self.rng());
        self.recommend_query(emotion, query, limit).await
    }

    pub async fn recommend_with_rng<R: Rng + Send>(
        &self,
        emotion: Emotion,
        limit: usize,
        rng: &mut R,
    ) -> RecommendationResult {
        let query = self.draw_query(emotion, rng);
        self.recommend_query(emotion, query, limit).await
    }

    /// Explicit-mode entry: unknown labels are rejected rather than normalized
    pub async fn recommend_label(&self, label: &str, limit: usize) -> AppResult<RecommendationResult> {
        let emotion: Emotion = label.parse()?;
        Ok(self.recommend(emotion, limit).await)
    }

    /// Runs the strategies in order; each one only if the previous came back empty
    pub async fn recommend_query(
        &self,
        emotion: Emotion,
        query: GenreQuery,
        limit: usize,
    ) -> RecommendationResult {
        tracing::debug!(
            emotion = %emotion,
            mood = %query.mood_term,
            genre = %query.genre_term,
            catalog = self.catalog.name(),
            "Starting recommendation"
        );

        let tracks = self
            .catalog
            .search_tracks(&query.mood_term, &query.genre_term, limit)
            .await;
        if !tracks.is_empty() {
            return finish(emotion, tracks, SourceLabel::Search);
        }

        tracing::info!(emotion = %emotion, genre = %query.genre_term, "Search empty, trying charts");
        let tracks = self.catalog.chart_tracks(&query.genre_term, limit).await;
        if !tracks.is_empty() {
            return finish(emotion, tracks, SourceLabel::Chart);
        }

        tracing::info!(emotion = %emotion, "Charts empty, falling back to generic search");
        let tracks = self.catalog.search_tracks(GENERIC_QUERY, "", limit).await;
        if tracks.is_empty() {
            tracing::warn!(emotion = %emotion, "Every strategy returned empty");
        }
        finish(emotion, tracks, SourceLabel::Fallback)
    }

    /// Free-text search, optionally steered by an emotion's genres
    pub async fn search(&self, query: &str, emotion: Option<Emotion>, limit: usize) -> Vec<Track> {
        let genre = self.draw_genre(emotion, &mut self.rng());
        self.catalog
            .search_tracks(query, &genre, limit)
            .await
            .into_iter()
            .map(|track| track.with_source(SourceLabel::Search))
            .collect()
    }
}

fn finish(emotion: Emotion, tracks: Vec<Track>, source: SourceLabel) -> RecommendationResult {
    tracing::info!(emotion = %emotion, tracks = tracks.len(), source = ?source, "Recommendation completed");
    RecommendationResult {
        emotion,
        tracks: tracks.into_iter().map(|t| t.with_source(source)).collect(),
        source,
    }
}
