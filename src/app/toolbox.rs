use crate::adapters::export::{export_file_name, groups_to_clipboard_text, groups_to_csv};
use crate::adapters::import::{parse_file_names, parse_pasted_names, participants_from_names};
use crate::adapters::storage::load_roster_or_empty;
use crate::app::reveal::run_reveal;
use crate::core::draw::{DrawEngine, RevealFrame};
use crate::core::grouping::GroupingEngine;
use crate::core::roster::Roster;
use crate::domain::model::{DrawWinner, Group, Participant};
use crate::domain::ports::{NameGenerator, RosterStore, Storage};
use crate::utils::error::Result;
use chrono::{NaiveDate, Utc};
use rand::Rng;

/// Roster, draw engine and grouping engine behind one handle.
///
/// Roster changes are persisted through the store as they happen. Draw
/// history and groups live only as long as the toolbox.
pub struct Toolbox<S: RosterStore, G: NameGenerator> {
    store: S,
    roster: Roster,
    draw: DrawEngine,
    grouping: GroupingEngine<G>,
    groups: Vec<Group>,
}

impl<S: RosterStore, G: NameGenerator> Toolbox<S, G> {
    pub async fn open(store: S, generator: G, draw: DrawEngine) -> Self {
        let roster = Roster::new(load_roster_or_empty(&store).await);
        tracing::info!("📋 Loaded roster with {} participants", roster.len());
        Self {
            store,
            roster,
            draw,
            grouping: GroupingEngine::new(generator),
            groups: Vec::new(),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn participants(&self) -> &[Participant] {
        self.roster.participants()
    }

    pub fn draw_engine(&self) -> &DrawEngine {
        &self.draw
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub async fn save(&self) -> Result<()> {
        self.store.save(self.roster.participants()).await
    }

    // ── Roster ───────────────────────────────────────────────────────

    pub async fn import_text(&mut self, text: &str) -> Result<usize> {
        self.import(parse_pasted_names(text)).await
    }

    pub async fn import_file(&mut self, content: &str) -> Result<usize> {
        self.import(parse_file_names(content)).await
    }

    async fn import(&mut self, names: Vec<String>) -> Result<usize> {
        let added = self.roster.extend(participants_from_names(names));
        if added > 0 {
            self.save().await?;
        }
        let duplicates = self.roster.duplicate_count();
        if duplicates > 0 {
            tracing::warn!("⚠️ {} participants share a name with someone else", duplicates);
        }
        tracing::info!("Imported {} participants", added);
        Ok(added)
    }

    pub async fn remove(&mut self, id: &str) -> Result<Option<Participant>> {
        let removed = self.roster.remove(id);
        if removed.is_some() {
            self.save().await?;
        }
        Ok(removed)
    }

    pub async fn clear(&mut self) -> Result<()> {
        self.roster.clear();
        self.save().await
    }

    pub async fn dedupe(&mut self) -> Result<usize> {
        let dropped = self.roster.dedupe();
        if dropped > 0 {
            self.save().await?;
        }
        Ok(dropped)
    }

    // ── Lucky draw ───────────────────────────────────────────────────

    pub async fn draw<R, F>(&mut self, rng: &mut R, on_frame: F) -> Result<DrawWinner>
    where
        R: Rng + Send + ?Sized,
        F: FnMut(&RevealFrame) + Send,
    {
        run_reveal(&mut self.draw, self.roster.participants(), rng, on_frame).await
    }

    pub fn draw_now<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<DrawWinner> {
        self.draw
            .draw_now(self.roster.participants(), rng, Utc::now())
    }

    pub fn clear_history(&mut self) -> Result<()> {
        self.draw.clear_history()
    }

    // ── Grouping ─────────────────────────────────────────────────────

    /// Replaces any previous grouping.
    pub async fn form_groups<R: Rng + Send + ?Sized>(
        &mut self,
        group_size: usize,
        rng: &mut R,
    ) -> Result<&[Group]> {
        let groups = self
            .grouping
            .form_groups(self.roster.participants(), group_size, rng)
            .await?;
        self.groups = groups;
        Ok(&self.groups)
    }

    pub fn groups_csv(&self) -> Result<String> {
        groups_to_csv(&self.groups)
    }

    pub fn groups_clipboard_text(&self) -> String {
        groups_to_clipboard_text(&self.groups)
    }

    /// Writes the current groups as CSV and returns the file name used.
    pub async fn export_groups<T: Storage>(&self, storage: &T, date: NaiveDate) -> Result<String> {
        let file_name = export_file_name(date);
        let csv = self.groups_csv()?;
        storage.write_file(&file_name, csv.as_bytes()).await?;
        tracing::info!("📁 Exported {} groups to {}", self.groups.len(), file_name);
        Ok(file_name)
    }
}
