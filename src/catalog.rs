use crate::error::ListError;
use crate::list_record::ListKind;
use crate::list_store::ListStore;
use crate::preset::PresetList;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListOrigin {
    Preset,
    User,
}

/// One render-ready row of the merged catalog. Ephemeral; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub group: String,
    pub item_count: usize,
    pub origin: ListOrigin,
}

/// How an entry renders in a selection widget. Chosen once when the view is
/// constructed, not per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStyle {
    Detailed,
    NameOnly,
}

impl CatalogEntry {
    pub fn label(&self, style: ItemStyle) -> String {
        match style {
            ItemStyle::Detailed => format!("{} ({} items)", self.name, self.item_count),
            ItemStyle::NameOnly => self.name.clone(),
        }
    }
}

/// Maps a raw group key to the heading shown in the panel. Groups that
/// already carry a display label pass through unchanged.
pub fn group_label(group: &str) -> &str {
    match group {
        "preset" => "Preset lists",
        "custom" => "Custom lists",
        "genes" => "Genes",
        "domains" => "Domains",
        other => other,
    }
}

/// Rendering collaborator for one list panel. `clear_dynamic` removes
/// everything not tagged as preset-origin, so redraws never accumulate
/// duplicates.
pub trait ListPanelView {
    fn clear_dynamic(&mut self);
    fn append_heading(&mut self, label: &str);
    fn append_item(&mut self, entry: &CatalogEntry, active: bool);
    fn has_selection(&self) -> bool;
    fn select_first(&mut self);
}

/// Merged, ordered view over preset and user lists for one kind.
#[derive(Debug, Clone, Copy)]
pub struct ListCatalog {
    kind: ListKind,
}

impl ListCatalog {
    pub fn new(kind: ListKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> ListKind {
        self.kind
    }

    /// Preset entries in server order, then user entries in stored
    /// (group-sorted, insertion-stable) order.
    pub fn assemble(
        &self,
        presets: &[PresetList],
        store: &ListStore,
        scope: &str,
    ) -> Result<Vec<CatalogEntry>, ListError> {
        let mut entries: Vec<CatalogEntry> = presets
            .iter()
            .map(|preset| CatalogEntry {
                name: preset.name.clone(),
                group: preset.group.clone(),
                item_count: preset.item_count,
                origin: ListOrigin::Preset,
            })
            .collect();
        for record in store.get(self.kind, scope)? {
            entries.push(CatalogEntry {
                name: record.name.clone(),
                group: record.group.clone(),
                item_count: record.items.len(),
                origin: ListOrigin::User,
            });
        }
        Ok(entries)
    }

    /// Every name currently in the catalog; the uniqueness check for new
    /// and renamed lists runs against this, not against the store alone.
    pub fn names(entries: &[CatalogEntry]) -> Vec<String> {
        entries.iter().map(|entry| entry.name.clone()).collect()
    }

    /// Case-insensitive substring filter backing the panel search box.
    pub fn filter<'a>(entries: &'a [CatalogEntry], query: &str) -> Vec<&'a CatalogEntry> {
        let query = query.to_lowercase();
        entries
            .iter()
            .filter(|entry| entry.name.to_lowercase().contains(&query))
            .collect()
    }

    /// Initial render: one preset block followed by the user lists.
    pub fn draw_full(
        &self,
        view: &mut dyn ListPanelView,
        presets: &[PresetList],
        store: &ListStore,
        scope: &str,
        active: &[String],
    ) -> Result<(), ListError> {
        if !presets.is_empty() {
            view.append_heading(group_label("preset"));
        }
        for preset in presets {
            let entry = CatalogEntry {
                name: preset.name.clone(),
                group: preset.group.clone(),
                item_count: preset.item_count,
                origin: ListOrigin::Preset,
            };
            view.append_item(&entry, false);
        }
        self.draw_user(view, store, scope, active)
    }

    /// Clears all non-preset entries and redraws the user lists, so a
    /// reload never duplicates previously rendered rows.
    pub fn redraw_user(
        &self,
        view: &mut dyn ListPanelView,
        store: &ListStore,
        scope: &str,
        active: &[String],
    ) -> Result<(), ListError> {
        view.clear_dynamic();
        self.draw_user(view, store, scope, active)
    }

    fn draw_user(
        &self,
        view: &mut dyn ListPanelView,
        store: &ListStore,
        scope: &str,
        active: &[String],
    ) -> Result<(), ListError> {
        let mut group = String::new();
        for record in store.get(self.kind, scope)? {
            if record.group != group {
                view.append_heading(group_label(&record.group));
                group = record.group.clone();
            }
            let is_active = active.iter().any(|name| *name == record.name);
            let entry = CatalogEntry {
                name: record.name.clone(),
                group: record.group.clone(),
                item_count: record.items.len(),
                origin: ListOrigin::User,
            };
            view.append_item(&entry, is_active);
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_view {
    use super::*;

    /// Records render calls for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingView {
        pub headings: Vec<String>,
        pub items: Vec<(String, ListOrigin, bool)>,
        pub clear_count: usize,
        pub select_first_count: usize,
        pub selected: Option<String>,
    }

    impl ListPanelView for RecordingView {
        fn clear_dynamic(&mut self) {
            self.clear_count += 1;
            self.items.retain(|(_, origin, _)| *origin == ListOrigin::Preset);
            if let Some(name) = &self.selected {
                if !self.items.iter().any(|(n, _, _)| n == name) {
                    self.selected = None;
                }
            }
        }

        fn append_heading(&mut self, label: &str) {
            self.headings.push(label.to_string());
        }

        fn append_item(&mut self, entry: &CatalogEntry, active: bool) {
            self.items.push((entry.name.clone(), entry.origin, active));
            if active {
                self.selected = Some(entry.name.clone());
            }
        }

        fn has_selection(&self) -> bool {
            self.selected.is_some()
        }

        fn select_first(&mut self) {
            self.select_first_count += 1;
            self.selected = self.items.first().map(|(name, _, _)| name.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_view::RecordingView;
    use super::*;
    use crate::list_record::{DEFAULT_COLOR, DEFAULT_GROUP, UPLOADED_GROUP};

    fn preset(name: &str, count: usize) -> PresetList {
        PresetList {
            name: name.to_string(),
            group: "curated".to_string(),
            item_count: count,
        }
    }

    fn seeded_store() -> (tempfile::TempDir, ListStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ListStore::new(dir.path());
        store
            .set(
                ListKind::Gene,
                "hydra",
                "Uploaded A",
                vec!["u1".to_string()],
                UPLOADED_GROUP,
                DEFAULT_COLOR,
            )
            .unwrap();
        store
            .set(
                ListKind::Gene,
                "hydra",
                "Custom A",
                vec!["c1".to_string(), "c2".to_string()],
                DEFAULT_GROUP,
                DEFAULT_COLOR,
            )
            .unwrap();
        (dir, store)
    }

    #[test]
    fn test_assemble_presets_first_then_user_by_group() {
        let (_dir, store) = seeded_store();
        let catalog = ListCatalog::new(ListKind::Gene);
        let presets = vec![preset("Zeta", 5), preset("Alpha", 3)];
        let entries = catalog.assemble(&presets, &store, "hydra").unwrap();
        let names = ListCatalog::names(&entries);
        // Preset order is the server's, untouched; user lists follow,
        // "Custom lists" before "Uploaded lists".
        assert_eq!(names, vec!["Zeta", "Alpha", "Custom A", "Uploaded A"]);
        assert_eq!(entries[0].origin, ListOrigin::Preset);
        assert_eq!(entries[2].origin, ListOrigin::User);
        assert_eq!(entries[2].item_count, 2);
    }

    #[test]
    fn test_group_label_table() {
        assert_eq!(group_label("preset"), "Preset lists");
        assert_eq!(group_label("custom"), "Custom lists");
        assert_eq!(group_label("genes"), "Genes");
        assert_eq!(group_label("domains"), "Domains");
        assert_eq!(group_label("Uploaded lists"), "Uploaded lists");
    }

    #[test]
    fn test_redraw_never_accumulates_duplicates() {
        let (_dir, store) = seeded_store();
        let catalog = ListCatalog::new(ListKind::Gene);
        let presets = vec![preset("Alpha", 3)];
        let mut view = RecordingView::default();
        catalog
            .draw_full(&mut view, &presets, &store, "hydra", &[])
            .unwrap();
        assert_eq!(view.items.len(), 3);
        catalog.redraw_user(&mut view, &store, "hydra", &[]).unwrap();
        catalog.redraw_user(&mut view, &store, "hydra", &[]).unwrap();
        assert_eq!(view.items.len(), 3);
        assert_eq!(view.clear_count, 2);
    }

    #[test]
    fn test_draw_marks_active_entry() {
        let (_dir, store) = seeded_store();
        let catalog = ListCatalog::new(ListKind::Gene);
        let mut view = RecordingView::default();
        catalog
            .redraw_user(&mut view, &store, "hydra", &["Uploaded A".to_string()])
            .unwrap();
        let (name, _, active) = view.items.last().unwrap();
        assert_eq!(name, "Uploaded A");
        assert!(active);
        assert!(view.has_selection());
    }

    #[test]
    fn test_headings_follow_group_changes() {
        let (_dir, store) = seeded_store();
        let catalog = ListCatalog::new(ListKind::Gene);
        let presets = vec![preset("Alpha", 3)];
        let mut view = RecordingView::default();
        catalog
            .draw_full(&mut view, &presets, &store, "hydra", &[])
            .unwrap();
        assert_eq!(
            view.headings,
            vec!["Preset lists", "Custom lists", "Uploaded lists"]
        );
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let entries = vec![
            CatalogEntry {
                name: "Neuropeptides".to_string(),
                group: "preset".to_string(),
                item_count: 10,
                origin: ListOrigin::Preset,
            },
            CatalogEntry {
                name: "My peptides".to_string(),
                group: DEFAULT_GROUP.to_string(),
                item_count: 2,
                origin: ListOrigin::User,
            },
            CatalogEntry {
                name: "Opsins".to_string(),
                group: DEFAULT_GROUP.to_string(),
                item_count: 4,
                origin: ListOrigin::User,
            },
        ];
        let hits = ListCatalog::filter(&entries, "PePtIdEs");
        assert_eq!(hits.len(), 2);
        assert!(ListCatalog::filter(&entries, "").len() == 3);
    }

    #[test]
    fn test_item_style_fixed_at_construction() {
        let entry = CatalogEntry {
            name: "Opsins".to_string(),
            group: DEFAULT_GROUP.to_string(),
            item_count: 4,
            origin: ListOrigin::User,
        };
        assert_eq!(entry.label(ItemStyle::Detailed), "Opsins (4 items)");
        assert_eq!(entry.label(ItemStyle::NameOnly), "Opsins");
    }
}
