use crate::catalog::{CatalogEntry, ListCatalog, ListOrigin, ListPanelView};
use crate::error::{ListError, ListErrorCode};
use crate::list_record::{DEFAULT_COLOR, DEFAULT_GROUP, ListKind, UPLOADED_GROUP};
use crate::list_store::ListStore;
use crate::preset::{PresetList, PresetProvider};
use crate::unique_name::ensure_unique_name;
use std::collections::HashMap;

pub const DEFAULT_UPLOAD_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Panel lifecycle. `Loading` brackets network fetches, `Editing` brackets
/// the synchronous rename/remove/reset dialogs, `Error` lasts only until
/// its notification is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Idle,
    Loading,
    Editing,
    Error,
}

/// Issued when a fetch starts; a completion applies only while its token is
/// still the newest one for the scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    scope: String,
    value: u64,
}

/// Owns every mutation of the user lists of one kind, plus redraw timing.
/// All creation pathways converge on the same append/uniqueness path.
pub struct ListController<P: PresetProvider, V: ListPanelView> {
    catalog: ListCatalog,
    store: ListStore,
    provider: P,
    view: V,
    presets: HashMap<String, Vec<PresetList>>,
    tokens: HashMap<String, u64>,
    state: PanelState,
    notification: Option<String>,
    batching: bool,
}

impl<P: PresetProvider, V: ListPanelView> ListController<P, V> {
    pub fn new(kind: ListKind, store: ListStore, provider: P, view: V) -> Self {
        Self {
            catalog: ListCatalog::new(kind),
            store,
            provider,
            view,
            presets: HashMap::new(),
            tokens: HashMap::new(),
            state: PanelState::Idle,
            notification: None,
            batching: false,
        }
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn store(&self) -> &ListStore {
        &self.store
    }

    /// Drains the pending one-shot notification; a surfaced error returns
    /// the panel to `Idle`.
    pub fn take_notification(&mut self) -> Option<String> {
        if self.state == PanelState::Error {
            self.state = PanelState::Idle;
        }
        self.notification.take()
    }

    fn notify(&mut self, message: String) {
        self.state = PanelState::Error;
        self.notification = Some(message);
    }

    /// Fetches the preset summaries for a scope and renders the full panel.
    /// The summaries stay cached for uniqueness checks, mirroring the
    /// rendered catalog; list membership is never cached.
    pub fn load_panel(&mut self, scope: &str) -> Result<(), ListError> {
        let token = self.begin_fetch(scope);
        let summaries = match self.provider.summaries(scope) {
            Ok(summaries) => summaries,
            Err(e) => {
                self.state = PanelState::Idle;
                log::error!("Error fetching preset lists for {scope}: {e}");
                return Err(e);
            }
        };
        self.state = PanelState::Idle;
        if !self.token_current(&token) {
            log::warn!("Discarding stale preset summaries for {scope}");
            return Ok(());
        }
        self.presets.insert(scope.to_string(), summaries);
        let presets = self.presets.get(scope).cloned().unwrap_or_default();
        self.catalog
            .draw_full(&mut self.view, &presets, &self.store, scope, &[])
    }

    /// The merged catalog as currently rendered: cached preset summaries
    /// first, then the stored user lists.
    pub fn catalog_entries(&self, scope: &str) -> Result<Vec<CatalogEntry>, ListError> {
        let presets = self.presets.get(scope).map(Vec::as_slice).unwrap_or(&[]);
        self.catalog.assemble(presets, &self.store, scope)
    }

    fn catalog_names(&self, scope: &str) -> Result<Vec<String>, ListError> {
        Ok(ListCatalog::names(&self.catalog_entries(scope)?))
    }

    /// Suppresses per-item redraws until `end_batch`. Multi-insert paths
    /// wrap their loop in this transaction so the panel redraws once.
    pub fn begin_batch(&mut self) {
        self.batching = true;
    }

    /// Ends the batch and performs the single deferred redraw, marking the
    /// given record active.
    pub fn end_batch(&mut self, scope: &str, active: &[String]) -> Result<(), ListError> {
        self.batching = false;
        self.catalog
            .redraw_user(&mut self.view, &self.store, scope, active)
    }

    /// Common append path: every creation pathway funnels through here so
    /// the uniqueness invariant is enforced against the full catalog.
    fn append_user_list(
        &mut self,
        scope: &str,
        name: &str,
        items: Vec<String>,
        group: &str,
    ) -> Result<String, ListError> {
        let names = self.catalog_names(scope)?;
        let name = ensure_unique_name(name, &names);
        self.store
            .set(self.catalog.kind(), scope, &name, items, group, DEFAULT_COLOR)?;
        if !self.batching {
            self.catalog
                .redraw_user(&mut self.view, &self.store, scope, &[name.clone()])?;
        }
        Ok(name)
    }

    /// The only pathway allowed to create a record with no items.
    pub fn create_empty(&mut self, scope: &str) -> Result<String, ListError> {
        self.append_user_list(scope, "Empty list", Vec::new(), DEFAULT_GROUP)
    }

    pub fn create_from_selection(
        &mut self,
        scope: &str,
        name: Option<&str>,
        items: Vec<String>,
    ) -> Result<String, ListError> {
        if items.is_empty() {
            return Err(ListError {
                code: ListErrorCode::InvalidInput,
                message: "No items selected".to_string(),
            });
        }
        self.append_user_list(scope, name.unwrap_or("Selected genes"), items, DEFAULT_GROUP)
    }

    /// Creates one list per distinct first field of the uploaded text.
    /// Oversized input is rejected before any record is created; the whole
    /// batch triggers exactly one redraw with the last list active.
    pub fn create_from_upload(
        &mut self,
        scope: &str,
        raw_text: &str,
        max_size_bytes: usize,
    ) -> Result<Vec<String>, ListError> {
        if raw_text.len() > max_size_bytes {
            let message = format!("Size limit of {max_size_bytes} bytes exceeded.");
            self.notify(message.clone());
            return Err(ListError {
                code: ListErrorCode::SizeExceeded,
                message,
            });
        }
        let groups = parse_upload(raw_text)?;
        self.run_batch(scope, groups, UPLOADED_GROUP)
    }

    /// Starts a fetch: enters `Loading` and issues the scope's next token.
    pub fn begin_fetch(&mut self, scope: &str) -> RequestToken {
        self.state = PanelState::Loading;
        let value = self.tokens.entry(scope.to_string()).or_insert(0);
        *value += 1;
        RequestToken {
            scope: scope.to_string(),
            value: *value,
        }
    }

    fn token_current(&self, token: &RequestToken) -> bool {
        self.tokens.get(&token.scope) == Some(&token.value)
    }

    /// Ingests grouped results of an asynchronous computation, one record
    /// per key, under the batching contract.
    pub fn ingest_computation(
        &mut self,
        scope: &str,
        results: Vec<(String, Vec<String>)>,
        group: &str,
    ) -> Result<Vec<String>, ListError> {
        let token = self.begin_fetch(scope);
        self.complete_computation(&token, results, group)
    }

    /// Completion half of `ingest_computation`, split out so callers that
    /// suspend at the network boundary can apply the result later. A stale
    /// token is discarded with a log entry and creates nothing.
    pub fn complete_computation(
        &mut self,
        token: &RequestToken,
        mut results: Vec<(String, Vec<String>)>,
        group: &str,
    ) -> Result<Vec<String>, ListError> {
        self.state = PanelState::Idle;
        if !self.token_current(token) {
            log::warn!(
                "Discarding stale computation results for {}",
                token.scope
            );
            return Ok(Vec::new());
        }
        // Only the explicit empty-list path may create a record with no
        // items.
        results.retain(|(key, items)| {
            if items.is_empty() {
                log::debug!("Skipping empty result group '{key}'");
            }
            !items.is_empty()
        });
        let scope = token.scope.clone();
        self.run_batch(&scope, results, group)
    }

    /// Creates one record per `(name, items)` pair inside a begin/end-batch
    /// transaction. The batch always ends, even when an append fails, so a
    /// failure cannot leave redraws suppressed.
    fn run_batch(
        &mut self,
        scope: &str,
        groups: Vec<(String, Vec<String>)>,
        group: &str,
    ) -> Result<Vec<String>, ListError> {
        self.begin_batch();
        let mut created = Vec::new();
        let mut failure = None;
        for (key, values) in groups {
            match self.append_user_list(scope, &key, values, group) {
                Ok(name) => created.push(name),
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }
        let active: Vec<String> = created.last().cloned().into_iter().collect();
        let ended = self.end_batch(scope, &active);
        if let Some(e) = failure {
            return Err(e);
        }
        ended?;
        Ok(created)
    }

    /// Renames a user list in place. The duplicate check runs against the
    /// live catalog, preset names included; the store is untouched on
    /// failure.
    pub fn rename(&mut self, scope: &str, name: &str, new_name: &str) -> Result<(), ListError> {
        self.state = PanelState::Editing;
        if new_name.trim().is_empty() {
            let message = "The name of a list cannot be empty.".to_string();
            self.notify(message.clone());
            return Err(ListError {
                code: ListErrorCode::EmptyName,
                message,
            });
        }
        let names = match self.catalog_names(scope) {
            Ok(names) => names,
            Err(e) => {
                self.state = PanelState::Idle;
                return Err(e);
            }
        };
        if names.iter().any(|used| used == new_name) {
            let message = "This list name is already in use.".to_string();
            self.notify(message.clone());
            return Err(ListError {
                code: ListErrorCode::DuplicateName,
                message,
            });
        }
        if let Err(e) = self.store.rename(self.catalog.kind(), scope, name, new_name) {
            self.state = PanelState::Idle;
            return Err(e);
        }
        self.state = PanelState::Idle;
        self.catalog
            .redraw_user(&mut self.view, &self.store, scope, &[new_name.to_string()])
    }

    /// Removes one user list after confirmation. Returns `false` when the
    /// dialog was cancelled. A removal against an absent scope is logged
    /// and surfaces no notification. The panel is never left without a
    /// selection.
    pub fn remove(
        &mut self,
        scope: &str,
        name: &str,
        mut confirm: impl FnMut(&str) -> bool,
    ) -> Result<bool, ListError> {
        self.state = PanelState::Editing;
        let confirmed = confirm(&format!("Do you want to remove the following list: {name}?"));
        self.state = PanelState::Idle;
        if !confirmed {
            return Ok(false);
        }
        if let Err(e) = self.store.remove(self.catalog.kind(), scope, name) {
            log::error!("{}", e.message);
            return Err(e);
        }
        self.catalog
            .redraw_user(&mut self.view, &self.store, scope, &[])?;
        if !self.view.has_selection() {
            self.view.select_first();
        }
        Ok(true)
    }

    /// Clears every user list of the scope. Requires explicit confirmation
    /// and cannot be undone.
    pub fn reset_all(
        &mut self,
        scope: &str,
        mut confirm: impl FnMut(&str) -> bool,
    ) -> Result<bool, ListError> {
        self.state = PanelState::Editing;
        let confirmed = confirm(&format!(
            "Do you want to reset all user lists for {scope}?"
        ));
        self.state = PanelState::Idle;
        if !confirmed {
            return Ok(false);
        }
        self.store.reset_scope(self.catalog.kind(), scope)?;
        self.catalog
            .redraw_user(&mut self.view, &self.store, scope, &[])?;
        if !self.view.has_selection() {
            self.view.select_first();
        }
        Ok(true)
    }

    /// Full membership of a catalog entry. User lists come from the store;
    /// preset membership is re-fetched from the provider every time, since
    /// summaries only carry a count.
    pub fn members_of(&mut self, scope: &str, name: &str) -> Result<Vec<String>, ListError> {
        if let Some(record) = self.store.find(self.catalog.kind(), scope, name)? {
            return Ok(record.items);
        }
        let is_preset = self
            .presets
            .get(scope)
            .is_some_and(|presets| presets.iter().any(|preset| preset.name == name));
        if !is_preset {
            return Err(ListError {
                code: ListErrorCode::NotFound,
                message: format!("List {name} is not available for {scope}"),
            });
        }
        self.state = PanelState::Loading;
        let result = self.provider.members(scope, name);
        self.state = PanelState::Idle;
        result
    }

    /// Copies a list under a resolver-processed name. Preset duplication
    /// re-fetches the membership under `Loading`; the completion applies
    /// only while its request token is current.
    pub fn duplicate(&mut self, scope: &str, name: &str) -> Result<Option<String>, ListError> {
        let entry = self
            .catalog_entries(scope)?
            .into_iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| ListError {
                code: ListErrorCode::NotFound,
                message: format!("List {name} is not available for {scope}"),
            })?;
        match entry.origin {
            ListOrigin::User => {
                let record = self
                    .store
                    .find(self.catalog.kind(), scope, name)?
                    .ok_or_else(|| ListError {
                        code: ListErrorCode::NotFound,
                        message: format!("List {name} is not available for {scope}"),
                    })?;
                let copy = self.append_user_list(scope, name, record.items, DEFAULT_GROUP)?;
                Ok(Some(copy))
            }
            ListOrigin::Preset => {
                let token = self.begin_fetch(scope);
                let items = match self.provider.members(scope, name) {
                    Ok(items) => items,
                    Err(e) => {
                        self.state = PanelState::Idle;
                        log::error!("Error fetching genes: {e}");
                        return Err(e);
                    }
                };
                self.complete_duplicate(&token, name, items)
            }
        }
    }

    /// Completion half of a preset duplication. A stale token creates no
    /// record and returns `None`.
    pub fn complete_duplicate(
        &mut self,
        token: &RequestToken,
        name: &str,
        items: Vec<String>,
    ) -> Result<Option<String>, ListError> {
        self.state = PanelState::Idle;
        if !self.token_current(token) {
            log::warn!("Discarding stale membership of {name} for {}", token.scope);
            return Ok(None);
        }
        let scope = token.scope.clone();
        let copy = self.append_user_list(&scope, name, items, DEFAULT_GROUP)?;
        Ok(Some(copy))
    }
}

/// Splits uploaded text into `first field -> [second field, ...]` groups.
/// The delimiter is comma or tab, whichever occurs earlier in the text
/// (comma when neither appears); lines with fewer than two fields are
/// skipped; key order follows first appearance.
fn parse_upload(raw_text: &str) -> Result<Vec<(String, Vec<String>)>, ListError> {
    let delimiter = match (raw_text.find(','), raw_text.find('\t')) {
        (Some(comma), Some(tab)) if tab < comma => b'\t',
        (None, Some(_)) => b'\t',
        _ => b',',
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(delimiter)
        .from_reader(raw_text.as_bytes());

    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ListError {
            code: ListErrorCode::InvalidInput,
            message: format!("Could not parse uploaded text: {e}"),
        })?;
        if record.len() < 2 {
            continue;
        }
        let key = record[0].to_string();
        let value = record[1].to_string();
        match groups.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, values)) => values.push(value),
            None => groups.push((key, vec![value])),
        }
    }
    Ok(groups)
}
