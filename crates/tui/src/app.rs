//! Application state and logic for the mocktty TUI.
//!
//! This module contains the selection state machine and the single result
//! slot. State updates are pure: `App::update` consumes a [`Msg`] and
//! returns [`Effect`]s for the command layer to execute, following the
//! functional-core / imperative-shell split.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use mocktty_engine::{MockRequest, PENDING_SENTINEL, missing_selection_result};
use mocktty_registry::ServiceRegistry;
use mocktty_types::{
    DisplayMode, ExecOutcome, FunctionDefinition, ParamDefinition, ParamKind, ServerRecord,
    ServiceDefinition,
};
use mocktty_util::ServerStore;
use ratatui::widgets::ListState;
use serde_json::{Map, Value};

use crate::tables;

/// How long a copy acknowledgment stays visible.
pub const ACK_WINDOW: Duration = Duration::from_secs(2);

/// Cross-cutting shared context owned by the App.
#[derive(Debug)]
pub struct SharedCtx {
    /// Immutable service catalog
    pub registry: ServiceRegistry,
    /// Durable server list
    pub store: ServerStore,
}

/// Represents the current focus area in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Service list in the sidebar
    #[default]
    Services,
    /// Function tabs of the selected service
    Functions,
    /// Parameter form
    Params,
    /// Result pane (raw text or table)
    Result,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Services => Focus::Functions,
            Focus::Functions => Focus::Params,
            Focus::Params => Focus::Result,
            Focus::Result => Focus::Services,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Services => Focus::Result,
            Focus::Functions => Focus::Services,
            Focus::Params => Focus::Functions,
            Focus::Result => Focus::Params,
        }
    }
}

/// One editable input field of the parameter form.
#[derive(Debug, Clone)]
pub struct Field {
    /// Parameter id, the key in the parameter value map
    pub id: String,
    /// Display name
    pub name: String,
    /// Input kind tag
    pub kind: ParamKind,
    /// Allowed values for select fields
    pub options: Vec<String>,
    /// Current value
    pub value: String,
    /// Current option index for select fields
    pub option_idx: Option<usize>,
    /// Whether the parameter declares a default value
    pub has_default: bool,
}

impl Field {
    fn from_param(param: &ParamDefinition) -> Self {
        let value = param.default_value.clone().unwrap_or_default();
        let option_idx = if param.kind == ParamKind::Select {
            Some(param.options.iter().position(|option| *option == value).unwrap_or(0))
        } else {
            None
        };
        Self {
            id: param.id.clone(),
            name: param.name.clone(),
            kind: param.kind,
            options: param.options.clone(),
            value,
            option_idx,
            has_default: param.default_value.is_some(),
        }
    }
}

/// Which copy operation an acknowledgment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyTarget {
    /// One table cell, addressed by row and column index
    Cell { row: usize, col: usize },
    /// The entire raw result text
    WholeResult,
}

/// The single raw-text result slot and its presentation state.
#[derive(Debug, Default)]
pub struct ResultState {
    /// Raw result text; empty until the first execution
    pub raw: String,
    /// Parse of `raw`, absent for the empty/pending/unparseable states
    pub parsed: Option<Value>,
    /// Vertical scroll of the raw-text view
    pub scroll: usize,
    /// Cell cursor of the table view
    pub row: usize,
    pub col: usize,
    /// First visible row/column of the table view
    pub row_offset: usize,
    pub col_offset: usize,
    /// Per-cell copy acknowledgments, tracked independently
    copied_cells: HashMap<(usize, usize), Instant>,
    /// Whole-result copy acknowledgment
    copied_all_at: Option<Instant>,
}

impl ResultState {
    /// Replace the slot content and re-derive presentation state.
    pub fn set_raw(&mut self, raw: String) {
        self.parsed = if raw.is_empty() || raw == PENDING_SENTINEL {
            None
        } else {
            serde_json::from_str(&raw).ok()
        };
        self.raw = raw;
        self.scroll = 0;
        self.row = 0;
        self.col = 0;
        self.row_offset = 0;
        self.col_offset = 0;
        self.copied_cells.clear();
        self.copied_all_at = None;
    }

    pub fn clear(&mut self) {
        self.set_raw(String::new());
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn is_pending(&self) -> bool {
        self.raw == PENDING_SENTINEL
    }

    /// The row array at the fixed nested path, when the parse found one.
    pub fn rows(&self) -> Option<&Vec<Value>> {
        self.parsed.as_ref()?.get("result")?.get("data")?.get("arrayData")?.as_array()
    }

    /// Record a successful copy; called by the command layer after the
    /// clipboard write resolved.
    pub fn mark_copied(&mut self, target: CopyTarget) {
        match target {
            CopyTarget::Cell { row, col } => {
                self.copied_cells.insert((row, col), Instant::now());
            }
            CopyTarget::WholeResult => self.copied_all_at = Some(Instant::now()),
        }
    }

    /// Drop acknowledgments older than [`ACK_WINDOW`].
    pub fn expire_acks(&mut self, now: Instant) {
        self.copied_cells.retain(|_, at| now.duration_since(*at) < ACK_WINDOW);
        if let Some(at) = self.copied_all_at
            && now.duration_since(at) >= ACK_WINDOW
        {
            self.copied_all_at = None;
        }
    }

    pub fn cell_copied(&self, row: usize, col: usize) -> bool {
        self.copied_cells.contains_key(&(row, col))
    }

    pub fn whole_result_copied(&self) -> bool {
        self.copied_all_at.is_some()
    }

    /// Whether any acknowledgment is pending expiry.
    pub fn has_acks(&self) -> bool {
        !self.copied_cells.is_empty() || self.copied_all_at.is_some()
    }
}

/// Messages that can be sent to update the application state.
#[derive(Debug, Clone)]
pub enum Msg {
    /// Periodic UI tick (throbber, acknowledgment expiry)
    Tick,
    /// Terminal resized
    Resize(u16, u16),
    /// Move focus to the next UI area
    FocusNext,
    /// Move focus to the previous UI area
    FocusPrev,
    /// Move the service selection (selection follows the cursor)
    ServiceCursor(isize),
    /// Move the function selection
    FunctionCursor(isize),
    /// Move up in the parameter form
    ParamsUp,
    /// Move down in the parameter form
    ParamsDown,
    /// Append a character to the current field
    ParamChar(char),
    /// Remove a character from the current field
    ParamBackspace,
    /// Cycle through select options
    ParamCycle(isize),
    /// Execute the current function with the current parameter map
    RunTest,
    /// Select another server owned by the current service
    ServerCycle(isize),
    /// Remove the selected server from the registry
    ServerDelete,
    /// Move within the result view (rows, cols)
    ResultNav(isize, isize),
    /// Copy the cell under the table cursor
    CopyCell,
    /// Copy the entire raw result text
    CopyResult,
    /// Background execution completed with outcome
    ExecCompleted(ExecOutcome),
}

/// Side effects that can be triggered by state changes.
#[derive(Debug, Clone)]
pub enum Effect {
    /// Request a mock execution with the given context
    ExecuteRequested { request: MockRequest, seq: u64 },
    /// Request a clipboard write; the acknowledgment flips on success
    CopyRequested { text: String, target: CopyTarget },
}

/// The main application state.
pub struct App {
    /// Shared, cross-cutting context (catalog, server store)
    pub ctx: SharedCtx,
    /// Current focus area
    pub focus: Focus,
    /// Index of the selected service in the catalog
    pub service_idx: usize,
    /// List widget state for the sidebar
    pub service_list: ListState,
    /// Index of the selected function within the current service
    pub function_idx: usize,
    /// Parameter form fields, rebuilt on every function change
    pub fields: Vec<Field>,
    /// Index of the focused field
    pub field_idx: usize,
    /// Id of the selected server, when one is owned by the current service
    pub server_id: Option<String>,
    /// The single result slot
    pub result: ResultState,
    /// Whether an execution is currently in flight
    pub executing: bool,
    /// Animation frame for the execution throbber
    pub throbber_idx: usize,
    /// Monotonic sequence number of the newest started execution
    pub exec_seq: u64,
}

impl App {
    /// Create the application and run the initial service-selection cascade.
    ///
    /// The returned effects must be executed by the caller; the catalog's
    /// first function may be flagged auto-execute.
    pub fn new(ctx: SharedCtx) -> (Self, Vec<Effect>) {
        let mut app = Self {
            ctx,
            focus: Focus::default(),
            service_idx: 0,
            service_list: ListState::default(),
            function_idx: 0,
            fields: Vec::new(),
            field_idx: 0,
            server_id: None,
            result: ResultState::default(),
            executing: false,
            throbber_idx: 0,
            exec_seq: 0,
        };
        let effects = app.select_service(0);
        (app, effects)
    }

    /// The selected service. The catalog is never empty.
    pub fn current_service(&self) -> &ServiceDefinition {
        &self.ctx.registry.services()[self.service_idx]
    }

    /// The selected function of the current service.
    pub fn current_function(&self) -> &FunctionDefinition {
        &self.current_service().functions[self.function_idx]
    }

    /// The selected server record, if any.
    pub fn current_server(&self) -> Option<ServerRecord> {
        self.server_id.as_deref().and_then(|id| self.ctx.store.record(id))
    }

    /// Servers offered by the picker: only records owned by the current
    /// service.
    pub fn servers_for_current_service(&self) -> Vec<ServerRecord> {
        self.ctx.store.records_for_service(&self.current_service().id)
    }

    /// Whether the result pane renders as a table: parse succeeded, the row
    /// array exists at the fixed path, and the function asks for a table.
    pub fn table_view_active(&self) -> bool {
        self.current_function().display_mode == DisplayMode::Table && self.result.rows().is_some()
    }

    /// The parameter value map, in form order.
    pub fn param_map(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|field| (field.id.clone(), Value::String(field.value.clone())))
            .collect()
    }

    /// Updates the application state based on a message.
    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        let mut effects = Vec::new();
        match msg {
            Msg::Tick => {
                if self.executing {
                    self.throbber_idx = (self.throbber_idx + 1) % 10;
                }
                self.result.expire_acks(Instant::now());
            }
            Msg::Resize(_, _) => {}
            Msg::FocusNext => self.focus = self.focus.next(),
            Msg::FocusPrev => self.focus = self.focus.prev(),
            Msg::ServiceCursor(delta) => {
                let target = step(self.service_idx, delta, self.ctx.registry.services().len());
                effects.extend(self.select_service(target));
            }
            Msg::FunctionCursor(delta) => {
                let target = step(self.function_idx, delta, self.current_service().functions.len());
                effects.extend(self.select_function(target));
            }
            Msg::ParamsUp => {
                self.field_idx = self.field_idx.saturating_sub(1);
            }
            Msg::ParamsDown => {
                if self.field_idx + 1 < self.fields.len() {
                    self.field_idx += 1;
                }
            }
            Msg::ParamChar(c) => {
                let mut edited = false;
                if let Some(field) = self.fields.get_mut(self.field_idx)
                    && field.kind != ParamKind::Select
                {
                    field.value.push(c);
                    edited = true;
                }
                if edited {
                    effects.extend(self.execute_if_auto());
                }
            }
            Msg::ParamBackspace => {
                let mut edited = false;
                if let Some(field) = self.fields.get_mut(self.field_idx)
                    && field.kind != ParamKind::Select
                    && field.value.pop().is_some()
                {
                    edited = true;
                }
                if edited {
                    effects.extend(self.execute_if_auto());
                }
            }
            Msg::ParamCycle(delta) => {
                let mut edited = false;
                if let Some(field) = self.fields.get_mut(self.field_idx)
                    && field.kind == ParamKind::Select
                    && !field.options.is_empty()
                {
                    let idx = step(field.option_idx.unwrap_or(0), delta, field.options.len());
                    field.option_idx = Some(idx);
                    field.value = field.options[idx].clone();
                    edited = true;
                }
                if edited {
                    effects.extend(self.execute_if_auto());
                }
            }
            Msg::RunTest => effects.extend(self.start_execution()),
            Msg::ServerCycle(delta) => {
                let servers = self.servers_for_current_service();
                if servers.is_empty() {
                    self.server_id = None;
                } else {
                    let current = self
                        .server_id
                        .as_deref()
                        .and_then(|id| servers.iter().position(|record| record.id == id))
                        .unwrap_or(0);
                    let idx = (current as isize + delta).rem_euclid(servers.len() as isize) as usize;
                    self.server_id = Some(servers[idx].id.clone());
                }
            }
            Msg::ServerDelete => self.delete_selected_server(),
            Msg::ResultNav(rows, cols) => self.navigate_result(rows, cols),
            Msg::CopyCell => effects.extend(self.copy_cell()),
            Msg::CopyResult => {
                if !self.result.is_empty() && !self.result.is_pending() {
                    effects.push(Effect::CopyRequested {
                        text: self.result.raw.clone(),
                        target: CopyTarget::WholeResult,
                    });
                }
            }
            Msg::ExecCompleted(outcome) => {
                if outcome.seq != self.exec_seq {
                    // Superseded by a newer execution; drop it.
                    tracing::debug!(seq = outcome.seq, newest = self.exec_seq, "Discarding stale execution result");
                } else {
                    self.result.set_raw(outcome.raw);
                    self.executing = false;
                    self.throbber_idx = 0;
                }
            }
        }
        effects
    }

    /// Select a service and run the full cascade: first function, first owned
    /// server (or none), cleared result slot.
    fn select_service(&mut self, idx: usize) -> Vec<Effect> {
        self.service_idx = idx.min(self.ctx.registry.services().len().saturating_sub(1));
        self.service_list.select(Some(self.service_idx));
        self.result.clear();
        self.server_id = self
            .servers_for_current_service()
            .first()
            .map(|record| record.id.clone());
        self.select_function(0)
    }

    /// Select a function: rebuild (not merge) the parameter form from the
    /// function's defaults, then auto-execute when flagged.
    fn select_function(&mut self, idx: usize) -> Vec<Effect> {
        let function_count = self.current_service().functions.len();
        self.function_idx = idx.min(function_count.saturating_sub(1));
        self.fields = self.current_function().params.iter().map(Field::from_param).collect();
        self.field_idx = 0;
        self.execute_if_auto()
    }

    fn execute_if_auto(&mut self) -> Vec<Effect> {
        if self.current_function().auto_execute {
            self.start_execution()
        } else {
            Vec::new()
        }
    }

    /// Start one execution with the current parameter map.
    ///
    /// With the selection incomplete the result slot is set synchronously to
    /// the missing-selection error and nothing is simulated. Otherwise the
    /// slot flips to the pending sentinel and an execution effect tagged with
    /// the next sequence number is emitted.
    fn start_execution(&mut self) -> Vec<Effect> {
        let Some(server) = self.current_server() else {
            self.result.set_raw(missing_selection_result());
            return Vec::new();
        };

        let service = self.current_service();
        let function = self.current_function();
        let request = MockRequest {
            service_id: service.id.clone(),
            service_name: service.name.clone(),
            function_name: function.name.clone(),
            server_address: server.address,
            params: self.param_map(),
        };

        self.exec_seq += 1;
        self.result.set_raw(PENDING_SENTINEL.to_string());
        self.executing = true;
        self.throbber_idx = 0;
        vec![Effect::ExecuteRequested {
            request,
            seq: self.exec_seq,
        }]
    }

    /// Remove the selected server; the selection advances to the first
    /// remaining record owned by the current service, or to none.
    fn delete_selected_server(&mut self) {
        let Some(id) = self.server_id.clone() else {
            return;
        };
        if let Err(error) = self.ctx.store.remove(&id) {
            tracing::warn!(error = %error, "Failed to persist server removal");
        }
        self.server_id = self
            .servers_for_current_service()
            .first()
            .map(|record| record.id.clone());
    }

    fn navigate_result(&mut self, rows: isize, cols: isize) {
        if self.table_view_active() {
            let row_count = self.result.rows().map_or(0, Vec::len);
            let col_count = self.result.rows().map_or(0, |rows| tables::derive_columns(rows).len());
            if row_count == 0 || col_count == 0 {
                return;
            }
            self.result.row = step(self.result.row, rows, row_count);
            self.result.col = step(self.result.col, cols, col_count);
        } else if rows != 0 {
            self.result.scroll = self.result.scroll.saturating_add_signed(rows);
        }
    }

    fn copy_cell(&mut self) -> Vec<Effect> {
        if !self.table_view_active() {
            return Vec::new();
        }
        let Some(rows) = self.result.rows() else {
            return Vec::new();
        };
        let columns = tables::derive_columns(rows);
        let (row, col) = (self.result.row, self.result.col);
        let (Some(row_value), Some(column)) = (rows.get(row), columns.get(col)) else {
            return Vec::new();
        };
        vec![Effect::CopyRequested {
            text: tables::cell_text(row_value, column),
            target: CopyTarget::Cell { row, col },
        }]
    }
}

/// Move `idx` by `delta` within `0..len`, clamped at both ends.
fn step(idx: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    idx.saturating_add_signed(delta).min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mocktty_engine::{GENERATION_ERROR_MESSAGE, MISSING_SELECTION_MESSAGE};
    use serde_json::json;

    fn new_app() -> App {
        let ctx = SharedCtx {
            registry: ServiceRegistry::builtin(),
            store: ServerStore::ephemeral(),
        };
        let (app, effects) = App::new(ctx);
        // The builtin catalog's first function (user/login) is not
        // auto-execute, so startup emits nothing.
        assert!(effects.is_empty());
        app
    }

    fn service_index(app: &App, id: &str) -> usize {
        app.ctx
            .registry
            .services()
            .iter()
            .position(|service| service.id == id)
            .unwrap()
    }

    fn select_service(app: &mut App, id: &str) -> Vec<Effect> {
        let delta = service_index(app, id) as isize - app.service_idx as isize;
        app.update(Msg::ServiceCursor(delta))
    }

    fn exec_effects(effects: &[Effect]) -> Vec<(&MockRequest, u64)> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::ExecuteRequested { request, seq } => Some((request, *seq)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn selecting_a_service_resets_function_server_and_result() {
        let mut app = new_app();
        app.result.set_raw("left over".into());
        app.update(Msg::FunctionCursor(1));

        let effects = select_service(&mut app, "order");
        assert!(exec_effects(&effects).is_empty());
        assert_eq!(app.current_service().id, "order");
        assert_eq!(app.function_idx, 0);
        assert_eq!(app.current_function().id, "create");
        assert!(app.result.is_empty());

        let server = app.current_server().unwrap();
        assert_eq!(server.service_id, "order");
        let first_owned = &app.servers_for_current_service()[0];
        assert_eq!(server.id, first_owned.id);
    }

    #[test]
    fn function_change_rebuilds_params_from_defaults() {
        let mut app = new_app();
        select_service(&mut app, "order");
        app.update(Msg::ParamChar('x'));

        let effects = app.update(Msg::FunctionCursor(2));
        assert!(exec_effects(&effects).is_empty());
        assert_eq!(app.current_function().id, "cancel");
        assert_eq!(app.fields.len(), 1);
        assert_eq!(app.fields[0].id, "orderId");
        // cancel declares no default: the map is rebuilt, not merged
        assert_eq!(app.fields[0].value, "");
    }

    #[test]
    fn auto_execute_function_triggers_exactly_one_execution() {
        let mut app = new_app();
        select_service(&mut app, "order");

        let effects = app.update(Msg::FunctionCursor(1));
        let execs = exec_effects(&effects);
        assert_eq!(execs.len(), 1);
        let (request, seq) = execs[0];
        assert_eq!(seq, 1);
        assert_eq!(request.service_name, "订单服务");
        assert_eq!(request.params["orderId"], json!("ORD-2023-001"));
        assert!(app.result.is_pending());
        assert!(app.executing);
    }

    #[test]
    fn param_edit_on_auto_execute_function_reexecutes_with_full_map() {
        let mut app = new_app();
        select_service(&mut app, "order");
        app.update(Msg::FunctionCursor(1));

        let effects = app.update(Msg::ParamChar('X'));
        let execs = exec_effects(&effects);
        assert_eq!(execs.len(), 1);
        assert_eq!(execs[0].0.params["orderId"], json!("ORD-2023-001X"));
    }

    #[test]
    fn param_edit_without_auto_execute_does_not_execute() {
        let mut app = new_app();
        select_service(&mut app, "order");
        let effects = app.update(Msg::ParamChar('9'));
        assert!(exec_effects(&effects).is_empty());
        assert!(app.result.is_empty());
    }

    #[test]
    fn execution_is_refused_without_a_server() {
        let mut app = new_app();
        select_service(&mut app, "analytics");
        // Drop the only analytics server; selection must fall to none.
        app.update(Msg::ServerDelete);
        assert!(app.current_server().is_none());

        let effects = app.update(Msg::RunTest);
        assert!(effects.is_empty());
        let parsed: Value = serde_json::from_str(&app.result.raw).unwrap();
        assert_eq!(parsed["error"], json!(MISSING_SELECTION_MESSAGE));
        assert!(!app.executing);
    }

    #[test]
    fn removing_the_selected_server_advances_to_first_owned_or_none() {
        let mut app = new_app();
        select_service(&mut app, "order");
        let first = app.current_server().unwrap();

        app.update(Msg::ServerDelete);
        let second = app.current_server().unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(second.service_id, "order");

        app.update(Msg::ServerDelete);
        assert!(app.current_server().is_none());
    }

    #[test]
    fn stale_execution_results_are_discarded() {
        let mut app = new_app();
        select_service(&mut app, "order");
        app.update(Msg::FunctionCursor(1)); // seq 1
        app.update(Msg::ParamChar('X')); // seq 2
        assert_eq!(app.exec_seq, 2);

        app.update(Msg::ExecCompleted(ExecOutcome {
            seq: 1,
            raw: "{\"stale\": true}".into(),
        }));
        assert!(app.result.is_pending());
        assert!(app.executing);

        app.update(Msg::ExecCompleted(ExecOutcome {
            seq: 2,
            raw: "{\"fresh\": true}".into(),
        }));
        assert_eq!(app.result.raw, "{\"fresh\": true}");
        assert!(!app.executing);
    }

    #[test]
    fn table_view_requires_parse_row_array_and_table_mode() {
        let mut app = new_app();
        select_service(&mut app, "order");
        app.update(Msg::FunctionCursor(1)); // query: table mode
        let envelope = json!({
            "result": { "data": { "arrayData": [{"a": 1}] } }
        });
        app.result.set_raw(serde_json::to_string_pretty(&envelope).unwrap());
        assert!(app.table_view_active());

        // Same data, json display mode: raw text.
        app.result.set_raw(serde_json::to_string_pretty(&envelope).unwrap());
        let raw = app.result.raw.clone();
        app.update(Msg::FunctionCursor(1)); // cancel: json mode
        app.result.set_raw(raw);
        assert!(!app.table_view_active());

        // Table mode but unparseable text: raw text.
        app.update(Msg::FunctionCursor(-1));
        app.result.set_raw("not json".into());
        assert!(!app.table_view_active());

        // Table mode but no row array at the fixed path: raw text.
        app.result.set_raw(json!({"result": {"data": {}}}).to_string());
        assert!(!app.table_view_active());
    }

    #[test]
    fn copy_result_is_disabled_while_empty_or_pending() {
        let mut app = new_app();
        assert!(app.update(Msg::CopyResult).is_empty());

        app.result.set_raw(PENDING_SENTINEL.to_string());
        assert!(app.update(Msg::CopyResult).is_empty());

        app.result.set_raw("{\"ok\": true}".into());
        let effects = app.update(Msg::CopyResult);
        assert!(matches!(
            effects.as_slice(),
            [Effect::CopyRequested {
                target: CopyTarget::WholeResult,
                ..
            }]
        ));
        // The copy carries the raw text verbatim, not a re-serialization.
        let Effect::CopyRequested { text, .. } = &effects[0] else {
            unreachable!()
        };
        assert_eq!(text, "{\"ok\": true}");
    }

    #[test]
    fn copy_cell_carries_the_exact_displayed_text() {
        let mut app = new_app();
        select_service(&mut app, "order");
        app.update(Msg::FunctionCursor(1));
        app.result.set_raw(
            json!({
                "result": { "data": { "arrayData": [
                    {"a": 1, "b": {"nested": true}},
                    {"b": 3, "c": 4}
                ] } }
            })
            .to_string(),
        );

        app.update(Msg::ResultNav(0, 1)); // column "b"
        let effects = app.update(Msg::CopyCell);
        let Effect::CopyRequested { text, target } = &effects[0] else {
            unreachable!()
        };
        assert_eq!(text, "{\"nested\":true}");
        assert_eq!(*target, CopyTarget::Cell { row: 0, col: 1 });
        // Copying never mutates the underlying result.
        assert!(app.result.rows().is_some());
    }

    #[test]
    fn copy_acknowledgments_expire_independently_after_the_window() {
        let mut state = ResultState::default();
        state.mark_copied(CopyTarget::Cell { row: 0, col: 0 });
        state.mark_copied(CopyTarget::Cell { row: 1, col: 2 });
        state.mark_copied(CopyTarget::WholeResult);

        let now = Instant::now();
        state.expire_acks(now);
        assert!(state.cell_copied(0, 0));
        assert!(state.cell_copied(1, 2));
        assert!(state.whole_result_copied());

        state.expire_acks(now + ACK_WINDOW + Duration::from_millis(1));
        assert!(!state.cell_copied(0, 0));
        assert!(!state.cell_copied(1, 2));
        assert!(!state.whole_result_copied());
    }

    #[test]
    fn end_to_end_order_query_resolves_pending_with_order_envelope() {
        let mut app = new_app();
        select_service(&mut app, "order");

        let effects = app.update(Msg::FunctionCursor(1));
        let (raw, seq) = {
            let execs = exec_effects(&effects);
            assert_eq!(execs.len(), 1);
            let (request, seq) = execs[0];
            assert_eq!(request.params["orderId"], json!("ORD-2023-001"));
            (mocktty_engine::execute(request), seq)
        };
        assert!(app.result.is_pending());

        app.update(Msg::ExecCompleted(ExecOutcome { seq, raw }));
        let parsed = app.result.parsed.clone().unwrap();
        assert_eq!(parsed["service"], json!("订单服务"));
        let rows = parsed["result"]["data"]["arrayData"].as_array().unwrap();
        assert_eq!(rows.len(), mocktty_engine::ROW_COUNT);
        assert!(rows.iter().all(|row| row.get("orderNumber").is_some()));
        assert!(app.table_view_active());
    }

    #[test]
    fn generation_error_text_parses_as_error_object() {
        let mut app = new_app();
        app.result.set_raw(mocktty_engine::generation_error_result());
        let parsed = app.result.parsed.clone().unwrap();
        assert_eq!(parsed["error"], json!(GENERATION_ERROR_MESSAGE));
    }
}
