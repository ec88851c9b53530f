//! An in-memory X server and toolkit for exercising the settings client.
use crate::conn::*;
use crate::sink::{SettingAction, SettingsSink};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

pub const SETTINGS_PROPERTY: &str = "_XSETTINGS_SETTINGS";

#[derive(Default)]
struct FakeState {
    atoms: HashMap<String, AtomId>,
    owners: HashMap<AtomId, WindowId>,
    properties: HashMap<(WindowId, AtomId), (AtomId, u8, Vec<u8>)>,
    failing: HashSet<WindowId>,
    failing_owner_queries: bool,
    selected: HashMap<WindowId, EventMask>,
    filters: HashSet<WindowId>,
    grabbed: bool,
    trap_depth: usize,
    property_reads: usize,
    untrapped_reads: usize,
    ungrabbed_owner_queries: usize,
}

/// Plays the part of the X server.
/// Root windows are `1000 + screen`; atoms are handed out from 1.
#[derive(Default)]
pub struct FakeConnection {
    state: RefCell<FakeState>,
}

impl FakeConnection {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn root(screen: usize) -> WindowId {
        1000 + screen as WindowId
    }

    pub fn atom(&self, name: &str) -> AtomId {
        let mut state = self.state.borrow_mut();
        let next = state.atoms.len() as AtomId + 1;
        *state.atoms.entry(name.to_string()).or_insert(next)
    }

    pub fn selection_atom(&self, screen: usize) -> AtomId {
        self.atom(&format!("_XSETTINGS_S{}", screen))
    }

    /// Make `window` the settings manager for `screen`, or clear it
    pub fn set_owner(&self, screen: usize, window: Option<WindowId>) {
        let selection = self.selection_atom(screen);
        let mut state = self.state.borrow_mut();
        match window {
            Some(window) => state.owners.insert(selection, window),
            None => state.owners.remove(&selection),
        };
    }

    /// Store a settings payload the way a manager would
    pub fn publish(&self, window: WindowId, data: Vec<u8>) {
        let settings = self.atom(SETTINGS_PROPERTY);
        self.set_property(window, settings, settings, 8, data);
    }

    pub fn set_property(
        &self,
        window: WindowId,
        property: AtomId,
        actual_type: AtomId,
        format: u8,
        data: Vec<u8>,
    ) {
        self.state
            .borrow_mut()
            .properties
            .insert((window, property), (actual_type, format, data));
    }

    /// Requests naming `window` fail as though it had been destroyed
    pub fn fail_requests_for(&self, window: WindowId) {
        self.state.borrow_mut().failing.insert(window);
    }

    /// GetSelectionOwner fails while this is set
    pub fn fail_owner_queries(&self, fail: bool) {
        self.state.borrow_mut().failing_owner_queries = fail;
    }

    pub fn filters(&self) -> HashSet<WindowId> {
        self.state.borrow().filters.clone()
    }

    pub fn selected_input(&self, window: WindowId) -> Option<EventMask> {
        self.state.borrow().selected.get(&window).copied()
    }

    pub fn trap_depth(&self) -> usize {
        self.state.borrow().trap_depth
    }

    pub fn is_grabbed(&self) -> bool {
        self.state.borrow().grabbed
    }

    pub fn property_reads(&self) -> usize {
        self.state.borrow().property_reads
    }

    pub fn untrapped_reads(&self) -> usize {
        self.state.borrow().untrapped_reads
    }

    pub fn ungrabbed_owner_queries(&self) -> usize {
        self.state.borrow().ungrabbed_owner_queries
    }

    /// The client message a new manager broadcasts on the root window
    pub fn manager_event(&self, screen: usize) -> RawEvent {
        RawEvent::ClientMessage {
            window: Self::root(screen),
            message_type: self.atom("MANAGER"),
            data: [0, self.selection_atom(screen), 0, 0, 0],
        }
    }

    pub fn property_event(&self, window: WindowId) -> RawEvent {
        RawEvent::PropertyNotify {
            window,
            atom: self.atom(SETTINGS_PROPERTY),
        }
    }
}

impl XConnection for FakeConnection {
    fn intern_atom(&self, name: &str) -> anyhow::Result<AtomId> {
        Ok(self.atom(name))
    }

    fn root_window(&self, screen: usize) -> anyhow::Result<WindowId> {
        Ok(Self::root(screen))
    }

    fn get_property(
        &self,
        window: WindowId,
        property: AtomId,
        _req_type: AtomId,
        _long_length: u32,
    ) -> anyhow::Result<PropertyReply> {
        let mut state = self.state.borrow_mut();
        state.property_reads += 1;
        if state.trap_depth == 0 {
            state.untrapped_reads += 1;
        }
        if state.failing.contains(&window) {
            anyhow::bail!("BadWindow {}", window);
        }
        Ok(match state.properties.get(&(window, property)) {
            Some((actual_type, format, data)) => PropertyReply {
                actual_type: *actual_type,
                format: *format,
                bytes_after: 0,
                data: data.clone(),
            },
            None => PropertyReply {
                actual_type: NONE,
                format: 0,
                bytes_after: 0,
                data: vec![],
            },
        })
    }

    fn selection_owner(&self, selection: AtomId) -> anyhow::Result<Option<WindowId>> {
        let mut state = self.state.borrow_mut();
        if !state.grabbed {
            state.ungrabbed_owner_queries += 1;
        }
        if state.failing_owner_queries {
            anyhow::bail!("GetSelectionOwner failed");
        }
        Ok(state.owners.get(&selection).copied())
    }

    fn select_input(&self, window: WindowId, mask: EventMask) -> anyhow::Result<()> {
        let mut state = self.state.borrow_mut();
        if state.failing.contains(&window) {
            anyhow::bail!("BadWindow {}", window);
        }
        state.selected.insert(window, mask);
        Ok(())
    }

    fn grab_server(&self) -> anyhow::Result<()> {
        let mut state = self.state.borrow_mut();
        anyhow::ensure!(!state.grabbed, "server already grabbed");
        state.grabbed = true;
        Ok(())
    }

    fn ungrab_server(&self) -> anyhow::Result<()> {
        self.state.borrow_mut().grabbed = false;
        Ok(())
    }

    fn push_error_trap(&self) {
        self.state.borrow_mut().trap_depth += 1;
    }

    fn pop_error_trap(&self) {
        let mut state = self.state.borrow_mut();
        assert!(state.trap_depth > 0, "unbalanced error trap");
        state.trap_depth -= 1;
    }

    fn add_event_filter(&self, window: WindowId) {
        let inserted = self.state.borrow_mut().filters.insert(window);
        assert!(inserted, "filter for {} registered twice", window);
    }

    fn remove_event_filter(&self, window: WindowId) {
        let removed = self.state.borrow_mut().filters.remove(&window);
        assert!(removed, "filter for {} was not registered", window);
    }

    fn flush(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Notify(usize, String, SettingAction),
    Resolution(usize, f64),
    WindowScale(usize, i32),
}

/// Remembers everything sent to the toolkit; clones share the record
#[derive(Clone, Default)]
pub struct RecordingSink {
    records: Rc<RefCell<Vec<Record>>>,
}

impl RecordingSink {
    pub fn take(&self) -> Vec<Record> {
        self.records.borrow_mut().drain(..).collect()
    }

    /// Takes everything, returning just the notifications
    pub fn take_notifications(&self) -> Vec<(String, SettingAction)> {
        self.take()
            .into_iter()
            .filter_map(|record| match record {
                Record::Notify(_, name, action) => Some((name, action)),
                _ => None,
            })
            .collect()
    }
}

impl SettingsSink for RecordingSink {
    fn notify(&mut self, screen: usize, name: &str, action: SettingAction) {
        self.records
            .borrow_mut()
            .push(Record::Notify(screen, name.to_string(), action));
    }

    fn set_resolution(&mut self, screen: usize, dpi: f64) {
        self.records
            .borrow_mut()
            .push(Record::Resolution(screen, dpi));
    }

    fn set_window_scale(&mut self, screen: usize, factor: i32) {
        self.records
            .borrow_mut()
            .push(Record::WindowScale(screen, factor));
    }
}
