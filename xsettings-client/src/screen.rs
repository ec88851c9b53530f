use crate::config::ClientConfig;
use crate::conn::{
    AtomId, ErrorTrap, EventFilter, EventMask, RawEvent, ServerGrab, WindowId, XConnection, NONE,
};
use crate::derived::{inject_unscaled_dpi, publish_derived};
use crate::diff::notify_changes;
use crate::sink::SettingsSink;
use crate::store::SettingsStore;
use std::rc::Rc;
use xsettings_wire::{parse_xsettings_with_serial, XSetting, XSettingsMap};

const SELECTION_PREFIX: &str = "_XSETTINGS_S";
const SETTINGS_PROPERTY: &str = "_XSETTINGS_SETTINGS";
const MANAGER: &str = "MANAGER";

struct Atoms {
    selection: AtomId,
    settings: AtomId,
    manager: AtomId,
}

impl Atoms {
    fn new<C: XConnection + ?Sized>(conn: &C, screen_index: usize) -> anyhow::Result<Self> {
        let selection = format!("{}{}", SELECTION_PREFIX, screen_index);
        Ok(Self {
            selection: conn.intern_atom(&selection)?,
            settings: conn.intern_atom(SETTINGS_PROPERTY)?,
            manager: conn.intern_atom(MANAGER)?,
        })
    }
}

enum TrackerState<C: XConnection + ?Sized> {
    /// No manager owns the selection
    Idle,
    /// Watching the manager window through its filter
    Tracking(EventFilter<C>),
    TornDown,
}

/// Follows the settings manager for a single screen and keeps the
/// current generation of its settings.
pub struct ScreenSettings<C: XConnection + ?Sized> {
    conn: Rc<C>,
    screen_index: usize,
    root: WindowId,
    atoms: Atoms,
    config: ClientConfig,
    root_filter: Option<EventFilter<C>>,
    state: TrackerState<C>,
    store: SettingsStore,
    derived_published: bool,
}

impl<C: XConnection + ?Sized> ScreenSettings<C> {
    /// Start watching the root window for new managers, bind to the
    /// current manager if there is one and read its settings.
    /// The initial read does not produce notifications.
    pub fn new(
        conn: &Rc<C>,
        screen_index: usize,
        config: ClientConfig,
        sink: &mut dyn SettingsSink,
    ) -> anyhow::Result<Self> {
        let atoms = Atoms::new(&**conn, screen_index)?;
        let root = conn.root_window(screen_index)?;

        {
            let _trap = ErrorTrap::new(&**conn);
            if let Err(err) = conn.select_input(root, EventMask::STRUCTURE_NOTIFY) {
                log::debug!("screen {}: select_input on root: {:#}", screen_index, err);
            }
        }
        let root_filter = Some(EventFilter::new(conn, root));

        let mut screen = Self {
            conn: Rc::clone(conn),
            screen_index,
            root,
            atoms,
            config,
            root_filter,
            state: TrackerState::Idle,
            store: SettingsStore::new(),
            derived_published: false,
        };

        if let Some(scale) = screen.config.fixed_window_scale {
            sink.set_window_scale(screen_index, scale);
        }

        screen.check_manager_window(sink, false);
        if !screen.derived_published {
            // Nothing usable was read, but the toolkit still learns
            // that the resolution is unset
            screen.publish_derived(sink);
        }
        Ok(screen)
    }

    pub fn screen_index(&self) -> usize {
        self.screen_index
    }

    pub fn manager_window(&self) -> Option<WindowId> {
        match &self.state {
            TrackerState::Tracking(filter) => Some(filter.window()),
            TrackerState::Idle | TrackerState::TornDown => None,
        }
    }

    pub fn is_torn_down(&self) -> bool {
        matches!(self.state, TrackerState::TornDown)
    }

    pub fn settings(&self) -> Option<&XSettingsMap> {
        self.store.current()
    }

    pub fn get_setting(&self, name: &str) -> Option<&XSetting> {
        self.store.get(name)
    }

    /// Whether events for `window` belong to this screen
    pub fn watches(&self, window: WindowId) -> bool {
        if self.is_torn_down() {
            return false;
        }
        window == self.root || Some(window) == self.manager_window()
    }

    /// Returns true if the event was meant for this screen
    pub fn handle_event(&mut self, event: &RawEvent, sink: &mut dyn SettingsSink) -> bool {
        if self.is_torn_down() {
            return false;
        }
        let manager = self.manager_window();

        match *event {
            RawEvent::ClientMessage {
                window,
                message_type,
                data,
            } if window == self.root
                && message_type == self.atoms.manager
                && data[1] == self.atoms.selection =>
            {
                log::trace!("screen {}: new settings manager", self.screen_index);
                self.check_manager_window(sink, true);
                true
            }
            RawEvent::PropertyNotify { window, atom } if Some(window) == manager => {
                if atom == self.atoms.settings {
                    log::trace!("screen {}: settings property changed", self.screen_index);
                    self.read_settings(sink, true);
                }
                true
            }
            RawEvent::DestroyNotify { window } if Some(window) == manager => {
                log::trace!("screen {}: settings manager went away", self.screen_index);
                self.check_manager_window(sink, true);
                true
            }
            _ => false,
        }
    }

    /// Read the settings again without waiting for the manager to
    /// tell us they changed
    pub fn force_reread(&mut self, sink: &mut dyn SettingsSink) {
        match self.state {
            TrackerState::Tracking(_) => self.read_settings(sink, true),
            TrackerState::Idle => self.check_manager_window(sink, true),
            TrackerState::TornDown => {}
        }
    }

    /// Release the filters and forget everything. Further events
    /// are ignored.
    pub fn teardown(&mut self) {
        if self.is_torn_down() {
            return;
        }
        log::debug!("screen {}: teardown", self.screen_index);
        self.state = TrackerState::TornDown;
        self.root_filter.take();
        self.store.clear();
    }

    fn check_manager_window(&mut self, sink: &mut dyn SettingsSink, notify: bool) {
        if self.is_torn_down() {
            return;
        }

        // Only a completed query may change what we track
        let owner = match self.query_owner() {
            Ok(owner) => owner,
            Err(err) => {
                log::warn!(
                    "screen {}: failed to query settings manager: {:#}",
                    self.screen_index,
                    err
                );
                return;
            }
        };

        // Release the old filter before binding, the owner may be
        // the same window as before
        self.state = TrackerState::Idle;

        match owner {
            Some(window) => {
                log::debug!(
                    "screen {}: settings manager is window {:#x}",
                    self.screen_index,
                    window
                );
                self.state = TrackerState::Tracking(EventFilter::new(&self.conn, window));
            }
            None => {
                log::debug!("screen {}: no settings manager", self.screen_index);
            }
        }

        self.read_settings(sink, notify);
    }

    /// Find the selection owner and select for events on it while the
    /// server is grabbed, so that it can't go away in between
    fn query_owner(&self) -> anyhow::Result<Option<WindowId>> {
        let _grab = ServerGrab::new(&*self.conn)?;
        let owner = self
            .conn
            .selection_owner(self.atoms.selection)?
            .filter(|window| *window != NONE);

        if let Some(window) = owner {
            let _trap = ErrorTrap::new(&*self.conn);
            if let Err(err) = self.conn.select_input(
                window,
                EventMask::STRUCTURE_NOTIFY | EventMask::PROPERTY_CHANGE,
            ) {
                log::debug!("select_input on manager {:#x}: {:#}", window, err);
            }
        }

        Ok(owner)
    }

    fn read_settings(&mut self, sink: &mut dyn SettingsSink, notify: bool) {
        let settings = match self.manager_window() {
            Some(window) => match self.fetch(window) {
                Some(settings) => Some(settings),
                None => return,
            },
            None => None,
        };
        self.install(settings, sink, notify);
    }

    /// Reads and parses the manager's settings property.
    /// Returns None if there is nothing usable, in which case the
    /// current generation stays as it is.
    fn fetch(&self, window: WindowId) -> Option<XSettingsMap> {
        let reply = {
            let _trap = ErrorTrap::new(&*self.conn);
            self.conn
                .get_property(window, self.atoms.settings, self.atoms.settings, u32::MAX)
        };

        let reply = match reply {
            Ok(reply) if reply.actual_type != NONE => reply,
            Ok(_) => {
                log::debug!(
                    "screen {}: manager {:#x} has no settings",
                    self.screen_index,
                    window
                );
                record_read("no_data");
                return None;
            }
            Err(err) => {
                log::debug!(
                    "screen {}: reading settings from {:#x}: {:#}",
                    self.screen_index,
                    window,
                    err
                );
                record_read("no_data");
                return None;
            }
        };

        if reply.actual_type != self.atoms.settings {
            log::warn!(
                "screen {}: settings property has type {} rather than _XSETTINGS_SETTINGS",
                self.screen_index,
                reply.actual_type
            );
            record_read("wrong_type");
            return None;
        }

        if reply.format != 8 {
            log::warn!(
                "screen {}: settings property has format {} rather than 8",
                self.screen_index,
                reply.format
            );
            record_read("wrong_format");
            return None;
        }

        metrics::histogram!("xsettings.payload.size").record(reply.data.len() as f64);

        match parse_xsettings_with_serial(&reply.data) {
            Ok(parsed) => {
                log::debug!(
                    "screen {}: read {} settings, serial {}",
                    self.screen_index,
                    parsed.settings.len(),
                    parsed.serial
                );
                record_read("ok");
                Some(parsed.settings)
            }
            Err(err) => {
                log::warn!(
                    "screen {}: ignoring malformed settings: {:#}",
                    self.screen_index,
                    err
                );
                record_read("malformed");
                None
            }
        }
    }

    fn install(
        &mut self,
        mut settings: Option<XSettingsMap>,
        sink: &mut dyn SettingsSink,
        notify: bool,
    ) {
        if let Some(settings) = settings.as_mut() {
            inject_unscaled_dpi(settings, self.config.fixed_scale());
        }
        let old = self.store.replace(settings);

        self.publish_derived(sink);

        if notify {
            notify_changes(self.screen_index, old.as_ref(), self.store.current(), sink);
        }
    }

    fn publish_derived(&mut self, sink: &mut dyn SettingsSink) {
        publish_derived(self.screen_index, self.store.current(), &self.config, sink);
        self.derived_published = true;
    }
}

impl<C: XConnection + ?Sized> Drop for ScreenSettings<C> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn record_read(result: &'static str) {
    metrics::counter!("xsettings.read", "result" => result).increment(1);
}
