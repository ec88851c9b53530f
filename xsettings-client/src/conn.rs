//! The slice of the X11 protocol that settings tracking needs.
//! The host application hands us an implementation of [XConnection];
//! the `x11` feature provides one backed by xcb, and tests use a fake.
use bitflags::bitflags;
use std::rc::Rc;

pub type WindowId = u32;
pub type AtomId = u32;

/// The `None` resource id
pub const NONE: u32 = 0;

bitflags! {
    /// The core protocol event mask bits we select on windows
    pub struct EventMask: u32 {
        const STRUCTURE_NOTIFY = 1 << 17;
        const PROPERTY_CHANGE = 1 << 22;
    }
}

/// The result of a GetProperty request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyReply {
    /// `NONE` if the window has no such property
    pub actual_type: AtomId,
    pub format: u8,
    pub bytes_after: u32,
    pub data: Vec<u8>,
}

/// The raw X events that can drive the settings tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEvent {
    PropertyNotify {
        window: WindowId,
        atom: AtomId,
    },
    DestroyNotify {
        window: WindowId,
    },
    ClientMessage {
        window: WindowId,
        message_type: AtomId,
        data: [u32; 5],
    },
    Other,
}

impl RawEvent {
    pub fn window(&self) -> Option<WindowId> {
        match self {
            Self::PropertyNotify { window, .. }
            | Self::DestroyNotify { window }
            | Self::ClientMessage { window, .. } => Some(*window),
            Self::Other => None,
        }
    }
}

pub trait XConnection {
    fn intern_atom(&self, name: &str) -> anyhow::Result<AtomId>;

    fn root_window(&self, screen: usize) -> anyhow::Result<WindowId>;

    /// Read up to `long_length` 32-bit units of a property, starting
    /// at offset 0, without deleting it.
    fn get_property(
        &self,
        window: WindowId,
        property: AtomId,
        req_type: AtomId,
        long_length: u32,
    ) -> anyhow::Result<PropertyReply>;

    fn selection_owner(&self, selection: AtomId) -> anyhow::Result<Option<WindowId>>;

    fn select_input(&self, window: WindowId, mask: EventMask) -> anyhow::Result<()>;

    fn grab_server(&self) -> anyhow::Result<()>;
    fn ungrab_server(&self) -> anyhow::Result<()>;

    /// Protocol errors raised between a push and its matching pop
    /// are swallowed rather than reported to the default handler.
    fn push_error_trap(&self);
    fn pop_error_trap(&self);

    /// Route raw events for `window` to the settings tracker
    fn add_event_filter(&self, window: WindowId);
    fn remove_event_filter(&self, window: WindowId);

    fn flush(&self) -> anyhow::Result<()>;
}

/// Holds an error trap for as long as it is alive
pub struct ErrorTrap<'a, C: XConnection + ?Sized> {
    conn: &'a C,
}

impl<'a, C: XConnection + ?Sized> ErrorTrap<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        conn.push_error_trap();
        Self { conn }
    }
}

impl<'a, C: XConnection + ?Sized> Drop for ErrorTrap<'a, C> {
    fn drop(&mut self) {
        self.conn.pop_error_trap();
    }
}

/// Holds the server grabbed; ungrabs and flushes on drop so that
/// nothing can change between our queries and the requests that
/// depend on them.
pub struct ServerGrab<'a, C: XConnection + ?Sized> {
    conn: &'a C,
}

impl<'a, C: XConnection + ?Sized> ServerGrab<'a, C> {
    pub fn new(conn: &'a C) -> anyhow::Result<Self> {
        conn.grab_server()?;
        Ok(Self { conn })
    }
}

impl<'a, C: XConnection + ?Sized> Drop for ServerGrab<'a, C> {
    fn drop(&mut self) {
        if let Err(err) = self.conn.ungrab_server() {
            log::error!("ungrab_server: {:#}", err);
        }
        if let Err(err) = self.conn.flush() {
            log::error!("flush after ungrab: {:#}", err);
        }
    }
}

/// An event filter registration; unregistered when dropped.
pub struct EventFilter<C: XConnection + ?Sized> {
    conn: Rc<C>,
    window: WindowId,
}

impl<C: XConnection + ?Sized> EventFilter<C> {
    pub fn new(conn: &Rc<C>, window: WindowId) -> Self {
        conn.add_event_filter(window);
        Self {
            conn: Rc::clone(conn),
            window,
        }
    }

    pub fn window(&self) -> WindowId {
        self.window
    }
}

impl<C: XConnection + ?Sized> Drop for EventFilter<C> {
    fn drop(&mut self) {
        self.conn.remove_event_filter(self.window);
    }
}

impl<C: XConnection + ?Sized> std::fmt::Debug for EventFilter<C> {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        fmt.debug_struct("EventFilter")
            .field("window", &self.window)
            .finish()
    }
}
