//! An [XConnection] that talks to a real X server through xcb.
use crate::conn::{AtomId, EventMask, PropertyReply, RawEvent, WindowId, XConnection};
use anyhow::Context;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use xcb::{x, Xid, XidNew};

pub struct XcbConnection {
    conn: xcb::Connection,
    screen_num: i32,
    trap_depth: Cell<usize>,
    filters: RefCell<HashSet<WindowId>>,
}

impl std::ops::Deref for XcbConnection {
    type Target = xcb::Connection;

    fn deref(&self) -> &xcb::Connection {
        &self.conn
    }
}

fn atom(id: AtomId) -> x::Atom {
    unsafe { x::Atom::new(id) }
}

fn window(id: WindowId) -> x::Window {
    unsafe { x::Window::new(id) }
}

impl XcbConnection {
    /// Connect to `display`, or `$DISPLAY` if it is None
    pub fn connect(display: Option<&str>) -> anyhow::Result<Self> {
        let (conn, screen_num) =
            xcb::Connection::connect(display).context("connecting to the X server")?;
        Ok(Self {
            conn,
            screen_num,
            trap_depth: Cell::new(0),
            filters: RefCell::new(HashSet::new()),
        })
    }

    pub fn default_screen(&self) -> usize {
        self.screen_num as usize
    }

    pub fn screen_count(&self) -> usize {
        self.conn.get_setup().roots().count()
    }

    /// Whether the settings client asked to see events for `window`
    pub fn is_filtered(&self, window: WindowId) -> bool {
        self.filters.borrow().contains(&window)
    }

    /// Returns the next queued event without blocking
    pub fn poll_event(&self) -> anyhow::Result<Option<RawEvent>> {
        loop {
            match self.conn.poll_for_event() {
                Ok(event) => return Ok(event.map(convert_event)),
                Err(xcb::Error::Protocol(err)) => self.protocol_error(err),
                Err(err) => return Err(err).context("poll_for_event"),
            }
        }
    }

    /// Blocks until the next event arrives
    pub fn wait_event(&self) -> anyhow::Result<RawEvent> {
        loop {
            match self.conn.wait_for_event() {
                Ok(event) => return Ok(convert_event(event)),
                Err(xcb::Error::Protocol(err)) => self.protocol_error(err),
                Err(err) => return Err(err).context("wait_for_event"),
            }
        }
    }

    fn protocol_error(&self, err: xcb::ProtocolError) {
        if self.trap_depth.get() > 0 {
            log::debug!("trapped X error: {:?}", err);
        } else {
            log::error!("X error: {:?}", err);
        }
    }
}

fn convert_event(event: xcb::Event) -> RawEvent {
    match event {
        xcb::Event::X(x::Event::PropertyNotify(ev)) => RawEvent::PropertyNotify {
            window: ev.window().resource_id(),
            atom: ev.atom().resource_id(),
        },
        xcb::Event::X(x::Event::DestroyNotify(ev)) => RawEvent::DestroyNotify {
            window: ev.window().resource_id(),
        },
        xcb::Event::X(x::Event::ClientMessage(ev)) => match ev.data() {
            x::ClientMessageData::Data32(data) => RawEvent::ClientMessage {
                window: ev.window().resource_id(),
                message_type: ev.r#type().resource_id(),
                data,
            },
            _ => RawEvent::Other,
        },
        _ => RawEvent::Other,
    }
}

impl XConnection for XcbConnection {
    fn intern_atom(&self, name: &str) -> anyhow::Result<AtomId> {
        let reply = self
            .conn
            .wait_for_reply(self.conn.send_request(&x::InternAtom {
                only_if_exists: false,
                name: name.as_bytes(),
            }))
            .with_context(|| format!("intern_atom {}", name))?;
        Ok(reply.atom().resource_id())
    }

    fn root_window(&self, screen: usize) -> anyhow::Result<WindowId> {
        let setup = self.conn.get_setup();
        let screen_info = setup
            .roots()
            .nth(screen)
            .ok_or_else(|| anyhow::anyhow!("no screen {}", screen))?;
        Ok(screen_info.root().resource_id())
    }

    fn get_property(
        &self,
        win: WindowId,
        property: AtomId,
        req_type: AtomId,
        long_length: u32,
    ) -> anyhow::Result<PropertyReply> {
        let reply = self
            .conn
            .wait_for_reply(self.conn.send_request(&x::GetProperty {
                delete: false,
                window: window(win),
                property: atom(property),
                r#type: atom(req_type),
                long_offset: 0,
                long_length,
            }))
            .context("get_property")?;

        // value() asserts that the format matches the element type
        let data = if reply.format() == 8 {
            reply.value::<u8>().to_vec()
        } else {
            vec![]
        };

        Ok(PropertyReply {
            actual_type: reply.r#type().resource_id(),
            format: reply.format(),
            bytes_after: reply.bytes_after(),
            data,
        })
    }

    fn selection_owner(&self, selection: AtomId) -> anyhow::Result<Option<WindowId>> {
        let reply = self
            .conn
            .wait_for_reply(self.conn.send_request(&x::GetSelectionOwner {
                selection: atom(selection),
            }))
            .context("get_selection_owner")?;
        let owner = reply.owner();
        Ok(if owner.is_none() {
            None
        } else {
            Some(owner.resource_id())
        })
    }

    fn select_input(&self, win: WindowId, mask: EventMask) -> anyhow::Result<()> {
        self.conn
            .check_request(
                self.conn
                    .send_request_checked(&x::ChangeWindowAttributes {
                        window: window(win),
                        value_list: &[x::Cw::EventMask(x::EventMask::from_bits_truncate(
                            mask.bits(),
                        ))],
                    }),
            )
            .context("select_input")
    }

    fn grab_server(&self) -> anyhow::Result<()> {
        self.conn
            .check_request(self.conn.send_request_checked(&x::GrabServer {}))
            .context("grab_server")
    }

    fn ungrab_server(&self) -> anyhow::Result<()> {
        self.conn
            .check_request(self.conn.send_request_checked(&x::UngrabServer {}))
            .context("ungrab_server")
    }

    fn push_error_trap(&self) {
        self.trap_depth.set(self.trap_depth.get() + 1);
    }

    fn pop_error_trap(&self) {
        self.trap_depth.set(self.trap_depth.get().saturating_sub(1));
    }

    fn add_event_filter(&self, window: WindowId) {
        self.filters.borrow_mut().insert(window);
    }

    fn remove_event_filter(&self, window: WindowId) {
        self.filters.borrow_mut().remove(&window);
    }

    fn flush(&self) -> anyhow::Result<()> {
        self.conn.flush().context("flush")
    }
}
