use crate::config::ClientConfig;
use crate::conn::{RawEvent, WindowId, XConnection};
use crate::screen::ScreenSettings;
use crate::sink::SettingsSink;
use std::rc::Rc;
use xsettings_wire::{XSetting, XSettingsMap};

/// Tracks the settings managers of a set of screens and forwards
/// what they publish to a [SettingsSink].
pub struct XSettingsClient<C: XConnection + ?Sized> {
    conn: Rc<C>,
    screens: Vec<ScreenSettings<C>>,
    sink: Box<dyn SettingsSink>,
}

impl<C: XConnection + ?Sized> XSettingsClient<C> {
    pub fn new(
        conn: Rc<C>,
        screens: &[usize],
        config: ClientConfig,
        sink: Box<dyn SettingsSink>,
    ) -> anyhow::Result<Self> {
        let mut client = Self {
            conn,
            screens: Vec::with_capacity(screens.len()),
            sink,
        };

        for &screen_index in screens {
            anyhow::ensure!(
                client.screen(screen_index).is_none(),
                "screen {} requested twice",
                screen_index
            );
            let screen = ScreenSettings::new(
                &client.conn,
                screen_index,
                config.clone(),
                client.sink.as_mut(),
            )?;
            client.screens.push(screen);
        }

        Ok(client)
    }

    pub fn conn(&self) -> &Rc<C> {
        &self.conn
    }

    /// Hand a raw event to whichever screen is interested in it.
    /// Returns true if the event was consumed.
    pub fn process_event(&mut self, event: &RawEvent) -> bool {
        let window = match event.window() {
            Some(window) => window,
            None => return false,
        };
        for screen in &mut self.screens {
            if screen.watches(window) && screen.handle_event(event, self.sink.as_mut()) {
                return true;
            }
        }
        log::trace!("ignoring {:?}", event);
        false
    }

    pub fn get_setting(&self, screen: usize, name: &str) -> Option<&XSetting> {
        self.screen(screen)?.get_setting(name)
    }

    pub fn settings(&self, screen: usize) -> Option<&XSettingsMap> {
        self.screen(screen)?.settings()
    }

    pub fn manager_window(&self, screen: usize) -> Option<WindowId> {
        self.screen(screen)?.manager_window()
    }

    pub fn force_reread(&mut self, screen: usize) -> anyhow::Result<()> {
        let sink = self.sink.as_mut();
        match self
            .screens
            .iter_mut()
            .find(|s| s.screen_index() == screen)
        {
            Some(s) => {
                s.force_reread(sink);
                Ok(())
            }
            None => anyhow::bail!("screen {} is not being tracked", screen),
        }
    }

    pub fn teardown(&mut self) {
        for screen in &mut self.screens {
            screen.teardown();
        }
    }

    fn screen(&self, screen: usize) -> Option<&ScreenSettings<C>> {
        self.screens.iter().find(|s| s.screen_index() == screen)
    }
}

impl<C: XConnection + ?Sized> Drop for XSettingsClient<C> {
    fn drop(&mut self) {
        self.teardown();
    }
}
