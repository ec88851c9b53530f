use crate::sink::{SettingAction, SettingsSink};
use xsettings_wire::names::is_consumer_visible;
use xsettings_wire::XSettingsMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingChange {
    pub name: String,
    pub action: SettingAction,
}

/// Compute the consumer-visible differences between two generations.
/// Additions and changes are listed before deletions.
pub fn diff_settings(
    old: Option<&XSettingsMap>,
    new: Option<&XSettingsMap>,
) -> Vec<SettingChange> {
    let mut changes = vec![];

    if let Some(new) = new {
        for (name, value) in new {
            let action = match old.and_then(|old| old.get(name)) {
                None => SettingAction::Added,
                Some(prior) if prior != value => SettingAction::Changed,
                Some(_) => continue,
            };
            if is_consumer_visible(name) {
                changes.push(SettingChange {
                    name: name.clone(),
                    action,
                });
            }
        }
    }

    if let Some(old) = old {
        for name in old.keys() {
            let seen = new.map(|new| new.contains_key(name)).unwrap_or(false);
            if !seen && is_consumer_visible(name) {
                changes.push(SettingChange {
                    name: name.clone(),
                    action: SettingAction::Deleted,
                });
            }
        }
    }

    changes
}

/// Diff two generations and deliver the result to the sink as one batch
pub fn notify_changes(
    screen: usize,
    old: Option<&XSettingsMap>,
    new: Option<&XSettingsMap>,
    sink: &mut dyn SettingsSink,
) {
    for change in diff_settings(old, new) {
        log::trace!("screen {}: {} {:?}", screen, change.name, change.action);
        sink.notify(screen, &change.name, change.action);
    }
}
