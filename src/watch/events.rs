//! Trigger events consumed by the orchestrator

use notify::event::CreateKind;
use notify::{Event, EventKind};
use std::path::PathBuf;

/// What the filesystem reported about a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    /// A new entry appeared in the watched directory
    Created,
    /// Anything else (modify, remove, access); never triggers a flash
    Other,
}

/// One filesystem event for one path in the watched directory.
///
/// Transient: produced by the watch backend, consumed once by the
/// orchestrator.
#[derive(Debug, Clone)]
pub struct TriggerEvent {
    /// Path of the affected entry
    pub path: PathBuf,
    /// Kind of change reported
    pub kind: TriggerKind,
}

impl TriggerEvent {
    /// Event for a newly created entry
    pub fn created(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: TriggerKind::Created,
        }
    }

    /// Event for any other kind of change
    pub fn other(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: TriggerKind::Other,
        }
    }
}

/// Flatten a notify event into one trigger event per affected path.
///
/// Some backends report new files as `CreateKind::Any`; both that and
/// `CreateKind::File` count as creations. Directory creations are
/// filtered later by the regular-file check, not here.
pub(crate) fn from_notify(event: Event) -> Vec<TriggerEvent> {
    let kind = match event.kind {
        EventKind::Create(CreateKind::File | CreateKind::Any) => TriggerKind::Created,
        _ => TriggerKind::Other,
    };

    event
        .paths
        .into_iter()
        .map(|path| TriggerEvent { path, kind })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notify_event(kind: EventKind, path: &str) -> Event {
        let mut event = Event::new(kind);
        event.paths.push(PathBuf::from(path));
        event
    }

    #[test]
    fn test_create_file_maps_to_created() {
        let triggers = from_notify(notify_event(
            EventKind::Create(CreateKind::File),
            "/watch/fw.hex",
        ));
        assert_eq!(triggers.len(), 1);
        assert_eq!(triggers[0].kind, TriggerKind::Created);
        assert_eq!(triggers[0].path, PathBuf::from("/watch/fw.hex"));
    }

    #[test]
    fn test_create_any_maps_to_created() {
        let triggers = from_notify(notify_event(
            EventKind::Create(CreateKind::Any),
            "/watch/fw.hex",
        ));
        assert_eq!(triggers[0].kind, TriggerKind::Created);
    }

    #[test]
    fn test_modify_maps_to_other() {
        let triggers = from_notify(notify_event(
            EventKind::Modify(notify::event::ModifyKind::Any),
            "/watch/fw.hex",
        ));
        assert_eq!(triggers[0].kind, TriggerKind::Other);
    }

    #[test]
    fn test_multiple_paths_fan_out() {
        let mut event = Event::new(EventKind::Create(CreateKind::File));
        event.paths.push(PathBuf::from("/watch/a.hex"));
        event.paths.push(PathBuf::from("/watch/b.hex"));

        let triggers = from_notify(event);
        assert_eq!(triggers.len(), 2);
    }
}
