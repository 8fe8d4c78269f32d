//! Mounted volume enumeration and label matching

use std::path::{Path, PathBuf};

/// Snapshot of one volume at query time.
///
/// Snapshots are never cached; attach/detach state changes between
/// trigger events, so the provider is queried afresh every time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    /// Human-readable volume label
    pub label: String,
    /// Mount root, when the volume is currently mounted
    pub mount_root: Option<PathBuf>,
    /// Whether an unmounted volume could be mounted
    pub can_mount: bool,
}

impl Volume {
    /// Convenience constructor for a mounted volume
    pub fn mounted(label: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            mount_root: Some(root.into()),
            can_mount: true,
        }
    }
}

/// Source of mounted-volume snapshots.
///
/// `find_by_label` must enumerate afresh on every call and match the
/// label by exact, case-sensitive string equality. A miss yields an
/// empty vector, never an error.
pub trait VolumeProvider: Send + Sync {
    /// All volumes whose label exactly equals `label`
    fn find_by_label(&self, label: &str) -> Vec<Volume>;
}

/// Volume provider backed by the operating system's mount table.
///
/// Only mounted disks are visible through this provider, so every
/// returned volume carries a mount root. A disk counts as a match when
/// either its reported name or its mount point's final path component
/// equals the target label, since the underlying enumeration exposes
/// the filesystem volume name on some platforms and the block device
/// node on others.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemVolumes;

impl SystemVolumes {
    /// Create a system-backed volume provider
    pub fn new() -> Self {
        Self
    }
}

impl VolumeProvider for SystemVolumes {
    fn find_by_label(&self, label: &str) -> Vec<Volume> {
        use sysinfo::Disks;

        let disks = Disks::new_with_refreshed_list();

        disks
            .iter()
            .filter(|disk| {
                disk_matches_label(&disk.name().to_string_lossy(), disk.mount_point(), label)
            })
            .map(|disk| Volume {
                label: label.to_string(),
                mount_root: Some(disk.mount_point().to_path_buf()),
                can_mount: true,
            })
            .collect()
    }
}

/// Whether a disk matches the target label.
///
/// The disk name is the filesystem volume name on macOS but the block
/// device node (e.g. `/dev/sdb1`) on Linux, where udisks mounts
/// removable media at `<base>/<LABEL>` instead. Matching either the
/// reported name or the mount point's final component, both by exact
/// case-sensitive equality, covers both layouts.
fn disk_matches_label(name: &str, mount_point: &Path, label: &str) -> bool {
    if name == label {
        return true;
    }
    mount_point.file_name().is_some_and(|dir| dir == label)
}
