//! Device selection and the staged-item set.
//!
//! [`SelectionStore`] is the single container for everything the user has
//! picked so far: the discovered device list, the currently targeted device,
//! and the items staged for an outbound operation. All mutations are named
//! methods executing synchronously; there is no ambient shared state.
//!
//! ## Staged-item identity
//!
//! Staging an item whose identity matches something already staged is a
//! no-op. Identity is kind-specific:
//!
//! | Kind | Identity |
//! |--------|--------------------------|
//! | text | `(content, file_name)` |
//! | file | `source_path` |
//! | folder | `folder_path` |

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::device::Device;
use crate::error::Result;
use crate::host::FolderPicker;

/// Payload of a staged item; exactly one of three kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StagedPayload {
    /// An inline block of text, shared as a generated file
    Text {
        /// The text to share
        #[serde(rename = "textContent")]
        content: String,
        /// File name the text is exposed under
        #[serde(rename = "fileName")]
        file_name: String,
    },
    /// A single file on disk
    File {
        /// Absolute path of the file
        #[serde(rename = "sourcePath")]
        source_path: PathBuf,
        /// File name shown to the receiver
        #[serde(rename = "fileName")]
        file_name: String,
    },
    /// A folder, transferred recursively
    Folder {
        /// Absolute path of the folder
        #[serde(rename = "folderPath")]
        folder_path: PathBuf,
        /// Number of files the folder contained when staged
        #[serde(rename = "fileCount")]
        file_count: usize,
    },
}

/// An item the user has staged for transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedItem {
    /// Unique id, assigned at staging time
    pub id: Uuid,
    /// What is being shared
    #[serde(flatten)]
    pub payload: StagedPayload,
}

impl StagedItem {
    /// Stage an inline text block under the given file name.
    #[must_use]
    pub fn text(content: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload: StagedPayload::Text {
                content: content.into(),
                file_name: file_name.into(),
            },
        }
    }

    /// Stage a file; the display name is derived from the path.
    #[must_use]
    pub fn file(source_path: impl Into<PathBuf>) -> Self {
        let source_path = source_path.into();
        let file_name = source_path
            .file_name()
            .map_or_else(|| source_path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Self {
            id: Uuid::new_v4(),
            payload: StagedPayload::File {
                source_path,
                file_name,
            },
        }
    }

    /// Stage a folder with its file count.
    #[must_use]
    pub fn folder(folder_path: impl Into<PathBuf>, file_count: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload: StagedPayload::Folder {
                folder_path: folder_path.into(),
                file_count,
            },
        }
    }

    /// Name shown in the staged list.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.payload {
            StagedPayload::Text { file_name, .. } | StagedPayload::File { file_name, .. } => {
                file_name.clone()
            }
            StagedPayload::Folder { folder_path, .. } => folder_path
                .file_name()
                .map_or_else(|| folder_path.display().to_string(), |n| n.to_string_lossy().into_owned()),
        }
    }

    /// Whether two items stage the same thing, by kind-specific identity.
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        match (&self.payload, &other.payload) {
            (
                StagedPayload::Text {
                    content: a,
                    file_name: an,
                },
                StagedPayload::Text {
                    content: b,
                    file_name: bn,
                },
            ) => a == b && an == bn,
            (
                StagedPayload::File { source_path: a, .. },
                StagedPayload::File { source_path: b, .. },
            ) => a == b,
            (
                StagedPayload::Folder { folder_path: a, .. },
                StagedPayload::Folder { folder_path: b, .. },
            ) => a == b,
            _ => false,
        }
    }
}

/// Container for the device list, the targeted device, and staged items.
///
/// All operations are total over the in-memory state; none can fail.
#[derive(Debug, Default)]
pub struct SelectionStore {
    /// Devices from the latest discovery refresh
    devices: Vec<Device>,
    /// Currently targeted device
    selected: Option<Device>,
    /// Items staged for transfer, in staging order
    staged: Vec<StagedItem>,
}

impl SelectionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the device list verbatim with a discovery refresh.
    pub fn set_devices(&mut self, devices: Vec<Device>) {
        self.devices = devices;
    }

    /// Devices from the latest refresh.
    #[must_use]
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Select a device, or toggle it off.
    ///
    /// Passing `None` clears the selection. Passing the already-selected
    /// device (matched by fingerprint) also clears it, so a second tap on a
    /// device deselects. Devices without fingerprints never match an
    /// existing selection and are simply set.
    pub fn select_device(&mut self, device: Option<Device>) {
        self.selected = match device {
            Some(d) => {
                if self.selected.as_ref().is_some_and(|s| s.same_device(&d)) {
                    None
                } else {
                    Some(d)
                }
            }
            None => None,
        };
    }

    /// The currently targeted device, if any.
    #[must_use]
    pub fn selected_device(&self) -> Option<&Device> {
        self.selected.as_ref()
    }

    /// Stage an item, unless an identical one is already staged.
    ///
    /// Returns `true` if the item was appended, `false` on a duplicate.
    pub fn add_item(&mut self, item: StagedItem) -> bool {
        if self.staged.iter().any(|existing| existing.same_identity(&item)) {
            return false;
        }
        self.staged.push(item);
        true
    }

    /// Remove a staged item by id. Returns `true` if something was removed.
    pub fn remove_item(&mut self, id: &Uuid) -> bool {
        let len_before = self.staged.len();
        self.staged.retain(|item| &item.id != id);
        self.staged.len() < len_before
    }

    /// Remove all staged items.
    pub fn clear_items(&mut self) {
        self.staged.clear();
    }

    /// Items staged for transfer, in staging order.
    #[must_use]
    pub fn staged(&self) -> &[StagedItem] {
        &self.staged
    }

    /// Reset devices, selection, and staged items to initial state.
    pub fn reset(&mut self) {
        self.devices.clear();
        self.selected = None;
        self.staged.clear();
    }
}

/// Run the folder picker and stage the chosen folder.
///
/// Returns the new item's id, or `None` when the user cancelled the picker
/// or the folder was already staged.
pub async fn stage_picked_folder(
    store: &mut SelectionStore,
    picker: &dyn FolderPicker,
    start_path: &Path,
) -> Result<Option<Uuid>> {
    let Some(picked) = picker.pick_folder(start_path).await? else {
        return Ok(None);
    };
    let item = StagedItem::folder(picked.path, picked.file_count);
    let id = item.id;
    Ok(store.add_item(item).then_some(id))
}
