//! Client for the external filesystem service plus pure listing helpers.
//!
//! The service accepts `{ action, path, ... }` requests and returns JSON file
//! listings; it is an external collaborator. Sorting lives here as pure
//! functions so the file-manager screens share one implementation.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;
use uuid::Uuid;

/// Actions understood by the filesystem service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FileAction {
    List,
    Create,
    Update,
    Delete,
    Rename,
    Compress,
    Share,
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    pub size: u64,
    pub modified: DateTime<Local>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileRequest {
    pub action: FileAction,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_token: Option<Uuid>,
}

impl FileRequest {
    pub fn new(action: FileAction, path: impl Into<String>) -> Self {
        Self {
            action,
            path: path.into(),
            new_path: None,
            content: None,
            query: None,
            share_token: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileListing {
    pub entries: Vec<FileEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum SortKey {
    Name,
    Size,
    Modified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Stable sort of a listing: directories group before files, then the chosen
/// key in the chosen order. Repeated application of the same key/order is a
/// no-op.
pub fn sort_entries(entries: &mut [FileEntry], key: SortKey, order: SortOrder) {
    entries.sort_by(|a, b| {
        let group = b.is_dir.cmp(&a.is_dir);
        if group != std::cmp::Ordering::Equal {
            return group;
        }
        let ordering = match key {
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::Size => a.size.cmp(&b.size),
            SortKey::Modified => a.modified.cmp(&b.modified),
        };
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}

/// Client for the filesystem service endpoint.
pub struct FilesystemClient {
    endpoint: Url,
    agent: ureq::Agent,
}

impl FilesystemClient {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            agent: ureq::Agent::new_with_defaults(),
        }
    }

    fn post(&self, request: &FileRequest) -> Result<FileListing> {
        let mut response = self
            .agent
            .post(self.endpoint.as_str())
            .send_json(request)
            .with_context(|| {
                format!(
                    "Filesystem service rejected {} for {}",
                    request.action, request.path
                )
            })?;
        response
            .body_mut()
            .read_json()
            .context("Filesystem service returned a malformed listing")
    }

    pub fn list(&self, path: &str) -> Result<Vec<FileEntry>> {
        Ok(self.post(&FileRequest::new(FileAction::List, path))?.entries)
    }

    pub fn create(&self, path: &str, content: &str) -> Result<()> {
        let mut request = FileRequest::new(FileAction::Create, path);
        request.content = Some(content.to_string());
        self.post(&request)?;
        Ok(())
    }

    pub fn update(&self, path: &str, content: &str) -> Result<()> {
        let mut request = FileRequest::new(FileAction::Update, path);
        request.content = Some(content.to_string());
        self.post(&request)?;
        Ok(())
    }

    pub fn delete(&self, path: &str) -> Result<()> {
        self.post(&FileRequest::new(FileAction::Delete, path))?;
        Ok(())
    }

    pub fn rename(&self, path: &str, new_path: &str) -> Result<()> {
        let mut request = FileRequest::new(FileAction::Rename, path);
        request.new_path = Some(new_path.to_string());
        self.post(&request)?;
        Ok(())
    }

    pub fn compress(&self, path: &str) -> Result<()> {
        self.post(&FileRequest::new(FileAction::Compress, path))?;
        Ok(())
    }

    /// Generate a share token client-side and register it with the service.
    pub fn share(&self, path: &str) -> Result<Uuid> {
        let token = Uuid::new_v4();
        let mut request = FileRequest::new(FileAction::Share, path);
        request.share_token = Some(token);
        self.post(&request)?;
        Ok(token)
    }

    pub fn search(&self, path: &str, query: &str) -> Result<Vec<FileEntry>> {
        let mut request = FileRequest::new(FileAction::Search, path);
        request.query = Some(query.to_string());
        Ok(self.post(&request)?.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(name: &str, is_dir: bool, size: u64, day: u32) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            path: format!("/data/{name}"),
            is_dir,
            size,
            modified: Local.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap(),
        }
    }

    fn sample() -> Vec<FileEntry> {
        vec![
            entry("m42.fits", false, 32_000_000, 3),
            entry("darks", true, 0, 1),
            entry("flats", true, 0, 4),
            entry("m31.fits", false, 48_000_000, 2),
        ]
    }

    #[test]
    fn directories_group_before_files() {
        let mut entries = sample();
        sort_entries(&mut entries, SortKey::Name, SortOrder::Ascending);
        assert!(entries[0].is_dir && entries[1].is_dir);
        assert_eq!(entries[0].name, "darks");
        assert_eq!(entries[2].name, "m31.fits");
    }

    #[test]
    fn sorting_is_idempotent_for_every_key_and_order() {
        for key in [SortKey::Name, SortKey::Size, SortKey::Modified] {
            for order in [SortOrder::Ascending, SortOrder::Descending] {
                let mut once = sample();
                sort_entries(&mut once, key, order);
                let mut twice = once.clone();
                sort_entries(&mut twice, key, order);
                assert_eq!(once, twice, "{key:?} {order:?} not idempotent");
            }
        }
    }

    #[test]
    fn descending_size_puts_largest_file_first() {
        let mut entries = sample();
        sort_entries(&mut entries, SortKey::Size, SortOrder::Descending);
        let files: Vec<_> = entries.iter().filter(|e| !e.is_dir).collect();
        assert_eq!(files[0].name, "m31.fits");
    }

    #[test]
    fn request_serializes_action_snake_case() {
        let request = FileRequest::new(FileAction::List, "/data");
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"action\":\"list\""));
        assert!(!json.contains("new_path"));
    }
}
