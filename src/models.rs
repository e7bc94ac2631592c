// Wire shapes for the drive service. Field names follow the service's JSON;
// nullable fields are `Option`, and plain scalars fall back to their default
// when missing or `null`, so a partially populated record still decodes.

use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Login request payload. `remember` asks for a persistent session.
#[derive(Serialize, Debug)]
pub struct LoginRequest<'a> {
    pub remember: bool,
    pub email: &'a str,
    pub password: &'a str,
}

/// Login response. `data` is base64 encoded JSON of `UserDetails`.
#[derive(Deserialize, Debug)]
pub struct LoginResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
}

/// Identity of the logged-in account, decoded from the login payload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserDetails {
    pub user: UserIdentity,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserIdentity {
    pub id: u64,
    #[serde(default)]
    pub email: Option<String>,
}

/// Storage usage in bytes as reported by the service.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct UsageInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub used: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub available: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Folder {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct FoldersResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub folders: Vec<Folder>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
}

/// A user an entry is shared with (or owned by).
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owns_entry: bool,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A file or folder record. Read-only snapshot of what the service returned.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct EntryDetails {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub mime: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub deleted_at: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub public_path: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub public: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thumbnail: bool,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub users: Vec<User>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

impl EntryDetails {
    pub fn is_folder(&self) -> bool {
        self.kind.as_deref() == Some("folder")
    }
}

/// One page of the entries listing.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct EntriesPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_page: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<EntryDetails>,
    #[serde(default)]
    pub from: Option<u64>,
    #[serde(default)]
    pub last_page: Option<u32>,
    #[serde(default)]
    pub next_page_url: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub prev_page_url: Option<String>,
    /// Index of the last item on this page; null on an empty page.
    #[serde(default)]
    pub to: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u64,
}

/// Body of the delete call. The service only routes POST here, so the verb
/// travels as a method override.
#[derive(Serialize, Debug)]
pub struct RemoveEntriesRequest<'a> {
    #[serde(rename = "_method")]
    pub method: &'static str,
    #[serde(rename = "entryIds")]
    pub entry_ids: &'a [String],
}

impl<'a> RemoveEntriesRequest<'a> {
    pub fn new(entry_ids: &'a [String]) -> Self {
        RemoveEntriesRequest {
            method: "DELETE",
            entry_ids,
        }
    }
}

/// Body of the folder creation call. A `None` parent serializes as `null`
/// and creates the folder at the drive root.
#[derive(Serialize, Debug)]
pub struct CreateFolderRequest<'a> {
    pub name: &'a str,
    pub parent_id: Option<&'a str>,
}
