// API client module: a blocking HTTP session against the drive web service.
// One `DriveSession` owns the cookie jar the service uses for its login
// session and CSRF token, plus the identity decoded at login.

use crate::config::DriveConfig;
use crate::error::{DriveError, Result};
use crate::models::{
    CreateFolderRequest, EntriesPage, EntryDetails, Folder, FoldersResponse, LoginRequest,
    LoginResponse, RemoveEntriesRequest, UsageInfo, UserDetails,
};
use crate::paging;
use base64::{engine::general_purpose, Engine as _};
use log::{debug, info};
use percent_encoding::percent_decode_str;
use reqwest::blocking::{multipart, Client, Response};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::cell::Cell;
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

/// Cookie carrying the anti-forgery token.
pub const XSRF_COOKIE: &str = "XSRF-TOKEN";
/// Header the service expects the token echoed in.
pub const XSRF_HEADER: &str = "X-XSRF-TOKEN";

pub const DEFAULT_ORDER_BY: &str = "updated_at";
pub const DEFAULT_ORDER_DIR: &str = "desc";
/// Folder id the service uses for the top of the drive.
pub const ROOT_FOLDER: &str = "root";

/// An authenticated (or not yet authenticated) session with the service.
///
/// The session is deliberately neither `Clone` nor `Sync`: login cookies and
/// the decoded identity belong to this one handle. Move it between threads
/// if needed, but do not share it.
pub struct DriveSession {
    client: Client,
    jar: Arc<Jar>,
    base: Url,
    config: DriveConfig,
    user: Option<UserDetails>,
    _not_sync: PhantomData<Cell<()>>,
}

impl DriveSession {
    /// Build a session with an empty cookie jar for the configured host.
    pub fn new(config: DriveConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| {
            DriveError::Config(format!("invalid base url {:?}: {}", config.base_url, e))
        })?;
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(DriveSession {
            client,
            jar,
            base,
            config,
            user: None,
            _not_sync: PhantomData,
        })
    }

    /// Session built from `DriveConfig::from_env`.
    pub fn from_env() -> Result<Self> {
        Self::new(DriveConfig::from_env()?)
    }

    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    pub fn user(&self) -> Option<&UserDetails> {
        self.user.as_ref()
    }

    /// Numeric id of the logged-in user, if any.
    pub fn user_id(&self) -> Option<u64> {
        self.user.as_ref().map(|u| u.user.id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn require_user_id(&self, operation: &'static str) -> Result<u64> {
        self.user_id().ok_or(DriveError::AuthRequired(operation))
    }

    /// Log in with e-mail and password, asking for a persistent session.
    ///
    /// On a "success" status the base64 payload is decoded into the user
    /// identity kept by this session. Any other status returns
    /// `DriveError::Service`. A failed attempt, for whatever reason, leaves
    /// the session unauthenticated even if an earlier login had succeeded.
    pub fn authenticate(&mut self, email: &str, password: &str) -> Result<&UserDetails> {
        info!("Logging in as {}", email);
        self.user = None;
        let req = LoginRequest {
            remember: true,
            email,
            password,
        };
        let res = self.client.post(self.url("/secure/auth/login")).json(&req).send()?;
        let resp: LoginResponse = read_json(res, "login")?;

        if resp.status != "success" {
            return Err(DriveError::Service {
                operation: "login",
                status: resp.status,
            });
        }

        let decoded = general_purpose::STANDARD.decode(resp.data.trim())?;
        let details: UserDetails = serde_json::from_slice(&decoded).map_err(|source| {
            DriveError::Decode {
                operation: "login",
                source,
            }
        })?;
        info!("Logged in as user {}", details.user.id);
        Ok(self.user.insert(details))
    }

    /// Current CSRF token, read from the cookie jar and URL-decoded. Empty if
    /// the service has not set one. Never cached: the service may rotate it
    /// on any response.
    pub fn csrf_token(&self) -> String {
        let token = self
            .jar
            .cookies(&self.base)
            .and_then(|header| {
                header
                    .to_str()
                    .ok()
                    .and_then(|h| cookie_value(h, XSRF_COOKIE))
                    .map(|raw| percent_decode_str(raw).decode_utf8_lossy().into_owned())
            })
            .unwrap_or_default();
        debug!("csrf token present: {}", !token.is_empty());
        token
    }

    /// Space used and available, in bytes.
    pub fn get_usage(&self) -> Result<UsageInfo> {
        info!("Getting space usage");
        let res = self
            .client
            .get(self.url("/secure/drive/user/space-usage"))
            .send()?;
        read_json(res, "space usage")
    }

    /// All folders of the logged-in user.
    pub fn list_folders(&self) -> Result<Vec<Folder>> {
        let user_id = self.require_user_id("list folders")?;
        info!("Getting folders");
        let res = self
            .client
            .get(self.url(&format!("/secure/drive/users/{}/folders", user_id)))
            .send()?;
        let resp: FoldersResponse = read_json(res, "list folders")?;
        if resp.status != "success" {
            return Err(DriveError::Service {
                operation: "list folders",
                status: resp.status,
            });
        }
        Ok(resp.folders)
    }

    /// Fetch a single page of entries in `folder_id`. Ordering defaults to
    /// most recently updated first.
    pub fn list_entries_page(
        &self,
        folder_id: &str,
        page: u32,
        order_by: Option<&str>,
        order_dir: Option<&str>,
    ) -> Result<EntriesPage> {
        info!("Getting entries page {} of {}", page, folder_id);
        let page_param = page.to_string();
        let query = [
            ("orderBy", order_by.unwrap_or(DEFAULT_ORDER_BY)),
            ("orderDir", order_dir.unwrap_or(DEFAULT_ORDER_DIR)),
            ("page", page_param.as_str()),
            ("folderId", folder_id),
        ];
        let res = self
            .client
            .get(self.url("/secure/drive/entries"))
            .query(&query)
            .send()?;
        read_json(res, "list entries")
    }

    /// Every entry in `folder_id`, walking pages until the service reports
    /// no more or `max_pages` is reached.
    pub fn list_all_entries(&self, folder_id: &str) -> Result<Vec<EntryDetails>> {
        info!("Getting entries of {}", folder_id);
        paging::collect_pages(self.config.max_pages, |page| {
            self.list_entries_page(folder_id, page, None, None)
        })
    }

    /// Delete entries by id.
    pub fn remove_entries(&self, entry_ids: &[String]) -> Result<()> {
        info!("Removing {:?}", entry_ids);
        let token = self.csrf_token();
        let res = self
            .client
            .post(self.url("/secure/drive/entries"))
            .header(XSRF_HEADER, token)
            .json(&RemoveEntriesRequest::new(entry_ids))
            .send()?;
        check_status(res, "remove entries")?;
        Ok(())
    }

    /// Create folder `name` under `parent_id`, or at the root when `None`.
    pub fn make_directory(&self, parent_id: Option<&str>, name: &str) -> Result<()> {
        info!("Creating directory {:?} under {:?}", name, parent_id);
        let token = self.csrf_token();
        let res = self
            .client
            .post(self.url("/secure/drive/folders"))
            .header(XSRF_HEADER, token)
            .json(&CreateFolderRequest { name, parent_id })
            .send()?;
        check_status(res, "create folder")?;
        Ok(())
    }

    /// Upload the file at `local_path` into folder `parent_id` in one request.
    pub fn upload_file(&self, parent_id: &str, local_path: &Path) -> Result<()> {
        info!("Uploading {} into {}", local_path.display(), parent_id);
        // Fails on a missing source before anything goes over the wire.
        let form = multipart::Form::new()
            .text("parent_id", parent_id.to_string())
            .file("file", local_path)?;
        let token = self.csrf_token();
        let res = self
            .client
            .post(self.url("/secure/uploads"))
            .header(XSRF_HEADER, token)
            .multipart(form)
            .send()?;
        check_status(res, "upload")?;
        Ok(())
    }
}

/// Value of cookie `name` in a `Cookie` header string (`a=1; b=2`).
///
/// `reqwest`'s `Jar` has no per-cookie lookup; `CookieStore::cookies` only
/// hands back the header it would send for a URL, so we search that.
fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').map(str::trim).find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then_some(value)
    })
}

fn check_status(res: Response, operation: &'static str) -> Result<Response> {
    let status = res.status();
    debug!("{} -> HTTP {}", operation, status);
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().unwrap_or_default();
    Err(DriveError::Http {
        operation,
        status: status.as_u16(),
        body,
    })
}

fn read_json<T: DeserializeOwned>(res: Response, operation: &'static str) -> Result<T> {
    let body = check_status(res, operation)?.text()?;
    serde_json::from_str(&body).map_err(|source| DriveError::Decode { operation, source })
}
