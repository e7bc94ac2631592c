// UI layer: interactive menu built on `dialoguer`, with `indicatif` spinners
// while requests are in flight. Each flow prints its own result; a failed
// request never ends the menu loop.

use crate::api::{DriveSession, ROOT_FOLDER};
use crate::models::EntryDetails;
use anyhow::Result;
use dialoguer::{Confirm, Input, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

const EMAIL_FILE: &str = ".thunderdrive_email";

/// Main interactive menu. Owns the session so a login made in one flow is
/// seen by every later flow.
pub fn main_menu(mut session: DriveSession) -> Result<()> {
    loop {
        let items = vec![
            "Login",
            "Space usage",
            "List folders",
            "List entries",
            "Create folder",
            "Upload file",
            "Remove entries",
            "Exit",
        ];
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => handle_login(&mut session)?,
            1 => show_usage(&session),
            2 => show_folders(&session),
            3 => show_entries(&session)?,
            4 => handle_mkdir(&session)?,
            5 => handle_upload(&session)?,
            6 => handle_remove(&session)?,
            7 => break,
            _ => {}
        }
    }
    Ok(())
}

fn require_login(session: &DriveSession) -> bool {
    if !session.is_authenticated() {
        println!("You should login first.");
        return false;
    }
    true
}

/// Run `f` behind a spinner showing `msg`.
fn with_spinner<T>(msg: &'static str, f: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(msg);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let out = f();
    spinner.finish_and_clear();
    out
}

/// Collect credentials and log in. The e-mail prompt is pre-filled from
/// `THUNDERDRIVE_EMAIL` or the last successful login.
fn handle_login(session: &mut DriveSession) -> Result<()> {
    let mut prompt = Input::<String>::new();
    prompt.with_prompt("Email");
    if let Some(email) = std::env::var("THUNDERDRIVE_EMAIL").ok().or_else(load_email) {
        prompt.default(email);
    }
    let email = prompt.interact_text()?;
    let password: String = Password::new().with_prompt("Password").interact()?;

    let login = with_spinner("Logging in...", || {
        session
            .authenticate(&email, &password)
            .map(|details| details.user.id)
    });
    match login {
        Ok(user_id) => {
            println!("Logged in as user {}", user_id);
            if let Err(e) = persist_email(&email) {
                log::warn!("could not remember e-mail: {}", e);
            }
        }
        Err(e) => println!("Login failed: {}", e),
    }
    Ok(())
}

fn show_usage(session: &DriveSession) {
    match with_spinner("Fetching usage...", || session.get_usage()) {
        Ok(usage) => println!(
            "Used {} of {} ({})",
            human_bytes(non_negative(usage.used)),
            human_bytes(non_negative(usage.available)),
            usage.status
        ),
        Err(e) => println!("Usage request failed: {}", e),
    }
}

fn show_folders(session: &DriveSession) {
    if !require_login(session) {
        return;
    }
    match with_spinner("Fetching folders...", || session.list_folders()) {
        Ok(folders) if folders.is_empty() => println!("No folders."),
        Ok(folders) => {
            for folder in folders {
                println!(
                    "{:>10}  {}  {}",
                    folder.id,
                    folder.name,
                    folder.path.as_deref().unwrap_or("")
                );
            }
        }
        Err(e) => println!("Listing folders failed: {}", e),
    }
}

fn show_entries(session: &DriveSession) -> Result<()> {
    if !require_login(session) {
        return Ok(());
    }
    let folder: String = Input::new()
        .with_prompt("Folder id")
        .default(ROOT_FOLDER.to_string())
        .interact_text()?;
    match with_spinner("Fetching entries...", || session.list_all_entries(&folder)) {
        Ok(entries) => {
            for entry in &entries {
                println!("{}", format_entry(entry));
            }
            println!("{} entries", entries.len());
        }
        Err(e) => println!("Listing entries failed: {}", e),
    }
    Ok(())
}

fn handle_mkdir(session: &DriveSession) -> Result<()> {
    if !require_login(session) {
        return Ok(());
    }
    let name: String = Input::new().with_prompt("Folder name").interact_text()?;
    let parent: String = Input::new()
        .with_prompt("Parent folder id (empty for root)")
        .allow_empty(true)
        .interact_text()?;
    let parent = Some(parent.trim()).filter(|p| !p.is_empty());

    match with_spinner("Creating folder...", || session.make_directory(parent, &name)) {
        Ok(()) => println!("Folder created"),
        Err(e) => println!("Create folder failed: {}", e),
    }
    Ok(())
}

fn handle_upload(session: &DriveSession) -> Result<()> {
    if !require_login(session) {
        return Ok(());
    }
    let path: String = Input::new().with_prompt("Local file path").interact_text()?;
    let parent: String = Input::new().with_prompt("Target folder id").interact_text()?;
    let path = PathBuf::from(path);

    match with_spinner("Uploading...", || session.upload_file(&parent, &path)) {
        Ok(()) => println!("Upload successful"),
        Err(e) => println!("Upload failed: {}", e),
    }
    Ok(())
}

fn handle_remove(session: &DriveSession) -> Result<()> {
    if !require_login(session) {
        return Ok(());
    }
    let raw: String = Input::new()
        .with_prompt("Entry ids (comma separated)")
        .interact_text()?;
    let ids = parse_ids(&raw);
    if ids.is_empty() {
        println!("Nothing to remove.");
        return Ok(());
    }
    let sure = Confirm::new()
        .with_prompt(format!("Remove {} entries?", ids.len()))
        .interact()?;
    if !sure {
        return Ok(());
    }
    match with_spinner("Removing...", || session.remove_entries(&ids)) {
        Ok(()) => println!("Removed"),
        Err(e) => println!("Remove failed: {}", e),
    }
    Ok(())
}

fn parse_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn format_entry(entry: &EntryDetails) -> String {
    let size = if entry.is_folder() {
        "<dir>".to_string()
    } else {
        human_bytes(entry.file_size.unwrap_or(0))
    };
    format!(
        "{:>10}  {:>10}  {}  {}",
        entry.id,
        size,
        entry.updated_at.as_deref().unwrap_or("-"),
        entry.name
    )
}

/// Usage counters are signed on the wire; a negative count shows as zero.
fn non_negative(bytes: i64) -> u64 {
    u64::try_from(bytes).unwrap_or(0)
}

fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Remember the last e-mail that logged in, in the user's home directory.
/// The password is never stored.
fn persist_email(email: &str) -> Result<()> {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    std::fs::write(dir.join(EMAIL_FILE), email)?;
    Ok(())
}

fn load_email() -> Option<String> {
    let dir = dirs::home_dir()?;
    let email = std::fs::read_to_string(dir.join(EMAIL_FILE)).ok()?;
    let email = email.trim();
    (!email.is_empty()).then(|| email.to_string())
}
