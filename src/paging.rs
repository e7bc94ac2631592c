//! Page-numbered traversal of the entries listing.
//!
//! The service answers each listing call with a page envelope. We keep asking
//! for the next page while the envelope advertises a next page URL *and* the
//! served-so-far count (`to`) has not reached `total`. Both signals must agree
//! that more data exists.

use crate::error::Result;
use crate::models::{EntriesPage, EntryDetails};
use log::{debug, warn};

/// Whether the service says another page follows `page`.
pub fn has_more(page: &EntriesPage) -> bool {
    page.next_page_url.is_some() && page.to.unwrap_or(0) != page.total
}

/// Fetch pages 1, 2, ... through `fetch` and concatenate their items in the
/// order served. At most `max_pages` pages are requested; if the service
/// still reports more after that, a warning is logged and the items gathered
/// so far are returned.
pub fn collect_pages<F>(max_pages: u32, mut fetch: F) -> Result<Vec<EntryDetails>>
where
    F: FnMut(u32) -> Result<EntriesPage>,
{
    let mut entries = Vec::new();
    let mut page_number = 1;
    loop {
        let page = fetch(page_number)?;
        debug!(
            "page {}: {} items (to={:?}, total={})",
            page_number,
            page.data.len(),
            page.to,
            page.total
        );
        let more = has_more(&page);
        entries.extend(page.data);

        if !more {
            break;
        }
        if page_number >= max_pages {
            warn!(
                "stopping listing after {} pages, service still reports more ({} entries collected)",
                page_number,
                entries.len()
            );
            break;
        }
        page_number += 1;
    }
    Ok(entries)
}
