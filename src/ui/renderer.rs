//! Plain-text renderer for the shell binary.
//!
//! Renders a [`UIViewModel`] as lines of text: header, optional search bar,
//! rows or empty state, notice, footer. Query matches in row names are
//! wrapped in brackets. An opened record is rendered as a detail card
//! instead of the list.
//!
//! # Example
//!
//! ```rust
//! use shelter::app::AppState;
//! use shelter::ui::render;
//!
//! let state = AppState::new();
//! let mut out = Vec::new();
//! render(&state, 24, &mut out)?;
//! assert!(String::from_utf8(out)?.contains("Loading..."));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::app::{AppState, Detail};
use crate::domain::{Listing, ShelterEvent};
use crate::ui::viewmodel::{DisplayItem, UIViewModel};
use std::io::{self, Write};

const NAME_COLUMN_WIDTH: usize = 24;

/// Renders the current state to `out`.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn render(state: &AppState, rows: usize, out: &mut impl Write) -> io::Result<()> {
    if let Some(detail) = &state.detail {
        render_detail(state, detail, out)?;
        if let Some(notice) = &state.notice {
            writeln!(out, "! {notice}")?;
        }
        return Ok(());
    }

    let viewmodel = state.compute_viewmodel(rows);
    render_viewmodel(&viewmodel, out)
}

/// Renders one opened listing or event.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn render_detail(state: &AppState, detail: &Detail, out: &mut impl Write) -> io::Result<()> {
    match detail {
        Detail::Listing(listing) => {
            let favorite = state.favorites.is_favorite(&listing.id);
            render_listing(listing, favorite, out)
        }
        Detail::Event {
            event,
            is_registered,
        } => render_event(event, *is_registered, out),
    }
}

fn render_listing(listing: &Listing, favorite: bool, out: &mut impl Write) -> io::Result<()> {
    let star = if favorite { " *" } else { "" };
    writeln!(out, "=== {}{star} ===", listing.name)?;
    writeln!(out, "  {} · {}", listing.category, listing.age_label())?;
    writeln!(out, "  status: {}", listing.status.label())?;
    writeln!(out, "  {}", listing.description)?;
    if !listing.images.is_empty() {
        writeln!(out, "  photos: {}", listing.images.len())?;
    }
    let hint = if listing.is_available() {
        "fav: toggle favorite  adopt: request adoption  back: close"
    } else {
        "fav: toggle favorite  back: close"
    };
    writeln!(out, "{hint}")
}

fn render_event(event: &ShelterEvent, is_registered: bool, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "=== {} ===", event.title)?;
    writeln!(out, "  {} {}", event.date_label(), event.time_label())?;
    writeln!(out, "  {}", event.location)?;
    if let Some(attendees) = event.attendees {
        writeln!(out, "  attendees: {attendees}")?;
    }
    writeln!(out, "  {}", event.description)?;
    if is_registered {
        writeln!(out, "  You are registered for this event")?;
        writeln!(out, "back: close")
    } else {
        writeln!(out, "register: sign up for this event  back: close")
    }
}

/// Renders a pre-computed view model.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn render_viewmodel(vm: &UIViewModel, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "==={}===", vm.header.title)?;

    if let Some(search) = &vm.search_bar {
        writeln!(out, "search [{}]: {}_", search.category, search.query)?;
    }

    if let Some(empty) = &vm.empty_state {
        writeln!(out, "  {}", empty.message)?;
        if !empty.subtitle.is_empty() {
            writeln!(out, "  {}", empty.subtitle)?;
        }
    } else {
        for item in &vm.display_items {
            render_row(item, out)?;
        }
    }

    if let Some(notice) = &vm.notice {
        writeln!(out, "! {notice}")?;
    }

    writeln!(out, "{}", vm.footer.keybindings)
}

fn render_row(item: &DisplayItem, out: &mut impl Write) -> io::Result<()> {
    let cursor = if item.is_selected { '>' } else { ' ' };
    let marker = match (item.is_syncing, item.is_favorite, item.is_registered) {
        (true, _, _) => '~',
        (false, true, _) => '*',
        (false, false, true) => '+',
        _ => ' ',
    };
    let name = highlight(&item.name, &item.highlight_ranges);
    let padding = NAME_COLUMN_WIDTH.saturating_sub(name.chars().count());

    writeln!(
        out,
        "{cursor}{marker} {:<6} {name}{:padding$} {}",
        item.id,
        "",
        item.detail
    )
}

/// Wraps each highlighted character range of `text` in brackets.
///
/// Ranges are character indices, assumed sorted and non-overlapping.
#[must_use]
pub fn highlight(text: &str, ranges: &[(usize, usize)]) -> String {
    if ranges.is_empty() {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut rendered = String::with_capacity(text.len() + ranges.len() * 2);
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len()).max(current_pos);
        let end = end.min(chars.len());
        if start >= end {
            continue;
        }
        rendered.extend(&chars[current_pos..start]);
        rendered.push('[');
        rendered.extend(&chars[start..end]);
        rendered.push(']');
        current_pos = end;
    }

    rendered.extend(&chars[current_pos..]);
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogStore;
    use crate::domain::{Category, Listing};

    #[test]
    fn highlight_wraps_ranges() {
        assert_eq!(highlight("Luna", &[(0, 2)]), "[Lu]na");
        assert_eq!(highlight("banana", &[(1, 3), (3, 5)]), "b[an][an]a");
        assert_eq!(highlight("Max", &[]), "Max");
        assert_eq!(highlight("Max", &[(2, 10)]), "Ma[x]");
    }

    #[test]
    fn renders_rows_with_markers() {
        let mut state = AppState::new();
        state.listings = CatalogStore::from_fetch(vec![
            Listing::new("1", Category::Dog, "Max", ""),
            Listing::new("2", Category::Cat, "Luna", ""),
        ]);
        state.favorites.reset(["2"]);
        state.notice = Some("Could not update favorites".into());
        state.apply_filter();

        let mut out = Vec::new();
        render(&state, 24, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "=== Animals (2) ===");
        assert!(lines[1].starts_with(">  1"));
        assert!(lines[2].starts_with(" * 2"));
        assert!(text.contains("! Could not update favorites"));
    }

    #[test]
    fn renders_open_listing_instead_of_rows() {
        let mut state = AppState::new();
        let mut luna = Listing::new("2", Category::Cat, "Luna", "Calm and curious");
        luna.age_months = 18;
        state.favorites.reset(["2"]);
        state.detail = Some(Detail::Listing(luna));

        let mut out = Vec::new();
        render(&state, 24, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("=== Luna * ==="));
        assert!(text.contains("1 year and 6 months"));
        assert!(text.contains("adopt: request adoption"));
    }
}
