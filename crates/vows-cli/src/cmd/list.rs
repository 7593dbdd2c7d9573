//! `vows list`: paged guest list with name search.

use crate::output::{OutputMode, pretty_rule, render_mode, write_list};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use vows_core::Guest;
use vows_core::view::{PageMarker, Stats, filter_by_name, page_markers, paginate};

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Show only guests whose name contains this text (any case).
    #[arg(long, short)]
    pub search: Option<String>,

    /// Page to show, starting at 1.
    #[arg(long, short, default_value_t = 1)]
    pub page: usize,

    /// Show every matching guest on one page.
    #[arg(long, conflicts_with = "page")]
    pub all: bool,
}

#[derive(Debug, Serialize)]
struct GuestPage<'a> {
    guests: Vec<&'a Guest>,
    page: usize,
    total_pages: usize,
    matched: usize,
    pages: Vec<PageMarker>,
    stats: Stats,
}

/// Execute `vows list`.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or its load failed.
pub fn run_list(args: &ListArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let (store, project) = super::open_store(project_root, output)?;

    let matches = filter_by_name(store.guests(), args.search.as_deref().unwrap_or(""));
    let page_size = if args.all {
        matches.len().max(1)
    } else {
        project.view.page_size
    };
    let page = paginate(&matches, args.page, page_size);

    let payload = GuestPage {
        guests: page.items.to_vec(),
        page: page.number,
        total_pages: page.total_pages,
        matched: page.total_items,
        pages: page_markers(page.number, page.total_pages),
        stats: store.stats(),
    };

    render_mode(
        output,
        &payload,
        |p, w| write_list(&p.guests, OutputMode::Text, w),
        |p, w| render_pretty(p, w),
    )?;
    super::finish(&store, output)
}

fn render_pretty(page: &GuestPage<'_>, w: &mut dyn Write) -> std::io::Result<()> {
    let stats = &page.stats;
    writeln!(
        w,
        "Guests: {} total · {} checked in · {} awaited · {} VIP",
        stats.total, stats.checked_in, stats.awaited, stats.vip
    )?;
    pretty_rule(w)?;
    if page.guests.is_empty() {
        writeln!(w, "No guests found")?;
        return Ok(());
    }
    write_list(&page.guests, OutputMode::Pretty, w)?;

    if !page.pages.is_empty() {
        pretty_rule(w)?;
        let strip: Vec<String> = page
            .pages
            .iter()
            .map(|marker| match marker {
                PageMarker::Number(n) if *n == page.page => format!("[{n}]"),
                PageMarker::Number(n) => n.to_string(),
                PageMarker::Ellipsis => "...".to_string(),
            })
            .collect();
        writeln!(
            w,
            "Page {} of {} ({} guests)  {}",
            page.page,
            page.total_pages,
            page.matched,
            strip.join(" ")
        )?;
    }
    Ok(())
}
