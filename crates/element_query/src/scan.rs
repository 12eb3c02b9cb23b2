//! Multi-stylesheet scanning.
//!
//! Fetching external sheet text is the one inherently asynchronous
//! operation around the core; the aggregate scan is a join over N
//! independent sheets that resolves exactly once when every sheet has
//! completed. There are no timers, retries, or fetch pools here — the
//! loader collaborator owns all of that.

use crate::adapter::DocumentAdapter;
use crate::engine::QueryEngine;
use crate::parser::{RewriteOutput, parse_style_text};
use core::future::Future;
use futures::future::join_all;
use log::warn;

/// One stylesheet to scan: inline text the host already has, or an external
/// reference whose text must be fetched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SheetSource {
    Inline(String),
    External(String),
}

/// Collaborator that fetches external stylesheet text.
pub trait SheetLoader {
    /// Fetch the raw text behind `href`.
    ///
    /// Each call must complete exactly once — the scan join counts every
    /// sheet exactly once and has no protection against a loader that
    /// resolves twice.
    fn fetch(&self, href: &str) -> impl Future<Output = anyhow::Result<String>>;
}

/// Scan every sheet and return its rewrite, in submission order.
///
/// Completion order across sheets is unspecified; the returned future
/// resolves exactly once, when all sheets have completed. A failed fetch is
/// logged and yields `None` for that sheet while still counting toward
/// completion, so one broken stylesheet never blocks the aggregate.
pub async fn scan_style_sheets<L: SheetLoader>(
    sources: &[SheetSource],
    loader: &L,
) -> Vec<Option<RewriteOutput>> {
    let pending = sources.iter().map(|source| resolve_sheet(source, loader));
    join_all(pending).await
}

async fn resolve_sheet<L: SheetLoader>(source: &SheetSource, loader: &L) -> Option<RewriteOutput> {
    match source {
        SheetSource::Inline(text) => Some(parse_style_text(text)),
        SheetSource::External(href) => match loader.fetch(href).await {
            Ok(text) => Some(parse_style_text(&text)),
            Err(error) => {
                warn!("could not load stylesheet at {href}: {error:#}");
                None
            }
        },
    }
}

impl<A: DocumentAdapter> QueryEngine<A> {
    /// Scan every sheet, register everything discovered (submission order),
    /// and return the concatenated rewritten CSS for the caller to append
    /// to the page's active styles — append, never replace: rules the
    /// rewrite grammar does not recognize exist only in the originals.
    pub async fn scan_and_register<L: SheetLoader>(
        &mut self,
        sources: &[SheetSource],
        loader: &L,
    ) -> String {
        let outcomes = scan_style_sheets(sources, loader).await;
        let mut combined = String::new();
        for outcome in outcomes.into_iter().flatten() {
            combined.push_str(&outcome.css);
            self.register(outcome.queries);
        }
        combined
    }
}
