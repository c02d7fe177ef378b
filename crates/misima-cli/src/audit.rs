//! Catalogue audit: finds products whose descriptions the storefront
//! cannot display.

use std::fmt::Write as _;

use misima_core::{build_listing, BackLink, MalformedDescriptionError, ProductSummary};
use misima_storefront::StorefrontClient;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct AuditFinding {
    pub handle: String,
    pub title: String,
    pub error: MalformedDescriptionError,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AuditReport {
    pub collection: String,
    pub checked: usize,
    pub malformed: Vec<AuditFinding>,
}

impl AuditReport {
    pub(crate) fn is_clean(&self) -> bool {
        self.malformed.is_empty()
    }

    pub(crate) fn render_text(&self) -> String {
        let mut out = format!(
            "checked {} products in collection \"{}\": {} malformed\n",
            self.checked,
            self.collection,
            self.malformed.len()
        );
        for finding in &self.malformed {
            // Writing to a String cannot fail.
            let _ = writeln!(out, "  {} ({}): {}", finding.handle, finding.title, finding.message);
        }
        out
    }
}

pub(crate) fn audit_products(collection: &str, products: &[ProductSummary]) -> AuditReport {
    let listing = build_listing(products, None, &BackLink::from_params(None, None));
    let malformed = listing
        .rejected
        .into_iter()
        .map(|r| {
            let title = products
                .iter()
                .find(|p| p.handle == r.handle)
                .map(|p| p.title.clone())
                .unwrap_or_default();
            AuditFinding {
                message: r.error.to_string(),
                handle: r.handle,
                title,
                error: r.error,
            }
        })
        .collect();

    AuditReport {
        collection: collection.to_owned(),
        checked: products.len(),
        malformed,
    }
}

/// Fetches every page of `collection` and audits the descriptions.
///
/// # Errors
///
/// Returns an error if any collection page cannot be fetched.
pub(crate) async fn run_audit(
    client: &StorefrontClient,
    collection: &str,
    page_size: u32,
) -> anyhow::Result<AuditReport> {
    let products = client
        .fetch_all_collection_products(collection, page_size)
        .await
        .map_err(|e| anyhow::anyhow!("failed to fetch collection \"{collection}\": {e}"))?;
    tracing::info!(collection, products = products.len(), "auditing collection");

    let report = audit_products(collection, &products);
    for finding in &report.malformed {
        tracing::warn!(
            handle = %finding.handle,
            segment = finding.error.index,
            "malformed product description"
        );
    }
    Ok(report)
}

#[cfg(test)]
#[path = "audit_test.rs"]
mod tests;
