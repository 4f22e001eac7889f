// Check pipeline: fetch -> parse -> extract -> predict.
//
// The model name is validated before any network I/O so a typo fails fast.
// Parsing, extraction and prediction run in one synchronous step; the
// parsed document never lives across an await point.

use anyhow::Result;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::classifier::{Label, ModelRegistry};
use crate::document::HtmlDocument;
use crate::features::{self, FeatureVector};
use crate::fetch::PageFetcher;

/// The outcome of checking one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    /// Page URL, or "-" for local documents without one
    pub url: String,
    pub model: String,
    pub label: Label,
    pub features: FeatureVector,
    pub checked_at: String,
}

/// Parse, extract and classify an already-fetched page.
pub fn classify_bytes(
    registry: &ModelRegistry,
    model: &str,
    body: &[u8],
    page_url: Option<Url>,
) -> Result<(FeatureVector, Label)> {
    let document = HtmlDocument::from_bytes(body, page_url);
    let features = features::extract(&document);
    let label = registry.predict(model, &features)?;
    Ok((features, label))
}

fn verdict(url: String, model: &str, features: FeatureVector, label: Label) -> Verdict {
    Verdict {
        url,
        model: model.to_string(),
        label,
        features,
        checked_at: chrono::Utc::now().to_rfc3339(),
    }
}

/// Classify local HTML (a saved page or stdin).
pub fn check_document(
    registry: &ModelRegistry,
    model: &str,
    html: &[u8],
    page_url: Option<Url>,
) -> Result<Verdict> {
    registry.get(model)?;
    let display_url = page_url
        .as_ref()
        .map(|u| u.to_string())
        .unwrap_or_else(|| "-".to_string());
    let (features, label) = classify_bytes(registry, model, html, page_url)?;
    Ok(verdict(display_url, model, features, label))
}

/// Fetch a URL and classify it.
pub async fn check_page(
    fetcher: &dyn PageFetcher,
    registry: &ModelRegistry,
    model: &str,
    url: &Url,
) -> Result<Verdict> {
    registry.get(model)?;

    let page = fetcher.fetch(url).await?;
    let (features, label) = classify_bytes(registry, model, &page.body, Some(page.url.clone()))?;

    info!(
        url = %page.url,
        model = model,
        label = label.as_str(),
        bytes = page.body.len(),
        "Checked page"
    );

    Ok(verdict(page.url.to_string(), model, features, label))
}

/// Check several URLs with bounded concurrency.
///
/// Results come back in input order, one per URL; a failure for one URL
/// does not stop the others.
pub async fn check_many(
    fetcher: &dyn PageFetcher,
    registry: &ModelRegistry,
    model: &str,
    urls: &[Url],
    concurrency: usize,
) -> Result<Vec<(Url, Result<Verdict>)>> {
    registry.get(model)?;

    let pb = ProgressBar::new(urls.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Checking [{bar:30}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    if urls.len() < 2 {
        pb.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }

    let mut results: Vec<(usize, Result<Verdict>)> =
        stream::iter(urls.iter().enumerate().map(|(i, url)| {
            let pb = &pb;
            async move {
                let result = check_page(fetcher, registry, model, url).await;
                if let Err(e) = &result {
                    warn!(url = %url, error = %e, "Check failed");
                }
                pb.inc(1);
                (i, result)
            }
        }))
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;
    pb.finish_and_clear();

    results.sort_by_key(|(i, _)| *i);
    Ok(results
        .into_iter()
        .map(|(i, result)| (urls[i].clone(), result))
        .collect())
}
