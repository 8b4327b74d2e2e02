//! Localization of advisory messages
//!
//! Each item gets one best-effort translation attempt. A failed, empty or
//! timed-out translation leaves the source message in place and flags the
//! item as degraded; it never fails the advisory.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use shared::{AdvisoryItem, Language};

use crate::external::Translator;

/// Renders advisory items in the farmer's language
#[derive(Clone)]
pub struct Localizer {
    translator: Arc<dyn Translator>,
    timeout: Duration,
}

impl Localizer {
    pub fn new(translator: Arc<dyn Translator>, timeout: Duration) -> Self {
        Self {
            translator,
            timeout,
        }
    }

    /// Translate every item into `target`, preserving item order
    ///
    /// Translation calls run concurrently; results are reassembled in the
    /// original order regardless of completion order.
    pub async fn localize(&self, items: Vec<AdvisoryItem>, target: Language) -> Vec<AdvisoryItem> {
        if target.is_source() {
            return items
                .into_iter()
                .map(|mut item| {
                    item.translated_message = None;
                    item.translation_degraded = false;
                    item
                })
                .collect();
        }

        join_all(items.into_iter().map(|item| self.localize_item(item, target))).await
    }

    async fn localize_item(&self, mut item: AdvisoryItem, target: Language) -> AdvisoryItem {
        let attempt = tokio::time::timeout(
            self.timeout,
            self.translator.translate(&item.message, target),
        )
        .await;

        match attempt {
            Ok(Ok(Some(text))) if !text.trim().is_empty() => {
                item.translated_message = Some(text);
                item.translation_degraded = false;
            }
            Ok(Ok(_)) => {
                tracing::warn!("Empty {} translation for rule {}", target.code(), item.rule_id);
                degrade(&mut item);
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    "Translation to {} failed for rule {}: {}",
                    target.code(),
                    item.rule_id,
                    e
                );
                degrade(&mut item);
            }
            Err(_) => {
                tracing::warn!(
                    "Translation to {} timed out after {:?} for rule {}",
                    target.code(),
                    self.timeout,
                    item.rule_id
                );
                degrade(&mut item);
            }
        }

        item
    }
}

fn degrade(item: &mut AdvisoryItem) {
    item.translated_message = None;
    item.translation_degraded = true;
}
