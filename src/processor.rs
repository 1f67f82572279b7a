use anyhow::Result;
use std::collections::HashSet;

use crate::cache::ChannelCache;
use crate::constants::{
    COMPOSITE_KEY_SEPARATOR, FIELD_CHANNEL_ID, FIELD_CLEAN_TITLE, FIELD_LANGUAGE,
    FIELD_SUBSCRIBERS, FIELD_TITLE, FIELD_TRENDING_DATE, FIELD_VIDEO_ID,
};
use crate::language::LanguageClassifier;
use crate::record::Row;
use crate::resolver::{ResolverStats, SubscriberResolver};
use crate::title::clean_title;
use crate::youtube::ChannelLookup;

/// Uniqueness keys seen so far in one run. Never persisted.
#[derive(Debug, Default, Clone)]
pub struct SeenKeys {
    video_ids: HashSet<String>,
    video_dates: HashSet<String>,
}

impl SeenKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// True the first time `video_id` is offered.
    pub fn insert_video_id(&mut self, video_id: &str) -> bool {
        if self.video_ids.contains(video_id) {
            return false;
        }
        self.video_ids.insert(video_id.to_string())
    }

    /// True the first time the (`video_id`, `trending_date`) pair is offered.
    pub fn insert_video_date(&mut self, video_id: &str, trending_date: &str) -> bool {
        self.video_dates.insert(composite_key(video_id, trending_date))
    }

    pub fn video_id_count(&self) -> usize {
        self.video_ids.len()
    }

    pub fn video_date_count(&self) -> usize {
        self.video_dates.len()
    }
}

pub fn composite_key(video_id: &str, trending_date: &str) -> String {
    format!("{}{}{}", video_id, COMPOSITE_KEY_SEPARATOR, trending_date)
}

/// Rows emitted for one input row: zero, one or two enriched copies.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProcessedRow {
    pub by_video_id: Option<Row>,
    pub by_video_and_date: Option<Row>,
}

impl ProcessedRow {
    pub fn emitted(&self) -> usize {
        self.by_video_id.is_some() as usize + self.by_video_and_date.is_some() as usize
    }
}

/// Enriches a row once, then checks it against both uniqueness sets.
pub struct RowProcessor<L, C> {
    resolver: SubscriberResolver<L>,
    classifier: C,
}

impl<L: ChannelLookup, C: LanguageClassifier> RowProcessor<L, C> {
    pub fn new(resolver: SubscriberResolver<L>, classifier: C) -> Self {
        Self { resolver, classifier }
    }

    pub async fn process(
        &mut self,
        mut row: Row,
        seen: &mut SeenKeys,
        cache: &mut ChannelCache,
    ) -> Result<ProcessedRow> {
        let video_id = row.require(FIELD_VIDEO_ID)?.to_string();
        let trending_date = row.require(FIELD_TRENDING_DATE)?.to_string();
        let channel_id = row.require(FIELD_CHANNEL_ID)?.to_string();
        let cleaned = clean_title(row.require(FIELD_TITLE)?);

        let subscribers = self.resolver.resolve(cache, &channel_id).await;
        let language = self.classifier.detect_or_unknown(&cleaned);

        row.set(FIELD_SUBSCRIBERS, subscribers.to_string());
        row.set(FIELD_CLEAN_TITLE, cleaned);
        row.set(FIELD_LANGUAGE, language);

        let by_video_id = seen.insert_video_id(&video_id).then(|| row.clone());
        let by_video_and_date = seen
            .insert_video_date(&video_id, &trending_date)
            .then_some(row);

        Ok(ProcessedRow {
            by_video_id,
            by_video_and_date,
        })
    }

    pub fn resolver_stats(&self) -> &ResolverStats {
        self.resolver.stats()
    }
}
