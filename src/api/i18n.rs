//! The `i18nLanguages` and `i18nRegions` resources.
//!
//! Both are read-only enumerations of what the API localizes for.

use super::{QueryMap, YouTube};
use crate::error::Completion;

/// Client for the application languages the YouTube website supports.
///
/// See: <https://developers.google.com/youtube/v3/docs/i18nLanguages>
#[derive(Debug, Clone, Copy)]
pub struct I18nLanguages<'a> {
    pub(crate) yt: &'a YouTube,
}

impl I18nLanguages<'_> {
    pub async fn list(
        &self,
        part: &[&str],
        filters: &QueryMap,
        params: &QueryMap,
    ) -> Completion {
        super::list(self.yt, "/i18nLanguages", part, filters, params).await
    }
}

/// Client for the content regions the YouTube website supports.
///
/// See: <https://developers.google.com/youtube/v3/docs/i18nRegions>
#[derive(Debug, Clone, Copy)]
pub struct I18nRegions<'a> {
    pub(crate) yt: &'a YouTube,
}

impl I18nRegions<'_> {
    pub async fn list(
        &self,
        part: &[&str],
        filters: &QueryMap,
        params: &QueryMap,
    ) -> Completion {
        super::list(self.yt, "/i18nRegions", part, filters, params).await
    }
}
