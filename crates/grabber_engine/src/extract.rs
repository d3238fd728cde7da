use serde_json::Value;

use crate::SearchHit;

/// Maps one raw provider record into a normalized hit. Returning `None`
/// skips the record; a malformed record never fails its page. One
/// implementation exists per search provider.
pub trait ItemExtractor: Send + Sync {
    fn extract(&self, record: &Value) -> Option<SearchHit>;
}

/// Extractor for Vimeo video records:
/// - identifier from `uri` (e.g. `/videos/12345`)
/// - title from `name`, source URL from `link` (both required)
/// - duration in seconds and the first picture link when present.
#[derive(Debug, Default)]
pub struct VimeoItemExtractor;

impl ItemExtractor for VimeoItemExtractor {
    fn extract(&self, record: &Value) -> Option<SearchHit> {
        let id = non_empty_str(record.get("uri"))?;
        let title = non_empty_str(record.get("name"))?;
        let source_url = non_empty_str(record.get("link"))?;

        let duration_secs = record
            .get("duration")
            .and_then(Value::as_u64)
            .map(|secs| secs as u32);
        let thumbnail_url = record
            .get("pictures")
            .and_then(|pictures| pictures.get("sizes"))
            .and_then(Value::as_array)
            .and_then(|sizes| sizes.first())
            .and_then(|size| size.get("link"))
            .and_then(Value::as_str)
            .map(ToOwned::to_owned);

        Some(SearchHit {
            id: id.to_string(),
            title: title.to_string(),
            source_url: source_url.to_string(),
            duration_secs,
            thumbnail_url,
        })
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|text| !text.is_empty())
}
