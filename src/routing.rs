use crate::model::Verse;

pub const METRIC_LINK: &str = "Verse:Link";
pub const METRIC_SEARCHED_LINK: &str = "Verse:Searched:Link";

/// Permalink attached to a verse badge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseLink {
    pub path: String,
    /// Analytics event name, distinguishing search results from chapter reading
    pub metric: &'static str,
}

impl VerseLink {
    pub fn for_verse(verse: &Verse, is_searched: bool) -> Self {
        let translations = verse
            .translation_resource_ids()
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        Self {
            path: format!(
                "/{}/{}?translations={}",
                verse.chapter_id, verse.verse_number, translations
            ),
            metric: if is_searched {
                METRIC_SEARCHED_LINK
            } else {
                METRIC_LINK
            },
        }
    }
}

/// Scroll anchor name for a verse container
pub fn anchor_name(verse_key: &str) -> String {
    format!("verse:{}", verse_key)
}

/// A resolved `/{chapter}/{verse}?translations=..` path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseRoute {
    pub chapter_id: u32,
    pub verse_number: u32,
    pub translations: Vec<u64>,
}

impl VerseRoute {
    pub fn parse(path: &str) -> Option<Self> {
        let (path, query) = match path.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path, None),
        };

        let mut segments = path.trim_start_matches('/').split('/');
        let chapter_id = segments.next()?.parse().ok()?;
        let verse_number = segments.next()?.parse().ok()?;
        if segments.next().is_some() {
            return None;
        }

        let translations = query
            .into_iter()
            .flat_map(|q| q.split('&'))
            .filter_map(|pair| pair.strip_prefix("translations="))
            .flat_map(|csv| csv.split(','))
            .filter_map(|id| id.parse().ok())
            .collect();

        Some(Self {
            chapter_id,
            verse_number,
            translations,
        })
    }
}
