use crate::model::{Chapter, Verse};

pub const DEFAULT_BASE_URL: &str = "https://quran.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Facebook,
    Twitter,
}

impl Network {
    pub fn all() -> [Network; 2] {
        [Network::Facebook, Network::Twitter]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Network::Facebook => "Facebook",
            Network::Twitter => "Twitter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    pub network: Network,
    pub url: String,
}

/// Builds social share links for a verse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareWidget {
    base_url: String,
}

impl Default for ShareWidget {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ShareWidget {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn verse_url(&self, verse: &Verse) -> String {
        format!("{}/{}/{}", self.base_url, verse.chapter_id, verse.verse_number)
    }

    pub fn share_text(&self, chapter: &Chapter, verse: &Verse) -> String {
        format!("Surah {} [verse {}]", chapter.name_simple, verse.verse_key)
    }

    pub fn links(&self, chapter: &Chapter, verse: &Verse) -> Vec<ShareLink> {
        let url = urlencoding::encode(&self.verse_url(verse)).into_owned();
        let text = urlencoding::encode(&self.share_text(chapter, verse)).into_owned();

        Network::all()
            .into_iter()
            .map(|network| {
                let url = match network {
                    Network::Facebook => {
                        format!("https://www.facebook.com/sharer/sharer.php?u={}", url)
                    }
                    Network::Twitter => {
                        format!("https://twitter.com/intent/tweet?url={}&text={}", url, text)
                    }
                };
                ShareLink { network, url }
            })
            .collect()
    }
}
