use jobguard_core::limits::{DETAIL_DESCRIPTION_MIN, MANUAL_OFFER_MIN_TEXT};
use jobguard_core::PageKind;
use scraper::{Html, Selector};
use url::Url;

use crate::sites::{path_and_query, profile_for_url, profiles_for, SiteProfile};
use crate::text::{block_text, char_len};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageClassification {
    pub kind: PageKind,
    /// Visible characters in `<body>`.
    pub visible_text_len: usize,
    pub site: Option<&'static str>,
}

impl PageClassification {
    /// Unknown pages with enough text may still hold a posting.
    pub fn offers_manual_entry(&self) -> bool {
        self.kind == PageKind::Unknown && self.visible_text_len > MANUAL_OFFER_MIN_TEXT
    }
}

/// Detail is checked before listing, so a page matching both is a detail page.
pub fn classify_page(url: &str, document: &Html) -> PageClassification {
    let site = profile_for_url(url);
    let target = Url::parse(url).ok().map(|parsed| path_and_query(&parsed));
    let visible_text_len = visible_text_len(document);

    let kind = if is_detail(site, target.as_deref(), document) {
        PageKind::Detail
    } else if is_listing(site, target.as_deref(), document) {
        PageKind::Listing
    } else {
        PageKind::Unknown
    };

    jobguard_logging::guard_debug!(
        "classified {url} as {kind:?} (site {:?}, {visible_text_len} visible chars)",
        site.map(|profile| profile.name)
    );

    PageClassification {
        kind,
        visible_text_len,
        site: site.map(|profile| profile.name),
    }
}

fn is_detail(site: Option<&'static SiteProfile>, target: Option<&str>, document: &Html) -> bool {
    profiles_for(site).any(|profile| {
        target.is_some_and(|target| profile.is_detail_url(target))
            || profile.description.iter().any(|raw| {
                Selector::parse(raw).is_ok_and(|selector| {
                    document
                        .select(&selector)
                        .any(|element| char_len(&block_text(element)) > DETAIL_DESCRIPTION_MIN)
                })
            })
    })
}

fn is_listing(site: Option<&'static SiteProfile>, target: Option<&str>, document: &Html) -> bool {
    profiles_for(site).any(|profile| {
        target.is_some_and(|target| profile.is_listing_url(target))
            || profile.result_lists.iter().any(|raw| {
                Selector::parse(raw)
                    .is_ok_and(|selector| document.select(&selector).next().is_some())
            })
    })
}

fn visible_text_len(document: &Html) -> usize {
    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next());
    match body {
        Some(body) => char_len(&block_text(body)),
        None => char_len(&block_text(document.root_element())),
    }
}
