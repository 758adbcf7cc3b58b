//! Per-site selector tables.
//!
//! Supporting another job board means adding a [`SiteProfile`] entry here;
//! the classifier and both extractors only read these tables.

use scraper::ElementRef;
use url::Url;

use crate::text::first_text;

/// Selectors and URL shapes for one job board.
#[derive(Debug)]
pub struct SiteProfile {
    /// Source label sent with analyses of this site's pages.
    pub name: &'static str,
    /// Registrable hosts; subdomains match too.
    pub hosts: &'static [&'static str],
    pub title: &'static [&'static str],
    pub company: &'static [&'static str],
    pub location: &'static [&'static str],
    pub salary: &'static [&'static str],
    pub description: &'static [&'static str],
    /// Containers whose presence marks a listing page.
    pub result_lists: &'static [&'static str],
    /// One match per listing card.
    pub cards: &'static [&'static str],
    pub card_title: &'static [&'static str],
    pub card_company: &'static [&'static str],
    pub card_location: &'static [&'static str],
    pub card_salary: &'static [&'static str],
    /// Lowercase fragments of `path?query` identifying a single posting.
    pub detail_urls: &'static [&'static str],
    /// Lowercase fragments of `path?query` identifying search results.
    pub listing_urls: &'static [&'static str],
}

impl SiteProfile {
    pub fn matches_host(&self, host: &str) -> bool {
        let host = host.trim_start_matches("www.");
        self.hosts
            .iter()
            .any(|known| host == *known || host.ends_with(&format!(".{known}")))
    }

    pub fn is_detail_url(&self, path_and_query: &str) -> bool {
        self.detail_urls
            .iter()
            .any(|fragment| path_and_query.contains(fragment))
    }

    pub fn is_listing_url(&self, path_and_query: &str) -> bool {
        self.listing_urls
            .iter()
            .any(|fragment| path_and_query.contains(fragment))
    }
}

pub static SITE_PROFILES: &[SiteProfile] = &[
    SiteProfile {
        name: "indeed",
        hosts: &["indeed.com"],
        title: &[
            "h1.jobsearch-JobInfoHeader-title",
            "[data-testid='jobsearch-JobInfoHeader-title']",
            "h2.jobsearch-JobInfoHeader-title",
        ],
        company: &[
            "[data-testid='inlineHeader-companyName']",
            "[data-company-name='true']",
            ".jobsearch-CompanyInfoContainer a",
        ],
        location: &[
            "[data-testid='inlineHeader-companyLocation']",
            "[data-testid='job-location']",
        ],
        salary: &["#salaryInfoAndJobType", "[data-testid='jobsearch-OtherJobDetailsContainer']"],
        description: &["#jobDescriptionText", ".jobsearch-jobDescriptionText"],
        result_lists: &["#mosaic-provider-jobcards", ".jobsearch-ResultsList", "#mosaic-jobResults"],
        cards: &[".job_seen_beacon", "[data-jk]"],
        card_title: &["h2.jobTitle", "[id^='jobTitle-']", ".jcs-JobTitle"],
        card_company: &["[data-testid='company-name']", ".companyName"],
        card_location: &["[data-testid='text-location']", ".companyLocation"],
        card_salary: &[".salary-snippet-container", "[data-testid='attribute_snippet_testid']"],
        detail_urls: &["/viewjob", "vjk=", "/rc/clk"],
        listing_urls: &["/jobs?", "/jobs/", "/q-"],
    },
    SiteProfile {
        name: "linkedin",
        hosts: &["linkedin.com"],
        title: &[
            ".job-details-jobs-unified-top-card__job-title",
            ".jobs-unified-top-card__job-title",
            "h1.top-card-layout__title",
            "h1.t-24",
        ],
        company: &[
            ".job-details-jobs-unified-top-card__company-name",
            ".jobs-unified-top-card__company-name",
            ".topcard__org-name-link",
        ],
        location: &[
            ".job-details-jobs-unified-top-card__bullet",
            ".jobs-unified-top-card__bullet",
            ".topcard__flavor--bullet",
        ],
        salary: &[".salary", ".compensation__salary"],
        description: &[
            ".jobs-description__content",
            ".jobs-box__html-content",
            ".show-more-less-html__markup",
            "#job-details",
        ],
        result_lists: &[
            ".jobs-search__results-list",
            ".scaffold-layout__list",
            ".jobs-search-results-list",
        ],
        cards: &[".job-card-container", ".base-card", ".jobs-search-results__list-item"],
        card_title: &[".job-card-list__title", ".base-search-card__title"],
        card_company: &[
            ".job-card-container__primary-description",
            ".artdeco-entity-lockup__subtitle",
            ".base-search-card__subtitle",
        ],
        card_location: &[".job-card-container__metadata-item", ".job-search-card__location"],
        card_salary: &[".job-search-card__salary-info"],
        detail_urls: &["/jobs/view/", "currentjobid="],
        listing_urls: &["/jobs/search", "/jobs/collections"],
    },
    SiteProfile {
        name: "glassdoor",
        hosts: &["glassdoor.com", "glassdoor.co.uk", "glassdoor.ca"],
        title: &[
            "[data-test='job-title']",
            "[class*='JobDetails_jobTitle']",
            ".css-1vg6q84",
        ],
        company: &["[data-test='employer-name']", "[class*='EmployerProfile_employerName']"],
        location: &["[data-test='location']"],
        salary: &["[data-test='detailSalary']"],
        description: &[
            "[class*='JobDetails_jobDescription']",
            ".jobDescriptionContent",
            "#JobDescriptionContainer",
        ],
        result_lists: &["[data-test='jobListing']", "ul[aria-label='Jobs List']"],
        cards: &["[data-test='jobListing'] > li", "li[class*='JobsList_jobListItem']"],
        card_title: &["[data-test='job-title']", "[class*='JobCard_jobTitle']"],
        card_company: &["[class*='EmployerProfile_compactEmployerName']"],
        card_location: &["[data-test='emp-location']"],
        card_salary: &["[data-test='detailSalary']"],
        detail_urls: &["/job-listing/", "jl="],
        listing_urls: &["-jobs-srch", "/jobs/"],
    },
    SiteProfile {
        name: "ziprecruiter",
        hosts: &["ziprecruiter.com"],
        title: &[".job_title", "h1[class*='title']"],
        company: &[".hiring_company_text", "a[class*='company']"],
        location: &[".location_text"],
        salary: &[".job_salary"],
        description: &[".job_description", ".jobDescriptionSection"],
        result_lists: &[".job_results", "[data-testid='job-results']"],
        cards: &["article.job_result", "[data-testid='job-card']"],
        card_title: &[".job_title", "h2"],
        card_company: &[".hiring_company", "[data-testid='job-card-company']"],
        card_location: &[".location", "[data-testid='job-card-location']"],
        card_salary: &[".salary", "[data-testid='job-card-salary']"],
        detail_urls: &["/job/", "jid="],
        listing_urls: &["/jobs-search", "/candidate/search"],
    },
    SiteProfile {
        name: "monster",
        hosts: &["monster.com"],
        title: &["[data-testid='jobTitle']", "h1.job-title"],
        company: &["[data-testid='company']", ".company-name"],
        location: &["[data-testid='jobDetailLocation']"],
        salary: &["[data-testid='salary']"],
        description: &[
            "[data-testid='svx-description-container-inner']",
            "#JobDescription",
            ".job-description",
        ],
        result_lists: &["#card-scroller", "[data-testid='JobCardsScroller']"],
        cards: &["[data-testid='svx-job-card']", "article[data-job-id]"],
        card_title: &["[data-testid='jobTitle']", "h3"],
        card_company: &["[data-testid='company']"],
        card_location: &["[data-testid='jobDetailLocation']"],
        card_salary: &["[data-testid='salary']"],
        detail_urls: &["/job-openings/", "/job-opening/", "jobid="],
        listing_urls: &["/jobs/search"],
    },
];

/// Used for unknown hosts, and after the site profile for known ones.
pub static GENERIC_PROFILE: SiteProfile = SiteProfile {
    name: "generic",
    hosts: &[],
    title: &[
        "[class*='job-title']",
        "[class*='jobTitle']",
        "[itemprop='title']",
        "h1",
        "title",
    ],
    company: &[
        "[itemprop='hiringOrganization']",
        "[class*='company-name']",
        "[class*='companyName']",
        "[class*='employer']",
    ],
    location: &["[itemprop='jobLocation']", "[class*='job-location']"],
    salary: &["[itemprop='baseSalary']", "[class*='salary']"],
    description: &[
        "[itemprop='description']",
        "#job-description",
        "[class*='job-description']",
        "[class*='jobDescription']",
        "[class*='job-details']",
    ],
    result_lists: &[
        "[class*='job-list']",
        "[class*='jobs-list']",
        "[class*='search-results']",
        "[class*='results-list']",
    ],
    cards: &["[class*='job-card']", "[class*='jobCard']", "li[class*='job-result']"],
    card_title: &["[class*='title']", "h2", "h3"],
    card_company: &["[class*='company']", "[class*='employer']"],
    card_location: &["[class*='location']"],
    card_salary: &["[class*='salary']", "[class*='compensation']"],
    detail_urls: &[
        "/jobs/view",
        "/viewjob",
        "/job-details",
        "/job/",
        "jobid=",
        "job_id=",
    ],
    listing_urls: &["/jobs/search", "/job-search", "/jobs-search", "/search/jobs"],
};

/// Fallback containers for descriptions, best first.
pub const CONTENT_CONTAINERS: &[&str] = &[
    "main",
    "[role='main']",
    "article",
    "#content",
    ".content",
    "[class*='content']",
];

pub fn profile_for_host(host: &str) -> Option<&'static SiteProfile> {
    let host = host.to_ascii_lowercase();
    SITE_PROFILES.iter().find(|profile| profile.matches_host(&host))
}

pub fn profile_for_url(url: &str) -> Option<&'static SiteProfile> {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().and_then(profile_for_host))
}

/// Site profile first, then the generic one.
pub fn profiles_for(site: Option<&'static SiteProfile>) -> impl Iterator<Item = &'static SiteProfile> {
    site.into_iter().chain(std::iter::once(&GENERIC_PROFILE))
}

/// First non-empty text for one field, site profile before generic.
pub(crate) fn field_text(
    scope: ElementRef<'_>,
    site: Option<&'static SiteProfile>,
    field: fn(&SiteProfile) -> &'static [&'static str],
    block: bool,
) -> Option<String> {
    profiles_for(site).find_map(|profile| first_text(scope, field(profile).iter().copied(), block))
}

/// Label sent as `source`: the site name, or the bare host for unknown sites.
pub fn source_label(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => profile_for_host(host)
                .map(|profile| profile.name.to_string())
                .unwrap_or_else(|| host.trim_start_matches("www.").to_string()),
            None => GENERIC_PROFILE.name.to_string(),
        },
        Err(_) => GENERIC_PROFILE.name.to_string(),
    }
}

/// Lowercase `path?query` used by the URL pattern checks.
pub(crate) fn path_and_query(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query).to_ascii_lowercase(),
        None => url.path().to_ascii_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::{profile_for_host, source_label};

    #[test]
    fn subdomains_match_their_site() {
        assert_eq!(profile_for_host("uk.indeed.com").map(|p| p.name), Some("indeed"));
        assert_eq!(profile_for_host("www.LinkedIn.com").map(|p| p.name), Some("linkedin"));
        assert!(profile_for_host("notindeed.com").is_none());
    }

    #[test]
    fn unknown_hosts_report_their_host() {
        assert_eq!(source_label("https://www.monster.com/job-openings/x"), "monster");
        assert_eq!(source_label("https://careers.example.org/jobs/1"), "careers.example.org");
        assert_eq!(source_label("not a url"), "generic");
    }
}
