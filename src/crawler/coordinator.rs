//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives one crawl run through its phases:
//! - Fetching the seed (search-results) page
//! - Extracting absolute links from it
//! - Fanning out one bounded task per link to fetch and scan the page
//! - Joining every task and snapshotting the merged results

use crate::config::Config;
use crate::crawler::fetcher::{FetchError, HttpFetcher, PageContent, PageFetch};
use crate::crawler::parser::extract_links;
use crate::crawler::scheduler::FetchPool;
use crate::phone::PhoneMatcher;
use crate::state::{CrawlPhase, LinkState};
use crate::storage::{ResultSnapshot, ResultStore};
use crate::url::build_search_url;
use crate::HarvestError;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// A non-empty free-text search query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Wraps a query as given, rejecting blank input
    pub fn new(query: impl Into<String>) -> Result<Self, HarvestError> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(HarvestError::EmptyQuery);
        }
        Ok(Self(query))
    }

    /// The query text, before URL encoding
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Runtime settings of a crawler, derived from [`Config`]
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Search results endpoint
    pub endpoint: String,

    /// Query-string parameter carrying the query
    pub query_parameter: String,

    /// Timeout applied to each individual fetch
    pub fetch_timeout: Duration,

    /// Maximum number of link fetches in flight
    pub max_concurrent_fetches: usize,
}

impl CrawlSettings {
    /// Extracts crawl settings from a validated configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            endpoint: config.search.endpoint.clone(),
            query_parameter: config.search.query_parameter.clone(),
            fetch_timeout: Duration::from_millis(config.crawler.fetch_timeout_ms),
            max_concurrent_fetches: config.crawler.max_concurrent_fetches as usize,
        }
    }
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Outcome of one fan-out task
///
/// On success holds the number of distinct phone numbers found on the page.
#[derive(Debug)]
pub struct LinkReport {
    pub url: String,
    pub result: Result<usize, FetchError>,
}

impl LinkReport {
    /// Final state of the link
    pub fn state(&self) -> LinkState {
        match &self.result {
            Ok(0) => LinkState::NoMatches,
            Ok(_) => LinkState::Matched,
            Err(e) => e.state(),
        }
    }
}

/// Everything one crawl run produced
#[derive(Debug)]
pub struct CrawlReport {
    /// The query, when the seed came from a search
    pub query: Option<String>,

    /// URL of the seed page
    pub seed_url: String,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Wall-clock duration of the run
    pub duration: Duration,

    /// Terminal phase: `Done`, or `Aborted` if cancelled during fan-out
    pub phase: CrawlPhase,

    /// Number of distinct absolute links found on the seed page
    pub links_extracted: usize,

    /// Per-link outcomes, sorted by URL
    pub links: Vec<LinkReport>,

    /// Links whose task ended without reporting (panicked or aborted), sorted
    pub lost_links: Vec<String>,

    /// URL -> distinct phone numbers, for URLs with at least one match
    pub results: ResultSnapshot,
}

impl CrawlReport {
    /// Returns true if every spawned task was joined normally
    pub fn is_complete(&self) -> bool {
        self.phase == CrawlPhase::Done
    }

    /// Number of links whose page was fetched
    pub fn succeeded(&self) -> usize {
        self.links.iter().filter(|l| l.result.is_ok()).count()
    }

    /// Number of links that ended in a soft failure, lost tasks included
    pub fn failed(&self) -> usize {
        self.links.iter().filter(|l| l.result.is_err()).count() + self.lost_links.len()
    }

    /// Link reports that ended in a fetch error
    pub fn failures(&self) -> impl Iterator<Item = (&str, &FetchError)> {
        self.links
            .iter()
            .filter_map(|l| l.result.as_ref().err().map(|e| (l.url.as_str(), e)))
    }

    /// Link counts per final state; states with no links are omitted
    pub fn count_by_state(&self) -> BTreeMap<LinkState, usize> {
        let mut counts = BTreeMap::new();
        for link in &self.links {
            *counts.entry(link.state()).or_insert(0) += 1;
        }
        if !self.lost_links.is_empty() {
            counts.insert(LinkState::Lost, self.lost_links.len());
        }
        counts
    }

    /// Number of distinct phone numbers across all pages
    pub fn distinct_numbers(&self) -> usize {
        self.results
            .values()
            .flatten()
            .collect::<BTreeSet<_>>()
            .len()
    }
}

/// Main crawler structure
///
/// Owns the settings, the fetcher shared by every task, and the compiled
/// matcher. Each run gets its own [`ResultStore`], so runs never see each
/// other's findings.
pub struct Crawler<F = HttpFetcher> {
    settings: CrawlSettings,
    fetcher: Arc<F>,
    matcher: PhoneMatcher,
}

impl Crawler<HttpFetcher> {
    /// Creates an HTTP-backed crawler from configuration
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        let fetcher = HttpFetcher::new(&config.user_agent)?;
        Ok(Self::new(CrawlSettings::from_config(config), fetcher))
    }
}

impl<F: PageFetch> Crawler<F> {
    /// Creates a crawler around any page fetcher
    pub fn new(settings: CrawlSettings, fetcher: F) -> Self {
        Self {
            settings,
            fetcher: Arc::new(fetcher),
            matcher: PhoneMatcher::new(),
        }
    }

    /// The settings this crawler runs with
    pub fn settings(&self) -> &CrawlSettings {
        &self.settings
    }

    /// Runs a complete crawl for `query`
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The seed page was fetched; individual link
    ///   failures are recorded in the report
    /// * `Err(HarvestError::SeedFetch)` - The seed page was unreachable and
    ///   no link was fetched
    ///
    /// # Example
    ///
    /// ```no_run
    /// use phone_harvest::config::Config;
    /// use phone_harvest::crawler::{Crawler, SearchQuery};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let crawler = Crawler::from_config(&Config::default())?;
    /// let report = crawler.run(&SearchQuery::new("universities")?).await?;
    /// for (url, numbers) in &report.results {
    ///     println!("{}: {:?}", url, numbers);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run(&self, query: &SearchQuery) -> Result<CrawlReport, HarvestError> {
        self.run_until(query, std::future::pending()).await
    }

    /// Runs a crawl for `query` that stops early once `shutdown` completes
    ///
    /// Cancellation during the seed fetch yields `HarvestError::Cancelled`.
    /// Cancellation during fan-out aborts the outstanding tasks and returns
    /// whatever was merged so far, with phase `Aborted`.
    pub async fn run_until<S>(
        &self,
        query: &SearchQuery,
        shutdown: S,
    ) -> Result<CrawlReport, HarvestError>
    where
        S: Future<Output = ()>,
    {
        let seed = build_search_url(
            &self.settings.endpoint,
            &self.settings.query_parameter,
            query.as_str(),
        )?;

        let mut report = self.crawl_seed(seed, shutdown).await?;
        report.query = Some(query.to_string());
        Ok(report)
    }

    /// Crawls the links of an explicit seed page
    pub async fn crawl_seed<S>(&self, seed: Url, shutdown: S) -> Result<CrawlReport, HarvestError>
    where
        S: Future<Output = ()>,
    {
        let started_at = Utc::now();
        let start = Instant::now();
        let timeout = self.settings.fetch_timeout;
        let mut phase = CrawlPhase::Idle;
        tokio::pin!(shutdown);

        phase.advance(CrawlPhase::FetchingSeed)?;
        tracing::info!("Fetching seed page: {}", seed);

        let fetched = tokio::select! {
            fetched = fetch_bounded(self.fetcher.as_ref(), seed.as_str(), timeout) => fetched,
            _ = &mut shutdown => {
                tracing::warn!("Crawl cancelled while fetching the seed page");
                return Err(HarvestError::Cancelled);
            }
        };

        let seed_page = match fetched {
            Ok(page) => page,
            Err(e) => {
                phase.advance(CrawlPhase::Aborted)?;
                tracing::error!("Seed fetch failed: {}", e);
                return Err(HarvestError::SeedFetch(e));
            }
        };

        phase.advance(CrawlPhase::ExtractingLinks)?;
        let links = extract_links(&seed_page.body);
        drop(seed_page);
        tracing::info!("Extracted {} absolute links from the seed page", links.len());

        phase.advance(CrawlPhase::FanningOut)?;
        let store = Arc::new(ResultStore::new());
        let mut pool = FetchPool::new(self.settings.max_concurrent_fetches);
        for link in &links {
            pool.spawn(
                link.clone(),
                scan_link(
                    Arc::clone(&self.fetcher),
                    self.matcher.clone(),
                    Arc::clone(&store),
                    link.clone(),
                    timeout,
                ),
            );
        }
        tracing::debug!(
            "Spawned {} fetch tasks (max {} concurrent)",
            pool.len(),
            pool.max_concurrent()
        );

        phase.advance(CrawlPhase::AwaitingCompletion)?;
        let outcome = pool.join_until(shutdown).await;

        if outcome.interrupted {
            phase.advance(CrawlPhase::Aborted)?;
        } else {
            phase.advance(CrawlPhase::Done)?;
        }

        let mut link_reports = outcome.completed;
        link_reports.sort_by(|a, b| a.url.cmp(&b.url));

        let report = CrawlReport {
            query: None,
            seed_url: seed.to_string(),
            started_at,
            duration: start.elapsed(),
            phase,
            links_extracted: links.len(),
            links: link_reports,
            lost_links: outcome.lost,
            results: store.snapshot(),
        };

        tracing::info!(
            "Crawl {} in {:?}: {} links, {} fetched, {} failed, {} pages with matches",
            report.phase,
            report.duration,
            report.links_extracted,
            report.succeeded(),
            report.failed(),
            report.results.len()
        );

        Ok(report)
    }
}

/// Fetches one page, enforcing `timeout` whatever the fetcher does
async fn fetch_bounded<F: PageFetch>(
    fetcher: &F,
    url: &str,
    timeout: Duration,
) -> Result<PageContent, FetchError> {
    match tokio::time::timeout(timeout, fetcher.fetch(url, timeout)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout {
            url: url.to_string(),
            timeout,
        }),
    }
}

/// Body of a fan-out task: fetch, scan, merge
///
/// Failures are logged here and returned as values; they never reach sibling
/// tasks.
async fn scan_link<F: PageFetch>(
    fetcher: Arc<F>,
    matcher: PhoneMatcher,
    store: Arc<ResultStore>,
    url: String,
    timeout: Duration,
) -> LinkReport {
    tracing::debug!("Fetching {}", url);

    let result = match fetch_bounded(fetcher.as_ref(), &url, timeout).await {
        Ok(page) => {
            if page.final_url != page.url {
                tracing::debug!("{} redirected to {}", url, page.final_url);
            }
            let numbers: BTreeSet<&str> = matcher.find_all(&page.body).into_iter().collect();
            let found = numbers.len();
            store.merge(&url, numbers);
            tracing::debug!(
                "Scanned {} (HTTP {}, {}): {} distinct numbers",
                url,
                page.status_code,
                page.content_type.as_deref().unwrap_or("no content type"),
                found
            );
            Ok(found)
        }
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {}", url, e);
            Err(e)
        }
    };

    LinkReport { url, result }
}
