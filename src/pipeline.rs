//! Pipeline driver.
//!
//! Sequences domains → homepage discovery → article extraction and owns the
//! accumulating result maps. Each domain gets its own browser session; its
//! articles are visited strictly one after another on that session. Domains
//! may run side by side up to `parallel_domains`.
//!
//! Nothing here is fatal: a domain whose session cannot be opened, or whose
//! homepage cannot be read, is logged and left out of the output; an article
//! that skips is logged and left out of its domain's map.

use crate::browser::{BrowserSession, SessionFactory};
use crate::models::{ArticleUrl, Domain, ExtractionResult, HomepageLinkSet, ResultMap, RunSummary};
use crate::scrapers::article::ArticleExtractor;
use crate::scrapers::homepage;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use std::collections::BTreeMap;
use std::future::Future;
use tracing::{error, info, instrument, warn};

/// Where a domain's article URLs come from.
#[derive(Debug, Clone)]
enum ArticleSource {
    /// Scrape the domain's homepage for teasers.
    Homepage,
    /// A previously persisted list.
    Listed(Vec<ArticleUrl>),
}

/// Drives sessions from `F` through discovery and extraction.
#[derive(Debug)]
pub struct Pipeline<F> {
    factory: F,
    parallel_domains: usize,
}

impl<F: SessionFactory> Pipeline<F> {
    pub fn new(factory: F, parallel_domains: usize) -> Self {
        Self {
            factory,
            parallel_domains: parallel_domains.max(1),
        }
    }

    /// Homepage pass only: domain → discovered article URLs.
    #[instrument(level = "info", skip_all, fields(domains = domains.len()))]
    pub async fn discover(&self, domains: &[Domain]) -> (HomepageLinkSet, RunSummary) {
        let outcomes = self
            .for_each_domain(domains.to_vec(), |domain| self.discover_domain(domain))
            .await;

        let mut links = HomepageLinkSet::new();
        let mut summary = RunSummary::default();
        for (domain, urls) in outcomes {
            summary.domains += 1;
            match urls {
                Some(urls) => {
                    links.insert(domain, urls);
                }
                None => summary.domains_skipped += 1,
            }
        }
        info!(
            domains = summary.domains,
            skipped = summary.domains_skipped,
            urls = links.values().map(Vec::len).sum::<usize>(),
            "Discovery complete"
        );
        (links, summary)
    }

    /// Resume from a persisted link set and extract every listed article.
    #[instrument(level = "info", skip_all, fields(domains = links.len()))]
    pub async fn extract(
        &self,
        extractor: &ArticleExtractor,
        links: HomepageLinkSet,
    ) -> (ResultMap, RunSummary) {
        let work = links
            .into_iter()
            .map(|(domain, urls)| (domain, ArticleSource::Listed(urls)))
            .collect();
        self.run_extraction(extractor, work).await
    }

    /// Discover each domain's articles and extract them in the same session.
    #[instrument(level = "info", skip_all, fields(domains = domains.len()))]
    pub async fn crawl(
        &self,
        extractor: &ArticleExtractor,
        domains: &[Domain],
    ) -> (ResultMap, RunSummary) {
        let work = domains
            .iter()
            .map(|domain| (domain.clone(), ArticleSource::Homepage))
            .collect();
        self.run_extraction(extractor, work).await
    }

    async fn run_extraction(
        &self,
        extractor: &ArticleExtractor,
        work: Vec<(Domain, ArticleSource)>,
    ) -> (ResultMap, RunSummary) {
        let outcomes = self
            .for_each_domain(work, |(domain, source)| {
                self.extract_domain(extractor, domain, source)
            })
            .await;

        let mut results = ResultMap::new();
        let mut summary = RunSummary::default();
        for (domain, articles, domain_summary) in outcomes {
            summary.absorb(domain_summary);
            if let Some(articles) = articles {
                results.insert(domain, articles);
            }
        }
        info!(
            domains = summary.domains,
            domains_skipped = summary.domains_skipped,
            attempted = summary.articles_attempted,
            extracted = summary.articles_extracted,
            skipped = summary.articles_skipped(),
            "Extraction complete"
        );
        (results, summary)
    }

    /// Run `f` over `items`, at most `parallel_domains` at a time.
    async fn for_each_domain<T, Fut>(&self, items: Vec<T>, f: impl FnMut(T) -> Fut) -> Vec<Fut::Output>
    where
        Fut: Future,
    {
        stream::iter(items)
            .map(f)
            .buffer_unordered(self.parallel_domains)
            .collect()
            .await
    }

    #[instrument(level = "info", skip(self))]
    async fn discover_domain(&self, domain: Domain) -> (Domain, Option<Vec<ArticleUrl>>) {
        let Some(session) = self.open_session(&domain).await else {
            return (domain, None);
        };
        let urls = match homepage::index_articles(&session, &domain).await {
            Ok(urls) => Some(urls),
            Err(reason) => {
                warn!(%domain, %reason, "Homepage pass failed; skipping domain");
                None
            }
        };
        close_session(session, &domain).await;
        (domain, urls)
    }

    #[instrument(level = "info", skip(self, extractor, source))]
    async fn extract_domain(
        &self,
        extractor: &ArticleExtractor,
        domain: Domain,
        source: ArticleSource,
    ) -> (Domain, Option<BTreeMap<ArticleUrl, ExtractionResult>>, RunSummary) {
        let mut summary = RunSummary {
            domains: 1,
            ..RunSummary::default()
        };
        let Some(session) = self.open_session(&domain).await else {
            summary.domains_skipped = 1;
            return (domain, None, summary);
        };

        let urls = match source {
            ArticleSource::Listed(urls) => Some(urls),
            ArticleSource::Homepage => match homepage::index_articles(&session, &domain).await {
                Ok(urls) => Some(urls),
                Err(reason) => {
                    warn!(%domain, %reason, "Homepage pass failed; skipping domain");
                    None
                }
            },
        };

        let articles = match urls {
            Some(urls) => Some(
                extract_articles(extractor, &session, &domain, urls, &mut summary).await,
            ),
            None => {
                summary.domains_skipped = 1;
                None
            }
        };

        close_session(session, &domain).await;
        (domain, articles, summary)
    }

    async fn open_session(&self, domain: &str) -> Option<F::Session> {
        match self.factory.open().await {
            Ok(session) => Some(session),
            Err(reason) => {
                error!(%domain, %reason, "Could not open a browser session; skipping domain");
                None
            }
        }
    }
}

/// Visit each distinct URL once, in order, on one session.
async fn extract_articles<S: BrowserSession>(
    extractor: &ArticleExtractor,
    session: &S,
    domain: &str,
    urls: Vec<ArticleUrl>,
    summary: &mut RunSummary,
) -> BTreeMap<ArticleUrl, ExtractionResult> {
    let mut articles = BTreeMap::new();
    for url in urls.into_iter().unique() {
        summary.articles_attempted += 1;
        match extractor.extract(session, &url, domain).await {
            Ok(result) => {
                summary.articles_extracted += 1;
                articles.insert(url, result);
            }
            Err(reason) => {
                warn!(%domain, %url, %reason, "Skipping article");
            }
        }
    }
    info!(
        %domain,
        attempted = summary.articles_attempted,
        extracted = summary.articles_extracted,
        "Finished domain"
    );
    articles
}

async fn close_session<S: BrowserSession>(session: S, domain: &str) {
    if let Err(reason) = session.quit().await {
        warn!(%domain, %reason, "Failed to close browser session");
    }
}
