//! # Harvesting Pipeline
//!
//! Runs the extractor over an ordered list of URLs and tabulates the result.
//! Each URL is processed independently: a failure is recorded next to the
//! successful rows instead of aborting the batch.
//!
//! URLs are handled strictly one after another. Nothing is spawned, and the
//! only state carried between iterations is the accumulated [`ExtractionRun`].

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::extractor::{EmailExtractor, ExtractError};
use crate::report::{ReportArtifact, build_report};

/// A single (website, email) row of the export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailRecord {
    /// The URL the email was found on, exactly as supplied
    #[serde(rename = "Website")]
    pub website: String,

    /// The extracted email string
    #[serde(rename = "Email")]
    pub email: String,
}

impl EmailRecord {
    /// Create a row for `email` found on `website`
    pub fn new(website: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            website: website.into(),
            email: email.into(),
        }
    }
}

/// Problems with the URL list itself
#[derive(Debug, Error)]
pub enum InputError {
    /// The input held no non-blank line
    #[error("Please enter at least one website URL.")]
    NoUrls,
}

/// A URL that contributed no rows because extraction failed
#[derive(Debug)]
pub struct UrlFailure {
    /// The URL as supplied
    pub url: String,

    /// Why nothing was extracted from it
    pub error: ExtractError,
}

/// Outcome of running the extractor over a URL list
#[derive(Debug, Default)]
pub struct ExtractionRun {
    /// Rows in URL input order
    pub records: Vec<EmailRecord>,

    /// Failed URLs in input order
    pub failures: Vec<UrlFailure>,
}

/// Notifications emitted while a run progresses
#[derive(Debug)]
pub enum ProgressEvent<'a> {
    /// About to fetch `url`; `index` is zero-based
    Started {
        url: &'a str,
        index: usize,
        total: usize,
    },
    /// Extraction succeeded with `found` unique emails
    Finished { url: &'a str, found: usize },
    /// Extraction failed; the URL contributes no rows
    Failed { url: &'a str, error: &'a ExtractError },
}

impl fmt::Display for ProgressEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::Started { url, index, total } => {
                write!(f, "[{}/{}] Extracting emails from {}...", index + 1, total, url)
            }
            ProgressEvent::Finished { url, found } => {
                write!(f, "Found {} emails on {}", found, url)
            }
            ProgressEvent::Failed { url, error } => {
                write!(f, "Warning: Error fetching {}: {}", url, error)
            }
        }
    }
}

/// Result of a full harvest: the extraction run plus the report, if any
#[derive(Debug)]
pub struct Harvest {
    /// Rows and failures of the extraction
    pub run: ExtractionRun,

    /// `None` when no emails were found on any page
    pub report: Option<ReportArtifact>,
}

/// Split a newline-separated URL block into trimmed, non-blank URLs
///
/// URLs are otherwise left untouched; they are not validated or normalized.
pub fn parse_url_list(input: &str) -> std::result::Result<Vec<String>, InputError> {
    let urls: Vec<String> = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    if urls.is_empty() {
        return Err(InputError::NoUrls);
    }
    Ok(urls)
}

/// Run the extractor once per URL, in order, accumulating rows and failures
///
/// `on_progress` is called before each fetch and after each outcome so a
/// front end can report progress and warnings.
#[instrument(skip(extractor, on_progress))]
pub async fn extract_all<F>(
    extractor: &EmailExtractor,
    urls: &[String],
    mut on_progress: F,
) -> ExtractionRun
where
    F: FnMut(ProgressEvent<'_>),
{
    let mut run = ExtractionRun::default();
    let total = urls.len();

    for (index, url) in urls.iter().enumerate() {
        let url = url.as_str();
        on_progress(ProgressEvent::Started { url, index, total });

        match extractor.extract_emails(url).await {
            Ok(emails) => {
                on_progress(ProgressEvent::Finished {
                    url,
                    found: emails.len(),
                });
                run.records.extend(
                    emails
                        .into_iter()
                        .map(|email| EmailRecord::new(url, email)),
                );
            }
            Err(error) => {
                warn!("Error fetching {}: {}", url, error);
                on_progress(ProgressEvent::Failed { url, error: &error });
                run.failures.push(UrlFailure {
                    url: url.to_string(),
                    error,
                });
            }
        }
    }

    info!(
        "Extracted {} emails from {} URLs ({} failed)",
        run.records.len(),
        total,
        run.failures.len()
    );
    run
}

/// Parse `input`, extract from every URL and build the report
///
/// Returns [`InputError::NoUrls`] (wrapped in the crate error) without
/// fetching anything when the input is blank. A run that finds no emails is
/// not an error; its `report` is `None`.
pub async fn harvest<F>(extractor: &EmailExtractor, input: &str, on_progress: F) -> Result<Harvest>
where
    F: FnMut(ProgressEvent<'_>),
{
    let urls = parse_url_list(input)?;
    let run = extract_all(extractor, &urls, on_progress).await;

    let report = if run.records.is_empty() {
        None
    } else {
        Some(build_report(&run.records)?)
    };

    Ok(Harvest { run, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::extractor::{ExtractorConfig, FetchError};
    use mockito::Server;

    fn extractor() -> EmailExtractor {
        EmailExtractor::new(ExtractorConfig::builder().timeout_secs(5).build()).unwrap()
    }

    fn unreachable_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{}/", port)
    }

    #[test]
    fn test_parse_url_list_trims_and_drops_blanks() {
        let input = "  https://a.example  \n\n\t\nhttps://b.example\r\n   \n";
        let urls = parse_url_list(input).unwrap();
        assert_eq!(urls, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_parse_url_list_keeps_urls_as_given() {
        let urls = parse_url_list("HTTPS://Example.COM/Path?q=1\nnot a url").unwrap();
        assert_eq!(urls, vec!["HTTPS://Example.COM/Path?q=1", "not a url"]);
    }

    #[test]
    fn test_parse_url_list_blank_input() {
        assert!(matches!(parse_url_list(""), Err(InputError::NoUrls)));
        assert!(matches!(parse_url_list("  \n\t\n \n"), Err(InputError::NoUrls)));
    }

    #[test]
    fn test_email_record_serializes_with_column_names() {
        let record = EmailRecord::new("https://example.com", "a@x.com");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"Website": "https://example.com", "Email": "a@x.com"})
        );
    }

    #[test]
    fn test_progress_messages_name_url_and_cause() {
        let error = ExtractError::Fetch(FetchError::Status { status: 503 });
        let failed = ProgressEvent::Failed {
            url: "https://down.example",
            error: &error,
        };
        assert_eq!(
            failed.to_string(),
            "Warning: Error fetching https://down.example: HTTP status 503"
        );

        let started = ProgressEvent::Started {
            url: "https://a.example",
            index: 0,
            total: 2,
        };
        assert_eq!(
            started.to_string(),
            "[1/2] Extracting emails from https://a.example..."
        );
    }

    #[tokio::test]
    async fn test_extract_all_preserves_url_order() {
        let mut server = Server::new_async().await;
        let _first = server
            .mock("GET", "/first")
            .with_status(200)
            .with_body(r#"<a href="mailto:z@first.com">z</a> <p>a@first.com</p>"#)
            .create_async()
            .await;
        let _second = server
            .mock("GET", "/second")
            .with_status(200)
            .with_body("<p>m@second.com</p>")
            .create_async()
            .await;

        let urls = vec![
            format!("{}/second", server.url()),
            format!("{}/first", server.url()),
        ];
        let run = extract_all(&extractor(), &urls, |_| {}).await;

        assert!(run.failures.is_empty());
        let websites: Vec<&str> = run.records.iter().map(|r| r.website.as_str()).collect();
        assert_eq!(websites, vec![urls[0].as_str(), urls[1].as_str(), urls[1].as_str()]);
        assert_eq!(run.records[0].email, "m@second.com");
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_batch() {
        let mut server = Server::new_async().await;
        let _ok = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("<p>reach me at hello@ok.dev</p>")
            .create_async()
            .await;

        let bad = unreachable_url();
        let urls = vec![bad.clone(), server.url()];

        let mut failed = Vec::new();
        let mut started = 0;
        let run = extract_all(&extractor(), &urls, |event| match event {
            ProgressEvent::Started { .. } => started += 1,
            ProgressEvent::Failed { url, .. } => failed.push(url.to_string()),
            ProgressEvent::Finished { .. } => {}
        })
        .await;

        assert_eq!(started, 2);
        assert_eq!(failed, vec![bad.clone()]);
        assert_eq!(run.records, vec![EmailRecord::new(server.url(), "hello@ok.dev")]);
        assert_eq!(run.failures.len(), 1);
        assert_eq!(run.failures[0].url, bad);
    }

    #[tokio::test]
    async fn test_timeout_counts_as_failure_and_batch_continues() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let stalled = format!("http://{}/", listener.local_addr().unwrap());
        let stall = tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });

        let mut server = Server::new_async().await;
        let _ok = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("<p>after@timeout.dev</p>")
            .create_async()
            .await;

        let extractor =
            EmailExtractor::new(ExtractorConfig::builder().timeout_secs(1).build()).unwrap();
        let urls = vec![stalled.clone(), server.url()];
        let run = extract_all(&extractor, &urls, |_| {}).await;

        assert_eq!(run.records, vec![EmailRecord::new(server.url(), "after@timeout.dev")]);
        assert_eq!(run.failures.len(), 1);
        assert_eq!(run.failures[0].url, stalled);
        assert!(matches!(
            run.failures[0].error,
            ExtractError::Fetch(FetchError::Timeout(_))
        ));
        stall.abort();
    }

    #[tokio::test]
    async fn test_http_error_counts_as_failure() {
        let mut server = Server::new_async().await;
        let _gone = server
            .mock("GET", "/gone")
            .with_status(410)
            .create_async()
            .await;
        let _ok = server
            .mock("GET", "/ok")
            .with_status(200)
            .with_body("<p>one@a.io two@b.io</p>")
            .create_async()
            .await;

        let urls = vec![
            format!("{}/gone", server.url()),
            format!("{}/ok", server.url()),
        ];
        let run = extract_all(&extractor(), &urls, |_| {}).await;

        assert_eq!(run.records.len(), 2);
        assert_eq!(run.failures.len(), 1);
        assert!(run.failures[0].error.to_string().contains("410"));
    }

    #[tokio::test]
    async fn test_harvest_blank_input_fetches_nothing() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let mut events = 0;
        let result = harvest(&extractor(), "\n   \n\n", |_| events += 1).await;

        assert!(matches!(result, Err(Error::Input(InputError::NoUrls))));
        assert_eq!(events, 0);
        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_harvest_builds_report() {
        let mut server = Server::new_async().await;
        let _page = server
            .mock("GET", "/")
            .with_status(200)
            .with_body(
                r#"<html><body><a href="mailto:a@x.com">mail</a>
                   <p>contact b@y.org now</p></body></html>"#,
            )
            .create_async()
            .await;

        let input = format!("  {}  \n\n", server.url());
        let harvest = harvest(&extractor(), &input, |_| {}).await.unwrap();

        assert_eq!(
            harvest.run.records,
            vec![
                EmailRecord::new(server.url(), "a@x.com"),
                EmailRecord::new(server.url(), "b@y.org"),
            ]
        );
        let report = harvest.report.unwrap();
        assert!(!report.bytes().is_empty());
    }

    #[tokio::test]
    async fn test_harvest_no_emails_has_no_report() {
        let mut server = Server::new_async().await;
        let _page = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("<p>nothing here</p>")
            .create_async()
            .await;

        let harvest = harvest(&extractor(), &server.url(), |_| {}).await.unwrap();

        assert!(harvest.run.records.is_empty());
        assert!(harvest.run.failures.is_empty());
        assert!(harvest.report.is_none());
    }
}
