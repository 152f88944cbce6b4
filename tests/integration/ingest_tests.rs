//! Integration tests for the ingestion pipeline
//!
//! These tests use wiremock to serve a paginated trades listing and drive
//! full crawls, incremental traversals and the poll scheduler end-to-end.

use disclosure_tracker::config::{Config, DEFAULT_USER_AGENT};
use disclosure_tracker::crawler::{
    Fetcher, PollScheduler, StopReason, Timer, TokioTimer, Traversal,
};
use disclosure_tracker::storage::{CsvStore, OpenMode, RecordSink, TradeRecord};
use disclosure_tracker::{DedupIndex, FetchError};
use std::future::Future;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::watch;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HEADER_LINE: &str =
    "Politician,Issuer,PublishedDate,TradedDate,DaysAfter,Owner,Type,SizeRange,Price";

/// Timer that returns immediately and remembers what it was asked to wait
#[derive(Clone, Default)]
struct InstantTimer {
    waits: Arc<Mutex<Vec<Duration>>>,
}

impl InstantTimer {
    fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

impl Timer for InstantTimer {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        self.waits.lock().unwrap().push(duration);
        std::future::ready(())
    }
}

/// Timer that requests shutdown instead of waiting
#[derive(Clone)]
struct ShutdownTimer {
    shutdown: Arc<watch::Sender<bool>>,
}

impl Timer for ShutdownTimer {
    fn sleep(&self, _duration: Duration) -> impl Future<Output = ()> + Send {
        let _ = self.shutdown.send(true);
        std::future::pending()
    }
}

/// A 9-cell table row
fn trade_row(politician: &str, issuer: &str, traded: &str, kind: &str, price: &str) -> String {
    format!(
        "<tr><td><a href=\"/politicians/x\">{}</a></td><td>{}</td><td>2 Jul 2024</td>\
         <td>{}</td><td>4</td><td>Spouse</td><td><span>{}</span></td><td>1K–15K</td><td>{}</td></tr>",
        politician, issuer, traded, kind, price
    )
}

/// A row with only 8 cells
fn short_row() -> String {
    "<tr><td>Broken</td><td>Row</td><td>a</td><td>b</td><td>c</td><td>d</td><td>Buy</td><td>e</td></tr>"
        .to_string()
}

fn numbered_rows(page: u32, count: u32) -> Vec<String> {
    (1..=count)
        .map(|n| {
            trade_row(
                &format!("Member {}-{}", page, n),
                "Acme Inc",
                "28 Jun 2024",
                "Buy",
                "$10.00",
            )
        })
        .collect()
}

/// A listing page with the trades table and an optional next-page link
fn listing(rows: &[String], next_page: Option<u32>) -> String {
    let next = next_page
        .map(|n| {
            format!(
                r#"<a aria-label="Go to next page" href="/trades?page={}">Next</a>"#,
                n
            )
        })
        .unwrap_or_default();

    format!(
        r#"<html><head><title>Trades</title></head><body>
        <table class="w-full caption-bottom text-size-3 text-txt">
            <thead><tr><th>Politician</th><th>Issuer</th></tr></thead>
            <tbody>{}</tbody>
        </table>
        <nav>{}</nav>
        </body></html>"#,
        rows.concat(),
        next
    )
}

/// A record as extraction would produce it from `trade_row`
fn stored(politician: &str, issuer: &str, traded: &str, kind: &str, price: &str) -> TradeRecord {
    TradeRecord {
        politician: politician.to_string(),
        issuer: issuer.to_string(),
        published_date: "2 Jul 2024".to_string(),
        traded_date: traded.to_string(),
        days_after: "4".to_string(),
        owner: "Spouse".to_string(),
        trade_type: kind.to_string(),
        size_range: "1K–15K".to_string(),
        price: price.to_string(),
    }
}

fn page_mock(page: u32, body: String) -> Mock {
    Mock::given(method("GET"))
        .and(path("/trades"))
        .and(query_param("page", page.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
}

fn test_config(server: &MockServer, store: &Path) -> Config {
    let mut config = Config::default();
    config.source.base_url = server.uri();
    config.traversal.page_delay_ms = 0;
    config.output.store_path = store.display().to_string();
    config
}

fn data_rows(store: &Path) -> Vec<String> {
    std::fs::read_to_string(store)
        .unwrap()
        .lines()
        .skip(1)
        .map(str::to_string)
        .collect()
}

/// Page 1: 5 valid rows + 1 eight-cell row; page 2: 3 valid rows, last page
async fn mount_two_page_listing(server: &MockServer) {
    let mut first = numbered_rows(1, 5);
    first.insert(2, short_row());

    page_mock(1, listing(&first, Some(2))).mount(server).await;
    page_mock(2, listing(&numbered_rows(2, 3), None))
        .mount(server)
        .await;
}

// ===== Fetcher =====

#[tokio::test]
async fn test_fetch_sends_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/trades"))
        .and(header("user-agent", "Mozilla/5.0 (X11; Linux x86_64) Firefox/120.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher =
        Fetcher::new("Mozilla/5.0 (X11; Linux x86_64) Firefox/120.0", Duration::from_secs(5))
            .unwrap();
    let url = Url::parse(&format!("{}/trades?page=1", server.uri())).unwrap();

    assert_eq!(fetcher.fetch(&url).await.unwrap(), "ok");
}

#[tokio::test]
async fn test_fetch_classifies_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(DEFAULT_USER_AGENT, Duration::from_secs(5)).unwrap();
    let url = Url::parse(&format!("{}/trades?page=1", server.uri())).unwrap();

    assert_eq!(fetcher.fetch(&url).await, Err(FetchError::HttpStatus(404)));
}

#[tokio::test]
async fn test_fetch_classifies_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("slow")
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(DEFAULT_USER_AGENT, Duration::from_millis(200)).unwrap();
    let url = Url::parse(&format!("{}/trades?page=1", server.uri())).unwrap();

    assert_eq!(fetcher.fetch(&url).await, Err(FetchError::Timeout));
}

#[tokio::test]
async fn test_fetcher_uses_configured_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("slow")
                .set_delay(Duration::from_millis(2500)),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = test_config(&server, &dir.path().join("trades.csv"));
    config.source.timeout_secs = 1;
    let fetcher = Fetcher::from_config(&config).unwrap();
    let url = config.start_url().unwrap();

    assert_eq!(fetcher.fetch(&url).await, Err(FetchError::Timeout));
}

#[tokio::test]
async fn test_fetch_classifies_network_error() {
    // Bind and release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let url = Url::parse(&format!("http://127.0.0.1:{}/trades?page=1", port)).unwrap();

    let fetcher = Fetcher::new(DEFAULT_USER_AGENT, Duration::from_secs(5)).unwrap();

    assert!(matches!(
        fetcher.fetch(&url).await,
        Err(FetchError::Network(_))
    ));
}

// ===== Full crawl =====

#[tokio::test]
async fn test_full_crawl_two_pages() {
    let server = MockServer::start().await;
    mount_two_page_listing(&server).await;

    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("trades.csv");
    let config = test_config(&server, &store_path);

    let timer = InstantTimer::default();
    let traversal = Traversal::from_config(&config, timer.clone()).unwrap();
    let mut store = CsvStore::open(&store_path, OpenMode::Truncate).unwrap();
    let report = traversal.full_crawl(&mut store).await.unwrap();
    drop(store);

    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.records_appended, 8);
    assert_eq!(report.malformed_rows, 1);
    assert_eq!(report.stop_reason, StopReason::NoNextPage);

    let content = std::fs::read_to_string(&store_path).unwrap();
    assert_eq!(content.lines().next(), Some(HEADER_LINE));

    let rows = data_rows(&store_path);
    assert_eq!(rows.len(), 8);
    assert!(rows[0].starts_with("Member 1-1,Acme Inc,"));
    assert!(rows[7].starts_with("Member 2-3,"));
    assert!(rows.iter().all(|row| row.contains(",buy,")));
    assert!(!content.contains("Broken"));

    // One politeness pause between the two pages.
    assert_eq!(timer.waits(), vec![Duration::ZERO]);
}

#[tokio::test]
async fn test_full_crawl_keeps_duplicates() {
    let server = MockServer::start().await;
    let rows = vec![
        trade_row("Jane Doe", "Acme Inc", "28 Jun 2024", "Buy", "$10.00"),
        trade_row("Jane Doe", "Acme Inc", "28 Jun 2024", "Buy", "$11.00"),
    ];
    page_mock(1, listing(&rows, None)).mount(&server).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &dir.path().join("trades.csv"));
    let traversal = Traversal::from_config(&config, InstantTimer::default()).unwrap();

    let mut sink: Vec<TradeRecord> = Vec::new();
    let report = traversal.full_crawl(&mut sink).await.unwrap();

    assert_eq!(report.records_appended, 2);
    assert_eq!(sink.len(), 2);
}

#[tokio::test]
async fn test_full_crawl_visits_each_page_of_chain_once() {
    let server = MockServer::start().await;
    for page in 1..=4 {
        let next = if page < 4 { Some(page + 1) } else { None };
        page_mock(page, listing(&numbered_rows(page, 2), next))
            .expect(1)
            .mount(&server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &dir.path().join("trades.csv"));
    let traversal = Traversal::from_config(&config, InstantTimer::default()).unwrap();

    let mut sink: Vec<TradeRecord> = Vec::new();
    let report = traversal.full_crawl(&mut sink).await.unwrap();

    assert_eq!(report.pages_visited, 4);
    assert_eq!(report.stop_reason, StopReason::NoNextPage);
    assert_eq!(sink.len(), 8);
}

#[tokio::test]
async fn test_full_crawl_stops_on_cycle() {
    let server = MockServer::start().await;
    page_mock(1, listing(&numbered_rows(1, 1), Some(2)))
        .expect(1)
        .mount(&server)
        .await;
    page_mock(2, listing(&numbered_rows(2, 1), Some(1)))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &dir.path().join("trades.csv"));
    let traversal = Traversal::from_config(&config, InstantTimer::default()).unwrap();

    let mut sink: Vec<TradeRecord> = Vec::new();
    let report = traversal.full_crawl(&mut sink).await.unwrap();

    assert_eq!(report.pages_visited, 2);
    assert!(matches!(report.stop_reason, StopReason::CycleDetected(ref url)
        if url.query() == Some("page=1")));
    assert_eq!(sink.len(), 2);
}

#[tokio::test]
async fn test_fetch_failure_keeps_partial_results() {
    let server = MockServer::start().await;
    page_mock(1, listing(&numbered_rows(1, 2), Some(2)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/trades"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("trades.csv");
    let config = test_config(&server, &store_path);
    let traversal = Traversal::from_config(&config, InstantTimer::default()).unwrap();

    let mut store = CsvStore::open(&store_path, OpenMode::Truncate).unwrap();
    let report = traversal.full_crawl(&mut store).await.unwrap();
    drop(store);

    assert!(report.fetch_failed());
    assert!(matches!(
        report.stop_reason,
        StopReason::FetchFailed {
            error: FetchError::HttpStatus(503),
            ..
        }
    ));
    assert_eq!(report.pages_visited, 1);
    assert_eq!(data_rows(&store_path).len(), 2);
}

// ===== Incremental traversal =====

#[tokio::test]
async fn test_incremental_dedups_on_identity_key() {
    let server = MockServer::start().await;
    let rows = vec![
        trade_row("Jane Doe", "Acme Inc", "28 Jun 2024", "Buy", "$10.00"),
        trade_row("Jane Doe", "Acme Inc", "28 Jun 2024", "Buy", "$99.00"),
        trade_row("Jane Doe", "Acme Inc", "28 Jun 2024", "Sell", "$10.00"),
    ];
    page_mock(1, listing(&rows, None)).mount(&server).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &dir.path().join("trades.csv"));
    let traversal = Traversal::from_config(&config, InstantTimer::default()).unwrap();

    let mut sink: Vec<TradeRecord> = Vec::new();
    let mut index = DedupIndex::new();
    let report = traversal.incremental(&mut sink, &mut index).await.unwrap();

    assert_eq!(report.records_seen, 3);
    assert_eq!(report.records_appended, 2);
    assert_eq!(sink[0].price, "$10.00");
    assert_eq!(sink[1].trade_type, "sell");
    assert_eq!(index.len(), 2);
}

#[tokio::test]
async fn test_incremental_respects_page_cap() {
    let server = MockServer::start().await;
    for page in 1..=5 {
        let next = if page < 5 { Some(page + 1) } else { None };
        let expected = if page <= 3 { 1 } else { 0 };
        page_mock(page, listing(&numbered_rows(page, 1), next))
            .expect(expected)
            .mount(&server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &dir.path().join("trades.csv"));
    let traversal = Traversal::from_config(&config, InstantTimer::default()).unwrap();

    let mut sink: Vec<TradeRecord> = Vec::new();
    let mut index = DedupIndex::new();
    let report = traversal.incremental(&mut sink, &mut index).await.unwrap();

    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.stop_reason, StopReason::PageCapReached);
    assert_eq!(report.records_appended, 3);
}

#[tokio::test]
async fn test_incremental_stops_on_empty_table() {
    let server = MockServer::start().await;
    page_mock(1, listing(&[], Some(2))).mount(&server).await;
    page_mock(2, listing(&numbered_rows(2, 1), None))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &dir.path().join("trades.csv"));
    let traversal = Traversal::from_config(&config, InstantTimer::default()).unwrap();

    let mut sink: Vec<TradeRecord> = Vec::new();
    let mut index = DedupIndex::new();
    let report = traversal.incremental(&mut sink, &mut index).await.unwrap();

    assert_eq!(report.stop_reason, StopReason::EmptyPage);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_incremental_reports_missing_table() {
    let server = MockServer::start().await;
    page_mock(
        1,
        r#"<html><body><p>Maintenance</p>
           <a aria-label="Go to next page" href="/trades?page=2">Next</a></body></html>"#
            .to_string(),
    )
    .mount(&server)
    .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &dir.path().join("trades.csv"));
    let traversal = Traversal::from_config(&config, InstantTimer::default()).unwrap();

    let mut sink: Vec<TradeRecord> = Vec::new();
    let mut index = DedupIndex::new();
    let report = traversal.incremental(&mut sink, &mut index).await.unwrap();

    assert_eq!(report.stop_reason, StopReason::TableMissing);
    assert_eq!(report.pages_visited, 1);
}

#[tokio::test]
async fn test_traversal_stays_on_configured_site() {
    let server = MockServer::start().await;
    let elsewhere = MockServer::start().await;

    let off_site_link = format!(
        r#"<nav><a aria-label="Go to next page" href="{}/trades?page=2">Next</a></nav>"#,
        elsewhere.uri()
    );
    page_mock(
        1,
        listing(&numbered_rows(1, 1), None).replace("<nav></nav>", &off_site_link),
    )
    .mount(&server)
    .await;
    page_mock(2, listing(&numbered_rows(9, 1), None))
        .expect(0)
        .mount(&elsewhere)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &dir.path().join("trades.csv"));
    let traversal = Traversal::from_config(&config, InstantTimer::default()).unwrap();

    let mut sink: Vec<TradeRecord> = Vec::new();
    let mut index = DedupIndex::new();
    let report = traversal.incremental(&mut sink, &mut index).await.unwrap();

    assert_eq!(report.pages_visited, 1);
    assert_eq!(report.stop_reason, StopReason::NoNextPage);
    let politicians: Vec<&str> = sink.iter().map(|r| r.politician.as_str()).collect();
    assert_eq!(politicians, vec!["Member 1-1"]);

    let mut crawled: Vec<TradeRecord> = Vec::new();
    let report = traversal.full_crawl(&mut crawled).await.unwrap();
    assert_eq!(report.pages_visited, 1);
    assert_eq!(crawled.len(), 1);
}

// ===== Poll scheduler =====

#[tokio::test]
async fn test_monitor_first_cycle_stores_everything() {
    let server = MockServer::start().await;
    mount_two_page_listing(&server).await;

    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("trades.csv");
    let config = test_config(&server, &store_path);

    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = PollScheduler::new(&config, InstantTimer::default(), shutdown_rx)
        .unwrap()
        .with_max_cycles(1);
    let summary = scheduler.run().await;

    assert_eq!(summary.cycles, 1);
    assert_eq!(summary.new_records, 8);

    let content = std::fs::read_to_string(&store_path).unwrap();
    assert_eq!(content.lines().next(), Some(HEADER_LINE));
    assert_eq!(data_rows(&store_path).len(), 8);
}

#[tokio::test]
async fn test_monitor_is_idempotent() {
    let server = MockServer::start().await;
    mount_two_page_listing(&server).await;

    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("trades.csv");
    let config = test_config(&server, &store_path);

    let timer = InstantTimer::default();
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut scheduler = PollScheduler::new(&config, timer.clone(), shutdown_rx).unwrap();

    let first = scheduler.run_cycle().await;
    assert_eq!(first.new_records(), 8);
    let after_first = std::fs::read(&store_path).unwrap();

    let second = scheduler.run_cycle().await;
    assert_eq!(second.cycle, 2);
    assert_eq!(second.new_records(), 0);
    assert_eq!(std::fs::read(&store_path).unwrap(), after_first);
    drop(scheduler);

    // A fresh process rebuilds the index from the store and finds nothing new.
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let restarted = PollScheduler::new(&config, timer, shutdown_rx).unwrap();
    assert_eq!(restarted.known_records(), 8);
    let summary = restarted.with_max_cycles(1).run().await;

    assert_eq!(summary.new_records, 0);
    assert_eq!(std::fs::read(&store_path).unwrap(), after_first);
}

#[tokio::test]
async fn test_monitor_appends_only_new_trades_to_existing_store() {
    let server = MockServer::start().await;
    let old = vec![
        trade_row("Jane Doe", "Acme Inc", "28 Jun 2024", "Buy", "$10.00"),
        trade_row("John Roe", "Globex", "27 Jun 2024", "Sell", "$20.00"),
    ];
    let mut current = vec![trade_row("Ann Poe", "Initech", "1 Jul 2024", "Buy", "$5.00")];
    current.extend(old);
    page_mock(1, listing(&current, None)).mount(&server).await;

    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("trades.csv");
    {
        let mut store = CsvStore::open(&store_path, OpenMode::Truncate).unwrap();
        store
            .append(&stored("Jane Doe", "Acme Inc", "28 Jun 2024", "buy", "$10.00"))
            .unwrap();
        // Same identity as the listed sale, different price.
        store
            .append(&stored("John Roe", "Globex", "27 Jun 2024", "sell", "$21.50"))
            .unwrap();
    }

    let config = test_config(&server, &store_path);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let summary = PollScheduler::new(&config, InstantTimer::default(), shutdown_rx)
        .unwrap()
        .with_max_cycles(1)
        .run()
        .await;

    assert_eq!(summary.new_records, 1);
    let rows = data_rows(&store_path);
    assert_eq!(rows.len(), 3);
    assert!(rows[2].starts_with("Ann Poe,Initech,"));
}

#[tokio::test]
async fn test_monitor_survives_persistent_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("trades.csv");
    let config = test_config(&server, &store_path);

    let timer = InstantTimer::default();
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let summary = PollScheduler::new(&config, timer.clone(), shutdown_rx)
        .unwrap()
        .with_max_cycles(3)
        .run()
        .await;

    assert_eq!(summary.cycles, 3);
    assert_eq!(summary.new_records, 0);
    assert_eq!(
        timer.waits(),
        vec![Duration::from_secs(3600), Duration::from_secs(3600)]
    );

    // The store exists with just its header.
    assert_eq!(
        std::fs::read_to_string(&store_path).unwrap(),
        format!("{}\n", HEADER_LINE)
    );
}

#[tokio::test]
async fn test_monitor_does_not_start_after_shutdown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &dir.path().join("trades.csv"));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    shutdown_tx.send(true).unwrap();

    let summary = PollScheduler::new(&config, InstantTimer::default(), shutdown_rx)
        .unwrap()
        .run()
        .await;

    assert_eq!(summary.cycles, 0);
}

#[tokio::test]
async fn test_monitor_stops_when_shutdown_arrives_while_waiting() {
    let server = MockServer::start().await;
    page_mock(1, listing(&numbered_rows(1, 2), None))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &dir.path().join("trades.csv"));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let timer = ShutdownTimer {
        shutdown: Arc::new(shutdown_tx),
    };

    let summary = tokio::time::timeout(
        Duration::from_secs(10),
        PollScheduler::new(&config, timer, shutdown_rx).unwrap().run(),
    )
    .await
    .expect("scheduler did not stop on shutdown");

    assert_eq!(summary.cycles, 1);
    assert_eq!(summary.new_records, 2);
}

#[tokio::test]
async fn test_tokio_timer_paces_pages() {
    let server = MockServer::start().await;
    page_mock(1, listing(&numbered_rows(1, 1), Some(2)))
        .mount(&server)
        .await;
    page_mock(2, listing(&numbered_rows(2, 1), None))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = test_config(&server, &dir.path().join("trades.csv"));
    config.traversal.page_delay_ms = 50;
    let traversal = Traversal::from_config(&config, TokioTimer).unwrap();

    let start = std::time::Instant::now();
    let mut sink: Vec<TradeRecord> = Vec::new();
    traversal.full_crawl(&mut sink).await.unwrap();

    assert!(start.elapsed() >= Duration::from_millis(50));
    assert_eq!(sink.len(), 2);
}
