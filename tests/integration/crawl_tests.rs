//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small catalog and drive the full
//! discover, expand, extract and store cycle through the HTTP page driver.

use card_harvest::config::{parse_config, Config, DriverConfig};
use card_harvest::crawler::CrawlOrchestrator;
use card_harvest::record::COLUMNS;
use card_harvest::storage::open_store;
use card_harvest::{CategoryReport, HttpPageDriver, PageDriver};
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CATEGORY_PAGE: &str = r#"<html><body>
    <a href="/console/pokemon-base-set">Pokemon Base Set</a>
    <a href="/console/pokemon-jungle">Pokemon Jungle</a>
    <a href="/console/magic-alpha">Alpha</a>
    <a href="/console/pokemon-base-set">Pokemon Base Set</a>
</body></html>"#;

const BASE_SET_PAGE: &str = r#"<html><body><table>
    <tr><td class="title"><a href="/game/pokemon-base-set/charizard-4">Charizard #4</a></td></tr>
    <tr><td class="title"><a href="/game/pokemon-base-set/blastoise-2">Blastoise #2</a></td></tr>
</table></body></html>"#;

const JUNGLE_PAGE: &str = r#"<html><body><table>
    <tr><td class="title"><a href="/game/pokemon-jungle/pikachu-60">Pikachu #60</a></td></tr>
</table></body></html>"#;

/// Creates a test configuration pointing at the mock server with every delay disabled
fn create_test_config(base_url: &str, store: &Path) -> Config {
    parse_config(&format!(
        r#"
[crawler]
max-retries = 2
wait-timeout-ms = 0
retry-backoff-ms = 0
scroll-poll-interval-ms = 0
pacing-min-ms = 0
pacing-max-ms = 0

[[category]]
name = "pokemon"
start-url = "{base_url}/category/pokemon-cards"
store = '{store}'
filter = "pokemon"
"#,
        store = store.display()
    ))
    .expect("Failed to parse test config")
}

fn card_page(name: &str, image: &str) -> String {
    format!(
        r#"<html><body>
        <h1 id="product_name">
            {name}
        </h1>
        <span class="price js-price">$350.00</span>
        <span class="price js-price">$900.00</span>
        <span class="price js-price">$1,200.00</span>
        <table>
            <tr><td class="js-show-tab">volume: 41</td><td class="js-show-tab">volume: 3</td></tr>
            <tr><td class="details" itemprop="description">Holo Rare</td></tr>
        </table>
        <img src="/images/{image}-1600.jpg">
        </body></html>"#
    )
}

async fn mount_page(server: &MockServer, route: &str, body: impl Into<String>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body.into())
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Card pages of the catalog: route, product name, image stem
const CARDS: [(&str, &str, &str); 3] = [
    ("/game/pokemon-base-set/charizard-4", "Charizard #4", "charizard"),
    ("/game/pokemon-base-set/blastoise-2", "Blastoise #2", "blastoise"),
    ("/game/pokemon-jungle/pikachu-60", "Pikachu #60", "pikachu"),
];

/// Serves the category and set pages plus every card page except `skip`
async fn mount_catalog_except(server: &MockServer, skip: Option<&str>) {
    mount_page(server, "/category/pokemon-cards", CATEGORY_PAGE).await;
    mount_page(server, "/console/pokemon-base-set", BASE_SET_PAGE).await;
    mount_page(server, "/console/pokemon-jungle", JUNGLE_PAGE).await;
    for (route, name, image) in CARDS {
        if Some(route) != skip {
            mount_page(server, route, card_page(name, image)).await;
        }
    }
}

/// Serves a category with two pokemon sets and three cards
async fn mount_catalog(server: &MockServer) {
    mount_catalog_except(server, None).await;
}

async fn crawl(config: &Config) -> CategoryReport {
    let driver = HttpPageDriver::new(&config.driver).expect("Failed to build driver");
    let mut orchestrator = CrawlOrchestrator::new(driver, config.crawler.clone(), &config.selectors);
    let mut reports = orchestrator.run(&config.categories).await;
    assert_eq!(reports.len(), 1);
    reports.remove(0)
}

fn read_rows(store: &Path) -> Vec<csv::StringRecord> {
    let mut reader = csv::Reader::from_path(store).expect("Failed to open store");
    let headers = reader.headers().expect("Missing header").clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), COLUMNS.to_vec());
    reader.records().map(|r| r.expect("Bad row")).collect()
}

#[tokio::test]
async fn test_full_crawl_into_csv() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    mount_catalog(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("pokemon_cards.csv");
    let config = create_test_config(&base_url, &store);

    let report = crawl(&config).await;

    assert!(report.is_success(), "crawl failed: {:?}", report.failure);
    assert_eq!(report.sets_discovered, 2);
    assert_eq!(report.cards_extracted, 3);
    assert_eq!(report.rows_written, 3);
    assert_eq!(report.flushes, 1);

    let rows = read_rows(&store);
    assert_eq!(rows.len(), 3);

    let charizard = &rows[0];
    assert_eq!(&charizard[0], "Charizard #4");
    assert_eq!(&charizard[1], "$350.00");
    assert_eq!(&charizard[2], "41");
    assert_eq!(&charizard[3], "$900.00");
    assert_eq!(&charizard[4], "3");
    assert_eq!(&charizard[5], "$1,200.00");
    assert_eq!(&charizard[6], "N/A");
    assert_eq!(&charizard[12], "N/A");
    assert_eq!(&charizard[13], "Holo Rare");
    assert_eq!(&charizard[14], "N/A");
    assert_eq!(
        &charizard[15],
        format!("{}/images/charizard-1600.jpg", base_url)
    );
    assert_eq!(
        &charizard[16],
        format!("{}/game/pokemon-base-set/charizard-4", base_url)
    );

    assert_eq!(&rows[2][0], "Pikachu #60");
}

#[tokio::test]
async fn test_second_run_adds_nothing() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("pokemon_cards.csv");
    let config = create_test_config(&server.uri(), &store);

    let first = crawl(&config).await;
    assert_eq!(first.rows_written, 3);

    let second = crawl(&config).await;

    assert!(second.is_success());
    assert_eq!(second.previously_stored, 3);
    assert_eq!(second.cards_already_stored, 3);
    assert_eq!(second.cards_extracted, 0);
    assert_eq!(second.flushes, 0);
    assert_eq!(read_rows(&store).len(), 3);
}

#[tokio::test]
async fn test_set_without_cards_is_skipped() {
    let server = MockServer::start().await;
    mount_page(&server, "/category/pokemon-cards", CATEGORY_PAGE).await;
    mount_page(
        &server,
        "/console/pokemon-base-set",
        "<html><body><p>Nothing here yet</p></body></html>",
    )
    .await;
    mount_page(&server, "/console/pokemon-jungle", JUNGLE_PAGE).await;
    mount_page(
        &server,
        "/game/pokemon-jungle/pikachu-60",
        card_page("Pikachu #60", "pikachu"),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("pokemon_cards.csv");
    let config = create_test_config(&server.uri(), &store);

    let report = crawl(&config).await;

    assert_eq!(report.sets_discovered, 2);
    assert_eq!(report.sets_skipped, 1);
    let rows = read_rows(&store);
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][0], "Pikachu #60");
}

#[tokio::test]
async fn test_failing_card_is_dropped_after_retries() {
    let server = MockServer::start().await;
    mount_catalog_except(&server, Some("/game/pokemon-base-set/blastoise-2")).await;
    Mock::given(method("GET"))
        .and(path("/game/pokemon-base-set/blastoise-2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("pokemon_cards.csv");
    let config = create_test_config(&server.uri(), &store);

    let report = crawl(&config).await;

    assert_eq!(report.cards_extracted, 2);
    assert_eq!(report.cards_failed, 1);
    let keys = open_store(&store).unwrap().load_keys().unwrap();
    assert_eq!(keys.len(), 2);
    assert!(!keys.iter().any(|url| url.ends_with("/blastoise-2")));
}

#[tokio::test]
async fn test_discovery_timeout_fails_category() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/category/pokemon-cards",
        "<html><body>Maintenance</body></html>",
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("pokemon_cards.csv");
    let config = create_test_config(&server.uri(), &store);

    let report = crawl(&config).await;

    assert!(!report.is_success());
    assert_eq!(report.sets_discovered, 0);
    assert!(!store.exists());
}

#[tokio::test]
async fn test_full_crawl_into_sqlite() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("pokemon_cards.db");
    let config = create_test_config(&server.uri(), &store);

    let first = crawl(&config).await;
    let second = crawl(&config).await;

    assert_eq!(first.rows_written, 3);
    assert_eq!(second.cards_extracted, 0);
    assert_eq!(open_store(&store).unwrap().count().unwrap(), 3);
}

#[tokio::test]
async fn test_selector_wait_fetches_page_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/game/pokemon-base-set/unreleased"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>Coming soon</body></html>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut driver = HttpPageDriver::new(&DriverConfig::default()).unwrap();
    driver
        .navigate(&format!("{}/game/pokemon-base-set/unreleased", server.uri()))
        .await
        .unwrap();
    let found = driver
        .wait_for_selector("h1#product_name", Duration::from_secs(25))
        .await
        .unwrap();

    assert!(!found);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_card_without_name_costs_one_request_per_attempt() {
    let server = MockServer::start().await;
    mount_catalog_except(&server, Some("/game/pokemon-base-set/blastoise-2")).await;
    Mock::given(method("GET"))
        .and(path("/game/pokemon-base-set/blastoise-2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>Under review</body></html>"),
        )
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("pokemon_cards.csv");
    let mut config = create_test_config(&server.uri(), &store);
    config.crawler.wait_timeout_ms = 25_000;

    let report = crawl(&config).await;

    assert_eq!(report.cards_failed, 1);
    assert_eq!(report.cards_extracted, 2);
}
