//! End-to-end pipeline tests
//!
//! These tests run the discovery and detail phases against a wiremock
//! server serving a synthetic two-page listing and player detail pages.

use sprobot::config::CrawlConfig;
use sprobot::crawler::{build_http_client, crawl_details, discover_players};
use sprobot::output::write_players;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(workers: usize) -> CrawlConfig {
    CrawlConfig {
        workers,
        listing_delay: Duration::from_millis(10), // Very short for testing
        ..CrawlConfig::default()
    }
}

/// A listing page: one table row per (href, name) pair, plus a pagination
/// control that is disabled on the last page.
fn listing_html(rows: &[(&str, &str)], next_href: Option<&str>) -> String {
    let mut body = String::from(
        r#"<html><body><article><div id="pjax-container"><table><tbody>"#,
    );
    for (href, name) in rows {
        body.push_str(&format!(
            r#"<tr><td><div class="col-name">
            <a href="/flag"><img src="flag.png"></a>
            <a href="{}">{}</a>
            </div></td></tr>"#,
            href, name
        ));
    }
    body.push_str("</tbody></table></div>");
    match next_href {
        Some(next) => body.push_str(&format!(
            r#"<div class="pagination"><span class="page-item"><a href="{}">Next</a></span></div>"#,
            next
        )),
        None => body.push_str(
            r#"<div class="pagination"><span class="page-item"><a class="disabled">Next</a></span></div>"#,
        ),
    }
    body.push_str("</article></body></html>");
    body
}

fn detail_html(fullname: &str, overall: u32) -> String {
    format!(
        r##"<html><body><article><div class="player">
        <div class="info"><div class="meta">
            <span>{} <img src="portrait.png"> Age 25 (Mar 14, 1994) 5'9" 160lbs</span>
        </div></div>
        <div class="stats">
            <div class="text-center"><span>{}</span></div>
            <div class="text-center"><span>90</span></div>
            <div class="text-center"><span>€50M</span></div>
            <div class="text-center"><span>€100K</span></div>
        </div>
        </div>
        <div class="columns"><div class="column"><div>
            <h5>Attacking</h5>
            <ul><li>87 Finishing</li><li>Flair</li></ul>
        </div></div></div>
        </article></body></html>"##,
        fullname, overall
    )
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_two_page_discovery_in_page_then_row_order() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    // Page 1: three players, next link to a sibling segment.
    Mock::given(method("GET"))
        .and(path("/players"))
        .respond_with(html_response(listing_html(
            &[
                ("/player/1", "Player One"),
                ("/player/2", "Player Two"),
                ("/player/3", "Player Three"),
            ],
            Some("players2"),
        )))
        .mount(&mock_server)
        .await;

    // Page 2: two players, disabled next link. Must be fetched with the
    // first page as Referer.
    Mock::given(method("GET"))
        .and(path("/players2"))
        .and(header("referer", format!("{}/players", base).as_str()))
        .respond_with(html_response(listing_html(
            &[("/player/4", "Player Four"), ("/player/5", "Player Five")],
            None,
        )))
        .mount(&mock_server)
        .await;

    let client = build_http_client().unwrap();
    let start = Url::parse(&format!("{}/players", base)).unwrap();
    let players = discover_players(&client, start, &test_config(4))
        .await
        .expect("discovery failed");

    assert_eq!(players.len(), 5);
    let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Player One",
            "Player Two",
            "Player Three",
            "Player Four",
            "Player Five"
        ]
    );
    assert_eq!(
        players[0].url.as_str(),
        format!("{}/player/1", base).as_str()
    );
    // The reference carries the listing page it was found on.
    assert_eq!(
        players[4].referer.as_deref(),
        Some(format!("{}/players2", base).as_str())
    );
}

#[tokio::test]
async fn test_full_pipeline_extracts_all_records() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/players"))
        .respond_with(html_response(listing_html(
            &[
                ("/player/1", "Player One"),
                ("/player/2", "Player Two"),
                ("/player/3", "Player Three"),
            ],
            Some("players2"),
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/players2"))
        .respond_with(html_response(listing_html(
            &[("/player/4", "Player Four"), ("/player/5", "Player Five")],
            None,
        )))
        .mount(&mock_server)
        .await;

    for i in 1..=5 {
        Mock::given(method("GET"))
            .and(path(format!("/player/{}", i)))
            .respond_with(html_response(detail_html(
                &format!("Full Name {}", i),
                80 + i,
            )))
            .mount(&mock_server)
            .await;
    }

    let client = build_http_client().unwrap();
    let config = test_config(4);
    let start = Url::parse(&format!("{}/players", base)).unwrap();
    let players = discover_players(&client, start, &config)
        .await
        .expect("discovery failed");

    let (records, progress) = crawl_details(&client, players, &config)
        .await
        .expect("crawl failed");

    assert_eq!(progress.total, 5);
    assert_eq!(progress.completed, 5);
    assert_eq!(progress.succeeded, 5);
    assert_eq!(progress.failed, 0);
    assert_eq!(progress.workers_done, 4);

    // Records come back in discovery order regardless of worker timing.
    assert_eq!(records.len(), 5);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.name, format!("Player {}", num_word(i + 1)));
        assert_eq!(record.fullname.as_deref(), Some(format!("Full Name {}", i + 1).as_str()));
        assert_eq!(record.overall, Some(81 + i as i32));
        assert_eq!(record.properties.len(), 1);
        assert_eq!(record.properties[0].properties[1].score, -1);
    }

    // And the collection serializes with every record present.
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("data.json");
    write_players(&out, &records).unwrap();
    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 5);
}

fn num_word(n: usize) -> &'static str {
    ["One", "Two", "Three", "Four", "Five"][n - 1]
}

#[tokio::test]
async fn test_failed_detail_page_is_counted_and_record_retained() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/players"))
        .respond_with(html_response(listing_html(
            &[("/player/1", "Player One"), ("/player/2", "Player Two")],
            None,
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/player/1"))
        .respond_with(html_response(detail_html("Full Name 1", 81)))
        .mount(&mock_server)
        .await;

    // Second detail page is gone.
    Mock::given(method("GET"))
        .and(path("/player/2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = build_http_client().unwrap();
    let config = test_config(2);
    let start = Url::parse(&format!("{}/players", base)).unwrap();
    let players = discover_players(&client, start, &config)
        .await
        .expect("discovery failed");

    let (records, progress) = crawl_details(&client, players, &config)
        .await
        .expect("crawl failed");

    assert_eq!(progress.total, 2);
    assert_eq!(progress.completed, 2);
    assert_eq!(progress.succeeded, 1);
    assert_eq!(progress.failed, 1);

    // The failed record is retained with only its listing identity set.
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].name, "Player Two");
    assert_eq!(records[1].fullname, None);
    assert_eq!(records[1].overall, None);
}

#[tokio::test]
async fn test_unextractable_detail_page_keeps_partial_record() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/players"))
        .respond_with(html_response(listing_html(
            &[("/player/1", "Player One")],
            None,
        )))
        .mount(&mock_server)
        .await;

    // The meta block is present but the stats are garbage, so extraction
    // fails after identity was assigned.
    Mock::given(method("GET"))
        .and(path("/player/1"))
        .respond_with(html_response(
            r##"<html><body><article><div class="player">
            <div class="info"><div class="meta">
                <span>Partial Person <img src="p.png"> Age 30 (Jan 1, 1990) 6'0" 180lbs</span>
            </div></div>
            <div class="stats">
                <div class="text-center"><span>garbage</span></div>
            </div>
            </div></article></body></html>"##
                .to_string(),
        ))
        .mount(&mock_server)
        .await;

    let client = build_http_client().unwrap();
    let config = test_config(1);
    let start = Url::parse(&format!("{}/players", base)).unwrap();
    let players = discover_players(&client, start, &config)
        .await
        .expect("discovery failed");

    let (records, progress) = crawl_details(&client, players, &config)
        .await
        .expect("crawl failed");

    assert_eq!(progress.failed, 1);
    assert_eq!(records[0].fullname.as_deref(), Some("Partial Person"));
    assert_eq!(records[0].age, Some(30));
    assert_eq!(records[0].overall, None);
}

#[tokio::test]
async fn test_listing_error_aborts_discovery() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/players"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = build_http_client().unwrap();
    let start = Url::parse(&format!("{}/players", base)).unwrap();
    let result = discover_players(&client, start, &test_config(2)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_listing_error_on_second_page_discards_first() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/players"))
        .respond_with(html_response(listing_html(
            &[("/player/1", "Player One")],
            Some("players2"),
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/players2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = build_http_client().unwrap();
    let start = Url::parse(&format!("{}/players", base)).unwrap();
    let result = discover_players(&client, start, &test_config(2)).await;
    // Fail-fast: the page-one references do not survive the failure.
    assert!(result.is_err());
}
