use country_atlas::filter::{Browser, Region, RegionFilter};
use country_atlas::{RequestError, RestCountries};
use httpmock::prelude::*;
use serde_json::json;

mod common;

use common::{japan_json, usa_json};

#[tokio::test]
async fn all_sends_the_field_projection() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/all")
                .query_param("fields", "name,cca3,region");
            then.status(200).json_body(json!([
                { "cca3": "JPN", "name": { "common": "Japan" }, "region": "Asia" },
                { "cca3": "USA", "name": { "common": "United States" }, "region": "Americas" }
            ]));
        })
        .await;

    let client = RestCountries::new(&server.base_url());
    let countries = client
        .all()
        .fields(&["name", "cca3", "region"])
        .call()
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(countries.len(), 2);
    assert_eq!(countries[0].cca3, "JPN");
    assert!(countries[0].capital().is_none());
}

#[tokio::test]
async fn fetched_list_feeds_the_browser() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/all");
            then.status(200).json_body(json!([usa_json(), japan_json()]));
        })
        .await;

    let client = RestCountries::new(&server.base_url());
    let mut browser = Browser::new(client.all().call().await.unwrap());

    browser.set_region(RegionFilter::Only(Region::Asia));

    let visible: Vec<&str> = browser.visible().iter().map(|c| c.cca3.as_str()).collect();
    assert_eq!(visible, ["JPN"]);
    assert_eq!(browser.total_pages(), 1);
}

#[tokio::test]
async fn alpha_returns_the_first_record() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/alpha/JPN");
            then.status(200).json_body(json!([japan_json()]));
        })
        .await;

    let client = RestCountries::new(&server.base_url());
    let japan = client.alpha("JPN").call().await.unwrap();

    mock.assert_async().await;
    assert_eq!(japan.name.common, "Japan");
    assert_eq!(japan.capital(), Some("Tokyo"));
}

#[tokio::test]
async fn unknown_code_is_not_found() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/alpha/XXX");
            then.status(404)
                .json_body(json!({ "status": 404, "message": "Not Found" }));
        })
        .await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/alpha/ZZZ");
            then.status(200).json_body(json!([]));
        })
        .await;

    let client = RestCountries::new(&server.base_url());

    let error = client.alpha("XXX").call().await.unwrap_err();
    assert!(error.is_not_found());
    assert_eq!(error.user_message(), "Country details not found.");

    let error = client.alpha("ZZZ").call().await.unwrap_err();
    assert!(matches!(error, RequestError::NotFound));
}

#[tokio::test]
async fn blank_code_sends_nothing() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200).json_body(json!([]));
        })
        .await;

    let client = RestCountries::new(&server.base_url());
    let error = client.alpha("  ").call().await.unwrap_err();

    assert!(error.is_not_found());
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn server_errors_are_transient() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/all");
            then.status(503);
        })
        .await;

    let client = RestCountries::new(&server.base_url());
    let error = client.all().call().await.unwrap_err();

    assert!(error.is_transient());
    assert!(!error.is_not_found());
    assert_eq!(
        error.user_message(),
        "Failed to load data. Please try again later."
    );
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/all");
            then.status(200).body("<html>maintenance</html>");
        })
        .await;

    let client = RestCountries::new(&server.base_url());
    let error = client.all().call().await.unwrap_err();

    assert!(matches!(error, RequestError::ParseError(_)));
}

#[tokio::test]
async fn rate_limiting_is_reported() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/all");
            then.status(429);
        })
        .await;

    let client = RestCountries::new(&server.base_url());
    let error = client.all().call().await.unwrap_err();

    assert!(matches!(error, RequestError::TooManyRequests));
}

#[tokio::test]
async fn scoped_lists() {
    let server = MockServer::start_async().await;

    let region = server
        .mock_async(|when, then| {
            when.method(GET).path("/region/asia");
            then.status(200).json_body(json!([japan_json()]));
        })
        .await;

    let language = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/lang/english")
                .query_param("fields", "cca3,name");
            then.status(200).json_body(json!([usa_json()]));
        })
        .await;

    let name = server
        .mock_async(|when, then| {
            when.method(GET).path("/name/atlantis");
            then.status(404);
        })
        .await;

    let client = RestCountries::new(&server.base_url());

    let asia = client.by_region(Region::Asia).call().await.unwrap();
    assert_eq!(asia[0].cca3, "JPN");

    let english = client
        .by_language("english")
        .fields(&["cca3", "name"])
        .call()
        .await
        .unwrap();
    assert_eq!(english[0].cca3, "USA");

    let none = client.by_name("atlantis").call().await.unwrap();
    assert!(none.is_empty());

    region.assert_async().await;
    language.assert_async().await;
    name.assert_async().await;
}

#[test]
#[should_panic(expected = "Invalid base_url")]
fn base_url_must_be_http() {
    let _ = RestCountries::new("restcountries.com/v3.1");
}

#[test]
fn trailing_slash_is_trimmed() {
    let client = RestCountries::new("https://restcountries.com/v3.1/");

    assert_eq!(client.base_url(), "https://restcountries.com/v3.1");
}

#[tokio::test]
async fn codes_and_names_stay_inside_their_path_segment() {
    let server = MockServer::start_async().await;

    let all = server
        .mock_async(|when, then| {
            when.method(GET).path("/all");
            then.status(200).json_body(json!([japan_json()]));
        })
        .await;

    let alpha = server
        .mock_async(|when, then| {
            when.method(GET).path_contains("/alpha/");
            then.status(404);
        })
        .await;

    let name = server
        .mock_async(|when, then| {
            when.method(GET).path_contains("/name/");
            then.status(404);
        })
        .await;

    let client = RestCountries::new(&server.base_url());

    let error = client.alpha("../all").call().await.unwrap_err();
    assert!(error.is_not_found());

    let none = client.by_name("../../all").call().await.unwrap();
    assert!(none.is_empty());

    all.assert_hits_async(0).await;
    alpha.assert_hits_async(1).await;
    name.assert_hits_async(1).await;
}

#[tokio::test]
async fn base_path_is_kept() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/v3.1/alpha/JPN");
            then.status(200).json_body(json!([japan_json()]));
        })
        .await;

    let client = RestCountries::new(&server.url("/v3.1/"));
    let japan = client.alpha("JPN").call().await.unwrap();

    mock.assert_async().await;
    assert_eq!(japan.cca3, "JPN");
}
