use serde_json::{Value, json};
use site_publisher::config::EdgeConfig;
use site_publisher::edge::{CloudFrontEvent, EdgeOutcome, EdgeRequest, EdgeResponse, language, path};

fn request(uri: &str, headers: Value) -> EdgeRequest {
    let event: CloudFrontEvent = serde_json::from_value(json!({
        "Records": [{
            "cf": {
                "config": { "distributionId": "EDFDVBD6EXAMPLE", "eventType": "viewer-request" },
                "request": {
                    "clientIp": "203.0.113.178",
                    "method": "GET",
                    "querystring": "",
                    "uri": uri,
                    "headers": headers
                }
            }
        }]
    }))
    .unwrap();
    event.into_request().unwrap()
}

fn host() -> Value {
    json!([{ "key": "Host", "value": "www.example.com" }])
}

fn expect_redirect(outcome: EdgeOutcome) -> EdgeResponse {
    match outcome {
        EdgeOutcome::Response(response) => response,
        EdgeOutcome::Request(request) => panic!("expected a redirect, got request {}", request.uri),
    }
}

fn expect_request(outcome: EdgeOutcome) -> EdgeRequest {
    match outcome {
        EdgeOutcome::Request(request) => request,
        EdgeOutcome::Response(response) => {
            panic!("expected pass-through, got redirect to {:?}", response.location())
        }
    }
}

fn header<'a>(response: &'a EdgeResponse, name: &str) -> Option<&'a str> {
    response
        .headers
        .get(name)
        .and_then(|values| values.first())
        .map(|h| h.value.as_str())
}

#[test]
fn test_root_without_cookie_redirects_by_accept_language() {
    let req = request(
        "/",
        json!({
            "host": host(),
            "accept-language": [{ "key": "Accept-Language", "value": "fr,en;q=0.8" }]
        }),
    );

    let response = expect_redirect(language::resolve(req, &EdgeConfig::default()));

    assert_eq!(response.status, "302");
    assert_eq!(response.status_description, "Found");
    assert_eq!(response.location(), Some("https://www.example.com/en/"));
    assert_eq!(header(&response, "set-cookie"), Some("language=en; Path=/"));
    assert_eq!(header(&response, "clear-site-data"), Some("\"*\""));
}

#[test]
fn test_valid_cookie_wins_and_skips_clear_site_data() {
    let config = EdgeConfig {
        languages: vec!["en".to_string(), "it".to_string()],
        ..EdgeConfig::default()
    };
    let req = request(
        "/about",
        json!({
            "host": host(),
            "cookie": [
                { "key": "Cookie", "value": "theme=dark" },
                { "key": "Cookie", "value": "_ga=GA1.2; language=it; other=1" }
            ],
            "accept-language": [{ "key": "Accept-Language", "value": "en" }]
        }),
    );

    let response = expect_redirect(language::resolve(req, &config));

    assert_eq!(response.location(), Some("https://www.example.com/it/about"));
    assert_eq!(header(&response, "set-cookie"), Some("language=it; Path=/"));
    assert!(response.headers.get("clear-site-data").is_none());
}

#[test]
fn test_unsupported_cookie_falls_back_to_default() {
    let req = request(
        "/contact",
        json!({
            "host": host(),
            "cookie": [{ "key": "Cookie", "value": "language=de" }]
        }),
    );

    let response = expect_redirect(language::resolve(req, &EdgeConfig::default()));

    assert_eq!(response.location(), Some("https://www.example.com/en/contact"));
    assert_eq!(header(&response, "clear-site-data"), Some("\"*\""));
}

#[test]
fn test_language_prefix_is_stripped_for_origin() {
    let req = request("/en/blog/post", json!({ "host": host() }));
    let passed = expect_request(language::resolve(req, &EdgeConfig::default()));
    assert_eq!(passed.uri, "/blog/post");

    let req = request("/en/", json!({ "host": host() }));
    let passed = expect_request(language::resolve(req, &EdgeConfig::default()));
    assert_eq!(passed.uri, "/");
    // Untouched fields survive the round trip
    assert_eq!(passed.extra.get("method"), Some(&json!("GET")));
}

#[test]
fn test_bare_language_gets_trailing_slash() {
    let req = request("/en", json!({ "host": host() }));
    let response = expect_redirect(language::resolve(req, &EdgeConfig::default()));
    assert_eq!(response.location(), Some("https://www.example.com/en/"));
    assert!(response.headers.get("set-cookie").is_none());
}

#[test]
fn test_unknown_language_prefix_is_replaced() {
    let mut req = request("/de/about", json!({ "host": host() }));
    req.querystring = "ref=newsletter".to_string();
    let response = expect_redirect(language::resolve(req, &EdgeConfig::default()));
    assert_eq!(
        response.location(),
        Some("https://www.example.com/en/about?ref=newsletter")
    );
}

#[test]
fn test_static_assets_pass_through() {
    for uri in [
        "/static/js/main.js",
        "/service-worker.js",
        "/manifest.json",
        "/precache-manifest.e95fc79a3620d8ee2a5587047d6949fd.js",
    ] {
        let req = request(uri, json!({ "host": host() }));
        let passed = expect_request(language::resolve(req, &EdgeConfig::default()));
        assert_eq!(passed.uri, uri);
    }
}

#[test]
fn test_path_normalizer() {
    let req = request("/about", json!({}));
    assert_eq!(path::normalize_request(req).uri, "/about.html");

    let req = request("/blog/", json!({}));
    assert_eq!(path::normalize_request(req).uri, "/blog/index.html");

    let req = request("/css/site.css", json!({}));
    assert_eq!(path::normalize_request(req).uri, "/css/site.css");
}

#[test]
fn test_redirect_serializes_as_cloudfront_response() {
    let req = request("/", json!({ "host": host() }));
    let outcome = language::resolve(req, &EdgeConfig::default());
    let value = serde_json::to_value(&outcome).unwrap();

    assert_eq!(value["status"], "302");
    assert_eq!(value["statusDescription"], "Found");
    assert_eq!(value["headers"]["location"][0]["key"], "location");
    assert_eq!(
        value["headers"]["location"][0]["value"],
        "https://www.example.com/en/"
    );
}
