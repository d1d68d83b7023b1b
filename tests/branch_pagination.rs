#![allow(clippy::unwrap_used, clippy::expect_used, missing_docs)]

mod common;

use gitea_api::PageParams;
use gitscope::fetch::Gateway;
use http::Method;
use serde_json::{Value, json};

use common::{MockHttpClient, Reply, branch_json};

/// A page of `count` branches named from `start` upwards.
fn branch_page(start: usize, count: usize) -> Value {
    let branches: Vec<Value> = (start..start + count)
        .map(|i| branch_json(&format!("branch-{i:03}"), &format!("{i:040}")))
        .collect();
    Value::Array(branches)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn branch_sets_spanning_pages_are_collected_fully() {
    let mock = MockHttpClient::new();
    mock.on_json("/repos/o/r/branches", branch_page(0, 50));
    mock.on_json(
        "/repos/o/r/branches",
        json!([branch_json("topic", "00000000000000000000000000000000000000ff")]),
    );
    let gateway = Gateway::new(mock.client());

    let branches = gateway.fetch_branches("o", "r").await.unwrap();

    assert_eq!(branches.len(), 51);
    assert_eq!(branches[0].name, "branch-000");
    assert_eq!(branches[50].name, "topic");

    let queries: Vec<String> = mock
        .served()
        .into_iter()
        .filter(|s| s.path == "/repos/o/r/branches")
        .map(|s| s.query)
        .collect();
    assert_eq!(
        queries,
        vec!["page=1&limit=50".to_owned(), "page=2&limit=50".to_owned()],
        "a full page means another page must be requested"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn a_short_first_page_ends_the_walk() {
    let mock = MockHttpClient::new();
    mock.on_json(
        "/repos/o/r/branches",
        json!([
            branch_json("main", "1111111111111111111111111111111111111111"),
            branch_json("dev", "2222222222222222222222222222222222222222"),
        ]),
    );
    let gateway = Gateway::new(mock.client());

    let branches = gateway.fetch_branches("o", "r").await.unwrap();

    assert_eq!(branches.len(), 2);
    assert!(branches[0].protected, "main is protected in the fixture");
    assert!(!branches[1].protected);
    assert_eq!(branches[1].commit.id, "2222222222222222222222222222222222222222");
    assert_eq!(
        mock.hits(Method::GET, "/repos/o/r/branches"),
        1,
        "a short page must not trigger another request"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn an_exactly_full_set_ends_on_the_empty_page() {
    let mock = MockHttpClient::new();
    mock.on_json("/repos/o/r/branches", branch_page(0, 50));
    mock.on_json("/repos/o/r/branches", json!([]));
    let gateway = Gateway::new(mock.client());

    let branches = gateway.fetch_branches("o", "r").await.unwrap();

    assert_eq!(branches.len(), 50);
    assert_eq!(mock.hits(Method::GET, "/repos/o/r/branches"), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn a_failure_mid_walk_fails_the_whole_fetch() {
    let mock = MockHttpClient::new();
    mock.on_json("/repos/o/r/branches", branch_page(0, 50));
    mock.on(Method::GET, "/repos/o/r/branches", Reply::Refused);
    let gateway = Gateway::new(mock.client());

    let error = gateway.fetch_branches("o", "r").await.unwrap_err();

    assert_eq!(error.code, 500);
    assert_eq!(error.message, "Failed to fetch repository branches");
    assert!(
        error
            .details
            .as_deref()
            .unwrap()
            .contains("connection failed"),
        "details must name the transport failure"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn explicit_page_params_reach_the_wire() {
    let mock = MockHttpClient::new();
    mock.on_json("/repos/o/r/branches", json!([]));
    let client = mock.client();

    client
        .branches("o", "r")
        .list(&PageParams {
            page: Some(2),
            limit: Some(10),
        })
        .await
        .unwrap();

    assert_eq!(
        mock.the_request("/repos/o/r/branches").query,
        "page=2&limit=10"
    );
}
