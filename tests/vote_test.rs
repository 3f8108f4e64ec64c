mod common;

use futures_util::future::join_all;
use serde_json::Value;

#[tokio::test]
async fn vote_form_toggles_and_redirects() {
    let app = common::spawn_app().await;
    let id = app.seed("Toggle", 1);

    let resp = app
        .raw_client
        .post(app.url("/"))
        .header("x-forwarded-for", "203.0.113.5")
        .form(&[("portfolioId", id.to_string()), ("sort", "latest".to_string())])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers()["location"], "/?sort=latest");

    let votes = app.repo.votes();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].ip, "203.0.113.5");
    assert_eq!(votes[0].portfolio_id, id);

    // Second submit from the same voter removes the vote.
    let resp = app
        .raw_client
        .post(app.url("/"))
        .header("x-forwarded-for", "203.0.113.5")
        .form(&[("portfolioId", id.to_string())])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers()["location"], "/?sort=top");
    assert!(app.repo.votes().is_empty());
}

#[tokio::test]
async fn peer_address_is_used_without_proxy_headers() {
    let app = common::spawn_app().await;
    let id = app.seed("Direct", 1);

    let resp = app
        .client
        .post(app.api(&format!("/portfolios/{}/vote", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["voted"], true);
    assert_eq!(app.repo.votes()[0].ip, "127.0.0.1");
}

#[tokio::test]
async fn api_toggle_reports_state() {
    let app = common::spawn_app().await;
    let id = app.seed("Api", 1);
    let url = app.api(&format!("/portfolios/{}/vote", id));

    let first: Value = app
        .client
        .post(&url)
        .header("x-real-ip", "198.51.100.4")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["data"]["voted"], true);
    assert_eq!(first["data"]["portfolio_id"], id.to_string());

    let second: Value = app
        .client
        .post(&url)
        .header("x-real-ip", "198.51.100.4")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["data"]["voted"], false);
    assert!(app.repo.votes().is_empty());
}

#[tokio::test]
async fn malformed_portfolio_id_is_rejected() {
    let app = common::spawn_app().await;

    let resp = app
        .raw_client
        .post(app.url("/"))
        .form(&[("portfolioId", "not-a-uuid")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Invalid portfolio id");
}

#[tokio::test]
async fn voting_for_missing_portfolio_is_not_found() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .post(app.api(&format!("/portfolios/{}/vote", uuid::Uuid::new_v4())))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    assert!(app.repo.votes().is_empty());
}

#[tokio::test]
async fn concurrent_votes_from_one_voter_never_duplicate() {
    let app = common::spawn_app().await;
    let id = app.seed("Race", 1);
    let url = app.api(&format!("/portfolios/{}/vote", id));

    let requests = (0..9).map(|_| {
        app.client
            .post(&url)
            .header("x-forwarded-for", "203.0.113.77")
            .send()
    });
    for resp in join_all(requests).await {
        assert_eq!(resp.unwrap().status(), 200);
    }

    // An odd number of flips ends voted, with exactly one row.
    let rows = app
        .repo
        .votes()
        .into_iter()
        .filter(|v| v.ip == "203.0.113.77")
        .count();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn vote_form_without_portfolio_id_returns_json_error() {
    let app = common::spawn_app().await;
    app.seed("Untouched", 1);

    let resp = app
        .raw_client
        .post(app.url("/"))
        .form(&[("sort", "top")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Missing portfolio id");
    assert!(app.repo.votes().is_empty());
}
