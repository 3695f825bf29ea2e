//! Integration tests against a fake hub.
//!
//! These tests run the default `reqwest` transport against a mockito server
//! and check the exact wire format of outbound requests.

use hub_client::{HubClient, HubError, Mode, SubscriptionItem, TransportConfig};
use mockito::Matcher;
use std::time::Duration;
use tokio::sync::oneshot;
use url::Url;

fn client() -> HubClient {
    HubClient::new(
        Url::parse("http://sub.example/cb").unwrap(),
        &TransportConfig::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_subscribe_wire_format() {
    let mut hub = mockito::Server::new_async().await;
    let mock = hub
        .mock("POST", "/hub")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::Exact(
            "hub.callback=http%3A%2F%2Fsub.example%2Fcb%3Fid%3D1\
             &hub.mode=subscribe\
             &hub.topic=http%3A%2F%2Fblog.example%2Ffeed\
             &hub.lease_seconds=86400"
                .to_string(),
        ))
        .with_status(202)
        .create_async()
        .await;

    let item = SubscriptionItem::new("1", format!("{}/hub", hub.url()), "http://blog.example/feed");
    let item = client().subscribe(item).await.expect("Hub should accept the request");

    assert_eq!(item.lease_seconds, Some(86_400));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_status_still_counts_as_delivered() {
    let mut hub = mockito::Server::new_async().await;
    let mock = hub
        .mock("POST", "/hub")
        .match_body(Matcher::UrlEncoded("hub.mode".into(), "unsubscribe".into()))
        .with_status(404)
        .create_async()
        .await;

    let item = SubscriptionItem::new("2", format!("{}/hub", hub.url()), "http://blog.example/feed");
    assert!(client().unsubscribe(item).await.is_ok());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_same_item_twice_sends_two_requests() {
    let mut hub = mockito::Server::new_async().await;
    let mock = hub
        .mock("POST", "/hub")
        .match_body(Matcher::UrlEncoded("hub.callback".into(), "http://sub.example/cb?id=3".into()))
        .with_status(202)
        .expect(2)
        .create_async()
        .await;

    let item = SubscriptionItem::new("3", format!("{}/hub", hub.url()), "http://blog.example/feed");
    let client = client();
    client.subscribe(item.clone()).await.unwrap();
    client.subscribe(item).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_connection_refused_reports_transport_error() {
    // Bind then drop a listener so the port is very likely closed.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let item = SubscriptionItem::new("4", format!("http://127.0.0.1:{port}/hub"), "http://blog.example/feed");

    let (tx, rx) = oneshot::channel();
    client().send_subscription_request(Some(item), Mode::Subscribe, move |error, item| {
        let _ = tx.send((error, item));
    });

    let (error, item) = tokio::time::timeout(Duration::from_secs(10), rx)
        .await
        .expect("Timeout waiting for completion")
        .unwrap();

    assert!(matches!(error, Some(HubError::Transport { ref id, .. }) if id == "4"));
    assert_eq!(item.unwrap().id(), Some("4"));
}
