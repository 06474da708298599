mod common;

use common::{FakeLinkLabApi, FakeReply, Hit, channel_listener, drain};
use linklab::prelude::*;
use serde_json::json;

#[tokio::test]
async fn test_service_link_resolves_with_merged_parameters() {
    let server = FakeLinkLabApi::start().await;
    server.reply(
        "abcd1234",
        FakeReply::Json(json!({
            "id": "abcd1234",
            "fullLink": "https://shop.com/p?a=1",
            "userId": "user-1",
            "packageName": "com.shop.app",
            "domainType": "linklab",
            "domain": "linklab.cc",
            "parameters": { "b": "2" }
        })),
    );
    let (listener, mut rx) = channel_listener();
    let linklab = LinkLab::builder(server.config())
        .listener(listener)
        .build()
        .unwrap();

    assert!(linklab.classify_and_dispatch(Some("https://linklab.cc/abcd1234")));
    let results = drain(&linklab, &mut rx).await;

    assert_eq!(results.len(), 1);
    let link = results[0].link().unwrap();
    assert_eq!(link.id(), Some("abcd1234"));
    assert_eq!(link.full_link(), "https://shop.com/p?a=1");
    assert_eq!(link.package_name(), Some("com.shop.app"));
    assert_eq!(link.domain_type(), DomainType::LinkLab);
    let params = link.parameters().unwrap();
    assert_eq!(params.len(), 2);
    assert_eq!(params["a"], "1");
    assert_eq!(params["b"], "2");
    assert_eq!(
        server.hits(),
        vec![Hit {
            link_id: "abcd1234".to_string(),
            domain: Some("linklab.cc".to_string()),
        }]
    );
}

#[tokio::test]
async fn test_transport_failure_falls_back_to_unrecognized() {
    let (listener, mut rx) = channel_listener();
    let linklab = LinkLab::builder(common::unreachable_config())
        .listener(listener)
        .build()
        .unwrap();

    assert!(linklab.classify_and_dispatch(Some("https://linklab.cc/abcd1234")));
    let results = drain(&linklab, &mut rx).await;

    assert_eq!(results.len(), 1);
    let link = results[0].link().unwrap();
    assert!(link.is_unrecognized());
    assert_eq!(link.id(), None);
    assert_eq!(link.full_link(), "https://linklab.cc/abcd1234");
    assert_eq!(link.domain_type(), DomainType::Unrecognized);
}

#[tokio::test]
async fn test_server_error_and_bad_payload_fall_back() {
    let server = FakeLinkLabApi::start().await;
    server.reply("broken", FakeReply::Status(500));
    server.reply("garbled", FakeReply::Raw("<html>maintenance</html>".to_string()));
    server.reply("blank", FakeReply::Empty);
    server.reply("partial", FakeReply::Json(json!({ "id": "partial" })));
    let linklab = LinkLab::builder(server.config()).build().unwrap();

    for id in ["broken", "garbled", "blank", "partial", "unknown"] {
        let uri = format!("https://linklab.cc/{id}?ref=mail");
        let result = linklab.resolve(&uri).wait().await.unwrap();
        let link = result.link().unwrap();
        assert!(link.is_unrecognized(), "{id} should fall back");
        assert_eq!(link.full_link(), uri);
        assert_eq!(link.parameters().unwrap()["ref"], "mail");
    }
    assert_eq!(server.hits().len(), 5);
}

#[tokio::test]
async fn test_foreign_link_delivered_without_lookup() {
    let server = FakeLinkLabApi::start().await;
    let (listener, mut rx) = channel_listener();
    let linklab = LinkLab::builder(server.config())
        .listener(listener)
        .build()
        .unwrap();

    assert!(linklab.classify_and_dispatch(Some("https://other.com/page?utm=x")));
    let results = drain(&linklab, &mut rx).await;

    assert_eq!(results.len(), 1);
    let link = results[0].link().unwrap();
    assert!(link.is_unrecognized());
    assert_eq!(link.full_link(), "https://other.com/page?utm=x");
    assert_eq!(link.parameters().unwrap()["utm"], "x");
    assert!(server.hits().is_empty());
}

#[tokio::test]
async fn test_foreign_link_is_never_deduplicated() {
    let (listener, mut rx) = channel_listener();
    let linklab = LinkLab::builder(common::unreachable_config())
        .listener(listener)
        .build()
        .unwrap();

    linklab.classify_and_dispatch(Some("https://other.com/page"));
    linklab.classify_and_dispatch(Some("https://other.com/page"));
    let results = drain(&linklab, &mut rx).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0], results[1]);
}

#[tokio::test]
async fn test_service_link_without_id_skips_lookup() {
    let server = FakeLinkLabApi::start().await;
    let (listener, mut rx) = channel_listener();
    let linklab = LinkLab::builder(server.config())
        .listener(listener)
        .build()
        .unwrap();

    assert!(linklab.classify_and_dispatch(Some("https://linklab.cc")));
    assert!(linklab.classify_and_dispatch(Some("https://linklab.cc/?utm=x")));
    let results = drain(&linklab, &mut rx).await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.link().unwrap().is_unrecognized()));
    assert_eq!(results[1].link().unwrap().full_link(), "https://linklab.cc/?utm=x");
    assert!(server.hits().is_empty());
}

#[tokio::test]
async fn test_absent_uri_is_not_handled() {
    let (listener, mut rx) = channel_listener();
    let linklab = LinkLab::builder(common::unreachable_config())
        .listener(listener)
        .build()
        .unwrap();

    assert!(!linklab.classify_and_dispatch(None));
    assert!(drain(&linklab, &mut rx).await.is_empty());
}

#[tokio::test]
async fn test_custom_domain_and_subdomain_are_looked_up() {
    let server = FakeLinkLabApi::start().await;
    server.link("promo", "https://shop.com/promo");
    server.link("sale", "https://shop.com/sale");
    let config = server.config().with_custom_domains(["go.example.com"]);
    let (listener, mut rx) = channel_listener();
    let linklab = LinkLab::builder(config).listener(listener).build().unwrap();

    assert!(linklab.classify_and_dispatch(Some("https://go.example.com/promo")));
    assert!(linklab.classify_and_dispatch(Some("https://eu.linklab.cc/sale")));
    let results = drain(&linklab, &mut rx).await;

    let links: Vec<_> = results
        .iter()
        .map(|r| r.link().unwrap().full_link().to_string())
        .collect();
    assert_eq!(links, vec!["https://shop.com/promo", "https://shop.com/sale"]);
    assert_eq!(
        server.hits(),
        vec![
            Hit {
                link_id: "promo".to_string(),
                domain: Some("go.example.com".to_string()),
            },
            Hit {
                link_id: "sale".to_string(),
                domain: Some("eu.linklab.cc".to_string()),
            },
        ]
    );
}

#[tokio::test]
async fn test_escaped_link_id_encoded_once_on_the_wire() {
    let server = FakeLinkLabApi::start().await;
    server.link("café", "https://shop.com/cafe");
    let linklab = LinkLab::builder(server.config()).build().unwrap();

    let result = linklab
        .resolve("https://linklab.cc/caf%C3%A9")
        .wait()
        .await
        .unwrap();

    assert_eq!(result.link().unwrap().full_link(), "https://shop.com/cafe");
    assert_eq!(server.wire()[0].path, "/api/links/caf%C3%A9");
    assert_eq!(server.hits()[0].link_id, "café");
}

#[tokio::test]
async fn test_uppercase_service_host_is_not_folded() {
    let server = FakeLinkLabApi::start().await;
    let config = server.config().with_custom_domains(["Links.Shop.com"]);
    let (listener, mut rx) = channel_listener();
    let linklab = LinkLab::builder(config).listener(listener).build().unwrap();

    linklab.classify_and_dispatch(Some("https://LINKLAB.CC/abcd1234"));
    linklab.classify_and_dispatch(Some("https://Links.Shop.com/promo"));
    let results = drain(&linklab, &mut rx).await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.link().unwrap().is_unrecognized()));
    assert_eq!(
        server.hits(),
        vec![Hit {
            link_id: "promo".to_string(),
            domain: Some("links.shop.com".to_string()),
        }]
    );
}

#[tokio::test]
async fn test_same_link_resolved_once_per_session() {
    let server = FakeLinkLabApi::start().await;
    server.link("abcd1234", "https://shop.com/item");
    let (listener, mut rx) = channel_listener();
    let linklab = LinkLab::builder(server.config())
        .listener(listener)
        .build()
        .unwrap();

    linklab.classify_and_dispatch(Some("https://linklab.cc/abcd1234"));
    linklab.classify_and_dispatch(Some("https://linklab.cc/abcd1234?again=1"));
    let results = drain(&linklab, &mut rx).await;

    assert_eq!(results.len(), 1);
    assert_eq!(server.hits().len(), 1);
}

#[tokio::test]
async fn test_results_follow_request_order() {
    let server = FakeLinkLabApi::start().await;
    server.link("first", "https://shop.com/1");
    let (listener, mut rx) = channel_listener();
    let linklab = LinkLab::builder(server.config())
        .listener(listener)
        .build()
        .unwrap();

    linklab.classify_and_dispatch(Some("https://linklab.cc/first"));
    linklab.classify_and_dispatch(Some("https://other.com/second"));
    let results = drain(&linklab, &mut rx).await;

    let links: Vec<_> = results
        .iter()
        .map(|r| r.link().unwrap().full_link().to_string())
        .collect();
    assert_eq!(links, vec!["https://shop.com/1", "https://other.com/second"]);
}

#[tokio::test]
async fn test_removed_listener_not_notified() {
    let (kept, mut kept_rx) = channel_listener();
    let (removed, mut removed_rx) = channel_listener();
    let linklab = LinkLab::builder(common::unreachable_config())
        .listener(kept)
        .build()
        .unwrap();
    assert!(linklab.add_listener(removed.clone()));
    assert!(!linklab.add_listener(removed.clone()));
    assert!(linklab.remove_listener(&removed));
    assert!(!linklab.remove_listener(&removed));

    linklab.classify_and_dispatch(Some("https://other.com/page"));
    let results = drain(&linklab, &mut kept_rx).await;

    assert_eq!(results.len(), 1);
    assert!(removed_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_resolve_rejects_caller_misuse() {
    let linklab = LinkLab::builder(common::unreachable_config()).build().unwrap();

    for uri in ["", "   ", "not a uri"] {
        let result = linklab.resolve(uri).wait().await.unwrap();
        assert!(matches!(
            result.error(),
            Some(LinkLabError::InvalidArgument { .. })
        ));
    }
}
