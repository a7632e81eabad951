#[path = "../common/mod.rs"]
mod common;

use common::{a, aaaa, query, udp_exchange, udp_exchange_raw, MockUpstream, ProxyHarness};
use hickory_proto::op::{MessageType, ResponseCode};
use hickory_proto::rr::RecordType;
use std::time::Duration;
use v4only_dns_domain::config::FilteringConfig;

#[tokio::test]
async fn test_filtered_domain_answer_has_no_aaaa() {
    let upstream = MockUpstream::start().await;
    upstream.answer(
        "netflix.com.",
        vec![aaaa("netflix.com.", "2001:db8::1"), a("netflix.com.", "198.51.100.7")],
    );
    let proxy = ProxyHarness::start(&upstream.addr().to_string()).await;

    let reply = udp_exchange(proxy.addr(), &query(0x4242, "netflix.com.", RecordType::AAAA)).await;

    assert_eq!(reply.id(), 0x4242);
    assert_eq!(reply.message_type(), MessageType::Response);
    assert_eq!(reply.response_code(), ResponseCode::NoError);
    assert!(reply.recursion_available());
    assert_eq!(reply.answers().len(), 1);
    assert_eq!(reply.answers()[0].record_type(), RecordType::A);

    proxy.shutdown().await;
}

#[tokio::test]
async fn test_filtered_subdomain_strips_additional_section() {
    let upstream = MockUpstream::start().await;
    upstream.answer("www.nflxvideo.com.", vec![a("www.nflxvideo.com.", "198.51.100.8")]);
    upstream.additional(
        "www.nflxvideo.com.",
        vec![
            aaaa("ns.nflxvideo.com.", "2001:db8::53"),
            a("ns.nflxvideo.com.", "198.51.100.53"),
        ],
    );
    let proxy = ProxyHarness::start(&upstream.addr().to_string()).await;

    let reply = udp_exchange(proxy.addr(), &query(7, "WWW.NflxVideo.com.", RecordType::A)).await;

    let types: Vec<RecordType> = reply
        .additionals()
        .iter()
        .map(|r| r.record_type())
        .collect();
    assert_eq!(types, vec![RecordType::A]);
    assert_eq!(reply.answers().len(), 1);

    proxy.shutdown().await;
}

#[tokio::test]
async fn test_other_domains_pass_through_unmodified() {
    let upstream = MockUpstream::start().await;
    upstream.answer(
        "example.com.",
        vec![a("example.com.", "93.184.216.34"), aaaa("example.com.", "2606:2800:220:1::1")],
    );
    let proxy = ProxyHarness::start(&upstream.addr().to_string()).await;

    let reply = udp_exchange(proxy.addr(), &query(0x0101, "example.com.", RecordType::ANY)).await;

    assert_eq!(reply.id(), 0x0101);
    assert!(reply.recursion_available());
    let types: Vec<RecordType> = reply.answers().iter().map(|r| r.record_type()).collect();
    assert_eq!(types, vec![RecordType::A, RecordType::AAAA]);

    proxy.shutdown().await;
}

#[tokio::test]
async fn test_lookalike_domain_is_not_filtered() {
    let upstream = MockUpstream::start().await;
    upstream.answer("notnetflix.com.", vec![aaaa("notnetflix.com.", "2001:db8::7")]);
    let proxy = ProxyHarness::start(&upstream.addr().to_string()).await;

    let reply = udp_exchange(proxy.addr(), &query(1, "notnetflix.com.", RecordType::AAAA)).await;

    assert_eq!(reply.answers().len(), 1);
    assert_eq!(reply.answers()[0].record_type(), RecordType::AAAA);

    proxy.shutdown().await;
}

#[tokio::test]
async fn test_upstream_nxdomain_is_relayed() {
    let upstream = MockUpstream::start().await;
    let proxy = ProxyHarness::start(&upstream.addr().to_string()).await;

    let reply = udp_exchange(proxy.addr(), &query(2, "missing.example.", RecordType::A)).await;

    assert_eq!(reply.response_code(), ResponseCode::NXDomain);
    assert!(reply.answers().is_empty());

    proxy.shutdown().await;
}

#[tokio::test]
async fn test_unreachable_upstream_yields_servfail_on_both_paths() {
    // Nothing answers on this port once the socket is gone.
    let dead = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
    let dead_addr = dead.local_addr().unwrap();
    drop(dead);

    let proxy = ProxyHarness::start_with(
        &dead_addr.to_string(),
        FilteringConfig::default(),
        Duration::from_millis(150),
    )
    .await;

    for (id, name) in [(10u16, "netflix.com."), (20u16, "example.com.")] {
        let reply = udp_exchange(proxy.addr(), &query(id, name, RecordType::A)).await;
        assert_eq!(reply.id(), id);
        assert_eq!(reply.response_code(), ResponseCode::ServFail);
        assert!(reply.answers().is_empty());
        assert!(reply.additionals().is_empty());
    }

    proxy.shutdown().await;
}

#[tokio::test]
async fn test_custom_filtered_domain_list() {
    let upstream = MockUpstream::start().await;
    upstream.answer(
        "video.example.",
        vec![aaaa("video.example.", "2001:db8::1"), a("video.example.", "192.0.2.1")],
    );
    upstream.answer("netflix.com.", vec![aaaa("netflix.com.", "2001:db8::2")]);

    let filtering = FilteringConfig {
        domains: vec!["video.example.".to_string()],
    };
    let proxy = ProxyHarness::start_with(
        &upstream.addr().to_string(),
        filtering,
        Duration::from_millis(500),
    )
    .await;

    let filtered = udp_exchange(proxy.addr(), &query(1, "video.example.", RecordType::AAAA)).await;
    assert_eq!(filtered.answers().len(), 1);
    assert_eq!(filtered.answers()[0].record_type(), RecordType::A);

    let passed = udp_exchange(proxy.addr(), &query(2, "netflix.com.", RecordType::AAAA)).await;
    assert_eq!(passed.answers().len(), 1);
    assert_eq!(passed.answers()[0].record_type(), RecordType::AAAA);

    proxy.shutdown().await;
}

#[tokio::test]
async fn test_query_without_question_gets_formerr() {
    let upstream = MockUpstream::start().await;
    let proxy = ProxyHarness::start(&upstream.addr().to_string()).await;

    // Header only: id 0x3333, RD, QDCOUNT 0.
    let bare = [0x33, 0x33, 0x01, 0x00, 0, 0, 0, 0, 0, 0, 0, 0];
    let reply = udp_exchange_raw(proxy.addr(), &bare).await;

    assert_eq!(reply.id(), 0x3333);
    assert_eq!(reply.response_code(), ResponseCode::FormErr);
    assert!(upstream.seen().is_empty(), "malformed queries never reach upstream");

    proxy.shutdown().await;
}
