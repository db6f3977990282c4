//! Discovery 服务测试

use std::time::Duration;

use flare_discovery::discovery::{
    DISCOVERY_ADDRESS, DiscoveryClient, DiscoveryService, DiscoveryStorage, ErrorReason,
    MemoryStorage, Metadata, Reply, ReplyKind, Request, ServiceInfo,
};
use flare_discovery::error::ErrorCode;
use flare_discovery::routing::{Address, Context, Envelope, Mailbox, Route};
use flare_discovery::runtime::{Node, Worker};

fn echo_metadata() -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("kind".to_string(), b"echo".to_vec());
    metadata
}

fn envelope(return_route: Route, payload: Vec<u8>) -> Envelope {
    Envelope::new(DISCOVERY_ADDRESS, return_route, payload)
}

#[tokio::test]
async fn test_register_then_get() {
    let mut service = DiscoveryService::new(MemoryStorage::new());
    let route: Route = ["n1", "echo"].into_iter().collect();

    let register = Request::register("worker-1", echo_metadata());
    let reply = service
        .handle_envelope(&envelope(route.clone(), register.encode()))
        .await
        .unwrap();
    assert_eq!(Reply::decode(ReplyKind::Register, &reply).unwrap(), Reply::Empty);

    let reply = service
        .handle_envelope(&envelope(Route::from("client"), Request::get("worker-1").encode()))
        .await
        .unwrap();
    let expected = ServiceInfo {
        id: "worker-1".to_string(),
        route,
        metadata: echo_metadata(),
    };
    assert_eq!(
        Reply::decode(ReplyKind::Get, &reply).unwrap(),
        Reply::Ok(expected.clone())
    );

    let reply = service
        .handle_envelope(&envelope(Route::from("client"), Request::List.encode()))
        .await
        .unwrap();
    assert_eq!(
        Reply::decode(ReplyKind::List, &reply).unwrap(),
        Reply::List(vec![expected])
    );
}

#[tokio::test]
async fn test_get_unknown_service() {
    let mut service = DiscoveryService::new(MemoryStorage::new());
    let reply = service
        .execute(Request::get("nope"), &Route::from("client"))
        .await;
    assert_eq!(reply, Some(Reply::Error(ErrorReason::NotFound)));
}

#[tokio::test]
async fn test_empty_directory_list() {
    let mut service = DiscoveryService::new(MemoryStorage::new());
    let reply = service
        .handle_envelope(&envelope(Route::from("client"), Request::List.encode()))
        .await
        .unwrap();
    assert_eq!(reply, vec![0x00, 0x00]);
}

#[tokio::test]
async fn test_malformed_requests_are_dropped() {
    let mut service = DiscoveryService::new(MemoryStorage::new());
    let payloads: [&[u8]; 5] = [
        &[],
        &[0x01, 0x00],
        &[0x00, 0x09],
        &[0x00, 0x02, 0x05, b'w'],
        &[0x00, 0x02, 0x01, b'w', 0x00, 0xaa],
    ];
    for payload in payloads {
        let reply = service
            .handle_envelope(&envelope(Route::from("client"), payload.to_vec()))
            .await;
        assert!(reply.is_none(), "payload {:?} should be dropped", payload);
    }
    assert!(service.storage_mut().list().await.is_empty());
}

#[tokio::test]
async fn test_register_without_return_route_is_dropped() {
    let mut service = DiscoveryService::new(MemoryStorage::new());
    let reply = service
        .execute(Request::register("ghost", Metadata::new()), &Route::new())
        .await;
    assert!(reply.is_none());
    assert!(service.storage().is_empty());
}

#[tokio::test]
async fn test_reregister_overwrites() {
    let mut service = DiscoveryService::new(MemoryStorage::new());
    service
        .execute(Request::register("svc", echo_metadata()), &Route::from("a"))
        .await;
    service
        .execute(Request::register("svc", Metadata::new()), &Route::from("b"))
        .await;

    let reply = service.execute(Request::get("svc"), &Route::from("client")).await;
    assert_eq!(reply, Some(Reply::Ok(ServiceInfo::new("svc", "b"))));
}

#[tokio::test]
async fn test_client_end_to_end() {
    let node = Node::default();
    node.start_worker(DISCOVERY_ADDRESS, DiscoveryService::new(MemoryStorage::new()))
        .await
        .unwrap();

    let mailbox = node.new_mailbox().await.unwrap();
    let own_address = mailbox.address().clone();
    let mut client =
        DiscoveryClient::new(mailbox, DISCOVERY_ADDRESS).with_timeout(Duration::from_secs(2));

    client.register("worker-1", echo_metadata()).await.unwrap();

    let info = client.get("worker-1").await.unwrap();
    assert_eq!(info.route, Route::from(own_address));
    assert_eq!(info.metadata, echo_metadata());

    let services = client.list().await.unwrap();
    assert_eq!(services, vec![info]);

    let err = client.get("nope").await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::ServiceNotFound));
    assert_eq!(err.param("id"), Some("nope"));

    client.close().await;
    node.shutdown().await;
}

#[tokio::test]
async fn test_malformed_request_gets_no_reply() {
    let node = Node::default();
    node.start_worker(DISCOVERY_ADDRESS, DiscoveryService::new(MemoryStorage::new()))
        .await
        .unwrap();

    let mut mailbox = node.new_mailbox().await.unwrap();
    mailbox
        .send(DISCOVERY_ADDRESS, vec![0x07, 0x00])
        .await
        .unwrap();

    let err = mailbox
        .receive_timeout(Duration::from_millis(200))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::OperationTimeout));

    // 服务仍然可用
    let mut client = DiscoveryClient::new(mailbox, DISCOVERY_ADDRESS);
    assert!(client.list().await.unwrap().is_empty());

    node.shutdown().await;
}

#[tokio::test]
async fn test_discovery_address_is_exclusive() {
    let node = Node::default();
    node.start_worker(DISCOVERY_ADDRESS, DiscoveryService::new(MemoryStorage::new()))
        .await
        .unwrap();

    let err = node
        .start_worker(DISCOVERY_ADDRESS, DiscoveryService::new(MemoryStorage::new()))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::AddressInUse));

    node.shutdown().await;
}

/// 邮箱里残留的旧回复不会被后续查询当作自己的回复
#[tokio::test]
async fn test_stale_reply_does_not_answer_next_get() {
    let node = Node::default();
    node.start_worker(DISCOVERY_ADDRESS, DiscoveryService::new(MemoryStorage::new()))
        .await
        .unwrap();

    let mailbox = node.new_mailbox().await.unwrap();
    let own_address = mailbox.address().clone();
    let mut client = DiscoveryClient::new(mailbox, DISCOVERY_ADDRESS);

    // 一条空列表回复迟到了
    node.router()
        .send(Envelope::new(own_address.clone(), DISCOVERY_ADDRESS, vec![0x00, 0x00]))
        .await
        .unwrap();

    let err = client.get("x").await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::ServiceNotFound));

    node.router()
        .send(Envelope::new(own_address, DISCOVERY_ADDRESS, vec![0x00, 0x00]))
        .await
        .unwrap();
    client.register("worker-1", echo_metadata()).await.unwrap();
    let info = client.get("worker-1").await.unwrap();
    assert_eq!(info.metadata, echo_metadata());

    client.close().await;
    node.shutdown().await;
}

/// register 超时后迟到的成功回复不会掩盖下一次注册的失败
#[tokio::test]
async fn test_late_register_reply_is_discarded() {
    let node = Node::default();
    let mut relay = Mailbox::create(node.router(), Address::from("relay"))
        .await
        .unwrap();
    let mut client = DiscoveryClient::new(node.new_mailbox().await.unwrap(), "relay")
        .with_timeout(Duration::from_millis(100));

    let err = client.register("a", Metadata::new()).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::OperationTimeout));

    let first = relay.receive().await.unwrap();
    relay
        .context()
        .forward(first.reply(relay.address().clone(), Reply::Empty.encode()))
        .await
        .unwrap();

    let answer = async {
        let second = relay.receive().await.unwrap();
        let failure = Reply::Error(ErrorReason::Storage("disk full".to_string()));
        relay
            .context()
            .forward(second.reply(relay.address().clone(), failure.encode()))
            .await
            .unwrap();
    };
    let (result, _) = tokio::join!(client.register("b", Metadata::new()), answer);
    let err = result.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::RegistrationFailed));

    client.close().await;
    relay.close().await;
}

/// get 超时后迟到的回复不会影响下一次查询
#[tokio::test]
async fn test_late_get_reply_is_ignored() {
    let node = Node::default();
    let mut relay = Mailbox::create(node.router(), Address::from("relay"))
        .await
        .unwrap();
    let mut client = DiscoveryClient::new(node.new_mailbox().await.unwrap(), "relay")
        .with_timeout(Duration::from_millis(100));

    let err = client.get("a").await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::OperationTimeout));

    // 一次性邮箱已经注销，迟到的回复无处投递
    let first = relay.receive().await.unwrap();
    let late = Reply::Ok(ServiceInfo::new("a", "somewhere"));
    let err = relay
        .context()
        .forward(first.reply(relay.address().clone(), late.encode()))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::AddressNotFound));

    let answer = async {
        let second = relay.receive().await.unwrap();
        relay
            .context()
            .forward(second.reply(
                relay.address().clone(),
                Reply::Error(ErrorReason::NotFound).encode(),
            ))
            .await
            .unwrap();
    };
    let (result, _) = tokio::join!(client.get("b"), answer);
    assert_eq!(result.unwrap_err().code(), Some(ErrorCode::ServiceNotFound));

    client.close().await;
    relay.close().await;
}

/// Discovery 服务注册自己时不给自己发回复
#[tokio::test]
async fn test_self_registration_sends_no_reply() {
    let node = Node::default();
    let mut inbox = Mailbox::create(node.router(), Address::from(DISCOVERY_ADDRESS))
        .await
        .unwrap();
    let ctx = Context::new(Address::from(DISCOVERY_ADDRESS), node.router().clone());
    let mut service = DiscoveryService::new(MemoryStorage::new());

    let request = Request::register(DISCOVERY_ADDRESS, Metadata::new()).encode();
    service
        .handle_message(&ctx, Envelope::new(DISCOVERY_ADDRESS, DISCOVERY_ADDRESS, request))
        .await
        .unwrap();

    assert!(inbox.try_receive().is_none());
    let info = service.storage_mut().get(DISCOVERY_ADDRESS).await.unwrap();
    assert_eq!(info.route, Route::from(DISCOVERY_ADDRESS));

    inbox.close().await;
}
