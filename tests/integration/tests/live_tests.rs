//! Live WebSocket stream integration tests

use std::time::Duration;

use integration_tests::{connect_live, expect_silence, next_frame, TestServer};
use ovation_gateway::protocol::LiveFrame;

#[tokio::test]
async fn join_sends_snapshot_first() {
    let server = TestServer::start().await.unwrap();

    server.submit("r1", Some("Alice")).await.unwrap();
    server.submit("r1", Some("Alice")).await.unwrap();

    let mut socket = connect_live(&server, "r1").await.unwrap();
    match next_frame(&mut socket).await.unwrap() {
        LiveFrame::Snapshot { total, ranking, .. } => {
            assert_eq!(total, 2);
            assert_eq!(ranking[0].name, "Alice");
            assert_eq!(ranking[0].count, 2);
        }
        other => panic!("expected snapshot frame, got {other:?}"),
    }
}

#[tokio::test]
async fn updates_follow_in_order() {
    let server = TestServer::start().await.unwrap();

    let mut socket = connect_live(&server, "r2").await.unwrap();
    match next_frame(&mut socket).await.unwrap() {
        LiveFrame::Snapshot { total, .. } => assert_eq!(total, 0),
        other => panic!("expected snapshot frame, got {other:?}"),
    }

    server.submit("r2", Some("Alice")).await.unwrap();
    server.submit("r2", None).await.unwrap();

    match next_frame(&mut socket).await.unwrap() {
        LiveFrame::Update { total, ranking, .. } => {
            assert_eq!(total, 1);
            assert_eq!(ranking[0].name, "Alice");
        }
        other => panic!("expected update frame, got {other:?}"),
    }
    match next_frame(&mut socket).await.unwrap() {
        LiveFrame::Update { total, ranking, .. } => {
            assert_eq!(total, 2);
            // The unaddressed event changed the total but not the ranking
            assert_eq!(ranking.len(), 1);
        }
        other => panic!("expected update frame, got {other:?}"),
    }
}

#[tokio::test]
async fn late_joiner_sees_exactly_the_new_events() {
    let server = TestServer::start().await.unwrap();

    for _ in 0..5 {
        server.submit("r3", Some("Alice")).await.unwrap();
    }

    let mut socket = connect_live(&server, "r3").await.unwrap();
    match next_frame(&mut socket).await.unwrap() {
        LiveFrame::Snapshot { total, .. } => assert_eq!(total, 5),
        other => panic!("expected snapshot frame, got {other:?}"),
    }

    server.submit("r3", Some("Bob")).await.unwrap();
    server.submit("r3", Some("Bob")).await.unwrap();

    let mut last_total = 0;
    for _ in 0..2 {
        match next_frame(&mut socket).await.unwrap() {
            LiveFrame::Update { total, .. } => last_total = total,
            other => panic!("expected update frame, got {other:?}"),
        }
    }
    assert_eq!(last_total, 7);

    // Exactly two updates: nothing else arrives
    expect_silence(&mut socket, Duration::from_millis(200))
        .await
        .unwrap();
}

#[tokio::test]
async fn reconnect_replaces_state_without_double_counting() {
    let server = TestServer::start().await.unwrap();

    for _ in 0..4 {
        server.submit("r4", Some("Alice")).await.unwrap();
    }

    let mut socket = connect_live(&server, "r4").await.unwrap();
    match next_frame(&mut socket).await.unwrap() {
        LiveFrame::Snapshot { total, .. } => assert_eq!(total, 4),
        other => panic!("expected snapshot frame, got {other:?}"),
    }

    // Drop the connection before any delta arrives
    socket.close(None).await.unwrap();

    server.submit("r4", Some("Alice")).await.unwrap();
    server.submit("r4", Some("Bob")).await.unwrap();

    // The fresh join's snapshot is the old state plus exactly the interim
    // events - the old total is never counted twice
    let mut socket = connect_live(&server, "r4").await.unwrap();
    match next_frame(&mut socket).await.unwrap() {
        LiveFrame::Snapshot { total, ranking, .. } => {
            assert_eq!(total, 6);
            assert_eq!(ranking[0].name, "Alice");
            assert_eq!(ranking[0].count, 5);
            assert_eq!(ranking[1].name, "Bob");
            assert_eq!(ranking[1].count, 1);
        }
        other => panic!("expected snapshot frame, got {other:?}"),
    }
}

#[tokio::test]
async fn every_subscriber_receives_every_update() {
    let server = TestServer::start().await.unwrap();

    let mut first = connect_live(&server, "r5").await.unwrap();
    let mut second = connect_live(&server, "r5").await.unwrap();
    next_frame(&mut first).await.unwrap();
    next_frame(&mut second).await.unwrap();

    server.submit("r5", Some("Alice")).await.unwrap();

    for socket in [&mut first, &mut second] {
        match next_frame(socket).await.unwrap() {
            LiveFrame::Update { total, .. } => assert_eq!(total, 1),
            other => panic!("expected update frame, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn streams_are_scoped_to_their_room() {
    let server = TestServer::start().await.unwrap();

    let mut socket = connect_live(&server, "quiet-room").await.unwrap();
    next_frame(&mut socket).await.unwrap();

    // Activity in another room must not reach this stream
    server.submit("busy-room", Some("Alice")).await.unwrap();
    expect_silence(&mut socket, Duration::from_millis(200))
        .await
        .unwrap();
}
