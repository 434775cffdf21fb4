//! Order Placement Tests
//!
//! The adapter only checks shape locally; everything else is the backend's
//! call and its failures surface verbatim.

mod common;

use rust_decimal_macros::dec;
use std::sync::Arc;

use arena_broker_rs::error::BrokerError;
use arena_broker_rs::host::BrokerEvent;
use arena_broker_rs::model::{OrderType, PreOrder, Side};

use common::{FakeRemote, RecordingHost, RemoteCall, broker_with, instrument};

fn limit_order() -> PreOrder {
    PreOrder {
        symbol: "EURUSD".to_string(),
        order_type: OrderType::Limit,
        side: Side::Buy,
        qty: dec!(2),
        limit_price: Some(dec!(1.0850)),
        stop_price: None,
        stop_loss: Some(dec!(1.0800)),
        take_profit: Some(dec!(1.0950)),
        leverage: None,
        is_close: false,
    }
}

/// Happy path: the ticket carries the resolved instrument, the requested
/// price, the brackets, and the instrument's default leverage.
#[tokio::test]
async fn place_order_builds_ticket_from_pre_order() {
    let remote = Arc::new(FakeRemote::default().with_instrument(instrument("inst-1", "EURUSD")));
    let host = Arc::new(RecordingHost::default());
    let broker = broker_with(remote.clone(), host.clone(), Some(common::COMPETITION_ID));

    let order_id = broker
        .place_order(limit_order())
        .await
        .expect("order should be accepted");
    assert_eq!(order_id, "order-1");

    let calls = remote.calls();
    assert_eq!(calls[0], RemoteCall::GetInstrument("EURUSD".to_string()));
    match &calls[1] {
        RemoteCall::PlaceOrder(ticket) => {
            assert_eq!(ticket.competition_id, common::COMPETITION_ID);
            assert_eq!(ticket.instrument_id, "inst-1");
            assert_eq!(ticket.side, Side::Buy);
            assert_eq!(ticket.quantity, dec!(2));
            assert_eq!(ticket.leverage, 10);
            assert_eq!(ticket.order_type, OrderType::Limit);
            assert_eq!(ticket.requested_price, Some(dec!(1.0850)));
            assert_eq!(ticket.stop_loss, Some(dec!(1.0800)));
            assert_eq!(ticket.take_profit, Some(dec!(1.0950)));
            assert!(ticket.create_new_position);
        }
        other => panic!("unexpected remote call: {:?}", other),
    }

    assert_eq!(host.refresh_count(), 1);
    assert_eq!(
        host.events(),
        vec![BrokerEvent::OrderPlaced {
            order_id: "order-1".to_string()
        }]
    );
}

/// The instrument lookup is cached: a second order for the same symbol does
/// not hit the read path again.
#[tokio::test]
async fn instrument_lookup_is_cached_per_symbol() {
    let remote = Arc::new(FakeRemote::default().with_instrument(instrument("inst-1", "EURUSD")));
    let host = Arc::new(RecordingHost::default());
    let broker = broker_with(remote.clone(), host.clone(), Some(common::COMPETITION_ID));

    broker.place_order(limit_order()).await.expect("first order");
    broker.place_order(limit_order()).await.expect("second order");

    let lookups = remote
        .calls()
        .iter()
        .filter(|c| matches!(c, RemoteCall::GetInstrument(_)))
        .count();
    assert_eq!(lookups, 1);
}

/// Unknown symbol: the read path's NotFound surfaces unchanged and nothing
/// is submitted.
#[tokio::test]
async fn unknown_instrument_fails_before_submission() {
    let remote = Arc::new(FakeRemote::default());
    let host = Arc::new(RecordingHost::default());
    let broker = broker_with(remote.clone(), host.clone(), Some(common::COMPETITION_ID));

    let err = broker.place_order(limit_order()).await.unwrap_err();
    assert!(matches!(err, BrokerError::NotFound(_)));
    assert!(
        !remote
            .calls()
            .iter()
            .any(|c| matches!(c, RemoteCall::PlaceOrder(_)))
    );
}

/// Backend rejection (margin, risk limits) surfaces verbatim.
#[tokio::test]
async fn backend_rejection_surfaces_verbatim() {
    let remote = Arc::new(
        FakeRemote {
            fail_place_order: Some("insufficient margin".to_string()),
            ..FakeRemote::default()
        }
        .with_instrument(instrument("inst-1", "EURUSD")),
    );
    let host = Arc::new(RecordingHost::default());
    let broker = broker_with(remote.clone(), host.clone(), Some(common::COMPETITION_ID));

    let err = broker.place_order(limit_order()).await.unwrap_err();
    assert!(err.to_string().contains("insufficient margin"));
    assert_eq!(host.refresh_count(), 0);
    assert!(host.events().iter().any(|e| matches!(
        e,
        BrokerEvent::OperationFailed { operation, .. } if *operation == "place_order"
    )));
}

/// An explicit leverage on the pre-order wins over the instrument default.
#[tokio::test]
async fn explicit_leverage_overrides_instrument_default() {
    let remote = Arc::new(FakeRemote::default().with_instrument(instrument("inst-1", "EURUSD")));
    let host = Arc::new(RecordingHost::default());
    let broker = broker_with(remote.clone(), host.clone(), Some(common::COMPETITION_ID));

    let order = PreOrder {
        leverage: Some(25),
        ..limit_order()
    };
    broker.place_order(order).await.expect("order accepted");

    let ticket = remote
        .calls()
        .into_iter()
        .find_map(|c| match c {
            RemoteCall::PlaceOrder(t) => Some(t),
            _ => None,
        })
        .expect("ticket submitted");
    assert_eq!(ticket.leverage, 25);
}

/// Closing orders flip the create_new_position flag.
#[tokio::test]
async fn closing_order_does_not_create_a_position() {
    let remote = Arc::new(FakeRemote::default().with_instrument(instrument("inst-1", "EURUSD")));
    let host = Arc::new(RecordingHost::default());
    let broker = broker_with(remote.clone(), host.clone(), Some(common::COMPETITION_ID));

    let order = PreOrder {
        is_close: true,
        ..limit_order()
    };
    broker.place_order(order).await.expect("order accepted");

    let ticket = remote
        .calls()
        .into_iter()
        .find_map(|c| match c {
            RemoteCall::PlaceOrder(t) => Some(t),
            _ => None,
        })
        .expect("ticket submitted");
    assert!(!ticket.create_new_position);
}
