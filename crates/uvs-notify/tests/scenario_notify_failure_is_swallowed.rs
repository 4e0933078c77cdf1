//! Fire-and-forget transport behavior.
//!
//! GREEN when:
//! - A send against an unreachable endpoint returns `Failed` instead of
//!   panicking or raising.
//! - The failure reason never contains the bot token (the request URL embeds
//!   it, so leaking the URL would leak the secret).
//! - An unconfigured dispatcher skips without touching the network.

use uvs_notify::{DispatchOutcome, NotificationDispatcher, StageKey, TelegramCredentials};

fn creds() -> TelegramCredentials {
    TelegramCredentials {
        bot_token: "000001:TEST-ONLY-TOKEN".to_string(),
        chat_id: "1".to_string(),
    }
}

#[test]
fn unreachable_endpoint_yields_failed_outcome() {
    // Nothing listens on the discard port; the connection attempt fails fast.
    let dispatcher =
        NotificationDispatcher::new_with_base_url(Some(creds()), "http://127.0.0.1:9".to_string());

    let outcome = dispatcher.send(StageKey::Received, "UNIVERSE-1", "💰 Steady monthly income");
    match outcome {
        DispatchOutcome::Failed { reason } => {
            assert!(!reason.is_empty());
            assert!(
                !reason.contains("TEST-ONLY-TOKEN"),
                "bot token must never leak into the failure reason: {reason}"
            );
        }
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[test]
fn every_stage_is_swallowed_on_transport_failure() {
    let dispatcher =
        NotificationDispatcher::new_with_base_url(Some(creds()), "http://127.0.0.1:9".to_string());

    for stage in [StageKey::Received, StageKey::Shipped, StageKey::Delivered] {
        let outcome = dispatcher.send(stage, "UNIVERSE-2", "x");
        assert!(
            matches!(outcome, DispatchOutcome::Failed { .. }),
            "{stage:?} send must fail softly, got {outcome:?}"
        );
    }
}

#[test]
fn missing_credentials_short_circuit_to_skipped() {
    // Base URL is irrelevant: without credentials no request is built.
    let dispatcher = NotificationDispatcher::new(None);
    assert!(!dispatcher.is_configured());
    assert_eq!(
        dispatcher.send(StageKey::Delivered, "UNIVERSE-3", "x"),
        DispatchOutcome::Skipped
    );
}
