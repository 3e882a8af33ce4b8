//! Quote workflow integration tests: competing bids, mutual exclusion,
//! legacy status spellings and the notification fan-out.

mod common;

use common::{fixtures as fx, TestContext};
use test_context::test_context;

use rust_decimal::Decimal;
use server_core::common::QuoteId;
use server_core::domains::interventions::models::{ActivityLogEntry, Intervention};
use server_core::domains::notifications::Notification;
use server_core::domains::quotes::actions::{
    approve_quote, cancel_quote, reject_quote, send_quote, submit_quote, ApproveQuote, CancelQuote,
    RejectQuote, SendQuote, SubmitQuote,
};
use server_core::domains::quotes::models::{Quote, SUPERSEDED_REASON};

#[test_context(TestContext)]
#[tokio::test]
async fn test_approve_accepts_one_and_rejects_every_competitor(ctx: &mut TestContext) {
    let manager = fx::user(&ctx.pool, "manager.approve").await;
    let p1 = fx::user(&ctx.pool, "provider.one").await;
    let p2 = fx::user(&ctx.pool, "provider.two").await;
    let p3 = fx::user(&ctx.pool, "provider.three").await;
    let intervention = fx::intervention(&ctx.pool, "quote_requested", manager).await;

    let q1 = fx::quote(&ctx.pool, intervention.id, p1, "pending").await;
    let q2 = fx::quote(&ctx.pool, intervention.id, p2, "pending").await;
    // Legacy spelling must be treated exactly like pending.
    let q3 = fx::quote(&ctx.pool, intervention.id, p3, "en_attente").await;

    let accepted = approve_quote(
        ApproveQuote::builder()
            .quote_id(q2.id)
            .approver(manager)
            .comments("ok")
            .build(),
        &ctx.deps,
    )
    .await
    .expect("approve");

    assert_eq!(accepted.status, "accepted");
    assert_eq!(accepted.validated_by, Some(manager));
    assert!(accepted.validated_at.is_some());

    let reloaded_q1 = Quote::find_by_id(q1.id, &ctx.pool).await.unwrap().unwrap();
    let reloaded_q3 = Quote::find_by_id(q3.id, &ctx.pool).await.unwrap().unwrap();
    assert_eq!(reloaded_q1.status, "rejected");
    assert_eq!(reloaded_q1.rejection_reason.as_deref(), Some(SUPERSEDED_REASON));
    assert_eq!(reloaded_q3.status, "rejected");
    assert_eq!(reloaded_q3.rejection_reason.as_deref(), Some(SUPERSEDED_REASON));

    // The winner is excluded from the bulk rejection.
    let reloaded_q2 = Quote::find_by_id(q2.id, &ctx.pool).await.unwrap().unwrap();
    assert_eq!(reloaded_q2.status, "accepted");
    assert!(reloaded_q2.rejection_reason.is_none());

    let reloaded = Intervention::find_by_id(intervention.id, &ctx.pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.status, "scheduling");
}

#[test_context(TestContext)]
#[tokio::test]
async fn test_approving_twice_is_an_invalid_state(ctx: &mut TestContext) {
    let manager = fx::user(&ctx.pool, "manager.twice").await;
    let p1 = fx::user(&ctx.pool, "provider.twice.one").await;
    let p2 = fx::user(&ctx.pool, "provider.twice.two").await;
    let intervention = fx::intervention(&ctx.pool, "quote_requested", manager).await;
    let q1 = fx::quote(&ctx.pool, intervention.id, p1, "pending").await;
    let q2 = fx::quote(&ctx.pool, intervention.id, p2, "sent").await;

    approve_quote(
        ApproveQuote::builder().quote_id(q2.id).approver(manager).build(),
        &ctx.deps,
    )
    .await
    .expect("first approve");

    let err = approve_quote(
        ApproveQuote::builder().quote_id(q2.id).approver(manager).build(),
        &ctx.deps,
    )
    .await
    .expect_err("second approve");
    assert_eq!(err.wire_code(), "invalid_state");

    // Nothing moved the second time.
    let reloaded_q1 = Quote::find_by_id(q1.id, &ctx.pool).await.unwrap().unwrap();
    let reloaded_q2 = Quote::find_by_id(q2.id, &ctx.pool).await.unwrap().unwrap();
    assert_eq!(reloaded_q1.status, "rejected");
    assert_eq!(reloaded_q2.status, "accepted");
    assert_eq!(reloaded_q2.validated_by, Some(manager));
}

#[test_context(TestContext)]
#[tokio::test]
async fn test_approving_a_rival_after_a_winner_rolls_back(ctx: &mut TestContext) {
    let manager = fx::user(&ctx.pool, "manager.rival").await;
    let p1 = fx::user(&ctx.pool, "provider.rival.one").await;
    let p2 = fx::user(&ctx.pool, "provider.rival.two").await;
    let intervention = fx::intervention(&ctx.pool, "quote_requested", manager).await;
    let q1 = fx::quote(&ctx.pool, intervention.id, p1, "pending").await;
    let q2 = fx::quote(&ctx.pool, intervention.id, p2, "pending").await;

    approve_quote(
        ApproveQuote::builder().quote_id(q1.id).approver(manager).build(),
        &ctx.deps,
    )
    .await
    .expect("first approve");

    // q2 is already rejected by the bulk step, so the guard misses; even a
    // still-pending rival would fail on the intervention transition guard
    // and roll the whole transaction back.
    let err = approve_quote(
        ApproveQuote::builder().quote_id(q2.id).approver(manager).build(),
        &ctx.deps,
    )
    .await
    .expect_err("rival approve");
    assert_eq!(err.wire_code(), "invalid_state");

    // Exactly one accepted quote, ever.
    let quotes = Quote::find_for_intervention(intervention.id, &ctx.pool)
        .await
        .unwrap();
    let accepted: Vec<_> = quotes.iter().filter(|q| q.status == "accepted").collect();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].id, q1.id);
}

#[test_context(TestContext)]
#[tokio::test]
async fn test_approve_unknown_quote_is_not_found(ctx: &mut TestContext) {
    let manager = fx::user(&ctx.pool, "manager.notfound").await;
    let err = approve_quote(
        ApproveQuote::builder()
            .quote_id(QuoteId::new())
            .approver(manager)
            .build(),
        &ctx.deps,
    )
    .await
    .expect_err("missing quote");
    assert_eq!(err.wire_code(), "not_found");
}

#[test_context(TestContext)]
#[tokio::test]
async fn test_approve_needs_the_intervention_awaiting_quotes(ctx: &mut TestContext) {
    let manager = fx::user(&ctx.pool, "manager.wrongphase").await;
    let provider = fx::user(&ctx.pool, "provider.wrongphase").await;
    let intervention = fx::intervention(&ctx.pool, "scheduling", manager).await;
    let quote = fx::quote(&ctx.pool, intervention.id, provider, "pending").await;

    let err = approve_quote(
        ApproveQuote::builder()
            .quote_id(quote.id)
            .approver(manager)
            .build(),
        &ctx.deps,
    )
    .await
    .expect_err("intervention not in quote_requested");
    assert_eq!(err.wire_code(), "invalid_state");

    // The transaction rolled back: the quote is still pending.
    let reloaded = Quote::find_by_id(quote.id, &ctx.pool).await.unwrap().unwrap();
    assert_eq!(reloaded.status, "pending");
    assert!(reloaded.validated_by.is_none());
}

#[test_context(TestContext)]
#[tokio::test]
async fn test_reject_quote_stamps_fields_and_notifies_provider(ctx: &mut TestContext) {
    let manager = fx::user(&ctx.pool, "manager.reject.quote").await;
    let provider = fx::user(&ctx.pool, "provider.reject.quote").await;
    let intervention = fx::intervention(&ctx.pool, "quote_requested", manager).await;
    let quote = fx::quote(&ctx.pool, intervention.id, provider, "pending").await;

    let rejected = reject_quote(
        RejectQuote::builder()
            .quote_id(quote.id)
            .approver(manager)
            .reason("over budget")
            .build(),
        &ctx.deps,
    )
    .await
    .expect("reject");
    assert_eq!(rejected.status, "rejected");
    assert_eq!(rejected.validated_by, Some(manager));
    assert!(rejected.validated_at.is_some());
    assert_eq!(rejected.rejection_reason.as_deref(), Some("over budget"));

    ctx.worker.drain_pending().await;

    // In-app, push and email all reach the provider.
    let inbox = Notification::find_for_user(provider, &ctx.pool).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, "quote_rejected");
    assert_eq!(ctx.push.calls().len(), 1);
    assert_eq!(ctx.mailer.calls().len(), 1);
    assert!(ctx.mailer.calls()[0].to.contains("provider.reject.quote"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn test_reject_already_resolved_quote_is_invalid(ctx: &mut TestContext) {
    let manager = fx::user(&ctx.pool, "manager.reject.resolved").await;
    let provider = fx::user(&ctx.pool, "provider.reject.resolved").await;
    let intervention = fx::intervention(&ctx.pool, "quote_requested", manager).await;
    let quote = fx::quote(&ctx.pool, intervention.id, provider, "accepted").await;

    let err = reject_quote(
        RejectQuote::builder()
            .quote_id(quote.id)
            .approver(manager)
            .reason("too late")
            .build(),
        &ctx.deps,
    )
    .await
    .expect_err("already accepted");
    assert_eq!(err.wire_code(), "invalid_state");
}

#[test_context(TestContext)]
#[tokio::test]
async fn test_cancel_quote_requires_ownership(ctx: &mut TestContext) {
    let manager = fx::user(&ctx.pool, "manager.cancel.quote").await;
    let owner = fx::user(&ctx.pool, "provider.owner").await;
    let other = fx::user(&ctx.pool, "provider.other").await;
    let intervention = fx::intervention(&ctx.pool, "quote_requested", manager).await;
    let quote = fx::quote(&ctx.pool, intervention.id, owner, "pending").await;

    let err = cancel_quote(
        CancelQuote::builder().quote_id(quote.id).provider(other).build(),
        &ctx.deps,
    )
    .await
    .expect_err("foreign provider");
    assert_eq!(err.wire_code(), "forbidden");

    let reloaded = Quote::find_by_id(quote.id, &ctx.pool).await.unwrap().unwrap();
    assert_eq!(reloaded.status, "pending");
}

#[test_context(TestContext)]
#[tokio::test]
async fn test_cancel_quote_notifies_the_deduplicated_manager_union(ctx: &mut TestContext) {
    let assigned_manager = fx::user(&ctx.pool, "manager.assigned").await;
    let building_only_manager = fx::user(&ctx.pool, "manager.building").await;
    let provider = fx::user(&ctx.pool, "provider.withdraw").await;
    let building_id = server_core::common::BuildingId::new();
    let intervention =
        fx::intervention_in_building(&ctx.pool, "quote_requested", assigned_manager, building_id)
            .await;
    fx::assign(&ctx.pool, intervention.id, assigned_manager, "manager", true).await;
    // assigned_manager manages the building too - must still get ONE notification.
    fx::building_manager(&ctx.pool, building_id, assigned_manager).await;
    fx::building_manager(&ctx.pool, building_id, building_only_manager).await;
    let quote = fx::quote(&ctx.pool, intervention.id, provider, "pending").await;

    let cancelled = cancel_quote(
        CancelQuote::builder()
            .quote_id(quote.id)
            .provider(provider)
            .build(),
        &ctx.deps,
    )
    .await
    .expect("cancel own pending quote");
    assert_eq!(cancelled.status, "cancelled");

    ctx.worker.drain_pending().await;

    for manager in [assigned_manager, building_only_manager] {
        let inbox = Notification::find_for_user(manager, &ctx.pool).await.unwrap();
        assert_eq!(inbox.len(), 1, "exactly one notification per manager");
        assert_eq!(inbox[0].kind, "quote_cancelled");
    }

    let log = ActivityLogEntry::find_for_entity("quote", quote.id.into_uuid(), &ctx.pool)
        .await
        .unwrap();
    assert!(log.iter().any(|e| e.action == "cancelled"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn test_legacy_pending_spelling_behaves_as_pending(ctx: &mut TestContext) {
    let manager = fx::user(&ctx.pool, "manager.legacy").await;
    let provider = fx::user(&ctx.pool, "provider.legacy").await;
    let intervention = fx::intervention(&ctx.pool, "quote_requested", manager).await;

    // A legacy row can be withdrawn by its owner like any pending quote.
    let legacy = fx::quote(&ctx.pool, intervention.id, provider, "waiting").await;
    let cancelled = cancel_quote(
        CancelQuote::builder()
            .quote_id(legacy.id)
            .provider(provider)
            .build(),
        &ctx.deps,
    )
    .await
    .expect("legacy pending row is cancellable");
    assert_eq!(cancelled.status, "cancelled");

    // And a legacy row can be rejected.
    let legacy = fx::quote(&ctx.pool, intervention.id, provider, "en_attente").await;
    let rejected = reject_quote(
        RejectQuote::builder()
            .quote_id(legacy.id)
            .approver(manager)
            .reason("incomplete")
            .build(),
        &ctx.deps,
    )
    .await
    .expect("legacy pending row is rejectable");
    assert_eq!(rejected.status, "rejected");
}

#[test_context(TestContext)]
#[tokio::test]
async fn test_submit_then_send_then_approve(ctx: &mut TestContext) {
    let manager = fx::user(&ctx.pool, "manager.flow").await;
    let provider = fx::user(&ctx.pool, "provider.flow").await;
    let intervention = fx::intervention(&ctx.pool, "quote_requested", manager).await;
    fx::assign(&ctx.pool, intervention.id, manager, "manager", true).await;
    fx::assign(&ctx.pool, intervention.id, provider, "provider", true).await;

    let submitted = submit_quote(
        SubmitQuote::builder()
            .intervention_id(intervention.id)
            .provider(provider)
            .amount(Decimal::new(120_000, 2))
            .description("Full replacement")
            .build(),
        &ctx.deps,
    )
    .await
    .expect("submit");
    assert_eq!(submitted.status, "pending");

    let sent = send_quote(
        SendQuote::builder()
            .quote_id(submitted.id)
            .provider(provider)
            .build(),
        &ctx.deps,
    )
    .await
    .expect("send");
    assert_eq!(sent.status, "sent");

    let accepted = approve_quote(
        ApproveQuote::builder()
            .quote_id(sent.id)
            .approver(manager)
            .build(),
        &ctx.deps,
    )
    .await
    .expect("approve a sent quote");
    assert_eq!(accepted.status, "accepted");

    // Tenants/strangers cannot submit.
    let stranger = fx::user(&ctx.pool, "stranger.flow").await;
    let other = fx::intervention(&ctx.pool, "quote_requested", manager).await;
    let err = submit_quote(
        SubmitQuote::builder()
            .intervention_id(other.id)
            .provider(stranger)
            .amount(Decimal::new(5_000, 2))
            .build(),
        &ctx.deps,
    )
    .await
    .expect_err("stranger");
    assert_eq!(err.wire_code(), "forbidden");
}
