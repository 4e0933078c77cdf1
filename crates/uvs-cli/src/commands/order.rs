//! Order command handlers: place, list, track, delivered.

use anyhow::{bail, Result};
use chrono::Utc;

use uvs_config::MENTAL_STATES;
use uvs_notify::DispatchOutcome;
use uvs_schemas::order_date;
use uvs_service::{DeliveryNotice, PlaceOrderRequest};

use super::Context;

// ---------------------------------------------------------------------------
// order place
// ---------------------------------------------------------------------------

pub fn place(
    ctx: &Context,
    item: String,
    address: String,
    delivery_request: Option<String>,
    mental_state: String,
    price: Option<String>,
) -> Result<()> {
    if !MENTAL_STATES.contains(&mental_state.as_str()) {
        bail!(
            "invalid mental state '{}'. expected one of: {}",
            mental_state,
            MENTAL_STATES.join(" | ")
        );
    }

    let price_label = price.unwrap_or_else(|| ctx.settings.price_for(&item));

    let placed = ctx.service.place_order(
        PlaceOrderRequest {
            item,
            address,
            delivery_request,
            mental_state,
            price_label,
        },
        Utc::now(),
    )?;

    println!("🎉 order placed — it is already yours.");
    println!("order_number={}", placed.record.order_number);
    println!("item={}", placed.record.item);
    println!("address={}", placed.record.address);
    println!("price={}", placed.record.price);
    println!("status={}", placed.record.status);

    for (stage, outcome) in &placed.notifications {
        if let DispatchOutcome::Failed { reason } = outcome {
            // Observability only: a dead channel never fails the order.
            eprintln!("WARN: {} notification failed: {}", stage.as_str(), reason);
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// order list
// ---------------------------------------------------------------------------

pub fn list(ctx: &Context) -> Result<()> {
    let views = ctx.service.list_orders(Utc::now())?;

    if views.is_empty() {
        println!("no orders yet — the universe is waiting for your first one.");
        return Ok(());
    }

    println!("total={}", views.len());
    for view in views {
        println!(
            "{} | {} | {}% {} | placed {}",
            view.record.order_number,
            view.record.item,
            view.progress.percent,
            view.progress.stage,
            view.record.created_at.format(order_date::FORMAT),
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// order track
// ---------------------------------------------------------------------------

pub fn track(ctx: &Context, order_number: &str) -> Result<()> {
    let report = ctx.service.get_progress(order_number, Utc::now())?;

    println!("order_number={order_number}");
    println!("percent={}", report.progress.percent);
    println!("stage={}", report.progress.stage);
    match report.remaining {
        Some(remaining) => println!("remaining={}h {}m", remaining.hours, remaining.minutes),
        None => println!("remaining=0h 0m (arrived in your timeline)"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// order delivered
// ---------------------------------------------------------------------------

pub fn delivered(ctx: &Context, order_number: &str) -> Result<()> {
    match ctx.service.notify_delivery_complete(order_number, Utc::now())? {
        DeliveryNotice::NotYetDue { percent } => {
            println!("not_yet_due=true percent={percent}");
        }
        DeliveryNotice::Dispatched(outcome) => match outcome {
            DispatchOutcome::Sent => println!("delivered_ping=sent"),
            DispatchOutcome::Skipped => println!("delivered_ping=skipped (telegram unconfigured)"),
            DispatchOutcome::Failed { reason } => {
                println!("delivered_ping=failed");
                eprintln!("WARN: delivered notification failed: {reason}");
            }
        },
    }
    Ok(())
}
