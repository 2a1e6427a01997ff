//! Stop-loss engine behavior.
//!
//! Flow under test: acquire -> observe prices -> confirm via redelivery.
//! The recording bus captures everything the engine publishes; redeliveries
//! are fed back by hand so each scenario controls exactly which observations
//! have "sustained".

use rust_decimal_macros::dec;

use trailstop_domain::{DeliverAfter, Message, PositionAcquired, PriceUpdated};
use trailstop_engine::StopLossEngine;
use trailstop_testkit::{price, RecordingBus};

fn engine_with_bus() -> (StopLossEngine<RecordingBus>, RecordingBus) {
    let bus = RecordingBus::new();
    (StopLossEngine::new(bus.clone()), bus)
}

fn acquire(engine: &mut StopLossEngine<RecordingBus>, value: rust_decimal::Decimal) {
    engine.consume(&Message::PositionAcquired(PositionAcquired { price: price(value) }));
}

fn observe(engine: &mut StopLossEngine<RecordingBus>, value: rust_decimal::Decimal) -> PriceUpdated {
    let update = PriceUpdated { price: price(value) };
    engine.consume(&Message::PriceUpdated(update));
    update
}

fn confirm(
    engine: &mut StopLossEngine<RecordingBus>,
    delay: rust_decimal::Decimal,
    payload: PriceUpdated,
) {
    engine.consume(&Message::DeliverAfter(DeliverAfter { delay, payload }));
}

// =============================================================================
// Acquisition
// =============================================================================

#[test]
fn acquiring_a_position_publishes_the_initial_target() {
    let (mut engine, bus) = engine_with_bus();

    acquire(&mut engine, dec!(1.0));

    let messages = bus.messages();
    assert_eq!(messages.len(), 1, "acquisition must emit exactly one message");
    assert_eq!(bus.last_target().unwrap().target, price(dec!(0.9)));
    assert!(engine.is_holding());
}

#[test]
fn reacquiring_while_holding_resets_the_target() {
    let (mut engine, bus) = engine_with_bus();

    acquire(&mut engine, dec!(1.0));
    acquire(&mut engine, dec!(2.0));

    assert_eq!(bus.last_target().unwrap().target, price(dec!(1.9)));
    assert_eq!(engine.current_target(), Some(dec!(1.9)));
}

// =============================================================================
// Price observation
// =============================================================================

#[test]
fn observing_a_price_requests_both_confirmations() {
    let (mut engine, bus) = engine_with_bus();

    acquire(&mut engine, dec!(1.0));
    let update = observe(&mut engine, dec!(1.5));

    let requests = bus.deliver_requests();
    assert_eq!(requests.len(), 2);

    assert_eq!(requests[0].delay, dec!(10.0));
    assert_eq!(requests[0].payload, update);

    assert_eq!(requests[1].delay, dec!(7.0));
    assert_eq!(requests[1].payload, update);
}

#[test]
fn observing_a_price_while_flat_is_ignored() {
    let (mut engine, bus) = engine_with_bus();

    observe(&mut engine, dec!(1.5));

    assert!(bus.is_empty());
    assert!(!engine.is_holding());
}

// =============================================================================
// Raise-target rule
// =============================================================================

#[test]
fn a_sustained_rise_raises_the_target() {
    let (mut engine, bus) = engine_with_bus();

    acquire(&mut engine, dec!(1.0));
    let update = observe(&mut engine, dec!(1.5));
    confirm(&mut engine, dec!(10.0), update);

    assert_eq!(bus.last_target().unwrap().target, price(dec!(1.4)));
}

#[test]
fn an_unsustained_rise_does_not_raise_the_target() {
    let (mut engine, bus) = engine_with_bus();

    acquire(&mut engine, dec!(1.0));
    observe(&mut engine, dec!(0.8));
    bus.clear();

    // Confirmation for a price that was never recorded: the window still
    // holds 0.8, so the floor cannot move
    confirm(&mut engine, dec!(10.0), PriceUpdated { price: price(dec!(1.5)) });

    assert!(bus.last_target().is_none());
}

#[test]
fn the_worst_sustained_price_governs_a_raise() {
    let (mut engine, bus) = engine_with_bus();

    acquire(&mut engine, dec!(1.0));
    let high = observe(&mut engine, dec!(1.5));
    observe(&mut engine, dec!(1.2));
    bus.clear();

    confirm(&mut engine, dec!(10.0), high);

    // min of {1.5, 1.2} is 1.2; the target follows the worst case, not the
    // confirmed price
    assert_eq!(bus.last_target().unwrap().target, price(dec!(1.1)));
}

#[test]
fn a_judged_price_no_longer_counts_toward_later_confirmations() {
    let (mut engine, bus) = engine_with_bus();

    acquire(&mut engine, dec!(1.0));
    let first = observe(&mut engine, dec!(1.0));
    let second = observe(&mut engine, dec!(1.2));
    bus.clear();

    confirm(&mut engine, dec!(10.0), first);
    confirm(&mut engine, dec!(10.0), second);

    // After 1.0 is judged and removed, the window is {1.2}: target 1.1
    assert_eq!(bus.last_target().unwrap().target, price(dec!(1.1)));
}

#[test]
fn an_empty_window_falls_back_to_the_acquired_price() {
    let (mut engine, bus) = engine_with_bus();

    acquire(&mut engine, dec!(2.0));
    bus.clear();

    // Stale confirmation from a previous cycle: nothing is pending, so both
    // extremes fall back to the acquired price. The acquired price always
    // clears its own derived floor, so the target is re-published unchanged
    // and no trigger fires
    confirm(&mut engine, dec!(7.0), PriceUpdated { price: price(dec!(0.5)) });

    assert_eq!(bus.last_target().unwrap().target, price(dec!(1.9)));
    assert_eq!(bus.trigger_count(), 0);
}

// =============================================================================
// Trigger rule
// =============================================================================

#[test]
fn a_sustained_drop_below_the_target_triggers_the_stop() {
    let (mut engine, bus) = engine_with_bus();

    acquire(&mut engine, dec!(1.0));
    let update = observe(&mut engine, dec!(0.89));
    confirm(&mut engine, dec!(7.0), update);

    assert_eq!(bus.trigger_count(), 1);
    assert!(!engine.is_holding());
    assert_eq!(engine.current_target(), None);
}

#[test]
fn a_recovered_drop_does_not_trigger_the_stop() {
    let (mut engine, bus) = engine_with_bus();

    acquire(&mut engine, dec!(1.0));
    let dip = observe(&mut engine, dec!(0.89));
    observe(&mut engine, dec!(0.91));

    confirm(&mut engine, dec!(7.0), dip);

    // max of {0.89, 0.91} is 0.91 >= 0.9: the window recovered in time
    assert_eq!(bus.trigger_count(), 0);
    assert!(engine.is_holding());
}

#[test]
fn after_triggering_the_engine_stays_silent() {
    let (mut engine, bus) = engine_with_bus();

    acquire(&mut engine, dec!(1.0));
    let first_drop = observe(&mut engine, dec!(0.89));
    let second_drop = observe(&mut engine, dec!(0.5));

    confirm(&mut engine, dec!(7.0), first_drop);
    assert_eq!(bus.trigger_count(), 1);

    bus.clear();
    confirm(&mut engine, dec!(7.0), second_drop);

    // The position is gone; a further confirmation neither re-triggers nor
    // touches the (absent) target
    assert!(bus.is_empty());
    assert!(!engine.is_holding());
}

#[test]
fn both_rules_run_on_either_delay_class() {
    let (mut engine, bus) = engine_with_bus();

    acquire(&mut engine, dec!(1.0));
    let dip = observe(&mut engine, dec!(0.89));
    bus.clear();

    // The move-delay redelivery also judges the trigger rule
    confirm(&mut engine, dec!(10.0), dip);

    assert_eq!(bus.trigger_count(), 1);
}

// =============================================================================
// Flat-state silence
// =============================================================================

#[test]
fn messages_while_flat_produce_no_output() {
    let (mut engine, bus) = engine_with_bus();

    engine.consume(&Message::PriceUpdated(PriceUpdated { price: price(dec!(1.0)) }));
    engine.consume(&Message::DeliverAfter(DeliverAfter {
        delay: dec!(7.0),
        payload: PriceUpdated { price: price(dec!(1.0)) },
    }));
    engine.consume(&Message::StopLossTriggered(trailstop_domain::StopLossTriggered {}));

    assert!(bus.is_empty());
}

#[test]
fn outbound_kinds_echoed_back_are_ignored_while_holding() {
    let (mut engine, bus) = engine_with_bus();

    acquire(&mut engine, dec!(1.0));
    bus.clear();

    // A transport fans out to every consumer, including the publisher; the
    // engine must shrug its own outputs off
    engine.consume(&Message::TargetUpdated(trailstop_domain::TargetUpdated {
        target: price(dec!(0.9)),
    }));

    assert!(bus.is_empty());
    assert_eq!(engine.current_target(), Some(dec!(0.9)));
}
