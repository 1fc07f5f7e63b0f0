// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_timing::TimerSlots;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Purpose {
    Redraw,
    Tooltip,
}

/// Drive `slots` from `from` to `to` in 1 ms steps and collect what fired.
fn run(slots: &mut TimerSlots<Purpose>, from: u64, to: u64) -> Vec<(Purpose, u64)> {
    let mut fired = Vec::new();
    for now in from..=to {
        while let Some(hit) = slots.pop_due(now) {
            fired.push(hit);
        }
    }
    fired
}

#[test]
fn bursts_coalesce_into_one_trailing_timer() {
    let mut slots = TimerSlots::new();
    // Ten moves, 20 ms apart, each pushing the redraw back by 300 ms.
    for i in 0..10 {
        slots.schedule_after(Purpose::Redraw, i * 20, 300);
    }
    let fired = run(&mut slots, 0, 1_000);
    assert_eq!(fired, vec![(Purpose::Redraw, 180 + 300)]);
}

#[test]
fn purposes_are_independent() {
    let mut slots = TimerSlots::new();
    slots.schedule_after(Purpose::Tooltip, 0, 500);
    slots.schedule_after(Purpose::Redraw, 0, 300);
    slots.cancel(Purpose::Tooltip);
    slots.schedule_after(Purpose::Tooltip, 100, 500);
    assert_eq!(slots.iter().count(), 2);
    let fired = run(&mut slots, 0, 1_000);
    assert_eq!(fired, vec![(Purpose::Redraw, 300), (Purpose::Tooltip, 600)]);
}

#[test]
fn equal_deadlines_fire_in_schedule_order() {
    let mut slots = TimerSlots::new();
    slots.schedule_at(Purpose::Tooltip, 50);
    slots.schedule_at(Purpose::Redraw, 50);
    assert_eq!(slots.pop_due(50), Some((Purpose::Tooltip, 50)));
    assert_eq!(slots.pop_due(50), Some((Purpose::Redraw, 50)));
    assert_eq!(slots.pop_due(50), None);
}
