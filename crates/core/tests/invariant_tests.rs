//! Property tests: whatever sequence of creates and moves is attempted,
//! no two active slots of a vet overlap on a date.

mod support;

use petnco_domain::{SlotChanges, TimeSlot};
use proptest::prelude::*;
use support::{date, time, utc, Harness};

#[derive(Debug, Clone)]
enum Op {
    Create { day: u32, start: u32, minutes: u32 },
    Move { index: usize, start: u32, minutes: u32 },
    Withdraw { index: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (1u32..=3, 0u32..20, 1u32..=8)
            .prop_map(|(day, start, minutes)| Op::Create { day, start, minutes }),
        2 => (0usize..16, 0u32..20, 1u32..=8)
            .prop_map(|(index, start, minutes)| Op::Move { index, start, minutes }),
        1 => (0usize..16).prop_map(|index| Op::Withdraw { index }),
    ]
}

/// Half-hour grid starting at 08:00, lengths in half hours (min two)
fn window(start: u32, halves: u32) -> (chrono::NaiveTime, chrono::NaiveTime) {
    let from = 8 * 60 + start * 30;
    let to = from + (halves + 1) * 30;
    (time(from / 60, from % 60), time(to / 60, to % 60))
}

fn overlapping(a: &TimeSlot, b: &TimeSlot) -> bool {
    a.vet_id == b.vet_id && a.date == b.date && a.start < b.end && b.start < a.end
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_active_slots_never_overlap(ops in proptest::collection::vec(op(), 1..40)) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let h = Harness::at(utc(2025, 5, 20, 9, 0));
            let (vet, vet_id) = h.vet("Dr. Rivera").await;
            let mut created = Vec::new();

            for op in ops {
                match op {
                    Op::Create { day, start, minutes } => {
                        let (from, to) = window(start, minutes);
                        if let Ok(slot) =
                            h.slots.create(&vet, vet_id, date(2025, 6, day), from, to).await
                        {
                            created.push(slot.id);
                        }
                    }
                    Op::Move { index, start, minutes } => {
                        if let Some(id) = created.get(index) {
                            let (from, to) = window(start, minutes);
                            let changes =
                                SlotChanges { start: Some(from), end: Some(to), ..Default::default() };
                            let _ = h.slots.update(*id, &vet, changes).await;
                        }
                    }
                    Op::Withdraw { index } => {
                        if let Some(id) = created.get(index) {
                            let _ = h.slots.withdraw(*id, &vet).await;
                        }
                    }
                }
            }

            let active: Vec<TimeSlot> =
                h.store.all_slots().into_iter().filter(TimeSlot::is_active).collect();
            for (i, a) in active.iter().enumerate() {
                for b in &active[i + 1..] {
                    assert!(!overlapping(a, b), "{a:?} overlaps {b:?}");
                }
            }
        });
    }
}
