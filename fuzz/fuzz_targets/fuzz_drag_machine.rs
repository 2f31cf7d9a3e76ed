#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ordview_core::{ItemId, SectionId};
use ordview_interaction::{DragEffect, DragEvent, DragMachine};

#[derive(Arbitrary, Debug)]
enum Op {
    Start(u8, u8),
    Over(u8, u8),
    Leave,
    Drop(u8, u8, bool),
    Confirm,
    Cancel,
    End,
    Finished(bool),
    ForceCancel,
}

#[derive(Arbitrary, Debug)]
struct MachineInput {
    confirm_when_filtered: bool,
    ops: Vec<Op>,
}

fn item(raw: u8) -> ItemId {
    // Multiples of 8 map to the empty id, which the machine rejects.
    if raw % 8 == 0 {
        ItemId::new("")
    } else {
        ItemId::new(format!("q{}", raw % 8))
    }
}

fn section(raw: u8) -> SectionId {
    SectionId::new(format!("sec-{}", raw % 3))
}

fuzz_target!(|input: MachineInput| {
    let mut machine = DragMachine::new(input.confirm_when_filtered);
    let mut last_id = 0u64;

    for op in input.ops.into_iter().take(256) {
        let event = match op {
            Op::Start(i, s) => DragEvent::DragStart { item: item(i), section: section(s) },
            Op::Over(i, s) => DragEvent::DragOver { candidate: item(i), section: section(s) },
            Op::Leave => DragEvent::DragLeave,
            Op::Drop(i, s, filtered) => DragEvent::Drop {
                target: item(i),
                section: section(s),
                filtered,
            },
            Op::Confirm => DragEvent::Confirm,
            Op::Cancel => DragEvent::Cancel,
            Op::End => DragEvent::DragEnd,
            Op::Finished(succeeded) => DragEvent::CommitFinished { succeeded },
            Op::ForceCancel => {
                let was_committing = machine.is_committing();
                if let Some(transition) = machine.force_cancel() {
                    assert!(transition.transition_id > last_id);
                    last_id = transition.transition_id;
                    assert!(!machine.is_active());
                }
                assert_eq!(machine.is_committing(), was_committing);
                continue;
            }
        };

        let before = machine.state().clone();
        let Ok(transition) = machine.apply_event(&event) else {
            assert_eq!(machine.state(), &before, "rejected event changed state");
            continue;
        };
        assert_eq!(transition.transition_id, last_id + 1);
        last_id = transition.transition_id;
        assert_eq!(&transition.from, &before);
        assert_eq!(&transition.to, machine.state());
        if transition.is_noop() {
            assert_eq!(transition.from, transition.to);
        }
        if let DragEffect::CommitRequested { confirmed: false, .. } = transition.effect {
            let filtered = matches!(event, DragEvent::Drop { filtered: true, .. });
            assert!(!(filtered && input.confirm_when_filtered));
        }
    }
});
