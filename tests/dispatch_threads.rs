//! Threaded dispatch tests.
//!
//! Firing an event holds the exclusive level for the whole dispatch and
//! re-enters the shared level for selection on the same thread. These tests
//! drive that path from many threads at once, interleaved with appends; a
//! two-independent-lock implementation deadlocks here.

use impel::{EdgeBuilder, EventOptions, StateMachine};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Barrier};
use std::thread;

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
struct Tag {
    thread: usize,
    seq: usize,
}

impl impel::core::State for Tag {
    fn name(&self) -> &str {
        "tag"
    }
}

const ADDERS: usize = 4;
const CALLERS: usize = 4;
const EDGES_PER_ADDER: usize = 50;
const CALLS_PER_CALLER: usize = 50;

fn seed_tag() -> Tag {
    Tag {
        thread: usize::MAX,
        seq: 0,
    }
}

#[test]
fn concurrent_calls_and_adds_complete_without_deadlock() {
    let machine = StateMachine::<Tag, ()>::new(seed_tag());
    let event = machine.add_event(EventOptions::named("tick"));

    // Wildcard seed so every call has a candidate from the start.
    event.add(
        EdgeBuilder::new()
            .to(seed_tag())
            .build(&machine)
            .unwrap(),
    );

    let barrier = Arc::new(Barrier::new(ADDERS + CALLERS));
    let mut handles = Vec::new();

    for thread_index in 0..ADDERS {
        let machine = Arc::clone(&machine);
        let event = Arc::clone(&event);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for seq in 0..EDGES_PER_ADDER {
                event.add(
                    EdgeBuilder::new()
                        .from(Tag {
                            thread: thread_index,
                            seq: usize::MAX,
                        })
                        .to(Tag {
                            thread: thread_index,
                            seq,
                        })
                        .build(&machine)
                        .unwrap(),
                );
            }
        }));
    }

    for _ in 0..CALLERS {
        let event = Arc::clone(&event);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for _ in 0..CALLS_PER_CALLER {
                event.call(&(), None).unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // Union of all appends, with per-thread append order intact.
    let transitions = event.transitions();
    assert_eq!(transitions.len(), 1 + ADDERS * EDGES_PER_ADDER);

    for thread_index in 0..ADDERS {
        let seqs: Vec<usize> = transitions
            .iter()
            .filter(|t| t.target().thread == thread_index)
            .map(|t| t.target().seq)
            .collect();
        assert_eq!(seqs, (0..EDGES_PER_ADDER).collect::<Vec<_>>());
    }
}

#[test]
fn silent_dispatch_selects_while_serialized() {
    let machine = StateMachine::<Tag, ()>::new(seed_tag());
    let event = machine.add_event(EventOptions::named("tick").silent(true));
    event.add(
        EdgeBuilder::new()
            .to(seed_tag())
            .build(&machine)
            .unwrap(),
    );

    let barrier = Arc::new(Barrier::new(CALLERS));
    let handles: Vec<_> = (0..CALLERS)
        .map(|_| {
            let event = Arc::clone(&event);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..CALLS_PER_CALLER {
                    event.call(&(), None).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(machine.current_state(), seed_tag());
    // Silent calls never reach the machine's observed protocol.
    assert!(machine.log().records().is_empty());
}
