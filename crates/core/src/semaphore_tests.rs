// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use yare::parameterized;

fn with_capacity(capacity: i64) -> Semaphore {
    let mut sem = Semaphore::new();
    sem.set_capacity(capacity);
    sem
}

fn assert_balanced(sem: &Semaphore) {
    assert_eq!(
        sem.capacity - sem.available,
        sem.holders.len() as i64,
        "unbalanced semaphore: {:?}",
        sem
    );
}

#[test]
fn new_semaphore_allows_single_holder() {
    let sem = Semaphore::new();
    assert_eq!(sem.available, 1);
    assert_eq!(sem.capacity, 1);
    assert!(sem.holders.is_empty());
    assert!(sem.version.is_none());
}

#[test]
fn single_holder_lock_and_unlock() {
    let mut sem = Semaphore::new();

    sem.lock("a").unwrap();
    assert_eq!(sem.available, 0);
    assert_eq!(sem.holders, vec!["a"]);

    let before = sem.clone();
    assert_eq!(
        sem.lock("b"),
        Err(SemaphoreError::Exhausted { available: 0 })
    );
    assert_eq!(sem, before);

    sem.unlock("a").unwrap();
    assert_eq!(sem.available, 1);
    assert!(sem.holders.is_empty());
}

#[test]
fn exhausted_wins_over_already_held() {
    let mut sem = Semaphore::new();
    sem.lock("a").unwrap();

    let before = sem.clone();
    assert!(matches!(
        sem.lock("a"),
        Err(SemaphoreError::Exhausted { .. })
    ));
    assert_eq!(sem, before);
}

#[test]
fn relock_with_spare_capacity_is_already_held() {
    let mut sem = with_capacity(2);
    sem.lock("a").unwrap();

    let before = sem.clone();
    assert_eq!(
        sem.lock("a"),
        Err(SemaphoreError::AlreadyHeld("a".to_string()))
    );
    assert_eq!(sem, before);
}

#[test]
fn unlock_unheld_is_not_held() {
    let mut sem = Semaphore::new();
    assert_eq!(
        sem.unlock("a"),
        Err(SemaphoreError::NotHeld("a".to_string()))
    );

    sem.lock("a").unwrap();
    let before = sem.clone();
    assert!(matches!(sem.unlock("b"), Err(SemaphoreError::NotHeld(_))));
    assert_eq!(sem, before);
}

#[test]
fn capacity_three_fills_then_exhausts() {
    let mut sem = Semaphore::new();
    sem.set_capacity(3);
    assert_eq!(sem.available, 3);
    assert_eq!(sem.capacity, 3);

    for id in ["a", "b", "c"] {
        sem.lock(id).unwrap();
    }
    assert_eq!(sem.holders, vec!["a", "b", "c"]);
    assert_eq!(sem.available, 0);

    assert!(matches!(
        sem.lock("d"),
        Err(SemaphoreError::Exhausted { .. })
    ));
}

#[test]
fn holders_stay_sorted() {
    let mut sem = with_capacity(3);

    sem.lock("c").unwrap();
    sem.lock("b").unwrap();
    assert_eq!(sem.holders, vec!["b", "c"]);

    sem.lock("a").unwrap();
    assert_eq!(sem.holders, vec!["a", "b", "c"]);

    sem.unlock("b").unwrap();
    assert_eq!(sem.holders, vec!["a", "c"]);

    sem.unlock("c").unwrap();
    assert_eq!(sem.holders, vec!["a"]);

    sem.lock("b").unwrap();
    assert_eq!(sem.holders, vec!["a", "b"]);
}

#[parameterized(
    grow = { 3, 2 },
    same = { 1, 0 },
    to_zero = { 0, -1 },
    negative = { -1, -2 },
    large = { 10, 9 },
)]
fn set_capacity_shifts_available_with_one_holder(capacity: i64, expected_available: i64) {
    let mut sem = Semaphore::new();
    sem.lock("a").unwrap();

    sem.set_capacity(capacity);

    assert_eq!(sem.capacity, capacity);
    assert_eq!(sem.available, expected_available);
    assert_balanced(&sem);
}

#[test]
fn shrinking_below_holders_recovers_on_unlock() {
    let mut sem = with_capacity(3);
    for id in ["a", "b", "c"] {
        sem.lock(id).unwrap();
    }

    sem.set_capacity(1);
    assert_eq!(sem.available, -2);
    assert!(matches!(
        sem.lock("d"),
        Err(SemaphoreError::Exhausted { available: -2 })
    ));

    sem.unlock("a").unwrap();
    sem.unlock("b").unwrap();
    assert_eq!(sem.available, 0);
    sem.unlock("c").unwrap();
    assert_eq!(sem.available, 1);
    sem.lock("d").unwrap();
}

#[test]
fn serializes_wire_field_names_without_version() {
    let mut sem = with_capacity(2);
    sem.lock("foo").unwrap();
    sem.version = Some(Version(42));

    let json: serde_json::Value = serde_json::to_value(&sem).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"semaphore": 1, "max": 2, "holders": ["foo"]})
    );
}

#[test]
fn deserialize_ignores_payload_version_fields() {
    let sem: Semaphore =
        serde_json::from_str(r#"{"semaphore": 89, "index": 4567, "version": 7}"#).unwrap();
    assert_eq!(sem.available, 89);
    assert_eq!(sem.capacity, 0);
    assert!(sem.holders.is_empty());
    assert!(sem.version.is_none());
}

#[test]
fn deserialize_accepts_null_holders() {
    let sem: Semaphore =
        serde_json::from_str(r#"{"semaphore": 1, "max": 1, "holders": null}"#).unwrap();
    assert!(sem.holders.is_empty());
}

#[test]
fn json_round_trip_preserves_payload() {
    let mut sem = with_capacity(3);
    sem.lock("b").unwrap();
    sem.lock("a").unwrap();

    let decoded: Semaphore = serde_json::from_str(&sem.to_string()).unwrap();
    assert_eq!(decoded.available, sem.available);
    assert_eq!(decoded.capacity, sem.capacity);
    assert_eq!(decoded.holders, sem.holders);
}

#[derive(Clone, Debug)]
enum Op {
    Lock(u8),
    Unlock(u8),
    Resize(i8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..6).prop_map(Op::Lock),
        (0u8..6).prop_map(Op::Unlock),
        (-3i8..4).prop_map(Op::Resize),
    ]
}

proptest! {
    #[test]
    fn lock_and_unlock_keep_holders_sorted_and_balanced(
        ops in proptest::collection::vec(op_strategy(), 0..64)
    ) {
        let mut sem = Semaphore::new();

        for op in ops {
            let before = sem.clone();
            let result = match op {
                Op::Lock(id) => sem.lock(&format!("m{}", id)),
                Op::Unlock(id) => sem.unlock(&format!("m{}", id)),
                Op::Resize(by) => {
                    sem.set_capacity(sem.capacity + i64::from(by));
                    Ok(())
                }
            };

            if result.is_err() {
                prop_assert_eq!(&sem, &before);
            }
            prop_assert_eq!(sem.capacity - sem.available, sem.holders.len() as i64);
            prop_assert!(sem.holders.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn set_capacity_never_overflows(start in any::<i64>(), target in any::<i64>()) {
        let mut sem = Semaphore::new();
        sem.lock("m1").unwrap();
        sem.set_capacity(start);
        sem.set_capacity(target);

        prop_assert_eq!(sem.capacity, target);
        prop_assert_eq!(sem.capacity.wrapping_sub(sem.available), 1);
    }

    #[test]
    fn set_capacity_arithmetic_holds_for_any_sign(
        start in -50i64..50,
        target in -50i64..50,
    ) {
        let mut sem = Semaphore::new();
        sem.set_capacity(start);
        let available_before = sem.available;
        let capacity_before = sem.capacity;

        sem.set_capacity(target);

        prop_assert_eq!(sem.capacity, target);
        prop_assert_eq!(sem.available, available_before - (capacity_before - target));
    }
}

#[test]
fn set_capacity_at_i64_bounds() {
    let mut sem = Semaphore::new();

    sem.set_capacity(i64::MIN);
    assert_eq!(sem.capacity, i64::MIN);
    assert_eq!(sem.available, i64::MIN);
    assert!(matches!(
        sem.lock("a"),
        Err(SemaphoreError::Exhausted { available: i64::MIN })
    ));

    sem.set_capacity(i64::MAX);
    assert_eq!(sem.available, i64::MAX);
    sem.lock("a").unwrap();
    assert_eq!(sem.available, i64::MAX - 1);

    sem.set_capacity(1);
    assert_eq!(sem.available, 0);
    assert_eq!(sem.holders, vec!["a"]);
}
