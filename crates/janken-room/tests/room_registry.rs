//! Integration tests for the room registry and resolver.

use janken_protocol::{Choice, ConnectionId, GameResult};
use janken_room::{Outcome, RoomError, RoomRegistry, RoomType, resolve};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// =========================================================================
// Helpers
// =========================================================================

fn cid(id: u64) -> ConnectionId {
    ConnectionId::new(id)
}

/// A registry with one janken room called "lobby".
fn with_lobby() -> RoomRegistry {
    let mut reg = RoomRegistry::new();
    reg.create("lobby", RoomType::janken(), cid(1)).unwrap();
    reg
}

// =========================================================================
// Membership
// =========================================================================

#[test]
fn test_join_and_members_of_in_connection_order() {
    let mut reg = with_lobby();
    reg.join(cid(7), "lobby").unwrap();
    reg.join(cid(3), "lobby").unwrap();

    assert_eq!(reg.members_of("lobby"), vec![cid(3), cid(7)]);
    assert_eq!(reg.open_slots("lobby"), Some(0));
    assert!(reg.members_of("missing").is_empty());
}

#[test]
fn test_leave_returns_updated_room() {
    let mut reg = with_lobby();
    reg.join(cid(1), "lobby").unwrap();
    reg.join(cid(2), "lobby").unwrap();

    let room = reg.leave(cid(1), "lobby").unwrap();

    assert_eq!(room.len(), 1);
    assert!(room.contains(cid(2)));
    assert!(!room.contains(cid(1)));
}

#[test]
fn test_leave_unknown_room_returns_not_found() {
    let mut reg = RoomRegistry::new();
    assert_eq!(
        reg.leave(cid(1), "nowhere").err(),
        Some(RoomError::NotFound("nowhere".into()))
    );
}

#[test]
fn test_leave_all_removes_from_every_room_and_keeps_empty_rooms() {
    let mut reg = with_lobby();
    reg.create("arena", RoomType::new("open", 4), cid(2)).unwrap();
    reg.create("quiet", RoomType::janken(), cid(3)).unwrap();
    reg.join(cid(1), "lobby").unwrap();
    reg.join(cid(1), "arena").unwrap();
    reg.join(cid(2), "arena").unwrap();

    let mut left = reg.leave_all(cid(1));
    left.sort();

    assert_eq!(left, vec!["arena".to_string(), "lobby".to_string()]);
    assert_eq!(reg.room_count(), 3, "empty rooms are not auto-deleted");
    assert!(reg.get("lobby").unwrap().is_empty());
    assert_eq!(reg.members_of("arena"), vec![cid(2)]);
}

#[test]
fn test_leave_all_for_stranger_is_noop() {
    let mut reg = with_lobby();
    reg.join(cid(1), "lobby").unwrap();

    assert!(reg.leave_all(cid(99)).is_empty());
    assert_eq!(reg.members_of("lobby"), vec![cid(1)]);
}

#[test]
fn test_iter_is_name_ordered() {
    let mut reg = RoomRegistry::new();
    for name in ["delta", "alpha", "charlie"] {
        reg.create(name, RoomType::janken(), cid(1)).unwrap();
    }
    let names: Vec<&str> = reg.iter().map(|r| r.name()).collect();
    assert_eq!(names, ["alpha", "charlie", "delta"]);
}

#[test]
fn test_guarded_joins_never_exceed_capacity() {
    // Callers check open_slots() before join(). Driven that way, random
    // traffic never overfills a room.
    let mut rng = StdRng::seed_from_u64(7);
    let mut reg = RoomRegistry::new();
    let names = ["a", "b", "c"];
    reg.create("a", RoomType::new("duo", 2), cid(0)).unwrap();
    reg.create("b", RoomType::new("trio", 3), cid(0)).unwrap();
    reg.create("c", RoomType::new("solo", 1), cid(0)).unwrap();

    for _ in 0..2_000 {
        let user = cid(rng.random_range(1..=10));
        let name = names[rng.random_range(0..names.len())];
        if rng.random_bool(0.6) {
            if reg.open_slots(name).unwrap_or(0) > 0 {
                reg.join(user, name).unwrap();
            }
        } else {
            let _ = reg.leave(user, name);
        }

        for room in reg.iter() {
            assert!(room.len() <= room.max_capacity(), "{} overfilled", room.name());
        }
    }
}

// =========================================================================
// Resolver
// =========================================================================

#[test]
fn test_resolve_rock_loses_to_paper() {
    let outcome = resolve((cid(1), Choice::Rock), (cid(2), Choice::Paper));

    assert_eq!(
        outcome,
        Outcome::Decided {
            winner: cid(2),
            loser: cid(1)
        }
    );
    assert_eq!(outcome.result_for(&cid(1)), Some(GameResult::Lose));
    assert_eq!(outcome.result_for(&cid(2)), Some(GameResult::Win));
    assert_eq!(outcome.result_for(&cid(3)), None);
}

#[test]
fn test_resolve_does_not_consume_caller_state() {
    let hands = [(cid(1), Choice::Scissors), (cid(2), Choice::Scissors)];

    let outcome = resolve(hands[0], hands[1]);

    assert_eq!(
        outcome,
        Outcome::Tie {
            players: [cid(1), cid(2)]
        }
    );
    assert_eq!(hands[0].1, Choice::Scissors);
    assert_eq!(hands[1].1, Choice::Scissors);
}
