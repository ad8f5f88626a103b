use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::{rngs::StdRng, SeedableRng};
use snapkey::{
    app::{App, Control},
    runtime::{GameEvent, Runner, TestEventSource},
    session::{RoundReport, Session},
    Difficulty,
};

fn key(c: char) -> GameEvent {
    GameEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

// Headless run of the real loop shape: Runner + TestEventSource + App, no TTY.
// The reveal delay is real (1.5s..3.5s) so this test takes a few seconds.
#[test]
fn headless_round_reveals_and_is_hit() {
    let session = Session::with_rng(Some("Ana".into()), Difficulty::Easy, StdRng::seed_from_u64(99));
    let mut app = App::with_session(session);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(5));

    tx.send(GameEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))
        .unwrap();

    let mut answered = false;
    for _ in 0..2_000u32 {
        match runner.step(app.next_deadline()) {
            GameEvent::Tick => {
                app.on_tick(Instant::now());
            }
            GameEvent::Resize => {}
            GameEvent::Key(k) => {
                let now = Instant::now();
                app.on_tick(now);
                assert_eq!(app.handle_key(k, now), Control::Continue);
            }
        }

        if !answered {
            if let Some(target) = app.session.round().target() {
                tx.send(key(target)).unwrap();
                answered = true;
            }
        } else if !app.session.is_round_running() {
            break;
        }
    }

    assert!(answered, "target should have been revealed");
    let best = app.session.best_time().expect("hit should be recorded");
    assert!(best < Difficulty::Easy.timeout_ms());
    assert_eq!(app.session.stats().hits(), 1);
}

// The scenarios below drive the session with synthetic instants, so they are
// instant and deterministic.

fn reveal(s: &mut Session, now: Instant) -> (Instant, char) {
    s.start_round(now).unwrap();
    let at = s.round().next_deadline().unwrap();
    match s.on_tick(at) {
        Some(RoundReport::Revealed { target }) => (at, target),
        other => panic!("expected reveal, got {other:?}"),
    }
}

#[test]
fn personal_best_then_slower_attempt() {
    let mut s = Session::with_rng(Some("Ana".into()), Difficulty::Medium, StdRng::seed_from_u64(1));
    assert_eq!(Difficulty::Medium.timeout_ms(), 4000);

    let (at, target) = reveal(&mut s, Instant::now());
    match s.on_key(target, at + Duration::from_millis(250)) {
        Some(RoundReport::Hit { elapsed_ms, new_best, .. }) => {
            assert_eq!(elapsed_ms, 250);
            assert!(new_best);
        }
        other => panic!("expected hit, got {other:?}"),
    }
    assert_eq!(s.ranking().best_time_for("Ana", Difficulty::Medium), Some(250));

    let (at, target) = reveal(&mut s, at + Duration::from_secs(2));
    match s.on_key(target, at + Duration::from_millis(400)) {
        Some(RoundReport::Hit { new_best, .. }) => assert!(!new_best),
        other => panic!("expected hit, got {other:?}"),
    }
    assert_eq!(s.ranking().best_time_for("Ana", Difficulty::Medium), Some(250));
}

#[test]
fn eleven_players_keep_only_ten_fastest() {
    let mut s = Session::with_rng(None, Difficulty::Hard, StdRng::seed_from_u64(2));
    let mut now = Instant::now();

    for i in 0..11u64 {
        s.set_player(&format!("player{i}")).unwrap();
        let (at, target) = reveal(&mut s, now);
        s.on_key(target, at + Duration::from_millis(150 + i * 20));
        now = at + Duration::from_secs(1);
    }

    let top = s.ranking().top(10);
    assert_eq!(top.len(), 10);
    assert!(top.windows(2).all(|w| w[0].best_ms < w[1].best_ms));
    assert!(top.iter().all(|e| e.player != "player10"));
    assert_eq!(top[0].best_ms, 150);
    assert_eq!(top[9].best_ms, 150 + 9 * 20);
}

#[test]
fn timeout_beats_late_key_and_records_nothing() {
    let mut s = Session::with_rng(Some("Ana".into()), Difficulty::Hard, StdRng::seed_from_u64(3));
    let (at, target) = reveal(&mut s, Instant::now());

    // key and deadline land on the same instant: the timeout wins
    assert_eq!(
        s.on_key(target, at + Difficulty::Hard.timeout()),
        Some(RoundReport::TimedOut { target })
    );
    assert_eq!(s.on_key(target, at + Difficulty::Hard.timeout()), None);
    assert!(s.ranking().is_empty());
    assert_eq!(s.stats().timeouts, 1);
}

#[test]
fn restarting_mid_round_resets_timers() {
    let mut s = Session::with_rng(Some("Ana".into()), Difficulty::Easy, StdRng::seed_from_u64(4));
    let (at, _) = reveal(&mut s, Instant::now());

    let restart = at + Duration::from_millis(100);
    s.start_round(restart).unwrap();
    // the old timeout deadline passing must not resolve the new round
    assert_eq!(s.on_tick(at + Duration::from_millis(1400)), None);
    assert!(s.is_round_running());
    assert!(s.round().target().is_none());
}
