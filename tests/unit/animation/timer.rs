use super::*;

fn run(timer: &mut Timer, n: usize) -> Vec<u32> {
    (0..n)
        .map(|_| {
            timer.next();
            timer.progress()
        })
        .collect()
}

#[test]
fn forward_timer_restarts_at_origin() {
    let mut t = Timer::new(TimerOpts {
        duration: 3,
        ..TimerOpts::default()
    });
    assert_eq!(run(&mut t, 7), vec![1, 2, 0, 1, 2, 0, 1]);
    assert_eq!(t.direction(), Direction::Forward);
}

#[test]
fn reverse_timer_bounces_between_bounds() {
    let mut t = Timer::new(TimerOpts {
        duration: 3,
        reverse: true,
        ..TimerOpts::default()
    });
    assert_eq!(run(&mut t, 8), vec![1, 2, 3, 2, 1, 0, 1, 2]);
}

#[test]
fn delay_is_consumed_before_progress_and_rearmed_on_flip() {
    let mut t = Timer::new(TimerOpts {
        duration: 2,
        delay: 2,
        reverse: true,
        ..TimerOpts::default()
    });
    assert!(t.is_waiting());
    assert_eq!(run(&mut t, 8), vec![0, 0, 1, 2, 2, 2, 1, 0]);
}

#[test]
fn progress_stays_within_bounds() {
    let mut t = Timer::new(TimerOpts {
        progress: 99,
        duration: 4,
        reverse: true,
        delay: 1,
        ..TimerOpts::default()
    });
    assert_eq!(t.progress(), 4);
    for _ in 0..100 {
        t.next();
        assert!(t.progress() <= t.duration());
    }
}

#[test]
fn value_applies_ease_to_fraction() {
    let mut t = Timer::new(TimerOpts {
        duration: 4,
        ease: Ease::InQuad,
        ..TimerOpts::default()
    });
    t.next();
    t.next();
    assert_eq!(t.fraction(), 0.5);
    assert_eq!(t.value(), 0.25);
}

#[test]
fn paused_timer_does_not_advance() {
    let mut t = Timer::new(TimerOpts {
        duration: 4,
        ..TimerOpts::default()
    });
    t.pause();
    t.next();
    assert_eq!(t.progress(), 0);
    t.resume();
    t.next();
    assert_eq!(t.progress(), 1);
}

#[test]
fn zero_duration_is_treated_as_one() {
    let t = Timer::new(TimerOpts {
        duration: 0,
        ..TimerOpts::default()
    });
    assert_eq!(t.duration(), 1);
}
