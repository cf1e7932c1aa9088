use scrubline::{Ease, Player};

#[test]
fn linear_animation_scrubs_through_the_timeline() {
    // animate_to(3, 1000ms, linear) from 0: halfway in time is halfway in
    // distance, and cancelling freezes the last rendered value.
    let mut player = Player::new(0.0);
    player.animate_to(3.0, 1000.0, Ease::Linear, 0.0);

    let mid = player.tick(500.0);
    assert!((mid - 1.5).abs() < 1e-6);

    player.cancel();
    assert_eq!(player.value(), mid);
    assert_eq!(player.tick(750.0), mid);
    assert_eq!(player.tick(10_000.0), mid);
    assert!(!player.is_animating());
}

#[test]
fn scheduler_is_never_stuck_after_cancel() {
    let mut player = Player::new(0.0);
    player.animate_to(5.0, 1000.0, Ease::CubicInOut, 0.0);
    player.tick(100.0);
    player.cancel();

    // Immediately accepts new work.
    player.set_value(2.0);
    assert_eq!(player.value(), 2.0);
    player.animate_to(4.0, 500.0, Ease::Linear, 0.0);
    assert_eq!(player.tick(500.0), 4.0);
}

#[test]
fn constant_speed_means_ms_per_unit() {
    let mut player = Player::new(0.0);
    player.animate_to(2.0, 1000.0, Ease::ConstantSpeed, 0.0);
    // 2 units at 1000 ms/unit: done at 2000 ms, halfway at 1000 ms.
    assert!((player.tick(1000.0) - 1.0).abs() < 1e-6);
    assert_eq!(player.tick(2000.0), 2.0);
    assert!(!player.is_animating());
}

#[test]
fn synthetic_frame_loop_terminates() {
    let mut player = Player::new(0.0);
    player.animate_to(3.0, 250.0, Ease::Linear, 0.0);
    let mut frames = 0;
    let mut now = 0.0;
    while player.is_animating() {
        now += 1000.0 / 60.0;
        player.tick(now);
        frames += 1;
        assert!(frames < 1000, "animation never finished");
    }
    assert_eq!(player.value(), 3.0);
    assert!(frames >= 15);
}
