use pixel_canvas::render::adapter::headless::HeadlessAdapter;
use pixel_canvas::{Canvas, CanvasConfig, Rgba};
use std::time::Duration;

fn canvas(interval_ms: u64) -> Canvas {
    let conf = CanvasConfig::new("frame", 64, 64, 64, 64)
        .min_frame_interval(Duration::from_millis(interval_ms));
    Canvas::new_headless(conf).unwrap()
}

fn presented(c: &mut Canvas) -> u64 {
    c.adapter_mut()
        .as_any()
        .downcast_mut::<HeadlessAdapter>()
        .unwrap()
        .presented()
}

#[test]
fn test_update_counts_frames() {
    let mut c = canvas(0);
    assert_eq!(c.update_count(), 0);
    c.update();
    c.update();
    assert_eq!(c.update_count(), 2);
}

#[test]
fn test_fast_swaps_are_throttled_and_draws_dropped() {
    let mut c = canvas(10_000);
    c.swap().unwrap();
    assert_eq!(presented(&mut c), 1);
    assert!(!c.render_skip_active());

    // way inside the interval: present skipped, skip flag raised
    c.swap().unwrap();
    assert_eq!(presented(&mut c), 1);
    assert!(c.render_skip_active());

    // draw calls are dropped while skipping
    c.set_color(255, 0, 0, 255);
    c.rect(0, 0, 8, 8);
    assert_eq!(c.surface().pixels().get(1, 1), Rgba::TRANSPARENT);
    c.fill(9, 9, 9);
    assert_eq!(c.surface().pixels().get(1, 1), Rgba::TRANSPARENT);
}

#[test]
fn test_render_skip_can_be_disabled() {
    let mut c = canvas(10_000);
    c.swap().unwrap();
    c.swap().unwrap();
    assert!(c.render_skip_active());

    // with the toggle off the flag stays up but draws land anyway
    c.use_render_skip(false);
    assert!(!c.render_skip_active());
    c.set_color(255, 0, 0, 255);
    c.rect(0, 0, 8, 8);
    assert_eq!(c.surface().pixels().get(1, 1), Rgba::rgb(255, 0, 0));
}

#[test]
fn test_zero_interval_never_skips() {
    let mut c = canvas(0);
    for _ in 0..5 {
        c.swap().unwrap();
        assert!(!c.render_skip_active());
    }
    assert_eq!(presented(&mut c), 5);
}

#[test]
fn test_draws_resume_after_an_accepted_swap() {
    let mut c = canvas(0);
    c.set_min_frame_interval(Duration::from_millis(10_000));
    c.swap().unwrap();
    c.swap().unwrap();
    assert!(c.render_skip_active());

    // widening the interval back to zero lets the next swap through,
    // which clears the skip flag
    c.set_min_frame_interval(Duration::ZERO);
    c.swap().unwrap();
    assert!(!c.render_skip_active());
    c.set_color(0, 255, 0, 255);
    c.rect(0, 0, 2, 2);
    assert_eq!(c.surface().pixels().get(0, 0), Rgba::rgb(0, 255, 0));
}
