//! Behavioural tests for the locate/click/sequence engine against a synthetic desktop

use crate::automation::{
    Actuator, AutomationConfig, Locator, SequenceOutcome, SequenceState, Sequencer, offset_point,
    random_email,
};
use crate::desktop::synthetic::{DesktopEvent, SyntheticDesktop, Visibility, noise_template};
use crate::desktop::Modifier;
use crate::template_matching::{Match, SearchRegion};
use image::GrayImage;
use rand::SeedableRng;
use rand::rngs::StdRng;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::Instant;

const LAYOUT: [(u64, u32, u32); 7] = [
    (1, 10, 10),
    (2, 40, 10),
    (3, 70, 10),
    (4, 100, 10),
    (5, 10, 50),
    (6, 40, 50),
    (7, 100, 70),
];

fn button(n: u64) -> GrayImage {
    noise_template(n, 16, 16)
}

fn label(n: u64) -> String {
    format!("{n}.png")
}

fn position(n: u64) -> (u32, u32) {
    LAYOUT
        .iter()
        .find(|(id, _, _)| *id == n)
        .map(|(_, left, top)| (*left, *top))
        .unwrap()
}

/// Template directory holding 1.png through 7.png
fn templates_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (n, _, _) in LAYOUT {
        button(n).save(dir.path().join(label(n))).unwrap();
    }
    dir
}

/// Desktop showing the given buttons at their layout positions
fn desktop_with(buttons: &[u64]) -> SyntheticDesktop {
    let mut desktop = SyntheticDesktop::new(160, 120);
    for &n in buttons {
        let (left, top) = position(n);
        desktop.place(&label(n), button(n), left, top, Visibility::Always);
    }
    desktop
}

fn test_config(dir: &Path) -> AutomationConfig {
    let mut config = AutomationConfig::deterministic().with_templates_dir(dir);
    config.max_wait = Duration::from_secs(2);
    config
}

fn locator(desktop: SyntheticDesktop, dir: &Path) -> Locator<SyntheticDesktop> {
    Locator::with_rng(desktop, test_config(dir), StdRng::seed_from_u64(7))
}

fn actuator(desktop: SyntheticDesktop, dir: &Path) -> Actuator<SyntheticDesktop> {
    Actuator::new(locator(desktop, dir))
}

fn centre(n: u64) -> (i32, i32) {
    let (left, top) = position(n);
    (left as i32 + 8, top as i32 + 8)
}

// ============================================================
// LOCATOR TESTS
// ============================================================

#[tokio::test(start_paused = true)]
async fn test_locate_returns_centre() {
    let dir = templates_dir();
    let mut locator = locator(desktop_with(&[1, 2, 3]), dir.path());

    let found = locator.locate("2.png", None, None).await.unwrap();
    assert_eq!((found.x as i32, found.y as i32), centre(2));
    assert!(found.score >= 0.7);
    assert_eq!(locator.desktop().captures(), 1, "Visible template is found on the first shot");
}

#[tokio::test(start_paused = true)]
async fn test_locate_within_region_stays_inside_region() {
    let dir = templates_dir();
    let mut desktop = desktop_with(&[3]);
    desktop.place("3.png copy", button(3), 12, 80, Visibility::Always);
    let mut locator = locator(desktop, dir.path());

    let region = SearchRegion::new(0, 60, 80, 60);
    let found = locator.locate("3.png", None, Some(region)).await.unwrap();
    assert!(region.contains_point(found.x, found.y));
    assert_eq!((found.x, found.y), (20, 88));
}

#[tokio::test(start_paused = true)]
async fn test_locate_miss_respects_timeout() {
    let dir = templates_dir();
    for timeout_ms in [0u64, 700, 2000, 3100] {
        let mut locator = locator(desktop_with(&[1]), dir.path());
        let poll = locator.config().poll_interval;
        let timeout = Duration::from_millis(timeout_ms);

        let start = Instant::now();
        let found = locator.locate("2.png", Some(timeout), None).await;
        let elapsed = start.elapsed();

        assert!(found.is_none());
        assert!(elapsed >= timeout, "Returned early: {elapsed:?} < {timeout:?}");
        assert!(
            elapsed <= timeout + poll,
            "Overshot: {elapsed:?} > {timeout:?} + {poll:?}"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_locate_with_huge_timeout_still_finds_template() {
    let dir = templates_dir();
    let mut locator = locator(desktop_with(&[2]), dir.path());

    let found = locator
        .locate("2.png", Some(Duration::from_secs_f64(1e19)), None)
        .await
        .unwrap();
    assert_eq!((found.x as i32, found.y as i32), centre(2));

    let found = locator.locate("2.png", Some(Duration::MAX), None).await;
    assert!(found.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_locate_missing_file_returns_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let mut locator = locator(desktop_with(&[1]), dir.path());

    let start = Instant::now();
    assert!(locator.locate("1.png", None, None).await.is_none());
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(locator.desktop().captures(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_interrupt_is_dismissed_and_search_continues() {
    let dir = templates_dir();
    let mut desktop = SyntheticDesktop::new(160, 120);
    let (left, top) = position(7);
    desktop.place("7.png", button(7), left, top, Visibility::UntilClicked);
    // Captures 0-2 are the first cycle's match attempts, capture 3 is the interrupt check
    let (left, top) = position(2);
    desktop.place("2.png", button(2), left, top, Visibility::FromCapture(4));
    let mut locator = locator(desktop, dir.path());

    let found = locator.locate("2.png", None, None).await.unwrap();

    assert_eq!((found.x as i32, found.y as i32), centre(2));
    assert_eq!(locator.desktop().clicked_labels(), vec!["7.png"]);
    assert_eq!(locator.desktop().captures(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_waiting_for_interrupt_itself_does_not_dismiss_it() {
    let dir = templates_dir();
    let mut locator = locator(desktop_with(&[7]), dir.path());

    let found = locator.locate("7.png", None, None).await.unwrap();
    assert_eq!((found.x as i32, found.y as i32), centre(7));
    assert!(locator.desktop().clicks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_missing_interrupt_file_disables_check() {
    let dir = templates_dir();
    std::fs::remove_file(dir.path().join("7.png")).unwrap();
    let mut locator = locator(desktop_with(&[7]), dir.path());

    assert!(locator.locate("2.png", Some(Duration::from_secs(1)), None).await.is_none());
    assert!(locator.desktop().clicks().is_empty());
}

// ============================================================
// ACTUATOR TESTS
// ============================================================

#[test]
fn test_offset_point_stays_within_bounds() {
    let mut rng = StdRng::seed_from_u64(99);
    let target = Match {
        x: 100,
        y: 200,
        score: 1.0,
        threshold: 0.7,
    };
    let mut seen = HashSet::new();
    for _ in 0..1000 {
        let (x, y) = offset_point(&mut rng, &target, 5);
        assert!((95..=105).contains(&x));
        assert!((195..=205).contains(&y));
        seen.insert((x - 100, y - 200));
    }
    assert!(seen.len() > 50, "Offsets should spread across the square");

    assert_eq!(offset_point(&mut rng, &target, 0), (100, 200));
}

#[tokio::test(start_paused = true)]
async fn test_click_lands_near_centre() {
    let dir = templates_dir();
    let mut actuator = actuator(desktop_with(&[1, 2]), dir.path());

    assert!(actuator.click_image_with_offset("1.png", None, None).await);

    let clicks = actuator.locator().desktop().clicks();
    assert_eq!(clicks.len(), 1);
    let (cx, cy) = centre(1);
    let (x, y) = clicks[0];
    assert!((x - cx).abs() <= 5 && (y - cy).abs() <= 5);
    assert_eq!(actuator.locator().desktop().clicked_labels(), vec!["1.png"]);
}

#[tokio::test(start_paused = true)]
async fn test_click_retries_after_failed_dispatch() {
    let dir = templates_dir();
    let mut desktop = desktop_with(&[1]);
    desktop.fail_clicks = 1;
    let mut actuator = actuator(desktop, dir.path());

    let start = Instant::now();
    assert!(actuator.click_image_with_offset("1.png", None, None).await);
    assert!(start.elapsed() >= actuator.config().click_retry_delay);
    assert_eq!(actuator.locator().desktop().clicks().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_click_absent_template_exhausts_every_attempt() {
    let dir = templates_dir();
    let mut actuator = actuator(desktop_with(&[1]), dir.path());
    let config = actuator.config().clone();
    let timeout = Duration::from_secs(1);

    let start = Instant::now();
    assert!(!actuator.click_image_with_offset("2.png", Some(timeout), None).await);
    let elapsed = start.elapsed();

    let attempts = config.retry_count;
    let minimum = timeout * attempts + config.click_retry_delay * (attempts - 1);
    assert!(elapsed >= minimum, "{elapsed:?} < {minimum:?}");
    assert!(elapsed <= minimum + config.poll_interval * attempts);
    assert!(actuator.locator().desktop().clicks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_click_missing_template_file_fails() {
    let dir = templates_dir();
    std::fs::remove_file(dir.path().join("2.png")).unwrap();
    let mut actuator = actuator(desktop_with(&[1, 2]), dir.path());

    assert!(!actuator.click_image_with_offset("2.png", None, None).await);
    assert!(actuator.locator().desktop().clicks().is_empty());
    assert_eq!(actuator.locator().desktop().captures(), 0);
}

#[test]
fn test_random_email_format() {
    let pattern = Regex::new(r"^[A-Za-z0-9]{6}@163\.com$").unwrap();
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..200 {
        let email = random_email(&mut rng);
        assert!(pattern.is_match(&email), "Bad email: {email}");
    }
}

#[test]
fn test_random_emails_are_distinct() {
    let mut rng = StdRng::seed_from_u64(31);
    let emails: HashSet<String> = (0..1000).map(|_| random_email(&mut rng)).collect();
    assert_eq!(emails.len(), 1000);
}

#[tokio::test(start_paused = true)]
async fn test_type_text_pastes_after_input_toggle() {
    let dir = templates_dir();
    let mut actuator = actuator(desktop_with(&[]), dir.path());

    assert!(actuator.type_text_safely("abc123@163.com").await);

    let desktop = actuator.locator().desktop();
    assert_eq!(
        desktop.events,
        vec![
            DesktopEvent::Modifier(Modifier::Shift),
            DesktopEvent::Modifier(Modifier::Shift),
            DesktopEvent::Clipboard("abc123@163.com".to_string()),
            DesktopEvent::Hotkey(Modifier::paste(), 'v'),
        ]
    );
    assert_eq!(desktop.clipboard.as_deref(), Some("abc123@163.com"));
}

#[tokio::test(start_paused = true)]
async fn test_type_text_falls_back_to_typing() {
    let dir = templates_dir();
    let mut desktop = desktop_with(&[]);
    desktop.fail_clipboard = true;
    let mut actuator = actuator(desktop, dir.path());

    assert!(actuator.type_text_safely("Ab9@163.com").await);

    let typed: String = actuator
        .locator()
        .desktop()
        .events
        .iter()
        .filter_map(|e| match e {
            DesktopEvent::Typed(c) => Some(*c),
            _ => None,
        })
        .collect();
    assert_eq!(typed, "Ab9@163.com");
}

#[tokio::test(start_paused = true)]
async fn test_type_text_fails_when_both_paths_fail() {
    let dir = templates_dir();
    let mut desktop = desktop_with(&[]);
    desktop.fail_clipboard = true;
    desktop.fail_typing = true;
    let mut actuator = actuator(desktop, dir.path());

    assert!(!actuator.type_text_safely("abc").await);
}

// ============================================================
// SEQUENCER TESTS
// ============================================================

fn email_clipboard_writes(desktop: &SyntheticDesktop) -> Vec<String> {
    desktop
        .events
        .iter()
        .filter_map(|e| match e {
            DesktopEvent::Clipboard(text) => Some(text.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_sequence_completes_with_one_email() {
    let dir = templates_dir();
    let mut sequencer = Sequencer::new(actuator(desktop_with(&[1, 2, 3, 4, 5, 6]), dir.path()));

    let outcome = sequencer.run().await;

    let SequenceOutcome::Completed { email: Some(email) } = outcome else {
        panic!("Expected completed run with email, got {outcome:?}");
    };
    let desktop = sequencer.actuator().locator().desktop();
    assert_eq!(
        desktop.clicked_labels(),
        vec!["1.png", "2.png", "3.png", "4.png", "5.png", "1.png", "6.png"]
    );
    assert_eq!(email_clipboard_writes(desktop), vec![email.clone(), email.clone()]);
    assert_eq!(desktop.clipboard.as_deref(), Some(email.as_str()));
    assert_eq!(sequencer.state(), &SequenceState::Completed);
}

#[tokio::test(start_paused = true)]
async fn test_sequence_aborts_when_step_three_is_missing() {
    let dir = templates_dir();
    let mut sequencer = Sequencer::new(actuator(desktop_with(&[1, 2, 4, 5, 6]), dir.path()));

    assert!(!sequencer.run_sequence().await);

    let desktop = sequencer.actuator().locator().desktop();
    assert_eq!(desktop.clicked_labels(), vec!["1.png", "2.png"]);
    assert!(email_clipboard_writes(desktop).is_empty());
    assert!(desktop.clipboard.is_none());
    assert_eq!(sequencer.state(), &SequenceState::Aborted);
}

#[tokio::test(start_paused = true)]
async fn test_sequence_aborts_when_text_entry_fails() {
    let dir = templates_dir();
    let mut desktop = desktop_with(&[1, 2, 3, 4, 5, 6]);
    desktop.fail_clipboard = true;
    desktop.fail_typing = true;
    let mut sequencer = Sequencer::new(actuator(desktop, dir.path()));

    assert_eq!(sequencer.run().await, SequenceOutcome::Aborted);
    assert_eq!(
        sequencer.actuator().locator().desktop().clicked_labels(),
        vec!["1.png", "2.png", "3.png"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_each_run_generates_a_fresh_email() {
    let dir = templates_dir();
    let mut sequencer = Sequencer::new(actuator(desktop_with(&[1, 2, 3, 4, 5, 6]), dir.path()));

    let first = sequencer.run().await;
    let second = sequencer.run().await;
    assert!(first.is_completed() && second.is_completed());
    assert_ne!(first, second);
}
