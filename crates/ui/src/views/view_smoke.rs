use std::time::Duration;

use greeting_core::countdown::Countdown;
use greeting_core::stage::Stage;
use greeting_core::time::fixed_now;
use services::AudioEvent;

use super::test_harness::{Preset, ViewKind, setup_view_harness};
use crate::test_fixtures::{sample_config, with_countdown};

#[tokio::test(flavor = "current_thread")]
async fn fresh_visit_renders_quiz_only() {
    let mut harness = setup_view_harness(ViewKind::Stage, sample_config(), Preset::default()).await;
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Where did we first meet?"), "missing prompt in {html}");
    assert!(html.contains("Question 1 of 2"), "missing progress in {html}");
    assert!(html.contains("In the park"), "missing choice in {html}");
    assert!(!html.contains("stories"), "slideshow mounted alongside quiz: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn passed_flag_skips_to_stories() {
    let preset = Preset { quiz_passed: true };
    let mut harness = setup_view_harness(ViewKind::Stage, sample_config(), preset).await;
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("stories-progress"), "missing stories in {html}");
    assert!(html.contains("Memories"), "missing header in {html}");
    assert!(html.contains("Our first trip"), "missing caption in {html}");
    assert!(!html.contains("quiz-prompt"), "quiz mounted alongside stories: {html}");
    assert!(
        html.contains(r#"<span class="slide-sticker">2018</span>"#),
        "sticker not rendered as text in {html}"
    );
    assert!(!html.contains(r#"src="2018""#), "sticker rendered as image: {html}");
    assert!(html.contains("♪ Our song"), "missing track title in {html}");
    assert!(html.contains("The Lovers"), "missing track artist in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn stories_start_first_slide_music() {
    let preset = Preset { quiz_passed: true };
    let mut harness = setup_view_harness(ViewKind::Stage, sample_config(), preset).await;
    harness.settle().await;

    let events = harness.audio.events();
    assert_eq!(events.first(), Some(&AudioEvent::Opened));
    assert!(
        events.contains(&AudioEvent::PlayMusic("music/first.mp3".into())),
        "events: {events:?}"
    );
    assert_eq!(harness.audio.open_sessions(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn pending_countdown_gates_everything() {
    let target = fixed_now() + chrono::Duration::days(2) + chrono::Duration::hours(3);
    let config = with_countdown(sample_config(), Countdown::new(target));
    let preset = Preset { quiz_passed: true };
    let mut harness = setup_view_harness(ViewKind::Stage, config, preset).await;
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Your card opens soon"), "missing title in {html}");
    assert!(html.contains("Open it now"), "missing skip in {html}");
    assert!(html.contains("days"), "missing units in {html}");
    assert!(!html.contains("stories-progress"), "stories mounted early: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn reveal_shows_intro_before_invitation() {
    let mut harness = setup_view_harness(ViewKind::Reveal, sample_config(), Preset::default()).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Switching to Cinema"), "missing intro in {html}");
    assert!(!html.contains("Casablanca"), "invitation shown too early: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn reveal_without_intro_renders_ticket() {
    let mut config = sample_config();
    config.reveal.intro = Duration::ZERO;
    let mut harness = setup_view_harness(ViewKind::Reveal, config, Preset::default()).await;
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Casablanca"), "missing title in {html}");
    assert!(html.contains("F7, F8"), "missing seats in {html}");
    assert!(html.contains("<em>there</em>"), "missing message in {html}");
    assert!(html.contains("Watch our story again"), "missing replay in {html}");
}

fn with_slide_duration(duration: Duration) -> greeting_core::model::GreetingConfig {
    let mut config = sample_config();
    config.slideshow.default_duration = duration;
    config
}

#[tokio::test(flavor = "current_thread")]
async fn switching_stage_closes_the_previous_audio_session() {
    let mut harness =
        setup_view_harness(ViewKind::Switch(Stage::Quiz), sample_config(), Preset::default())
            .await;
    harness.settle().await;
    assert_eq!(harness.audio.open_sessions(), 1);

    harness.switch_to(Stage::Slideshow);
    for _ in 0..3 {
        harness.drive_async().await;
    }

    let events = harness.audio.events();
    let opened = events.iter().filter(|e| **e == AudioEvent::Opened).count();
    let closed = events.iter().filter(|e| **e == AudioEvent::Closed).count();
    assert_eq!((opened, closed), (2, 1), "events: {events:?}");
    assert_eq!(harness.audio.open_sessions(), 1);
    assert!(
        events.contains(&AudioEvent::PlayMusic("music/first.mp3".into())),
        "new stage lost its music: {events:?}"
    );

    let html = harness.render();
    assert!(html.contains("stories-progress"), "missing stories in {html}");
    assert!(!html.contains("quiz-prompt"), "quiz still mounted: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn slideshow_timer_stops_when_its_stage_unmounts() {
    let config = with_slide_duration(Duration::from_millis(300));
    let mut harness =
        setup_view_harness(ViewKind::Switch(Stage::Slideshow), config, Preset::default()).await;
    harness.settle().await;

    harness.switch_to(Stage::Quiz);
    harness.run_for(Duration::from_millis(1500)).await;

    assert_eq!(harness.remote.sequence_ends(), 0, "stale ticker ended the sequence");
    assert_eq!(harness.audio.open_sessions(), 1);
    let html = harness.render();
    assert!(html.contains("Where did we first meet?"), "quiz replaced in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn mounted_slideshow_ends_on_its_own() {
    let config = with_slide_duration(Duration::from_millis(300));
    let mut harness =
        setup_view_harness(ViewKind::Switch(Stage::Slideshow), config, Preset::default()).await;
    harness.settle().await;

    harness.run_for(Duration::from_millis(1500)).await;

    assert_eq!(harness.remote.sequence_ends(), 1);
    assert_eq!(harness.audio.open_sessions(), 1);
    let html = harness.render();
    assert!(!html.contains("stories-progress"), "slideshow still mounted: {html}");
}
