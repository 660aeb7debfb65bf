use std::time::Duration;

use greeting_core::countdown::Countdown;
use greeting_core::model::{
    CinemaInvite, CountdownConfig, GreetingConfig, MusicTrack, Question, QuizConfig, QuizCopy,
    QuizRules, Reveal, RevealConfig, Slide, SlideContent, SlideHeader, SlideshowConfig,
};
use greeting_core::slideshow::ResumePolicy;

pub fn track(url: &str) -> MusicTrack {
    MusicTrack {
        url: url.to_string(),
        title: "Our song".to_string(),
        artist: Some("The Lovers".to_string()),
        start_secs: 0,
    }
}

pub fn sample_config() -> GreetingConfig {
    let questions = vec![
        Question::new(
            "Where did we first meet?",
            vec!["At work".into(), "In the park".into(), "On a train".into()],
            1,
        )
        .unwrap(),
        Question::new(
            "What was our first film?",
            vec!["Up".into(), "Heat".into(), "Alien".into()],
            0,
        )
        .unwrap(),
    ];

    let slides = vec![
        Slide::new(SlideContent::Photo {
            image: "images/beach.jpg".into(),
            caption: Some("Our first trip".into()),
            sticker: Some("2018".into()),
        })
        .unwrap()
        .with_header(SlideHeader {
            heading: "Memories".into(),
            subheading: Some("2024".into()),
            profile_image: None,
        })
        .with_music(track("music/first.mp3")),
        Slide::new(SlideContent::Text {
            heading: "Every day with you".into(),
            body: "is my **favourite** day".into(),
        })
        .unwrap(),
        Slide::new(SlideContent::List {
            heading: "Things I love".into(),
            items: vec!["Your laugh".into(), "Sunday pancakes".into()],
        })
        .unwrap()
        .with_music(track("music/second.mp3")),
    ];

    GreetingConfig {
        quiz: QuizConfig {
            questions,
            rules: QuizRules {
                min_correct: 2,
                lives: Some(3),
                feedback: Duration::from_millis(800),
                celebration: Duration::from_millis(2500),
                shuffle_questions: false,
            },
            copy: QuizCopy::default(),
            celebration_image: None,
        },
        slideshow: SlideshowConfig {
            slides,
            loop_enabled: false,
            default_duration: Duration::from_secs(5),
            resume: ResumePolicy::Continue,
        },
        reveal: RevealConfig {
            content: Reveal::Cinema(CinemaInvite {
                movie_title: Some("Casablanca".into()),
                cinema: Some("Rex".into()),
                date: Some("14 February".into()),
                time: Some("20:00".into()),
                seats: Some("F7, F8".into()),
                message: Some("See you *there*".into()),
                ..CinemaInvite::default()
            }),
            intro: Duration::from_millis(400),
        },
        countdown: None,
    }
}

pub fn with_countdown(mut config: GreetingConfig, countdown: Countdown) -> GreetingConfig {
    config.countdown = Some(CountdownConfig {
        countdown,
        title: "Your card opens soon".into(),
        subtitle: None,
        music: None,
    });
    config
}
