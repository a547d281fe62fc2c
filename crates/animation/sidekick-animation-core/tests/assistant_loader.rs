use std::sync::Arc;

use sidekick_animation_core::{
    parse_assistant_json, Animator, AnimatorEvent, AnimatorState, AssistantData, Config,
    LayerState, MimeTable, NoAudio, Playability, ScriptedRandom,
};

fn load(name: &str) -> AssistantData {
    let json = sidekick_test_fixtures::assistants::json(name).expect("load assistant fixture");
    parse_assistant_json(&json).expect("parse assistant fixture")
}

#[test]
fn every_fixture_parses_and_validates() {
    for key in sidekick_test_fixtures::assistants::keys() {
        let data = load(&key);
        assert!(!data.animations.is_empty(), "{key} has no animations");
        let animator: Animator<()> =
            Animator::new(Arc::new(data), &Config::default(), &NoAudio).expect("valid fixture");
        assert!(animator.sounds().is_empty());
    }
}

#[test]
fn clippit_keeps_definition_order_and_prefers_probable_audio() {
    let data = load("clippit");
    assert_eq!(data.framesize, [124, 93]);
    let names: Vec<&str> = data.animations.keys().map(String::as_str).collect();
    assert_eq!(&names[..4], ["Show", "Hide", "Idle1_1", "IdleAtom"]);

    let probe = MimeTable::new()
        .with("audio/ogg", Playability::Maybe)
        .with("audio/mpeg", Playability::Probably);
    let animator: Animator<()> =
        Animator::new(Arc::new(data), &Config::default(), &probe).expect("valid");
    assert_eq!(animator.sounds().mime(), Some("audio/mpeg"));
    assert_eq!(
        animator.sounds().get("2").map(|s| s.source.as_str()),
        Some("assets/clippit/sounds/2.mp3")
    );
}

#[test]
fn wrapped_fixture_renders_every_overlay() {
    let data = load("rocky");
    assert_eq!(data.layer_count(), 2);
    let mut animator: Animator<&'static str> =
        Animator::new(Arc::new(data), &Config::default(), &NoAudio).expect("valid");
    assert!(animator.show_animation("Bark", "bark"));
    assert_eq!(
        animator.layers(),
        [
            LayerState::Visible {
                background_position: [0, -80]
            },
            LayerState::Visible {
                background_position: [-80, -80]
            },
        ]
    );
    animator.advance(120);
    let events = animator.take_events();
    assert!(events.iter().any(|e| matches!(
        e,
        AnimatorEvent::StateChanged {
            listener: "bark",
            state: AnimatorState::Exited,
            ..
        }
    )));
}

#[test]
fn greeting_branch_is_scripted() {
    let data = load("clippit");
    // 0.2 * 100 = 20 <= 30 jumps back to frame 0, 0.5 * 100 = 50 lands on frame 2.
    let mut animator: Animator<u8> = Animator::with_random(
        Arc::new(data),
        &Config::default(),
        &NoAudio,
        Box::new(ScriptedRandom::new([0.2, 0.5])),
    )
    .expect("valid");
    animator.show_animation("Greeting", 1);
    animator.advance_to(500);
    let visited: Vec<usize> = animator
        .take_events()
        .into_iter()
        .filter_map(|e| match e {
            AnimatorEvent::FrameRendered { frame_index, .. } => Some(frame_index),
            _ => None,
        })
        .collect();
    assert_eq!(visited, [0, 1, 0, 1, 2, 3]);
}
