use serde_json::to_string;
use sidekick_animation_core::{MimeTable, Playability};
use sidekick_orchestrator::{Assistant, AssistantConfig};

fn main() -> anyhow::Result<()> {
    let json = sidekick_test_fixtures::assistants::json("clippit")?;
    let config = AssistantConfig {
        animation: sidekick_animation_core::Config {
            seed: Some(42),
            ..Default::default()
        },
        ..AssistantConfig::default()
    };
    let probe = MimeTable::new().with("audio/mpeg", Playability::Probably);
    let mut assistant = Assistant::from_json(&json, config, &probe)?;

    assistant.set_viewport(1280.0, 720.0);
    assistant.show(false);
    assistant.speak("It looks like you're writing a letter.", false);
    assistant.play("Wave");
    assistant.move_to(200.0, 150.0)?;
    assistant.gesture_at(1000.0, 600.0)?;
    assistant.delay(Some(1_500));

    // Drive in 50ms steps, the way a host render loop would.
    while assistant.now() < 10_000 {
        assistant.advance(50);
        for event in assistant.take_events() {
            println!("{:>6} {}", assistant.now(), to_string(&event)?);
        }
    }

    println!(
        "done at {}ms, active task: {:?}, idle: {:?}",
        assistant.now(),
        assistant.active_task(),
        assistant.idle_phase()
    );
    Ok(())
}
