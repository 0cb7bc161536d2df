use std::io::BufRead;

use meshedit_lib::command;
use meshedit_lib::harness::Harness;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "meshedit=info".into()),
        )
        .init();

    let mut harness = Harness::with_loaded_settings();

    // Parse --scene <path> argument
    if let Some(scene_json) = read_scene_arg() {
        if let Err(e) = harness.load_scene_json(&scene_json) {
            tracing::error!("Failed to load scene: {e}");
        }
    }

    // One JSON command per stdin line, one JSON response per stdout line
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("stdin read failed: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match command::execute_json(&mut harness, &line) {
            Ok(response) => match serde_json::to_string(&response) {
                Ok(json) => println!("{json}"),
                Err(e) => tracing::error!("response serialization failed: {e}"),
            },
            Err(e) => {
                println!("{}", serde_json::json!({ "success": false, "error": e }));
            }
        }
    }

    harness.editor.state.scene.autosave();
}

fn read_scene_arg() -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--scene" && i + 1 < args.len() {
            let path = &args[i + 1];
            match std::fs::read_to_string(path) {
                Ok(json) => {
                    tracing::info!("Loading scene from {path}");
                    return Some(json);
                }
                Err(e) => {
                    tracing::error!("Failed to read scene file {path}: {e}");
                    return None;
                }
            }
        }
        i += 1;
    }
    None
}
