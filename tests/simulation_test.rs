use std::process::{Command, Output};

fn run_simulation(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_self_driving_sim"))
        .args(args)
        .env("RUST_LOG", "warn,self_driving_sim=info")
        .output()
        .expect("Failed to execute simulation")
}

fn stat<'a>(stderr: &'a str, label: &str) -> &'a str {
    let line = stderr
        .lines()
        .find(|line| line.contains(label))
        .unwrap_or_else(|| panic!("Missing '{}' statistic. stderr: {}", label, stderr));
    line.split(label)
        .nth(1)
        .map(str::trim)
        .unwrap_or_else(|| panic!("Could not parse line: {}", line))
}

/// Test that the simulation runs headless and reports its statistics
#[test]
fn test_headless_simulation_runs() {
    let output = run_simulation(&["--ticks", "50", "--agents", "10", "--seed", "7"]);

    assert!(
        output.status.success(),
        "Simulation failed to run. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("=== SIMULATION COMPLETE ==="),
        "Simulation did not complete properly. stderr: {}",
        stderr
    );

    let ticks: u64 = stat(&stderr, "Ticks run:").parse().expect("tick count");
    assert!(ticks >= 1 && ticks <= 50);

    let damaged: usize = stat(&stderr, "Agents damaged:").parse().expect("damaged count");
    assert!(damaged <= 10);

    stat(&stderr, "Traffic damaged:");
    stat(&stderr, "Best distance:");
}

/// Test that the best brain saved by one run seeds the next
#[test]
fn test_best_brain_is_saved_and_reloaded() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("store.json");
    let store_arg = store.to_str().unwrap();

    let first = run_simulation(&[
        "--ticks", "30", "--agents", "5", "--seed", "1", "--store", store_arg, "--save-best",
    ]);
    assert!(
        first.status.success(),
        "First run failed. stderr: {}",
        String::from_utf8_lossy(&first.stderr)
    );

    let saved = std::fs::read_to_string(&store).expect("store written");
    assert!(saved.contains("bestBrain"));
    assert!(saved.contains("traffic"));

    let second = run_simulation(&["--ticks", "5", "--agents", "5", "--store", store_arg]);
    assert!(second.status.success());

    let stderr = String::from_utf8_lossy(&second.stderr);
    assert!(
        stderr.contains("Seeding 5 agents from saved brain"),
        "Saved brain was not used. stderr: {}",
        stderr
    );
}
