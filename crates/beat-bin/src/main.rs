// beatgen: beatmap generation, editing, validation and headless play.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use beat_model::BeatMapCodec;
use beat_pattern::{
    GenerationSettings, LaneAssigner, LanePolicy, ObstaclePlacer, PatternModifier, SongClip,
    write_beatmap,
};
use beat_play::{AutoPlayer, ImplementId, LaneLayout, ManualClock, PlayConfig, PlaySession};
use clap::{Args, Parser, Subcommand};
use log::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(name = "beatgen", about = "Drum-lane beatmap generator and simulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a beatmap from BPM and density.
    Generate(GenerateArgs),
    /// Reassign the lanes of an existing beatmap.
    Assign(AssignArgs),
    /// Turn hit notes of an existing beatmap into obstacles.
    Obstacles(ObstacleArgs),
    /// Check a beatmap file and print its statistics.
    Validate {
        input: PathBuf,
    },
    /// Play a beatmap headlessly with autoplay and print the results.
    Simulate(SimulateArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Song name used in the beatmap and the output file name.
    #[arg(long)]
    song: String,

    /// Song length in seconds.
    #[arg(long)]
    length: Option<f64>,

    /// Generator settings JSON; command line values override it.
    #[arg(long)]
    settings: Option<PathBuf>,

    #[arg(long)]
    bpm: Option<f64>,

    #[arg(long)]
    notes_per_beat: Option<f64>,

    #[arg(long)]
    start_delay: Option<f64>,

    #[arg(long)]
    end_offset: Option<f64>,

    #[arg(long)]
    difficulty: Option<i32>,

    #[arg(long)]
    obstacle_ratio: Option<f64>,

    /// Minimum obstacle spacing in beats.
    #[arg(long)]
    min_obstacle_interval: Option<f64>,

    /// Lane policy (random, random_no_repeat, balanced_random, sequential,
    /// mirror, spiral, left_right, alternating_pairs).
    #[arg(long)]
    policy: Option<String>,

    #[arg(long, env = "BEATGEN_SEED")]
    seed: Option<u64>,

    #[arg(long, default_value = "beatmaps")]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct AssignArgs {
    input: PathBuf,

    #[arg(long, default_value = "balanced_random")]
    policy: String,

    #[arg(long, env = "BEATGEN_SEED")]
    seed: Option<u64>,

    #[arg(long, default_value = "beatmaps")]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct ObstacleArgs {
    input: PathBuf,

    #[arg(long, default_value = "0.1")]
    ratio: f64,

    /// Minimum obstacle spacing in beats.
    #[arg(long, default_value = "4")]
    min_interval: f64,

    #[arg(long, env = "BEATGEN_SEED")]
    seed: Option<u64>,

    #[arg(long, default_value = "beatmaps")]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    input: PathBuf,

    /// Play config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Clip length in seconds (default: three seconds past the last note).
    #[arg(long)]
    duration: Option<f64>,

    #[arg(long, default_value = "60")]
    fps: u32,

    /// Let every n-th hit note pass unplayed.
    #[arg(long)]
    miss_every: Option<usize>,

    /// Also write the result summary to this file.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate(args) => run_generate(&args).map(|_| ()),
        Command::Assign(args) => run_assign(&args).map(|_| ()),
        Command::Obstacles(args) => run_obstacles(&args).map(|_| ()),
        Command::Validate { input } => run_validate(&input),
        Command::Simulate(args) => run_simulate(&args),
    }
}

fn parse_policy(name: &str) -> Result<LanePolicy> {
    match LanePolicy::from_name(name) {
        Some(policy) => Ok(policy),
        None => {
            let known: Vec<&str> = LanePolicy::ALL.iter().map(|p| p.name()).collect();
            bail!("unknown lane policy '{name}' (expected one of: {})", known.join(", "))
        }
    }
}

fn run_generate(args: &GenerateArgs) -> Result<PathBuf> {
    let mut settings = match &args.settings {
        Some(path) => GenerationSettings::read(path)
            .with_context(|| format!("Failed to load generator settings: {}", path.display()))?,
        None => GenerationSettings::default(),
    };
    if let Some(bpm) = args.bpm {
        settings.timing.bpm = bpm;
    }
    if let Some(npb) = args.notes_per_beat {
        settings.timing.notes_per_beat = npb;
    }
    if let Some(delay) = args.start_delay {
        settings.timing.start_delay = delay;
    }
    if let Some(offset) = args.end_offset {
        settings.timing.end_offset = offset;
    }
    if let Some(difficulty) = args.difficulty {
        settings.timing.difficulty = difficulty;
    }
    if let Some(ratio) = args.obstacle_ratio {
        settings.obstacle_ratio = ratio;
    }
    if let Some(interval) = args.min_obstacle_interval {
        settings.min_obstacle_interval = interval;
    }
    if let Some(policy) = &args.policy {
        settings.lane_policy = parse_policy(policy)?;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    settings.validate();

    let clip = args.length.map(|length| SongClip::new(args.song.clone(), length));
    let (map, report) = settings.generate(clip.as_ref())?;
    if !report.is_complete() {
        warn!(
            "Placed {} of {} requested obstacles",
            report.placed, report.requested
        );
    }

    let path = write_beatmap(&args.out_dir, &map, settings.lane_policy.name())?;
    info!(
        "Generated {} notes ({} obstacles) -> {}",
        map.notes.len(),
        map.obstacle_count(),
        path.display()
    );
    Ok(path)
}

fn run_assign(args: &AssignArgs) -> Result<PathBuf> {
    let mut map = BeatMapCodec::read(&args.input)?;
    let mut assigner = LaneAssigner::new(parse_policy(&args.policy)?);
    if let Some(seed) = args.seed {
        assigner = assigner.with_seed(seed);
    }
    assigner.modify(&mut map);

    let path = write_beatmap(&args.out_dir, &map, assigner.pattern_name())?;
    info!("Reassigned lanes -> {}", path.display());
    Ok(path)
}

fn run_obstacles(args: &ObstacleArgs) -> Result<PathBuf> {
    let mut map = BeatMapCodec::read(&args.input)?;
    let mut placer = ObstaclePlacer::new(args.ratio, args.min_interval);
    if let Some(seed) = args.seed {
        placer = placer.with_seed(seed);
    }
    placer.modify(&mut map);

    let report = placer.report();
    let path = write_beatmap(&args.out_dir, &map, placer.pattern_name())?;
    info!(
        "Placed {}/{} obstacles (achievable {}) -> {}",
        report.placed,
        report.requested,
        report.achievable,
        path.display()
    );
    Ok(path)
}

fn run_validate(input: &Path) -> Result<()> {
    let map = BeatMapCodec::read(input)?;
    map.validate()
        .with_context(|| format!("Invalid beatmap: {}", input.display()))?;

    println!("{} (difficulty {}, {} bpm)", map.song_name, map.difficulty, map.bpm);
    println!(
        "  notes: {} ({} hit, {} obstacle)",
        map.notes.len(),
        map.hit_count(),
        map.obstacle_count()
    );
    println!("  lanes: {:?}", map.lane_histogram());
    println!("  length: ~{:.2}s", map.duration_hint());
    Ok(())
}

fn run_simulate(args: &SimulateArgs) -> Result<()> {
    let map = BeatMapCodec::read(&args.input)?;
    let config = match &args.config {
        Some(path) => PlayConfig::read(path)?,
        None => PlayConfig::default(),
    };
    if args.fps == 0 {
        bail!("fps must be positive");
    }
    let duration = args.duration.unwrap_or_else(|| map.duration_hint() + 3.0);

    let mut session = PlaySession::new(
        &map,
        &LaneLayout::default(),
        config,
        ManualClock::new(duration),
    )
    .with_context(|| format!("Cannot play {}", args.input.display()))?;

    let mut player = AutoPlayer::new(ImplementId(0));
    if let Some(n) = args.miss_every {
        player = player.with_miss_every(n);
    }
    player.attach(&mut session);

    let Some(summary) = player.run_to_end(&mut session, 1.0 / args.fps as f64) else {
        bail!("simulation did not finish");
    };
    let overflowed = session.events_mut().overflowed();
    let pending = session.poll_events();
    debug!(
        "Simulation emitted {} events ({} dropped unpolled)",
        pending.len() + overflowed,
        overflowed
    );

    println!("{}", summary.to_json()?);
    if let Some(path) = &args.output {
        summary.write(path)?;
        info!("Results written to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_generate() {
        let cli = Cli::try_parse_from([
            "beatgen", "generate", "--song", "demo", "--length", "30", "--policy", "spiral",
        ])
        .unwrap();
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.song, "demo");
                assert_eq!(args.length, Some(30.0));
                assert_eq!(args.policy.as_deref(), Some("spiral"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(parse_policy("zigzag").is_err());
        assert_eq!(parse_policy("left_right").unwrap(), LanePolicy::LeftRight);
    }

    fn generate_args(out_dir: &Path, length: Option<f64>) -> GenerateArgs {
        GenerateArgs {
            song: "Demo Song".to_string(),
            length,
            settings: None,
            bpm: Some(120.0),
            notes_per_beat: Some(1.0),
            start_delay: None,
            end_offset: None,
            difficulty: Some(2),
            obstacle_ratio: Some(0.1),
            min_obstacle_interval: Some(2.0),
            policy: Some("sequential".to_string()),
            seed: Some(5),
            out_dir: out_dir.to_path_buf(),
        }
    }

    #[test]
    fn generate_then_assign_then_simulate() {
        let dir = tempfile::tempdir().unwrap();
        let generated = run_generate(&generate_args(dir.path(), Some(40.0))).unwrap();
        assert_eq!(
            generated.file_name().and_then(|n| n.to_str()),
            Some("Demo_Song_2_sequential.json")
        );
        run_validate(&generated).unwrap();

        let assigned = run_assign(&AssignArgs {
            input: generated.clone(),
            policy: "mirror".to_string(),
            seed: Some(1),
            out_dir: dir.path().to_path_buf(),
        })
        .unwrap();
        assert!(BeatMapCodec::read(&assigned).unwrap().validate().is_ok());

        let results = dir.path().join("results.json");
        run_simulate(&SimulateArgs {
            input: assigned,
            config: None,
            duration: None,
            fps: 60,
            miss_every: None,
            output: Some(results.clone()),
        })
        .unwrap();
        let text = std::fs::read_to_string(results).unwrap();
        let summary: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(summary["missCount"].as_u64(), Some(0));
    }

    #[test]
    fn obstacles_on_generated_map() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = generate_args(dir.path(), Some(60.0));
        args.obstacle_ratio = Some(0.0);
        let generated = run_generate(&args).unwrap();

        let output = run_obstacles(&ObstacleArgs {
            input: generated,
            ratio: 0.2,
            min_interval: 2.0,
            seed: Some(8),
            out_dir: dir.path().to_path_buf(),
        })
        .unwrap();
        assert_eq!(
            output.file_name().and_then(|n| n.to_str()),
            Some("Demo_Song_2_obstacles.json")
        );
        let map = BeatMapCodec::read(&output).unwrap();
        assert!(map.obstacle_count() > 0);
        assert_eq!(map.validate(), Ok(()));
    }

    #[test]
    fn generate_without_length_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run_generate(&generate_args(dir.path(), None)).is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
