use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;

use ftg_sound_cues::audio_system::{AudioBackend, RecordingBackend};
use ftg_sound_cues::error::AppResult;
use ftg_sound_cues::messaging::{Event, EventBus};
use ftg_sound_cues::replay::{self, ReplayRecord};
use ftg_sound_cues::{logging, Config, MatchAudio};

/// 60 fps engine tick
const FRAME_DURATION: Duration = Duration::from_micros(16_667);

#[derive(Parser)]
#[command(name = "ftg-sound-cues")]
#[command(about = "Replay a recorded fighting game match through the audio cue dispatcher")]
struct Args {
    /// JSON-lines match recording
    recording: PathBuf,

    /// Configuration file (defaults to the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the sound files
    #[arg(short, long)]
    sounds: Option<PathBuf>,

    /// Do not open an audio device
    #[arg(long)]
    dry_run: bool,

    /// Pace frames at 60 fps instead of replaying as fast as possible
    #[arg(long)]
    realtime: bool,

    /// Without audio output, frames a one-shot counts as playing
    #[arg(long, default_value_t = 30)]
    one_shot_frames: u32,

    /// Log directory (defaults to the platform config dir)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> AppResult<()> {
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_default(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    if let Some(sounds) = &args.sounds {
        config.sound_dir = sounds.display().to_string();
    }

    let log_dir = args.log_dir.clone().unwrap_or_else(logging::default_log_dir);
    logging::initialize_tracing(&log_dir, &config.log_level);
    tracing::info!("ftg-sound-cues v{}", env!("CARGO_PKG_VERSION"));

    let records = replay::load_recording(&args.recording)
        .with_context(|| format!("Failed to read recording {}", args.recording.display()))?;

    let backend = create_backend(&config, &args)?;
    let event_bus = EventBus::new();
    let events = event_bus.subscribe();

    let mut audio = MatchAudio::new(config, backend, Some(event_bus));

    let started = Instant::now();
    let mut frames = 0u64;
    for record in &records {
        if let ReplayRecord::Frame(_) = record {
            frames += 1;
            if args.realtime {
                let due = started + FRAME_DURATION * frames as u32;
                if let Some(wait) = due.checked_duration_since(Instant::now()) {
                    thread::sleep(wait);
                }
            }
        }
        audio.apply(record);
    }
    drop(audio);

    print_summary(events.try_iter(), frames);
    Ok(())
}

#[cfg(feature = "playback")]
fn create_backend(config: &Config, args: &Args) -> AppResult<Rc<dyn AudioBackend>> {
    use ftg_sound_cues::audio_system::RodioBackend;

    if args.dry_run {
        return Ok(Rc::new(RecordingBackend::headless(args.one_shot_frames)));
    }
    let backend = RodioBackend::new(&config.sound_dir, config.stage.width)
        .context("Failed to open audio output")?;
    Ok(Rc::new(backend))
}

#[cfg(not(feature = "playback"))]
fn create_backend(_config: &Config, args: &Args) -> AppResult<Rc<dyn AudioBackend>> {
    if !args.dry_run {
        tracing::warn!("Built without the `playback` feature; replaying without audio output");
    }
    Ok(Rc::new(RecordingBackend::headless(args.one_shot_frames)))
}

fn print_summary(events: impl Iterator<Item = Event>, frames: u64) {
    let mut played: BTreeMap<String, usize> = BTreeMap::new();
    let mut missing: BTreeMap<String, usize> = BTreeMap::new();
    let mut stops = 0usize;
    let mut rounds = 0usize;

    for event in events {
        tracing::debug!("{}", event.description());
        match event {
            Event::CuePlayed { sound, .. } => *played.entry(sound).or_default() += 1,
            Event::CueStopped { .. } => stops += 1,
            Event::SoundMissing { sound, .. } => *missing.entry(sound).or_default() += 1,
            Event::RoundReset { .. } => rounds += 1,
        }
    }

    println!("Replayed {} frames, {} side resets", frames, rounds);
    println!("Cues played: {}", played.values().sum::<usize>());
    for (sound, count) in &played {
        println!("  {:<24} {}", sound, count);
    }
    println!("Channel stops: {}", stops);
    if !missing.is_empty() {
        println!("Missing sounds:");
        for (sound, count) in &missing {
            println!("  {:<24} {}", sound, count);
        }
    }
}
