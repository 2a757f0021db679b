//! CLI for Gurukul TTV - text-to-video lessons.

use clap::{Args, Parser, Subcommand, ValueEnum};
use gurukul_ttv::bench::{run_bench, DEFAULT_BENCH_PROMPTS};
use gurukul_ttv::panel::BUSY_LABEL;
use gurukul_ttv::{
    HttpVideoService, Lesson, PromptSource, PromptVideoPanel, SubmitOutcome, VideoService,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gurukul-ttv")]
#[command(about = "Generate lesson videos from text prompts via the Gurukul TTV service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Generation service base URL (defaults to $TTV_SERVICE_URL, then http://localhost:5000)
    #[arg(long, global = true)]
    service_url: Option<String>,

    /// Transport timeout in seconds (default: wait indefinitely)
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a video from a prompt or a built-in lesson
    Generate(GenerateArgs),

    /// List the built-in lessons
    Lessons,

    /// Download a generated video by filename
    Download(DownloadArgs),

    /// Time several sequential generation requests
    Bench(BenchArgs),

    /// Run the prompt panel interactively on stdin
    Interactive,
}

#[derive(Args)]
struct GenerateArgs {
    /// The text prompt describing the video
    #[arg(required_unless_present = "lesson")]
    prompt: Option<String>,

    /// Use a built-in lesson prompt instead of free text
    #[arg(short, long, value_enum, conflicts_with = "prompt")]
    lesson: Option<LessonArg>,

    /// Also download the generated video to this path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct DownloadArgs {
    /// Filename as served under /video/
    filename: String,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct BenchArgs {
    /// Number of requests to send
    #[arg(short = 'n', long, default_value_t = 3)]
    count: usize,

    /// Prompts to cycle through (defaults to three sample prompts)
    prompts: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LessonArg {
    #[value(name = "solar_system")]
    SolarSystem,
    #[value(name = "water_cycle")]
    WaterCycle,
    #[value(name = "photosynthesis")]
    Photosynthesis,
}

impl From<LessonArg> for Lesson {
    fn from(arg: LessonArg) -> Self {
        match arg {
            LessonArg::SolarSystem => Lesson::SolarSystem,
            LessonArg::WaterCycle => Lesson::WaterCycle,
            LessonArg::Photosynthesis => Lesson::Photosynthesis,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Generate(ref args) => {
            generate(&cli, args).await?;
        }
        Commands::Lessons => {
            list_lessons(cli.json)?;
        }
        Commands::Download(ref args) => {
            download(&cli, args).await?;
        }
        Commands::Bench(ref args) => {
            bench(&cli, args).await?;
        }
        Commands::Interactive => {
            interactive(&cli).await?;
        }
    }

    Ok(())
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_service(cli: &Cli) -> anyhow::Result<HttpVideoService> {
    let mut builder = HttpVideoService::builder();
    if let Some(ref url) = cli.service_url {
        builder = builder.base_url(url);
    }
    if let Some(secs) = cli.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

async fn generate(cli: &Cli, args: &GenerateArgs) -> anyhow::Result<()> {
    let panel = PromptVideoPanel::new(build_service(cli)?);

    let outcome = match args.lesson {
        Some(lesson) => panel.submit(Some(PromptSource::Lesson(lesson.into()))).await,
        None => {
            panel.edit_prompt(args.prompt.clone().unwrap_or_default());
            panel.submit(None).await
        }
    };

    let video_url = match outcome {
        SubmitOutcome::Succeeded { video_url } => video_url,
        SubmitOutcome::Failed(err) | SubmitOutcome::Rejected(err) => {
            anyhow::bail!("{}", err.user_message());
        }
        SubmitOutcome::Busy => anyhow::bail!("a generation is already in flight"),
    };

    let mut saved = None;
    if let Some(ref output) = args.output {
        let filename = video_url.rsplit('/').next().unwrap_or_default();
        let data = panel.service().fetch_video(filename).await?;
        tokio::fs::write(output, &data).await?;
        saved = Some((output.display().to_string(), data.len()));
    }

    if cli.json {
        let result = serde_json::json!({
            "type": "video",
            "success": true,
            "video_url": video_url,
            "output": saved.as_ref().map(|(path, _)| path),
            "size_bytes": saved.as_ref().map(|(_, size)| size),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", panel.snapshot().render_text());
        if let Some((path, size)) = saved {
            println!("Saved: {path} ({size} bytes)");
        }
    }

    Ok(())
}

async fn download(cli: &Cli, args: &DownloadArgs) -> anyhow::Result<()> {
    let service = build_service(cli)?;
    let data = service.fetch_video(&args.filename).await?;
    tokio::fs::write(&args.output, &data).await?;

    if cli.json {
        let result = serde_json::json!({
            "success": true,
            "source": service.playback_url(&args.filename),
            "output": args.output.display().to_string(),
            "size_bytes": data.len(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "Downloaded {} -> {} ({} bytes)",
            args.filename,
            args.output.display(),
            data.len()
        );
    }

    Ok(())
}

async fn bench(cli: &Cli, args: &BenchArgs) -> anyhow::Result<()> {
    let service = build_service(cli)?;
    let prompts: Vec<String> = if args.prompts.is_empty() {
        DEFAULT_BENCH_PROMPTS.iter().map(|p| p.to_string()).collect()
    } else {
        args.prompts.clone()
    };

    let report = run_bench(&service, &prompts, args.count).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for (i, sample) in report.samples.iter().enumerate() {
        match (&sample.video_path, &sample.error) {
            (Some(path), _) => println!(
                "Request {}: ok in {}ms -> {}",
                i + 1,
                sample.duration_ms,
                path
            ),
            (None, error) => println!(
                "Request {}: error in {}ms: {}",
                i + 1,
                sample.duration_ms,
                error.as_deref().unwrap_or("unknown")
            ),
        }
    }
    if !report.samples.is_empty() {
        println!("Average: {}ms", report.average_ms);
        println!("Min: {}ms, Max: {}ms", report.min_ms, report.max_ms);
        println!("Success rate: {:.1}%", report.success_rate);
    }

    Ok(())
}

const INTERACTIVE_HELP: &str = "\
Type a prompt to replace the current one, or:
  :submit          generate a video from the current prompt
  :lesson <key>    generate a video from a built-in lesson
  :show            redraw the panel
  :help            show this help
  :quit            exit";

/// One line of interactive input.
#[derive(Debug, PartialEq, Eq)]
enum InteractiveCommand<'a> {
    Quit,
    Help,
    Show,
    Submit,
    Lesson(&'a str),
    /// A `:`-prefixed word that is not a command.
    Unknown(&'a str),
    /// Anything else replaces the prompt text verbatim.
    Edit(&'a str),
}

fn parse_command(line: &str) -> InteractiveCommand<'_> {
    if !line.starts_with(':') {
        return InteractiveCommand::Edit(line);
    }
    let (cmd, rest) = line
        .split_once(' ')
        .map_or((line, ""), |(cmd, rest)| (cmd, rest.trim()));
    match cmd {
        ":quit" => InteractiveCommand::Quit,
        ":help" => InteractiveCommand::Help,
        ":show" => InteractiveCommand::Show,
        ":submit" => InteractiveCommand::Submit,
        ":lesson" => InteractiveCommand::Lesson(rest),
        other => InteractiveCommand::Unknown(other),
    }
}

async fn interactive(cli: &Cli) -> anyhow::Result<()> {
    let panel = Arc::new(PromptVideoPanel::new(build_service(cli)?));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: Option<JoinHandle<SubmitOutcome>> = None;

    println!("{INTERACTIVE_HELP}\n");
    print!("{}", panel.snapshot().render_text());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim_end_matches(['\r', '\n']);

                match parse_command(line) {
                    InteractiveCommand::Quit => break,
                    InteractiveCommand::Help => println!("{INTERACTIVE_HELP}"),
                    InteractiveCommand::Show => print!("{}", panel.snapshot().render_text()),
                    InteractiveCommand::Submit => {
                        let source = panel.current_prompt();
                        pending = spawn_submit(&panel, pending, source).await;
                    }
                    InteractiveCommand::Lesson(key) => match key.parse::<Lesson>() {
                        Ok(lesson) => {
                            pending = spawn_submit(&panel, pending, lesson.into()).await;
                        }
                        Err(_) => {
                            report_inline(&panel, panel.select_lesson(key).await);
                        }
                    },
                    InteractiveCommand::Unknown(cmd) => {
                        println!("Unknown command: {cmd}");
                        println!("{INTERACTIVE_HELP}");
                    }
                    InteractiveCommand::Edit(text) => panel.edit_prompt(text),
                }
            }
            joined = wait_pending(&mut pending) => {
                pending = None;
                if let Err(e) = joined {
                    tracing::error!("submission task failed: {e}");
                }
                print!("{}", panel.snapshot().render_text());
            }
        }
    }

    if let Some(handle) = pending {
        println!("Waiting for the in-flight generation to finish...");
        let _ = handle.await;
        print!("{}", panel.snapshot().render_text());
    }

    Ok(())
}

/// Starts a submission of `source` unless one is already running.
///
/// A source that fails validation is submitted inline so the panel records
/// the error without showing the busy label.
async fn spawn_submit(
    panel: &Arc<PromptVideoPanel<HttpVideoService>>,
    pending: Option<JoinHandle<SubmitOutcome>>,
    source: PromptSource,
) -> Option<JoinHandle<SubmitOutcome>> {
    if pending.is_some() || !panel.snapshot().trigger_enabled {
        println!("A video is already being generated.");
        return pending;
    }

    if source.validated().is_err() {
        report_inline(panel, panel.submit(Some(source)).await);
        return None;
    }

    println!("[ {BUSY_LABEL} ]");
    let panel = Arc::clone(panel);
    Some(tokio::spawn(async move { panel.submit(Some(source)).await }))
}

/// Redraws after a submission that finished without leaving the input loop.
fn report_inline(panel: &PromptVideoPanel<HttpVideoService>, outcome: SubmitOutcome) {
    if let SubmitOutcome::Busy = outcome {
        println!("A video is already being generated.");
        return;
    }
    print!("{}", panel.snapshot().render_text());
}

async fn wait_pending(
    pending: &mut Option<JoinHandle<SubmitOutcome>>,
) -> Result<SubmitOutcome, tokio::task::JoinError> {
    match pending {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

fn list_lessons(json_output: bool) -> anyhow::Result<()> {
    #[derive(serde::Serialize)]
    struct LessonInfo {
        key: &'static str,
        title: &'static str,
        prompt: &'static str,
    }

    let lessons: Vec<_> = Lesson::ALL
        .iter()
        .map(|lesson| LessonInfo {
            key: lesson.key(),
            title: lesson.title(),
            prompt: lesson.prompt(),
        })
        .collect();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&lessons)?);
    } else {
        println!("Available lessons:\n");
        for lesson in &lessons {
            println!("  {} ({})", lesson.title, lesson.key);
            println!("    {}", lesson.prompt);
        }
    }

    Ok(())
}
