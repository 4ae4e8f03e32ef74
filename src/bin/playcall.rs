use std::{fs, io, net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use playcall::{
    Commentator, CommentaryClient, CommentaryOptions, CommentaryReport, FfmpegLogLevel,
    SampleOptions, VideoClip, server, set_ffmpeg_log_level,
};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  playcall narrate clip.mp4\n  playcall narrate clip.mp4 --interval 2 --max-frames 3 --progress\n  playcall frames clip.mp4 --out frames --max-dimension 640\n  playcall probe clip.mp4 --json\n  playcall serve --addr 127.0.0.1:8787\n  playcall completions zsh > _playcall";

#[derive(Debug, Parser)]
#[command(
    name = "playcall",
    version,
    about = "Sports-style AI commentary for short video clips",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional logging output.
    #[arg(long)]
    verbose: bool,

    /// Allow overwriting existing output files.
    #[arg(long)]
    overwrite: bool,

    /// FFmpeg log level (quiet, error, warning, info, debug).
    #[arg(long)]
    ffmpeg_log_level: Option<String>,
}

#[derive(Debug, Parser, Clone)]
struct SamplingFlags {
    /// Seconds between sampled frames.
    #[arg(long, default_value_t = 1.0)]
    interval: f64,

    /// Maximum number of frames to sample.
    #[arg(long, default_value_t = 5)]
    max_frames: usize,

    /// JPEG quality (1-100).
    #[arg(long, default_value_t = 90)]
    jpeg_quality: u8,

    /// Limit the longest edge of sampled frames, in pixels.
    #[arg(long)]
    max_dimension: Option<u32>,
}

impl SamplingFlags {
    fn to_options(&self) -> Result<SampleOptions, Box<dyn std::error::Error>> {
        if !self.interval.is_finite() || self.interval <= 0.0 {
            return Err("--interval must be greater than 0".into());
        }
        let mut options = SampleOptions::new()
            .with_interval(Duration::from_secs_f64(self.interval))
            .with_max_frames(self.max_frames)
            .with_jpeg_quality(self.jpeg_quality);
        if let Some(max_dimension) = self.max_dimension {
            options = options.with_max_dimension(max_dimension);
        }
        Ok(options)
    }
}

#[derive(Debug, Parser, Clone)]
struct CommentaryFlags {
    /// Model requested from the completion service.
    #[arg(long, default_value = "gpt-4o")]
    model: String,

    /// Token cap for each per-frame reply.
    #[arg(long, default_value_t = 300)]
    max_tokens: u32,

    /// OpenAI-compatible chat-completions endpoint.
    #[arg(long)]
    endpoint: Option<String>,
}

impl CommentaryFlags {
    fn to_options(&self) -> CommentaryOptions {
        let mut options = CommentaryOptions::new()
            .with_model(self.model.as_str())
            .with_max_tokens(self.max_tokens);
        if let Some(endpoint) = &self.endpoint {
            options = options.with_endpoint(endpoint.as_str());
        }
        options
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate a commentary report for a clip.
    #[command(
        about = "Generate a commentary report",
        after_help = "Examples:\n  playcall narrate clip.mp4\n  playcall narrate clip.mp4 --interval 2 --max-frames 3 --json"
    )]
    Narrate {
        /// Input clip path.
        input: PathBuf,

        #[command(flatten)]
        sampling: SamplingFlags,

        #[command(flatten)]
        commentary: CommentaryFlags,

        /// Output the report as machine-readable JSON.
        #[arg(long)]
        json: bool,

        /// Show a progress bar while frames are narrated.
        #[arg(long)]
        progress: bool,
    },

    /// Dump sampled frames to a directory as JPEG files.
    #[command(
        about = "Dump sampled frames as JPEG files",
        after_help = "Examples:\n  playcall frames clip.mp4 --out frames\n  playcall frames clip.mp4 --out frames --interval 0.5 --max-frames 10"
    )]
    Frames {
        /// Input clip path.
        input: PathBuf,

        /// Output directory for the sampled frames.
        #[arg(long)]
        out: PathBuf,

        #[command(flatten)]
        sampling: SamplingFlags,
    },

    /// Print clip metadata (alias: info).
    #[command(about = "Print clip metadata", visible_alias = "info")]
    Probe {
        /// Input clip path.
        input: PathBuf,

        /// Output metadata as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Run the HTTP upload surface.
    #[command(about = "Serve the upload form and commentary endpoint")]
    Serve {
        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1:8787")]
        addr: SocketAddr,

        #[command(flatten)]
        sampling: SamplingFlags,

        #[command(flatten)]
        commentary: CommentaryFlags,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

fn parse_ffmpeg_log_level(value: &str) -> Option<FfmpegLogLevel> {
    match value.to_ascii_lowercase().as_str() {
        "quiet" => Some(FfmpegLogLevel::Quiet),
        "error" => Some(FfmpegLogLevel::Error),
        "warning" => Some(FfmpegLogLevel::Warning),
        "info" => Some(FfmpegLogLevel::Info),
        "debug" => Some(FfmpegLogLevel::Debug),
        _ => None,
    }
}

fn apply_global_options(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    let default_filter = if global.verbose {
        "warn,playcall=debug"
    } else {
        "warn,playcall=info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Some(level) = &global.ffmpeg_log_level {
        let parsed = parse_ffmpeg_log_level(level)
            .ok_or(format!("unsupported --ffmpeg-log-level: {level}"))?;
        set_ffmpeg_log_level(parsed);
    }

    Ok(())
}

fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn std::error::Error>> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    apply_global_options(&cli.global)?;

    match cli.command {
        Commands::Narrate {
            input,
            sampling,
            commentary,
            json,
            progress,
        } => {
            let sample_options = sampling.to_options()?;
            let client = CommentaryClient::from_env(commentary.to_options())?;
            let commentator = Commentator::new(client, sample_options);

            let frames = commentator.sample_clip(&input)?;
            if frames.is_empty() {
                eprintln!(
                    "{} {}",
                    "warning:".yellow().bold(),
                    format!("no frames sampled from {}", input.display()).yellow()
                );
            }

            let progress_bar = if progress && !frames.is_empty() {
                let pb = ProgressBar::new(frames.len() as u64);
                let style = ProgressStyle::with_template(
                    "{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}",
                )?;
                pb.set_style(style.progress_chars("##-"));
                Some(pb)
            } else {
                None
            };

            let rt = runtime()?;
            let mut report = CommentaryReport::new();
            for frame in &frames {
                let text = rt.block_on(commentator.client().describe_frame(frame))?;
                report.push(text);
                if let Some(pb) = &progress_bar {
                    pb.inc(1);
                }
            }
            if let Some(pb) = progress_bar {
                pb.finish_with_message("done");
            }

            if json {
                let payload = json!({
                    "clip": input.display().to_string(),
                    "frames": report.len(),
                    "sections": report
                        .sections()
                        .iter()
                        .map(|section| json!({
                            "frame": section.ordinal,
                            "text": section.text,
                        }))
                        .collect::<Vec<_>>(),
                    "report": report.render(),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                print!("{}", report.render());
            }
        }
        Commands::Frames {
            input,
            out,
            sampling,
        } => {
            let options = sampling.to_options()?;

            if out.exists() {
                if !cli.global.overwrite {
                    return Err(format!(
                        "output directory already exists: {} (use --overwrite)",
                        out.display()
                    )
                    .into());
                }
                eprintln!(
                    "{} {}",
                    "warning:".yellow().bold(),
                    format!("writing into existing directory {}", out.display()).yellow()
                );
            }
            fs::create_dir_all(&out)?;

            let mut clip = VideoClip::open(&input)?;
            let frames = clip.sampler().sample(&options)?;

            for frame in &frames {
                let output_path = out.join(format!("frame_{:06}.jpg", frame.frame_number));
                if output_path.exists() && !cli.global.overwrite {
                    return Err(format!(
                        "output file already exists: {} (use --overwrite)",
                        output_path.display()
                    )
                    .into());
                }
                fs::write(&output_path, frame.jpeg())?;
                if cli.global.verbose {
                    eprintln!(
                        "saved sample {} (source frame {}) -> {}",
                        frame.ordinal,
                        frame.frame_number,
                        output_path.display()
                    );
                }
            }

            println!(
                "{} {}",
                "success:".green().bold(),
                format!("Sampled {} frame(s) to {}", frames.len(), out.display()).green()
            );
        }
        Commands::Probe { input, json } => {
            let clip = VideoClip::open(&input)?;
            let metadata = clip.metadata();
            if json {
                let payload = json!({
                    "format": metadata.format,
                    "duration_seconds": metadata.duration.as_secs_f64(),
                    "video": metadata.video.as_ref().map(|video| json!({
                        "width": video.width,
                        "height": video.height,
                        "fps": video.frames_per_second,
                        "frame_count": video.frame_count,
                        "codec": video.codec,
                    })),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Format: {}", metadata.format);
                println!("Duration: {:?}", metadata.duration);
                if let Some(video) = &metadata.video {
                    println!(
                        "Video: {}x{} @ {:.2} fps [{}]",
                        video.width, video.height, video.frames_per_second, video.codec,
                    );
                }
            }
        }
        Commands::Serve {
            addr,
            sampling,
            commentary,
        } => {
            let sample_options = sampling.to_options()?;
            let client = CommentaryClient::from_env(commentary.to_options())?;
            let commentator = Arc::new(Commentator::new(client, sample_options));

            let rt = runtime()?;
            rt.block_on(server::serve(addr, commentator))?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "playcall", &mut io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
