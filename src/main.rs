use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use ddoo_devkit::config::DevkitConfig;

#[derive(Parser)]
#[command(name = "ddoo", version)]
#[command(about = "DDOO dev tools: animation/VFX bundler and local dev server")]
struct Cli {
    // defaults to `bundle` when omitted
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run as if started in this directory
    #[arg(short = 'C', long = "dir", global = true)]
    dir: Option<PathBuf>,

    /// Config file (default: ddoo.toml in the working directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge anim/*.json and vfx/*.json into anim-bundle.js
    Bundle {
        #[command(flatten)]
        sources: SourceArgs,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write anim/index.json and vfx/index.json manifests
    Index {
        #[command(flatten)]
        sources: SourceArgs,
    },

    /// Serve a directory over HTTP with CORS and caching disabled
    Serve {
        /// Directory to serve
        #[arg(long)]
        root: Option<PathBuf>,

        /// Interface to bind
        #[arg(long)]
        host: Option<String>,

        /// Server port
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Args, Default)]
struct SourceArgs {
    /// Animation record directory
    #[arg(long)]
    anim_dir: Option<PathBuf>,

    /// VFX record directory
    #[arg(long)]
    vfx_dir: Option<PathBuf>,
}

/// Log output format.
#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = match cli.verbose {
        0 => "ddoo=info,ddoo_devkit=info",
        1 => "ddoo=debug,ddoo_devkit=debug",
        _ => "ddoo=trace,ddoo_devkit=trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(dir) = &cli.dir {
        std::env::set_current_dir(dir)
            .with_context(|| format!("cannot change to directory '{}'", dir.display()))?;
    }

    let mut config = DevkitConfig::resolve(cli.config.as_deref())?;

    let command = cli.command.unwrap_or(Commands::Bundle {
        sources: SourceArgs::default(),
        output: None,
    });

    match command {
        Commands::Bundle { sources, output } => {
            sources.apply(&mut config);
            if let Some(output) = output {
                config.bundle.output = output;
            }

            let summary = ddoo_devkit::generate_with(&config.bundle)?;
            eprintln!("bundle written: {}", summary.output.display());
            eprintln!("  animations: {}", summary.animations);
            eprintln!("  vfx:        {}", summary.vfx);
        }

        Commands::Index { sources } => {
            sources.apply(&mut config);
            let summary =
                ddoo_devkit::write_manifests(&config.bundle.anim_dir, &config.bundle.vfx_dir)?;
            for manifest in [&summary.animations, &summary.vfx] {
                eprintln!(
                    "wrote {} ({} entries): {}",
                    manifest.path.display(),
                    manifest.entries.len(),
                    manifest.entries.join(", ")
                );
            }
        }

        Commands::Serve { root, host, port } => {
            if let Some(root) = root {
                config.serve.root = root;
            }
            if let Some(host) = host {
                config.serve.host = host;
            }
            if let Some(port) = port {
                config.serve.port = port;
            }

            let serve = config.serve;
            eprintln!("DDOO dev server");
            eprintln!("  serving: {}", serve.root.display());
            eprintln!("  local:   http://localhost:{}/", serve.port);
            eprintln!("  bound:   {}:{}", serve.host, serve.port);
            eprintln!("  press Ctrl+C to stop");

            let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
            rt.block_on(ddoo_devkit::server::serve(&serve))?;
        }
    }

    Ok(())
}

impl SourceArgs {
    fn apply(self, config: &mut DevkitConfig) {
        if let Some(dir) = self.anim_dir {
            config.bundle.anim_dir = dir;
        }
        if let Some(dir) = self.vfx_dir {
            config.bundle.vfx_dir = dir;
        }
    }
}
