use clap::{Parser, Subcommand};
use quire::generate::GenerateOptions;
use quire::{config, generate, output, scan};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quire")]
#[command(about = "Static site compiler for Markdown notes")]
#[command(long_about = "\
Static site compiler for Markdown notes

The directory tree is the site map. Numbered directories become sections,
underscore directories become categories, and every Markdown file becomes a
page with a generated table of contents.

Content structure:

  content/
  ├── config.toml                  # Site config (required, needs base_url)
  ├── redirects.toml               # [[redirect]] from/to pairs (optional)
  ├── index.md                     # → index.html
  ├── 1_blog/                      # Section \"Blog\", sorted by its number
  │   └── _notes/                  # Category \"Notes\"
  │       ├── post.md              # → blog/notes/post.html
  │       └── diagram.png          # copied → blog/notes/diagram.png
  └── 2_work/
      └── _clients/_acme/          # Category \"Acme\" nested under \"Clients\"
          └── case-study.md

Front matter (all optional):
  title, intro, description, tags, date, ogimage, ogtype

Run 'quire gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory (deleted and rebuilt on every build)
    #[arg(long, default_value = "out", global = true)]
    output: PathBuf,

    /// Log progress at info level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the site: scan, render, write
    Build,
    /// Validate the content directory without writing anything
    Check,
    /// Print the discovered site model as JSON
    Scan,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Build => {
            let site_config = config::load_config(&cli.source)?;
            let redirects = config::load_redirects(&cli.source)?;
            init_thread_pool(&site_config.processing);

            println!("==> Scanning {}", cli.source.display());
            let result = scan::scan(&cli.source, &cli.output, &site_config)?;

            println!("==> Generating HTML \u{2192} {}", cli.output.display());
            let report = generate::generate(
                &result,
                &site_config,
                &redirects,
                &GenerateOptions {
                    source: cli.source.clone(),
                    output: cli.output.clone(),
                },
            )?;
            output::print_generate_output(&result, &report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let site_config = config::load_config(&cli.source)?;
            let redirects = config::load_redirects(&cli.source)?;
            init_thread_pool(&site_config.processing);
            let result = scan::scan(&cli.source, &cli.output, &site_config)?;
            result.check_redirects(&redirects)?;
            output::print_scan_output(&result, &cli.source);
            output::print_check_output(&result);
        }
        Command::Scan => {
            let site_config = config::load_config(&cli.source)?;
            init_thread_pool(&site_config.processing);
            let result = scan::scan(&cli.source, &cli.output, &site_config)?;
            println!("{}", serde_json::to_string_pretty(&result.site)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr so `scan` output stays valid JSON.
///
/// `--verbose` enables INFO level, otherwise use RUST_LOG or default to WARN.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
