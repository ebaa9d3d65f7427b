use clap::{Parser, Subcommand};
use photofeed::build::{self, BuildError};
use photofeed::config::{self, ConfigError, SiteConfig};
use photofeed::serve::{self, ServeError, ServerConfig};
use photofeed::output;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "photofeed")]
#[command(about = "Static site generator for a single-page photo feed")]
#[command(long_about = "\
Static site generator for a single-page photo feed

Project layout (paths configurable in config.toml):

  .
  ├── config.toml           # Optional
  ├── source/
  │   ├── index.json        # { \"posts\": [{ \"title\", \"caption\", \"image\" }] }
  │   └── images/           # Originals (.jpg / .jpeg)
  ├── template/
  │   └── index.html        # Handlebars template, sees `posts`
  └── public/               # Output: index.html + images/ (1440px wide)

Photos in source/images/ that no post references are added to the top of
index.json as placeholder posts. Output images that already exist are never
re-encoded; delete them to force a rebuild.

Without a subcommand, builds and then serves the output.")]
#[command(version)]
struct Cli {
    /// Project root; configured paths are relative to it
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file, relative to the project root
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Override the configured server port
    #[arg(long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Register new photos, render the page and publish images
    Build,
    /// Serve the output directory without building
    Serve,
    /// List photos that are not in the index yet, without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        None => {
            let site = load_site(&cli.root, &cli.config)?;
            // A failed build still serves whatever output exists.
            if let Err(e) = run_build(&site) {
                eprintln!("Build failed: {e}");
            }
            run_serve(&site, cli.port)?;
        }
        Some(Command::Build) => run_build(&load_site(&cli.root, &cli.config)?)?,
        Some(Command::Serve) => run_serve(&load_site(&cli.root, &cli.config)?, cli.port)?,
        Some(Command::Check) => {
            let site = load_site(&cli.root, &cli.config)?;
            let pending = build::check(&site.paths)?;
            output::print_check(&pending);
        }
        Some(Command::GenConfig) => print!("{}", config::stock_config_toml()),
    }

    Ok(())
}

fn load_site(root: &Path, config_file: &Path) -> Result<SiteConfig, ConfigError> {
    let site = config::load_config(&root.join(config_file))?.resolve(root);
    log::debug!("{:?}", site);
    Ok(site)
}

fn run_build(site: &SiteConfig) -> Result<(), BuildError> {
    println!("==> Building {}", site.paths.output_html.display());
    let report = build::build(&site.paths)?;
    output::print_build_report(&report);
    Ok(())
}

fn run_serve(site: &SiteConfig, port: Option<u16>) -> Result<(), ServeError> {
    let mut server_config = ServerConfig::from(&site.server);
    if let Some(port) = port {
        server_config.port = port;
    }
    println!(
        "{}",
        output::format_serve_banner(&server_config.root, &server_config.socket_addr())
    );
    serve::serve(&server_config)
}
