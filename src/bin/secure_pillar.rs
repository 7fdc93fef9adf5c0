// src/bin/secure_pillar.rs
//! secure-pillar command line: manage PGP secrets in Salt pillar files
//!
//! CAVEAT: files with `include:` statements are rejected, never rewritten.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use secure_pillar::config::{self, Config, ENV_CONFIG};
use secure_pillar::core::{node, write_sls_file};
use secure_pillar::{
    rotate_file, sweep_dir, Action, Destination, Node, Pillar, Pki, Rotator, Scalar, Secret,
};

#[derive(Parser)]
#[command(name = "secure-pillar", version)]
#[command(about = "Manage PGP-encrypted values in Salt pillar files", long_about = None)]
struct Cli {
    /// PGP public keyring
    #[arg(long = "pubring", visible_alias = "pub", global = true)]
    pubring: Option<PathBuf>,

    /// PGP private keyring
    #[arg(long = "secring", visible_alias = "sec", global = true)]
    secring: Option<PathBuf>,

    /// PGP key name, email, or ID to use for encryption
    #[arg(short = 'k', long = "pgp-key", visible_alias = "pgp_key", global = true)]
    pgp_key: Option<String>,

    /// Top level element under which encrypted key/value pairs are kept
    #[arg(short = 'e', long = "element", global = true)]
    element: Option<String>,

    /// Config file (TOML)
    #[arg(long, env = ENV_CONFIG, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new sls file
    #[command(visible_alias = "c")]
    Create {
        /// Output file (defaults to STDOUT)
        #[arg(short = 'o', long = "outfile")]
        outfile: Option<PathBuf>,

        #[command(flatten)]
        secrets: SecretArgs,
    },

    /// Update the value of the given key in the given file
    #[command(visible_alias = "u")]
    Update {
        /// Input file, rewritten in place (defaults to STDIN -> STDOUT)
        #[arg(short = 'f', long = "file")]
        file: Option<PathBuf>,

        #[command(flatten)]
        secrets: SecretArgs,
    },

    /// Perform encryption operations
    #[command(visible_alias = "e", subcommand)]
    Encrypt(EncryptCommand),

    /// Perform decryption operations
    #[command(visible_alias = "d", subcommand)]
    Decrypt(ReadCommand),

    /// Decrypt existing files and re-encrypt with a new key
    #[command(visible_alias = "r")]
    Rotate {
        /// Recurse over all sls files in the given directory
        #[arg(short = 'd', long = "dir", required_unless_present = "file")]
        dir: Option<PathBuf>,

        /// Single input file
        #[arg(short = 'f', long = "file", alias = "infile", conflicts_with = "dir")]
        file: Option<PathBuf>,
    },

    /// Show PGP key IDs used
    #[command(visible_alias = "k", subcommand)]
    Keys(ReadCommand),
}

#[derive(Subcommand)]
enum EncryptCommand {
    /// Encrypt all plain text values in a file
    All(FileArgs),
    /// Encrypt every sls file under a directory, in place
    Recurse(DirArgs),
}

#[derive(Subcommand)]
enum ReadCommand {
    /// Apply to all values in a file
    All(FileArgs),
    /// Apply to every sls file under a directory
    Recurse(DirArgs),
    /// Apply to the value at a YAML path
    Path(PathArgs),
}

#[derive(Args)]
struct FileArgs {
    /// Input file (defaults to STDIN)
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// Output file (defaults to STDOUT)
    #[arg(short = 'o', long = "outfile")]
    outfile: Option<PathBuf>,

    /// Update the input file in place
    #[arg(short = 'u', long = "update", conflicts_with = "outfile")]
    update: bool,
}

#[derive(Args)]
struct DirArgs {
    #[arg(short = 'd', long = "dir")]
    dir: PathBuf,
}

#[derive(Args)]
struct PathArgs {
    /// Input file (defaults to STDIN)
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// YAML path, colon delimited ("some:yaml:path")
    #[arg(short = 'p', long = "path")]
    path: String,
}

#[derive(Args)]
struct SecretArgs {
    /// Secret name(s), colon delimited paths
    #[arg(short = 'n', long = "name")]
    names: Vec<String>,

    /// Secret value(s), paired with names in order
    #[arg(short = 's', long = "value")]
    values: Vec<String>,
}

impl SecretArgs {
    fn secrets(&self) -> Vec<Secret> {
        if self.values.len() > self.names.len() {
            warn!(
                "{} values without a name are ignored",
                self.values.len() - self.names.len()
            );
        }
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| Secret::new(name, self.values.get(i).cloned().unwrap_or_default()))
            .collect()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;
    let pki = Pki::new(&config.keys).context("Failed to load PGP keyrings")?;
    let pillar = Pillar::from_config(pki, &config);

    match cli.command {
        Commands::Create { outfile, secrets } => {
            let buffer = pillar.create(&secrets.secrets())?;
            write_sls_file(&buffer, &destination(outfile))?;
        }
        Commands::Update { file, secrets } => {
            let buffer = match &file {
                Some(path) => pillar.update(path, &secrets.secrets())?,
                None => pillar.update_bytes(&read_stdin()?, &secrets.secrets())?,
            };
            write_sls_file(&buffer, &destination(file))?;
        }
        Commands::Encrypt(EncryptCommand::All(args)) => {
            file_action(&pillar, &args, Action::Encrypt)?;
        }
        Commands::Encrypt(EncryptCommand::Recurse(args)) => {
            recurse_action(&pillar, &args.dir, Action::Encrypt)?;
        }
        Commands::Decrypt(command) => read_action(&pillar, command, Action::Decrypt)?,
        Commands::Keys(command) => read_action(&pillar, command, Action::Identify)?,
        Commands::Rotate { dir, file } => match (file, dir) {
            (Some(file), _) => {
                rotate_file(&pillar, &file)
                    .with_context(|| format!("Failed to rotate {}", file.display()))?;
                info!("rotated {}", file.display());
            }
            (None, Some(dir)) => {
                let report = Rotator::from_config(&pillar, &config).rotate_dir(&dir)?;
                if !report.failed.is_empty() {
                    bail!("{} files failed to rotate", report.failed.len());
                }
            }
            (None, None) => bail!("rotate needs --dir or --file"),
        },
    }

    Ok(())
}

/// Config file, then environment, then command-line flags
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::load_from(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            config.apply_env();
            config
        }
        None => config::load().context("Failed to read config")?,
    };

    if let Some(pubring) = &cli.pubring {
        config.keys.public_keyring = pubring.clone();
    }
    if let Some(secring) = &cli.secring {
        config.keys.secret_keyring = secring.clone();
    }
    if let Some(key) = &cli.pgp_key {
        config.keys.pgp_key_name = Some(key.clone());
    }
    if let Some(element) = &cli.element {
        config.pillar.top_level_element = Some(element.clone());
    }
    Ok(config)
}

fn file_action(pillar: &Pillar<Pki>, args: &FileArgs, action: Action) -> Result<()> {
    let buffer = match &args.file {
        Some(path) => pillar.apply(path, action)?,
        None => pillar.apply_bytes(&read_stdin()?, action)?,
    };

    let out = match (&args.file, args.update) {
        (Some(file), true) => Some(file.clone()),
        (None, true) => bail!("--update needs --file"),
        _ => args.outfile.clone(),
    };
    write_sls_file(&buffer, &destination(out))?;
    Ok(())
}

fn read_action(pillar: &Pillar<Pki>, command: ReadCommand, action: Action) -> Result<()> {
    match command {
        ReadCommand::All(args) => {
            if action == Action::Identify && args.update {
                bail!("--update cannot be used with keys");
            }
            file_action(pillar, &args, action)
        }
        ReadCommand::Recurse(args) => recurse_action(pillar, &args.dir, action),
        ReadCommand::Path(args) => {
            let found = match &args.file {
                Some(file) => pillar.value_at_path(file, &args.path, action)?,
                None => pillar.value_at_path_bytes(&read_stdin()?, &args.path, action)?,
            };
            if let Some(node) = found {
                println!("{}: {}", args.path, render(&node)?);
            }
            Ok(())
        }
    }
}

fn recurse_action(pillar: &Pillar<Pki>, dir: &Path, action: Action) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    let report = sweep_dir(pillar, dir, action, &mut stdout)?;
    if !report.failed.is_empty() {
        warn!(
            "{} of {} files skipped",
            report.failed.len(),
            report.total()
        );
    }
    Ok(())
}

fn destination(path: Option<PathBuf>) -> Destination {
    match path {
        Some(path) if path.as_os_str() != "-" => Destination::File(path),
        _ => Destination::Stdout,
    }
}

fn read_stdin() -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buf)
        .context("Failed to read STDIN")?;
    Ok(buf)
}

/// Plain strings print bare, anything else as YAML
fn render(node: &Node) -> Result<String> {
    match node {
        Node::Scalar(Scalar::String(s)) => Ok(s.clone()),
        other => Ok(String::from_utf8(node::serialize(other)?)?
            .trim_end()
            .to_string()),
    }
}
