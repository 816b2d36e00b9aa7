//! # Command Line Interface
//!
//! Defines the CLI structure and command handlers for octonote, including
//! subcommands for embedding issue lists in notes, refreshing them, and
//! working with issues directly.

mod auth;
mod completion;
mod config;
mod creds;
mod embed;
mod issue;
mod labels;
mod render;
mod repos;
mod spec;
mod update;

use anyhow::Result;
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser, Subcommand};
use octonote_core::output::ColorMode;

/// Top-level CLI command for octonote
#[derive(Parser)]
#[command(name = "octonote")]
#[command(display_name = "🐙 Octonote")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "Embed GitHub issue lists into Markdown notes")]
#[command(
  long_about = "Octonote keeps lists of GitHub issues inside your Markdown notes.\n\n\
        Add a github-issues block naming a repository and, optionally, the issues\n\
        you care about. Octonote fetches them and writes a linked list below the\n\
        block. You can also create, comment on and close issues from the terminal."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Controls when colored output is used
  #[arg(
    long,
    value_enum,
    ignore_case = true,
    global = true,
    default_value_t = ColorMode::Auto,
  )]
  pub colors: ColorMode,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for octonote
#[derive(Subcommand)]
pub enum Commands {
  /// Check GitHub authentication
  #[command(long_about = "Verify that the credentials in your .netrc file are accepted by GitHub.")]
  Auth(auth::AuthArgs),

  /// Generate shell completions
  #[command(long_about = "Generates shell completion scripts for octonote commands.\n\n\
            This command generates completion scripts that provide tab completion for\n\
            octonote commands and options in your shell.")]
  Completion(completion::CompletionArgs),

  /// Show or change settings
  #[command(long_about = "Show or change octonote settings.\n\n\
            Settings live in config.toml inside octonote's configuration directory.\n\
            The OCTONOTE_GITHUB_API_URL environment variable overrides api_base_url.")]
  #[command(arg_required_else_help = true)]
  Config(config::ConfigArgs),

  /// Credential management
  #[command(long_about = "Manage GitHub credentials.\n\n\
            Credentials are stored in your .netrc file under machine 'github.com',\n\
            for security and compatibility with other tools.")]
  #[command(arg_required_else_help = true)]
  Creds(creds::CredsArgs),

  /// Add a github-issues block to a note
  #[command(long_about = "Insert a github-issues block into a Markdown note.\n\n\
            Without a repository argument you pick one of your repositories\n\
            interactively. Run 'octonote update' afterwards to fetch the issues.")]
  Embed(embed::EmbedArgs),

  /// Create, inspect, comment on and close issues
  #[command(arg_required_else_help = true)]
  Issue(issue::IssueArgs),

  /// List the labels of a repository
  Labels(labels::LabelsArgs),

  /// Print the issues embedded in a note
  #[command(long_about = "Fetch and print the issues of every github-issues block in a note.\n\n\
            The note itself is not modified.")]
  Render(render::RenderArgs),

  /// List your repositories
  Repos(repos::ReposArgs),

  /// Show which issue numbers a specification selects
  #[command(long_about = "Parse an issue specification such as 'owner/repo #1,3-5' and print\n\
            the issue numbers it selects, in order and without duplicates.")]
  Spec(spec::SpecArgs),

  /// Refresh the issue lists written into a note
  #[command(long_about = "Refresh the materialized issue lists below each github-issues block.\n\n\
            By default blocks refreshed within the cooldown are skipped, and lists whose\n\
            issues and titles are unchanged are left alone. Use --force to rewrite every\n\
            list regardless.")]
  #[command(alias = "up")]
  Update(update::UpdateArgs),
}

pub fn handle_cli(cli: Cli) -> Result<()> {
  // Set global color override based on --colors argument
  match cli.colors {
    ColorMode::Always | ColorMode::Yes => owo_colors::set_override(true),
    ColorMode::Never | ColorMode::No => owo_colors::set_override(false),
    ColorMode::Auto => {
      // Let owo_colors use its default auto-detection
    }
  }

  match cli.command {
    Commands::Auth(auth) => auth::handle_auth_command(auth),
    Commands::Completion(completion) => completion::handle_completion_command(completion),
    Commands::Config(config) => config::handle_config_command(config),
    Commands::Creds(creds) => creds::handle_creds_command(creds),
    Commands::Embed(embed) => embed::handle_embed_command(embed),
    Commands::Issue(issue) => issue::handle_issue_command(issue),
    Commands::Labels(labels) => labels::handle_labels_command(labels),
    Commands::Render(render) => render::handle_render_command(render),
    Commands::Repos(repos) => repos::handle_repos_command(repos),
    Commands::Spec(spec) => spec::handle_spec_command(spec),
    Commands::Update(update) => update::handle_update_command(update),
  }
}
