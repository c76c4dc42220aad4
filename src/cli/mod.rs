//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod ask;
pub mod settings;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{debug, warn};

use crate::app::App;
use crate::book::NavTree;
use crate::cli::ask::ask;
use crate::cli::settings::{set_value, unset_value};
use crate::core::backend::HttpBackend;
use crate::core::config::data::path_display;
use crate::core::config::{Config, ConfigOverrides};
use crate::core::endpoint::QueryMode;
use crate::core::widget::ChatWidget;
use crate::ui::chat_loop::run_chat;
use crate::utils::diagnostics::{self, DiagnosticsSink};
use crate::utils::logging::LoggingState;
use crate::utils::url::validate_endpoint_url;

#[derive(Parser)]
#[command(name = "bookchat")]
#[command(version)]
#[command(about = "Read the Physical AI & Humanoid Robotics book outline and ask its AI assistant")]
#[command(
    long_about = "bookchat shows the outline of the Physical AI & Humanoid Robotics book with a \
chat panel that sends questions to the book's question-answering backend.\n\n\
Environment Variables:\n\
  BOOKCHAT_BOOK_ID            Book identifier sent with full-book queries\n\
  BOOKCHAT_MODE               Initial query mode (full or selected)\n\
  BOOKCHAT_FULL_ENDPOINT      URL answering full-book queries\n\
  BOOKCHAT_SELECTED_ENDPOINT  URL answering selected-text queries\n\
  BOOKCHAT_LEGACY_ENDPOINT    URL of a single {question} -> {answer} endpoint\n\
  BOOKCHAT_LOG                tracing filter for diagnostics (e.g. bookchat=debug)\n\n\
Controls:\n\
  Ctrl+O            Open or close the chat panel\n\
  Tab               Switch between full-book and selected-text mode\n\
  Enter             Send the message\n\
  Up/Down           Scroll the outline or the transcript\n\
  Ctrl+C            Quit the application\n\n\
Commands:\n\
  /mode [mode]      Show or switch the query mode\n\
  /select [text]    Record (or clear) the selected passage\n\
  /log <filename>   Enable logging to specified file\n\
  /log              Toggle logging pause/resume"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Append the transcript to the specified file
    #[arg(short = 'l', long, global = true)]
    pub log: Option<String>,

    /// Book identifier sent with full-book queries
    #[arg(long, global = true)]
    pub book_id: Option<String>,

    /// Initial query mode (full or selected)
    #[arg(short = 'm', long, global = true)]
    pub mode: Option<QueryMode>,

    /// URL answering full-book queries
    #[arg(long, global = true, value_name = "URL", value_parser = validate_endpoint_url)]
    pub full_endpoint: Option<String>,

    /// URL answering selected-text queries
    #[arg(long, global = true, value_name = "URL", value_parser = validate_endpoint_url)]
    pub selected_endpoint: Option<String>,

    /// URL of a single question/answer endpoint serving every mode
    #[arg(long, global = true, value_name = "URL", value_parser = validate_endpoint_url)]
    pub legacy_endpoint: Option<String>,

    /// Read and write configuration at this path instead of the default
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the outline and chat interface (default)
    Chat,
    /// Ask a single question and print the reply
    Ask {
        /// Passage to ask about in selected-text mode
        #[arg(short = 's', long)]
        selection: Option<String>,
        /// The question (multiple words are joined with spaces)
        #[arg(required = true, trailing_var_arg = true)]
        question: Vec<String>,
    },
    /// Print the book's navigation outline
    Toc,
    /// Print the effective configuration
    Config {
        /// Print only the configuration file path
        #[arg(long)]
        path: bool,
    },
    /// Set a configuration value
    Set {
        /// One of: book-id, default-mode, full-endpoint, selected-endpoint, legacy-endpoint
        key: String,
        /// Value to store
        value: String,
    },
    /// Remove a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            book_id: self.book_id.clone(),
            mode: self.mode,
            full_endpoint: self.full_endpoint.clone(),
            selected_endpoint: self.selected_endpoint.clone(),
            legacy_endpoint: self.legacy_endpoint.clone(),
        }
    }

    fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::get_config_path)
    }
}

/// File settings with environment and then command-line values layered on top.
pub fn effective_config(file: Config, env: ConfigOverrides, cli: ConfigOverrides) -> Config {
    let mut config = file;
    env.merged_with(cli).apply(&mut config);
    config
}

fn load_nav(config: &Config) -> NavTree {
    match &config.nav_file {
        Some(path) => match NavTree::load_from_path(path) {
            Ok(tree) => tree,
            Err(e) => {
                warn!(error = %e, "falling back to the built-in outline");
                NavTree::builtin()
            }
        },
        None => NavTree::builtin(),
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    if let Err(e) = runtime.block_on(async_main()) {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
    Ok(())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let mut args = Args::parse();
    let command = args.command.take().unwrap_or(Commands::Chat);

    let sink = match command {
        Commands::Chat => DiagnosticsSink::File(diagnostics::default_log_file()),
        _ => DiagnosticsSink::Stderr,
    };
    diagnostics::init(sink)?;

    let config_path = args.config_path();
    let file_config = Config::load_from_path(&config_path)?;
    debug!(path = %path_display(&config_path), "configuration loaded");

    match command {
        Commands::Set { key, value } => {
            let mut config = file_config;
            let message = set_value(&mut config, &key, &value)?;
            config.save_to_path(&config_path)?;
            println!("{message}");
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = file_config;
            let message = unset_value(&mut config, &key)?;
            config.save_to_path(&config_path)?;
            println!("{message}");
            Ok(())
        }
        Commands::Config { path } => {
            if path {
                println!("{}", path_display(&config_path));
            } else {
                let config =
                    effective_config(file_config, ConfigOverrides::from_env()?, args.overrides());
                config.print_all();
            }
            Ok(())
        }
        Commands::Toc => {
            let config = effective_config(file_config, ConfigOverrides::from_env()?, args.overrides());
            let nav = load_nav(&config);
            for line in nav.render_lines() {
                println!("{line}");
            }
            if !nav.footer.is_empty() {
                println!();
                for link in &nav.footer {
                    println!("{}: {}", link.label, link.href);
                }
            }
            Ok(())
        }
        Commands::Ask {
            selection,
            question,
        } => {
            let config = effective_config(file_config, ConfigOverrides::from_env()?, args.overrides());
            let logging = LoggingState::new(args.log.clone())?;
            let reply = ask(
                config.endpoint_table(),
                config.mode(),
                selection,
                &question.join(" "),
                &HttpBackend::new(),
                &logging,
            )
            .await?;
            println!("{reply}");
            Ok(())
        }
        Commands::Chat => {
            let config = effective_config(file_config, ConfigOverrides::from_env()?, args.overrides());
            let logging = LoggingState::new(args.log.clone())?;
            let widget = ChatWidget::with_mode(config.endpoint_table(), config.mode());
            let app = App::new(widget, load_nav(&config), config.book_info(), logging);
            run_chat(app, Arc::new(HttpBackend::new())).await
        }
    }
}
