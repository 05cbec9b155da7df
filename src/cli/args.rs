//! Command-line interface definitions.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{ColorChoice, Parser, Subcommand};

use crate::core::{BuildMode, Job};

/// Kiln front-end asset builder CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: kiln.toml)
    #[arg(short = 'C', long, global = true, default_value = "kiln.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Minify output and skip source maps
    #[arg(long, global = true, conflicts_with = "development")]
    pub production: bool,

    /// Readable output with source maps (default)
    #[arg(long, global = true)]
    pub development: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands (default: dev)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Clean, build everything, then serve and watch (default)
    #[command(visible_alias = "d")]
    Dev {
        #[command(flatten)]
        serve: ServeArgs,
    },

    /// Clean and build everything once
    #[command(visible_alias = "b")]
    Build,

    /// Build markup pages
    Html,

    /// Build the combined stylesheet
    Css,

    /// Build the combined script
    Js,

    /// Optimize changed images
    Img,

    /// Copy changed fonts
    Fonts,

    /// Generate favicon variants
    Favicon,

    /// Remove everything under the image destination
    #[command(name = "clean-img")]
    CleanImg,

    /// Remove everything under the build root
    #[command(name = "clean-dist")]
    CleanDist,

    /// Serve the build root as it is, without building or watching
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        serve: ServeArgs,
    },

    /// Watch sources and rebuild, with live reload
    #[command(visible_alias = "w")]
    Watch {
        #[command(flatten)]
        serve: ServeArgs,
    },
}

/// Server overrides shared by dev, serve and watch
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
    #[arg(short, long)]
    pub interface: Option<IpAddr>,

    /// Port number to listen on
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl Cli {
    /// Selected subcommand; `dev` when none is given.
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Dev {
            serve: ServeArgs::default(),
        })
    }

    pub const fn mode(&self) -> BuildMode {
        BuildMode::from_flags(self.production)
    }

    /// Server overrides, if the command starts a server.
    pub fn serve_args(&self) -> Option<&ServeArgs> {
        match &self.command {
            Some(Commands::Dev { serve } | Commands::Serve { serve } | Commands::Watch { serve }) => {
                Some(serve)
            }
            _ => None,
        }
    }
}

impl Commands {
    /// The single job this command runs, for the per-job subcommands.
    pub const fn job(&self) -> Option<Job> {
        match self {
            Self::Html => Some(Job::Markup),
            Self::Css => Some(Job::Styles),
            Self::Js => Some(Job::Scripts),
            Self::Img => Some(Job::Images),
            Self::Fonts => Some(Job::Fonts),
            Self::Favicon => Some(Job::Favicon),
            Self::CleanImg => Some(Job::CleanImages),
            Self::CleanDist => Some(Job::CleanDist),
            Self::Dev { .. } | Self::Build | Self::Serve { .. } | Self::Watch { .. } => None,
        }
    }
}
