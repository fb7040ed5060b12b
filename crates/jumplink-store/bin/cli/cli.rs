use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const STORAGE_BACKEND_ENV: &str = "JUMPLINK_STORAGE_BACKEND";
pub const FILE_PATH_ENV: &str = "JUMPLINK_FILE_PATH";
pub const DB_PATH_ENV: &str = "JUMPLINK_DB_PATH";
pub const SLUG_STYLE_ENV: &str = "JUMPLINK_SLUG_STYLE";
pub const SLUG_LENGTH_ENV: &str = "JUMPLINK_SLUG_LENGTH";
pub const MAX_ATTEMPTS_ENV: &str = "JUMPLINK_MAX_ATTEMPTS";
pub const BASE_URL_ENV: &str = "JUMPLINK_BASE_URL";

pub const DEFAULT_FILE_PATH: &str = "./urls.csv";
pub const DEFAULT_DB_PATH: &str = "./urls.sqlite";
pub const DEFAULT_SLUG_LENGTH: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "flat-file")]
    FlatFile,
    #[value(name = "sqlite")]
    Sqlite,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::FlatFile => write!(f, "flat-file"),
            StorageBackendArg::Sqlite => write!(f, "sqlite"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SlugStyleArg {
    /// Random lowercase letters and digits.
    #[value(name = "uid")]
    Uid,
    /// Readable `adjective-name` pairs.
    #[value(name = "pair")]
    Pair,
}

impl Display for SlugStyleArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SlugStyleArg::Uid => write!(f, "uid"),
            SlugStyleArg::Pair => write!(f, "pair"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "jumplink", about = "Manage short links")]
pub struct CLI {
    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::FlatFile
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = FILE_PATH_ENV, default_value = DEFAULT_FILE_PATH)]
    pub file_path: PathBuf,

    #[arg(long, env = DB_PATH_ENV, default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    #[arg(
        long,
        env = SLUG_STYLE_ENV,
        value_enum,
        default_value_t = SlugStyleArg::Uid
    )]
    pub slug_style: SlugStyleArg,

    /// Length of generated `uid` codes and of `pair` fallback codes.
    #[arg(
        long,
        env = SLUG_LENGTH_ENV,
        default_value_t = DEFAULT_SLUG_LENGTH,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub slug_length: u32,

    /// Stop generating after this many taken codes. Unbounded when unset.
    #[arg(
        long,
        env = MAX_ATTEMPTS_ENV,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_attempts: Option<u32>,

    /// Prefix used to print full short URLs.
    #[arg(long, env = BASE_URL_ENV)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shorten a URL.
    Add {
        long_url: String,
        /// Use this code instead of generating one.
        #[arg(long)]
        code: Option<String>,
    },
    /// Show the link stored under a code.
    Get { code: String },
    /// Look up a code and count a visit.
    Resolve { code: String },
    /// List stored links.
    List {
        /// Show one page, newest links on page 1.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        page: Option<u32>,
        #[arg(
            long,
            default_value_t = jumplink_core::Page::DEFAULT_SIZE,
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        page_size: u32,
        /// Print records as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Count a visit without looking the link up.
    Hit { code: String },
    /// Remove a link.
    Delete { code: String },
}
