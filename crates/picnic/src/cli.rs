//! Clap derive structures for the `picnic` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only clap and clap_complete may be used here: `build.rs` includes this
//! file directly to render man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// picnic -- shop at the Picnic grocery storefront from the command line
#[derive(Debug, Parser)]
#[command(
    name = "picnic",
    version,
    about = "Search, inspect, and shop the Picnic grocery storefront",
    long_about = "A CLI for the Picnic grocery storefront.\n\n\
        Looks up products, recipes, and categories, resolves barcodes,\n\
        and manages the cart and deliveries of a logged-in account.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Account profile to use
    #[arg(long, short = 'p', env = "PICNIC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Config file (overrides the platform default location)
    #[arg(long, env = "PICNIC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Market country code, e.g. NL or DE (overrides profile)
    #[arg(long, short = 'c', env = "PICNIC_COUNTRY", global = true)]
    pub country: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PICNIC_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "PICNIC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session token
    Login(LoginArgs),

    /// Show the logged-in user's profile
    User,

    /// Search products
    #[command(alias = "s")]
    Search(SearchArgs),

    /// Look up articles
    #[command(alias = "a")]
    Article(ArticleArgs),

    /// Resolve a GTIN/EAN barcode to an article
    Barcode(BarcodeArgs),

    /// Search and inspect recipes
    #[command(alias = "r")]
    Recipes(RecipesArgs),

    /// Show the store catalog as a tree
    Categories(CategoriesArgs),

    /// Manage the shopping cart
    Cart(CartArgs),

    /// Inspect deliveries and delivery slots
    #[command(alias = "d")]
    Deliveries(DeliveriesArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Login ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account e-mail address (overrides profile)
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Do not store the session token in the system keyring
    #[arg(long)]
    pub no_store: bool,
}

// ── Search ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Search term
    #[arg(required = true, num_args = 1..)]
    pub term: Vec<String>,
}

// ── Articles ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ArticleArgs {
    #[command(subcommand)]
    pub command: ArticleCommand,
}

#[derive(Debug, Subcommand)]
pub enum ArticleCommand {
    /// Name of an article
    Show {
        /// Article ID (e.g. s1001234)
        id: String,
    },

    /// Full product page details (ingredients, nutrition, images, ...)
    Details {
        /// Article ID
        id: String,
    },

    /// Category an article is filed under
    Category {
        /// Article ID
        id: String,
    },
}

// ── Barcode ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BarcodeArgs {
    /// GTIN/EAN code as printed under the barcode
    pub code: String,

    /// Maximum redirect hops to follow
    #[arg(long, default_value = "5")]
    pub max_redirects: u32,
}

// ── Recipes ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RecipesArgs {
    #[command(subcommand)]
    pub command: RecipesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RecipesCommand {
    /// Search recipes
    Search {
        /// Search term
        #[arg(required = true, num_args = 1..)]
        term: Vec<String>,
    },

    /// Show a recipe's ingredients, utensils, and instructions
    Show {
        /// Recipe ID
        id: String,
    },
}

// ── Categories ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CategoriesArgs {
    /// Catalog levels to expand below the top
    #[arg(long, short = 'd', default_value = "0")]
    pub depth: u32,
}

// ── Cart ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Show the cart
    Show,

    /// Add a product to the cart
    Add {
        /// Product (selling unit) ID
        product_id: String,

        /// Number of items
        #[arg(long, short = 'n', default_value = "1")]
        count: u32,
    },

    /// Remove a product from the cart
    Remove {
        /// Product (selling unit) ID
        product_id: String,

        /// Number of items
        #[arg(long, short = 'n', default_value = "1")]
        count: u32,
    },

    /// Empty the cart
    Clear,
}

// ── Deliveries ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DeliveriesArgs {
    #[command(subcommand)]
    pub command: DeliveriesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DeliveriesCommand {
    /// List delivery summaries
    List {
        /// Only deliveries that are not completed yet
        #[arg(long, conflicts_with = "filter")]
        current: bool,

        /// Status filter passed to the storefront (repeatable)
        #[arg(long)]
        filter: Vec<String>,
    },

    /// Show one delivery
    Show {
        /// Delivery ID
        id: String,
    },

    /// Driver route scenario for a delivery
    Scenario {
        /// Delivery ID
        id: String,
    },

    /// Live driver position for a delivery
    Position {
        /// Delivery ID
        id: String,
    },

    /// Delivery slots available for the current cart
    Slots,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Show the current configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles (default marked with *)
    Profiles,

    /// Make a profile the default
    Use {
        /// Profile name
        name: String,
    },

    /// Store a profile's password in the system keyring
    SetPassword,

    /// Store a session token in the system keyring
    SetToken,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
