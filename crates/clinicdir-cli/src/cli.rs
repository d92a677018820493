use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "clinicdir")]
#[command(about = "clinicdir CLI: search the clinic network's doctor directory")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Server base URL (overrides config and CLINICDIR_URL env var)
    #[arg(short, long, global = true, env = "CLINICDIR_URL")]
    pub server: Option<String>,

    /// Config profile name
    #[arg(short, long, global = true, env = "CLINICDIR_PROFILE", default_value = "default")]
    pub profile: String,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search doctors by rating, hospital, department and text
    Search(SearchArgs),
    /// List hospitals
    Hospitals,
    /// List departments
    Departments,
    /// Re-read a collection from the store and overwrite the cache
    Refresh(RefreshArgs),
    /// Start an admin session
    Login(LoginArgs),
    /// End the admin session and remove the stored token
    Logout,
    /// Show the stored admin session
    Whoami,
    /// Check server health
    Status,
    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(clap::Args, Default)]
pub struct SearchArgs {
    /// Rating code (A-D) or "all"
    #[arg(long)]
    pub rating: Option<String>,
    /// Hospital id or "all"
    #[arg(long)]
    pub hospital: Option<String>,
    /// Department id or "all"
    #[arg(long)]
    pub department: Option<String>,
    /// Case-insensitive text matched against name and specialty
    #[arg(short, long)]
    pub query: Option<String>,
    /// Also drop doctors whose department does not resolve
    #[arg(long)]
    pub strict: bool,
    /// Show one page of results
    #[arg(long)]
    pub page: Option<usize>,
    /// Page size used with --page
    #[arg(long, default_value_t = 10)]
    pub page_size: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Collection {
    Doctors,
    Hospitals,
    Departments,
}

impl Collection {
    pub fn path(self) -> &'static str {
        match self {
            Self::Doctors => "doctors",
            Self::Hospitals => "hospitals",
            Self::Departments => "departments",
        }
    }
}

#[derive(clap::Args)]
pub struct RefreshArgs {
    /// Collection to refresh
    pub entity: Collection,
}

#[derive(clap::Args)]
pub struct LoginArgs {
    /// Admin name
    #[arg(short, long)]
    pub name: Option<String>,
    /// Password
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current config
    Show,
    /// Set config value
    Set(ConfigSetArgs),
}

#[derive(clap::Args)]
pub struct ConfigSetArgs {
    /// Key to set (server, format)
    pub key: String,
    /// Value
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_flags() {
        let cli = Cli::parse_from([
            "clinicdir", "search", "--rating", "a", "--hospital", "h1", "-q", "kim", "--strict",
            "--page", "2",
        ]);
        let Commands::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.rating.as_deref(), Some("a"));
        assert_eq!(args.hospital.as_deref(), Some("h1"));
        assert_eq!(args.query.as_deref(), Some("kim"));
        assert!(args.strict);
        assert_eq!(args.page, Some(2));
        assert_eq!(args.page_size, 10);
    }

    #[test]
    fn refresh_takes_collection_names() {
        let cli = Cli::parse_from(["clinicdir", "refresh", "hospitals"]);
        let Commands::Refresh(args) = cli.command else {
            panic!("expected refresh");
        };
        assert_eq!(args.entity.path(), "hospitals");
        assert!(Cli::try_parse_from(["clinicdir", "refresh", "admins"]).is_err());
    }
}
