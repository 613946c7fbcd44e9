use clap::{Parser, Subcommand};

/// This is an election management console: organizations, election wizards and consolidated results.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the console settings: `dataDir`, `userId` and the
    /// consolidation `ratios`. For more information about the file format, read the manual of
    /// the election_model crate.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (directory, optional) Where the organizations and elections are stored. Setting this
    /// option overrides the directory that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub data_dir: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create, list and select organizations.
    #[clap(subcommand)]
    Org(OrgCommand),
    /// Create, list and activate the elections of the current organization.
    #[clap(subcommand)]
    Election(ElectionCommand),
    /// Consolidated results of an election, in JSON format.
    Results {
        /// (election id, optional) Defaults to the active election of the current organization.
        #[clap(short, long, value_parser)]
        election: Option<u64>,
        /// (file path, 'stdout' or empty) If specified, the summary will be written to the given location.
        #[clap(short, long, value_parser)]
        out: Option<String>,
        /// (file path) A reference summary in JSON format. If provided, the console checks that
        /// the consolidated output matches the reference.
        #[clap(short, long, value_parser)]
        reference: Option<String>,
    },
    /// Overview of the current organization and its active election.
    Dashboard,
    /// Forget the current organization.
    Logout,
    /// Remove all the stored organizations and elections.
    Reset,
}

#[derive(Subcommand, Debug, Clone)]
pub enum OrgCommand {
    /// Create an organization and select it.
    Create {
        #[clap(long, value_parser)]
        name: String,
        /// territorial or professional
        #[clap(long = "type", value_parser)]
        org_type: String,
        #[clap(long, value_parser)]
        description: Option<String>,
    },
    List,
    /// Select the organization with the given id.
    Select {
        #[clap(value_parser)]
        id: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ElectionCommand {
    /// Run the election wizard over a JSON draft and store the result as the active election.
    Create {
        /// (file path) The draft: the wizard fields (camelCase) plus an optional `candidates` array.
        #[clap(long, value_parser)]
        draft: String,
    },
    List,
    /// Make the election with the given id the active one.
    Activate {
        #[clap(value_parser)]
        id: u64,
    },
}
