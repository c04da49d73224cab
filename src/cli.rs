//! Command-line interface definition

use crate::config::{Network, NETWORK_ENV_VAR};
use crate::types::MetadataType;
use clap::{Args, Parser, Subcommand};

/// Immutable X command-line toolkit
#[derive(Parser, Debug)]
#[command(name = "imx", version, about, long_about = None)]
pub struct Cli {
    /// Network to connect to (mainnet, ropsten or sandbox)
    #[arg(
        short,
        long,
        global = true,
        env = NETWORK_ENV_VAR,
        default_value = "sandbox"
    )]
    pub network: Network,

    /// Override the API base URL of the selected network
    #[arg(long, global = true, env = "IMX_API_URL", hide = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level command groups
#[derive(Subcommand, Debug)]
pub enum Command {
    /// User registration and lookup
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
    /// Project management
    Projects {
        #[command(subcommand)]
        command: ProjectsCommand,
    },
    /// Collection management
    Collections {
        #[command(subcommand)]
        command: CollectionsCommand,
    },
    /// Collection metadata schema management
    Metadata {
        #[command(subcommand)]
        command: MetadataCommand,
    },
    /// Minting
    Mints {
        #[command(subcommand)]
        command: MintsCommand,
    },
    /// Order queries
    Orders {
        #[command(subcommand)]
        command: OrdersCommand,
    },
    /// Trade queries
    Trades {
        #[command(subcommand)]
        command: TradesCommand,
    },
    /// Asset queries
    Assets {
        #[command(subcommand)]
        command: AssetsCommand,
    },
    /// Balance queries
    Balances {
        #[command(subcommand)]
        command: BalancesCommand,
    },
}

/// Credentials for commands that sign requests
#[derive(Args, Debug, Clone)]
pub struct SignerArgs {
    /// Private key of the signing wallet
    #[arg(
        short = 'k',
        long = "private-key",
        alias = "privateKey",
        env = "PRIVATE_KEY",
        hide_env_values = true
    )]
    pub private_key: String,

    /// Alchemy API key; accepted for compatibility, no L1 node is contacted
    #[arg(
        short = 'a',
        long = "alchemy-api-key",
        alias = "alchemyApiKey",
        env = "ALCHEMY_API_KEY",
        hide_env_values = true
    )]
    pub alchemy_api_key: Option<String>,
}

/// Options shared by list commands
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Fail instead of fetching more than this many pages
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Print only the number of records
    #[arg(long)]
    pub summary: bool,
}

/// `imx users` actions
#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// Register the wallet's user off-chain
    Register {
        #[command(flatten)]
        signer: SignerArgs,

        /// STARK public key to register
        #[arg(long, alias = "starkKey")]
        stark_key: String,

        /// STARK signature over the registration payload hash
        #[arg(long, alias = "starkSignature")]
        stark_signature: Option<String>,
    },
    /// Show a registered user
    Get {
        /// Wallet address
        #[arg(short, long)]
        address: String,
    },
}

/// `imx projects` actions
#[derive(Subcommand, Debug)]
pub enum ProjectsCommand {
    /// Create a project
    Create {
        #[command(flatten)]
        signer: SignerArgs,

        /// Name of the project
        #[arg(short = 'p', long = "project-name", alias = "projectName")]
        project_name: String,

        /// Name of the company
        #[arg(short = 'c', long = "company-name", alias = "companyName")]
        company_name: String,

        /// Email of the company contact
        #[arg(short = 'e', long = "contact-email", alias = "contactEmail")]
        contact_email: String,
    },
}

/// `imx collections` actions
#[derive(Subcommand, Debug)]
pub enum CollectionsCommand {
    /// Create a collection
    Create {
        #[command(flatten)]
        signer: SignerArgs,

        /// Ethereum address of the ERC721 contract
        #[arg(short = 'c', long = "contract-address", alias = "contractAddress")]
        contract_address: String,

        /// Name of the collection
        #[arg(long)]
        name: String,

        /// Public key of the owner of the contract
        #[arg(short = 'o', long = "owner-public-key", alias = "ownerPublicKey")]
        owner_public_key: String,

        /// Numeric project ID of the collection
        #[arg(short = 'p', long = "project-id", alias = "projectId")]
        project_id: u64,

        /// Base URL of the token metadata API
        #[arg(long = "metadata-api-url", alias = "metadataApiUrl")]
        metadata_api_url: Option<String>,
    },
}

/// `imx metadata` actions
#[derive(Subcommand, Debug)]
pub enum MetadataCommand {
    /// Add a property to a collection's metadata schema
    Post {
        #[command(flatten)]
        signer: SignerArgs,

        /// Address of the collection
        #[arg(short = 'c', long = "collection-address", alias = "collectionAddress")]
        collection_address: String,

        /// Property name
        #[arg(short = 'm', long)]
        name: String,

        /// Property type
        #[arg(short = 't', long = "type", value_enum, default_value_t = MetadataType::Boolean)]
        field_type: MetadataType,

        /// Make the property filterable
        #[arg(short = 'f', long)]
        filterable: bool,
    },
    /// Update an existing property of a collection's metadata schema
    Update {
        #[command(flatten)]
        signer: SignerArgs,

        /// Address of the collection
        #[arg(short = 'c', long = "collection-address", alias = "collectionAddress")]
        collection_address: String,

        /// Name of the property to update
        #[arg(short = 'm', long)]
        name: String,

        /// Rename the property
        #[arg(long = "new-name")]
        new_name: Option<String>,

        /// Change the property type
        #[arg(short = 't', long = "type", value_enum)]
        field_type: Option<MetadataType>,

        /// Change whether the property is filterable
        #[arg(short = 'f', long)]
        filterable: Option<bool>,
    },
}

/// `imx mints` actions
#[derive(Subcommand, Debug)]
pub enum MintsCommand {
    /// Mint one token to the signing wallet
    Create {
        #[command(flatten)]
        signer: SignerArgs,

        /// Ethereum address of the ERC721 contract
        #[arg(short = 'c', long = "contract-address", alias = "contractAddress")]
        contract_address: String,

        /// Blueprint stored with the token
        #[arg(short = 'b', long)]
        blueprint: String,

        /// Token ID; random when omitted
        #[arg(long = "token-id")]
        token_id: Option<String>,
    },
    /// Show a mint
    Get {
        /// Mint ID
        #[arg(long)]
        id: String,
    },
}

/// `imx orders` actions
#[derive(Subcommand, Debug)]
pub enum OrdersCommand {
    /// Show one order, or every order when no ID is given
    Get {
        /// Order ID
        #[arg(long)]
        id: Option<String>,

        #[command(flatten)]
        list: ListArgs,
    },
}

/// `imx trades` actions
#[derive(Subcommand, Debug)]
pub enum TradesCommand {
    /// Show one trade, or every trade when no ID is given
    Get {
        /// Trade ID
        #[arg(long)]
        id: Option<String>,

        #[command(flatten)]
        list: ListArgs,
    },
}

/// `imx assets` actions
#[derive(Subcommand, Debug)]
pub enum AssetsCommand {
    /// List every asset owned by a wallet
    List {
        /// Wallet address
        #[arg(short, long)]
        address: String,

        #[command(flatten)]
        list: ListArgs,
    },
}

/// `imx balances` actions
#[derive(Subcommand, Debug)]
pub enum BalancesCommand {
    /// Show one token balance, or every balance when no token is given
    Get {
        /// Wallet address
        #[arg(short, long)]
        address: String,

        /// Token address, or `eth`
        #[arg(long)]
        token: Option<String>,

        #[command(flatten)]
        list: ListArgs,
    },
}
