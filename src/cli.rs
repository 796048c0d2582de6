use clap::{Parser, Subcommand};
use mime::Mime;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "typedfile")]
#[command(about = "Convert files to and from typed values", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to $TYPEDFILE_CONFIG or config/typedfile.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encode a local file as a typed value
    Encode(EncodeArgs),
    /// Fetch a remote path from the engine service and encode it
    Fetch(FetchArgs),
    /// Decode a typed value JSON file back into raw content
    Decode(DecodeArgs),
}

#[derive(clap::Args, Debug)]
pub struct MetadataArgs {
    /// File name recorded in valueInfo (defaults to the source's last path segment)
    #[arg(long)]
    pub filename: Option<String>,

    /// MIME type recorded in valueInfo
    #[arg(long, default_value_t = mime::APPLICATION_OCTET_STREAM)]
    pub mimetype: Mime,

    /// Content encoding recorded in valueInfo, e.g. utf-8
    #[arg(long)]
    pub encoding: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct EncodeArgs {
    pub local_path: PathBuf,

    #[command(flatten)]
    pub metadata: MetadataArgs,

    /// Write the JSON here instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct FetchArgs {
    pub remote_path: String,

    #[command(flatten)]
    pub metadata: MetadataArgs,

    /// Write the JSON here instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct DecodeArgs {
    /// Typed value JSON file
    pub input: PathBuf,

    /// Destination (defaults to valueInfo.filename in the current directory)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}
