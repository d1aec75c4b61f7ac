//! meshcodec - mesh buffer compression tool
//!
//! Encodes raw vertex and index buffers into compressed streams and back.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use meshcodec_core::{EncoderOptions, FilterKind, StreamKind};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "meshcodec")]
#[command(about = "Mesh vertex and index buffer compression")]
#[command(version)]
struct Cli {
    /// Log codec details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a raw buffer
    Encode {
        /// Stream format to produce
        #[arg(short, long, value_enum)]
        kind: KindArg,

        /// Vertex size in bytes, or index width (2 or 4)
        #[arg(short, long)]
        stride: usize,

        /// Rotate triangles to expose more shared edges
        #[arg(long)]
        rotate: bool,

        /// Raw input buffer
        input: PathBuf,

        /// Encoded output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Decompress an encoded stream
    Decode {
        /// Stream format (default: detected from the tag byte)
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,

        /// Number of vertices or indices
        #[arg(short, long)]
        count: usize,

        /// Vertex size in bytes, or index width (2 or 4)
        #[arg(short, long)]
        stride: usize,

        /// Filter to apply to decoded attributes
        #[arg(short, long, value_enum)]
        filter: Option<FilterArg>,

        /// Encoded input file
        input: PathBuf,

        /// Raw output buffer
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show the kind and size of an encoded stream
    Info {
        /// Encoded input file
        input: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Attributes,
    Triangles,
    Indices,
}

impl From<KindArg> for StreamKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Attributes => StreamKind::Attributes,
            KindArg::Triangles => StreamKind::Triangles,
            KindArg::Indices => StreamKind::Indices,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FilterArg {
    Oct,
    Quat,
    Exp,
}

impl From<FilterArg> for FilterKind {
    fn from(filter: FilterArg) -> Self {
        match filter {
            FilterArg::Oct => FilterKind::Octahedral,
            FilterArg::Quat => FilterKind::Quaternion,
            FilterArg::Exp => FilterKind::Exponential,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Encode {
            kind,
            stride,
            rotate,
            input,
            output,
        } => {
            let options = EncoderOptions::new().with_rotate_triangles(rotate);
            tracing::info!("Encoding {:?} -> {:?}", input, output);
            let report =
                meshcodec_tools::encode_file(&input, &output, kind.into(), stride, &options)?;
            tracing::info!("{}", report);
        }

        Commands::Decode {
            kind,
            count,
            stride,
            filter,
            input,
            output,
        } => {
            let filter = filter.map(FilterKind::from).unwrap_or_default();
            tracing::info!("Decoding {:?} -> {:?}", input, output);
            let size = meshcodec_tools::decode_file(
                &input,
                &output,
                kind.map(StreamKind::from),
                count,
                stride,
                filter,
            )?;
            tracing::info!("Wrote {} bytes", size);
        }

        Commands::Info { input } => {
            let info = meshcodec_tools::inspect_file(&input)?;
            println!("{}", info);
        }
    }

    Ok(())
}
