use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tools::{encode_sample, hex_dump, layout_matrix, parse_version, SampleOperation};

#[derive(Parser)]
#[command(
    name = "specter-tools",
    version,
    about = "specter layout and packet inspection tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the layout variant every era table selects at a version.
    Matrix {
        /// Protocol version, e.g. 1.8 or 1.19.3.
        #[arg(long)]
        version: String,
    },
    /// Encode a sample packet and hex-dump its frames.
    Packet {
        /// Operation to encode.
        operation: OperationArg,
        /// Protocol version, e.g. 1.8 or 1.19.3.
        #[arg(long)]
        version: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OperationArg {
    Spawn,
    Destroy,
    InfoAdd,
    InfoRemove,
    Rotate,
    Animate,
    Equip,
    Sneaking,
    SkinLayers,
    Status,
    Payload,
}

impl From<OperationArg> for SampleOperation {
    fn from(arg: OperationArg) -> Self {
        match arg {
            OperationArg::Spawn => Self::Spawn,
            OperationArg::Destroy => Self::Destroy,
            OperationArg::InfoAdd => Self::InfoAdd,
            OperationArg::InfoRemove => Self::InfoRemove,
            OperationArg::Rotate => Self::Rotate,
            OperationArg::Animate => Self::Animate,
            OperationArg::Equip => Self::Equip,
            OperationArg::Sneaking => Self::Sneaking,
            OperationArg::SkinLayers => Self::SkinLayers,
            OperationArg::Status => Self::Status,
            OperationArg::Payload => Self::Payload,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Matrix { version } => {
            let version = parse_version(&version)?;
            let matrix = layout_matrix(version);
            let json = serde_json::to_string_pretty(&matrix).context("serialize matrix")?;
            println!("{json}");
        }
        Command::Packet { operation, version } => {
            let version = parse_version(&version)?;
            let packet = encode_sample(operation.into(), version)?;
            for frame in packet.frames() {
                println!("== {} ({} bytes) ==", frame.kind.name(), frame.body.len());
                print!("{}", hex_dump(&frame.body));
            }
        }
    }
    Ok(())
}
