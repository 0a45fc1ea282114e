#[macro_use]
extern crate log;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use speech_weights::convert::{to_channel_major, to_gate_block_layout, to_group_major};
use speech_weights::util::{read_f32_lines, write_f32_lines};
use speech_weights::{evaluate, HyperParams, SpeechNetwork, Weights, DEFAULT_HYPER_PARAMS};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "speech-weights")]
#[command(version, about = "Converts exported speech-network weights and checks a forward pass")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Loads and converts the weights, runs the network and compares against a reference
    Evaluate {
        /// Directory with conv.txt, birnn{i}.txt, fc1.txt and fc2.txt
        #[arg(long)]
        weights_dir: PathBuf,
        /// Spectrogram, one value per line, bin-major
        #[arg(long)]
        input: PathBuf,
        /// Expected network output
        #[arg(long)]
        reference: PathBuf,
        /// Number of bidirectional recurrent layers
        #[arg(long, default_value_t = DEFAULT_HYPER_PARAMS.rnn_depth)]
        depth: usize,
        #[arg(long, default_value_t = DEFAULT_HYPER_PARAMS.hidden_size)]
        hidden: usize,
        #[arg(long, default_value_t = DEFAULT_HYPER_PARAMS.num_output_classes)]
        classes: usize,
    },
    /// Converts a single exported weight file
    Convert {
        #[arg(long, value_enum)]
        layout: Layout,
        /// Channel size, or the hidden size for gate blocks
        #[arg(long)]
        size: usize,
        input: PathBuf,
        output: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Layout {
    /// Convolution kernels
    ChannelMajor,
    /// Linear layers
    GroupMajor,
    /// Bidirectional recurrent layers
    GateBlocks,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            weights_dir,
            input,
            reference,
            depth,
            hidden,
            classes,
        } => {
            let params = HyperParams {
                rnn_depth: depth,
                hidden_size: hidden,
                num_output_classes: classes,
                ..DEFAULT_HYPER_PARAMS
            };
            let weights = Weights::load(&weights_dir, &params)
                .with_context(|| format!("loading weights from {}", weights_dir.display()))?;
            let network = SpeechNetwork::new(params, weights)?;
            debug!("Initialized network with {:?}", network.params());

            let input_data = read_f32_lines(&input)?;
            let reference_data = read_f32_lines(&reference)?;
            let total_diff = evaluate(&network, &input_data, &reference_data)
                .context("forward pass does not match the reference")?;
            println!("{}", total_diff);
        }
        Commands::Convert {
            layout,
            size,
            input,
            output,
        } => {
            let origin = read_f32_lines(&input)?;
            let (converted, per_line) = match layout {
                Layout::ChannelMajor => (to_channel_major(&origin, size)?, origin.len() / size),
                Layout::GroupMajor => (to_group_major(&origin, size)?, size),
                Layout::GateBlocks => (to_gate_block_layout(&origin, size)?, size),
            };
            write_f32_lines(&output, &converted, per_line)?;
            info!(
                "Converted {} values from {} into {} ({:?})",
                converted.len(),
                input.display(),
                output.display(),
                layout
            );
        }
    }
    Ok(())
}
