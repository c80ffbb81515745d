use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use inception_prep::{
    batch::{self, BatchCopier, DEFAULT_IMAGE_FORMATS},
    config::{Config, INCEPTION_INPUT_SIZE},
    inference::{InferenceDriver, ResultFormatter},
    models::{InputLayout, LabelTable, OnnxClassifier},
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "inception-prep")]
#[command(about = "Batch image reformatting and Inception v3 top-5 classification")]
struct Cli {
    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List image files in a folder
    List {
        folder: PathBuf,

        #[command(flatten)]
        selection: Selection,
    },
    /// Count image files per subfolder
    Count {
        folder: PathBuf,

        /// Only count these subfolders
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,

        /// Allowed file extensions
        #[arg(long, value_delimiter = ',')]
        formats: Option<Vec<String>>,

        /// Print counts as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resize, reduce to one channel and rescale images to [-1, 1]
    Reformat {
        input: PathBuf,
        output: PathBuf,

        #[command(flatten)]
        size: SizeArgs,

        #[command(flatten)]
        selection: Selection,
    },
    /// Copy images unchanged under a "copied " prefix
    Copy {
        input: PathBuf,
        output: PathBuf,

        #[command(flatten)]
        selection: Selection,
    },
    /// Run an ONNX classifier over a folder and print top-5 labels
    Classify {
        folder: PathBuf,

        /// ONNX model file
        #[arg(long)]
        model: PathBuf,

        /// Label file, one class name per line (without background)
        #[arg(long)]
        labels: PathBuf,

        #[command(flatten)]
        size: SizeArgs,

        /// Number of ONNX Runtime intra-op threads
        #[arg(long)]
        threads: Option<usize>,

        /// Model takes NCHW input instead of NHWC
        #[arg(long)]
        nchw: bool,

        /// Print predictions as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct SizeArgs {
    /// Output width in pixels
    #[arg(long, default_value_t = INCEPTION_INPUT_SIZE)]
    width: usize,

    /// Output height in pixels
    #[arg(long, default_value_t = INCEPTION_INPUT_SIZE)]
    height: usize,
}

#[derive(Args)]
struct Selection {
    /// Descend one level into subfolders
    #[arg(long)]
    subfolders: bool,

    /// Only descend into these subfolders (implies --subfolders)
    #[arg(long, value_delimiter = ',')]
    only: Vec<String>,

    /// Allowed file extensions
    #[arg(long, value_delimiter = ',')]
    formats: Option<Vec<String>>,
}

fn formats_or_default(formats: Option<Vec<String>>) -> Vec<String> {
    formats.unwrap_or_else(|| DEFAULT_IMAGE_FORMATS.iter().map(|f| f.to_string()).collect())
}

impl Selection {
    fn paths(self, folder: &Path) -> inception_prep::Result<Vec<PathBuf>> {
        let formats = formats_or_default(self.formats);
        if !self.only.is_empty() {
            batch::list_subfolder_image_paths_selective(folder, &self.only, &formats)
        } else if self.subfolders {
            batch::list_subfolder_image_paths(folder, &formats)
        } else {
            batch::list_image_paths(folder, &formats)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志系统，输出到 stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command) {
        tracing::error!("Command failed: {} ({})", e, e.error_code());
        if e.is_input_error() {
            tracing::error!("The batch was aborted at the first unreadable input");
        }
        return Err(e.into());
    }

    Ok(())
}

fn run(command: Command) -> inception_prep::Result<()> {
    match command {
        Command::List { folder, selection } => {
            for path in selection.paths(&folder)? {
                println!("{}", path.display());
            }
        }
        Command::Count {
            folder,
            only,
            formats,
            json,
        } => {
            let formats = formats_or_default(formats);
            let counts = if only.is_empty() {
                batch::count_files_in_subfolders(&folder, &formats)?
            } else {
                batch::count_files_in_subfolders_selective(&folder, &only, &formats)?
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&counts)?);
            } else {
                println!("total {}", counts.total);
                for entry in &counts.folders {
                    println!("{} {}", entry.folder, entry.count);
                }
            }
        }
        Command::Reformat {
            input,
            output,
            size,
            selection,
        } => {
            let config = Config::new(size.width, size.height, None)?;
            let paths = selection.paths(&input)?;
            BatchCopier::reformat_all(&paths, config.target, &output)?;
        }
        Command::Copy {
            input,
            output,
            selection,
        } => {
            let paths = selection.paths(&input)?;
            BatchCopier::copy_all(&paths, &output)?;
        }
        Command::Classify {
            folder,
            model,
            labels,
            size,
            threads,
            nchw,
            json,
        } => {
            let config = Config::new(size.width, size.height, threads)?;
            let layout = if nchw {
                InputLayout::Nchw
            } else {
                InputLayout::Nhwc
            };

            let labels = LabelTable::from_file(&labels)?;
            let classifier = OnnxClassifier::new(&model, &config.onnx_config, layout)?;

            // 会话随 driver 一起在作用域结束时释放
            let results = {
                let mut driver = InferenceDriver::new(classifier, labels, config.target);
                driver.classify_folder(&folder)?
            };

            if json {
                println!("{}", ResultFormatter::format_json(&results)?);
            } else {
                print!("{}", ResultFormatter::format_text(&results));
            }
        }
    }

    Ok(())
}
