// A module to parse command line arguments

use ::clap::Parser;
use ::std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "pdfcore",
    version = "0.1.0",
    about = "A package for parsing, repairing and rewriting PDF files"
)]
pub struct Args {
    #[clap(short, long, help = "Enable verbose output")]
    pub verbose: bool,
    #[clap(short, long, help = "A space-separated list of PDF files")]
    pub files: Vec<PathBuf>,
    #[clap(short, long, help = "The directory containing the PDF files")]
    pub directory: Option<PathBuf>,
    #[clap(short, long, help = "Fail on objects that cannot be parsed")]
    pub strict: bool,
    #[clap(long, help = "Cap numbers above 2^53 - 1")]
    pub cap_numbers: bool,
    #[clap(short, long, help = "The directory to write the rewritten files to")]
    pub output: Option<PathBuf>,
    #[clap(
        short,
        long,
        requires = "output",
        help = "Pack objects into object streams when rewriting"
    )]
    pub compress: bool,
    #[clap(
        long,
        default_value_t = 50,
        help = "The maximum number of objects per object stream"
    )]
    pub objects_per_stream: usize,
}
