mod arg;
mod fs;

use ::clap::Parser;
use ::env_logger::Builder;
use ::env_logger::Env;
use ::log::error;
use ::log::info;
use ::log::LevelFilter;
use ::pdfcore::Context;
use ::pdfcore::ObjectKind;
use ::pdfcore::ParseOptions;
use ::pdfcore::PdfParser;
use ::pdfcore::PdfStreamWriter;
use ::pdfcore::PdfWriter;
use ::pdfcore::WriteOptions;
use ::std::fs::read;
use ::std::fs::write;
use ::std::path::Path;

use self::arg::Args;
use self::fs::append_pdf_files;
use self::fs::filter_pdf_files;
use self::fs::output_path;

/// Version, object count, Root and page count of a parsed document.
fn summary(context: &Context) -> String {
    let root = context.trailer_info().root.as_ref();
    let page_count = root
        .and_then(|root| context.lookup(root, &[ObjectKind::Catalog]).ok().flatten())
        .and_then(|catalog| catalog.as_catalog())
        .and_then(|catalog| catalog.pages(context).ok().flatten())
        .and_then(|pages| pages.get("Count"))
        .and_then(|count| count.as_number());
    format!(
        "version: {}, objects: {}, root: {}, pages: {}",
        context.header(),
        context.object_count(),
        root.map_or_else(|| "missing".to_string(), |root| root.to_string()),
        page_count.map_or_else(|| "unknown".to_string(), |count| count.to_string())
    )
}

fn rewrite(context: &Context, file: &Path, output: &Path, args: &Args) {
    let options = WriteOptions::default().objects_per_stream(args.objects_per_stream);
    let buffer = if args.compress {
        PdfStreamWriter::for_context(context, options).serialize_to_buffer()
    } else {
        PdfWriter::for_context(context, options).serialize_to_buffer()
    };
    let path = match output_path(file, output) {
        Ok(path) => path,
        Err(err) => {
            error!("Failed to prepare {}: {}", output.display(), err);
            return;
        }
    };
    match write(&path, buffer) {
        Ok(()) => info!("Wrote {}", path.display()),
        Err(err) => error!("Failed to write {}: {}", path.display(), err),
    }
}

fn main() {
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "warn" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter));
    if args.verbose {
        builder.filter_module("pdfcore", LevelFilter::Debug);
    }
    builder.init();

    let mut files = filter_pdf_files(args.files.clone());
    if let Some(dir) = args.directory.as_ref() {
        append_pdf_files(&mut files, dir);
    }

    let options = ParseOptions::default()
        .throw_on_invalid_object(args.strict)
        .cap_numbers(args.cap_numbers);
    for file in files {
        info!("Processing file: {}", file.display());
        let bytes = match read(&file) {
            Ok(bytes) => bytes,
            Err(err) => {
                error!("Failed to read {}: {}", file.display(), err);
                continue;
            }
        };
        let context = match PdfParser::for_bytes_with_options(bytes, options).parse_document() {
            Ok(context) => context,
            Err(err) => {
                error!("Failed to parse {}: {}", file.display(), err);
                continue;
            }
        };
        println!("{}: {}", file.display(), summary(&context));
        if let Some(output) = args.output.as_ref() {
            rewrite(&context, &file, output, &args);
        }
    }
}
