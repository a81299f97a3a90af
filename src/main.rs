use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use cascade_probe::cascade::clipboard::{copy_with_fallback, CommandClipboard, CopyOutcome, FileClipboard};
use cascade_probe::cascade::document::HtmlDocument;
use cascade_probe::cascade::error::{InspectError, InspectResult, IoContext};
use cascade_probe::cascade::inspector::inspect;
use cascade_probe::cascade::options::InspectOptions;
use cascade_probe::cascade::report::{render_console, render_markdown};
use cascade_probe::logging;
use cascade_probe::palette::extractor::PaletteExtractor;
use cascade_probe::palette::options::PaletteOptions;
use cascade_probe::palette::report as palette_report;
use cascade_probe::scrape::accumulator::{accumulate, OfferAccumulator};
use cascade_probe::scrape::product_ids::extract_product_ids;
use log::{error, info};

enum Command {
    Cascade {
        html: PathBuf,
        selector: String,
        options: InspectOptions,
    },
    Palette {
        html: PathBuf,
        options: PaletteOptions,
    },
    Ids {
        html: PathBuf,
        state: Option<PathBuf>,
    },
}

fn print_usage(program: &str) {
    // logger isn't initialized yet
    eprintln!("Usage:");
    eprintln!("  {} cascade <html_file> <selector> [--options <json>] [--options-file <file>]", program);
    eprintln!("  {} palette <html_file> [--options <json>] [--options-file <file>]", program);
    eprintln!("  {} ids <html_file> [--state <file>]", program);
    eprintln!("Example: {} cascade page.html \"a.btn\" --options '{{\"showAllProps\":true}}'", program);
}

fn usage(message: &str) -> InspectError {
    InspectError::Usage {
        message: message.to_string(),
    }
}

/// Read `--options` / `--options-file` pairs, the last one wins
fn parse_option_flags<T: Default>(
    flags: &[String],
    from_json: fn(&str) -> InspectResult<T>,
    from_file: fn(&Path) -> InspectResult<T>,
) -> InspectResult<T> {
    let mut options = T::default();
    let mut flags = flags.iter();
    while let Some(flag) = flags.next() {
        let value = flags
            .next()
            .ok_or_else(|| usage(&format!("{} needs a value", flag)))?;
        options = match flag.as_str() {
            "--options" => from_json(value)?,
            "--options-file" => from_file(Path::new(value))?,
            other => return Err(usage(&format!("unknown flag {}", other))),
        };
    }
    Ok(options)
}

fn parse_args(args: &[String]) -> InspectResult<Command> {
    let Some(command) = args.get(1) else {
        return Err(usage("missing command"));
    };
    let rest = &args[2..];

    match command.as_str() {
        "cascade" => {
            let (html, selector) = match rest {
                [html, selector, ..] => (PathBuf::from(html), selector.clone()),
                _ => return Err(usage("cascade needs an HTML file and a selector")),
            };
            let options = parse_option_flags(
                &rest[2..],
                InspectOptions::from_json,
                InspectOptions::from_file,
            )?;
            Ok(Command::Cascade {
                html,
                selector,
                options,
            })
        }
        "palette" => {
            let Some(html) = rest.first() else {
                return Err(usage("palette needs an HTML file"));
            };
            let options = parse_option_flags(
                &rest[1..],
                PaletteOptions::from_json,
                PaletteOptions::from_file,
            )?;
            Ok(Command::Palette {
                html: PathBuf::from(html),
                options,
            })
        }
        "ids" => {
            let Some(html) = rest.first() else {
                return Err(usage("ids needs an HTML file"));
            };
            let state = match &rest[1..] {
                [] => None,
                [flag, value] if flag == "--state" => Some(PathBuf::from(value)),
                _ => return Err(usage("ids only accepts --state <file>")),
            };
            Ok(Command::Ids {
                html: PathBuf::from(html),
                state,
            })
        }
        other => Err(usage(&format!("unknown command {}", other))),
    }
}

fn run_cascade(html: &Path, selector: &str, options: &InspectOptions) -> InspectResult<()> {
    let document = HtmlDocument::load(html)?;
    let Some(inspection) = inspect(&document, selector, options)? else {
        println!("No element matches {}", selector);
        return Ok(());
    };

    print!("{}", render_console(&inspection, options));

    if options.output_markdown {
        deliver_markdown(&render_markdown(&inspection, options), options.auto_copy);
    }
    Ok(())
}

fn run_palette(html: &Path, options: &PaletteOptions) -> InspectResult<()> {
    let document = HtmlDocument::load(html)?;
    let mut extractor = PaletteExtractor::new(&document)?;
    let palette = extractor.extract(&document, options);

    print!("{}", palette_report::render_console(&palette));
    let page = html
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| html.display().to_string());
    deliver_markdown(&palette_report::render_markdown(&palette, &page), options.auto_copy);
    Ok(())
}

/// Copy a Markdown report, or print it when copying is off
fn deliver_markdown(markdown: &str, auto_copy: bool) {
    if !auto_copy {
        println!();
        print!("{}", markdown);
        return;
    }
    let outcome = copy_with_fallback(
        markdown,
        &CommandClipboard::system(),
        &FileClipboard::default_location(),
        &mut io::stdout(),
    );
    match outcome {
        CopyOutcome::Primary(via) => println!("Markdown report copied to clipboard ({})", via),
        CopyOutcome::Fallback(path) => println!("Markdown report saved to {}", path),
        CopyOutcome::Dumped => {}
    }
}

fn run_ids(html: &Path, state: Option<&Path>) -> InspectResult<()> {
    let content = fs::read_to_string(html)
        .with_io_context(&format!("Failed to read {}", html.display()))?;
    let offers = extract_product_ids(&content);
    info!("Found {} product offers in {}", offers.len(), html.display());

    let accumulator = match state {
        Some(path) => OfferAccumulator::load(path)?,
        None => OfferAccumulator::new(),
    };
    let (accumulator, added) = accumulate(accumulator, offers);

    for id in accumulator.product_ids() {
        println!("{}", id);
    }
    let ids = serde_json::to_string(&accumulator.product_ids())?;
    println!("{}", ids);

    if let Some(path) = state {
        accumulator.save(path)?;
        println!("{} new offers, {} stored in {}", added, accumulator.len(), path.display());
    }
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("cascade_probe");

    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            print_usage(program);
            process::exit(1);
        }
    };

    let verbose = match &command {
        Command::Cascade { options, .. } => options.verbose,
        Command::Palette { options, .. } => options.verbose,
        Command::Ids { .. } => false,
    };
    if let Err(e) = logging::init_logger(verbose) {
        eprintln!("Failed to initialize logger: {}", e);
        process::exit(1);
    }
    info!("Command line arguments: {:?}", args);

    let result = match &command {
        Command::Cascade {
            html,
            selector,
            options,
        } => run_cascade(html, selector, options),
        Command::Palette { html, options } => run_palette(html, options),
        Command::Ids { html, state } => run_ids(html, state.as_deref()),
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}
