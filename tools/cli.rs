//! Highlights a file, or stdin, and prints the HTML.
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use lustro::{DEFAULT_TAB_WIDTH, LUSTRO_CSS, Options, Registry};

#[derive(Parser)]
#[command(name = "lustro")]
#[command(about = "Highlights code as prettify-compatible HTML")]
struct Args {
    /// File to highlight, stdin if missing
    file: Option<PathBuf>,

    /// Language id, guessed from the text if missing or unknown
    #[arg(short, long)]
    lang: Option<String>,

    /// Number the lines, starting at the given number
    #[arg(long, num_args = 0..=1, default_missing_value = "1")]
    linenums: Option<usize>,

    #[arg(long, default_value_t = DEFAULT_TAB_WIDTH)]
    tab_width: usize,

    /// The input is already HTML, with tags and entities
    #[arg(long)]
    html: bool,

    /// Extra JSON lexer definition, registered for the `--lang` id
    #[arg(long, requires = "lang")]
    lexer: Option<PathBuf>,

    /// Wraps the output in a standalone page with the default stylesheet
    #[arg(long)]
    page: bool,

    /// Lists the known language ids and exits
    #[arg(long)]
    list: bool,
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let registry = Registry::with_builtin_languages()?;

    if let (Some(path), Some(lang)) = (&args.lexer, &args.lang) {
        for id in registry.register_from_path(path, &[lang.as_str()])? {
            eprintln!("`{id}` is already registered, ignoring {}", path.display());
        }
    }

    if args.list {
        for id in registry.language_ids() {
            println!("{id}");
        }
        return Ok(());
    }

    let input = match &args.file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let input = if args.html { input } else { escape(&input) };

    let options = Options::default()
        .tab_width(args.tab_width)
        .line_numbers(args.linenums);
    let html = registry.prettify(&input, args.lang.as_deref(), &options)?;

    if args.page {
        println!(
            "<!DOCTYPE html>\n<html>\n<head>\n<style>\n{LUSTRO_CSS}</style>\n</head>\n<body>\n<pre class=\"prettyprint\">{html}</pre>\n</body>\n</html>"
        );
    } else {
        println!("{html}");
    }

    Ok(())
}
