use {
    argh::FromArgs,
    culpa::{throw, throws},
    error::{RuntimeError, ScanError},
    miette::{miette, LabeledSpan, MietteDiagnostic, Report},
    scanner::Scanner,
    std::io::Read,
};

mod error;
mod scanner;
mod token;

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Scan a Pascal-like source on standard input and print its tokens.
#[derive(FromArgs)]
struct Args {
    /// print version information
    #[argh(switch, short = 'v')]
    version: bool,

    /// source file (unsupported, input is read from stdin)
    #[argh(positional)]
    script: Vec<String>,
}

#[throws(RuntimeError)]
fn main() {
    let args: Args = argh::from_env();

    if args.version {
        println!("{} {}", APP_NAME, APP_VERSION);
        return;
    }

    if !args.script.is_empty() {
        throw!(RuntimeError::Usage(miette!("{} [something.pas]", APP_NAME)));
    }

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .unicode(true)
                .color(false)
                .context_lines(3)
                .build(),
        )
    }))
    .unwrap();

    let mut source = String::new();
    std::io::stdin().read_to_string(&mut source)?;

    if let Err(e) = run(&source) {
        error(&source, e.span(), &e.to_string());
        std::process::exit(e.exit_code());
    }
}

/// Scan the whole source and print one token name per line.
#[throws(ScanError)]
fn run(source: &str) {
    let tokens = Scanner::new(source).scan_tokens()?;
    for token in &tokens {
        println!("{}", token);
    }
}

/// Report a lexical diagnostic with a labeled source span on stderr.
pub fn error(source: &str, span: std::ops::Range<usize>, message: &str) {
    let diag =
        MietteDiagnostic::new(message.to_string()).with_label(LabeledSpan::at(span, "here"));
    let report = Report::new(diag).with_source_code(source.to_string());
    eprintln!("{:?}", report);
}
