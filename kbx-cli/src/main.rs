// Command-line interface for kbx
//
// This binary converts documents between the kbx binary form and its
// XML markup form, and inspects binary headers.
//
// The core capabilities live in the kbx-codec crate; this crate is a
// thin shell over its FormatRegistry.
//
// Converting:
//
// The conversion needs a to and from pair. The from side can be
// auto-detected from the file extension (falling back to content
// sniffing), while being overwrittable by an explicit --from flag.
// Usage:
//  kbx <input> --to <format> [--from <format>] [--output <file>]  - Convert between formats (default)
//  kbx convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above (explicit)
//  kbx info <input>                      - Print header facts of a binary document as JSON
//  kbx --list-formats                    - List available formats

use clap::{Arg, ArgAction, Command, ValueHint};
use kbx_codec::{CompressionType, EncodingType, Format, FormatRegistry, Options};
use kbx_config::{KbxConfig, Loader};
use std::fs;

const FORMAT_NAMES: &[&str] = &["binary", "xml"];

fn build_cli() -> Command {
    Command::new("kbx")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for converting and inspecting kbx binary documents")
        .long_about(
            "kbx is a command-line tool for working with kbx binary tree documents.\n\n\
            Commands:\n  \
            - convert: Transform between the binary form and XML markup\n  \
            - info:    Print header facts of a binary document\n\n\
            Examples:\n  \
            kbx data.kbx --to xml                   # Binary to markup (stdout)\n  \
            kbx data.xml --to binary -o out.kbx     # Markup to binary file\n  \
            kbx data.xml --to binary --compress -o out.kbx\n  \
            kbx info data.kbx                       # Header facts as JSON",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a kbx.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .long_about(
                    "Convert documents between the binary form and XML markup.\n\n\
                    Supported formats:\n  \
                    - binary: kbx binary tree serialization (.kbx, .bin)\n  \
                    - xml:    XML markup form (.xml)\n\n\
                    The source format is auto-detected from the file extension,\n\
                    falling back to content sniffing. Text output goes to stdout\n\
                    by default; binary output requires -o.\n\n\
                    Examples:\n  \
                    kbx convert data.kbx --to xml                # Binary to markup (stdout)\n  \
                    kbx convert data.xml --to binary -o out.kbx  # Markup to binary file\n  \
                    kbx data.kbx --to xml                        # 'convert' is optional",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected if not specified)")
                        .value_parser(clap::builder::PossibleValuesParser::new(FORMAT_NAMES))
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_parser(clap::builder::PossibleValuesParser::new(FORMAT_NAMES))
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout for text output)")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("encoding")
                        .long("encoding")
                        .help("Text encoding for the result (overrides the document's own)")
                        .long_help(
                            "Text encoding for the result, overriding both the document's\n\
                            declared encoding and the configured default.\n\n\
                            One of: none, ascii, iso-8859-1, euc-jp, shift-jis, utf-8.",
                        )
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("compress")
                        .long("compress")
                        .help("Width-pack numeric payloads in the binary output")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("info")
                .about("Print header facts of a binary document as JSON")
                .arg(
                    Arg::new("input")
                        .help("Path to the binary file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn main() {
    // Try to parse args. If no subcommand is provided, inject "convert"
    let args: Vec<String> = std::env::args().collect();

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&args) {
        Ok(m) => m,
        Err(e) => {
            // Check if this is a "missing subcommand" error by seeing if
            // the first arg looks like a file
            if args.len() > 1
                && !args[1].starts_with('-')
                && args[1] != "convert"
                && args[1] != "info"
                && args[1] != "help"
            {
                let mut new_args = vec![args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let from_arg = sub_matches.get_one::<String>("from").map(|s| s.as_str());
            let to = sub_matches.get_one::<String>("to").expect("to is required");
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            let encoding = sub_matches.get_one::<String>("encoding").map(|s| s.as_str());
            let compress = sub_matches.get_flag("compress");
            handle_convert_command(input, from_arg, to, output, encoding, compress, &config);
        }
        Some(("info", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            handle_info_command(input, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// Handle the convert command
fn handle_convert_command(
    input: &str,
    from_arg: Option<&str>,
    to: &str,
    output: Option<&str>,
    encoding_arg: Option<&str>,
    compress: bool,
    config: &KbxConfig,
) {
    let registry = FormatRegistry::default();

    let data = fs::read(input).unwrap_or_else(|e| {
        eprintln!("Error reading file '{input}': {e}");
        std::process::exit(1);
    });

    // Auto-detect --from if not provided
    let from = if let Some(f) = from_arg {
        f.to_string()
    } else {
        match registry
            .detect_format_from_filename(input)
            .or_else(|| registry.detect_format_from_content(&data))
        {
            Some(detected) => detected,
            None => {
                eprintln!("Error: Could not detect format of '{input}'");
                eprintln!("Please specify --from explicitly");
                std::process::exit(1);
            }
        }
    };

    let doc = registry.decode(&data, &from).unwrap_or_else(|e| {
        eprintln!("Decode error: {e}");
        std::process::exit(1);
    });

    // Encoding precedence: explicit flag, then the document's own
    // declaration, then the configured default.
    let encoding = match encoding_arg {
        Some(name) => match EncodingType::parse_name(name) {
            Some(encoding) => encoding,
            None => {
                eprintln!("Error: Unknown encoding '{name}'");
                std::process::exit(1);
            }
        },
        None if doc.encoding == EncodingType::None => config.convert.encoding,
        None => doc.encoding,
    };

    let mut builder = Options::builder();
    builder
        .encoding(encoding)
        .compression(if compress {
            CompressionType::Compressed
        } else {
            config.convert.compression
        })
        .version(config.convert.version);
    let options = builder.build();

    let result = registry.encode(&doc, to, &options).unwrap_or_else(|e| {
        eprintln!("Encode error: {e}");
        std::process::exit(1);
    });

    match output {
        Some(path) => {
            fs::write(path, &result).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => match String::from_utf8(result) {
            Ok(text) => print!("{text}"),
            Err(_) => {
                eprintln!("Binary output requires an output file. Use -o <path>.");
                std::process::exit(1);
            }
        },
    }
}

/// Handle the info command
fn handle_info_command(input: &str, config: &KbxConfig) {
    let data = fs::read(input).unwrap_or_else(|e| {
        eprintln!("Error reading file '{input}': {e}");
        std::process::exit(1);
    });

    let info = kbx_codec::binary_info(&data).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    let json = if config.info.pretty {
        serde_json::to_string_pretty(&info)
    } else {
        serde_json::to_string(&info)
    };

    match json {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Available formats:\n");
    let registry = FormatRegistry::default();
    for format_name in registry.list_formats() {
        let format = registry.get(&format_name).expect("listed formats exist");
        println!("  {:8} {}", format_name, format.description());
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> KbxConfig {
    let loader = Loader::new().with_optional_file("kbx.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}
