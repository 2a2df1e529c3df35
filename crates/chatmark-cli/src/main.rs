use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use chatmark_core::{catalog, render, render_sanitized, RenderOptions};

fn main() {
    let mut input: Option<String> = None;
    let mut emoji_enabled = true;
    let mut skin_tone: u8 = 0;
    let mut sanitized = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "--no-emoji" => emoji_enabled = false,
            "--sanitized" => sanitized = true,
            "--tone" => {
                skin_tone = match args.next().as_deref().map(|value| value.parse::<u8>()) {
                    Some(Ok(tone)) if tone <= 5 => tone,
                    _ => {
                        eprintln!("--tone expects a number from 0 to 5");
                        print_usage();
                        process::exit(2);
                    }
                };
            }
            _ => {
                if input.is_none() {
                    input = Some(arg);
                } else {
                    eprintln!("unexpected argument: {}", arg);
                    print_usage();
                    process::exit(2);
                }
            }
        }
    }

    let source = match input {
        Some(path) => fs::read_to_string(&path).unwrap_or_else(|err| {
            eprintln!("failed to read {}: {}", path, err);
            process::exit(1);
        }),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .unwrap_or_else(|err| {
                    eprintln!("failed to read stdin: {}", err);
                    process::exit(1);
                });
            buffer
        }
    };

    // Batch rendering wants eager resolution rather than the
    // fire-and-forget load the interactive path uses.
    if emoji_enabled {
        catalog().ensure_loaded();
    }

    let options = RenderOptions {
        emoji_enabled,
        skin_tone,
    };
    let html = if sanitized {
        render_sanitized(&source, &options)
    } else {
        render(&source, &options)
    };
    println!("{}", html);
}

fn print_usage() {
    eprintln!("Usage: chatmark-cli [--no-emoji] [--tone N] [--sanitized] [input]");
}
