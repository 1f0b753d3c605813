// SPDX-FileCopyrightText: 2025 xfnw
//
// SPDX-License-Identifier: MIT

use clap::Parser;
use range_masks::{EncodingChoice, RuleSet, choose_best_encoding, decompose};
use std::process::exit;

mod parse;

/// print the tcam entries needed to match a range
#[derive(Debug, Parser)]
struct Opt {
    /// first value in the range, as a number or ipv4 address
    #[arg(value_parser = parse::bound)]
    start: u32,
    /// last value in the range, as a number or ipv4 address
    #[arg(value_parser = parse::bound)]
    end: u32,
    /// use a reject/accept pair of rules when that takes fewer entries
    #[arg(short, long)]
    optimize: bool,
    /// show entries as address prefixes
    #[arg(short, long)]
    prefix: bool,
    /// explain which encoding was picked
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, PartialEq, Eq, foxerror::FoxError)]
enum Error {
    /// not a number or ipv4 address
    InvalidEncoding(String),
    /// could not split range
    #[err(from)]
    Decompose(range_masks::Error),
}

fn print_rules(rules: &RuleSet, prefix: bool) {
    if prefix {
        for entry in rules {
            println!("{}", entry.prefix());
        }
    } else {
        print!("{rules}");
    }
}

fn run(opt: &Opt) -> Result<(), Error> {
    if !opt.optimize {
        let rules = decompose(opt.start, opt.end)?;
        print_rules(&rules, opt.prefix);
        return Ok(());
    }

    match choose_best_encoding(opt.start, opt.end)? {
        EncodingChoice::Direct(rules) => {
            if opt.verbose {
                eprintln!("direct encoding: {} entries", rules.len());
            }
            print_rules(&rules, opt.prefix);
        }
        EncodingChoice::Split { reject, accept } => {
            if opt.verbose {
                eprintln!(
                    "split encoding: {} reject + {} accept entries",
                    reject.len(),
                    accept.len()
                );
            }
            // start is never 0 here
            println!("Reject: 0 - {}", opt.start - 1);
            print_rules(&reject, opt.prefix);
            println!("Accept: 0 - {}", opt.end);
            print_rules(&accept, opt.prefix);
        }
    }
    Ok(())
}

fn main() {
    let opt = Opt::parse();

    if let Err(e) = run(&opt) {
        eprintln!("{e}");
        exit(1);
    }
}
