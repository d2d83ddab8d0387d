//! Interactive prompt fallback when no valid input file or flags are given.

use imgrab_core::config::Input;
use std::io::{self, BufRead};

/// Save path offered when the user enters nothing.
const DEFAULT_SAVE_PATH: &str = "./outputs";

/// Asks for count, parallelism and save path on the terminal. Re-asks until
/// each number parses to at least 1; an empty save path takes the default.
pub(super) fn prompt_for_input() -> Input {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let count = prompt_count(&mut lines);
    let parallelism = prompt_parallelism(&mut lines);
    let save_path = prompt_save_path(&mut lines);
    Input {
        count,
        parallelism,
        save_path,
    }
}

pub(super) fn prompt_count(lines: &mut impl Iterator<Item = io::Result<String>>) -> usize {
    prompt_number(lines, "Enter the number of images to download:")
}

pub(super) fn prompt_parallelism(lines: &mut impl Iterator<Item = io::Result<String>>) -> usize {
    prompt_number(lines, "Enter the maximum parallel download limit:")
}

fn prompt_number(lines: &mut impl Iterator<Item = io::Result<String>>, question: &str) -> usize {
    loop {
        println!("{}", question);
        match lines.next() {
            Some(Ok(line)) => {
                if let Ok(n) = line.trim().parse::<usize>() {
                    if n >= 1 {
                        return n;
                    }
                }
            }
            // Closed stdin: take the minimum instead of re-asking forever.
            _ => return 1,
        }
    }
}

pub(super) fn prompt_save_path(lines: &mut impl Iterator<Item = io::Result<String>>) -> String {
    println!("Enter the save path (default: {})", DEFAULT_SAVE_PATH);
    match lines.next() {
        Some(Ok(line)) if !line.trim().is_empty() => line.trim().to_string(),
        _ => DEFAULT_SAVE_PATH.to_string(),
    }
}
