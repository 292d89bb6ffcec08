//! Code tables built from symbol frequencies.

use clap::ValueEnum;
use derive_more::derive::Display;
use itertools::Itertools;

use crate::codec::CodeTable;

/// How [`build_table`] assigns codes.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TableStrategy {
    /// Unary codes for the most frequent symbols, fixed width for the rest.
    #[default]
    #[display("hybrid")]
    Hybrid,

    /// The same number of bits for every symbol.
    #[display("fixed")]
    Fixed,
}

fn ceil_log2(n: usize) -> usize {
    match n {
        0 | 1 => 0,
        _ => (usize::BITS - (n - 1).leading_zeros()) as usize,
    }
}

fn fixed_code(prefix: &str, index: usize, width: usize) -> String {
    if width == 0 {
        prefix.to_string()
    } else {
        format!("{prefix}{index:0width$b}")
    }
}

/// Build a prefix-free table covering every symbol of `text`.
pub fn build_table(text: &str, strategy: TableStrategy) -> CodeTable {
    // Most frequent first, ties in symbol order.
    let symbols = text
        .chars()
        .counts()
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)))
        .collect_vec();

    let unary = match strategy {
        TableStrategy::Fixed => 0,
        TableStrategy::Hybrid => unary_count(&symbols, text.chars().count()),
    };

    let (frequent, rest) = symbols.split_at(unary);
    let escape = "1".repeat(unary);
    let width = match ceil_log2(rest.len()) {
        0 if unary == 0 => 1,
        w => w,
    };

    frequent
        .iter()
        .enumerate()
        .map(|(i, &(symbol, _))| (symbol, format!("{}0", "1".repeat(i))))
        .chain(
            rest.iter()
                .enumerate()
                .map(|(i, &(symbol, _))| (symbol, fixed_code(&escape, i, width))),
        )
        .collect()
}

/// How many of the leading `symbols` to give unary codes: keep adding the next
/// most frequent one while the estimated output size shrinks.
fn unary_count(symbols: &[(char, usize)], total: usize) -> usize {
    let mut best = ceil_log2(symbols.len()) * total;
    let mut covered = 0;
    let mut unary_bits = 0;
    for (k, &(_, count)) in symbols.iter().enumerate() {
        covered += count;
        unary_bits += count * (k + 1);
        let remaining = symbols.len() - (k + 1);
        let escaped_bits = match remaining {
            0 => 0,
            _ => (ceil_log2(remaining) + k + 1) * (total - covered),
        };
        let size = unary_bits + escaped_bits;
        if size >= best {
            return k;
        }
        best = size;
    }
    symbols.len()
}
