//! Prefix-code text codec over [`BitArray`].
//!
//! A [`CodeTable`] maps each symbol to a binary string. Encoding concatenates
//! the codes of the input symbols in order; decoding scans the bits from bit 0
//! and emits a symbol as soon as the bits read so far match a code. Both reject
//! a table where some code is a prefix of another.

use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;

use crate::{
    bit_array::BitArray,
    error::{Error, Result, TableError},
};

/// Symbol to binary-string code mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<char, String>,
}

impl CodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the code for `symbol`. Nothing is checked until the
    /// table is used.
    pub fn insert(&mut self, symbol: char, code: impl Into<String>) -> Option<String> {
        self.codes.insert(symbol, code.into())
    }

    pub fn get(&self, symbol: char) -> Option<&str> {
        self.codes.get(&symbol).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Entries in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> {
        self.codes.iter().map(|(&symbol, code)| (symbol, code.as_str()))
    }

    /// Length of the longest code, 0 for an empty table.
    pub fn max_code_len(&self) -> usize {
        self.codes.values().map(String::len).max().unwrap_or(0)
    }

    /// Check that every code is a non-empty binary string, that every symbol of
    /// `text` has a code, and that no code is a prefix of another.
    pub fn validate(&self, text: &str) -> std::result::Result<(), TableError> {
        for (&symbol, code) in &self.codes {
            if code.is_empty() {
                return Err(TableError::EmptyCode(symbol));
            }
            if !code.chars().all(|c| c == '0' || c == '1') {
                return Err(TableError::NonBinaryCode {
                    symbol,
                    code: code.clone(),
                });
            }
        }

        if let Some(symbol) = text.chars().find(|c| !self.codes.contains_key(c)) {
            return Err(TableError::MissingSymbol(symbol));
        }

        // After sorting, a code that has a prefix in the table sorts directly
        // after a code that is also its prefix.
        let offending = self
            .codes
            .iter()
            .sorted_by(|a, b| a.1.cmp(b.1))
            .tuple_windows()
            .find(|((_, prefix), (_, code))| code.starts_with(prefix.as_str()));
        match offending {
            Some(((&prefix_symbol, prefix), (&symbol, code))) => Err(TableError::NotPrefixFree {
                symbol,
                code: code.clone(),
                prefix_symbol,
                prefix: prefix.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl<S: Into<String>> FromIterator<(char, S)> for CodeTable {
    fn from_iter<I: IntoIterator<Item = (char, S)>>(iter: I) -> Self {
        Self {
            codes: iter
                .into_iter()
                .map(|(symbol, code)| (symbol, code.into()))
                .collect(),
        }
    }
}

/// Concatenate the code of every symbol of `text`, in order.
pub fn encode(table: &CodeTable, text: &str) -> Result<BitArray> {
    table.validate(text)?;
    let mut bits = BitArray::new();
    for symbol in text.chars() {
        for c in table.codes[&symbol].chars() {
            bits.push(c == '1');
        }
    }
    Ok(bits)
}

/// Decode `bits` back into text by greedy shortest-match lookup.
///
/// Fails with [`Error::Unresolvable`] once the candidate grows past the longest
/// code without matching, or when unmatched bits remain at the end.
pub fn decode(bits: &BitArray, table: &CodeTable) -> Result<String> {
    table.validate("")?;
    let reverse: HashMap<&str, char> = table
        .codes
        .iter()
        .map(|(&symbol, code)| (code.as_str(), symbol))
        .collect();
    let max_len = table.max_code_len();

    let stream = bits.to_bin_string();
    let mut rest = stream.as_str();
    let mut text = String::new();
    let mut width = 1;
    while width <= rest.len() {
        if let Some(&symbol) = reverse.get(&rest[..width]) {
            text.push(symbol);
            rest = &rest[width..];
            width = 1;
        } else {
            width += 1;
            if width > max_len {
                return Err(Error::Unresolvable(rest[..width.min(rest.len())].to_string()));
            }
        }
    }
    if !rest.is_empty() {
        return Err(Error::Unresolvable(rest.to_string()));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> CodeTable {
        [('a', "0"), ('b', "10"), ('c', "11")].into_iter().collect()
    }

    #[test]
    fn encode_concatenates_codes_in_order() {
        let table = abc();
        assert_eq!(table.validate("abc"), Ok(()));
        let bits = encode(&table, "abc").unwrap();
        // "0" + "10" + "11"
        assert_eq!(bits.to_bin_string(), "01011");
        assert_eq!(decode(&bits, &table).unwrap(), "abc");
    }

    #[test]
    fn compression_and_decompression() {
        let table: CodeTable = [
            ('e', "00"),
            ('t', "01"),
            (' ', "100"),
            ('a', "101"),
            ('s', "1100"),
            ('h', "1101"),
            ('n', "1110"),
            ('x', "1111"),
        ]
        .into_iter()
        .collect();
        let text = "the sea as the east sent the hen a taxes tax";
        let bits = encode(&table, text).unwrap();
        assert_eq!(decode(&bits, &table).unwrap(), text);
    }

    #[test]
    fn rejects_prefix() {
        let table: CodeTable = [('a', "0"), ('b', "01")].into_iter().collect();
        assert_eq!(
            table.validate(""),
            Err(TableError::NotPrefixFree {
                symbol: 'b',
                code: "01".into(),
                prefix_symbol: 'a',
                prefix: "0".into(),
            })
        );
        assert!(matches!(
            encode(&table, "ab"),
            Err(Error::Table(TableError::NotPrefixFree { .. }))
        ));
    }

    #[test]
    fn rejects_duplicate_codes() {
        let table: CodeTable = [('a', "10"), ('b', "10")].into_iter().collect();
        assert!(matches!(
            table.validate(""),
            Err(TableError::NotPrefixFree { .. })
        ));
    }

    #[test]
    fn rejects_malformed_codes() {
        let empty: CodeTable = [('a', "")].into_iter().collect();
        assert_eq!(empty.validate(""), Err(TableError::EmptyCode('a')));
        let ternary: CodeTable = [('a', "012")].into_iter().collect();
        assert!(matches!(
            ternary.validate(""),
            Err(TableError::NonBinaryCode { symbol: 'a', .. })
        ));
        assert_eq!(abc().validate("abd"), Err(TableError::MissingSymbol('d')));
    }

    #[test]
    fn unresolvable_bits() {
        let table: CodeTable = [('a', "00"), ('b', "01")].into_iter().collect();
        let trailing: BitArray = "001".parse().unwrap();
        assert!(matches!(
            decode(&trailing, &table),
            Err(Error::Unresolvable(code)) if code == "1"
        ));
        let unknown: BitArray = "0011".parse().unwrap();
        assert!(matches!(
            decode(&unknown, &table),
            Err(Error::Unresolvable(code)) if code == "11"
        ));
    }

    #[test]
    fn empty_input() {
        let table = abc();
        assert!(encode(&table, "").unwrap().is_empty());
        assert_eq!(decode(&BitArray::new(), &table).unwrap(), "");
        assert_eq!(decode(&BitArray::new(), &CodeTable::new()).unwrap(), "");
        assert!(decode(&"0".parse().unwrap(), &CodeTable::new()).is_err());
    }
}
