//! Self-describing blob holding a code table and an encoded payload.
//!
//! Layout, as one bit array in little-endian bit order:
//! - 32 bits: bit length `T` of the serialized table
//! - `T` bits: the table (`u32` entry count, then per entry a `u32` code point,
//!   a `u16` code length in bits and the code as ASCII `'0'`/`'1'`, all
//!   big-endian)
//! - 64 bits: bit length `P` of the payload
//! - `P` bits: the payload
//!
//! The blob is padded with zero bits to a whole number of bytes.

use std::io::{self, Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::{
    bit_array::BitArray,
    codec::CodeTable,
    error::{Error, Result},
};

const TABLE_LEN_BITS: usize = 32;
const PAYLOAD_LEN_BITS: usize = 64;

fn serialize_table(table: &CodeTable) -> Result<Vec<u8>> {
    let count = u32::try_from(table.len())
        .map_err(|_| Error::Container(format!("{} table entries do not fit", table.len())))?;
    let mut out = vec![];
    out.write_u32::<BigEndian>(count)?;
    for (symbol, code) in table.iter() {
        let code_len = u16::try_from(code.len()).map_err(|_| {
            Error::Container(format!(
                "code for symbol {symbol:?} is {} bits, at most {} fit",
                code.len(),
                u16::MAX
            ))
        })?;
        out.write_u32::<BigEndian>(symbol as u32)?;
        out.write_u16::<BigEndian>(code_len)?;
        out.extend_from_slice(code.as_bytes());
    }
    Ok(out)
}

fn parse_table(bytes: &[u8]) -> Result<CodeTable> {
    let truncated = |_: io::Error| Error::Container("truncated code table".into());
    let mut reader = Cursor::new(bytes);
    let count = reader.read_u32::<BigEndian>().map_err(truncated)?;
    let mut table = CodeTable::new();
    for _ in 0..count {
        let point = reader.read_u32::<BigEndian>().map_err(truncated)?;
        let symbol = char::from_u32(point)
            .ok_or_else(|| Error::Container(format!("invalid symbol {point:#x}")))?;
        let mut code = vec![0; reader.read_u16::<BigEndian>().map_err(truncated)? as usize];
        reader.read_exact(&mut code).map_err(truncated)?;
        let code = String::from_utf8(code)
            .map_err(|_| Error::Container(format!("non-text code for symbol {symbol:?}")))?;
        table.insert(symbol, code);
    }
    if reader.position() as usize != bytes.len() {
        return Err(Error::Container("trailing bytes after code table".into()));
    }
    Ok(table)
}

/// Serialize `table` and `payload` into one blob.
///
/// Fails if a code is longer than `u16::MAX` bits or the serialized table is
/// longer than `u32::MAX` bits.
pub fn pack(table: &CodeTable, payload: &BitArray) -> Result<Vec<u8>> {
    let table = BitArray::from_bytes(&serialize_table(table)?, None);
    let table_len = u32::try_from(table.len()).map_err(|_| {
        Error::Container(format!(
            "serialized table is {} bits, at most {} fit",
            table.len(),
            u32::MAX
        ))
    })?;
    let mut blob = BitArray::from_u128(table_len as u128, Some(TABLE_LEN_BITS));
    blob += &table;
    blob += &BitArray::from_u128(payload.len() as u128, Some(PAYLOAD_LEN_BITS));
    blob += payload;
    Ok(blob.to_bytes())
}

/// Read a length field of `width` bits at `offset`.
fn read_len(blob: &BitArray, offset: usize, width: usize) -> Result<usize> {
    if blob.len() < offset + width {
        return Err(Error::Container("truncated length field".into()));
    }
    let field = blob.slice(offset as isize..(offset + width) as isize);
    field
        .to_u128()
        .and_then(|len| usize::try_from(len).ok())
        .ok_or_else(|| Error::Container("length field too large".into()))
}

/// Split a blob produced by [`pack`] back into its table and payload.
pub fn unpack(bytes: &[u8]) -> Result<(CodeTable, BitArray)> {
    let blob = BitArray::from_bytes(bytes, None);

    let table_len = read_len(&blob, 0, TABLE_LEN_BITS)?;
    let table_start = TABLE_LEN_BITS;
    let table_end = table_start + table_len;
    if table_len % 8 != 0 || blob.len() < table_end {
        return Err(Error::Container("truncated code table".into()));
    }
    let table = parse_table(&blob.slice(table_start as isize..table_end as isize).to_bytes())?;

    let payload_len = read_len(&blob, table_end, PAYLOAD_LEN_BITS)?;
    let payload_start = table_end + PAYLOAD_LEN_BITS;
    let payload_end = payload_start
        .checked_add(payload_len)
        .filter(|&end| end <= blob.len())
        .ok_or_else(|| Error::Container("truncated payload".into()))?;
    if blob.len() - payload_end >= 8 {
        return Err(Error::Container("trailing bytes after payload".into()));
    }
    let payload = blob.slice(payload_start as isize..payload_end as isize);

    Ok((table, payload))
}
