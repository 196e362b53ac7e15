//! Reply parsing
//!
//! Turns one raw reply line into structured rows.

use crate::error::{HsError, Result};

use super::codec::{decode_field, SEP};

/// One decoded result row; NULL fields are `None`
pub type Row = Vec<Option<Vec<u8>>>;

/// Parse a reply line (terminator already stripped)
///
/// Field 0 is the error code. Nonzero codes surface as
/// [`HsError::Protocol`], carrying field 2 as the message when present
/// (field 1 is not part of the error payload). On success, field 1 declares
/// the column count and the remaining fields chunk into fixed-width rows; a
/// remainder that does not divide evenly is a protocol inconsistency and
/// fails fast rather than truncating.
pub fn parse_reply(line: &[u8]) -> Result<Vec<Row>> {
    let fields: Vec<&[u8]> = line.split(|b| *b == SEP).collect();

    let code = parse_int(fields[0])
        .ok_or_else(|| HsError::Malformed(format!("bad error code: {:?}", lossy(fields[0]))))?;

    if code != 0 {
        let message = fields
            .get(2)
            .and_then(|raw| decode_field(raw))
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned());
        return Err(HsError::Protocol {
            code: code as i32,
            message,
        });
    }

    let numcols = fields
        .get(1)
        .and_then(|raw| parse_int(raw))
        .ok_or_else(|| HsError::Malformed("missing column count".to_string()))? as usize;

    let values: Vec<Option<Vec<u8>>> = fields[2..].iter().map(|raw| decode_field(raw)).collect();

    if numcols == 0 {
        if !values.is_empty() {
            return Err(HsError::Malformed(format!(
                "{} values in a zero-column reply",
                values.len()
            )));
        }
        return Ok(Vec::new());
    }

    if values.len() % numcols != 0 {
        return Err(HsError::Malformed(format!(
            "{} values do not chunk into rows of {}",
            values.len(),
            numcols
        )));
    }

    Ok(values.chunks(numcols).map(|chunk| chunk.to_vec()).collect())
}

fn parse_int(raw: &[u8]) -> Option<i64> {
    std::str::from_utf8(raw).ok()?.parse().ok()
}

fn lossy(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}
