//! Protocol Module
//!
//! Defines the HandlerSocket wire protocol spoken by the client.
//!
//! ## Wire Format (line-oriented, tab-delimited)
//!
//! ### Request
//! ```text
//! <field> TAB <field> TAB ... <field> LF
//! ```
//!
//! ### Commands
//! - `A 1 <secret>`                                  - authenticate
//! - `P <id> <db> <table> <index> <cols> [<fcols>]`  - open index
//! - `<id> <op> <arity> <keys...> [...]`             - execute on open index
//!
//! ### Response
//! ```text
//! 0 <numcols> <value>...      (success: values chunk into rows of numcols)
//! <code> <_> [<message>]      (failure: code != 0)
//! ```
//!
//! ### Escaping
//! Bytes 0x00-0x0F inside a field are carried as 0x01 followed by the byte
//! shifted up by 0x40, keeping the tab/newline framing bytes unambiguous.
//! A field of the single byte 0x00 is the logical NULL.

mod codec;
mod command;
mod response;

pub use codec::{build_line, decode_field, encode_value, escape, unescape, Value};
pub use codec::{EOL, ESC, ESC_SHIFT, NULL, SEP};
pub use command::{FilterType, Mutation, Operator, AUTH, IN_CLAUSE, OPEN_INDEX};
pub use response::{parse_reply, Row};
