//! In-process mock HandlerSocket server
//!
//! Speaks enough of the protocol for the client's request shapes: auth,
//! open-index, equality/range scans with limit/offset, F/W filter clauses,
//! the multi-value IN clause, inserts, updates, and deletes. State lives
//! behind a mutex so tests can seed rows and force expiries directly.

// Not every suite touches every helper
#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// One mock table with named columns and named indexes
#[derive(Debug, Clone)]
pub struct MockTable {
    pub columns: Vec<String>,
    pub indexes: HashMap<String, Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl MockTable {
    /// Per-group cache table: key (primary) / expire / data
    pub fn group_table() -> Self {
        let mut indexes = HashMap::new();
        indexes.insert("PRIMARY".to_string(), vec!["key".to_string()]);
        indexes.insert("expire".to_string(), vec!["expire".to_string()]);
        Self {
            columns: vec!["key".to_string(), "expire".to_string(), "data".to_string()],
            indexes,
            rows: Vec::new(),
        }
    }

    /// Shared cache table: type+key (primary) / expire / data
    pub fn shared_table() -> Self {
        let mut indexes = HashMap::new();
        indexes.insert(
            "PRIMARY".to_string(),
            vec!["type".to_string(), "key".to_string()],
        );
        indexes.insert("expire".to_string(), vec!["expire".to_string()]);
        Self {
            columns: vec![
                "type".to_string(),
                "key".to_string(),
                "expire".to_string(),
                "data".to_string(),
            ],
            indexes,
            rows: Vec::new(),
        }
    }

    fn col(&self, name: &str) -> usize {
        self.columns
            .iter()
            .position(|c| c == name)
            .unwrap_or_else(|| panic!("no column {name}"))
    }
}

/// Shared server state
#[derive(Default)]
pub struct State {
    pub tables: HashMap<String, MockTable>,
    pub secrets: Vec<String>,
    pub open_count: usize,
    pub lines: Vec<String>,
}

/// Handle to a running mock server
pub struct MockServer {
    pub addr: String,
    state: Arc<Mutex<State>>,
}

impl MockServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let addr = listener.local_addr().expect("local addr").to_string();
        let state: Arc<Mutex<State>> = Arc::default();

        let accept_state = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let conn_state = Arc::clone(&accept_state);
                thread::spawn(move || serve(stream, conn_state));
            }
        });

        Self { addr, state }
    }

    pub fn add_table(&self, db: &str, table: &str, schema: MockTable) {
        self.state
            .lock()
            .unwrap()
            .tables
            .insert(format!("{db}.{table}"), schema);
    }

    pub fn insert(&self, db: &str, table: &str, row: &[&str]) {
        let mut state = self.state.lock().unwrap();
        let table = state
            .tables
            .get_mut(&format!("{db}.{table}"))
            .expect("table");
        assert_eq!(row.len(), table.columns.len());
        table.rows.push(row.iter().map(|v| v.to_string()).collect());
    }

    pub fn rows(&self, db: &str, table: &str) -> Vec<Vec<String>> {
        self.state.lock().unwrap().tables[&format!("{db}.{table}")]
            .rows
            .clone()
    }

    /// Overwrite one cell in every row where `match_col` equals `match_val`
    pub fn set_cell(&self, db: &str, table: &str, match_col: &str, match_val: &str, col: &str, val: &str) {
        let mut state = self.state.lock().unwrap();
        let table = state
            .tables
            .get_mut(&format!("{db}.{table}"))
            .expect("table");
        let match_idx = table.col(match_col);
        let set_idx = table.col(col);
        for row in &mut table.rows {
            if row[match_idx] == match_val {
                row[set_idx] = val.to_string();
            }
        }
    }

    pub fn open_count(&self) -> usize {
        self.state.lock().unwrap().open_count
    }

    pub fn secrets(&self) -> Vec<String> {
        self.state.lock().unwrap().secrets.clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.state.lock().unwrap().lines.clone()
    }
}

// =============================================================================
// Connection handling
// =============================================================================

#[derive(Debug, Clone)]
struct OpenIndex {
    db: String,
    table: String,
    index: String,
    columns: Vec<String>,
    fcolumns: Vec<String>,
}

fn serve(stream: TcpStream, state: Arc<Mutex<State>>) {
    let Ok(read_half) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(read_half);
    let mut writer = stream;
    let mut open: HashMap<u32, OpenIndex> = HashMap::new();

    loop {
        let mut raw = Vec::new();
        match reader.read_until(b'\n', &mut raw) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        if raw.last() != Some(&b'\n') {
            return;
        }
        raw.pop();

        let fields: Vec<String> = raw
            .split(|b| *b == b'\t')
            .map(|f| String::from_utf8_lossy(&unescape(f)).into_owned())
            .collect();

        state
            .lock()
            .unwrap()
            .lines
            .push(String::from_utf8_lossy(&raw).into_owned());

        let reply = dispatch(&fields, &mut open, &state);
        if writer.write_all(reply.as_bytes()).is_err() {
            return;
        }
    }
}

fn unescape(field: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(field.len());
    let mut i = 0;
    while i < field.len() {
        if field[i] == 0x01 && i + 1 < field.len() && (0x40..=0x4F).contains(&field[i + 1]) {
            out.push(field[i + 1] - 0x40);
            i += 2;
        } else {
            out.push(field[i]);
            i += 1;
        }
    }
    out
}

fn dispatch(
    fields: &[String],
    open: &mut HashMap<u32, OpenIndex>,
    state: &Arc<Mutex<State>>,
) -> String {
    match fields[0].as_str() {
        "A" => {
            state
                .lock()
                .unwrap()
                .secrets
                .push(fields.get(2).cloned().unwrap_or_default());
            "0\t1\n".to_string()
        }
        "P" => open_index(fields, open, state),
        _ => execute(fields, open, state),
    }
}

fn open_index(
    fields: &[String],
    open: &mut HashMap<u32, OpenIndex>,
    state: &Arc<Mutex<State>>,
) -> String {
    let Ok(id) = fields[1].parse::<u32>() else {
        return "2\t1\tbad index id\n".to_string();
    };
    let (db, table, index) = (fields[2].clone(), fields[3].clone(), fields[4].clone());

    let mut st = state.lock().unwrap();
    if !st.tables.contains_key(&format!("{db}.{table}")) {
        return "2\t1\tno such table\n".to_string();
    }
    st.open_count += 1;
    drop(st);

    open.insert(
        id,
        OpenIndex {
            db,
            table,
            index,
            columns: split_csv(fields.get(5)),
            fcolumns: split_csv(fields.get(6)),
        },
    );
    "0\t1\n".to_string()
}

fn split_csv(field: Option<&String>) -> Vec<String> {
    field
        .map(|f| {
            f.split(',')
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn execute(
    fields: &[String],
    open: &mut HashMap<u32, OpenIndex>,
    state: &Arc<Mutex<State>>,
) -> String {
    let Some(oi) = fields[0].parse::<u32>().ok().and_then(|id| open.get(&id)) else {
        return "2\t1\tno such index\n".to_string();
    };
    let oi = oi.clone();

    let mut st = state.lock().unwrap();
    let Some(table) = st.tables.get_mut(&format!("{}.{}", oi.db, oi.table)) else {
        return "2\t1\tno such table\n".to_string();
    };

    let op = fields[1].as_str();
    if op == "+" {
        return insert_row(fields, &oi, table);
    }

    let Ok(arity) = fields[2].parse::<usize>() else {
        return "2\t1\tbad key arity\n".to_string();
    };
    let keys: Vec<&str> = fields[3..3 + arity].iter().map(String::as_str).collect();
    let mut rest: &[String] = &fields[3 + arity..];

    let mut limit = 1usize;
    let mut offset = 0usize;
    if rest.len() >= 2 {
        if let (Ok(l), Ok(o)) = (rest[0].parse(), rest[1].parse()) {
            limit = l;
            offset = o;
            rest = &rest[2..];
        }
    }

    let mut filters: Vec<(String, String, usize, String)> = Vec::new();
    let mut in_clause: Option<(usize, Vec<String>)> = None;
    loop {
        match rest.first().map(String::as_str) {
            Some("F") | Some("W") => {
                filters.push((
                    rest[0].clone(),
                    rest[1].clone(),
                    rest[2].parse().unwrap_or(0),
                    rest[3].clone(),
                ));
                rest = &rest[4..];
            }
            Some("@") => {
                let icol: usize = rest[1].parse().unwrap_or(0);
                let ivlen: usize = rest[2].parse().unwrap_or(0);
                in_clause = Some((icol, rest[3..3 + ivlen].to_vec()));
                rest = &rest[3 + ivlen..];
            }
            _ => break,
        }
    }

    let mutation = rest.first().cloned();
    let args: Vec<String> = rest.iter().skip(1).cloned().collect();

    let Some(index_cols) = table.indexes.get(&oi.index).cloned() else {
        return "2\t1\tno such index name\n".to_string();
    };

    // IN clause: the engine resolves the column position within the index;
    // positions past the end fall back to the last index column
    let in_pos = in_clause
        .as_ref()
        .map(|(icol, _)| (*icol).min(index_cols.len().saturating_sub(1)));

    let mut selected: Vec<usize> = Vec::new();
    'rows: for (i, row) in table.rows.iter().enumerate() {
        for (j, key) in keys.iter().enumerate().take(index_cols.len()) {
            if Some(j) == in_pos {
                continue;
            }
            if !compare(op, &row[table.col(&index_cols[j])], key) {
                continue 'rows;
            }
        }
        if let (Some(pos), Some((_, values))) = (in_pos, in_clause.as_ref()) {
            if !values.contains(&row[table.col(&index_cols[pos])]) {
                continue 'rows;
            }
        }
        for (ftype, fop, fcol, fval) in &filters {
            let name = resolve_filter_col(&oi.fcolumns, *fcol);
            let Some(name) = name else { continue };
            if !compare(fop, &row[table.col(&name)], fval) {
                if ftype == "W" {
                    break 'rows;
                }
                continue 'rows;
            }
        }
        selected.push(i);
    }

    let selected: Vec<usize> = selected.into_iter().skip(offset).take(limit).collect();

    match mutation.as_deref() {
        Some("U") => {
            for &i in &selected {
                for (col, arg) in oi.columns.iter().zip(&args) {
                    let pos = table.col(col);
                    table.rows[i][pos] = arg.clone();
                }
            }
            format!("0\t1\t{}\n", selected.len())
        }
        Some("D") => {
            for &i in selected.iter().rev() {
                table.rows.remove(i);
            }
            format!("0\t1\t{}\n", selected.len())
        }
        Some(_) => "0\t1\t0\n".to_string(),
        None => {
            let numcols = oi.columns.len();
            if numcols == 0 {
                return "0\t0\n".to_string();
            }
            let mut reply = format!("0\t{numcols}");
            for &i in &selected {
                for col in &oi.columns {
                    reply.push('\t');
                    reply.push_str(&table.rows[i][table.col(col)]);
                }
            }
            reply.push('\n');
            reply
        }
    }
}

fn resolve_filter_col(fcolumns: &[String], fcol: usize) -> Option<String> {
    if fcolumns.is_empty() {
        return None;
    }
    Some(fcolumns[fcol.min(fcolumns.len() - 1)].clone())
}

fn insert_row(fields: &[String], oi: &OpenIndex, table: &mut MockTable) -> String {
    let Ok(arity) = fields[2].parse::<usize>() else {
        return "2\t1\tbad insert arity\n".to_string();
    };
    let values = &fields[3..3 + arity];

    let mut row = vec![String::new(); table.columns.len()];
    for (col, value) in oi.columns.iter().zip(values) {
        let pos = table.col(col);
        row[pos] = value.clone();
    }

    let pk = table.indexes["PRIMARY"].clone();
    let duplicate = table.rows.iter().any(|existing| {
        pk.iter()
            .all(|col| existing[table.col(col)] == row[table.col(col)])
    });
    if duplicate {
        return "1\t1\t121\n".to_string();
    }

    table.rows.push(row);
    "0\t1\n".to_string()
}

fn compare(op: &str, cell: &str, key: &str) -> bool {
    use std::cmp::Ordering;

    let ord = match (cell.parse::<i128>(), key.parse::<i128>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => cell.cmp(key),
    };

    match op {
        "=" => ord == Ordering::Equal,
        "<" => ord == Ordering::Less,
        "<=" => ord != Ordering::Greater,
        ">" => ord == Ordering::Greater,
        ">=" => ord != Ordering::Less,
        _ => false,
    }
}
