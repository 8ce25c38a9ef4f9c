//! Builds parameterized INSERT, SELECT, UPDATE, DELETE over the catalog tables.
//! Identifiers come from static table definitions only; values are always parameters.

use super::params::SqlParam;

const MAIN_ALIAS: &str = "main";
const PK: &str = "id";

#[derive(Debug)]
pub struct Column {
    pub name: &'static str,
    /// PostgreSQL type used to cast placeholders (e.g. `int4`).
    pub pg_type: &'static str,
}

#[derive(Debug)]
pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
    /// Columns matched by the free-text search filter.
    pub search_columns: &'static [&'static str],
}

impl Table {
    fn pg_type(&self, column: &str) -> Option<&'static str> {
        self.columns.iter().find(|c| c.name == column).map(|c| c.pg_type)
    }
}

/// A to-one relation inlined into each row as a JSON object: `related.id = main.our_key`.
#[derive(Debug)]
pub struct Include {
    pub name: &'static str,
    pub related: &'static Table,
    pub our_key: &'static str,
}

#[derive(Debug, Default)]
pub struct ListFilter {
    /// Raw search term; matched as a case-insensitive substring.
    pub search: Option<String>,
    pub equals: Vec<(&'static str, SqlParam)>,
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: SqlParam) -> u32 {
        self.params.push(v);
        self.params.len() as u32
    }

    fn placeholder(&mut self, table: &Table, column: &str, v: SqlParam) -> String {
        let n = self.push_param(v);
        match table.pg_type(column) {
            Some(t) => format!("${}::{}", n, t),
            None => format!("${}", n),
        }
    }
}

/// Quote identifier for PostgreSQL (safe: only from static definitions).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// `ILIKE` pattern matching `term` anywhere, with `\`, `%` and `_` taken literally.
pub fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

fn column_list(table: &Table) -> String {
    table
        .columns
        .iter()
        .map(|c| quoted(c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Main-table columns aliased back to their own names, followed by one scalar subquery per include.
fn select_list(table: &Table, includes: &[Include]) -> String {
    let mut parts: Vec<String> = table
        .columns
        .iter()
        .map(|c| format!("{}.{} AS {}", MAIN_ALIAS, quoted(c.name), quoted(c.name)))
        .collect();
    for inc in includes {
        parts.push(format!(
            "(SELECT row_to_json(sub) FROM (SELECT {} FROM {} WHERE {} = {}.{}) sub) AS {}",
            column_list(inc.related),
            quoted(inc.related.name),
            quoted(PK),
            MAIN_ALIAS,
            quoted(inc.our_key),
            quoted(inc.name)
        ));
    }
    parts.join(", ")
}

fn where_clause(q: &mut QueryBuf, table: &Table, filter: &ListFilter) -> String {
    let mut parts = Vec::new();
    if let Some(term) = &filter.search {
        if !table.search_columns.is_empty() {
            let n = q.push_param(SqlParam::Text(like_pattern(term)));
            let ors: Vec<String> = table
                .search_columns
                .iter()
                .map(|c| format!("{}.{} ILIKE ${}::text ESCAPE '\\'", MAIN_ALIAS, quoted(c), n))
                .collect();
            parts.push(format!("({})", ors.join(" OR ")));
        }
    }
    for (col, val) in &filter.equals {
        let ph = q.placeholder(table, col, val.clone());
        parts.push(format!("{}.{} = {}", MAIN_ALIAS, quoted(col), ph));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", parts.join(" AND "))
    }
}

/// SELECT one row by primary key, with includes.
pub fn select_by_id(table: &Table, includes: &[Include], id: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.placeholder(table, PK, id.into());
    q.sql = format!(
        "SELECT {} FROM {} {} WHERE {}.{} = {}",
        select_list(table, includes),
        quoted(table.name),
        MAIN_ALIAS,
        MAIN_ALIAS,
        quoted(PK),
        ph
    );
    q
}

/// SELECT one page ordered by primary key ascending.
pub fn select_page(
    table: &Table,
    filter: &ListFilter,
    limit: u64,
    offset: u64,
    includes: &[Include],
) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_sql = where_clause(&mut q, table, filter);
    q.sql = format!(
        "SELECT {} FROM {} {}{} ORDER BY {}.{} LIMIT {} OFFSET {}",
        select_list(table, includes),
        quoted(table.name),
        MAIN_ALIAS,
        where_sql,
        MAIN_ALIAS,
        quoted(PK),
        limit,
        offset
    );
    q
}

/// SELECT COUNT(*) under the same filter as `select_page`.
pub fn count(table: &Table, filter: &ListFilter) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_sql = where_clause(&mut q, table, filter);
    q.sql = format!("SELECT COUNT(*) FROM {} {}{}", quoted(table.name), MAIN_ALIAS, where_sql);
    q
}

/// INSERT the given columns; the id is assigned by the database and returned.
pub fn insert(table: &Table, values: Vec<(&'static str, SqlParam)>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(values.len());
    let mut placeholders = Vec::with_capacity(values.len());
    for (col, val) in values {
        placeholders.push(q.placeholder(table, col, val));
        cols.push(quoted(col));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(table.name),
        cols.join(", "),
        placeholders.join(", "),
        quoted(PK)
    );
    q
}

/// UPDATE by id, setting only the given columns. Returns the id when the row exists.
/// With nothing to set this degrades to an existence check.
pub fn update(table: &Table, id: i32, sets: Vec<(&'static str, SqlParam)>) -> QueryBuf {
    let mut q = QueryBuf::new();
    if sets.is_empty() {
        let ph = q.placeholder(table, PK, id.into());
        q.sql = format!("SELECT {} FROM {} WHERE {} = {}", quoted(PK), quoted(table.name), quoted(PK), ph);
        return q;
    }
    let mut assignments = Vec::with_capacity(sets.len());
    for (col, val) in sets {
        let ph = q.placeholder(table, col, val);
        assignments.push(format!("{} = {}", quoted(col), ph));
    }
    let id_ph = q.placeholder(table, PK, id.into());
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = {} RETURNING {}",
        quoted(table.name),
        assignments.join(", "),
        quoted(PK),
        id_ph,
        quoted(PK)
    );
    q
}

/// DELETE by id.
pub fn delete(table: &Table, id: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.placeholder(table, PK, id.into());
    q.sql = format!("DELETE FROM {} WHERE {} = {}", quoted(table.name), quoted(PK), ph);
    q
}

#[cfg(test)]
mod tests {
    use super::*;

    static PARENTS: Table = Table {
        name: "parents",
        columns: &[
            Column { name: "id", pg_type: "int4" },
            Column { name: "label", pg_type: "text" },
        ],
        search_columns: &["label"],
    };

    static CHILDREN: Table = Table {
        name: "children",
        columns: &[
            Column { name: "id", pg_type: "int4" },
            Column { name: "name", pg_type: "text" },
            Column { name: "note", pg_type: "text" },
            Column { name: "parent_id", pg_type: "int4" },
        ],
        search_columns: &["name", "note"],
    };

    static PARENT: [Include; 1] = [Include {
        name: "parent",
        related: &PARENTS,
        our_key: "parent_id",
    }];

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("cake"), "%cake%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn select_by_id_inlines_include() {
        let q = select_by_id(&CHILDREN, &PARENT, 7);
        assert_eq!(
            q.sql,
            "SELECT main.\"id\" AS \"id\", main.\"name\" AS \"name\", main.\"note\" AS \"note\", \
             main.\"parent_id\" AS \"parent_id\", \
             (SELECT row_to_json(sub) FROM (SELECT \"id\", \"label\" FROM \"parents\" WHERE \"id\" = main.\"parent_id\") sub) AS \"parent\" \
             FROM \"children\" main WHERE main.\"id\" = $1::int4"
        );
        assert_eq!(q.params, vec![SqlParam::Int(7)]);
    }

    #[test]
    fn page_combines_search_and_equality() {
        let filter = ListFilter {
            search: Some("rye".into()),
            equals: vec![("parent_id", SqlParam::Int(3))],
        };
        let q = select_page(&CHILDREN, &filter, 5, 10, &[]);
        assert!(q.sql.ends_with(
            " WHERE (main.\"name\" ILIKE $1::text ESCAPE '\\' OR main.\"note\" ILIKE $1::text ESCAPE '\\') \
             AND main.\"parent_id\" = $2::int4 ORDER BY main.\"id\" LIMIT 5 OFFSET 10"
        ));
        assert_eq!(q.params, vec![SqlParam::Text("%rye%".into()), SqlParam::Int(3)]);
    }

    #[test]
    fn count_without_filter_has_no_where() {
        let q = count(&PARENTS, &ListFilter::default());
        assert_eq!(q.sql, "SELECT COUNT(*) FROM \"parents\" main");
        assert!(q.params.is_empty());
    }

    #[test]
    fn insert_returns_id() {
        let q = insert(&PARENTS, vec![("label", SqlParam::from("a"))]);
        assert_eq!(q.sql, "INSERT INTO \"parents\" (\"label\") VALUES ($1::text) RETURNING \"id\"");
    }

    #[test]
    fn update_sets_only_given_columns() {
        let q = update(&CHILDREN, 4, vec![("note", SqlParam::Null)]);
        assert_eq!(q.sql, "UPDATE \"children\" SET \"note\" = $1::text WHERE \"id\" = $2::int4 RETURNING \"id\"");
        assert_eq!(q.params, vec![SqlParam::Null, SqlParam::Int(4)]);

        let noop = update(&CHILDREN, 4, vec![]);
        assert_eq!(noop.sql, "SELECT \"id\" FROM \"children\" WHERE \"id\" = $1::int4");
    }

    #[test]
    fn delete_by_id() {
        let q = delete(&PARENTS, 9);
        assert_eq!(q.sql, "DELETE FROM \"parents\" WHERE \"id\" = $1::int4");
    }
}
