use crate::db::result::ResultSet;
use crate::db::schema::{ColumnInfo, TableSchema};
use crate::db::{DatabaseGateway, ExecutionError};
use crate::error::Result;
use rusqlite::types::Value;
use rusqlite::{params, Batch, Connection};

const MULTIPLE_STATEMENTS: &str = "You can only execute one statement at a time.";

const CREATE_PRODUCTS: &str = "CREATE TABLE products (
    product_id INTEGER PRIMARY KEY,
    product_name TEXT,
    city TEXT,
    sale_date DATE,
    quantity INTEGER,
    price DECIMAL(10,2)
)";

const CREATE_USERS: &str = "CREATE TABLE users (
    user_id INTEGER PRIMARY KEY,
    user_name TEXT,
    email TEXT,
    registration_date DATE
)";

const CREATE_PURCHASES: &str = "CREATE TABLE purchases (
    purchase_id INTEGER PRIMARY KEY,
    user_id INTEGER,
    product_id INTEGER,
    purchase_date DATE,
    quantity INTEGER,
    FOREIGN KEY(user_id) REFERENCES users(user_id),
    FOREIGN KEY(product_id) REFERENCES products(product_id)
)";

const PRODUCTS: &[(i64, &str, &str, &str, i64, f64)] = &[
    (1, "Laptop", "Bangalore", "2023-10-01", 5, 999.99),
    (2, "Smartphone", "Bangalore", "2023-10-02", 10, 699.99),
    (3, "Tablet", "Mumbai", "2023-10-03", 8, 499.99),
    (4, "Headphones", "Bangalore", "2023-10-04", 15, 149.99),
    (5, "Monitor", "Delhi", "2023-10-05", 3, 249.99),
];

const USERS: &[(i64, &str, &str, &str)] = &[
    (1, "John Doe", "john@example.com", "2023-01-15"),
    (2, "Jane Smith", "jane@example.com", "2023-02-20"),
    (3, "Bob Johnson", "bob@example.com", "2023-03-10"),
];

const PURCHASES: &[(i64, i64, i64, &str, i64)] = &[
    (1, 1, 1, "2023-10-01", 1),
    (2, 1, 2, "2023-10-02", 2),
    (3, 2, 1, "2023-10-03", 1),
    (4, 2, 3, "2023-10-04", 1),
    (5, 2, 4, "2023-10-05", 3),
    (6, 3, 2, "2023-10-06", 1),
    (7, 3, 5, "2023-10-07", 2),
];

/// ephemeral sqlite database living for the duration of one run
pub struct Database {
    conn: Connection,
}

impl Database {
    /// empty in-memory database
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// in-memory database with the products/users/purchases sample tables
    #[tracing::instrument]
    pub fn with_sample_data() -> Result<Self> {
        let mut db = Self::in_memory()?;
        db.bootstrap()?;
        Ok(db)
    }

    fn bootstrap(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute(CREATE_PRODUCTS, [])?;
        tx.execute(CREATE_USERS, [])?;
        tx.execute(CREATE_PURCHASES, [])?;

        {
            let mut stmt = tx.prepare("INSERT INTO products VALUES (?1, ?2, ?3, ?4, ?5, ?6)")?;
            for (id, name, city, date, qty, price) in PRODUCTS {
                stmt.execute(params![id, name, city, date, qty, price])?;
            }

            let mut stmt = tx.prepare("INSERT INTO users VALUES (?1, ?2, ?3, ?4)")?;
            for (id, name, email, date) in USERS {
                stmt.execute(params![id, name, email, date])?;
            }

            let mut stmt = tx.prepare("INSERT INTO purchases VALUES (?1, ?2, ?3, ?4, ?5)")?;
            for (id, user_id, product_id, date, qty) in PURCHASES {
                stmt.execute(params![id, user_id, product_id, date, qty])?;
            }
        }

        tx.commit()?;

        tracing::info!(
            products = PRODUCTS.len(),
            users = USERS.len(),
            purchases = PURCHASES.len(),
            "sample database bootstrapped"
        );

        Ok(())
    }

    /// run trusted setup statements, e.g. fixtures
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e)?;
        tracing::debug!("database closed");
        Ok(())
    }
}

impl DatabaseGateway for Database {
    fn schema(&self) -> std::result::Result<Vec<TableSchema>, ExecutionError> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        )?;
        let tables = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut schema = Vec::with_capacity(tables.len());
        for table in tables {
            let mut info = self
                .conn
                .prepare("SELECT name, type FROM pragma_table_info(?1)")?;
            let columns = info
                .query_map([&table], |row| {
                    Ok(ColumnInfo {
                        name: row.get(0)?,
                        declared_type: row.get(1)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            schema.push(TableSchema { table, columns });
        }

        Ok(schema)
    }

    #[tracing::instrument(skip(self), fields(sql_length = sql.len()))]
    fn execute(&self, sql: &str) -> std::result::Result<ResultSet, ExecutionError> {
        // the whole input must be exactly one statement; nothing runs otherwise
        let mut batch = Batch::new(&self.conn, sql);
        let mut stmt = batch
            .next()?
            .ok_or_else(|| ExecutionError::Engine("no statement to execute".to_string()))?;
        if batch.next()?.is_some() {
            return Err(ExecutionError::Engine(MULTIPLE_STATEMENTS.to_string()));
        }

        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let mut rows = Vec::new();
        let mut cursor = stmt.query([])?;
        while let Some(row) = cursor.next()? {
            let mut values = Vec::with_capacity(columns.len());
            for idx in 0..columns.len() {
                values.push(row.get::<_, Value>(idx)?);
            }
            rows.push(values);
        }

        tracing::debug!(rows = rows.len(), "statement executed");

        Ok(ResultSet { columns, rows })
    }
}
