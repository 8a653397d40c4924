use anyhow::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use sqlx::postgres::PgPoolOptions;
use std::path::PathBuf;
use tokio::fs;

pub type DbPool = sqlx::PgPool;
pub type OrmConn = DatabaseConnection;

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Create a SeaORM connection.
pub async fn create_orm_conn(database_url: &str) -> Result<OrmConn> {
    let conn = Database::connect(database_url).await?;
    Ok(conn)
}

/// Minimal migration runner that executes SQL files in `migrations/` in filename order.
pub async fn run_migrations(conn: &OrmConn) -> Result<()> {
    let mut entries = fs::read_dir("migrations").await?;
    let mut files: Vec<PathBuf> = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    let backend = conn.get_database_backend();
    for file in files {
        let sql = fs::read_to_string(&file).await?;
        // Postgres prepared statements cannot contain multiple commands,
        // so split the migration file and run each statement individually.
        for stmt in split_statements(&sql) {
            conn.execute(Statement::from_string(backend, stmt)).await?;
        }
    }

    Ok(())
}

/// Split a migration file on `;`, keeping dollar-quoted function bodies intact.
fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_dollar = false;

    let mut rest = sql;
    while let Some(idx) = rest.find(|c| c == ';' || c == '$') {
        let (head, tail) = rest.split_at(idx);
        current.push_str(head);
        if tail.starts_with("$$") {
            in_dollar = !in_dollar;
            current.push_str("$$");
            rest = &tail[2..];
        } else if tail.starts_with(';') {
            current.push(';');
            rest = &tail[1..];
            if !in_dollar {
                let stmt = current.trim();
                if !stmt.is_empty() && stmt != ";" {
                    statements.push(stmt.to_string());
                }
                current.clear();
            }
        } else {
            current.push('$');
            rest = &tail[1..];
        }
    }
    current.push_str(rest);
    let stmt = current.trim();
    if !stmt.is_empty() && stmt != ";" {
        statements.push(format!("{stmt};"));
    }
    statements
}

#[cfg(test)]
mod tests {
    use super::split_statements;

    #[test]
    fn splits_plain_statements() {
        let stmts = split_statements("CREATE TABLE a (id int);\nCREATE TABLE b (id int);\n");
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].starts_with("CREATE TABLE a"));
    }

    #[test]
    fn keeps_dollar_quoted_bodies_whole() {
        let sql = "CREATE FUNCTION f() RETURNS void AS $$\nBEGIN\nUPDATE t SET x = 1;\nEND;\n$$ LANGUAGE plpgsql;\nCREATE TABLE c (id int);";
        let stmts = split_statements(sql);
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].contains("UPDATE t SET x = 1;"));
        assert!(stmts[1].starts_with("CREATE TABLE c"));
    }
}
