use rusqlite::{Connection, OpenFlags};

/// Ouvre la base e-commerce source en lecture seule. La connexion est
/// fermée à la destruction, quel que soit le chemin de sortie de l'appelant.
pub fn open_source_db(path: &str) -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;

    conn.execute_batch(
        "
        PRAGMA busy_timeout = 5000;
        PRAGMA cache_size = -64000;
        PRAGMA temp_store = MEMORY;
    ",
    )?;

    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ouverture_lecture_seule() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boutique.db");
        let path_str = path.to_str().unwrap();

        // Création du fichier via une connexion classique
        let conn = Connection::open(path_str).unwrap();
        conn.execute_batch("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (1);")
            .unwrap();
        drop(conn);

        let ro = open_source_db(path_str).unwrap();
        let x: i64 = ro.query_row("SELECT x FROM t", [], |row| row.get(0)).unwrap();
        assert_eq!(x, 1);

        // Toute écriture doit échouer
        assert!(ro.execute("INSERT INTO t VALUES (2)", []).is_err());
    }

    #[test]
    fn test_fichier_absent_echoue() {
        assert!(open_source_db("/nonexistent/boutique.db").is_err());
    }
}
