use rusqlite::Connection;

use crate::db::setup::open_source_db;
use crate::error::AppError;
use crate::orders::types::{RawOrderRow, RawRowSet};

/// Jointure principale: commandes × lignes × produits, paiements en
/// jointure externe gauche.
const ORDERS_WITH_PAYMENTS_SQL: &str = "
    SELECT o.order_id, o.user_id, o.order_date, o.total_amount,
           p.product_name, p.category, od.quantity, od.price,
           pay.payment_method
    FROM Orders o
    JOIN OrderDetails od ON o.order_id = od.order_id
    JOIN Products p ON od.product_id = p.product_id
    LEFT JOIN Payments pay ON o.order_id = pay.order_id";

/// Jointure de repli quand la relation Payments n'existe pas.
const ORDERS_WITHOUT_PAYMENTS_SQL: &str = "
    SELECT o.order_id, o.user_id, o.order_date, o.total_amount,
           p.product_name, p.category, od.quantity, od.price
    FROM Orders o
    JOIN OrderDetails od ON o.order_id = od.order_id
    JOIN Products p ON od.product_id = p.product_id";

/// Ouvre la base source, récupère les lignes de commande et referme la
/// connexion quoi qu'il arrive (destruction en sortie de portée).
pub fn fetch_orders(path: &str) -> Result<RawRowSet, AppError> {
    let conn =
        open_source_db(path).map_err(|e| AppError::DataSource(format!("{}: {}", path, e)))?;
    fetch_orders_from(&conn)
}

/// Cœur du Data Source Adapter, sur une connexion déjà ouverte (utile aux
/// tests). Stratégie en deux temps: la requête étendue d'abord; si et
/// seulement si elle échoue faute de relation Payments, la requête réduite.
/// Tout autre échec, comme l'échec du repli, est une erreur de source de
/// données, sans nouvelle tentative.
pub fn fetch_orders_from(conn: &Connection) -> Result<RawRowSet, AppError> {
    match query_rows(conn, ORDERS_WITH_PAYMENTS_SQL, true) {
        Ok(rows) => Ok(RawRowSet {
            rows,
            has_payment_method: true,
        }),
        Err(e) if is_missing_payments(&e) => {
            log::warn!("Relation Payments absente, requête réduite sans moyens de paiement");
            match query_rows(conn, ORDERS_WITHOUT_PAYMENTS_SQL, false) {
                Ok(rows) => Ok(RawRowSet {
                    rows,
                    has_payment_method: false,
                }),
                Err(e2) => Err(AppError::DataSource(format!(
                    "requête principale: {} / requête de repli: {}",
                    e, e2
                ))),
            }
        }
        Err(e) => Err(AppError::DataSource(e.to_string())),
    }
}

/// Vrai uniquement pour une condition « relation introuvable » visant
/// Payments. Les autres échecs SQL ne doivent pas déclencher le repli.
fn is_missing_payments(err: &rusqlite::Error) -> bool {
    let msg = err.to_string().to_lowercase();
    (msg.contains("no such table") || msg.contains("no such column")) && msg.contains("payment")
}

fn query_rows(
    conn: &Connection,
    sql: &str,
    with_payment: bool,
) -> Result<Vec<RawOrderRow>, rusqlite::Error> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |row| {
        Ok(RawOrderRow {
            order_id: row.get(0)?,
            user_id: row.get(1)?,
            order_date: row.get(2)?,
            total_amount: row.get(3)?,
            product_name: row.get(4)?,
            category: row.get(5)?,
            quantity: row.get(6)?,
            price: row.get(7)?,
            payment_method: if with_payment { row.get(8)? } else { None },
        })
    })?;

    let collected = rows.collect::<Result<Vec<_>, _>>()?;
    log::info!("{} ligne(s) de commande chargées", collected.len());
    Ok(collected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_complete() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(include_str!("sql/ecommerce_schema.sql"))
            .unwrap();
        conn.execute_batch(
            "
            INSERT INTO Orders VALUES (1, 100, '2024-01-10 09:00:00', 150.0);
            INSERT INTO Orders VALUES (2, 200, '2024-02-05 12:00:00', 80.0);
            INSERT INTO Products VALUES (1, 'Clavier', 'Electronics');
            INSERT INTO Products VALUES (2, 'Roman', 'Books');
            INSERT INTO OrderDetails VALUES (1, 1, 2, 50.0);
            INSERT INTO OrderDetails VALUES (1, 2, 1, 50.0);
            INSERT INTO OrderDetails VALUES (2, 2, 4, 20.0);
            INSERT INTO Payments VALUES (1, 'card');
        ",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_requete_principale_avec_paiements() {
        let conn = base_complete();
        let jeu = fetch_orders_from(&conn).unwrap();

        assert!(jeu.has_payment_method);
        // 2 lignes pour la commande 1, 1 ligne pour la commande 2
        assert_eq!(jeu.rows.len(), 3);

        let ligne1 = jeu.rows.iter().find(|r| r.product_name == "Clavier").unwrap();
        assert_eq!(ligne1.order_id, 1);
        assert_eq!(ligne1.user_id, 100);
        assert_eq!(ligne1.total_amount, 150.0);
        assert_eq!(ligne1.quantity, 2);
        assert_eq!(ligne1.payment_method.as_deref(), Some("card"));

        // Jointure externe: la commande 2 n'a pas de paiement
        let ligne2 = jeu.rows.iter().find(|r| r.order_id == 2).unwrap();
        assert!(ligne2.payment_method.is_none());
    }

    #[test]
    fn test_repli_sans_table_payments() {
        let conn = base_complete();
        conn.execute_batch("DROP TABLE Payments;").unwrap();

        let jeu = fetch_orders_from(&conn).unwrap();
        assert!(!jeu.has_payment_method);
        assert_eq!(jeu.rows.len(), 3);
        assert!(jeu.rows.iter().all(|r| r.payment_method.is_none()));
    }

    #[test]
    fn test_echec_des_deux_requetes() {
        let conn = Connection::open_in_memory().unwrap();
        // Aucune table: la principale échoue sur Orders, pas sur Payments,
        // donc pas de repli, erreur de source de données directe.
        let err = fetch_orders_from(&conn).unwrap_err();
        assert!(matches!(err, AppError::DataSource(_)));
    }

    #[test]
    fn test_detection_relation_payments() {
        let conn = Connection::open_in_memory().unwrap();
        let missing_payments = conn
            .prepare("SELECT payment_method FROM Payments")
            .unwrap_err();
        assert!(is_missing_payments(&missing_payments));

        let missing_orders = conn.prepare("SELECT * FROM Orders").unwrap_err();
        assert!(!is_missing_payments(&missing_orders));
    }

    #[test]
    fn test_fetch_orders_chemin_invalide() {
        let err = fetch_orders("/nonexistent/boutique.db").unwrap_err();
        assert!(matches!(err, AppError::DataSource(_)));
    }
}
