use chrono::NaiveDateTime;

/// Ligne brute issue de la jointure SQL, avant coercition des dates.
/// Une ligne par article de commande: `total_amount` porte sur la commande
/// entière et se répète donc sur chacune de ses lignes.
#[derive(Debug, Clone)]
pub struct RawOrderRow {
    pub order_id: i64,
    pub user_id: i64,
    pub order_date: Option<String>,
    pub total_amount: f64,
    pub product_name: String,
    pub category: String,
    pub quantity: i64,
    pub price: f64,
    pub payment_method: Option<String>,
}

/// Résultat brut du Data Source Adapter. `has_payment_method` indique quelle
/// des deux requêtes (avec ou sans Payments) a produit les lignes.
#[derive(Debug)]
pub struct RawRowSet {
    pub rows: Vec<RawOrderRow>,
    pub has_payment_method: bool,
}

/// Ligne de commande normalisée. Une date illisible devient `None` et la
/// ligne est conservée.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRow {
    pub order_id: i64,
    pub user_id: i64,
    pub order_date: Option<NaiveDateTime>,
    pub total_amount: f64,
    pub product_name: String,
    pub category: String,
    pub quantity: i64,
    pub price: f64,
    pub payment_method: Option<String>,
}

/// Jeu de lignes en mémoire sur lequel opèrent filtres et agrégats.
/// La disponibilité de la colonne `payment_method` est décidée une seule
/// fois au chargement, jamais testée ligne à ligne.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSet {
    pub rows: Vec<OrderRow>,
    pub has_payment_method: bool,
}

impl RowSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Nombre de lignes dont la date est manquante ou n'a pas pu être lue.
    pub fn missing_dates(&self) -> usize {
        self.rows.iter().filter(|r| r.order_date.is_none()).count()
    }
}
