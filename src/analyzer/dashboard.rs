/// Agrégats du tableau de bord des ventes: KPI, tendance du chiffre
/// d'affaires, classements produits/catégories/paiements, dernières
/// commandes.
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use serde::Serialize;

use crate::analyzer::stats::{moyenne, pct, round2};
use crate::orders::normalize::format_order_date;
use crate::orders::types::{OrderRow, RowSet};

/// Taille des classements (produits, clients, dernières commandes).
const TOP_N: usize = 10;

// ─── Structures de données ───────────────────────────────────────────────────

/// Résultat d'un rendu. `Empty` court-circuite tous les agrégats: aucune
/// moyenne ni somme n'est calculée sur un jeu vide.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "status", content = "data")]
pub enum DashboardPayload {
    #[serde(rename = "empty")]
    Empty,
    #[serde(rename = "ready")]
    Ready(DashboardData),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub meta: DashboardMeta,
    pub kpi: Kpis,
    pub tendance_ca: Vec<TrendPoint>,
    pub top_produits: Vec<ProductSales>,
    pub ca_par_categorie: Vec<CategorySales>,
    pub paiements: PaymentSection,
    pub dernieres_commandes: Vec<LatestOrder>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMeta {
    pub nb_lignes: usize,
    pub has_payment_method: bool,
    pub calcul_duration_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub ca_total: f64,
    pub nb_commandes: usize,
    pub nb_clients: usize,
    pub panier_moyen: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: String,
    pub ca: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    pub product_name: String,
    pub quantite: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySales {
    pub category: String,
    pub ca: f64,
    pub part_pct: f64,
}

/// Section paiements du tableau de bord. Quand la relation Payments est
/// absente, ou qu'aucune ligne filtrée ne porte de moyen de paiement, la
/// surface affiche à la place le top clients par dépenses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "items")]
pub enum PaymentSection {
    #[serde(rename = "parMoyenPaiement")]
    MoyensPaiement(Vec<PaymentSales>),
    #[serde(rename = "topClients")]
    TopClients(Vec<CustomerSpend>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSales {
    pub payment_method: String,
    pub ca: f64,
    pub part_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSpend {
    pub user_id: i64,
    pub ca: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestOrder {
    pub order_id: i64,
    pub user_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub total_amount: f64,
    pub order_date: Option<String>,
}

// ─── Point d'entrée ──────────────────────────────────────────────────────────

/// Construit le tableau de bord complet à partir du jeu de lignes filtré.
pub fn build_dashboard(rows: &RowSet) -> DashboardPayload {
    if rows.is_empty() {
        return DashboardPayload::Empty;
    }

    let start = Instant::now();

    let mut data = DashboardData {
        meta: DashboardMeta {
            nb_lignes: rows.len(),
            has_payment_method: rows.has_payment_method,
            calcul_duration_ms: 0,
        },
        kpi: build_kpis(rows),
        tendance_ca: build_tendance_ca(rows),
        top_produits: build_top_produits(rows),
        ca_par_categorie: build_ca_par_categorie(rows),
        paiements: build_paiements(rows),
        dernieres_commandes: build_dernieres_commandes(rows),
    };
    data.meta.calcul_duration_ms = start.elapsed().as_millis() as u64;

    DashboardPayload::Ready(data)
}

// ─── Constructeurs de sections ───────────────────────────────────────────────

fn build_kpis(rows: &RowSet) -> Kpis {
    // total_amount est dénormalisé par commande et se répète sur chaque
    // ligne d'article: la somme et la moyenne sont volontairement
    // calculées par ligne.
    let montants: Vec<f64> = rows.rows.iter().map(|r| r.total_amount).collect();
    let commandes: HashSet<i64> = rows.rows.iter().map(|r| r.order_id).collect();
    let clients: HashSet<i64> = rows.rows.iter().map(|r| r.user_id).collect();

    Kpis {
        ca_total: round2(montants.iter().sum()),
        nb_commandes: commandes.len(),
        nb_clients: clients.len(),
        panier_moyen: round2(moyenne(&montants)),
    }
}

/// CA par date de commande, trié par date croissante. Les lignes sans date
/// sont exclues de la série (comme de tout regroupement par date).
fn build_tendance_ca(rows: &RowSet) -> Vec<TrendPoint> {
    let mut par_date: BTreeMap<chrono::NaiveDateTime, f64> = BTreeMap::new();
    for r in &rows.rows {
        if let Some(dt) = r.order_date {
            *par_date.entry(dt).or_insert(0.0) += r.total_amount;
        }
    }

    par_date
        .into_iter()
        .map(|(date, ca)| TrendPoint {
            date: format_order_date(&date),
            ca: round2(ca),
        })
        .collect()
}

fn build_top_produits(rows: &RowSet) -> Vec<ProductSales> {
    let mut par_produit: BTreeMap<&str, i64> = BTreeMap::new();
    for r in &rows.rows {
        *par_produit.entry(r.product_name.as_str()).or_insert(0) += r.quantity;
    }

    let mut classement: Vec<ProductSales> = par_produit
        .into_iter()
        .map(|(produit, quantite)| ProductSales {
            product_name: produit.to_string(),
            quantite,
        })
        .collect();
    // Quantités décroissantes, nom croissant à égalité (ordre stable)
    classement.sort_by(|a, b| {
        b.quantite
            .cmp(&a.quantite)
            .then_with(|| a.product_name.cmp(&b.product_name))
    });
    classement.truncate(TOP_N);
    classement
}

fn build_ca_par_categorie(rows: &RowSet) -> Vec<CategorySales> {
    let mut par_categorie: BTreeMap<&str, f64> = BTreeMap::new();
    for r in &rows.rows {
        *par_categorie.entry(r.category.as_str()).or_insert(0.0) += r.total_amount;
    }

    let total: f64 = par_categorie.values().sum();
    par_categorie
        .into_iter()
        .map(|(categorie, ca)| CategorySales {
            category: categorie.to_string(),
            ca: round2(ca),
            part_pct: pct(ca, total),
        })
        .collect()
}

fn build_paiements(rows: &RowSet) -> PaymentSection {
    if !rows.has_payment_method {
        return PaymentSection::TopClients(build_top_clients(rows));
    }

    let mut par_moyen: BTreeMap<&str, f64> = BTreeMap::new();
    for r in &rows.rows {
        if let Some(pm) = r.payment_method.as_deref() {
            *par_moyen.entry(pm).or_insert(0.0) += r.total_amount;
        }
    }

    if par_moyen.is_empty() {
        // Colonne présente mais aucune valeur: même repli que sans colonne
        log::info!("Aucun moyen de paiement renseigné, repli sur le top clients");
        return PaymentSection::TopClients(build_top_clients(rows));
    }

    let total: f64 = par_moyen.values().sum();
    PaymentSection::MoyensPaiement(
        par_moyen
            .into_iter()
            .map(|(moyen, ca)| PaymentSales {
                payment_method: moyen.to_string(),
                ca: round2(ca),
                part_pct: pct(ca, total),
            })
            .collect(),
    )
}

fn build_top_clients(rows: &RowSet) -> Vec<CustomerSpend> {
    let mut par_client: BTreeMap<i64, f64> = BTreeMap::new();
    for r in &rows.rows {
        *par_client.entry(r.user_id).or_insert(0.0) += r.total_amount;
    }

    let mut classement: Vec<CustomerSpend> = par_client
        .into_iter()
        .map(|(user_id, ca)| CustomerSpend {
            user_id,
            ca: round2(ca),
        })
        .collect();
    classement.sort_by(|a, b| {
        b.ca.partial_cmp(&a.ca)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    classement.truncate(TOP_N);
    classement
}

/// Les 10 lignes les plus récentes, projection fixe de colonnes. Les dates
/// manquantes sont reléguées en fin de tri.
fn build_dernieres_commandes(rows: &RowSet) -> Vec<LatestOrder> {
    let mut tri: Vec<&OrderRow> = rows.rows.iter().collect();
    tri.sort_by(|a, b| cmp_dates_desc(&a.order_date, &b.order_date));

    tri.into_iter()
        .take(TOP_N)
        .map(|r| LatestOrder {
            order_id: r.order_id,
            user_id: r.user_id,
            product_name: r.product_name.clone(),
            quantity: r.quantity,
            total_amount: r.total_amount,
            order_date: r.order_date.as_ref().map(format_order_date),
        })
        .collect()
}

fn cmp_dates_desc(
    a: &Option<chrono::NaiveDateTime>,
    b: &Option<chrono::NaiveDateTime>,
) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.cmp(x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
