/// Fonctions numériques partagées par les agrégats du tableau de bord.

/// Moyenne arithmétique. Retourne 0.0 si le slice est vide.
pub fn moyenne(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Arrondi monétaire à 2 décimales.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Part en pourcentage (une décimale). Retourne 0.0 pour un total nul.
pub fn pct(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        round1(part / total * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- moyenne ---

    #[test]
    fn test_moyenne_vide() {
        assert_eq!(moyenne(&[]), 0.0);
    }

    #[test]
    fn test_moyenne_un_element() {
        assert_eq!(moyenne(&[5.0]), 5.0);
    }

    #[test]
    fn test_moyenne_connue() {
        // (100 + 200 + 300) / 3 = 200
        assert!((moyenne(&[100.0, 200.0, 300.0]) - 200.0).abs() < 1e-10);
    }

    // --- round2 ---

    #[test]
    fn test_round2() {
        assert_eq!(round2(10.456), 10.46);
        assert_eq!(round2(10.004), 10.0);
        assert_eq!(round2(100.0), 100.0);
    }

    // --- pct ---

    #[test]
    fn test_pct_total_nul() {
        assert_eq!(pct(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_pct_connue() {
        assert_eq!(pct(1.0, 3.0), 33.3);
        assert_eq!(pct(600.0, 600.0), 100.0);
    }
}
